//! Trained model bundle: the regressor plus everything needed to re-project
//! new traces onto its features.

use super::{ElasticNet, RecurrentRegressor};
use crate::config::TrainOptions;
use crate::features::AttributeGroups;
use crate::predictor::Variant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The trained regressor and its variant-specific extras, tagged by `variant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant")]
pub enum TrainedModel {
    #[serde(rename = "elasticnet")]
    ElasticNet {
        regr: ElasticNet,
        /// Training labels, one per prefix
        remaining_time: Vec<f64>,
    },
    #[serde(rename = "keras_rnn")]
    SequenceModel {
        regr: RecurrentRegressor,
        max_len_trace: usize,
        /// `ln(1 + max remaining time)` of the training corpus
        log_max_value: f64,
    },
}

impl TrainedModel {
    pub fn variant(&self) -> Variant {
        match self {
            TrainedModel::ElasticNet { .. } => Variant::ElasticNet,
            TrainedModel::SequenceModel { .. } => Variant::SequenceModel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub activity_key: String,
    pub timestamp_key: String,
    #[serde(flatten)]
    pub attributes: AttributeGroups,
    pub str_evsucc_attr: Vec<String>,
    /// Column order of the training representation
    pub feature_names: Vec<String>,
    #[serde(flatten)]
    pub model: TrainedModel,
}

impl ModelBundle {
    pub fn new(
        opts: &TrainOptions,
        attributes: AttributeGroups,
        str_evsucc_attr: Vec<String>,
        feature_names: Vec<String>,
        model: TrainedModel,
    ) -> Self {
        Self {
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            activity_key: opts.activity_key.clone(),
            timestamp_key: opts.timestamp_key.clone(),
            attributes,
            str_evsucc_attr,
            feature_names,
            model,
        }
    }

    pub fn variant(&self) -> Variant {
        self.model.variant()
    }
}
