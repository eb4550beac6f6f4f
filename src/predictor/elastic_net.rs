//! Elastic-net variant: one flat feature row per prefix, one label per row.

use super::{wrong_variant, Prediction, Variant};
use crate::config::TrainOptions;
use crate::error::{PredictError, Result};
use crate::eventlog::{expand, sort_by_timestamp, EventLog, PredictTarget};
use crate::features::{represent, AttributeGroups};
use crate::labels::prefix_remaining_time;
use crate::model::{ElasticNet, ModelBundle, Regressor, TrainedModel};
use ndarray::Array1;
use tracing::info;

const ALPHA: f64 = 1.0;
const L1_RATIO: f64 = 0.7;
const MAX_ITER: usize = 10000;

pub fn train(log: &EventLog, opts: &TrainOptions) -> Result<ModelBundle> {
    let log = sort_by_timestamp(log, &opts.timestamp_key)?;
    if log.is_empty() {
        return Err(PredictError::EmptyLog);
    }
    let attributes = AttributeGroups::resolve(&log, opts);
    let str_evsucc_attr = vec![opts.activity_key.clone()];

    let (ext_log, change_indexes) = expand(&log);
    let (data, feature_names) = represent(&ext_log, &attributes, &str_evsucc_attr, None)?;

    let remaining_time: Vec<f64> = match &opts.y_orig {
        Some(y) => y.iter().flatten().copied().collect(),
        None => prefix_remaining_time(&ext_log, &opts.label_options())?,
    };
    if remaining_time.len() != data.nrows() {
        return Err(PredictError::LabelMismatch {
            rows: data.nrows(),
            labels: remaining_time.len(),
        });
    }

    let mut regr = ElasticNet::new(ALPHA, L1_RATIO).with_max_iter(MAX_ITER);
    regr.fit(&data, &Array1::from(remaining_time.clone()))?;
    info!(
        cases = change_indexes.len(),
        prefixes = data.nrows(),
        features = feature_names.len(),
        "elastic net trained"
    );

    Ok(ModelBundle::new(
        opts,
        attributes,
        str_evsucc_attr,
        feature_names,
        TrainedModel::ElasticNet {
            regr,
            remaining_time,
        },
    ))
}

pub fn test(bundle: &ModelBundle, target: PredictTarget<'_>) -> Result<Prediction> {
    let TrainedModel::ElasticNet { regr, .. } = &bundle.model else {
        return Err(wrong_variant(Variant::ElasticNet, bundle));
    };
    let log = target.to_log();
    let (data, _) = represent(
        &log,
        &bundle.attributes,
        &bundle.str_evsucc_attr,
        Some(bundle.feature_names.as_slice()),
    )?;
    let pred = regr.predict(&data)?;
    Ok(Prediction::from_values(pred.to_vec()))
}
