//! Training and prediction entry points for the two model variants.
//!
//! `train` routes by the variant the caller asks for; `test` routes by the
//! variant recorded in the bundle, so a bundle always meets its own adapter.

pub mod elastic_net;
pub mod sequence;

use crate::config::TrainOptions;
use crate::error::{PredictError, Result};
use crate::eventlog::{EventLog, PredictTarget};
use crate::model::ModelBundle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    #[serde(rename = "elasticnet")]
    ElasticNet,
    #[serde(rename = "keras_rnn")]
    SequenceModel,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::ElasticNet => "elasticnet",
            Variant::SequenceModel => "keras_rnn",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "elasticnet" => Ok(Variant::ElasticNet),
            "keras_rnn" => Ok(Variant::SequenceModel),
            other => Err(PredictError::UnknownVariant(other.to_string())),
        }
    }
}

/// Remaining time in seconds: a number for a single trace, a list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Single(f64),
    Many(Vec<f64>),
}

impl Prediction {
    pub(crate) fn from_values(mut values: Vec<f64>) -> Self {
        if values.len() == 1 {
            Prediction::Single(values.remove(0))
        } else {
            Prediction::Many(values)
        }
    }

    pub fn as_single(&self) -> Option<f64> {
        match self {
            Prediction::Single(v) => Some(*v),
            Prediction::Many(_) => None,
        }
    }

    /// Predictions in input order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Prediction::Single(v) => vec![*v],
            Prediction::Many(v) => v.clone(),
        }
    }
}

pub fn train(log: &EventLog, variant: Variant, opts: &TrainOptions) -> Result<ModelBundle> {
    match variant {
        Variant::ElasticNet => elastic_net::train(log, opts),
        Variant::SequenceModel => sequence::train(log, opts),
    }
}

pub fn test<'a>(bundle: &ModelBundle, target: impl Into<PredictTarget<'a>>) -> Result<Prediction> {
    let target = target.into();
    match bundle.variant() {
        Variant::ElasticNet => elastic_net::test(bundle, target),
        Variant::SequenceModel => sequence::test(bundle, target),
    }
}

fn wrong_variant(expected: Variant, bundle: &ModelBundle) -> PredictError {
    PredictError::WrongVariant {
        expected: expected.to_string(),
        found: bundle.variant().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names() {
        assert_eq!("elasticnet".parse::<Variant>().unwrap(), Variant::ElasticNet);
        assert_eq!("keras_rnn".parse::<Variant>().unwrap(), Variant::SequenceModel);
        assert!(matches!("svr".parse::<Variant>(), Err(PredictError::UnknownVariant(_))));
        assert_eq!(serde_json::to_string(&Variant::SequenceModel).unwrap(), "\"keras_rnn\"");
        assert_eq!(Variant::default(), Variant::ElasticNet);
    }

    #[test]
    fn single_value_is_a_scalar() {
        assert_eq!(Prediction::from_values(vec![3.0]), Prediction::Single(3.0));
        assert_eq!(Prediction::from_values(vec![3.0, 4.0]).values(), vec![3.0, 4.0]);
        assert_eq!(serde_json::to_string(&Prediction::Single(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Prediction::Many(vec![1.0, 2.0])).unwrap(), "[1.0,2.0]");
    }
}
