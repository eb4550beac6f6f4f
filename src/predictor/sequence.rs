//! Sequence variant: an LSTM over per-event feature rows, predicting the
//! normalized remaining time at every timestep from the whole padded trace.

use super::{wrong_variant, Prediction, Variant};
use crate::config::TrainOptions;
use crate::error::{PredictError, Result};
use crate::eventlog::{EventLog, PredictTarget, Trace};
use crate::features::{encode_log, represent, AttributeGroups, FeatureDictionary};
use crate::labels::{denormalize, group_by_case, normalize, remaining_time};
use crate::model::{ModelBundle, RecurrentConfig, RecurrentRegressor, Regressor, TrainedModel};
use ndarray::Array2;
use tracing::info;

const MAX_HIDDEN: usize = 50;
const HIDDEN_PER_FEATURE: f64 = 7.5;
const VALIDATION_SPLIT: f64 = 0.2;
const LEARNING_RATE: f64 = 1e-3;

/// LSTM width for a feature width: 7.5 units per feature, capped at 50.
pub fn hidden_units(feature_width: usize) -> usize {
    ((feature_width as f64 * HIDDEN_PER_FEATURE).round() as usize).clamp(1, MAX_HIDDEN)
}

/// Change indexes and flat values of per-case label lists.
fn flatten_cases(cases: &[&Vec<f64>]) -> (Vec<Vec<usize>>, Vec<f64>) {
    let mut change_indexes = Vec::with_capacity(cases.len());
    let mut flat = Vec::new();
    for case in cases {
        change_indexes.push((flat.len()..flat.len() + case.len()).collect());
        flat.extend(case.iter().copied());
    }
    (change_indexes, flat)
}

/// Reads each trace's output at its own last real timestep and maps it back to seconds.
pub fn read_last_steps(outputs: &Array2<f64>, lengths: &[usize], max_len_trace: usize, log_max_value: f64) -> Vec<f64> {
    lengths
        .iter()
        .enumerate()
        .map(|(row, &len)| {
            let step = len.min(max_len_trace).saturating_sub(1);
            denormalize(outputs[[row, step]], log_max_value)
        })
        .collect()
}

pub fn train(log: &EventLog, opts: &TrainOptions) -> Result<ModelBundle> {
    // no timestamp sort for this variant
    let max_len_trace = log.max_trace_len();
    if max_len_trace == 0 {
        return Err(PredictError::EmptyLog);
    }
    let attributes = AttributeGroups::resolve(log, opts);
    let str_evsucc_attr = vec![opts.activity_key.clone()];
    let (_, feature_names) = represent(log, &attributes, &str_evsucc_attr, None)?;
    let dict = FeatureDictionary::build(&feature_names);

    let encoded = encode_log(log, &dict, max_len_trace);
    if encoded.is_empty() {
        return Err(PredictError::EmptyLog);
    }

    let per_trace = match &opts.y_orig {
        Some(y) => y.clone(),
        None => remaining_time(log, max_len_trace, &opts.label_options())?,
    };
    if per_trace.len() != log.len() {
        return Err(PredictError::LabelMismatch {
            rows: log.len(),
            labels: per_trace.len(),
        });
    }
    // same traces as the tensor
    let kept: Vec<&Vec<f64>> = encoded.kept.iter().map(|&i| &per_trace[i]).collect();
    let (change_indexes, flat) = flatten_cases(&kept);
    let grouped = group_by_case(&change_indexes, &flat, max_len_trace)?;
    if grouped.len() != encoded.len() {
        return Err(PredictError::LabelMismatch {
            rows: encoded.len(),
            labels: grouped.len(),
        });
    }
    let (normalized, log_max_value) = normalize(&grouped);
    let y = Array2::from_shape_vec(
        (encoded.len(), max_len_trace),
        normalized.into_iter().flatten().collect(),
    )
    .map_err(|e| PredictError::Shape(e.to_string()))?;

    let width = dict.len();
    let config = RecurrentConfig {
        hidden: hidden_units(width),
        outputs: max_len_trace,
        epochs: opts.default_epochs,
        batch_size: max_len_trace,
        validation_split: VALIDATION_SPLIT,
        learning_rate: LEARNING_RATE,
        seed: opts.seed,
    };
    let mut regr = RecurrentRegressor::new(width, config)?;
    regr.fit(&encoded.tensor, &y)?;
    info!(
        cases = encoded.len(),
        dropped = log.len() - encoded.len(),
        max_len_trace,
        features = width,
        log_max_value,
        "sequence model trained"
    );

    Ok(ModelBundle::new(
        opts,
        attributes,
        str_evsucc_attr,
        feature_names,
        TrainedModel::SequenceModel {
            regr,
            max_len_trace,
            log_max_value,
        },
    ))
}

pub fn test(bundle: &ModelBundle, target: PredictTarget<'_>) -> Result<Prediction> {
    let TrainedModel::SequenceModel {
        regr,
        max_len_trace,
        log_max_value,
    } = &bundle.model
    else {
        return Err(wrong_variant(Variant::SequenceModel, bundle));
    };
    let log = target.to_log();
    if let Some(idx) = log.iter().position(Trace::is_empty) {
        return Err(PredictError::EmptyTrace(idx));
    }

    let dict = FeatureDictionary::build(&bundle.feature_names);
    let encoded = encode_log(&log, &dict, *max_len_trace);
    if encoded.len() != log.len() {
        return Err(PredictError::Shape(format!(
            "{} of {} traces could be encoded",
            encoded.len(),
            log.len()
        )));
    }
    let outputs = regr.predict(&encoded.tensor)?;
    let lengths: Vec<usize> = log.iter().map(Trace::len).collect();
    Ok(Prediction::from_values(read_last_steps(
        &outputs,
        &lengths,
        *max_len_trace,
        *log_max_value,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::normalize_value;

    #[test]
    fn hidden_units_scale_and_cap() {
        assert_eq!(hidden_units(1), 8);
        assert_eq!(hidden_units(2), 15);
        assert_eq!(hidden_units(6), 45);
        assert_eq!(hidden_units(7), 50);
        assert_eq!(hidden_units(300), 50);
    }

    #[test]
    fn reads_own_last_timestep_not_padded_end() {
        let log_max = 1000.0_f64.ln_1p();
        // column k holds the normalized value of 10 * k seconds
        let outputs = Array2::from_shape_fn((2, 10), |(_, k)| normalize_value(10.0 * k as f64, log_max));
        let got = read_last_steps(&outputs, &[4, 10], 10, log_max);
        assert!((got[0] - 30.0).abs() < 1e-9);
        assert!((got[1] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn longer_than_training_reads_last_column() {
        let outputs = Array2::from_shape_fn((1, 3), |(_, k)| k as f64 - 1.0);
        let log_max = 2.0_f64.ln();
        let got = read_last_steps(&outputs, &[7], 3, log_max);
        assert!((got[0] - denormalize(1.0, log_max)).abs() < 1e-12);
    }

    #[test]
    fn flatten_builds_partition() {
        let a = vec![3.0, 1.0];
        let b = vec![5.0];
        let (change, flat) = flatten_cases(&[&a, &b]);
        assert_eq!(change, vec![vec![0, 1], vec![2]]);
        assert_eq!(flat, vec![3.0, 1.0, 5.0]);
    }
}
