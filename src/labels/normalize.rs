//! Per-case grouping and log scaling of remaining-time labels.
//!
//! Scaling maps `v` in `[0, max_v]` onto `[-1, 1]` with
//! `-1 + 2 * ln(1 + v) / ln(1 + max_v)`; `ln(1 + max_v)` must be kept to invert.

use crate::error::{PredictError, Result};

/// Regroups flat per-prefix values into one fixed-length sequence per case.
///
/// Values are consumed in change-index order. A case longer than `max_len` is cut,
/// a shorter one is right-padded with its own last value. Cases without rows are skipped.
pub fn group_by_case(change_indexes: &[Vec<usize>], flat: &[f64], max_len: usize) -> Result<Vec<Vec<f64>>> {
    let needed: usize = change_indexes.iter().map(Vec::len).sum();
    if flat.len() < needed {
        return Err(PredictError::LabelMismatch {
            rows: needed,
            labels: flat.len(),
        });
    }

    let mut grouped = Vec::with_capacity(change_indexes.len());
    let mut j = 0;
    for case in change_indexes {
        let mut rem = Vec::with_capacity(max_len);
        for _ in case {
            if rem.len() < max_len {
                rem.push(flat[j]);
            }
            j += 1;
        }
        if let Some(&last) = rem.last() {
            rem.resize(max_len, last);
            grouped.push(rem);
        }
    }
    Ok(grouped)
}

/// Scales one raw value given `log_max_value = ln(1 + max_v)`.
pub fn normalize_value(v: f64, log_max_value: f64) -> f64 {
    if log_max_value == 0.0 {
        return -1.0;
    }
    -1.0 + 2.0 * (v.ln_1p() / log_max_value)
}

/// Scales every value against the global maximum of the whole corpus.
pub fn normalize(grouped: &[Vec<f64>]) -> (Vec<Vec<f64>>, f64) {
    let max_value = grouped
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);
    let log_max_value = max_value.ln_1p();
    let normalized = grouped
        .iter()
        .map(|seq| seq.iter().map(|&v| normalize_value(v, log_max_value)).collect())
        .collect();
    (normalized, log_max_value)
}

/// Inverse of [`normalize_value`]; predictions below -1 are clamped to -1 first.
pub fn denormalize(y: f64, log_max_value: f64) -> f64 {
    let y = y.max(-1.0);
    ((y + 1.0) / 2.0 * log_max_value).exp_m1()
}
