//! Timestep-major tensors for the recurrent model: one binary row per event.

use super::{event_descriptor, succession_descriptor, FeatureDictionary};
use crate::eventlog::{EventLog, Trace};
use ndarray::{Array2, Array3};

/// Encodes `trace` as a `(max_len, dict.len())` matrix.
///
/// Row `i` marks the `event:` descriptors of event `i` and, unless `i` is the
/// trace's last event, the `succession:` descriptors towards event `i + 1`.
/// Rows past the trace are zero. `None` when the representation would be empty.
pub fn encode_trace(trace: &Trace, dict: &FeatureDictionary, max_len: usize) -> Option<Array2<f64>> {
    if trace.is_empty() || max_len == 0 || dict.is_empty() {
        return None;
    }
    let mut x = Array2::<f64>::zeros((max_len, dict.len()));
    let steps = trace.len().min(max_len);
    for i in 0..steps {
        let event = &trace.events[i];
        let mut row = x.row_mut(i);
        for (attr, value) in event.iter() {
            if let Some(col) = dict.index_of(&event_descriptor(attr, value)) {
                row[col] = 1.0;
            }
        }
        if let Some(next) = trace.events.get(i + 1) {
            for (attr, value) in event.iter() {
                if let Some(next_value) = next.get(attr) {
                    let d = succession_descriptor(attr, value, next_value);
                    if let Some(col) = dict.index_of(&d) {
                        row[col] = 1.0;
                    }
                }
            }
        }
    }
    Some(x)
}

/// Stacked encodings of a log plus the indices of the traces they came from.
#[derive(Debug, Clone)]
pub struct EncodedLog {
    /// `(kept traces, max_len, features)`
    pub tensor: Array3<f64>,
    /// Source trace index of each tensor slice; filter labels with the same list
    pub kept: Vec<usize>,
}

impl EncodedLog {
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Encodes every trace; traces with an empty representation are left out.
pub fn encode_log(log: &EventLog, dict: &FeatureDictionary, max_len: usize) -> EncodedLog {
    let (kept, encoded): (Vec<usize>, Vec<Array2<f64>>) = log
        .iter()
        .enumerate()
        .filter_map(|(idx, trace)| encode_trace(trace, dict, max_len).map(|x| (idx, x)))
        .unzip();
    let mut tensor = Array3::<f64>::zeros((encoded.len(), max_len, dict.len()));
    for (mut slot, x) in tensor.outer_iter_mut().zip(&encoded) {
        slot.assign(x);
    }
    EncodedLog { tensor, kept }
}
