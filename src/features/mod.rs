//! Feature engineering over event logs: attribute selection, the flat per-trace
//! representation, the descriptor dictionary and per-timestep sequence tensors.

mod dictionary;
mod representation;
mod selection;
mod sequence;

pub use dictionary::FeatureDictionary;
pub use representation::represent;
pub use selection::select_attributes;
pub use sequence::{encode_log, encode_trace, EncodedLog};

use crate::config::TrainOptions;
use crate::eventlog::{AttributeValue, EventLog};
use serde::{Deserialize, Serialize};

/// Attribute names feeding the representation, split by scope and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroups {
    pub str_tr_attr: Vec<String>,
    pub str_ev_attr: Vec<String>,
    pub num_tr_attr: Vec<String>,
    pub num_ev_attr: Vec<String>,
}

impl AttributeGroups {
    /// Caller overrides win when `str_ev_attr` is given, otherwise the selection
    /// heuristic runs. The activity attribute is always a string event attribute.
    pub fn resolve(log: &EventLog, opts: &TrainOptions) -> Self {
        let mut groups = match &opts.str_ev_attr {
            Some(str_ev_attr) => AttributeGroups {
                str_tr_attr: opts.str_tr_attr.clone().unwrap_or_default(),
                str_ev_attr: str_ev_attr.clone(),
                num_tr_attr: opts.num_tr_attr.clone().unwrap_or_default(),
                num_ev_attr: opts.num_ev_attr.clone().unwrap_or_default(),
            },
            None => select_attributes(log),
        };
        if !groups.str_ev_attr.contains(&opts.activity_key) {
            groups.str_ev_attr.push(opts.activity_key.clone());
        }
        groups
    }
}

pub fn trace_descriptor(attr: &str, value: &AttributeValue) -> String {
    format!("trace:{}@{}", attr, value)
}

pub fn event_descriptor(attr: &str, value: &AttributeValue) -> String {
    format!("event:{}@{}", attr, value)
}

pub fn succession_descriptor(attr: &str, from: &AttributeValue, to: &AttributeValue) -> String {
    format!("succession:{}@{}#{}", attr, from, to)
}

pub fn numeric_trace_descriptor(attr: &str) -> String {
    format!("trace:{}", attr)
}

pub fn numeric_event_descriptor(attr: &str) -> String {
    format!("event:{}", attr)
}
