//! Event log model: logs of traces of attributed, timestamped events.
//! Shared by the label, feature and adapter layers; read from / written to JSON.

mod prefixes;
mod sorting;

pub use prefixes::expand;
pub use sorting::sort_by_timestamp;

use crate::error::{PredictError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Well-known key of the activity name.
pub const DEFAULT_ACTIVITY_KEY: &str = "concept:name";
/// Well-known key of the event timestamp.
pub const DEFAULT_TIMESTAMP_KEY: &str = "time:timestamp";

/// Attribute value on an event or a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Int(i64),
    Float(f64),
    Timestamp(DateTime<FixedOffset>),
    Text(String),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            AttributeValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeValue::Int(_) | AttributeValue::Float(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AttributeValue::Text(_))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        AttributeValue::Timestamp(v)
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// One event: attribute name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    pub attributes: Attributes,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }

    pub fn timestamp(&self, key: &str) -> Result<DateTime<FixedOffset>> {
        self.get(key)
            .and_then(AttributeValue::as_timestamp)
            .ok_or_else(|| PredictError::missing(key, "event"))
    }
}

/// Ordered events of one process instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Trace {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            attributes: Attributes::new(),
            events,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&Event> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Copy of the first `k` events, trace attributes kept.
    pub fn prefix(&self, k: usize) -> Trace {
        Trace {
            attributes: self.attributes.clone(),
            events: self.events[..k.min(self.events.len())].to_vec(),
        }
    }
}

/// Ordered collection of traces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl EventLog {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self {
            attributes: Attributes::new(),
            traces,
        }
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trace> {
        self.traces.iter()
    }

    /// Longest trace length (0 for an empty log).
    pub fn max_trace_len(&self) -> usize {
        self.traces.iter().map(Trace::len).max().unwrap_or(0)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

impl From<Trace> for EventLog {
    fn from(trace: Trace) -> Self {
        EventLog::new(vec![trace])
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Trace;
    type IntoIter = std::slice::Iter<'a, Trace>;

    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}

/// What a trained model is asked to predict: one trace or a whole log.
#[derive(Debug, Clone, Copy)]
pub enum PredictTarget<'a> {
    Trace(&'a Trace),
    Log(&'a EventLog),
}

impl<'a> PredictTarget<'a> {
    /// The target as a log; a single trace becomes a singleton log.
    pub fn to_log(self) -> Cow<'a, EventLog> {
        match self {
            PredictTarget::Trace(trace) => Cow::Owned(EventLog::from(trace.clone())),
            PredictTarget::Log(log) => Cow::Borrowed(log),
        }
    }
}

impl<'a> From<&'a Trace> for PredictTarget<'a> {
    fn from(trace: &'a Trace) -> Self {
        PredictTarget::Trace(trace)
    }
}

impl<'a> From<&'a EventLog> for PredictTarget<'a> {
    fn from(log: &'a EventLog) -> Self {
        PredictTarget::Log(log)
    }
}
