//! Predictor configuration: training options, CLI defaults and logging.

use crate::calendar::BusinessCalendar;
use crate::eventlog::{DEFAULT_ACTIVITY_KEY, DEFAULT_TIMESTAMP_KEY};
use crate::labels::LabelOptions;
use crate::predictor::Variant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Variant trained by `rtp train` when none is given on the command line
    pub variant: Variant,
    /// Default model file for `rtp train`
    pub model_path: PathBuf,
    /// Options passed to the training adapters
    pub train: TrainOptions,
    /// Logging
    pub log: LogConfig,
}

/// Caller-supplied training options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    pub activity_key: String,
    pub timestamp_key: String,
    /// Measure remaining time in business seconds instead of wall-clock seconds
    pub business_hours: bool,
    /// Working day bounds (hours of day)
    pub worktiming: [u32; 2],
    /// Non-working ISO weekdays (Mon = 1 .. Sun = 7)
    pub weekends: Vec<u32>,
    /// Explicit attribute groups; used only when `str_ev_attr` is set
    pub str_tr_attr: Option<Vec<String>>,
    pub str_ev_attr: Option<Vec<String>>,
    pub num_tr_attr: Option<Vec<String>>,
    pub num_ev_attr: Option<Vec<String>>,
    /// Precomputed remaining times, one list per trace
    pub y_orig: Option<Vec<Vec<f64>>>,
    /// Epochs for the sequence model
    pub default_epochs: usize,
    /// Seed for weight init and shuffling
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            variant: Variant::ElasticNet,
            model_path: PathBuf::from("model.json"),
            train: TrainOptions::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            activity_key: DEFAULT_ACTIVITY_KEY.to_string(),
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            business_hours: false,
            worktiming: [7, 17],
            weekends: vec![6, 7],
            str_tr_attr: None,
            str_ev_attr: None,
            num_tr_attr: None,
            num_ev_attr: None,
            y_orig: None,
            default_epochs: 50,
            seed: 42,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl TrainOptions {
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            timestamp_key: self.timestamp_key.clone(),
            business_hours: self.business_hours,
            calendar: BusinessCalendar::new(self.worktiming, self.weekends.clone()),
        }
    }
}

impl PredictorConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                match serde_json::from_str::<PredictorConfig>(&data) {
                    Ok(c) => return c,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "invalid config; using defaults")
                    }
                }
            }
        }
        Self::default()
    }
}
