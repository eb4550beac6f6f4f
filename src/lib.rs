//! Remaining-time prediction for in-progress process traces.
//!
//! Modular structure:
//! - [`eventlog`]: traces, events, prefix expansion and timestamp sorting
//! - [`calendar`]: business-hours elapsed time
//! - [`labels`]: remaining-time labels and log normalization
//! - [`features`]: attribute selection, flat representation, sequence tensors
//! - [`model`]: elastic net, LSTM regressor, bundle and model files
//! - [`predictor`]: train/test entry points per variant
//! - [`logging`]: Structured JSON logging

pub mod calendar;
pub mod config;
pub mod error;
pub mod eventlog;
pub mod features;
pub mod labels;
pub mod logging;
pub mod model;
pub mod predictor;

pub use config::{PredictorConfig, TrainOptions};
pub use error::{PredictError, Result};
pub use eventlog::{AttributeValue, Event, EventLog, PredictTarget, Trace};
pub use logging::StructuredLogger;
pub use model::ModelBundle;
pub use predictor::{test, train, Prediction, Variant};
