//! Error type shared by the pipeline, the regressors and persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("missing or mistyped attribute `{key}` on {context}")]
    MissingAttribute { key: String, context: String },

    #[error("log contains no non-empty trace")]
    EmptyLog,

    #[error("trace {0} has no events")]
    EmptyTrace(usize),

    #[error("{labels} labels for {rows} feature rows")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("unknown variant `{0}` (expected elasticnet or keras_rnn)")]
    UnknownVariant(String),

    #[error("bundle holds a {found} model, expected {expected}")]
    WrongVariant { expected: String, found: String },

    #[error("model file digest does not match its contents")]
    Checksum,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PredictError {
    pub(crate) fn missing(key: &str, context: impl Into<String>) -> Self {
        PredictError::MissingAttribute {
            key: key.to_string(),
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
