use thiserror::Error;

#[derive(Debug, Error)]
pub enum BmcsError {
    #[error("Malformed citation {record}: {reason}")]
    MalformedInput { record: String, reason: String },

    #[error(
        "There are no citations that fit the current criteria. Consider using the \
         --predict-medline option or running without --filter."
    )]
    EmptyEligibleSet,

    #[error("{model} model unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("{model} model inference failed: {reason}")]
    ModelInference { model: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("{metric} does not match expected value: expected {expected}, got {actual} (tolerance {tolerance})")]
    Regression {
        metric: String,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BmcsError {
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        BmcsError::MalformedInput { record: record.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, BmcsError>;
