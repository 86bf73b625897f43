use bmcs_common::BmcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact missing, runner not found, or table unreadable. Raised at load time.
    #[error("{model} model unavailable: {reason}")]
    Unavailable { model: String, reason: String },

    /// Runner failure or scores that do not fit the input batch.
    #[error("{model} model inference failed: {reason}")]
    Inference { model: String, reason: String },
}

impl ModelError {
    pub fn unavailable(model: &str, reason: impl Into<String>) -> Self {
        ModelError::Unavailable { model: model.to_string(), reason: reason.into() }
    }

    pub fn inference(model: &str, reason: impl Into<String>) -> Self {
        ModelError::Inference { model: model.to_string(), reason: reason.into() }
    }
}

impl From<ModelError> for BmcsError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable { model, reason } => BmcsError::ModelUnavailable { model, reason },
            ModelError::Inference { model, reason } => BmcsError::ModelInference { model, reason },
        }
    }
}
