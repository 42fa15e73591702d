//! Model error types

use thiserror::Error;

/// Errors that can occur during a model round-trip
#[derive(Error, Debug)]
pub enum ModelError {
    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API request failed with a status code
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing error in the response envelope
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request was cancelled
    #[error("request cancelled")]
    Cancelled,

    /// Response carried no usable content
    #[error("empty response from {model}")]
    EmptyResponse { model: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an empty-response error
    pub fn empty_response(model: impl Into<String>) -> Self {
        Self::EmptyResponse {
            model: model.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
