//! Handler error types

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModelError;

/// Errors that can escape a handler
///
/// Handlers render most of their own failures as markdown and return `Ok`;
/// anything that does escape is caught at the dispatch boundary and turned
/// into a formatted error fragment there. Nothing propagates past dispatch.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Model round-trip failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Log file does not exist
    #[error("log file not found: {}", .0.display())]
    LogNotFound(PathBuf),

    /// Process could not be spawned
    #[error("failed to launch process: {0}")]
    Spawn(String),

    /// Process exceeded its timeout
    #[error("process timed out after {0} seconds")]
    Timeout(u64),

    /// Turn was cancelled
    #[error("cancelled")]
    Cancelled,
}

impl HandlerError {
    /// Create a non-success status error
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
