//! Test utility errors.

use thiserror::Error;

/// Errors produced by test helpers.
#[derive(Error, Debug)]
pub enum TestError {
    /// Failed to read a response body.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// Failed to deserialize a JSON body.
    #[error("failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
