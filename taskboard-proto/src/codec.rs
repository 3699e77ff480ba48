//! JSON encoding for task collections and API response bodies.
//!
//! The task API speaks JSON over HTTP; the server also persists its task
//! list with the same encoding. Response bodies for errors and plain
//! acknowledgements are defined here so both sides agree on their shape.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error body returned by the task API on 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error class, e.g. `"Not found"`.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Plain acknowledgement body, e.g. for deletes and the health route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}

/// Encodes a task list as compact JSON.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if encoding fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Encodes a task list as indented JSON, suitable for a data file.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if encoding fails.
pub fn encode_tasks_pretty(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Decodes a JSON task list.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the input is not a JSON array of
/// valid task records.
pub fn decode_tasks(json: &str) -> Result<Vec<Task>, CodecError> {
    Ok(serde_json::from_str(json)?)
}
