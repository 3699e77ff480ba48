//! Remote task API port.
//!
//! The board talks to its source of truth through [`TaskApi`]. Two
//! implementations are provided: [`HttpTaskApi`] for the REST task API and
//! [`MemoryTaskApi`], an in-process stand-in used for tests and offline mode.

pub mod http;
pub mod memory;

pub use http::HttpTaskApi;
pub use memory::MemoryTaskApi;

use async_trait::async_trait;
use taskboard_proto::{NewTask, Task, TaskId};

/// Errors returned by a [`TaskApi`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("HTTP {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Server-provided message, or the raw body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
    /// The configured base URL is unusable.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Operations the board needs from the remote task list.
///
/// Identifiers are already canonical [`TaskId`] values on both sides of
/// this boundary.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches the full task collection.
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// Creates a task and returns the stored record with its assigned id.
    async fn create(&self, task: &NewTask) -> Result<Task, ApiError>;

    /// Replaces the stored record for `task.id` with `task`.
    async fn update(&self, task: &Task) -> Result<(), ApiError>;

    /// Deletes the task with `id`.
    async fn delete(&self, id: TaskId) -> Result<(), ApiError>;
}
