//! The board: task store, drag-and-drop reorder engine and remote sync.
//!
//! A drag gesture flows through three steps:
//!
//! 1. [`compute_reorder`] turns the current collection and a [`DragEnd`]
//!    into a new collection. Pure, no I/O.
//! 2. The new collection is applied to the [`TaskStore`] at once, so the
//!    view shows the move before the network is involved.
//! 3. [`Board`] persists the moved task with a single update call. If that
//!    fails, the store is reloaded from the task API.

pub mod columns;
pub mod reorder;
pub mod store;
pub mod sync;

pub use columns::{column, columns, is_dense};
pub use reorder::{DragEnd, MoveKind, Reorder, compute_reorder};
pub use store::{LoadState, TaskStore};
pub use sync::{Board, DragOutcome, GesturePhase};

use taskboard_proto::{TaskId, ValidationError};
use thiserror::Error;

use crate::api::ApiError;

/// Errors returned by board actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The request failed local validation and was not sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The task API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The task is not in the local collection.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
}
