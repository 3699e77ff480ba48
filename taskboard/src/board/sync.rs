//! Board actions and remote synchronization.
//!
//! [`Board::drag_end`] is the per-gesture driver: compute and apply locally
//! in one step, persist the moved task with one update call, and on failure
//! reload the whole collection from the task API. Local moves never lose
//! each other, but remote calls are not queued; if two gestures overlap,
//! whichever remote call resolves last decides the final state, and a
//! failed gesture's reload may discard the other's optimistic move.

use std::fmt;
use std::sync::Arc;

use taskboard_proto::{NewTask, Status, Task, TaskEdit, TaskId};

use super::columns::is_dense;
use super::reorder::{DragEnd, MoveKind};
use super::store::TaskStore;
use super::BoardError;
use crate::api::{ApiError, TaskApi};
use crate::notify::{Notice, Notifier};

/// Where a drag gesture is in its lifecycle.
///
/// `Idle` is both the initial and terminal phase; a no-op gesture never
/// leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No gesture in progress.
    Idle,
    /// Computing the new collection.
    Computing,
    /// The new collection is in the store; the update call is in flight.
    OptimisticallyApplied,
    /// The update call succeeded.
    PersistConfirmed,
    /// The update call failed.
    PersistFailed,
    /// Reloading the collection after a failed update.
    Reloading,
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Computing => "computing",
            Self::OptimisticallyApplied => "optimistically-applied",
            Self::PersistConfirmed => "persist-confirmed",
            Self::PersistFailed => "persist-failed",
            Self::Reloading => "reloading",
        };
        f.write_str(name)
    }
}

/// How a drag gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing changed and nothing was sent.
    NoOp,
    /// The move was applied and the update call succeeded.
    Persisted {
        /// The moved task as sent to the task API.
        task: Task,
        /// Which columns the move touched.
        kind: MoveKind,
    },
    /// The update call failed and the store was reloaded.
    RolledBack {
        /// Why the update failed.
        error: ApiError,
        /// Whether the reload succeeded. When `false` the store is in the
        /// failed load state.
        reloaded: bool,
    },
}

impl DragOutcome {
    /// The last phase the gesture passed through before returning to idle.
    #[must_use]
    pub const fn terminal_phase(&self) -> GesturePhase {
        match self {
            Self::NoOp => GesturePhase::Idle,
            Self::Persisted { .. } => GesturePhase::PersistConfirmed,
            Self::RolledBack { .. } => GesturePhase::Reloading,
        }
    }
}

/// A task board bound to a remote task API.
///
/// Clones share the same store, API and notifier.
#[derive(Clone)]
pub struct Board {
    store: TaskStore,
    api: Arc<dyn TaskApi>,
    notifier: Notifier,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("store", &self.store)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Creates a board with an empty store.
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>, notifier: Notifier) -> Self {
        Self::with_store(TaskStore::new(), api, notifier)
    }

    /// Creates a board over an existing store, e.g. one a view already holds.
    #[must_use]
    pub fn with_store(store: TaskStore, api: Arc<dyn TaskApi>, notifier: Notifier) -> Self {
        Self {
            store,
            api,
            notifier,
        }
    }

    /// The board's task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Reloads the collection from the task API.
    ///
    /// This is also the manual retry after a failed load.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the fetch after notifying the user.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.store.load(self.api.as_ref()).await.inspect_err(|e| {
            self.notifier.notify(Notice::LoadFailed {
                error: e.to_string(),
            });
        })
    }

    /// Handles the end of a drag gesture.
    ///
    /// The store reflects the move before this function first awaits. Exactly
    /// one update call is made for a move, carrying the moved task's new
    /// status and order; other renumbered tasks are not sent. A failed update
    /// is reported through the notifier and rolled back by reloading.
    pub async fn drag_end(&self, drag: DragEnd) -> DragOutcome {
        let task_id = drag.active;
        enter(task_id, GesturePhase::Computing);

        let Some(reorder) = self.store.reorder(drag) else {
            tracing::debug!(task_id = %task_id, over = ?drag.over, "drag is a no-op");
            enter(task_id, GesturePhase::Idle);
            return DragOutcome::NoOp;
        };

        let target = reorder.moved.status;
        log_density(&reorder.tasks, target, reorder.kind);
        enter(task_id, GesturePhase::OptimisticallyApplied);

        let outcome = match self.api.update(&reorder.moved).await {
            Ok(()) => {
                enter(task_id, GesturePhase::PersistConfirmed);
                tracing::info!(
                    task_id = %task_id,
                    status = %target,
                    order = reorder.moved.order,
                    "task move persisted"
                );
                DragOutcome::Persisted {
                    task: reorder.moved,
                    kind: reorder.kind,
                }
            }
            Err(error) => {
                enter(task_id, GesturePhase::PersistFailed);
                self.notifier.notify(Notice::PersistFailed {
                    task_id,
                    error: error.to_string(),
                });
                enter(task_id, GesturePhase::Reloading);
                let reloaded = self.refresh().await.is_ok();
                DragOutcome::RolledBack { error, reloaded }
            }
        };
        enter(task_id, GesturePhase::Idle);
        outcome
    }

    /// Creates a task, then reloads the board.
    ///
    /// Nothing is shown locally until the reload brings the new task back.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Invalid`] without calling the API if the title
    /// is invalid, or [`BoardError::Api`] if the create call fails.
    pub async fn add_task(&self, task: NewTask) -> Result<TaskId, BoardError> {
        task.validate()?;
        let created = self
            .api
            .create(&task)
            .await
            .inspect_err(|e| self.action_failed("create task", e))?;
        tracing::info!(task_id = %created.id, status = %created.status, "task created");
        // The create succeeded; a failed reload is already reported.
        let _ = self.refresh().await;
        Ok(created.id)
    }

    /// Changes the editable fields of a task, then reloads the board.
    ///
    /// The full record is sent with `status` and `order` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] if `id` is not on the board,
    /// [`BoardError::Invalid`] if the edit is invalid, or
    /// [`BoardError::Api`] if the update call fails.
    pub async fn edit_task(&self, id: TaskId, edit: &TaskEdit) -> Result<Task, BoardError> {
        let current = self.store.get(id).ok_or(BoardError::UnknownTask(id))?;
        if edit.is_empty() {
            return Ok(current);
        }
        let edited = current.apply_edit(edit)?;
        if edited == current {
            return Ok(current);
        }
        self.api
            .update(&edited)
            .await
            .inspect_err(|e| self.action_failed("update task", e))?;
        tracing::info!(task_id = %id, "task edited");
        let _ = self.refresh().await;
        Ok(edited)
    }

    /// Deletes a task, then reloads the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Api`] if the delete call fails.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), BoardError> {
        self.api
            .delete(id)
            .await
            .inspect_err(|e| self.action_failed("delete task", e))?;
        tracing::info!(task_id = %id, "task deleted");
        let _ = self.refresh().await;
        Ok(())
    }

    fn action_failed(&self, action: &'static str, error: &ApiError) {
        self.notifier.notify(Notice::ActionFailed {
            action,
            error: error.to_string(),
        });
    }
}

fn enter(task_id: TaskId, phase: GesturePhase) {
    tracing::debug!(task_id = %task_id, %phase, "gesture phase");
}

fn log_density(tasks: &[Task], target: Status, kind: MoveKind) {
    let source = match kind {
        MoveKind::SameColumn => None,
        MoveKind::CrossColumn { from } => Some(from),
    };
    tracing::debug!(
        column = %target,
        dense = is_dense(tasks, target),
        source = ?source,
        source_dense = source.map(|s| is_dense(tasks, s)),
        "reorder computed"
    );
}
