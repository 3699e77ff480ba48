//! Local copy of the task collection.
//!
//! [`TaskStore`] is the one shared, mutable view of the board's tasks. It
//! changes in exactly two ways: [`TaskStore::load`] replaces everything with
//! a fresh fetch, and [`TaskStore::apply`] or [`TaskStore::reorder`] replace
//! everything with a collection computed locally. Readers get snapshots and
//! can watch a revision counter to learn when to re-read.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use taskboard_proto::{Task, TaskId};
use tokio::sync::watch;

use super::reorder::{DragEnd, Reorder, compute_reorder};
use crate::api::{ApiError, TaskApi};

/// Whether the store holds a usable collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// A fetch is in flight (also the state before the first fetch).
    Loading,
    /// The collection reflects the last successful fetch plus local moves.
    Ready,
    /// The last fetch failed; the view shows this instead of the board.
    Failed(String),
}

#[derive(Debug)]
struct StoreInner {
    tasks: Vec<Task>,
    load_state: LoadState,
}

/// Shared handle to the local task collection. Clones share state.
#[derive(Debug, Clone)]
pub struct TaskStore {
    inner: Arc<RwLock<StoreInner>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store in the [`LoadState::Loading`] state.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                tasks: Vec::new(),
                load_state: LoadState::Loading,
            })),
            revision: Arc::new(revision),
        }
    }

    /// Fetches the full collection from `api` and replaces the local one.
    ///
    /// Any local state is superseded, including optimistic moves that have
    /// not been confirmed. On failure the previous collection is kept but
    /// the store reports [`LoadState::Failed`].
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the fetch.
    pub async fn load(&self, api: &dyn TaskApi) -> Result<(), ApiError> {
        self.inner.write().load_state = LoadState::Loading;
        self.bump();

        let result = api.list().await;
        let mut inner = self.inner.write();
        let outcome = match result {
            Ok(tasks) => {
                inner.tasks = ingest(tasks);
                inner.load_state = LoadState::Ready;
                tracing::debug!(count = inner.tasks.len(), "task list loaded");
                Ok(())
            }
            Err(e) => {
                inner.load_state = LoadState::Failed(e.to_string());
                tracing::warn!(error = %e, "task list load failed");
                Err(e)
            }
        };
        drop(inner);
        self.bump();
        outcome
    }

    /// Replaces the collection with `tasks` without contacting the API.
    pub fn apply(&self, tasks: Vec<Task>) {
        self.inner.write().tasks = tasks;
        self.bump();
    }

    /// Computes `drag` against the current collection and applies the
    /// result, under one write lock.
    ///
    /// Concurrent callers each see the collection left by the one before,
    /// so no move is computed from a stale copy and then lost on apply.
    /// Returns `None`, changing nothing, if the drag is a no-op.
    pub fn reorder(&self, drag: DragEnd) -> Option<Reorder> {
        let mut inner = self.inner.write();
        let reorder = compute_reorder(&inner.tasks, drag)?;
        inner.tasks.clone_from(&reorder.tasks);
        drop(inner);
        self.bump();
        Some(reorder)
    }

    /// A copy of the current collection, in arrival order (not sorted).
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.inner.read().tasks.clone()
    }

    /// The task with `id`, if present.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.inner.read().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Number of tasks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().tasks.len()
    }

    /// Returns `true` if no tasks are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().tasks.is_empty()
    }

    /// Current load state.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.inner.read().load_state.clone()
    }

    /// Watches the revision counter, bumped on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

/// Drops repeated ids so every task sits in exactly one column.
fn ingest(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id);
            if !fresh {
                tracing::warn!(task_id = %t.id, "dropping duplicate task id from fetch");
            }
            fresh
        })
        .collect()
}
