//! In-process task API.
//!
//! Mirrors the REST task API's semantics (id = max + 1, append to the end of
//! the target column, full-record replace on update) without any network.
//! Failures and latency can be injected so the board's rollback path can be
//! exercised deterministically.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use taskboard_proto::{NewTask, Status, Task, TaskId};

use super::{ApiError, TaskApi};

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    list_failures: usize,
    update_failures: usize,
    update_latencies: VecDeque<Duration>,
    updates: Vec<Task>,
    list_calls: usize,
}

/// [`TaskApi`] backed by a `Vec` in memory.
#[derive(Debug, Default)]
pub struct MemoryTaskApi {
    state: Mutex<MemoryState>,
}

impl MemoryTaskApi {
    /// Creates an API holding `tasks`.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                ..MemoryState::default()
            }),
        }
    }

    /// Creates an API holding a small demo board.
    #[must_use]
    pub fn demo() -> Self {
        let titles = [
            ("Research project requirements", Status::Todo),
            ("Draft task model", Status::Todo),
            ("Create wireframes", Status::InProgress),
            ("Setup development environment", Status::Done),
        ];
        let mut tasks: Vec<Task> = Vec::with_capacity(titles.len());
        for (n, (title, status)) in (1u64..).zip(titles) {
            let order = next_order(&tasks, status);
            tasks.push(Task::new(TaskId::new(n), title, status, order));
        }
        Self::new(tasks)
    }

    /// Makes the next `count` calls to `list` fail.
    pub fn fail_next_lists(&self, count: usize) {
        self.state.lock().list_failures = count;
    }

    /// Makes the next `count` calls to `update` fail without applying.
    pub fn fail_next_updates(&self, count: usize) {
        self.state.lock().update_failures = count;
    }

    /// Delays the next `update` calls, one queued latency per call.
    pub fn delay_next_updates(&self, latencies: impl IntoIterator<Item = Duration>) {
        self.state.lock().update_latencies.extend(latencies);
    }

    /// Current server-side tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Replaces the server-side tasks, e.g. to simulate another client.
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.state.lock().tasks = tasks;
    }

    /// Every record passed to `update`, including failed ones, in call order.
    #[must_use]
    pub fn updates(&self) -> Vec<Task> {
        self.state.lock().updates.clone()
    }

    /// Number of `list` calls so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }
}

fn next_order(tasks: &[Task], status: Status) -> u32 {
    tasks
        .iter()
        .filter(|t| t.status == status)
        .map(|t| t.order.saturating_add(1))
        .max()
        .unwrap_or(0)
}

fn unavailable(op: &str) -> ApiError {
    ApiError::Network(format!("{op}: service unavailable"))
}

fn not_found(id: TaskId) -> ApiError {
    ApiError::Status {
        code: 404,
        message: format!("Task with ID {id} not found"),
    }
}

#[async_trait]
impl TaskApi for MemoryTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        if state.list_failures > 0 {
            state.list_failures -= 1;
            return Err(unavailable("list"));
        }
        Ok(state.tasks.clone())
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        if task.title.trim().is_empty() {
            return Err(ApiError::Status {
                code: 400,
                message: "Title is required".to_string(),
            });
        }
        let mut state = self.state.lock();
        let id = state
            .tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TaskId::new(1), TaskId::next);
        let order = task
            .order
            .unwrap_or_else(|| next_order(&state.tasks, task.status));
        let created = task.clone().into_task(id, order);
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, task: &Task) -> Result<(), ApiError> {
        let latency = self.state.lock().update_latencies.pop_front();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state.lock();
        state.updates.push(task.clone());
        if state.update_failures > 0 {
            state.update_failures -= 1;
            return Err(unavailable("update"));
        }
        let slot = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| not_found(task.id))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
