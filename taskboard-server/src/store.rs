//! JSON-file backed task list.
//!
//! The [`TaskFile`] keeps the full task list in memory and rewrites the data
//! file after every mutation. A mutation builds the next list aside, writes
//! it to a sibling temp file, renames that over the data file, and only then
//! swaps it in. The write lock is held throughout, so a failed write leaves
//! both memory and disk at the previous list.

use std::path::{Path, PathBuf};

use taskboard_proto::codec::{self, CodecError};
use taskboard_proto::task::validate_title;
use taskboard_proto::{NewTask, Status, Task, TaskId, ValidationError};
use tokio::sync::RwLock;

/// Errors raised by the task file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the data file failed.
    #[error("failed to access data file {path}: {source}")]
    Io {
        /// Path of the data file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The data file does not hold a valid task list.
    #[error("corrupt data file: {0}")]
    Codec(#[from] CodecError),
    /// No task has the requested id.
    #[error("Task with ID {0} not found")]
    NotFound(TaskId),
    /// The request failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Tasks written to a fresh data file.
#[must_use]
pub fn seed_tasks() -> Vec<Task> {
    let mut research = Task::new(
        TaskId::new(1),
        "Research project requirements",
        Status::Todo,
        0,
    );
    research.description =
        "Gather all necessary information about the project scope and objectives".to_string();
    let mut wireframes = Task::new(TaskId::new(2), "Create wireframes", Status::InProgress, 0);
    wireframes.description = "Design basic wireframes for UI components".to_string();
    let mut setup = Task::new(
        TaskId::new(3),
        "Setup development environment",
        Status::Done,
        0,
    );
    setup.description = "Install all required tools and libraries".to_string();
    vec![research, wireframes, setup]
}

/// Persistent task list backed by a single JSON file.
pub struct TaskFile {
    path: PathBuf,
    tasks: RwLock<Vec<Task>>,
}

impl TaskFile {
    /// Opens the data file at `path`, seeding it with [`seed_tasks`] if it
    /// does not exist yet.
    ///
    /// Legacy records (string ids, column titles as status) are accepted and
    /// rewritten in canonical form on the next mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read or created, or
    /// [`StoreError::Codec`] if it does not hold a task list.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => codec::decode_tasks(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let tasks = seed_tasks();
                write_file(&path, &tasks).await?;
                tracing::info!(path = %path.display(), "seeded new data file");
                tasks
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        tracing::info!(path = %path.display(), count = tasks.len(), "loaded tasks");
        Ok(Self {
            path,
            tasks: RwLock::new(tasks),
        })
    }

    /// Path of the backing data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every task, in stored order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Creates a task, assigning the next id and, unless given, the next
    /// position at the end of its column.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for a bad title, or
    /// [`StoreError::Io`] if the data file cannot be written.
    pub async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        new.validate()?;
        let mut tasks = self.tasks.write().await;
        let id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TaskId::new(1), TaskId::next);
        let order = new.order.unwrap_or_else(|| next_order(&tasks, new.status));
        let task = new.into_task(id, order);
        let mut next = tasks.clone();
        next.push(task.clone());
        write_file(&self.path, &next).await?;
        *tasks = next;
        drop(tasks);
        tracing::info!(task_id = %task.id, status = %task.status, "task created");
        Ok(task)
    }

    /// Replaces the task with `id` by `task`, keeping the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has `id`,
    /// [`StoreError::Invalid`] for a bad title, or [`StoreError::Io`] if the
    /// data file cannot be written.
    pub async fn replace(&self, id: TaskId, mut task: Task) -> Result<Task, StoreError> {
        validate_title(&task.title)?;
        task.id = id;
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let mut next = tasks.clone();
        next[index] = task.clone();
        write_file(&self.path, &next).await?;
        *tasks = next;
        drop(tasks);
        tracing::info!(
            task_id = %id,
            status = %task.status,
            order = task.order,
            "task updated"
        );
        Ok(task)
    }

    /// Deletes the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has `id`, or
    /// [`StoreError::Io`] if the data file cannot be written.
    pub async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let next: Vec<Task> = tasks.iter().filter(|t| t.id != id).cloned().collect();
        if next.len() == tasks.len() {
            return Err(StoreError::NotFound(id));
        }
        write_file(&self.path, &next).await?;
        *tasks = next;
        drop(tasks);
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }
}

/// Position just past the last task in `status`'s column.
fn next_order(tasks: &[Task], status: Status) -> u32 {
    tasks
        .iter()
        .filter(|t| t.status == status)
        .map(|t| t.order.saturating_add(1))
        .max()
        .unwrap_or(0)
}

/// Sibling of `path` that a new list is written to before the rename.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the data file with `tasks`. Readers of `path` see either the old
/// list or the new one, never a partial write.
async fn write_file(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let json = codec::encode_tasks_pretty(tasks)?;
    let temp = temp_path(path);
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::write(&temp, json).await.map_err(io_err)?;
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
            tracing::warn!(path = %temp.display(), error = %cleanup, "temp data file left behind");
        }
        return Err(io_err(e));
    }
    Ok(())
}
