//! User-visible notices.
//!
//! Failures the user should hear about (a move that could not be saved, a
//! board that could not be loaded) are pushed onto a bounded channel. The
//! view drains it whenever it likes; sending never blocks the board.

use std::fmt;

use taskboard_proto::TaskId;
use tokio::sync::mpsc;

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Persisting a drag-and-drop move failed; the board is being reloaded.
    PersistFailed {
        /// The task that was moved.
        task_id: TaskId,
        /// Underlying error text.
        error: String,
    },
    /// Fetching the task list failed.
    LoadFailed {
        /// Underlying error text.
        error: String,
    },
    /// A create, edit or delete request failed.
    ActionFailed {
        /// What was attempted, e.g. `"create task"`.
        action: &'static str,
        /// Underlying error text.
        error: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersistFailed { task_id, error } => {
                write!(f, "Failed to update task {task_id}. Reverting. ({error})")
            }
            Self::LoadFailed { error } => {
                write!(f, "Failed to load tasks. Please try again later. ({error})")
            }
            Self::ActionFailed { action, error } => write!(f, "Failed to {action}. ({error})"),
        }
    }
}

/// Sending half of the notice channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Notice>>,
}

impl Notifier {
    /// Creates a notifier and the receiver the view drains.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that only logs.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// Logs `notice` and queues it for the view without waiting.
    ///
    /// A full queue drops the notice; a closed one is ignored.
    pub fn notify(&self, notice: Notice) {
        tracing::warn!(notice = %notice, "user notice");
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(notice) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                tracing::warn!(notice = %dropped, "notice queue full, dropping notice");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("notice receiver closed");
            }
        }
    }
}
