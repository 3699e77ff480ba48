//! Wire types shared by the `TaskBoard` client and the task API server.

pub mod codec;
pub mod task;

pub use task::{NewTask, Priority, Status, Task, TaskEdit, TaskId, ValidationError};
