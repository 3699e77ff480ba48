//! Column views over an unsorted task collection.
//!
//! The store keeps tasks in arrival order. Display order within a column
//! is ascending `order`, with ties broken by arrival order.

use taskboard_proto::{Status, Task};

/// Indices into `tasks` of the tasks in `status`'s column, in display order.
pub(crate) fn column_indices(tasks: &[Task], status: Status) -> Vec<usize> {
    let mut indices: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status == status)
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| (tasks[i].order, i));
    indices
}

/// Tasks in `status`'s column, in display order.
#[must_use]
pub fn column(tasks: &[Task], status: Status) -> Vec<&Task> {
    column_indices(tasks, status)
        .into_iter()
        .map(|i| &tasks[i])
        .collect()
}

/// All three columns in display order.
#[must_use]
pub fn columns(tasks: &[Task]) -> [(Status, Vec<&Task>); 3] {
    Status::ALL.map(|status| (status, column(tasks, status)))
}

/// Returns `true` if `status`'s column is numbered exactly `0..n`.
#[must_use]
pub fn is_dense(tasks: &[Task], status: Status) -> bool {
    column(tasks, status)
        .iter()
        .zip(0u32..)
        .all(|(task, expected)| task.order == expected)
}
