//! Property-based tests for the reorder engine.
//!
//! Uses proptest to verify, for arbitrary boards and drags:
//! 1. Dropping a task onto itself or onto a missing task changes nothing.
//! 2. Every column the engine renumbers ends up dense (`0..n`).
//! 3. No task is created, dropped or duplicated.
//! 4. A cross-column move puts the task first in the target column.
//! 5. Tasks in columns the move did not touch are unchanged.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use taskboard::board::{DragEnd, MoveKind, column, compute_reorder, is_dense};
use taskboard_proto::{Status, Task, TaskId};

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

/// Boards of 1..16 tasks with ids `1..=n` and arbitrary, possibly sparse
/// or duplicated, orders.
fn arb_board() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((arb_status(), 0u32..12), 1..16).prop_map(|cells| {
        (1u64..)
            .zip(cells)
            .map(|(id, (status, order))| {
                Task::new(TaskId::new(id), format!("task {id}"), status, order)
            })
            .collect()
    })
}

/// A board plus two ids on it.
fn arb_drag() -> impl Strategy<Value = (Vec<Task>, TaskId, TaskId)> {
    arb_board().prop_flat_map(|tasks| {
        let n = tasks.len() as u64;
        (Just(tasks), 1..=n, 1..=n)
            .prop_map(|(tasks, a, b)| (tasks, TaskId::new(a), TaskId::new(b)))
    })
}

fn find(tasks: &[Task], id: TaskId) -> &Task {
    tasks.iter().find(|t| t.id == id).unwrap()
}

// --- Properties ---

proptest! {
    #[test]
    fn self_drop_is_noop((tasks, active, _) in arb_drag()) {
        prop_assert!(compute_reorder(&tasks, DragEnd::onto(active, active)).is_none());
        prop_assert!(compute_reorder(&tasks, DragEnd::nowhere(active)).is_none());
    }

    #[test]
    fn missing_target_is_noop((tasks, active, _) in arb_drag()) {
        let ghost = TaskId::new(tasks.len() as u64 + 1);
        prop_assert!(compute_reorder(&tasks, DragEnd::onto(active, ghost)).is_none());
        prop_assert!(compute_reorder(&tasks, DragEnd::onto(ghost, active)).is_none());
    }

    #[test]
    fn renumbered_columns_are_dense((tasks, active, over) in arb_drag()) {
        prop_assume!(active != over);
        let reorder = compute_reorder(&tasks, DragEnd::onto(active, over)).unwrap();
        let target = find(&tasks, over).status;
        prop_assert_eq!(reorder.moved.status, target);
        prop_assert!(is_dense(&reorder.tasks, target));
    }

    #[test]
    fn tasks_are_conserved((tasks, active, over) in arb_drag()) {
        prop_assume!(active != over);
        let reorder = compute_reorder(&tasks, DragEnd::onto(active, over)).unwrap();
        prop_assert_eq!(reorder.tasks.len(), tasks.len());
        for (before, after) in tasks.iter().zip(&reorder.tasks) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(&before.title, &after.title);
        }
    }

    #[test]
    fn cross_column_move_lands_first((tasks, active, over) in arb_drag()) {
        let source = find(&tasks, active).status;
        let target = find(&tasks, over).status;
        prop_assume!(source != target);
        let reorder = compute_reorder(&tasks, DragEnd::onto(active, over)).unwrap();

        prop_assert_eq!(reorder.kind, MoveKind::CrossColumn { from: source });
        prop_assert_eq!(column(&reorder.tasks, target)[0].id, active);
        prop_assert_eq!(reorder.moved.order, 0);
    }

    #[test]
    fn same_column_move_takes_target_slot((tasks, active, over) in arb_drag()) {
        prop_assume!(active != over);
        let status = find(&tasks, active).status;
        prop_assume!(status == find(&tasks, over).status);
        let slot = column(&tasks, status).iter().position(|t| t.id == over).unwrap();

        let reorder = compute_reorder(&tasks, DragEnd::onto(active, over)).unwrap();
        let after = column(&reorder.tasks, status);
        prop_assert_eq!(after[slot].id, active);
        prop_assert_eq!(reorder.kind, MoveKind::SameColumn);
    }

    #[test]
    fn untouched_tasks_keep_their_fields((tasks, active, over) in arb_drag()) {
        prop_assume!(active != over);
        let target = find(&tasks, over).status;
        let reorder = compute_reorder(&tasks, DragEnd::onto(active, over)).unwrap();

        // Includes the source column of a cross-column move, gap and all.
        for (before, after) in tasks.iter().zip(&reorder.tasks) {
            if before.status != target && before.id != active {
                prop_assert_eq!(before, after);
            }
        }
    }
}
