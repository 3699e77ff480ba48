//! Integration tests for the drag-and-drop reorder engine.
//!
//! Exercises `compute_reorder` through the public API on realistic boards:
//! the scenarios from the board's user guide, repeated gestures, and
//! boards whose ids arrived as strings.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskboard::board::{DragEnd, MoveKind, column, columns, compute_reorder, is_dense};
use taskboard_proto::codec::decode_tasks;
use taskboard_proto::{Status, Task, TaskId};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_task(id: u64, title: &str, status: Status, order: u32) -> Task {
    Task::new(TaskId::new(id), title, status, order)
}

fn titles(tasks: &[Task], status: Status) -> Vec<String> {
    column(tasks, status)
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn orders(tasks: &[Task], status: Status) -> Vec<u32> {
    column(tasks, status).iter().map(|t| t.order).collect()
}

fn drag(tasks: &[Task], active: u64, over: u64) -> Vec<Task> {
    compute_reorder(tasks, DragEnd::onto(TaskId::new(active), TaskId::new(over)))
        .expect("drag should change the board")
        .tasks
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn dragging_first_onto_last_in_same_column() {
    let tasks = vec![
        make_task(1, "A", Status::Todo, 0),
        make_task(2, "B", Status::Todo, 1),
        make_task(3, "C", Status::Todo, 2),
    ];
    let after = drag(&tasks, 1, 3);
    assert_eq!(titles(&after, Status::Todo), vec!["B", "C", "A"]);
    assert_eq!(orders(&after, Status::Todo), vec![0, 1, 2]);
}

#[test]
fn dragging_into_another_column_lands_at_front() {
    let tasks = vec![
        make_task(1, "A", Status::Todo, 0),
        make_task(2, "X", Status::InProgress, 0),
        make_task(3, "Y", Status::InProgress, 1),
    ];
    let reorder =
        compute_reorder(&tasks, DragEnd::onto(TaskId::new(1), TaskId::new(2))).unwrap();

    assert_eq!(reorder.moved.status, Status::InProgress);
    assert_eq!(reorder.moved.order, 0);
    assert_eq!(reorder.kind, MoveKind::CrossColumn { from: Status::Todo });
    for t in column(&reorder.tasks, Status::InProgress).iter().skip(1) {
        assert!(t.order >= 1);
    }
    assert!(column(&reorder.tasks, Status::Todo).is_empty());
}

#[test]
fn dropping_on_deleted_task_changes_nothing() {
    let tasks = vec![
        make_task(1, "A", Status::Todo, 0),
        make_task(2, "B", Status::Done, 0),
    ];
    assert!(compute_reorder(&tasks, DragEnd::onto(TaskId::new(1), TaskId::new(3))).is_none());
}

#[test]
fn repeated_moves_keep_every_task_once() {
    let mut tasks = vec![
        make_task(1, "A", Status::Todo, 0),
        make_task(2, "B", Status::Todo, 1),
        make_task(3, "C", Status::InProgress, 0),
        make_task(4, "D", Status::Done, 0),
        make_task(5, "E", Status::Done, 1),
    ];
    let gestures = [(1, 3), (5, 1), (2, 4), (3, 2), (4, 5)];
    for (active, over) in gestures {
        tasks = drag(&tasks, active, over);
    }

    let mut ids: Vec<u64> = tasks.iter().map(|t| t.id.get()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    let shown: usize = columns(&tasks).iter().map(|(_, c)| c.len()).sum();
    assert_eq!(shown, 5);
}

#[test]
fn source_gap_closes_on_next_reorder_in_that_column() {
    let tasks = vec![
        make_task(1, "A", Status::Todo, 0),
        make_task(2, "B", Status::Todo, 1),
        make_task(3, "C", Status::Todo, 2),
        make_task(4, "D", Status::Done, 0),
    ];
    let after = drag(&tasks, 2, 4);
    assert_eq!(orders(&after, Status::Todo), vec![0, 2]);

    let after = drag(&after, 3, 1);
    assert_eq!(titles(&after, Status::Todo), vec!["C", "A"]);
    assert!(is_dense(&after, Status::Todo));
}

#[test]
fn string_ids_from_the_wire_resolve() {
    let json = r#"[
        {"id": "1", "title": "A", "status": "todo", "order": 0},
        {"id": 2, "title": "B", "status": "To Do", "order": 1},
        {"id": "3", "title": "C", "status": "Done", "order": 0}
    ]"#;
    let tasks = decode_tasks(json).unwrap();

    let after = drag(&tasks, 2, 1);
    assert_eq!(titles(&after, Status::Todo), vec!["B", "A"]);

    let after = drag(&after, 1, 3);
    assert_eq!(titles(&after, Status::Done), vec!["A", "C"]);
}
