//! End-to-end tests: the board client against a live task API server.
//!
//! Each test starts `taskboard-server` on an ephemeral port with its data
//! file in a temporary directory, then drives a `Board` over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use taskboard::api::HttpTaskApi;
use taskboard::board::{Board, BoardError, DragEnd, DragOutcome, column, is_dense};
use taskboard::notify::Notifier;
use taskboard_proto::{NewTask, Priority, Status, TaskEdit, TaskId};
use taskboard_server::server::start_server;
use taskboard_server::store::TaskFile;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a server over a fresh, seeded data file and a board bound to it.
async fn start() -> (Board, Arc<TaskFile>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let file = Arc::new(TaskFile::open(dir.path().join("tasks.json")).await.unwrap());
    let (addr, _handle) = start_server("127.0.0.1:0", file.clone()).await.unwrap();

    let api = HttpTaskApi::new(&format!("http://{addr}")).unwrap();
    let board = Board::new(Arc::new(api), Notifier::disabled());
    board.refresh().await.unwrap();
    (board, file, dir)
}

fn titles(board: &Board, status: Status) -> Vec<String> {
    column(&board.store().snapshot(), status)
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_board_has_one_task_per_column() {
    let (board, _file, _dir) = start().await;
    for status in Status::ALL {
        assert_eq!(column(&board.store().snapshot(), status).len(), 1);
    }
}

#[tokio::test]
async fn added_tasks_append_and_reorder_persists() {
    let (board, file, _dir) = start().await;
    let b = board
        .add_task(NewTask::new("B", Status::Todo))
        .await
        .unwrap();
    let c = board
        .add_task(NewTask::new("C", Status::Todo).with_priority(Priority::High))
        .await
        .unwrap();
    assert_eq!(b, TaskId::new(4));
    assert_eq!(c, TaskId::new(5));
    assert_eq!(
        titles(&board, Status::Todo),
        vec!["Research project requirements", "B", "C"]
    );

    let outcome = board.drag_end(DragEnd::onto(TaskId::new(1), c)).await;
    assert!(matches!(outcome, DragOutcome::Persisted { .. }));

    // Only the moved task was sent; its stored order is the computed one.
    let stored = file.list().await;
    let moved = stored.iter().find(|t| t.id == TaskId::new(1)).unwrap();
    assert_eq!(moved.order, 2);

    assert_eq!(
        titles(&board, Status::Todo),
        vec!["B", "C", "Research project requirements"]
    );
    let sibling = stored.iter().find(|t| t.id == c).unwrap();
    assert_eq!(sibling.order, 2);
}

#[tokio::test]
async fn cross_column_move_survives_reload() {
    let (board, file, dir) = start().await;
    board
        .drag_end(DragEnd::onto(TaskId::new(1), TaskId::new(2)))
        .await;

    let reopened = TaskFile::open(dir.path().join("tasks.json")).await.unwrap();
    let stored = reopened.list().await;
    let moved = stored.iter().find(|t| t.id == TaskId::new(1)).unwrap();
    assert_eq!(moved.status, Status::InProgress);
    assert_eq!(moved.order, 0);
    assert_eq!(file.list().await, stored);

    board.refresh().await.unwrap();
    assert!(column(&board.store().snapshot(), Status::Todo).is_empty());
    assert_eq!(column(&board.store().snapshot(), Status::InProgress).len(), 2);
}

#[tokio::test]
async fn move_of_task_deleted_elsewhere_rolls_back() {
    let (board, file, _dir) = start().await;
    // Another client deletes task 1 after this board loaded.
    file.delete(TaskId::new(1)).await.unwrap();

    let outcome = board
        .drag_end(DragEnd::onto(TaskId::new(1), TaskId::new(3)))
        .await;
    assert!(matches!(
        outcome,
        DragOutcome::RolledBack { reloaded: true, .. }
    ));
    assert!(board.store().get(TaskId::new(1)).is_none());
    assert_eq!(board.store().len(), 2);
}

#[tokio::test]
async fn edit_and_delete_round_trip() {
    let (board, _file, _dir) = start().await;
    let edit = TaskEdit {
        title: Some("Wireframes v2".to_string()),
        priority: Some(Priority::Low),
        ..TaskEdit::default()
    };
    board.edit_task(TaskId::new(2), &edit).await.unwrap();
    let edited = board.store().get(TaskId::new(2)).unwrap();
    assert_eq!(edited.title, "Wireframes v2");
    assert_eq!(edited.priority, Priority::Low);
    assert_eq!(edited.status, Status::InProgress);

    board.delete_task(TaskId::new(2)).await.unwrap();
    assert!(board.store().get(TaskId::new(2)).is_none());

    let err = board.delete_task(TaskId::new(2)).await.unwrap_err();
    assert!(matches!(err, BoardError::Api(_)));
}

#[tokio::test]
async fn reload_shows_only_persisted_orders() {
    let (board, _file, _dir) = start().await;
    board
        .add_task(NewTask::new("B", Status::Todo))
        .await
        .unwrap();

    // B lands in front of the done task locally, but only B's record is
    // stored, so both done tasks sit at order 0 on the server.
    board
        .drag_end(DragEnd::onto(TaskId::new(4), TaskId::new(3)))
        .await;
    assert_eq!(
        titles(&board, Status::Done),
        vec!["B", "Setup development environment"]
    );

    // Equal orders render in arrival order after a reload.
    board.refresh().await.unwrap();
    assert_eq!(
        titles(&board, Status::Done),
        vec!["Setup development environment", "B"]
    );
    assert!(!is_dense(&board.store().snapshot(), Status::Done));
}
