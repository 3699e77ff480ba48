//! HTTP mock tests for the REST task API client.
//!
//! Uses wiremock to check the requests `HttpTaskApi` sends and how it maps
//! responses, and to drive a `Board` rollback over real HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use serde_json::json;
use taskboard::api::{ApiError, HttpTaskApi, TaskApi};
use taskboard::board::{Board, DragEnd, DragOutcome};
use taskboard::notify::Notifier;
use taskboard_proto::{NewTask, Priority, Status, Task, TaskId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::new(&server.uri()).unwrap()
}

fn board_json() -> serde_json::Value {
    json!([
        {"id": 1, "title": "A", "description": "", "status": "todo", "order": 0,
         "priority": "medium"},
        {"id": 2, "title": "B", "description": "", "status": "todo", "order": 1,
         "priority": "medium"},
        {"id": 3, "title": "C", "description": "", "status": "done", "order": 0, "priority": "high"}
    ])
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_decodes_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(board_json()))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = api_for(&server).list().await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[2].status, Status::Done);
    assert_eq!(tasks[2].priority, Priority::High);
}

#[tokio::test]
async fn list_accepts_string_ids_and_column_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "7", "title": "Legacy", "status": "In Progress", "order": 0}
        ])))
        .mount(&server)
        .await;

    let tasks = api_for(&server).list().await.unwrap();
    assert_eq!(tasks[0].id, TaskId::new(7));
    assert_eq!(tasks[0].status, Status::InProgress);
    assert_eq!(tasks[0].priority, Priority::Medium);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn base_path_prefix_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpTaskApi::new(&format!("{}/api", server.uri())).unwrap();
    assert!(api.list().await.unwrap().is_empty());
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn update_puts_full_record() {
    let server = MockServer::start().await;
    let mut task = Task::new(TaskId::new(2), "B", Status::InProgress, 0);
    task.description = "moved".to_string();

    Mock::given(method("PUT"))
        .and(path("/tasks/2"))
        .and(body_json(json!({
            "id": 2,
            "title": "B",
            "description": "moved",
            "status": "inprogress",
            "order": 0,
            "priority": "medium"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&task))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).update(&task).await.unwrap();
}

#[tokio::test]
async fn create_posts_and_returns_stored_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "title": "New",
            "description": "",
            "status": "done",
            "priority": "low"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 4, "title": "New", "description": "", "status": "done",
            "order": 1, "priority": "low"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = api_for(&server)
        .create(&NewTask::new("New", Status::Done).with_priority(Priority::Low))
        .await
        .unwrap();
    assert_eq!(created.id, TaskId::new(4));
    assert_eq!(created.order, 1);
}

#[tokio::test]
async fn delete_hits_task_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Task 3 deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).delete(TaskId::new(3)).await.unwrap();
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not found",
            "message": "Task with ID 9 not found"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).delete(TaskId::new(9)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            code: 404,
            message: "Task with ID 9 not found".to_string(),
        }
    );
}

#[tokio::test]
async fn plain_text_error_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let task = Task::new(TaskId::new(1), "A", Status::Todo, 0);
    let err = api_for(&server).update(&task).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            code: 502,
            message: "Bad Gateway".to_string(),
        }
    );
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTaskApi::new(&format!("http://{addr}")).unwrap();
    assert!(matches!(api.list().await, Err(ApiError::Network(_))));
}

// =============================================================================
// Board over HTTP
// =============================================================================

#[tokio::test]
async fn server_error_on_move_rolls_back_from_fresh_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(board_json()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Internal server error",
            "message": "disk full"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (notifier, mut notices) = Notifier::channel(4);
    let board = Board::new(Arc::new(api_for(&server)), notifier);
    board.refresh().await.unwrap();

    let outcome = board
        .drag_end(DragEnd::onto(TaskId::new(1), TaskId::new(3)))
        .await;

    match outcome {
        DragOutcome::RolledBack { error, reloaded } => {
            assert!(reloaded);
            assert_eq!(
                error,
                ApiError::Status {
                    code: 500,
                    message: "disk full".to_string(),
                }
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        board.store().get(TaskId::new(1)).unwrap().status,
        Status::Todo
    );
    assert!(notices.try_recv().unwrap().to_string().contains("disk full"));
}
