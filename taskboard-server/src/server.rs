//! HTTP routes for the task API.
//!
//! Exposes the task list over REST:
//!
//! | Method   | Path          | Body        | Response                 |
//! |----------|---------------|-------------|--------------------------|
//! | `GET`    | `/`           |             | health message           |
//! | `GET`    | `/tasks`      |             | full task list           |
//! | `POST`   | `/tasks`      | `NewTask`   | `201` + created task     |
//! | `PUT`    | `/tasks/{id}` | task record | stored task              |
//! | `DELETE` | `/tasks/{id}` |             | confirmation message     |
//!
//! Failures are reported as an [`ErrorBody`] JSON document.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use taskboard_proto::codec::{ErrorBody, MessageBody};
use taskboard_proto::{NewTask, Task, TaskId};

use crate::store::{StoreError, TaskFile};

/// Shared server state.
pub type AppState = Arc<TaskFile>;

/// Error response: status code plus an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::new("Bad request", message),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody::new("Not found", message),
        }
    }
}

impl From<StoreError> for ApiFailure {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::not_found(e.to_string()),
            StoreError::Invalid(_) => Self::bad_request(e.to_string()),
            StoreError::Io { .. } | StoreError::Codec(_) => {
                tracing::error!(error = %e, "task storage failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: ErrorBody::new("Internal error", e.to_string()),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Builds the task API router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", axum::routing::put(update_task).delete(delete_task))
        .with_state(state)
}

/// Starts the task API server on `addr`.
///
/// Returns the bound address (useful when binding port 0) and the
/// [`tokio::task::JoinHandle`] of the serving task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    state: AppState,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task api server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn index() -> Json<MessageBody> {
    Json(MessageBody {
        message: "TaskBoard API is running!".to_string(),
    })
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.list().await)
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiFailure> {
    let Json(new) = body?;
    if new.title.trim().is_empty() {
        return Err(ApiFailure::bad_request("Title is required"));
    }
    let task = state.create(new).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Task>, ApiFailure> {
    let id = parse_path_id(&raw_id)?;
    let Json(mut value) = body?;
    let Some(fields) = value.as_object_mut() else {
        return Err(ApiFailure::bad_request("No data provided"));
    };
    // The path id is authoritative; the body may omit or disagree with it.
    fields.insert("id".to_string(), serde_json::Value::from(id.get()));
    let task: Task =
        serde_json::from_value(value).map_err(|e| ApiFailure::bad_request(e.to_string()))?;
    Ok(Json(state.replace(id, task).await?))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiFailure> {
    let id = parse_path_id(&raw_id)?;
    state.delete(id).await?;
    Ok(Json(MessageBody {
        message: format!("Task {id} deleted successfully"),
    }))
}

/// Ids that are not integers name no task.
fn parse_path_id(raw: &str) -> Result<TaskId, ApiFailure> {
    raw.parse::<TaskId>()
        .map_err(|_| ApiFailure::not_found(format!("Task with ID {raw} not found")))
}
