//! HTTP client for the REST task API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use taskboard_proto::codec::ErrorBody;
use taskboard_proto::{NewTask, Task, TaskId};
use url::Url;

use super::{ApiError, TaskApi};

/// [`TaskApi`] over HTTP.
///
/// Requests carry no timeout and are never retried: a slow call simply
/// resolves late, and recovery from failures is the board's job.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
}

impl HttpTaskApi {
    /// Creates a client for the task API rooted at `base_url`.
    ///
    /// A trailing slash is added when missing so that a base URL with a
    /// path prefix (`http://host/api`) keeps that prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse or
    /// cannot serve as a base.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn tasks_url(&self) -> Result<Url, ApiError> {
        self.base_url
            .join("tasks")
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn task_url(&self, id: TaskId) -> Result<Url, ApiError> {
        self.base_url
            .join(&format!("tasks/{id}"))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }
}

/// Passes 2xx responses through and turns everything else into
/// [`ApiError::Status`], preferring the server's `message` field.
async fn check_status(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);
    Err(ApiError::Status {
        code: status.as_u16(),
        message,
    })
}

fn network_error(e: &reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.tasks_url()?;
        tracing::debug!(%url, "fetching tasks");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        check_status(res)
            .await?
            .json::<Vec<Task>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        let url = self.tasks_url()?;
        tracing::debug!(%url, status = %task.status, "creating task");
        let res = self
            .client
            .post(url)
            .json(task)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        check_status(res)
            .await?
            .json::<Task>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update(&self, task: &Task) -> Result<(), ApiError> {
        let url = self.task_url(task.id)?;
        tracing::debug!(%url, status = %task.status, order = task.order, "updating task");
        let res = self
            .client
            .put(url)
            .json(task)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        check_status(res).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let url = self.task_url(id)?;
        tracing::debug!(%url, "deleting task");
        let res = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        check_status(res).await?;
        Ok(())
    }
}
