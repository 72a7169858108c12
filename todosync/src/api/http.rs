//! HTTP implementation of [`TodoApi`] on top of `reqwest`.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use todosync_proto::codec;
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};
use url::Url;

use super::{ApiError, TodoApi};

const JSON: &str = "application/json";

/// Client for a collection rooted at a base URL (e.g.
/// `http://127.0.0.1:9300` or `https://host/api`).
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTodoApi {
    /// Builds a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` does not parse or
    /// cannot carry a path, or [`ApiError::Transport`] if the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the base path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn todo_url(&self, id: TodoId) -> Result<Url, ApiError> {
        self.endpoint(&["todos", &id.to_string()])
    }
}

/// Reads a response body after checking its status.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}

impl TodoApi for HttpTodoApi {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        let mut url = self.endpoint(&["todos"])?;
        url.query_pairs_mut()
            .append_pair("userId", &user_id.to_string());
        tracing::debug!(%url, "GET todos");

        let response = self.client.get(url).header(ACCEPT, JSON).send().await?;
        let body = read_body(response).await?;
        Ok(codec::decode(&body)?)
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["todos"])?;
        tracing::debug!(%url, "POST todo");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(codec::encode(todo)?)
            .send()
            .await?;
        let body = read_body(response).await?;
        Ok(codec::decode(&body)?)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let url = self.todo_url(id)?;
        tracing::debug!(%url, "DELETE todo");

        let response = self.client.delete(url).send().await?;
        read_body(response).await?;
        Ok(())
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let url = self.todo_url(id)?;
        tracing::debug!(%url, "PATCH todo");

        let response = self
            .client
            .patch(url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(codec::encode(patch)?)
            .send()
            .await?;
        let body = read_body(response).await?;
        Ok(codec::decode(&body)?)
    }
}
