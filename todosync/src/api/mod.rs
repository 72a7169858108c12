//! Remote collection client abstraction.
//!
//! Defines the [`TodoApi`] trait the sync layer calls. Implementations:
//! - [`http::HttpTodoApi`] — talks to the real collection over HTTP
//! - [`memory::InMemoryApi`] — in-process collection with fault injection
//!   for tests

pub mod http;
pub mod memory;

use todosync_proto::codec::CodecError;
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};

/// Errors a remote call can end with.
///
/// The sync layer treats every variant the same way; the distinction only
/// matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The base URL cannot carry path segments.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collection answered with a non-success status.
    #[error("collection returned status {0}")]
    Status(u16),

    /// A body could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Async client for the `/todos` collection.
///
/// Each method is one round-trip. Implementations must not retry; the sync
/// layer reports the first failure as-is.
pub trait TodoApi: Send + Sync {
    /// `GET /todos?userId={user_id}`.
    fn list(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Todo>, ApiError>> + Send;

    /// `POST /todos`.
    fn create(
        &self,
        todo: &NewTodo,
    ) -> impl std::future::Future<Output = Result<Todo, ApiError>> + Send;

    /// `DELETE /todos/{id}`. The response body is ignored.
    fn delete(&self, id: TodoId)
    -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// `PATCH /todos/{id}`.
    fn update(
        &self,
        id: TodoId,
        patch: &TodoPatch,
    ) -> impl std::future::Future<Output = Result<Todo, ApiError>> + Send;
}
