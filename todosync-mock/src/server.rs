//! HTTP surface of the mock collection.
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/todos?userId={id}` | | array of records |
//! | POST | `/todos` | `{title, completed, userId}` | created record (201) |
//! | PATCH | `/todos/{id}` | `{title, completed, userId}` | updated record |
//! | DELETE | `/todos/{id}` | | `{}` |
//!
//! Injected faults answer 500, unknown ids 404.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};

use crate::store::{CollectionError, TodoCollection};

/// Shared server state.
#[derive(Debug, Default)]
pub struct MockState {
    /// The records being served.
    pub collection: TodoCollection,
    /// Delay added before every response, to make in-flight states visible.
    latency: Duration,
}

impl MockState {
    /// State over `collection` with no added latency.
    #[must_use]
    pub const fn new(collection: TodoCollection) -> Self {
        Self {
            collection,
            latency: Duration::ZERO,
        }
    }

    /// Adds `latency` before every response.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl IntoResponse for CollectionError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Injected => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, serde::Deserialize)]
struct ListQuery {
    #[serde(rename = "userId")]
    user_id: UserId,
}

/// Builds the router over `state`.
pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(state)
}

/// Starts a server over an empty collection.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(MockState::default())).await
}

/// Starts a server over pre-built state.
///
/// Bind to `127.0.0.1:0` for an OS-assigned port; the bound address is
/// returned along with the serving task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<MockState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "mock server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn list_todos(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, CollectionError> {
    state.delay().await;
    let todos = state.collection.list(query.user_id).await.inspect_err(|e| {
        tracing::warn!(user_id = %query.user_id, error = %e, "list refused");
    })?;
    tracing::info!(user_id = %query.user_id, count = todos.len(), "list");
    Ok(Json(todos))
}

async fn create_todo(
    State(state): State<Arc<MockState>>,
    Json(body): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), CollectionError> {
    state.delay().await;
    let todo = state.collection.create(body).await.inspect_err(|e| {
        tracing::warn!(error = %e, "create refused");
    })?;
    tracing::info!(todo_id = %todo.id, "created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<TodoPatch>,
) -> Result<Json<Todo>, CollectionError> {
    state.delay().await;
    let id = TodoId::new(id);
    let todo = state.collection.update(id, &body).await.inspect_err(|e| {
        tracing::warn!(todo_id = %id, error = %e, "update refused");
    })?;
    tracing::info!(todo_id = %id, completed = todo.completed, "updated");
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, CollectionError> {
    state.delay().await;
    let id = TodoId::new(id);
    state.collection.delete(id).await.inspect_err(|e| {
        tracing::warn!(todo_id = %id, error = %e, "delete refused");
    })?;
    tracing::info!(todo_id = %id, "deleted");
    Ok(Json(serde_json::json!({})))
}
