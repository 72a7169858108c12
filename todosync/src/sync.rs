//! Bridges the single-threaded session to the async collection client.
//!
//! The session never awaits. It hands out [`SyncRequest`]s, the
//! [`SyncDriver`] runs each one as its own tokio task, and the finished
//! [`SyncOutcome`]s come back over an mpsc channel that the UI loop drains:
//!
//! ```text
//! TodoSession (UI thread)  ─── SyncRequest ──→  SyncDriver tasks
//!                          ←── SyncOutcome ───
//! ```
//!
//! Outcomes carry the record id they concern, so the session can apply them
//! in whatever order they arrive.

use std::sync::Arc;

use tokio::sync::mpsc;
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};

use crate::api::{ApiError, TodoApi};

/// Identifies one sync operation (single or bulk) inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(u64);

impl OpId {
    /// Wraps a raw operation number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// A remote call the session wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncRequest {
    /// Fetch the user's whole collection.
    Load {
        /// Owner whose records to list.
        user_id: UserId,
    },
    /// Create a record.
    Create {
        /// Body of the create call.
        todo: NewTodo,
    },
    /// Delete a record on behalf of operation `op`.
    Delete {
        /// Operation this call belongs to.
        op: OpId,
        /// Record to delete.
        id: TodoId,
    },
    /// Update a record on behalf of operation `op`.
    Update {
        /// Operation this call belongs to.
        op: OpId,
        /// Record to update.
        id: TodoId,
        /// Full field set to store.
        patch: TodoPatch,
    },
}

/// A settled remote call.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Result of [`SyncRequest::Load`].
    Loaded(Result<Vec<Todo>, ApiError>),
    /// Result of [`SyncRequest::Create`].
    Created(Result<Todo, ApiError>),
    /// Result of [`SyncRequest::Delete`].
    Deleted {
        /// Operation the call belonged to.
        op: OpId,
        /// Record the call targeted.
        id: TodoId,
        /// Whether the delete succeeded.
        result: Result<(), ApiError>,
    },
    /// Result of [`SyncRequest::Update`].
    Updated {
        /// Operation the call belonged to.
        op: OpId,
        /// Record the call targeted.
        id: TodoId,
        /// The authoritative record on success.
        result: Result<Todo, ApiError>,
    },
}

/// Runs one request to completion against `api`.
pub async fn execute<A: TodoApi>(api: &A, request: SyncRequest) -> SyncOutcome {
    match request {
        SyncRequest::Load { user_id } => SyncOutcome::Loaded(api.list(user_id).await),
        SyncRequest::Create { todo } => SyncOutcome::Created(api.create(&todo).await),
        SyncRequest::Delete { op, id } => SyncOutcome::Deleted {
            op,
            id,
            result: api.delete(id).await,
        },
        SyncRequest::Update { op, id, patch } => SyncOutcome::Updated {
            op,
            id,
            result: api.update(id, &patch).await,
        },
    }
}

/// Default channel capacity for outcomes.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Spawns a task per request and funnels the outcomes into one channel.
pub struct SyncDriver<A> {
    api: Arc<A>,
    tx: mpsc::Sender<SyncOutcome>,
}

impl<A> Clone for SyncDriver<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            tx: self.tx.clone(),
        }
    }
}

impl<A: TodoApi + 'static> SyncDriver<A> {
    /// Creates a driver and the receiver its outcomes arrive on.
    #[must_use]
    pub fn new(api: A) -> (Self, mpsc::Receiver<SyncOutcome>) {
        Self::with_capacity(Arc::new(api), DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a driver over a shared client with a custom channel capacity.
    #[must_use]
    pub fn with_capacity(api: Arc<A>, capacity: usize) -> (Self, mpsc::Receiver<SyncOutcome>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { api, tx }, rx)
    }

    /// Issues `request` in the background.
    ///
    /// There is no cancellation: once dispatched the call runs to the end.
    /// If the receiver is gone by then the outcome is dropped.
    pub fn dispatch(&self, request: SyncRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = execute(api.as_ref(), request).await;
            if tx.send(outcome).await.is_err() {
                tracing::debug!("outcome dropped, session is gone");
            }
        });
    }

    /// Issues every request concurrently.
    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = SyncRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    /// The client requests run against.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }
}
