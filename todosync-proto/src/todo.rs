//! Task record and request body types for the `/todos` collection.
//!
//! Field names follow the remote collection's JSON shape: the owner is
//! serialized as `userId`, everything else uses its Rust name.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user that owns a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw user identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw user identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task record as stored by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique, immutable identifier.
    pub id: TodoId,
    /// Owner of the record, fixed at creation.
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// User-editable title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

/// Body of a `POST /todos` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Title of the new record (already trimmed by the caller).
    pub title: String,
    /// Always `false` for a freshly created record.
    pub completed: bool,
    /// Owner of the new record.
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

impl NewTodo {
    /// Builds a create body for an incomplete record.
    #[must_use]
    pub fn new(title: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into(),
            completed: false,
            user_id,
        }
    }
}

/// Body of a `PATCH /todos/{id}` request.
///
/// The collection expects the full mutable field set on every update, so
/// the patch is always derived from the record being changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// Title to store.
    pub title: String,
    /// Completion flag to store.
    pub completed: bool,
    /// Owner, carried over unchanged.
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

impl TodoPatch {
    /// Patch that flips the record's completion flag.
    #[must_use]
    pub fn toggled(todo: &Todo) -> Self {
        Self::completed(todo, !todo.completed)
    }

    /// Patch that sets the completion flag to `completed`.
    #[must_use]
    pub fn completed(todo: &Todo, completed: bool) -> Self {
        Self {
            title: todo.title.clone(),
            completed,
            user_id: todo.user_id,
        }
    }

    /// Patch that replaces the title and keeps everything else.
    #[must_use]
    pub fn retitled(todo: &Todo, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: todo.completed,
            user_id: todo.user_id,
        }
    }

    /// Applies this patch to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        todo.title.clone_from(&self.title);
        todo.completed = self.completed;
        todo.user_id = self.user_id;
    }
}
