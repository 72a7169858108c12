//! The collection behind the mock server.
//!
//! [`TodoCollection`] keeps every user's records in one ordered list and
//! assigns ids from a shared counter. Faults can be injected per record id
//! or per operation; an injected fault fails the call without touching the
//! stored records.

use std::collections::HashSet;

use tokio::sync::RwLock;
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};

/// Why a collection call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// No record with the requested id.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The call was set up to fail.
    #[error("injected failure")]
    Injected,
}

/// Calls that can be made to fail.
#[derive(Debug, Default)]
struct Faults {
    ids: HashSet<TodoId>,
    list: bool,
    create: bool,
}

#[derive(Debug, Default)]
struct Records {
    todos: Vec<Todo>,
    next_id: u64,
}

/// Thread-safe in-memory collection.
#[derive(Debug)]
pub struct TodoCollection {
    records: RwLock<Records>,
    faults: RwLock<Faults>,
}

impl Default for TodoCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoCollection {
    /// Creates an empty collection; the first record gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Creates a collection seeded with `todos`, in order.
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            records: RwLock::new(Records { todos, next_id }),
            faults: RwLock::new(Faults::default()),
        }
    }

    /// Seeds a handful of records for `user_id`.
    #[must_use]
    pub fn with_sample(user_id: UserId) -> Self {
        let titles = [
            ("Read the sync design notes", true),
            ("Wire up the toggle-all control", false),
            ("Try clearing completed todos", false),
        ];
        let todos = titles
            .iter()
            .zip(1..)
            .map(|((title, completed), id)| Todo {
                id: TodoId::new(id),
                user_id,
                title: (*title).to_string(),
                completed: *completed,
            })
            .collect();
        Self::with_todos(todos)
    }

    /// Records owned by `user_id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Injected`] if listing is set to fail.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, CollectionError> {
        if self.faults.read().await.list {
            return Err(CollectionError::Injected);
        }
        let records = self.records.read().await;
        Ok(records
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Appends a record with the next id.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Injected`] if creates are set to fail.
    pub async fn create(&self, body: NewTodo) -> Result<Todo, CollectionError> {
        if self.faults.read().await.create {
            return Err(CollectionError::Injected);
        }
        let mut records = self.records.write().await;
        let todo = Todo {
            id: TodoId::new(records.next_id),
            user_id: body.user_id,
            title: body.title,
            completed: body.completed,
        };
        records.next_id += 1;
        records.todos.push(todo.clone());
        drop(records);
        Ok(todo)
    }

    /// Overwrites a record's mutable fields, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Injected`] for a failing id, or
    /// [`CollectionError::NotFound`] for an unknown one.
    pub async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo, CollectionError> {
        self.check_id(id).await?;
        let mut records = self.records.write().await;
        let todo = records
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        patch.apply_to(todo);
        Ok(todo.clone())
    }

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Injected`] for a failing id, or
    /// [`CollectionError::NotFound`] for an unknown one.
    pub async fn delete(&self, id: TodoId) -> Result<(), CollectionError> {
        self.check_id(id).await?;
        let mut records = self.records.write().await;
        let index = records
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        records.todos.remove(index);
        Ok(())
    }

    /// Makes every update and delete of `id` fail.
    pub async fn fail_id(&self, id: TodoId) {
        self.faults.write().await.ids.insert(id);
    }

    /// Makes list calls fail (or succeed again).
    pub async fn fail_list(&self, fail: bool) {
        self.faults.write().await.list = fail;
    }

    /// Makes create calls fail (or succeed again).
    pub async fn fail_create(&self, fail: bool) {
        self.faults.write().await.create = fail;
    }

    /// Drops every injected fault.
    pub async fn heal(&self) {
        *self.faults.write().await = Faults::default();
    }

    /// Snapshot of every stored record.
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.records.read().await.todos.clone()
    }

    async fn check_id(&self, id: TodoId) -> Result<(), CollectionError> {
        if self.faults.read().await.ids.contains(&id) {
            return Err(CollectionError::Injected);
        }
        Ok(())
    }
}
