//! In-process collection for tests.
//!
//! [`InMemoryApi`] behaves like the remote collection (server-assigned ids,
//! per-user listing, full-record updates) and can be told to reject calls
//! for specific ids or operations.

use std::collections::HashSet;

use parking_lot::Mutex;
use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch, UserId};

use super::{ApiError, TodoApi};

/// Status returned for injected failures and unknown ids.
const INJECTED_FAILURE: u16 = 500;
const NOT_FOUND: u16 = 404;

#[derive(Debug, Default)]
struct MemoryState {
    todos: Vec<Todo>,
    next_id: u64,
    failing_ids: HashSet<TodoId>,
    fail_list: bool,
    fail_create: bool,
    calls: usize,
}

/// In-memory [`TodoApi`] backed by a `Vec<Todo>`.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
}

impl InMemoryApi {
    /// Creates an empty collection. The first created record gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Creates a collection seeded with `todos`.
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MemoryState {
                todos,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Makes every delete/update of `id` fail.
    pub fn fail_id(&self, id: TodoId) {
        self.state.lock().failing_ids.insert(id);
    }

    /// Makes list calls fail.
    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    /// Makes create calls fail.
    pub fn fail_create(&self) {
        self.state.lock().fail_create = true;
    }

    /// Removes every injected failure.
    pub fn heal(&self) {
        let mut state = self.state.lock();
        state.failing_ids.clear();
        state.fail_list = false;
        state.fail_create = false;
    }

    /// Snapshot of the stored records.
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.state.lock().todos.clone()
    }

    /// Number of calls received so far, failed ones included.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }
}

impl TodoApi for InMemoryApi {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.fail_list {
            return Err(ApiError::Status(INJECTED_FAILURE));
        }
        Ok(state
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo, ApiError> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.fail_create {
            return Err(ApiError::Status(INJECTED_FAILURE));
        }
        let created = Todo {
            id: TodoId::new(state.next_id),
            user_id: todo.user_id,
            title: todo.title.clone(),
            completed: todo.completed,
        };
        state.next_id += 1;
        state.todos.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.failing_ids.contains(&id) {
            return Err(ApiError::Status(INJECTED_FAILURE));
        }
        let index = state
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(ApiError::Status(NOT_FOUND))?;
        state.todos.remove(index);
        Ok(())
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let mut state = self.state.lock();
        state.calls += 1;
        if state.failing_ids.contains(&id) {
            return Err(ApiError::Status(INJECTED_FAILURE));
        }
        let todo = state
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::Status(NOT_FOUND))?;
        patch.apply_to(todo);
        Ok(todo.clone())
    }
}
