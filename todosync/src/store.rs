//! Ordered in-memory copy of the remote collection.
//!
//! Records keep arrival order: creates append, edits replace in place,
//! deletes remove by id. Nothing in here ever reorders the sequence.

use todosync_proto::todo::{Todo, TodoId};

/// The local collection, source of truth for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    todos: Vec<Todo>,
}

impl TodoStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// Replaces the whole collection, keeping the given order.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    /// Appends a record at the end.
    pub fn push(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Removes the record with `id`, returning it if it was present.
    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.position(id)?;
        Some(self.todos.remove(index))
    }

    /// Replaces the record with `id` in place.
    ///
    /// Returns `false` (and changes nothing) if no such record exists.
    pub fn replace(&mut self, id: TodoId, todo: Todo) -> bool {
        match self.get_mut(id) {
            Some(slot) => {
                *slot = todo;
                true
            }
            None => false,
        }
    }

    /// Sets the completion flag of the record with `id`.
    ///
    /// Returns `false` if no such record exists.
    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> bool {
        match self.get_mut(id) {
            Some(todo) => {
                todo.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Whether a record with `id` is present.
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    /// All records in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Todo] {
        &self.todos
    }

    /// Iterates records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.todos.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of records not yet completed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Whether at least one record is completed.
    #[must_use]
    pub fn any_completed(&self) -> bool {
        self.todos.iter().any(|t| t.completed)
    }

    /// Whether the store is non-empty and every record is completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }
}

impl<'a> IntoIterator for &'a TodoStore {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
