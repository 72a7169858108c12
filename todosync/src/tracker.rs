//! Per-record transient state: loading, mid-deletion, pending create, and
//! the single in-place edit session.
//!
//! The tracker never owns records. Every id it holds must belong to a record
//! in the [`TodoStore`](crate::store::TodoStore); [`Tracker::retain_known`]
//! restores that after the store is replaced wholesale.

use std::collections::BTreeSet;

use todosync_proto::todo::{Todo, TodoId};

use crate::store::TodoStore;

/// An in-place title edit of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Record being edited.
    pub id: TodoId,
    /// Working copy of the title.
    pub draft: String,
}

/// Transient markers for records with requests in flight.
#[derive(Debug, Default)]
pub struct Tracker {
    loading: BTreeSet<TodoId>,
    deleting: BTreeSet<TodoId>,
    pending_create: Option<Todo>,
    edit: Option<EditSession>,
}

impl Tracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a record's toggle/rename round-trip as in flight.
    pub fn mark_loading(&mut self, id: TodoId) {
        self.loading.insert(id);
    }

    /// Clears the loading marker.
    pub fn clear_loading(&mut self, id: TodoId) {
        self.loading.remove(&id);
    }

    /// Whether the record has a toggle/rename in flight.
    #[must_use]
    pub fn is_loading(&self, id: TodoId) -> bool {
        self.loading.contains(&id)
    }

    /// Marks a record as mid-deletion.
    pub fn mark_deleting(&mut self, id: TodoId) {
        self.deleting.insert(id);
    }

    /// Clears the mid-deletion marker.
    pub fn clear_deleting(&mut self, id: TodoId) {
        self.deleting.remove(&id);
    }

    /// Whether the record's delete is in flight.
    #[must_use]
    pub fn is_deleting(&self, id: TodoId) -> bool {
        self.deleting.contains(&id)
    }

    /// Whether any request for this record is in flight.
    #[must_use]
    pub fn is_busy(&self, id: TodoId) -> bool {
        self.is_loading(id) || self.is_deleting(id)
    }

    /// Ids currently mid-deletion.
    #[must_use]
    pub const fn deleting_ids(&self) -> &BTreeSet<TodoId> {
        &self.deleting
    }

    /// Records the placeholder for an in-flight create.
    ///
    /// Returns `false` without replacing anything if a create is already
    /// outstanding.
    pub fn begin_create(&mut self, placeholder: Todo) -> bool {
        if self.pending_create.is_some() {
            return false;
        }
        self.pending_create = Some(placeholder);
        true
    }

    /// Drops the placeholder once the create settles.
    pub fn finish_create(&mut self) -> Option<Todo> {
        self.pending_create.take()
    }

    /// The placeholder shown while a create is in flight.
    #[must_use]
    pub const fn pending_create(&self) -> Option<&Todo> {
        self.pending_create.as_ref()
    }

    /// Whether a create is in flight.
    #[must_use]
    pub const fn is_creating(&self) -> bool {
        self.pending_create.is_some()
    }

    /// Opens an edit session seeded with the record's current title,
    /// returning the session it replaced.
    pub fn begin_edit(&mut self, todo: &Todo) -> Option<EditSession> {
        self.edit.replace(EditSession {
            id: todo.id,
            draft: todo.title.clone(),
        })
    }

    /// Closes the edit session, returning it.
    pub fn end_edit(&mut self) -> Option<EditSession> {
        self.edit.take()
    }

    /// The active edit session.
    #[must_use]
    pub const fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Mutable access to the active draft.
    pub fn edit_draft_mut(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|e| &mut e.draft)
    }

    /// Drops every marker whose record is no longer in `store`.
    pub fn retain_known(&mut self, store: &TodoStore) {
        self.loading.retain(|id| store.contains(*id));
        self.deleting.retain(|id| store.contains(*id));
        if self.edit.as_ref().is_some_and(|e| !store.contains(e.id)) {
            self.edit = None;
        }
    }

    /// Drops every marker for a single record.
    pub fn forget(&mut self, id: TodoId) {
        self.loading.remove(&id);
        self.deleting.remove(&id);
        if self.edit.as_ref().is_some_and(|e| e.id == id) {
            self.edit = None;
        }
    }
}
