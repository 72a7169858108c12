//! User actions: the optimistic half of every sync operation.
//!
//! Each action validates against the current state, sets the transient
//! markers, and returns the requests to issue. Records that already have a
//! request in flight ignore further per-record actions until it settles.

use std::time::Instant;

use todosync_proto::todo::{NewTodo, Todo, TodoId, TodoPatch};

use super::TodoSession;
use super::batch::{BatchPolicy, OpKind, Operation};
use crate::notify::Failure;
use crate::sync::{OpId, SyncRequest};

impl TodoSession {
    /// Submits the new-title field as a create.
    ///
    /// A blank title sets "Title should not be empty" and keeps the field
    /// as typed. While another create is in flight the submit is rejected.
    pub fn submit_new(&mut self, now: Instant) -> Option<SyncRequest> {
        // The field is read-only while a create is in flight, so a blank
        // title here always comes from an idle field.
        let title = self.new_title.trim();
        if title.is_empty() {
            self.notifier.set(Failure::EmptyTitle, now);
            return None;
        }
        let title = title.to_string();

        let placeholder = Todo {
            id: placeholder_id(),
            user_id: self.user_id,
            title: title.clone(),
            completed: false,
        };
        if !self.tracker.begin_create(placeholder) {
            tracing::debug!("create rejected, another create is in flight");
            return None;
        }
        self.notifier.clear();
        tracing::info!(op = "create", %title, "creating todo");

        Some(SyncRequest::Create {
            todo: NewTodo::new(title, self.user_id),
        })
    }

    /// Deletes a record.
    pub fn delete(&mut self, id: TodoId) -> Option<SyncRequest> {
        if !self.store.contains(id) || self.tracker.is_busy(id) {
            return None;
        }
        let op = self.start_op(OpKind::Delete, BatchPolicy::PerRecord, vec![id]);
        tracing::info!(op = "delete", todo_id = %id, "deleting todo");
        Some(SyncRequest::Delete { op, id })
    }

    /// Flips a record's completion flag.
    ///
    /// The flag itself only changes once the collection confirms; until then
    /// the record just shows as loading.
    pub fn toggle(&mut self, id: TodoId) -> Option<SyncRequest> {
        let todo = self.store.get(id)?;
        if self.tracker.is_busy(id) {
            return None;
        }
        let patch = TodoPatch::toggled(todo);
        let op = self.start_op(OpKind::Toggle, BatchPolicy::PerRecord, vec![id]);
        tracing::info!(op = "toggle", todo_id = %id, completed = patch.completed, "toggling todo");
        Some(SyncRequest::Update { op, id, patch })
    }

    /// Renames a record.
    ///
    /// The title is trimmed first. An unchanged title is a no-op; a blank
    /// one deletes the record instead.
    pub fn rename(&mut self, id: TodoId, title: &str) -> Option<SyncRequest> {
        let todo = self.store.get(id)?;
        if self.tracker.is_busy(id) {
            return None;
        }

        let trimmed = title.trim();
        if trimmed == todo.title {
            return None;
        }
        if trimmed.is_empty() {
            return self.delete(id);
        }

        let patch = TodoPatch::retitled(todo, trimmed);
        let op = self.start_op(OpKind::Rename, BatchPolicy::PerRecord, vec![id]);
        tracing::info!(op = "rename", todo_id = %id, "renaming todo");
        Some(SyncRequest::Update { op, id, patch })
    }

    /// Deletes every completed record, one request each.
    ///
    /// Failures are isolated per record.
    pub fn clear_completed(&mut self) -> Vec<SyncRequest> {
        let ids: Vec<TodoId> = self
            .store
            .iter()
            .filter(|t| t.completed && !self.tracker.is_busy(t.id))
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }

        let op = self.start_op(OpKind::ClearCompleted, BatchPolicy::PerRecord, ids.clone());
        tracing::info!(op = "clear_completed", count = ids.len(), "clearing completed todos");
        ids.into_iter()
            .map(|id| SyncRequest::Delete { op, id })
            .collect()
    }

    /// Completes every incomplete record, or reopens everything if all are
    /// already completed.
    ///
    /// Records already at the target state are not re-sent. Reconciliation
    /// follows the session's bulk-toggle policy.
    pub fn toggle_all(&mut self) -> Vec<SyncRequest> {
        if self.store.is_empty() {
            return Vec::new();
        }
        let target = !self.store.all_completed();

        let patches: Vec<(TodoId, TodoPatch)> = self
            .store
            .iter()
            .filter(|t| t.completed != target && !self.tracker.is_busy(t.id))
            .map(|t| (t.id, TodoPatch::completed(t, target)))
            .collect();
        if patches.is_empty() {
            return Vec::new();
        }

        let ids = patches.iter().map(|(id, _)| *id).collect();
        let op = self.start_op(OpKind::ToggleAll { target }, self.toggle_all_policy, ids);
        tracing::info!(
            op = "toggle_all",
            target,
            count = patches.len(),
            policy = %self.toggle_all_policy,
            "toggling all todos"
        );
        patches
            .into_iter()
            .map(|(id, patch)| SyncRequest::Update { op, id, patch })
            .collect()
    }

    /// Opens an in-place edit of a record, seeded with its title.
    ///
    /// Any other active edit loses focus first, which commits it; the
    /// resulting rename request (if any) is returned.
    pub fn begin_edit(&mut self, id: TodoId) -> Option<SyncRequest> {
        if self.tracker.edit().is_some_and(|e| e.id == id) {
            return None;
        }
        let committed = self.commit_edit();
        if let Some(todo) = self.store.get(id)
            && !self.tracker.is_busy(id)
        {
            self.tracker.begin_edit(todo);
        }
        committed
    }

    /// Mutable access to the active edit draft.
    pub fn edit_draft_mut(&mut self) -> Option<&mut String> {
        self.tracker.edit_draft_mut()
    }

    /// Aborts the active edit without renaming.
    pub fn cancel_edit(&mut self) {
        self.tracker.end_edit();
    }

    /// Ends the active edit and renames the record with the draft.
    ///
    /// Edit mode is left whatever the rename turns out to do.
    pub fn commit_edit(&mut self) -> Option<SyncRequest> {
        let session = self.tracker.end_edit()?;
        self.rename(session.id, &session.draft)
    }

    /// Registers an operation and sets its markers.
    fn start_op(&mut self, kind: OpKind, policy: BatchPolicy, ids: Vec<TodoId>) -> OpId {
        for id in &ids {
            if kind.is_delete() {
                self.tracker.mark_deleting(*id);
            } else {
                self.tracker.mark_loading(*id);
            }
        }
        let op_id = self.next_op_id();
        self.ops.insert(op_id, Operation::new(kind, policy, ids));
        op_id
    }
}

/// Placeholder id for an optimistic create: the current time in
/// milliseconds. Discarded once the collection assigns the real id.
fn placeholder_id() -> TodoId {
    let millis = chrono::Utc::now().timestamp_millis();
    TodoId::new(u64::try_from(millis).unwrap_or_default())
}
