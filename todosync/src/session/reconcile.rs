//! Settling remote outcomes back into the session.
//!
//! Outcomes arrive in any order. Each is keyed by operation and record id
//! and is applied against the state at the moment it is drained, so a
//! record deleted in the meantime simply makes the outcome a no-op.

use std::time::Instant;

use todosync_proto::todo::{Todo, TodoId};

use super::TodoSession;
use super::batch::{BatchPolicy, OpKind, Operation, RecordPhase};
use crate::api::ApiError;
use crate::notify::Failure;
use crate::sync::OpId;

impl TodoSession {
    pub(super) fn finish_load(&mut self, result: Result<Vec<Todo>, ApiError>, now: Instant) {
        match result {
            Ok(todos) => {
                tracing::info!(op = "load", count = todos.len(), "collection loaded");
                self.store.replace_all(todos);
                self.tracker.retain_known(&self.store);
                self.prune_ops(now);
            }
            Err(error) => {
                tracing::warn!(op = "load", %error, "load failed");
                self.notifier.set(Failure::Load, now);
            }
        }
    }

    pub(super) fn finish_create(&mut self, result: Result<Todo, ApiError>, now: Instant) {
        self.tracker.finish_create();
        match result {
            Ok(todo) => {
                tracing::info!(op = "create", todo_id = %todo.id, "todo created");
                self.store.push(todo);
                self.new_title.clear();
            }
            Err(error) => {
                tracing::warn!(op = "create", %error, "create failed");
                self.notifier.set(Failure::Create, now);
            }
        }
    }

    /// Settles one record of operation `op_id`.
    ///
    /// `result` carries the authoritative record for updates and `None` for
    /// deletes.
    pub(super) fn settle(
        &mut self,
        op_id: OpId,
        id: TodoId,
        result: Result<Option<Todo>, ApiError>,
        now: Instant,
    ) {
        let Some(mut op) = self.ops.remove(&op_id) else {
            tracing::debug!(op = %op_id, todo_id = %id, "outcome for unknown operation");
            return;
        };
        if !op.outstanding.remove(&id) {
            tracing::debug!(op = %op_id, todo_id = %id, "outcome for record outside operation");
            self.ops.insert(op_id, op);
            return;
        }

        match op.policy {
            BatchPolicy::PerRecord => self.settle_per_record(&mut op, id, result, now),
            BatchPolicy::AllOrNothing => self.settle_all_or_nothing(&mut op, id, result, now),
        }

        if op.is_settled() {
            tracing::debug!(op = %op_id, failed = op.failed, "operation settled");
        } else {
            self.ops.insert(op_id, op);
        }
    }

    fn settle_per_record(
        &mut self,
        op: &mut Operation,
        id: TodoId,
        result: Result<Option<Todo>, ApiError>,
        now: Instant,
    ) {
        self.clear_marker(op.kind, id);
        match result {
            Ok(value) => {
                op.phases.insert(id, RecordPhase::Committed);
                self.commit(op.kind, id, value);
            }
            Err(error) => {
                tracing::warn!(todo_id = %id, %error, "sync failed, record left unchanged");
                op.phases.insert(id, RecordPhase::RolledBack);
                op.failed += 1;
            }
        }
        if op.is_settled() && op.failed > 0 {
            self.notifier.set(op.kind.failure(), now);
        }
    }

    fn settle_all_or_nothing(
        &mut self,
        op: &mut Operation,
        id: TodoId,
        result: Result<Option<Todo>, ApiError>,
        now: Instant,
    ) {
        if op.rolled_back {
            tracing::debug!(todo_id = %id, "late outcome for rolled-back batch ignored");
            return;
        }
        match result {
            Ok(value) => {
                op.phases.insert(id, RecordPhase::Committed);
                op.held.insert(id, value);
            }
            Err(error) => {
                tracing::warn!(todo_id = %id, %error, "batch member failed, rolling back");
                op.failed += 1;
                op.roll_back();
                for affected in op.ids() {
                    self.clear_marker(op.kind, affected);
                }
                self.notifier.set(op.kind.failure(), now);
                return;
            }
        }
        if op.is_settled() {
            for (affected, value) in std::mem::take(&mut op.held) {
                self.clear_marker(op.kind, affected);
                self.commit(op.kind, affected, value);
            }
        }
    }

    /// Drops records a reload removed from every in-flight operation.
    ///
    /// Their late outcomes become no-ops. An operation left with nothing
    /// outstanding settles on what has already come back.
    fn prune_ops(&mut self, now: Instant) {
        for (op_id, mut op) in std::mem::take(&mut self.ops) {
            let gone: Vec<TodoId> = op
                .ids()
                .into_iter()
                .filter(|id| !self.store.contains(*id))
                .collect();
            for id in &gone {
                op.phases.remove(id);
                op.outstanding.remove(id);
                op.held.remove(id);
            }
            if !gone.is_empty() {
                tracing::debug!(op = %op_id, pruned = gone.len(), "records gone after reload");
            }

            if !op.is_settled() {
                self.ops.insert(op_id, op);
                continue;
            }
            match op.policy {
                BatchPolicy::PerRecord if op.failed > 0 => {
                    self.notifier.set(op.kind.failure(), now);
                }
                BatchPolicy::AllOrNothing if !op.rolled_back => {
                    for (affected, value) in std::mem::take(&mut op.held) {
                        self.clear_marker(op.kind, affected);
                        self.commit(op.kind, affected, value);
                    }
                }
                _ => {}
            }
        }
    }

    /// Applies a successful result to the store.
    fn commit(&mut self, kind: OpKind, id: TodoId, value: Option<Todo>) {
        let applied = match kind {
            OpKind::Delete | OpKind::ClearCompleted => {
                self.tracker.forget(id);
                self.store.remove(id).is_some()
            }
            OpKind::Toggle | OpKind::Rename => {
                value.is_some_and(|todo| self.store.replace(id, todo))
            }
            OpKind::ToggleAll { target } => self.store.set_completed(id, target),
        };
        if !applied {
            tracing::debug!(todo_id = %id, "record gone before its outcome arrived");
        }
    }

    fn clear_marker(&mut self, kind: OpKind, id: TodoId) {
        if kind.is_delete() {
            self.tracker.clear_deleting(id);
        } else {
            self.tracker.clear_loading(id);
        }
    }
}
