//! Bookkeeping for in-flight sync operations.
//!
//! Every user action that touches existing records becomes an
//! [`Operation`]: a kind, a reconciliation policy, and a [`RecordPhase`] per
//! affected id. Single-record actions are operations of one.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use todosync_proto::todo::{Todo, TodoId};

use crate::notify::Failure;

/// Where a record stands within the operation that touched it last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPhase {
    /// No operation in flight.
    Idle,
    /// Request issued, not yet settled.
    Pending,
    /// Request succeeded and its effect is (or will be) applied.
    Committed,
    /// Request failed, or a sibling's failure discarded its effect.
    RolledBack,
}

/// How a multi-record operation reconciles partial failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Each record commits or rolls back on its own.
    PerRecord,
    /// Any failure discards every effect of the batch.
    AllOrNothing,
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-record" => Ok(Self::PerRecord),
            "all-or-nothing" => Ok(Self::AllOrNothing),
            other => Err(format!(
                "unknown batch policy '{other}' (expected 'per-record' or 'all-or-nothing')"
            )),
        }
    }
}

impl std::fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerRecord => f.write_str("per-record"),
            Self::AllOrNothing => f.write_str("all-or-nothing"),
        }
    }
}

/// What an operation does to each of its records on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    /// Single delete (including rename-to-empty).
    Delete,
    /// Single completion toggle.
    Toggle,
    /// Single title change.
    Rename,
    /// Delete every completed record.
    ClearCompleted,
    /// Set every affected record's completion to `target`.
    ToggleAll { target: bool },
}

impl OpKind {
    /// The notification shown when this operation fails.
    pub(crate) const fn failure(self) -> Failure {
        match self {
            Self::Delete | Self::ClearCompleted => Failure::Delete,
            Self::Toggle | Self::Rename => Failure::Update,
            Self::ToggleAll { .. } => Failure::UpdateAll,
        }
    }

    /// Whether the operation's records carry the mid-deletion marker
    /// (as opposed to the loading marker).
    pub(crate) const fn is_delete(self) -> bool {
        matches!(self, Self::Delete | Self::ClearCompleted)
    }
}

/// One in-flight operation.
#[derive(Debug)]
pub(crate) struct Operation {
    pub(crate) kind: OpKind,
    pub(crate) policy: BatchPolicy,
    pub(crate) phases: BTreeMap<TodoId, RecordPhase>,
    /// Ids whose request has not come back yet.
    pub(crate) outstanding: BTreeSet<TodoId>,
    /// Successful results held back until the whole batch commits.
    pub(crate) held: BTreeMap<TodoId, Option<Todo>>,
    pub(crate) failed: usize,
    pub(crate) rolled_back: bool,
}

impl Operation {
    pub(crate) fn new(
        kind: OpKind,
        policy: BatchPolicy,
        ids: impl IntoIterator<Item = TodoId>,
    ) -> Self {
        let outstanding: BTreeSet<TodoId> = ids.into_iter().collect();
        Self {
            kind,
            policy,
            phases: outstanding
                .iter()
                .map(|id| (*id, RecordPhase::Pending))
                .collect(),
            outstanding,
            held: BTreeMap::new(),
            failed: 0,
            rolled_back: false,
        }
    }

    /// Ids the operation was started for.
    pub(crate) fn ids(&self) -> Vec<TodoId> {
        self.phases.keys().copied().collect()
    }

    /// Whether every request has come back.
    pub(crate) fn is_settled(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Marks every record rolled back.
    pub(crate) fn roll_back(&mut self) {
        self.rolled_back = true;
        self.held.clear();
        for phase in self.phases.values_mut() {
            *phase = RecordPhase::RolledBack;
        }
    }
}
