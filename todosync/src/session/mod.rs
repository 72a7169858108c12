//! The optimistic sync session.
//!
//! [`TodoSession`] owns the collection store, the transient-state tracker,
//! the notification slot, and the filter. User actions return the
//! [`SyncRequest`]s to issue; settled calls come back through
//! [`TodoSession::apply`]. The session never awaits, so every update is
//! computed from its state at the moment the outcome is applied.

mod batch;
mod ops;
mod reconcile;

pub use batch::{BatchPolicy, RecordPhase};

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use todosync_proto::todo::{Todo, TodoId, UserId};

use crate::filter::{self, StatusFilter};
use crate::notify::{DEFAULT_NOTIFICATION_TTL, Notifier};
use crate::store::TodoStore;
use crate::sync::{OpId, SyncOutcome, SyncRequest};
use crate::tracker::{EditSession, Tracker};

use batch::Operation;

/// Errors that prevent a session from starting.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// No user id was configured, so there is no collection to show.
    #[error("no user id configured")]
    MissingUser,
}

/// Settings a session is built from.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Owner of the collection; `None` means unconfigured.
    pub user_id: Option<UserId>,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    /// Reconciliation policy for the bulk toggle.
    pub toggle_all_policy: BatchPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            user_id: None,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            toggle_all_policy: BatchPolicy::AllOrNothing,
        }
    }
}

impl SessionOptions {
    /// Options for `user_id` with every other setting at its default.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}

/// Client-side state of one user's collection.
#[derive(Debug)]
pub struct TodoSession {
    user_id: UserId,
    store: TodoStore,
    tracker: Tracker,
    notifier: Notifier,
    filter: StatusFilter,
    new_title: String,
    ops: BTreeMap<OpId, Operation>,
    next_op: u64,
    toggle_all_policy: BatchPolicy,
}

impl TodoSession {
    /// Creates a session for the configured user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingUser`] if no user id is configured.
    pub fn new(options: SessionOptions) -> Result<Self, SessionError> {
        let user_id = options.user_id.ok_or(SessionError::MissingUser)?;
        Ok(Self {
            user_id,
            store: TodoStore::new(),
            tracker: Tracker::new(),
            notifier: Notifier::new(options.notification_ttl),
            filter: StatusFilter::default(),
            new_title: String::new(),
            ops: BTreeMap::new(),
            next_op: 1,
            toggle_all_policy: options.toggle_all_policy,
        })
    }

    /// Clears the notification and requests the full collection.
    pub fn load(&mut self) -> SyncRequest {
        self.notifier.clear();
        SyncRequest::Load {
            user_id: self.user_id,
        }
    }

    /// Reconciles a settled call into the session.
    pub fn apply(&mut self, outcome: SyncOutcome, now: Instant) {
        match outcome {
            SyncOutcome::Loaded(result) => self.finish_load(result, now),
            SyncOutcome::Created(result) => self.finish_create(result, now),
            SyncOutcome::Deleted { op, id, result } => {
                self.settle(op, id, result.map(|()| None), now);
            }
            SyncOutcome::Updated { op, id, result } => {
                self.settle(op, id, result.map(Some), now);
            }
        }
    }

    /// Expires the notification if its deadline passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifier.tick(now)
    }

    /// Dismisses the notification.
    pub fn dismiss_notification(&mut self) {
        self.notifier.clear();
    }

    /// The owner of this collection.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The local collection.
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Transient per-record state.
    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The notification slot.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The current notification message, if any.
    #[must_use]
    pub fn notification(&self) -> Option<&'static str> {
        self.notifier.message()
    }

    /// The selected filter.
    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Selects a filter.
    pub const fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Records passing the selected filter, in store order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Todo> {
        filter::visible(self.store.as_slice(), self.filter)
    }

    /// Text of the new-title field.
    #[must_use]
    pub fn new_title(&self) -> &str {
        &self.new_title
    }

    /// Mutable access to the new-title field; `None` while a create is in
    /// flight (the field is disabled).
    pub fn new_title_mut(&mut self) -> Option<&mut String> {
        if self.tracker.is_creating() {
            return None;
        }
        Some(&mut self.new_title)
    }

    /// Whether a create is in flight.
    #[must_use]
    pub const fn is_creating(&self) -> bool {
        self.tracker.is_creating()
    }

    /// The placeholder shown for an in-flight create.
    #[must_use]
    pub const fn pending_create(&self) -> Option<&Todo> {
        self.tracker.pending_create()
    }

    /// The active edit session.
    #[must_use]
    pub const fn edit(&self) -> Option<&EditSession> {
        self.tracker.edit()
    }

    /// Whether a record shows a loading marker (toggle, rename, or delete
    /// in flight).
    #[must_use]
    pub fn is_busy(&self, id: TodoId) -> bool {
        self.tracker.is_busy(id)
    }

    /// Where `id` stands in the newest unsettled operation touching it.
    #[must_use]
    pub fn phase(&self, id: TodoId) -> RecordPhase {
        self.ops
            .values()
            .rev()
            .find_map(|op| op.phases.get(&id).copied())
            .unwrap_or(RecordPhase::Idle)
    }

    /// Number of operations with requests still in flight.
    #[must_use]
    pub fn pending_operations(&self) -> usize {
        self.ops.len()
    }

    fn next_op_id(&mut self) -> OpId {
        let id = OpId::new(self.next_op);
        self.next_op += 1;
        id
    }
}
