//! Single-slot, self-expiring error banner.
//!
//! The slot holds at most one message together with its deadline. Setting a
//! message replaces the previous one and restarts the deadline; clearing it
//! drops the deadline with it, so no timer outlives its message.

use std::time::{Duration, Instant};

/// Default time a message stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// The operation whose failure is being reported.
///
/// Each variant maps to exactly one user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Initial collection load failed.
    Load,
    /// Create was submitted with a blank title.
    EmptyTitle,
    /// Create request failed.
    Create,
    /// Single delete, rename-to-empty, or clear-completed failed.
    Delete,
    /// Single toggle or rename failed.
    Update,
    /// Bulk toggle failed.
    UpdateAll,
}

impl Failure {
    /// The user-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Load => "Unable to load todos",
            Self::EmptyTitle => "Title should not be empty",
            Self::Create => "Unable to add a todo",
            Self::Delete => "Unable to delete a todo",
            Self::Update => "Unable to update a todo",
            Self::UpdateAll => "Unable to update todo",
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A message currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// What failed.
    pub failure: Failure,
    /// When the message disappears on its own.
    pub expires_at: Instant,
}

/// The notification slot.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Notifier {
    /// Creates an empty slot whose messages live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Shows `failure`, replacing any current message and restarting the
    /// deadline from `now`.
    pub fn set(&mut self, failure: Failure, now: Instant) {
        tracing::debug!(message = failure.message(), "notification set");
        self.current = Some(Notice {
            failure,
            expires_at: now + self.ttl,
        });
    }

    /// Dismisses the current message, if any.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Expires the message if its deadline has passed.
    ///
    /// Returns `true` if a message was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
            return true;
        }
        false
    }

    /// The current notice, ignoring its deadline.
    #[must_use]
    pub const fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// The message to display, if one is set.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        self.current.as_ref().map(|n| n.failure.message())
    }

    /// How long messages stay visible.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}
