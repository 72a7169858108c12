//! Property-based tests for the store, the filter projection, and session
//! reconciliation.
//!
//! Uses proptest to verify:
//! 1. Active and completed partition the store; `All` is the store in order.
//! 2. Toggles, renames, and failed calls never change the store's length or
//!    the relative order of records.
//! 3. Renaming to the current title (any surrounding whitespace) is a no-op.
//! 4. Every marker is cleared once all outcomes are applied, whatever their
//!    arrival order.

use std::time::Instant;

use proptest::prelude::*;
use todosync::api::ApiError;
use todosync::filter::{self, StatusFilter};
use todosync::session::{SessionOptions, TodoSession};
use todosync::sync::{SyncOutcome, SyncRequest};
use todosync_proto::todo::{Todo, TodoId, UserId};

// --- Strategies ---

/// Records with unique ids in ascending order and non-blank titles.
fn arb_todos() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..12).prop_map(|rows| {
        rows.into_iter()
            .zip(1..)
            .map(|((title, completed), id)| Todo {
                id: TodoId::new(id),
                user_id: UserId::new(1),
                title,
                completed,
            })
            .collect()
    })
}

/// A user action against a record index (wrapped to the store length).
#[derive(Debug, Clone)]
enum Action {
    Toggle(usize),
    Rename(usize, String),
    ToggleAll,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        any::<usize>().prop_map(Action::Toggle),
        (any::<usize>(), "[a-z ]{0,6}").prop_map(|(i, t)| Action::Rename(i, t)),
        Just(Action::ToggleAll),
    ]
}

// --- Helpers ---

fn session_with(todos: Vec<Todo>) -> TodoSession {
    let mut session = TodoSession::new(SessionOptions::for_user(UserId::new(1))).unwrap();
    session.apply(SyncOutcome::Loaded(Ok(todos)), Instant::now());
    session
}

/// The outcome a collection would produce, succeeding or failing.
fn outcome_for(request: &SyncRequest, succeed: bool) -> SyncOutcome {
    match request {
        SyncRequest::Update { op, id, patch } => SyncOutcome::Updated {
            op: *op,
            id: *id,
            result: if succeed {
                Ok(Todo {
                    id: *id,
                    user_id: patch.user_id,
                    title: patch.title.clone(),
                    completed: patch.completed,
                })
            } else {
                Err(ApiError::Status(500))
            },
        },
        SyncRequest::Delete { op, id } => SyncOutcome::Deleted {
            op: *op,
            id: *id,
            result: if succeed { Ok(()) } else { Err(ApiError::Status(500)) },
        },
        other => panic!("unexpected request: {other:?}"),
    }
}

fn ids(todos: &[Todo]) -> Vec<TodoId> {
    todos.iter().map(|t| t.id).collect()
}

// --- Properties ---

proptest! {
    #[test]
    fn filters_partition_the_store(todos in arb_todos()) {
        let all = filter::visible(&todos, StatusFilter::All);
        let active = filter::visible(&todos, StatusFilter::Active);
        let completed = filter::visible(&todos, StatusFilter::Completed);

        prop_assert_eq!(all.len(), todos.len());
        prop_assert_eq!(active.len() + completed.len(), todos.len());
        prop_assert!(active.iter().all(|t| !t.completed));
        prop_assert!(completed.iter().all(|t| t.completed));
        prop_assert!(all.iter().zip(&todos).all(|(a, b)| *a == b));
    }

    #[test]
    fn updates_keep_length_and_order(
        todos in arb_todos(),
        actions in prop::collection::vec(arb_action(), 0..8),
        results in prop::collection::vec(any::<bool>(), 64),
        reverse in any::<bool>(),
    ) {
        let order = ids(&todos);
        let mut session = session_with(todos);
        let mut requests = Vec::new();

        for action in actions {
            let len = session.store().len();
            match action {
                Action::Toggle(i) if len > 0 => {
                    let id = session.store().as_slice()[i % len].id;
                    requests.extend(session.toggle(id));
                }
                Action::Rename(i, title) if len > 0 && !title.trim().is_empty() => {
                    let id = session.store().as_slice()[i % len].id;
                    requests.extend(session.rename(id, &title));
                }
                Action::ToggleAll => requests.extend(session.toggle_all()),
                _ => {}
            }
        }

        if reverse {
            requests.reverse();
        }
        for (request, succeed) in requests.iter().zip(results.iter().cycle()) {
            session.apply(outcome_for(request, *succeed), Instant::now());
        }

        prop_assert_eq!(ids(session.store().as_slice()), order);
        prop_assert_eq!(session.pending_operations(), 0);
        prop_assert!(session.store().iter().all(|t| !session.is_busy(t.id)));
    }

    #[test]
    fn rename_to_current_title_is_a_noop(
        todos in arb_todos().prop_filter("non-empty", |t| !t.is_empty()),
        index in any::<usize>(),
        pad_left in "[ ]{0,3}",
        pad_right in "[ ]{0,3}",
    ) {
        let mut session = session_with(todos);
        let target = session.store().as_slice()[index % session.store().len()].clone();

        let request = session.rename(target.id, &format!("{pad_left}{}{pad_right}", target.title));
        prop_assert!(request.is_none());
        prop_assert!(!session.is_busy(target.id));
        prop_assert_eq!(session.pending_operations(), 0);
    }

    #[test]
    fn clear_completed_removes_exactly_the_successes(
        todos in arb_todos(),
        results in prop::collection::vec(any::<bool>(), 12),
    ) {
        let mut session = session_with(todos.clone());
        let requests = session.clear_completed();
        prop_assert_eq!(requests.len(), todos.iter().filter(|t| t.completed).count());

        let mut removed = Vec::new();
        for (request, succeed) in requests.iter().zip(&results) {
            if let SyncRequest::Delete { id, .. } = request
                && *succeed
            {
                removed.push(*id);
            }
            session.apply(outcome_for(request, *succeed), Instant::now());
        }

        let expected: Vec<TodoId> = todos
            .iter()
            .map(|t| t.id)
            .filter(|id| !removed.contains(id))
            .collect();
        prop_assert_eq!(ids(session.store().as_slice()), expected);
        prop_assert!(session.tracker().deleting_ids().is_empty());
        let any_failed = requests.len() > removed.len();
        prop_assert_eq!(session.notification().is_some(), any_failed);
    }
}
