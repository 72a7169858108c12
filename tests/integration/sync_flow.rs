//! End-to-end sync against the mock collection server over real HTTP.
//!
//! Verifies:
//! 1. The HTTP client speaks the collection's wire format (list, create,
//!    update, delete).
//! 2. Non-success statuses surface as failures the session reports.
//! 3. Bulk operations issue concurrent requests and reconcile per policy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use todosync::api::http::HttpTodoApi;
use todosync::api::{ApiError, TodoApi};
use todosync::session::{SessionOptions, TodoSession};
use todosync::sync::{SyncDriver, SyncOutcome, SyncRequest};
use todosync_mock::server::{self, MockState};
use todosync_mock::store::TodoCollection;
use todosync_proto::todo::{NewTodo, TodoId, TodoPatch, UserId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const USER: u64 = 1;

async fn start_mock(collection: TodoCollection) -> (HttpTodoApi, Arc<MockState>) {
    let state = Arc::new(MockState::new(collection));
    let (addr, _handle) = server::start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .unwrap();
    let api = HttpTodoApi::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    (api, state)
}

async fn drive(
    session: &mut TodoSession,
    driver: &SyncDriver<HttpTodoApi>,
    outcomes: &mut mpsc::Receiver<SyncOutcome>,
    requests: Vec<SyncRequest>,
) {
    let count = requests.len();
    driver.dispatch_all(requests);
    for _ in 0..count {
        let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        session.apply(outcome, Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Client wire format
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_client_round_trips_every_call() {
    let (api, state) = start_mock(TodoCollection::new()).await;

    let created = api
        .create(&NewTodo::new("write tests", UserId::new(USER)))
        .await
        .unwrap();
    assert_eq!(created.id, TodoId::new(1));
    assert!(!created.completed);

    let listed = api.list(UserId::new(USER)).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let updated = api
        .update(created.id, &TodoPatch::toggled(&created))
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "write tests");

    api.delete(created.id).await.unwrap();
    assert!(state.collection.snapshot().await.is_empty());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (api, state) = start_mock(TodoCollection::with_sample(UserId::new(USER))).await;
    state.collection.fail_list(true).await;

    assert!(matches!(
        api.list(UserId::new(USER)).await,
        Err(ApiError::Status(500))
    ));
    assert!(matches!(
        api.delete(TodoId::new(42)).await,
        Err(ApiError::Status(404))
    ));
}

#[tokio::test]
async fn unreachable_collection_is_a_transport_error() {
    let api = HttpTodoApi::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    assert!(matches!(
        api.list(UserId::new(USER)).await,
        Err(ApiError::Transport(_))
    ));
}

// ---------------------------------------------------------------------------
// Session over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_session_over_http() {
    let (api, state) = start_mock(TodoCollection::with_sample(UserId::new(USER))).await;
    let (driver, mut outcomes) = SyncDriver::new(api);
    let mut session = TodoSession::new(SessionOptions::for_user(UserId::new(USER))).unwrap();

    let load = session.load();
    drive(&mut session, &driver, &mut outcomes, vec![load]).await;
    assert_eq!(session.store().len(), 3);

    *session.new_title_mut().unwrap() = "ship it".to_string();
    let create = session.submit_new(Instant::now()).into_iter().collect();
    drive(&mut session, &driver, &mut outcomes, create).await;
    assert_eq!(session.store().len(), 4);
    assert_eq!(session.store().as_slice()[3].id, TodoId::new(4));

    let toggle_all = session.toggle_all();
    assert_eq!(toggle_all.len(), 3);
    drive(&mut session, &driver, &mut outcomes, toggle_all).await;
    assert!(session.store().all_completed());

    let clear = session.clear_completed();
    assert_eq!(clear.len(), 4);
    drive(&mut session, &driver, &mut outcomes, clear).await;
    assert!(session.store().is_empty());
    assert!(state.collection.snapshot().await.is_empty());
    assert!(session.notification().is_none());
}

#[tokio::test]
async fn server_faults_roll_back_bulk_toggle() {
    let (api, state) = start_mock(TodoCollection::with_sample(UserId::new(USER))).await;
    state.collection.fail_id(TodoId::new(3)).await;
    let (driver, mut outcomes) = SyncDriver::new(api);
    let mut session = TodoSession::new(SessionOptions::for_user(UserId::new(USER))).unwrap();

    let load = session.load();
    drive(&mut session, &driver, &mut outcomes, vec![load]).await;

    let requests = session.toggle_all();
    drive(&mut session, &driver, &mut outcomes, requests).await;

    // Record 2 was updated remotely, but the batch is not applied locally.
    let completed: Vec<bool> = session.store().iter().map(|t| t.completed).collect();
    assert_eq!(completed, vec![true, false, false]);
    assert_eq!(session.notification(), Some("Unable to update todo"));
    assert!(session.store().iter().all(|t| !session.is_busy(t.id)));
}
