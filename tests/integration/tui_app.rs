//! TUI wiring: key handling produces the right requests and the views
//! render session state.
//!
//! Verifies:
//! 1. Typing and Enter submit a create; the input is disabled meanwhile.
//! 2. List keys toggle, delete, edit, filter, and run bulk actions.
//! 3. Edit mode confirms on Enter or focus loss and cancels on Esc.
//! 4. Rendering shows markers, the footer, the banner, and the warning view.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use todosync::app::{App, Focus};
use todosync::filter::StatusFilter;
use todosync::session::{SessionError, SessionOptions, TodoSession};
use todosync::sync::{SyncOutcome, SyncRequest};
use todosync::ui;
use todosync_proto::todo::{Todo, TodoId, UserId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn todo(id: u64, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId::new(id),
        user_id: UserId::new(1),
        title: title.to_string(),
        completed,
    }
}

fn app_with(todos: Vec<Todo>) -> App {
    let mut session = TodoSession::new(SessionOptions::for_user(UserId::new(1))).unwrap();
    session.apply(SyncOutcome::Loaded(Ok(todos)), Instant::now());
    App::new(session)
}

fn press(app: &mut App, code: KeyCode) -> Vec<SyncRequest> {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    screen(&terminal)
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[test]
fn typing_and_enter_submit_a_create() {
    let mut app = app_with(vec![]);
    type_str(&mut app, "buy milk");
    assert_eq!(app.session.new_title(), "buy milk");

    let requests = press(&mut app, KeyCode::Enter);
    assert!(matches!(&requests[..], [SyncRequest::Create { todo }] if todo.title == "buy milk"));

    // Input is disabled while the create is in flight.
    type_str(&mut app, "xyz");
    assert_eq!(app.session.new_title(), "buy milk");
    assert!(press(&mut app, KeyCode::Enter).is_empty());

    app.apply_outcome(
        SyncOutcome::Created(Ok(todo(1, "buy milk", false))),
        Instant::now(),
    );
    assert_eq!(app.focus, Focus::Input);
    assert_eq!(app.session.new_title(), "");
    assert_eq!(app.session.store().len(), 1);
}

#[test]
fn ctrl_c_quits_from_any_focus() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::List);
    app.handle_key_event(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Instant::now(),
    );
    assert!(app.should_quit);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_keys_issue_record_actions() {
    let mut app = app_with(vec![todo(1, "a", false), todo(2, "b", true)]);
    press(&mut app, KeyCode::Tab);

    let toggle = press(&mut app, KeyCode::Char(' '));
    assert!(matches!(&toggle[..], [SyncRequest::Update { id, .. }] if *id == TodoId::new(1)));

    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_id(), Some(TodoId::new(2)));
    let delete = press(&mut app, KeyCode::Char('d'));
    assert!(matches!(&delete[..], [SyncRequest::Delete { id, .. }] if *id == TodoId::new(2)));

    // Both records are busy now; bulk actions skip them.
    assert!(press(&mut app, KeyCode::Char('a')).is_empty());
    assert!(press(&mut app, KeyCode::Char('c')).is_empty());
}

#[test]
fn filter_keys_change_visible_rows_and_clamp_selection() {
    let mut app = app_with(vec![
        todo(1, "a", false),
        todo(2, "b", true),
        todo(3, "c", false),
    ]);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_id(), Some(TodoId::new(3)));

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.session.filter(), StatusFilter::Completed);
    assert_eq!(app.selected_id(), Some(TodoId::new(2)));

    press(&mut app, KeyCode::Char('f'));
    assert_eq!(app.session.filter(), StatusFilter::All);
}

// ---------------------------------------------------------------------------
// Edit mode
// ---------------------------------------------------------------------------

#[test]
fn edit_confirms_on_enter() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.focus, Focus::Editing);
    assert_eq!(app.session.edit().unwrap().draft, "a");

    type_str(&mut app, "bc");
    let requests = press(&mut app, KeyCode::Enter);
    assert!(matches!(
        &requests[..],
        [SyncRequest::Update { patch, .. }] if patch.title == "abc"
    ));
    assert_eq!(app.focus, Focus::List);
    assert!(app.session.edit().is_none());
}

#[test]
fn edit_cancels_on_escape() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('e'));
    press(&mut app, KeyCode::Backspace);

    assert!(press(&mut app, KeyCode::Esc).is_empty());
    assert_eq!(app.focus, Focus::List);
    assert!(!app.should_quit);
    assert_eq!(app.session.store().get(TodoId::new(1)).unwrap().title, "a");
}

#[test]
fn leaving_the_edit_field_confirms() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);

    // Empty draft on focus loss deletes the record.
    let requests = press(&mut app, KeyCode::Tab);
    assert!(matches!(&requests[..], [SyncRequest::Delete { id, .. }] if *id == TodoId::new(1)));
    assert_eq!(app.focus, Focus::Input);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_records_footer_and_markers() {
    let mut app = app_with(vec![todo(1, "alpha", false), todo(2, "beta", true)]);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char(' '));

    let screen = render(&app);
    assert!(screen.contains("[ ] alpha ⋯"), "loading marker:\n{screen}");
    assert!(screen.contains("[✓] beta"));
    assert!(screen.contains("1 item left"));
    assert!(screen.contains("Clear completed"));
    assert!(screen.contains("toggle all"));
}

#[test]
fn empty_store_hides_footer_and_toggle_all() {
    let app = app_with(vec![]);
    let screen = render(&app);
    assert!(screen.contains("What needs to be done?"));
    assert!(!screen.contains("items left"));
    assert!(!screen.contains("toggle all"));
}

#[test]
fn renders_placeholder_and_banner() {
    let mut app = app_with(vec![]);
    press(&mut app, KeyCode::Enter);
    let screen = render(&app);
    assert!(screen.contains("Title should not be empty"));

    type_str(&mut app, "pending");
    press(&mut app, KeyCode::Enter);
    let screen = render(&app);
    assert!(screen.contains("[ ] pending ⋯"), "placeholder:\n{screen}");
    assert!(!screen.contains("Title should not be empty"));
}

#[test]
fn banner_dismisses_on_x() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    app.apply_outcome(SyncOutcome::Loaded(Err(todosync::api::ApiError::Status(500))), Instant::now());
    assert!(render(&app).contains("Unable to load todos"));

    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('x'));
    assert!(!render(&app).contains("Unable to load todos"));
}

#[test]
fn banner_dismisses_from_input_focus_without_typing() {
    let mut app = app_with(vec![]);
    type_str(&mut app, "  ");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.focus, Focus::Input);
    let screen = render(&app);
    assert!(screen.contains("Title should not be empty"));
    assert!(screen.contains("(Ctrl+X to dismiss)"));

    app.handle_key_event(
        KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        Instant::now(),
    );
    assert!(app.session.notification().is_none());
    assert_eq!(app.session.new_title(), "  ");
    assert!(!render(&app).contains("Title should not be empty"));

    // A plain `x` in the input is text, not a dismissal.
    type_str(&mut app, "x");
    assert_eq!(app.session.new_title(), "  x");
}

#[test]
fn banner_dismisses_while_editing_without_touching_the_draft() {
    let mut app = app_with(vec![todo(1, "a", false)]);
    app.apply_outcome(
        SyncOutcome::Loaded(Err(todosync::api::ApiError::Status(500))),
        Instant::now(),
    );
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.focus, Focus::Editing);

    app.handle_key_event(
        KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        Instant::now(),
    );
    assert!(app.session.notification().is_none());
    assert_eq!(app.focus, Focus::Editing);
    assert_eq!(app.session.edit().unwrap().draft, "a");
}

#[test]
fn warning_view_explains_missing_user() {
    let error = TodoSession::new(SessionOptions::default()).unwrap_err();
    assert_eq!(error, SessionError::MissingUser);

    let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
    terminal.draw(|frame| ui::warning::draw(frame, &error)).unwrap();
    let screen = screen(&terminal);
    assert!(screen.contains("no user id configured"));
    assert!(screen.contains("TODO_USER_ID"));
}
