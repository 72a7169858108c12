//! `todosync` — terminal client for a remote todo collection.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/todosync/config.toml`).
//!
//! ```bash
//! # Against the local mock collection
//! cargo run --bin todosync-mock &
//! cargo run --bin todosync -- --user-id 1
//!
//! # Or via environment variables
//! TODO_API_URL=http://127.0.0.1:9300 TODO_USER_ID=1 cargo run --bin todosync
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use todosync::api::http::HttpTodoApi;
use todosync::app::App;
use todosync::config::{CliArgs, ClientConfig};
use todosync::session::{SessionError, TodoSession};
use todosync::sync::{SyncDriver, SyncOutcome};
use todosync::ui;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; ratatui owns stdout.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let api = match HttpTodoApi::new(&config.base_url, config.request_timeout) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    tracing::info!(base_url = %api.base_url(), "todosync starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match TodoSession::new(config.to_session_options()) {
        Ok(session) => run_app(&mut terminal, App::new(session), api, &config).await,
        Err(e) => {
            tracing::warn!(error = %e, "session not started");
            run_warning(&mut terminal, &e, &config)
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("todosync exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todosync.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main loop: draw, drain outcomes, tick, poll keys, dispatch.
async fn run_app(
    terminal: &mut Tui,
    mut app: App,
    api: HttpTodoApi,
    config: &ClientConfig,
) -> io::Result<()> {
    let (driver, mut outcomes) = SyncDriver::with_capacity(Arc::new(api), config.channel_capacity);
    driver.dispatch(app.session.load());

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        drain_outcomes(&mut app, &mut outcomes);
        app.tick(Instant::now());

        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let requests = app.handle_key_event(key, Instant::now());
            driver.dispatch_all(requests);
        }

        if app.should_quit {
            tracing::info!(
                pending = app.session.pending_operations(),
                "quitting, in-flight outcomes will be dropped"
            );
            return Ok(());
        }
    }
}

/// Applies every outcome that has already arrived.
fn drain_outcomes(app: &mut App, rx: &mut mpsc::Receiver<SyncOutcome>) {
    while let Ok(outcome) = rx.try_recv() {
        app.apply_outcome(outcome, Instant::now());
    }
}

/// Shows the configuration warning until the user quits. No core logic
/// runs in this mode.
fn run_warning(terminal: &mut Tui, error: &SessionError, config: &ClientConfig) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::warning::draw(frame, error))?;

        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('c'))
        {
            return Ok(());
        }
    }
}
