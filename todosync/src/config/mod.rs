//! Configuration for the `todosync` client.
//!
//! Layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/todosync/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config`
//! path that doesn't exist is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use todosync_proto::todo::UserId;

use crate::session::{BatchPolicy, SessionOptions};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (every field optional for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    user_id: Option<u64>,
    request_timeout_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

/// `[ui]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    notification_secs: Option<u64>,
    poll_timeout_ms: Option<u64>,
    toggle_all_policy: Option<BatchPolicy>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Default address of the collection endpoint (the mock server's default).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9300";

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- API --
    /// Base URL the `/todos` collection hangs off.
    pub base_url: String,
    /// Owner of the collection; `None` shows the configuration warning.
    pub user_id: Option<UserId>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Capacity of the outcome channel.
    pub channel_capacity: usize,

    // -- UI --
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Reconciliation policy for the bulk toggle.
    pub toggle_all_policy: BatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
            request_timeout: Duration::from_secs(10),
            channel_capacity: 256,
            notification_ttl: Duration::from_secs(3),
            poll_timeout: Duration::from_millis(50),
            toggle_all_policy: BatchPolicy::AllOrNothing,
        }
    }
}

impl ClientConfig {
    /// Loads configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .api_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            user_id: cli.user_id.or(file.api.user_id).map(UserId::new),
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            channel_capacity: file
                .api
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
            notification_ttl: file
                .ui
                .notification_secs
                .map_or(defaults.notification_ttl, Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            toggle_all_policy: cli
                .toggle_all_policy
                .or(file.ui.toggle_all_policy)
                .unwrap_or(defaults.toggle_all_policy),
        }
    }

    /// The session settings carried by this configuration.
    #[must_use]
    pub const fn to_session_options(&self) -> SessionOptions {
        SessionOptions {
            user_id: self.user_id,
            notification_ttl: self.notification_ttl,
            toggle_all_policy: self.toggle_all_policy,
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal client for a remote todo collection")]
pub struct CliArgs {
    /// Base URL of the todo collection.
    #[arg(long, env = "TODO_API_URL")]
    pub api_url: Option<String>,

    /// Id of the user whose todos to show.
    #[arg(long, env = "TODO_USER_ID")]
    pub user_id: Option<u64>,

    /// Bulk toggle reconciliation (`all-or-nothing` or `per-record`).
    #[arg(long, env = "TODOSYNC_TOGGLE_ALL_POLICY")]
    pub toggle_all_policy: Option<BatchPolicy>,

    /// Path to config file (default: `~/.config/todosync/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TODOSYNC_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/todosync.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Reads and parses a TOML config file.
///
/// An explicit path must exist; the default path is optional.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("todosync").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
