//! Configuration for the mock collection server.
//!
//! Layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/todosync-mock/config.toml`)
//! 4. Compiled defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when loading mock server configuration.
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

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct MockConfigFile {
    server: ServerFileConfig,
}

/// `[server]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    seed_user: Option<u64>,
    latency_ms: Option<u64>,
}

/// CLI arguments for the mock server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "In-memory todo collection server")]
pub struct MockCliArgs {
    /// Address to bind the server to.
    #[arg(short, long, env = "TODOSYNC_MOCK_ADDR")]
    pub bind: Option<String>,

    /// Seed a few sample todos for this user id.
    #[arg(long)]
    pub seed_user: Option<u64>,

    /// Delay added before every response, in milliseconds.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Path to config file (default: `~/.config/todosync-mock/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TODOSYNC_MOCK_LOG")]
    pub log_level: String,
}

/// Fully resolved mock server configuration.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Address to bind to.
    pub bind_addr: String,
    /// User to seed sample records for, if any.
    pub seed_user: Option<u64>,
    /// Delay before every response.
    pub latency: Duration,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9300".to_string(),
            seed_user: None,
            latency: Duration::ZERO,
            log_level: "info".to_string(),
        }
    }
}

impl MockConfig {
    /// Loads configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &MockCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    fn resolve(cli: &MockCliArgs, file: &MockConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            seed_user: cli.seed_user.or(file.server.seed_user),
            latency: cli
                .latency_ms
                .or(file.server.latency_ms)
                .map_or(defaults.latency, Duration::from_millis),
            log_level: cli.log_level.clone(),
        }
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<MockConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(MockConfigFile::default());
    };
    let path = config_dir.join("todosync-mock").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MockConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
