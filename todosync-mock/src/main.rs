//! `todosync-mock` — in-memory todo collection server.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 127.0.0.1:9300
//! cargo run --bin todosync-mock
//!
//! # Seed sample records for user 1 and slow every response down
//! cargo run --bin todosync-mock -- --seed-user 1 --latency-ms 400
//! ```

use std::sync::Arc;

use clap::Parser;
use todosync_mock::config::{MockCliArgs, MockConfig};
use todosync_mock::server::{self, MockState};
use todosync_mock::store::TodoCollection;
use todosync_proto::todo::UserId;

#[tokio::main]
async fn main() {
    let cli = MockCliArgs::parse();

    let config = match MockConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let collection = config
        .seed_user
        .map_or_else(TodoCollection::new, |user| {
            TodoCollection::with_sample(UserId::new(user))
        });
    let state = Arc::new(MockState::new(collection).with_latency(config.latency));

    tracing::info!(addr = %config.bind_addr, seed_user = ?config.seed_user, "starting todosync mock");

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "mock collection listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "mock server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start mock server");
            std::process::exit(1);
        }
    }
}
