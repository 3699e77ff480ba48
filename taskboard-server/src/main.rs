//! `TaskBoard` task API server.
//!
//! An axum HTTP server holding the task list in a JSON data file.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:5000 with ./tasks.json
//! cargo run --bin taskboard-server
//!
//! # Run on custom address and data file
//! cargo run --bin taskboard-server -- --bind 127.0.0.1:8080 --data-file /var/lib/tasks.json
//!
//! # Or via environment variables
//! TASKBOARD_ADDR=127.0.0.1:8080 cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::server;
use taskboard_server::store::TaskFile;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskboard api server");

    let store = match TaskFile::open(&config.data_file).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to open data file");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %store.path().display(), "serving tasks from data file");

    match server::start_server(&config.bind_addr.to_string(), Arc::new(store)).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task api listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task api server");
            std::process::exit(1);
        }
    }
}
