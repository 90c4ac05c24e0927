//! Training Notebook API Server
//!
//! Run with: cargo run --bin notebook-api
//!
//! # Configuration
//!
//! Settings come from `--config` or the default config locations, then
//! environment variables:
//! - `NOTEBOOK_HOST`: Host to bind to (default: 0.0.0.0)
//! - `NOTEBOOK_PORT`: Port to listen on (default: 8080)
//! - `NOTEBOOK_STORAGE`: `memory` or `sqlite` (default: memory)
//! - `NOTEBOOK_DB_PATH`: SQLite database file
//! - `NOTEBOOK_LOG_LEVEL`, `NOTEBOOK_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Full filter directive, overrides the log level

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use training_notebook::api::{serve, AppState};
use training_notebook::config::Config;
use training_notebook::{logging, sets};

#[derive(Parser)]
#[command(name = "notebook-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Training notebook REST API server")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, report) = Config::resolve(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(&config.logging).context("Failed to initialize logging")?;
    report.log();

    tracing::info!("Starting Training Notebook API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(backend = ?config.storage.backend, "Opening set store");

    let store = sets::open_store(&config.storage).context("Failed to open set store")?;
    match store.count() {
        Ok(count) => tracing::info!(count, "Set store ready"),
        Err(e) => tracing::warn!("Set store not readable yet: {}", e),
    }

    let state = AppState::new(store, config.server.clone());

    tracing::info!("Starting server on {}", config.server.addr());
    serve(state, &config.server).await?;

    tracing::info!("Training Notebook API server stopped");
    Ok(())
}
