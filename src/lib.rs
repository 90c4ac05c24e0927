//! # Training Notebook
//!
//! Workout set tracking: a REST backend that stores sets and a set list
//! client that fetches `/sets` once and renders it as a table.
//!
//! ## Modules
//!
//! - [`client`]: The `SetList` component, its sources and renderers
//! - [`sets`]: Set model, validation and stores (memory, SQLite)
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`import`]: CSV import of sets
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use training_notebook::client::{HttpSetSource, SetList};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let list = SetList::new(Arc::new(HttpSetSource::new("http://localhost:8080")?));
//!
//!     // One request; failures are logged and leave the list empty
//!     list.mount().await;
//!
//!     println!("{} sets", list.rows().await.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod import;
pub mod logging;
pub mod sets;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use client::{FetchError, HttpSetSource, SetList, SetListState, SetSource, StoreSetSource};

pub use config::{
    ClientConfig, Config, ConfigError, LoggingConfig, ServerConfig, StorageBackend,
    StorageConfig,
};

pub use sets::{
    MemorySetStore, NewSet, Set, SetId, SetRecord, SetStore, SetStoreError, SqliteSetStore,
};
