//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ServerConfig;
use crate::sets::{SetStore, SetStoreResult};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where sets are kept
    pub store: Arc<dyn SetStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SetStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Run a store operation on the blocking pool
    ///
    /// Store calls may take a mutex and touch disk (SQLite), so they stay off
    /// the async worker threads.
    pub async fn with_store<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&dyn SetStore) -> SetStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("Set store task failed: {}", e)))?;

        Ok(result?)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
