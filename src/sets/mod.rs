//! Workout sets
//!
//! - **types**: `Set`, `NewSet` (with validation) and the client-side `SetRecord`
//! - **store**: the `SetStore` trait and an in-memory implementation
//! - **sqlite**: SQLite-backed `SetStore`
//! - **error**: Error types

pub mod error;
pub mod sqlite;
pub mod store;
pub mod types;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

pub use error::{SetStoreError, SetStoreResult, ValidationError};
pub use sqlite::SqliteSetStore;
pub use store::{MemorySetStore, SetStore};
pub use types::{Cell, NewSet, Set, SetId, SetRecord, MAX_INTENSITY};

/// Open the store selected by configuration
pub fn open_store(config: &StorageConfig) -> SetStoreResult<Arc<dyn SetStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory set store");
            Ok(Arc::new(MemorySetStore::new()))
        }
        StorageBackend::Sqlite => {
            let path = config.db_path();
            tracing::info!("Using SQLite set store at {:?}", path);
            Ok(Arc::new(SqliteSetStore::open(&path)?))
        }
    }
}
