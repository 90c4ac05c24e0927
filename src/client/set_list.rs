//! Set List Component
//!
//! Fetches the set list once when mounted and renders it as a table.
//!
//! # State
//!
//! ```text
//! Empty ──(fetch ok)──▶ Loaded(records)
//!   │
//!   └──(fetch failed)──▶ Empty   (warning logged, nothing surfaced)
//! ```
//!
//! A failed fetch never replaces rows that were already shown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::render;
use super::source::{FetchError, SetSource};
use crate::sets::SetRecord;

/// Render state of a `SetList`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SetListState {
    /// Nothing fetched yet, or the fetch failed
    #[default]
    Empty,
    /// Snapshot from the last successful fetch
    Loaded(Vec<SetRecord>),
}

impl SetListState {
    /// Records to render; empty while `Empty`
    pub fn records(&self) -> &[SetRecord] {
        match self {
            SetListState::Empty => &[],
            SetListState::Loaded(records) => records,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SetListState::Loaded(_))
    }
}

/// A table of workout sets backed by a `SetSource`
pub struct SetList {
    source: Arc<dyn SetSource>,
    state: Arc<RwLock<SetListState>>,
    mounted: AtomicBool,
}

impl SetList {
    /// Create an unmounted list in the `Empty` state
    pub fn new(source: Arc<dyn SetSource>) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(SetListState::Empty)),
            mounted: AtomicBool::new(false),
        }
    }

    /// Whether `mount` or `spawn_mount` has been called
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Claim the single mount; false if already mounted
    fn begin_mount(&self) -> bool {
        if self.mounted.swap(true, Ordering::AcqRel) {
            tracing::debug!(source = %self.source.describe(), "Set list already mounted");
            return false;
        }
        true
    }

    /// Fetch the set list and wait for the result
    ///
    /// Issues exactly one request on the first call. Later calls do nothing.
    /// Fetch failures are logged and leave the current state in place.
    pub async fn mount(&self) {
        if !self.begin_mount() {
            return;
        }

        let result = self.source.fetch_sets().await;
        apply(&self.source.describe(), &self.state, result).await;
    }

    /// Fetch the set list on a background task
    ///
    /// The task only holds a weak handle to the list's state: if the list is
    /// dropped before the response arrives, the response is discarded.
    /// Returns `None` if the list was already mounted.
    pub fn spawn_mount(&self) -> Option<JoinHandle<()>> {
        if !self.begin_mount() {
            return None;
        }

        let source = Arc::clone(&self.source);
        let state = Arc::downgrade(&self.state);

        Some(tokio::spawn(async move {
            let result = source.fetch_sets().await;

            match state.upgrade() {
                Some(state) => apply(&source.describe(), &state, result).await,
                None => tracing::debug!(
                    source = %source.describe(),
                    "Set list dropped before response arrived"
                ),
            }
        }))
    }

    /// Copy of the current state
    pub async fn state(&self) -> SetListState {
        self.state.read().await.clone()
    }

    /// Records currently rendered
    pub async fn rows(&self) -> Vec<SetRecord> {
        self.state.read().await.records().to_vec()
    }

    /// Heading and HTML table for the current state
    pub async fn render_html(&self) -> String {
        render::set_list_html(self.state.read().await.records())
    }

    /// Plain-text table for the current state
    pub async fn render_text(&self) -> String {
        render::set_table_text(self.state.read().await.records())
    }
}

async fn apply(
    source: &str,
    state: &RwLock<SetListState>,
    result: Result<Vec<SetRecord>, FetchError>,
) {
    match result {
        Ok(records) => {
            tracing::info!(source = %source, count = records.len(), "Loaded sets");
            *state.write().await = SetListState::Loaded(records);
        }
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "Failed to load sets");
        }
    }
}
