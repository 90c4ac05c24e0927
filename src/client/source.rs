//! Set sources
//!
//! Where a `SetList` gets its records from. `HttpSetSource` issues
//! `GET {base}/sets`; `StoreSetSource` reads a `SetStore` in-process for
//! server-side rendering.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::sets::{SetRecord, SetStore};

/// Path of the set collection, relative to the API base URL
pub const SETS_PATH: &str = "/sets";

/// Anything that can produce a snapshot of set records
#[async_trait]
pub trait SetSource: Send + Sync {
    /// Fetch all records, in the order they should be displayed
    async fn fetch_sets(&self) -> Result<Vec<SetRecord>, FetchError>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

/// Errors raised while fetching the set list
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the backend
    #[error("Set endpoint unavailable: {0}")]
    Unavailable(String),

    /// Other transport failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not a JSON array of set records
    #[error("Malformed set list: {0}")]
    Decode(String),

    /// In-process source failed
    #[error("Set source failed: {0}")]
    Source(String),
}

impl FetchError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

/// Fetches `/sets` over HTTP
pub struct HttpSetSource {
    client: Client,
    url: String,
}

impl HttpSetSource {
    /// Source for the given API base URL with the default client timeout
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::from_config(&ClientConfig {
            api_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: sets_url(&config.api_url),
        })
    }

    /// Full URL that will be requested
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// `{base}/sets`, tolerating a trailing slash on the base
pub fn sets_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SETS_PATH)
}

#[async_trait]
impl SetSource for HttpSetSource {
    async fn fetch_sets(&self) -> Result<Vec<SetRecord>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(FetchError::from_send)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }
}

/// Reads sets straight from a store
pub struct StoreSetSource {
    store: Arc<dyn SetStore>,
}

impl StoreSetSource {
    pub fn new(store: Arc<dyn SetStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SetSource for StoreSetSource {
    async fn fetch_sets(&self) -> Result<Vec<SetRecord>, FetchError> {
        // SQLite reads block; keep them off the async workers
        let store = Arc::clone(&self.store);
        let sets = tokio::task::spawn_blocking(move || store.list())
            .await
            .map_err(|e| FetchError::Source(e.to_string()))?
            .map_err(|e| FetchError::Source(e.to_string()))?;
        Ok(sets.iter().map(SetRecord::from).collect())
    }

    fn describe(&self) -> String {
        "set store".to_string()
    }
}
