//! Data Transfer Objects
//!
//! Response types that are not domain types. Sets travel as
//! `crate::sets::Set` (responses) and `crate::sets::NewSet` (request bodies).

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Set store status
    pub storage: String,
    /// Number of stored sets, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_count: Option<usize>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
