//! HTTP API Client
//!
//! Reads the set list from the notebook REST API.

use gloo_net::http::Request;

use crate::state::sets::SetRecord;

/// Default API base URL: same origin, so the list is read from `/sets`
pub const DEFAULT_API_BASE: &str = "";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item("notebook_api_url").ok().flatten());

    normalize_base(stored.as_deref().unwrap_or(DEFAULT_API_BASE))
}

/// Strip trailing slashes so paths can be appended
pub fn normalize_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Fetch all sets, in server order
pub async fn fetch_sets() -> Result<Vec<SetRecord>, String> {
    let url = format!("{}/sets", get_api_base());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("{} returned {}", url, response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Read error: {}", e))?;

    parse_sets(&body)
}

/// Decode a `/sets` response body
pub fn parse_sets(body: &str) -> Result<Vec<SetRecord>, String> {
    serde_json::from_str(body).map_err(|e| format!("Parse error: {}", e))
}
