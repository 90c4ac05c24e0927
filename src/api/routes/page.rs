//! Page Route
//!
//! - GET / - Navigation shell with the set list rendered server-side

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::client::{render, SetList, StoreSetSource};

/// GET /
///
/// Mounts a fresh `SetList` against the store and returns the full page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let source = StoreSetSource::new(Arc::clone(&state.store));
    let list = SetList::new(Arc::new(source));

    list.mount().await;

    Html(render::page_html(&list.render_html().await))
}
