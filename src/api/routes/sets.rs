//! Set Routes
//!
//! CRUD endpoints for the set resource.
//!
//! - GET /sets - List all sets
//! - POST /sets - Create a set
//! - GET /sets/:id - Get a specific set
//! - PUT /sets/:id - Replace a set
//! - DELETE /sets/:id - Delete a set

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::sets::{NewSet, Set, SetId};

/// GET /sets
///
/// All sets, oldest first. An empty store yields `[]`.
pub async fn list_sets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Set>>> {
    let sets = state.with_store(|store| store.list()).await?;
    Ok(Json(sets))
}

/// GET /sets/:id
pub async fn get_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Set>> {
    let id = parse_id(&id)?;
    let set = state.with_store(move |store| store.get(id)).await?;
    Ok(Json(set))
}

/// POST /sets
///
/// Validate and store a new set; the id is assigned by the store.
pub async fn create_set(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewSet>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Set>)> {
    let Json(new) = body?;
    new.validate()?;

    let set = state.with_store(move |store| store.add(new)).await?;
    tracing::info!(set_id = %set.id, movement = %set.movement, "Created set");

    Ok((StatusCode::CREATED, Json(set)))
}

/// PUT /sets/:id
pub async fn update_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<NewSet>, JsonRejection>,
) -> ApiResult<Json<Set>> {
    let id = parse_id(&id)?;
    let Json(update) = body?;
    update.validate()?;

    let set = state
        .with_store(move |store| store.update(id, update))
        .await?;
    tracing::info!(set_id = %id, "Updated set");

    Ok(Json(set))
}

/// DELETE /sets/:id
pub async fn delete_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.with_store(move |store| store.delete(id)).await?;
    tracing::info!(set_id = %id, "Deleted set");

    Ok(StatusCode::NO_CONTENT)
}

/// Set ids are non-negative integers
fn parse_id(raw: &str) -> ApiResult<SetId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid set id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), SetId(12));
        assert!(matches!(parse_id("-1"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_id("abc"), Err(ApiError::BadRequest(_))));
    }
}
