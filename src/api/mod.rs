//! Training Notebook REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Navigation shell and set table
//!
//! ## Sets
//! - `GET /sets` - List all sets
//! - `POST /sets` - Create a set
//! - `GET /sets/:id` - Get a set
//! - `PUT /sets/:id` - Replace a set
//! - `DELETE /sets/:id` - Delete a set
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use training_notebook::api::{serve, AppState};
//! use training_notebook::config::ServerConfig;
//! use training_notebook::sets::MemorySetStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let state = AppState::new(Arc::new(MemorySetStore::new()), config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let set_routes = Router::new()
        .route(
            "/",
            get(routes::sets::list_sets).post(routes::sets::create_set),
        )
        .route(
            "/:id",
            get(routes::sets::get_set)
                .put(routes::sets::update_set)
                .delete(routes::sets::delete_set),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/sets", set_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    serve_on(listener, state).await
}

/// Serve on an already-bound listener until a shutdown signal arrives
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), ApiError> {
    let router = build_router(state);

    tracing::info!("Training Notebook API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Training Notebook API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorResponse;
    use crate::sets::{MemorySetStore, NewSet, Set, SetStore};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    fn create_test_app(sets: Vec<NewSet>) -> (Router, Arc<MemorySetStore>) {
        let store = Arc::new(MemorySetStore::with_sets(sets).unwrap());
        let state = AppState::new(store.clone(), ServerConfig::default());
        (build_router(state), store)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("Content-Type", "application/json");
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

        app.oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app(vec![]);
        let response = send(app, "GET", "/health/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app(vec![NewSet::new("Squat", 5.0, 80.0)]);
        let response = send(app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let health: dto::HealthResponse =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.set_count, Some(1));
    }

    #[tokio::test]
    async fn test_list_sets_empty() {
        let (app, _) = create_test_app(vec![]);
        let response = send(app, "GET", "/sets", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_list_sets_in_order() {
        let (app, _) = create_test_app(vec![
            NewSet::new("Squat", 5.0, 80.0),
            NewSet::new("Bench", 8.0, 70.0),
        ]);
        let response = send(app, "GET", "/sets", None).await;
        let sets: Vec<serde_json::Value> =
            serde_json::from_str(&body_string(response).await).unwrap();

        assert_eq!(
            sets,
            vec![
                serde_json::json!({"id": 1, "movement": "Squat", "volume": 5.0, "intensity": 80.0}),
                serde_json::json!({"id": 2, "movement": "Bench", "volume": 8.0, "intensity": 70.0}),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_set() {
        let (app, store) = create_test_app(vec![]);
        let response = send(
            app,
            "POST",
            "/sets",
            Some(r#"{"movement": "Squat", "volume": 5, "intensity": 80}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Set = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(created.movement, "Squat");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_invalid_json() {
        let (app, _) = create_test_app(vec![]);
        let response = send(app, "POST", "/sets", Some("not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_missing_field() {
        let (app, store) = create_test_app(vec![]);
        let response = send(app, "POST", "/sets", Some(r#"{"movement": "Squat"}"#)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_validation_message() {
        let (app, _) = create_test_app(vec![]);
        let response = send(
            app,
            "POST",
            "/sets",
            Some(r#"{"movement": "Squat", "volume": 0, "intensity": 120}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(error.error.code, "VALIDATION_ERROR");
        assert!(error.error.message.contains("'volume' field must be greater than 0."));
        assert!(error.error.message.contains("'intensity' field must be no more than 100."));
    }

    #[tokio::test]
    async fn test_get_set() {
        let (app, _) = create_test_app(vec![NewSet::new("Squat", 5.0, 80.0)]);

        let response = send(app.clone(), "GET", "/sets/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(app.clone(), "GET", "/sets/2", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(app, "GET", "/sets/-4", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_set() {
        let (app, store) = create_test_app(vec![NewSet::new("Squat", 5.0, 80.0)]);

        let body = r#"{"movement": "Squat", "volume": 3, "intensity": 90}"#;
        let response = send(app.clone(), "PUT", "/sets/1", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get(crate::sets::SetId(1)).unwrap().volume, 3.0);

        let response = send(app, "PUT", "/sets/7", Some(body)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_set() {
        let (app, store) = create_test_app(vec![NewSet::new("Squat", 5.0, 80.0)]);

        let response = send(app.clone(), "DELETE", "/sets/1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.count().unwrap(), 0);

        let response = send(app, "DELETE", "/sets/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sqlite_backed_routes() {
        let store = Arc::new(crate::sets::SqliteSetStore::open_in_memory().unwrap());
        let app = build_router(AppState::new(store, ServerConfig::default()));

        let body = r#"{"movement": "Deadlift", "volume": 3, "intensity": 85}"#;
        let response = send(app.clone(), "POST", "/sets", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(app.clone(), "GET", "/sets", None).await;
        let sets: Vec<Set> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].movement, "Deadlift");

        let response = send(app.clone(), "GET", "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(app, "GET", "/", None).await;
        assert!(body_string(response)
            .await
            .contains("<td>Deadlift</td><td>3</td><td>85</td>"));
    }

    #[tokio::test]
    async fn test_index_page_renders_sets() {
        let (app, _) = create_test_app(vec![
            NewSet::new("Squat", 5.0, 80.0),
            NewSet::new("Bench", 8.0, 70.0),
        ]);
        let response = send(app, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains(">Sets</a>"));
        assert!(html.contains("<td>Squat</td><td>5</td><td>80</td>"));
        assert!(html.find("Squat").unwrap() < html.find("Bench").unwrap());
    }
}
