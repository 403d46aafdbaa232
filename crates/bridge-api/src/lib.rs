//! bridge-api — REST API for the integration bridge health engine.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/v1/health` | Live health summary (re-probes, merges now) |
//! | GET | `/v1/health/cached` | Latest scheduled snapshot, no probing |
//! | GET | `/v1/applications` | Registered applications in order |
//! | PUT | `/v1/applications/{id}` | Report one application's health |
//!
//! Health routes answer 503 when the overall status is `DOWN`, 200
//! otherwise — they never error.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};

use bridge_health::AsyncCompositeHealthEndpoint;
use bridge_registry::InMemoryApplicationRegistry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub endpoint: Arc<AsyncCompositeHealthEndpoint>,
    pub registry: Arc<InMemoryApplicationRegistry>,
}

/// Build the complete API router.
pub fn build_router(
    endpoint: Arc<AsyncCompositeHealthEndpoint>,
    registry: Arc<InMemoryApplicationRegistry>,
) -> Router {
    let state = ApiState { endpoint, registry };

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/health/cached", get(handlers::cached_health))
        .route("/applications", get(handlers::list_applications))
        .route("/applications/{id}", put(handlers::report_application))
        .with_state(state);

    Router::new().nest("/v1", routes)
}
