//! REST API handlers.
//!
//! Health reads go through the endpoint read model and always return a
//! body; the HTTP status only mirrors the health status (503 on `DOWN`).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use bridge_health::{AggregateSnapshot, HealthStatus, IntegrationHealth};

use crate::ApiState;

fn health_response(snapshot: AggregateSnapshot) -> impl IntoResponse {
    let code = match snapshot.status {
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Up | HealthStatus::Unknown => StatusCode::OK,
    };
    (code, Json(snapshot))
}

// ── Health ─────────────────────────────────────────────────────

/// GET /v1/health
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.endpoint.invoke().await;
    health_response(snapshot)
}

/// GET /v1/health/cached
pub async fn cached_health(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.endpoint.cached();
    health_response((*snapshot).clone())
}

// ── Applications ───────────────────────────────────────────────

/// GET /v1/applications
pub async fn list_applications(State(state): State<ApiState>) -> impl IntoResponse {
    use bridge_health::ApplicationRegistry;
    Json(state.registry.applications())
}

/// Application health report body.
#[derive(serde::Deserialize)]
pub struct ReportRequest {
    pub name: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// PUT /v1/applications/{id}
pub async fn report_application(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<ReportRequest>,
) -> impl IntoResponse {
    let record = IntegrationHealth {
        id: id.clone(),
        name: req.name,
        status: req.status,
        message: req.message,
    };

    let created = state.registry.register(record.clone());
    info!(%id, status = %record.status, created, "application health reported");

    let code = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (code, Json(record))
}
