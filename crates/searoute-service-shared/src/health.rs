//! Health check handlers.
//!
//! `/api/health` is the plain liveness check clients poll; `/health/live` and
//! `/health/ready` are the probe endpoints used by orchestrators.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok", "healthy" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    /// RFC 3339 time the check ran.
    pub checked_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports_loaded: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_polygons: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazards_loaded: Option<usize>,
}

impl HealthStatus {
    fn base(status: impl Into<String>, service: &str, version: &str) -> Self {
        Self {
            status: status.into(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: chrono::Utc::now().to_rfc3339(),
            ports_loaded: None,
            land_polygons: None,
            hazards_loaded: None,
        }
    }

    pub fn alive(service: &str, version: &str) -> Self {
        Self::base("ok", service, version)
    }

    /// Ready status with reference data counts.
    pub fn ready(service: &str, version: &str, state: &AppState) -> Self {
        Self {
            ports_loaded: Some(state.registry().len()),
            land_polygons: Some(state.land().len()),
            hazards_loaded: Some(state.hazards().len()),
            ..Self::base("ok", service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self::base(format!("not_ready: {}", reason), service, version)
    }
}

/// `GET /api/health`: always `{"status": "healthy"}`.
pub async fn health_api() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// `GET /health/live`: 200 while the process is running.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`: 200 once at least one port is loaded, 503 otherwise.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"searoute-service-shared","version":"0.1.0","checked_at":"...","ports_loaded":30,"land_polygons":41,"hazards_loaded":0}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if state.registry().is_empty() {
        let status = HealthStatus::not_ready(service, version, "no ports loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, &state);
    (StatusCode::OK, Json(status)).into_response()
}
