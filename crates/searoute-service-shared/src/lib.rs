//! Shared infrastructure for the sea route HTTP service.
//!
//! - [`AppState`]: port registry, coastline, hazard catalog and planner defaults
//! - [`health_live`] / [`health_ready`]: liveness and readiness handlers
//! - [`ErrorResponse`]: the `{success: false, error, error_kind}` envelope and status mapping
//! - [`ServiceResponse`]: payload plus status and request ID
//! - [`metrics`]: Prometheus recorder and voyage counters
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request ID propagation and HTTP metrics
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; all planning lives in `searoute-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call searoute-lib on a blocking thread                   │
//! │  - Map the envelope to a status code                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! Enable the `test-utils` feature to reach [`test_utils`] from dependent crates.

#![deny(warnings)]

mod error_response;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error_response::{from_lib_error, status_for_kind, ErrorResponse};
pub use health::{health_api, health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_route_calculated, record_route_distance,
    record_route_failed, record_route_waypoints, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use request::{
    GenerateRouteRequest, PortsQuery, Validate, VesselChoice, VesselOverrides, MAX_SAMPLES,
    RESOLUTION_RANGE_DEG,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError, ServiceConfig};
