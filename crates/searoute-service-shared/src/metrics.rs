//! Prometheus metrics for the sea route service.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Install the Prometheus recorder
//! - [`metrics_handler`]: Axum handler for the `/metrics` endpoint
//! - Voyage business metrics (routes planned, failures, waypoints, distance)
//!
//! # Example
//!
//! ```no_run
//! use searoute_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use searoute_lib::ErrorKind;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "false" disables collection (default: enabled)
    /// - `METRICS_PATH`: endpoint path (default: "/metrics")
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH").unwrap_or_else(|_| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder.
///
/// Must be called once at startup before metrics are recorded; later calls
/// fail with [`MetricsError::AlreadyInitialized`].
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// The installed Prometheus handle, if any.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Axum handler for the `/metrics` endpoint in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Voyage Metrics Helpers
// =============================================================================

/// Increment `searoute_routes_calculated_total` for a fully optimized voyage.
pub fn record_route_calculated(algorithm: &str) {
    metrics::counter!(
        "searoute_routes_calculated_total",
        "algorithm" => algorithm.to_string()
    )
    .increment(1);
}

/// Increment `searoute_routes_failed_total`, labelled with the error kind.
///
/// Partial results (direct route only) count as failures of their kind.
pub fn record_route_failed(reason: ErrorKind) {
    metrics::counter!(
        "searoute_routes_failed_total",
        "reason" => reason.as_str()
    )
    .increment(1);
}

/// Record the waypoint count of an optimized voyage.
pub fn record_route_waypoints(waypoints: usize, algorithm: &str) {
    metrics::histogram!(
        "searoute_route_waypoints",
        "algorithm" => algorithm.to_string()
    )
    .record(waypoints as f64);
}

/// Record the optimized voyage length in nautical miles.
pub fn record_route_distance(distance_nm: f64, algorithm: &str) {
    metrics::histogram!(
        "searoute_route_distance_nm",
        "algorithm" => algorithm.to_string()
    )
    .record(distance_nm);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert_eq!(init_metrics(&config), Err(MetricsError::Disabled));
    }

    #[test]
    fn test_metrics_handler_returns_prometheus_format() {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let output = rt.block_on(async { metrics_handler().await });

        assert!(
            output.contains('#') || output.is_empty(),
            "metrics output should be Prometheus text or the not-initialized comment"
        );
    }

    #[test]
    fn test_voyage_metrics_record_without_recorder() {
        record_route_calculated("a-star");
        record_route_failed(ErrorKind::NoRoute);
        record_route_failed(ErrorKind::SearchTimeout);
        record_route_waypoints(42, "dijkstra");
        record_route_distance(8215.4, "a-star");
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
