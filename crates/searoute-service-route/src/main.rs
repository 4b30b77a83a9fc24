//! Sea route planning HTTP service.
//!
//! # Endpoints
//!
//! - `GET /api/ports` - List ports, optionally `?region=`
//! - `POST /api/generate-route` - Plan a voyage between two ports
//! - `GET /api/health` - Plain health check
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `SEAROUTE_PORTS_PATH`, `SEAROUTE_LAND_PATH`, `SEAROUTE_HAZARDS_PATH` - Optional data files
//! - `SEAROUTE_SEARCH_TIMEOUT_MS`, `SEAROUTE_MAX_EXPANSIONS`, `SEAROUTE_MAX_NODES` - Planner budget
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use searoute_lib::output::list_ports_in_region;
use searoute_lib::{generate_route, list_ports, ErrorKind, RouteResponse};
use searoute_service_shared::{
    extract_or_generate_request_id, from_lib_error, health_api, health_live, health_ready,
    init_logging, init_metrics, metrics_handler, record_route_calculated, record_route_distance,
    record_route_failed, record_route_waypoints, AppState, ErrorResponse, GenerateRouteRequest,
    LoggingConfig, MetricsConfig, MetricsLayer, PortsQuery, ServiceConfig, ServiceResponse,
    Validate,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = ServiceConfig::from_env()?;
    info!(port, "starting sea route service");

    let state = AppState::load(&config).map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;

    let app = build_router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/api/ports", get(ports_handler))
        .route("/api/generate-route", post(generate_route_handler))
        .route("/api/health", get(health_api))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle `GET /api/ports`.
async fn ports_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PortsQuery>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers);

    if let Err(problem) = query.validate(request_id.as_str()) {
        return problem.into_response();
    }

    let envelope = match query.region.as_deref() {
        Some(region) => list_ports_in_region(state.registry(), region.trim()),
        None => list_ports(state.registry()),
    };
    ServiceResponse::from_envelope(envelope)
        .with_request_id(request_id.as_str())
        .into_response()
}

/// Handle `POST /api/generate-route`.
async fn generate_route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRouteRequest>, JsonRejection>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers);

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_route_failed(ErrorKind::InvalidRequest);
            return ErrorResponse::bad_request(rejection.body_text(), request_id.as_str())
                .into_response();
        }
    };

    info!(
        request_id = %request_id,
        origin = %request.origin,
        destination = %request.destination,
        algorithm = %request.algorithm,
        hazards = request.hazards.len(),
        "handling route request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed(ErrorKind::InvalidRequest);
        return problem.into_response();
    }

    let lib_request = request.to_route_request(state.planner());
    let planning_state = state.clone();
    let planned = tokio::task::spawn_blocking(move || {
        generate_route(
            planning_state.registry(),
            planning_state.land(),
            planning_state.hazards(),
            &lib_request,
        )
    })
    .await;

    let result = match planned {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!(request_id = %request_id, error = %e, "route request rejected");
            record_route_failed(e.kind());
            return from_lib_error(&e, request_id.as_str()).into_response();
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "planning task failed");
            record_route_failed(ErrorKind::Internal);
            return ErrorResponse::internal_error("route planning failed", request_id.as_str())
                .into_response();
        }
    };

    let algorithm = result.planner.algorithm.to_string();
    match result.optimized() {
        Ok(route) => {
            record_route_calculated(&algorithm);
            record_route_waypoints(route.waypoints.len(), &algorithm);
            record_route_distance(route.metrics.distance_nm, &algorithm);
            info!(
                request_id = %request_id,
                distance_nm = route.metrics.distance_nm,
                waypoints = route.waypoints.len(),
                "route computed successfully"
            );
        }
        Err(e) => {
            record_route_failed(e.kind());
            info!(
                request_id = %request_id,
                error = %e,
                "returning direct route only"
            );
        }
    }

    ServiceResponse::from_envelope(RouteResponse::from_result(&result))
        .with_request_id(request_id.as_str())
        .into_response()
}
