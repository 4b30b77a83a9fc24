//! JSON envelopes and plain-text renderings shared by the CLI and HTTP service.
//!
//! Every payload carries a `success` flag. Failures add `error` and
//! `error_kind`; a partial route failure also carries the direct route.

use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, ErrorKind};
use crate::geodesy::Coordinate;
use crate::hazard::HazardZone;
use crate::ports::{Port, PortRegistry};
use crate::routing::{PlannerDiagnostics, RouteResult, VoyageEndpoint};
use crate::vessel::Metrics;

/// Success or failure envelope around a payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T: Serialize> {
    Success(SuccessBody<T>),
    Failure(FailureBody),
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessBody<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    pub error_kind: ErrorKind,
    #[serde(flatten)]
    pub partial: Option<PartialRoute>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success(SuccessBody {
            success: true,
            data,
        })
    }

    pub fn failure(error: &Error) -> Self {
        Self::failure_message(error.to_string(), error.kind())
    }

    pub fn failure_message(message: impl Into<String>, kind: ErrorKind) -> Self {
        ApiResponse::Failure(FailureBody {
            success: false,
            error: message.into(),
            error_kind: kind,
            partial: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// Error classification for failures.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure(body) => Some(body.error_kind),
        }
    }
}

// =============================================================================
// Port listing
// =============================================================================

/// Port entry in the listing payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortSummary {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
}

impl From<&Port> for PortSummary {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            lat: port.coordinate.lat,
            lon: port.coordinate.lon,
            country: port.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortList {
    pub ports: Vec<PortSummary>,
}

pub type PortListResponse = ApiResponse<PortList>;

/// List every port in dataset order.
pub fn list_ports(registry: &PortRegistry) -> PortListResponse {
    ports_response(registry.list().iter())
}

/// List ports in one region, ignoring case.
pub fn list_ports_in_region(registry: &PortRegistry, region: &str) -> PortListResponse {
    ports_response(registry.by_region(region).into_iter())
}

fn ports_response<'a>(ports: impl Iterator<Item = &'a Port>) -> PortListResponse {
    ApiResponse::success(PortList {
        ports: ports.map(PortSummary::from).collect(),
    })
}

// =============================================================================
// Route payload
// =============================================================================

/// Metrics rounded to cents / hundredths for presentation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MetricsView {
    pub distance_nm: f64,
    pub fuel_cost_usd: f64,
    pub emissions_tons: f64,
    pub fuel_tons: f64,
    pub waypoint_count: usize,
    pub estimated_duration_hours: f64,
}

impl From<&Metrics> for MetricsView {
    fn from(metrics: &Metrics) -> Self {
        Self {
            distance_nm: round2(metrics.distance_nm),
            fuel_cost_usd: round2(metrics.fuel_cost_usd),
            emissions_tons: round2(metrics.emissions_tons),
            fuel_tons: round2(metrics.fuel_tons),
            waypoint_count: metrics.waypoint_count,
            estimated_duration_hours: round2(metrics.estimated_duration_hours),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoutesView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<Vec<Coordinate>>,
    pub direct: Vec<Coordinate>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsPair {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<MetricsView>,
    pub direct: MetricsView,
}

/// Full route payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteData {
    pub origin: VoyageEndpoint,
    pub destination: VoyageEndpoint,
    pub routes: RoutesView,
    pub hazards: Vec<HazardZone>,
    pub metrics: MetricsPair,
    pub radius_unit: &'static str,
    pub planner: PlannerDiagnostics,
}

/// Direct-route data attached to a failed optimized search.
pub type PartialRoute = RouteData;

pub type RouteResponse = ApiResponse<RouteData>;

impl ApiResponse<RouteData> {
    /// Build the route envelope; a failed optimized search yields a failure
    /// that still carries the direct route.
    pub fn from_result(result: &RouteResult) -> Self {
        let optimized = result.optimized();
        let data = RouteData {
            origin: result.origin.clone(),
            destination: result.destination.clone(),
            routes: RoutesView {
                optimized: optimized.ok().map(|route| route.waypoints.clone()),
                direct: result.direct.waypoints.clone(),
            },
            hazards: result.hazards.clone(),
            metrics: MetricsPair {
                optimized: optimized.ok().map(|route| MetricsView::from(&route.metrics)),
                direct: MetricsView::from(&result.direct.metrics),
            },
            radius_unit: "nm",
            planner: result.planner.clone(),
        };

        match optimized {
            Ok(_) => ApiResponse::success(data),
            Err(error) => ApiResponse::Failure(FailureBody {
                success: false,
                error: error.to_string(),
                error_kind: error.kind(),
                partial: Some(data),
            }),
        }
    }
}

// =============================================================================
// Text rendering
// =============================================================================

/// Render the port catalog as an aligned table.
pub fn render_ports_text(ports: &[&Port]) -> String {
    let mut buffer = String::new();
    let width = ports.iter().map(|port| port.name.len()).max().unwrap_or(4);
    for port in ports {
        let _ = writeln!(
            buffer,
            "{:<width$}  {:>9.4} {:>10.4}  {}",
            port.name,
            port.coordinate.lat,
            port.coordinate.lon,
            port.country,
            width = width
        );
    }
    let _ = writeln!(buffer, "{} ports", ports.len());
    buffer
}

/// Render a planned voyage for terminal output.
pub fn render_route_text(result: &RouteResult) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Route: {} -> {} (algorithm: {})",
        result.origin.name, result.destination.name, result.planner.algorithm
    );

    match result.optimized() {
        Ok(route) => {
            write_metrics(&mut buffer, "Optimized", &route.metrics);
            if let (Some(resolution), Some(margin)) =
                (result.planner.resolution_deg, result.planner.margin_deg)
            {
                let _ = writeln!(
                    buffer,
                    "  grid {resolution:.3}° / margin {margin}° / {} nodes / {} expansions",
                    result.planner.nodes, result.planner.expansions
                );
            }
        }
        Err(error) => {
            let _ = writeln!(buffer, "Optimized: unavailable ({error})");
        }
    }
    write_metrics(&mut buffer, "Direct", &result.direct.metrics);

    if !result.hazards.is_empty() {
        let _ = writeln!(buffer, "Hazards:");
        for hazard in &result.hazards {
            let _ = writeln!(buffer, "  {} (radius {} nm)", hazard.label(), hazard.radius_nm);
        }
    }

    if let Ok(route) = result.optimized() {
        let _ = writeln!(buffer, "Waypoints:");
        for (index, point) in route.waypoints.iter().enumerate() {
            let _ = writeln!(
                buffer,
                "{index:>4}: {:>9.4} {:>10.4}",
                point.lat, point.lon
            );
        }
    }
    buffer
}

fn write_metrics(buffer: &mut String, label: &str, metrics: &Metrics) {
    let view = MetricsView::from(metrics);
    let _ = writeln!(
        buffer,
        "{label}: {:.2} nm, {:.2} t fuel, ${:.2}, {:.2} t CO2, {:.1} h, {} waypoints",
        view.distance_nm,
        view.fuel_tons,
        view.fuel_cost_usd,
        view.emissions_tons,
        view.estimated_duration_hours,
        view.waypoint_count
    );
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
