//! Voyage planning: orchestrates the obstacle model, graph builder, search,
//! great-circle baseline and metrics into a [`RouteResult`].
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`PlannerOptions`] - Lattice, widening and budget settings
//! - [`RouteRequest`] / [`VoyageRequest`] - Name-based and coordinate-based requests
//! - [`RouteResult`] - Optimized outcome, direct baseline and diagnostics
//! - [`generate_route`] / [`plan_voyage`] - Entry points
//!
//! # Partial results
//!
//! Once both endpoints are established, failures of the optimized search
//! (unreachable endpoint, no route, exhausted budget) do not fail the call.
//! They are stored in [`RouteResult::optimized`] while the direct route and
//! its metrics are still returned.

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::baseline::{great_circle, DEFAULT_SAMPLES};
use crate::error::{Endpoint, Error, Result};
use crate::geodesy::{normalize_lon, Coordinate};
use crate::graph::{
    build_navigable_graph, GraphOptions, NavigableGraph, DEFAULT_ENDPOINT_NEIGHBOURS,
    DEFAULT_MAX_NODES, DEFAULT_RESOLUTION_DEG,
};
use crate::hazard::HazardZone;
use crate::land::LandMask;
use crate::obstacles::Obstacles;
use crate::path::SearchBudget;
use crate::ports::{Port, PortRegistry};
use crate::vessel::{compute_metrics, Metrics, VesselProfile};

/// Margins tried in turn when a narrower search region has no route.
pub const DEFAULT_MARGIN_SCHEDULE_DEG: [f64; 3] = [5.0, 15.0, 35.0];

/// Supported search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uniform cost).
    Dijkstra,
    /// A* search (heuristic guided).
    #[default]
    #[serde(rename = "a-star", alias = "astar", alias = "a_star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a_star" | "a*" => Ok(RouteAlgorithm::AStar),
            other => Err(Error::InvalidOptions {
                message: format!("unknown algorithm '{other}', expected dijkstra or a-star"),
            }),
        }
    }
}

/// Lattice, widening and budget settings for the optimized search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    /// Starting lattice spacing; coarsened automatically to respect `max_nodes`.
    pub resolution_deg: f64,
    /// Bounding-box margins tried in order until a route is found.
    pub margin_schedule_deg: Vec<f64>,
    pub max_nodes: usize,
    pub endpoint_neighbours: usize,
    /// Shared by every widening attempt.
    pub budget: SearchBudget,
    /// Points sampled along the direct route.
    pub samples: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            resolution_deg: DEFAULT_RESOLUTION_DEG,
            margin_schedule_deg: DEFAULT_MARGIN_SCHEDULE_DEG.to_vec(),
            max_nodes: DEFAULT_MAX_NODES,
            endpoint_neighbours: DEFAULT_ENDPOINT_NEIGHBOURS,
            budget: SearchBudget::default(),
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl PlannerOptions {
    pub fn validate(&self) -> Result<()> {
        if self.margin_schedule_deg.is_empty() {
            return Err(Error::InvalidOptions {
                message: "margin schedule must not be empty".to_string(),
            });
        }
        for &margin in &self.margin_schedule_deg {
            self.graph_options(margin).validate()?;
        }
        Ok(())
    }

    fn graph_options(&self, margin_deg: f64) -> GraphOptions {
        GraphOptions {
            resolution_deg: self.resolution_deg,
            margin_deg,
            max_nodes: self.max_nodes,
            endpoint_neighbours: self.endpoint_neighbours,
        }
    }
}

/// Everything about a voyage except its endpoints.
#[derive(Debug, Clone, Default)]
pub struct VoyageSettings {
    /// Hazards supplied with the request, merged with the static catalog.
    pub hazards: Vec<HazardZone>,
    pub algorithm: RouteAlgorithm,
    pub vessel: VesselProfile,
    pub options: PlannerOptions,
}

/// Name-based route request resolved through the [`PortRegistry`].
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub settings: VoyageSettings,
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            settings: VoyageSettings::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.settings.algorithm = algorithm;
        self
    }

    pub fn with_hazards(mut self, hazards: Vec<HazardZone>) -> Self {
        self.settings.hazards = hazards;
        self
    }

    pub fn with_vessel(mut self, vessel: VesselProfile) -> Self {
        self.settings.vessel = vessel;
        self
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.settings.options = options;
        self
    }
}

/// A named voyage endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyageEndpoint {
    pub name: String,
    #[serde(rename = "coords")]
    pub coordinate: Coordinate,
}

impl VoyageEndpoint {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

impl From<&Port> for VoyageEndpoint {
    fn from(port: &Port) -> Self {
        Self::new(port.name.clone(), port.coordinate)
    }
}

/// Coordinate-based voyage request.
#[derive(Debug, Clone)]
pub struct VoyageRequest {
    pub origin: VoyageEndpoint,
    pub destination: VoyageEndpoint,
    pub settings: VoyageSettings,
}

/// Waypoints and metrics of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub waypoints: Vec<Coordinate>,
    pub metrics: Metrics,
}

/// Obstacle-avoiding route.
pub type OptimizedRoute = RouteLeg;

/// Great-circle route ignoring obstacles.
pub type DirectRoute = RouteLeg;

/// How the optimized search went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerDiagnostics {
    pub algorithm: RouteAlgorithm,
    /// Lattice spacing of the last graph built.
    pub resolution_deg: Option<f64>,
    /// Margin of the last graph built.
    pub margin_deg: Option<f64>,
    /// Node count of the last graph built.
    pub nodes: usize,
    /// Expansions summed over every search attempt.
    pub expansions: usize,
}

impl PlannerDiagnostics {
    fn new(algorithm: RouteAlgorithm) -> Self {
        Self {
            algorithm,
            resolution_deg: None,
            margin_deg: None,
            nodes: 0,
            expansions: 0,
        }
    }

    fn record_graph(&mut self, graph: &NavigableGraph) {
        self.resolution_deg = Some(graph.resolution_deg());
        self.margin_deg = Some(graph.margin_deg());
        self.nodes = graph.node_count();
    }
}

/// Outcome of planning a voyage.
#[derive(Debug)]
pub struct RouteResult {
    pub origin: VoyageEndpoint,
    pub destination: VoyageEndpoint,
    optimized: Result<OptimizedRoute>,
    pub direct: DirectRoute,
    /// Static catalog hazards followed by request hazards.
    pub hazards: Vec<HazardZone>,
    pub planner: PlannerDiagnostics,
}

impl RouteResult {
    /// The optimized route, or the error that prevented it.
    pub fn optimized(&self) -> std::result::Result<&OptimizedRoute, &Error> {
        self.optimized.as_ref()
    }

    pub fn into_optimized(self) -> Result<OptimizedRoute> {
        self.optimized
    }

    /// `true` when the optimized route was found.
    pub fn is_complete(&self) -> bool {
        self.optimized.is_ok()
    }
}

// =============================================================================
// Main Entry Points
// =============================================================================

/// Resolve port names and plan the voyage between them.
///
/// Fails only when a port is unknown or the request itself is invalid; see
/// [`plan_voyage`] for how search failures are reported.
pub fn generate_route(
    registry: &PortRegistry,
    land: &LandMask,
    catalog_hazards: &[HazardZone],
    request: &RouteRequest,
) -> Result<RouteResult> {
    let origin = registry.resolve(&request.origin)?;
    let destination = registry.resolve(&request.destination)?;

    let voyage = VoyageRequest {
        origin: VoyageEndpoint::from(origin),
        destination: VoyageEndpoint::from(destination),
        settings: request.settings.clone(),
    };
    plan_voyage(land, catalog_hazards, &voyage)
}

/// Plan a voyage between two coordinates.
///
/// This is the main planning entry point. It:
/// 1. Validates endpoints, hazards, vessel profile and options
/// 2. Merges request hazards with the static catalog
/// 3. Samples the direct great-circle route and scores it
/// 4. Searches for the optimized route, widening the region on failure
/// 5. Packages everything into a [`RouteResult`]
pub fn plan_voyage(
    land: &LandMask,
    catalog_hazards: &[HazardZone],
    request: &VoyageRequest,
) -> Result<RouteResult> {
    let settings = &request.settings;
    let span = info_span!(
        "plan_voyage",
        origin = %request.origin.name,
        destination = %request.destination.name,
        algorithm = %settings.algorithm,
    );
    let _guard = span.enter();

    // Step 1: Validate the request
    request.origin.coordinate.validate()?;
    request.destination.coordinate.validate()?;
    for hazard in &settings.hazards {
        hazard.validate()?;
    }
    settings.vessel.validate()?;
    settings.options.validate()?;

    // Step 2: Merge hazards
    let hazards: Vec<HazardZone> = catalog_hazards
        .iter()
        .chain(settings.hazards.iter())
        .cloned()
        .collect();
    let obstacles = Obstacles::new(land, &hazards);

    // Step 3: Direct baseline
    let direct_waypoints = great_circle(
        request.origin.coordinate,
        request.destination.coordinate,
        settings.options.samples,
    )?;
    let direct = RouteLeg {
        metrics: compute_metrics(&direct_waypoints, &settings.vessel)?,
        waypoints: direct_waypoints,
    };

    // Step 4: Optimized route
    let (optimized, planner) = plan_optimized(request, &obstacles);
    let optimized = optimized
        .and_then(|waypoints| {
            let metrics = compute_metrics(&waypoints, &settings.vessel)?;
            Ok(RouteLeg { waypoints, metrics })
        })
        .map_err(|err| name_endpoints(err, request));

    match &optimized {
        Ok(route) => info!(
            waypoints = route.waypoints.len(),
            distance_nm = route.metrics.distance_nm,
            nodes = planner.nodes,
            expansions = planner.expansions,
            resolution_deg = planner.resolution_deg,
            "planned voyage"
        ),
        Err(err) => warn!(
            error = %err,
            kind = %err.kind(),
            nodes = planner.nodes,
            expansions = planner.expansions,
            "optimized route unavailable, returning direct route only"
        ),
    }

    // Step 5: Assemble
    Ok(RouteResult {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        optimized,
        direct,
        hazards,
        planner,
    })
}

/// Run the search with margin widening; returns waypoints and diagnostics.
fn plan_optimized(
    request: &VoyageRequest,
    obstacles: &Obstacles<'_>,
) -> (Result<Vec<Coordinate>>, PlannerDiagnostics) {
    let settings = &request.settings;
    let origin = request.origin.coordinate;
    let destination = request.destination.coordinate;
    let planner = select_planner(settings.algorithm);
    let mut diagnostics = PlannerDiagnostics::new(planner.algorithm());

    if origin == destination {
        let outcome = match obstacles.point_obstruction(origin) {
            Some(obstruction) => Err(Error::Unreachable {
                endpoint: Endpoint::Origin,
                reason: obstruction.to_string(),
            }),
            None => Ok(vec![origin]),
        };
        return (outcome, diagnostics);
    }

    let deadline = settings.options.budget.start();
    let mut last_error = None;

    for &margin in &settings.options.margin_schedule_deg {
        let graph_options = settings.options.graph_options(margin);
        let graph = match build_navigable_graph(origin, destination, obstacles, &graph_options) {
            Ok(graph) => graph,
            Err(err @ Error::NoRoute { .. }) => {
                debug!(margin_deg = margin, "endpoints not connected, widening region");
                last_error = Some(err);
                continue;
            }
            Err(err) => return (Err(err), diagnostics),
        };
        diagnostics.record_graph(&graph);

        match planner.find_path(&graph, graph.origin(), graph.destination(), &deadline) {
            Ok(outcome) => {
                diagnostics.expansions += outcome.expansions;
                let waypoints = to_waypoints(&graph, &outcome.nodes, origin, destination);
                return (Ok(waypoints), diagnostics);
            }
            Err(err @ Error::NoRoute { .. }) => {
                debug!(margin_deg = margin, "no route in region, widening");
                last_error = Some(err);
            }
            Err(err) => {
                if let Error::SearchTimeout { expansions, .. } = &err {
                    diagnostics.expansions += *expansions;
                }
                return (Err(err), diagnostics);
            }
        }
    }

    let error = last_error.unwrap_or_else(|| Error::NoRoute {
        origin: origin.to_string(),
        destination: destination.to_string(),
    });
    (Err(error), diagnostics)
}

/// Map node ids to reportable coordinates; endpoints are the exact inputs.
fn to_waypoints(
    graph: &NavigableGraph,
    nodes: &[usize],
    origin: Coordinate,
    destination: Coordinate,
) -> Vec<Coordinate> {
    let last = nodes.len().saturating_sub(1);
    nodes
        .iter()
        .enumerate()
        .map(|(position, &id)| {
            if position == 0 {
                origin
            } else if position == last {
                destination
            } else {
                let node = graph.node(id);
                Coordinate {
                    lat: node.lat,
                    lon: normalize_lon(node.lon),
                }
            }
        })
        .collect()
}

fn name_endpoints(error: Error, request: &VoyageRequest) -> Error {
    match error {
        Error::NoRoute { .. } => Error::NoRoute {
            origin: request.origin.name.clone(),
            destination: request.destination.name.clone(),
        },
        other => other,
    }
}
