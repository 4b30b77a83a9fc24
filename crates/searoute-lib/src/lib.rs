//! Sea route library entry points.
//!
//! This crate resolves ports, models coastlines and hazard zones, builds an
//! open-water lattice, searches it for the shortest navigable route, and
//! scores that route against a naive great-circle baseline. Higher-level
//! consumers (CLI, HTTP service) should only depend on the functions exported
//! here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod baseline;
pub mod error;
pub mod geodesy;
pub mod graph;
pub mod hazard;
pub mod land;
pub mod obstacles;
pub mod output;
pub mod path;
pub mod ports;
pub mod routing;
pub mod spatial;
pub mod vessel;

pub use baseline::great_circle;
pub use error::{Endpoint, Error, ErrorKind, Result};
pub use geodesy::{haversine_nm, Coordinate};
pub use graph::{build_navigable_graph, GraphOptions, NavigableGraph};
pub use hazard::{HazardCategory, HazardZone, RadiusUnit};
pub use land::LandMask;
pub use obstacles::Obstacles;
pub use output::{list_ports, ApiResponse, PortListResponse, RouteResponse};
pub use path::{find_path, SearchBudget};
pub use ports::{Port, PortRegistry};
pub use routing::{
    generate_route, plan_voyage, PlannerOptions, RouteAlgorithm, RouteRequest, RouteResult,
    VoyageEndpoint, VoyageRequest, VoyageSettings,
};
pub use vessel::{compute_metrics, Metrics, VesselClass, VesselProfile};
