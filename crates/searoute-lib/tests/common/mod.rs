#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use searoute_lib::{
    Coordinate, HazardZone, LandMask, Obstacles, PlannerOptions, PortRegistry, SearchBudget,
};

pub fn registry() -> Arc<PortRegistry> {
    PortRegistry::builtin().expect("builtin ports load")
}

pub fn land() -> Arc<LandMask> {
    LandMask::builtin().expect("builtin coastline loads")
}

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("valid coordinate")
}

/// Planner options with a wall-clock limit generous enough for unoptimized builds.
pub fn relaxed_options() -> PlannerOptions {
    PlannerOptions {
        budget: SearchBudget {
            time_limit: Duration::from_secs(300),
            ..SearchBudget::default()
        },
        ..PlannerOptions::default()
    }
}

/// Panic if any leg of `waypoints` crosses land or a hazard.
pub fn assert_route_clear(waypoints: &[Coordinate], land: &LandMask, hazards: &[HazardZone]) {
    let obstacles = Obstacles::new(land, hazards);
    for pair in waypoints.windows(2) {
        assert!(
            !obstacles.segment_blocked(pair[0], pair[1]),
            "segment {} -> {} is obstructed",
            pair[0],
            pair[1]
        );
    }
}
