//! Test fixtures for handler testing.
//!
//! The shared state is built from the embedded datasets with a generous
//! search budget so unoptimized test builds do not time out.

use std::sync::OnceLock;
use std::time::Duration;

use searoute_lib::{LandMask, PlannerOptions, PortRegistry, SearchBudget};

use crate::state::AppState;

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Planner defaults used by [`test_state`].
pub fn test_planner_options() -> PlannerOptions {
    PlannerOptions {
        budget: SearchBudget {
            time_limit: Duration::from_secs(120),
            ..SearchBudget::default()
        },
        ..PlannerOptions::default()
    }
}

/// Shared state over the embedded port registry and coastline, cached after the first call.
///
/// # Panics
///
/// Panics if the embedded datasets fail to parse.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            let registry = PortRegistry::builtin()
                .unwrap_or_else(|e| panic!("embedded port registry failed to load: {}", e));
            let land = LandMask::builtin()
                .unwrap_or_else(|e| panic!("embedded coastline failed to load: {}", e));
            AppState::from_components(registry, land, Vec::new(), test_planner_options())
        })
        .clone()
}

/// Port names from the embedded registry used across tests.
pub mod fixture_ports {
    pub const SHANGHAI: &str = "Shanghai";
    pub const BUSAN: &str = "Busan";
    pub const SINGAPORE: &str = "Singapore";
    pub const ROTTERDAM: &str = "Rotterdam";
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
