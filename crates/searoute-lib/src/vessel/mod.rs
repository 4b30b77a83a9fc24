//! Vessel profiles and voyage metrics.
//!
//! - [`profile`] - Consumption profiles and size-class presets
//! - [`metrics`] - Distance, fuel, cost, emissions and duration for a route
//! - [`constants`] - Default consumption figures

pub mod constants;
pub mod metrics;
pub mod profile;

pub use metrics::{compute_metrics, metrics_for_distance, Metrics};
pub use profile::{VesselClass, VesselProfile};
