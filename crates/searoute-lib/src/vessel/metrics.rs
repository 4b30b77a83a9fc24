//! Voyage metrics: distance, fuel, cost, emissions and duration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geodesy::{path_length_nm, Coordinate};

use super::profile::VesselProfile;

/// Scored voyage figures. All values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Metrics {
    pub distance_nm: f64,
    pub fuel_tons: f64,
    pub fuel_cost_usd: f64,
    pub emissions_tons: f64,
    pub waypoint_count: usize,
    pub estimated_duration_hours: f64,
}

/// Score a distance alone; `waypoint_count` is left at zero.
pub fn metrics_for_distance(distance_nm: f64, profile: &VesselProfile) -> Result<Metrics> {
    profile.validate()?;
    let distance_nm = distance_nm.max(0.0);
    let fuel_tons = distance_nm * profile.fuel_tons_per_nm;
    Ok(Metrics {
        distance_nm,
        fuel_tons,
        fuel_cost_usd: fuel_tons * profile.fuel_price_usd_per_ton,
        emissions_tons: fuel_tons * profile.co2_tons_per_fuel_ton,
        waypoint_count: 0,
        estimated_duration_hours: distance_nm / profile.service_speed_knots,
    })
}

/// Score a waypoint sequence by its great-circle length.
pub fn compute_metrics(waypoints: &[Coordinate], profile: &VesselProfile) -> Result<Metrics> {
    let mut metrics = metrics_for_distance(path_length_nm(waypoints), profile)?;
    metrics.waypoint_count = waypoints.len();
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_linearly_with_distance() {
        let metrics = metrics_for_distance(1000.0, &VesselProfile::default()).expect("metrics");
        assert!((metrics.fuel_tons - 300.0).abs() < 1e-9);
        assert!((metrics.fuel_cost_usd - 180_000.0).abs() < 1e-6);
        assert!((metrics.emissions_tons - 930.0).abs() < 1e-9);
        assert!((metrics.estimated_duration_hours - 1000.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn zero_distance_scores_zero() {
        let point = Coordinate { lat: 1.0, lon: 1.0 };
        let metrics = compute_metrics(&[point], &VesselProfile::default()).expect("metrics");
        assert_eq!(metrics.distance_nm, 0.0);
        assert_eq!(metrics.fuel_cost_usd, 0.0);
        assert_eq!(metrics.emissions_tons, 0.0);
        assert_eq!(metrics.waypoint_count, 1);
    }

    #[test]
    fn counts_waypoints() {
        let points = [
            Coordinate { lat: 0.0, lon: 0.0 },
            Coordinate { lat: 0.0, lon: 1.0 },
            Coordinate { lat: 1.0, lon: 1.0 },
        ];
        let metrics = compute_metrics(&points, &VesselProfile::default()).expect("metrics");
        assert_eq!(metrics.waypoint_count, 3);
        assert!(metrics.distance_nm > 119.0 && metrics.distance_nm < 121.0);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let profile = VesselProfile {
            fuel_price_usd_per_ton: -1.0,
            ..VesselProfile::default()
        };
        assert!(metrics_for_distance(10.0, &profile).is_err());
    }
}
