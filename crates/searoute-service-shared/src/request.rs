//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use searoute_lib::{
    HazardZone, PlannerOptions, RouteAlgorithm, RouteRequest, VesselClass, VesselProfile,
};

use crate::ErrorResponse;

/// Largest number of direct-route samples a caller may request.
pub const MAX_SAMPLES: usize = 1_000;

/// Finest and coarsest lattice spacing a caller may request, in degrees.
pub const RESOLUTION_RANGE_DEG: (f64, f64) = (0.1, 5.0);

/// Validation trait for request types.
///
/// Returns a boxed [`ErrorResponse`] to avoid large `Result::Err` variants.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ErrorResponse>>;
}

/// Query string of `GET /api/ports`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortsQuery {
    /// Only list ports in this region, ignoring case.
    #[serde(default)]
    pub region: Option<String>,
}

impl Validate for PortsQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ErrorResponse>> {
        if matches!(&self.region, Some(region) if region.trim().is_empty()) {
            return Err(Box::new(ErrorResponse::bad_request(
                "The 'region' parameter cannot be empty",
                request_id,
            )));
        }
        Ok(())
    }
}

/// Vessel as given in a request: a size-class name or explicit figures.
///
/// ```json
/// "vessel": "panamax"
/// "vessel": {"class": "feeder", "fuel_price_usd_per_ton": 720}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum VesselChoice {
    Class(VesselClass),
    Custom(VesselOverrides),
}

/// Explicit vessel figures layered over a size class (post-panamax by default).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VesselOverrides {
    #[serde(default)]
    pub class: Option<VesselClass>,
    #[serde(default)]
    pub fuel_tons_per_nm: Option<f64>,
    #[serde(default)]
    pub fuel_price_usd_per_ton: Option<f64>,
    #[serde(default)]
    pub co2_tons_per_fuel_ton: Option<f64>,
    #[serde(default)]
    pub service_speed_knots: Option<f64>,
}

impl VesselChoice {
    pub fn profile(&self) -> VesselProfile {
        match self {
            VesselChoice::Class(class) => class.profile(),
            VesselChoice::Custom(overrides) => {
                let base = overrides.class.unwrap_or_default().profile();
                VesselProfile {
                    fuel_tons_per_nm: overrides.fuel_tons_per_nm.unwrap_or(base.fuel_tons_per_nm),
                    fuel_price_usd_per_ton: overrides
                        .fuel_price_usd_per_ton
                        .unwrap_or(base.fuel_price_usd_per_ton),
                    co2_tons_per_fuel_ton: overrides
                        .co2_tons_per_fuel_ton
                        .unwrap_or(base.co2_tons_per_fuel_ton),
                    service_speed_knots: overrides
                        .service_speed_knots
                        .unwrap_or(base.service_speed_knots),
                }
            }
        }
    }
}

/// Body of `POST /api/generate-route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRouteRequest {
    /// Origin port name.
    pub origin: String,

    /// Destination port name.
    pub destination: String,

    /// Hazards for this voyage only, merged with the static catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<HazardZone>,

    #[serde(default)]
    pub algorithm: RouteAlgorithm,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel: Option<VesselChoice>,

    /// Points sampled along the direct route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,

    /// Starting lattice spacing in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_deg: Option<f64>,
}

impl GenerateRouteRequest {
    /// Build the library request on top of the service's planner defaults.
    pub fn to_route_request(&self, defaults: &PlannerOptions) -> RouteRequest {
        let mut options = defaults.clone();
        if let Some(samples) = self.samples {
            options.samples = samples;
        }
        if let Some(resolution) = self.resolution_deg {
            options.resolution_deg = resolution;
        }

        let vessel = self
            .vessel
            .as_ref()
            .map(VesselChoice::profile)
            .unwrap_or_default();

        RouteRequest::new(self.origin.trim(), self.destination.trim())
            .with_algorithm(self.algorithm)
            .with_hazards(self.hazards.clone())
            .with_vessel(vessel)
            .with_options(options)
    }
}

impl Validate for GenerateRouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ErrorResponse>> {
        if self.origin.trim().is_empty() {
            return Err(Box::new(ErrorResponse::bad_request(
                "The 'origin' field is required and cannot be empty",
                request_id,
            )));
        }

        if self.destination.trim().is_empty() {
            return Err(Box::new(ErrorResponse::bad_request(
                "The 'destination' field is required and cannot be empty",
                request_id,
            )));
        }

        if let Some(samples) = self.samples {
            if !(2..=MAX_SAMPLES).contains(&samples) {
                return Err(Box::new(ErrorResponse::bad_request(
                    format!("The 'samples' field must be between 2 and {MAX_SAMPLES}"),
                    request_id,
                )));
            }
        }

        if let Some(resolution) = self.resolution_deg {
            let (min, max) = RESOLUTION_RANGE_DEG;
            if !(min..=max).contains(&resolution) {
                return Err(Box::new(ErrorResponse::bad_request(
                    format!("The 'resolution_deg' field must be between {min} and {max}"),
                    request_id,
                )));
            }
        }

        if let Some(vessel) = &self.vessel {
            if let Err(err) = vessel.profile().validate() {
                return Err(Box::new(ErrorResponse::bad_request(
                    err.to_string(),
                    request_id,
                )));
            }
        }

        Ok(())
    }
}
