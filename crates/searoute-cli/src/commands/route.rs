//! Route command handler for planning a voyage between two ports.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use searoute_lib::output::render_route_text;
use searoute_lib::{
    generate_route, Coordinate, HazardCategory, HazardZone, PlannerOptions, RouteAlgorithm,
    RouteRequest, RouteResponse, VesselClass,
};

use crate::data::{load_hazard_file, DataOptions};
use crate::output::{print_json, CommandOutcome, OutputFormat};

/// Most direct-route samples accepted on the command line.
const MAX_SAMPLES: usize = 1_000;

/// Arguments for the route command.
#[derive(Debug, Clone, Args)]
pub struct RouteCommandArgs {
    /// Origin port name.
    #[arg(long = "from")]
    pub from: String,
    /// Destination port name.
    #[arg(long = "to")]
    pub to: String,
    /// Search algorithm (dijkstra or a-star).
    #[arg(long, default_value_t = RouteAlgorithm::AStar)]
    pub algorithm: RouteAlgorithm,
    /// Hazard catalog JSON file applied alongside --hazard zones.
    #[arg(long = "hazards", value_name = "FILE")]
    pub hazards_file: Option<PathBuf>,
    /// Circular hazard zone; may be repeated.
    #[arg(
        long = "hazard",
        value_name = "LAT,LON,RADIUS_NM[,CATEGORY]",
        value_parser = parse_hazard
    )]
    pub hazards: Vec<HazardZone>,
    /// Vessel size class used for fuel, cost and emissions.
    #[arg(long)]
    pub vessel: Option<VesselClass>,
    /// Points sampled along the direct route.
    #[arg(long)]
    pub samples: Option<usize>,
    /// Lattice spacing in degrees for the optimized search.
    #[arg(long = "resolution", value_name = "DEG")]
    pub resolution_deg: Option<f64>,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library [`RouteRequest`].
    pub fn to_request(&self) -> Result<RouteRequest> {
        let mut options = PlannerOptions::default();
        if let Some(samples) = self.samples {
            if !(2..=MAX_SAMPLES).contains(&samples) {
                bail!("--samples must be between 2 and {MAX_SAMPLES}, got {samples}");
            }
            options.samples = samples;
        }
        if let Some(resolution) = self.resolution_deg {
            options.resolution_deg = resolution;
        }

        let mut request = RouteRequest::new(self.from.trim(), self.to.trim())
            .with_algorithm(self.algorithm)
            .with_hazards(self.hazards.clone())
            .with_options(options);
        if let Some(class) = self.vessel {
            request = request.with_vessel(class.profile());
        }
        Ok(request)
    }
}

/// Parse `LAT,LON,RADIUS_NM[,CATEGORY]` into a hazard zone.
pub fn parse_hazard(value: &str) -> std::result::Result<HazardZone, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(format!(
            "expected LAT,LON,RADIUS_NM[,CATEGORY], got '{value}'"
        ));
    }

    let number = |label: &str, raw: &str| {
        raw.parse::<f64>()
            .map_err(|_| format!("invalid {label} '{raw}' in hazard '{value}'"))
    };
    let lat = number("latitude", parts[0])?;
    let lon = number("longitude", parts[1])?;
    let radius_nm = number("radius", parts[2])?;
    let category = match parts.get(3) {
        Some(raw) => raw.parse::<HazardCategory>().map_err(|e| e.to_string())?,
        None => HazardCategory::default(),
    };

    let center = Coordinate::new(lat, lon).map_err(|e| e.to_string())?;
    HazardZone::new(center, radius_nm, category).map_err(|e| e.to_string())
}

/// Handle the route subcommand.
///
/// Prints the planned voyage and reports a partial outcome when only the
/// direct route could be produced. Request errors are printed as a JSON
/// envelope first when `format` is JSON.
pub fn handle_route_command(
    data: &DataOptions,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<CommandOutcome> {
    let registry = data.load_registry()?;
    let land = data.load_land()?;
    let catalog = match &args.hazards_file {
        Some(path) => load_hazard_file(path)?,
        None => Vec::new(),
    };
    let request = args.to_request()?;

    let result = match generate_route(&registry, &land, &catalog, &request) {
        Ok(result) => result,
        Err(error) => {
            if format == OutputFormat::Json {
                print_json(&RouteResponse::failure(&error))?;
            }
            return Err(error).with_context(|| {
                format!("failed to plan a route from {} to {}", args.from, args.to)
            });
        }
    };

    match format {
        OutputFormat::Json => print_json(&RouteResponse::from_result(&result))?,
        OutputFormat::Text => print!("{}", render_route_text(&result)),
    }

    match result.optimized() {
        Ok(_) => Ok(CommandOutcome::Complete),
        Err(error) => {
            eprintln!("warning: no optimized route ({error}); only the direct route is available");
            Ok(CommandOutcome::Partial)
        }
    }
}
