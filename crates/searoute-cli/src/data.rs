//! Reference data selection from global CLI flags.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use searoute_lib::hazard::hazards_from_json_path;
use searoute_lib::{HazardZone, LandMask, PortRegistry};

/// Where to read the port registry and coastline from.
#[derive(Debug, Clone, Default)]
pub struct DataOptions {
    /// Port registry JSON replacing the embedded one.
    pub ports_file: Option<PathBuf>,
    /// Coastline JSON replacing the embedded one.
    pub land_file: Option<PathBuf>,
    /// Plan over open ocean with no coastline at all.
    pub no_land: bool,
}

impl DataOptions {
    pub fn load_registry(&self) -> Result<Arc<PortRegistry>> {
        match &self.ports_file {
            Some(path) => {
                let registry = PortRegistry::from_json_path(path)
                    .with_context(|| format!("failed to load ports from {}", path.display()))?;
                debug!(path = %path.display(), ports = registry.len(), "using port file");
                Ok(Arc::new(registry))
            }
            None => PortRegistry::builtin().context("failed to load the embedded port registry"),
        }
    }

    pub fn load_land(&self) -> Result<Arc<LandMask>> {
        if self.no_land {
            return Ok(Arc::new(LandMask::empty()));
        }
        match &self.land_file {
            Some(path) => {
                let land = LandMask::from_json_path(path)
                    .with_context(|| format!("failed to load coastline from {}", path.display()))?;
                Ok(Arc::new(land))
            }
            None => LandMask::builtin().context("failed to load the embedded coastline"),
        }
    }
}

/// Read a hazard catalog file.
pub fn load_hazard_file(path: &std::path::Path) -> Result<Vec<HazardZone>> {
    hazards_from_json_path(path)
        .with_context(|| format!("failed to load hazards from {}", path.display()))
}
