//! Application state for the HTTP service.
//!
//! Holds the port registry, land mask, static hazard catalog and planner
//! defaults. Everything is immutable after startup and shared through `Arc`.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use searoute_lib::hazard::hazards_from_json_path;
use searoute_lib::{Error as LibError, HazardZone, LandMask, PlannerOptions, PortRegistry};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to load the port registry.
    PortsLoad(LibError),

    /// Failed to load the land mask.
    LandLoad(LibError),

    /// Failed to load the static hazard catalog.
    HazardsLoad(LibError),

    /// A configured data file does not exist.
    FileNotFound(PathBuf),

    /// An environment variable could not be parsed.
    InvalidSetting { name: String, value: String },
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PortsLoad(e) => write!(f, "failed to load port registry: {}", e),
            Self::LandLoad(e) => write!(f, "failed to load land mask: {}", e),
            Self::HazardsLoad(e) => write!(f, "failed to load hazard catalog: {}", e),
            Self::FileNotFound(path) => write!(f, "data file not found: {}", path.display()),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PortsLoad(e) | Self::LandLoad(e) | Self::HazardsLoad(e) => Some(e),
            _ => None,
        }
    }
}

/// Where reference data comes from and how hard the planner may work.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// `SEAROUTE_PORTS_PATH`; the embedded registry when unset.
    pub ports_path: Option<PathBuf>,
    /// `SEAROUTE_LAND_PATH`; the embedded coastline when unset.
    pub land_path: Option<PathBuf>,
    /// `SEAROUTE_HAZARDS_PATH`; no static hazards when unset.
    pub hazards_path: Option<PathBuf>,
    pub planner: PlannerOptions,
}

impl ServiceConfig {
    /// Read the configuration from `SEAROUTE_*` environment variables.
    ///
    /// - `SEAROUTE_PORTS_PATH`, `SEAROUTE_LAND_PATH`, `SEAROUTE_HAZARDS_PATH`
    /// - `SEAROUTE_SEARCH_TIMEOUT_MS`, `SEAROUTE_MAX_EXPANSIONS`, `SEAROUTE_MAX_NODES`
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppStateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        let mut planner = PlannerOptions::default();
        if let Some(ms) = parse_setting::<u64>(&lookup, "SEAROUTE_SEARCH_TIMEOUT_MS")? {
            planner.budget.time_limit = Duration::from_millis(ms);
        }
        if let Some(expansions) = parse_setting::<usize>(&lookup, "SEAROUTE_MAX_EXPANSIONS")? {
            planner.budget.max_expansions = expansions;
        }
        if let Some(nodes) = parse_setting::<usize>(&lookup, "SEAROUTE_MAX_NODES")? {
            planner.max_nodes = nodes;
        }

        Ok(Self {
            ports_path: path("SEAROUTE_PORTS_PATH"),
            land_path: path("SEAROUTE_LAND_PATH"),
            hazards_path: path("SEAROUTE_HAZARDS_PATH"),
            planner,
        })
    }
}

fn parse_setting<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, AppStateError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppStateError::InvalidSetting {
                name: name.to_string(),
                value,
            }),
    }
}

fn require_file(path: &Path) -> Result<(), AppStateError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppStateError::FileNotFound(path.to_path_buf()))
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{extract::State, routing::get, Router};
/// use searoute_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) -> String {
///     state.registry().len().to_string()
/// }
///
/// let state = AppState::load(&ServiceConfig::from_env()?)?;
/// let app = Router::new().route("/count", get(handler)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<PortRegistry>,
    land: Arc<LandMask>,
    hazards: Vec<HazardZone>,
    planner: PlannerOptions,
}

impl AppState {
    /// Load reference data as configured, falling back to the embedded datasets.
    pub fn load(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let registry = match &config.ports_path {
            Some(path) => {
                require_file(path)?;
                tracing::info!(path = %path.display(), "loading port registry");
                Arc::new(PortRegistry::from_json_path(path).map_err(AppStateError::PortsLoad)?)
            }
            None => PortRegistry::builtin().map_err(AppStateError::PortsLoad)?,
        };

        let land = match &config.land_path {
            Some(path) => {
                require_file(path)?;
                tracing::info!(path = %path.display(), "loading land mask");
                Arc::new(LandMask::from_json_path(path).map_err(AppStateError::LandLoad)?)
            }
            None => LandMask::builtin().map_err(AppStateError::LandLoad)?,
        };

        let hazards = match &config.hazards_path {
            Some(path) => {
                require_file(path)?;
                tracing::info!(path = %path.display(), "loading hazard catalog");
                hazards_from_json_path(path).map_err(AppStateError::HazardsLoad)?
            }
            None => Vec::new(),
        };

        tracing::info!(
            ports = registry.len(),
            land_polygons = land.len(),
            hazards = hazards.len(),
            "reference data loaded"
        );

        Ok(Self::from_components(
            registry,
            land,
            hazards,
            config.planner.clone(),
        ))
    }

    /// Create application state from pre-loaded components.
    pub fn from_components(
        registry: Arc<PortRegistry>,
        land: Arc<LandMask>,
        hazards: Vec<HazardZone>,
        planner: PlannerOptions,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                land,
                hazards,
                planner,
            }),
        }
    }

    pub fn registry(&self) -> &PortRegistry {
        &self.inner.registry
    }

    pub fn land(&self) -> &LandMask {
        &self.inner.land
    }

    /// Static hazards applied to every voyage.
    pub fn hazards(&self) -> &[HazardZone] {
        &self.inner.hazards
    }

    /// Planner defaults requests are layered over.
    pub fn planner(&self) -> &PlannerOptions {
        &self.inner.planner
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("port_count", &self.inner.registry.len())
            .field("land_polygons", &self.inner.land.len())
            .field("hazard_count", &self.inner.hazards.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults_without_env() {
        let config = ServiceConfig::from_lookup(lookup(&[])).expect("config");
        assert!(config.ports_path.is_none());
        assert!(config.hazards_path.is_none());
        assert_eq!(config.planner, PlannerOptions::default());
    }

    #[test]
    fn test_config_reads_budget_settings() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("SEAROUTE_SEARCH_TIMEOUT_MS", "2500"),
            ("SEAROUTE_MAX_EXPANSIONS", "1000"),
            ("SEAROUTE_MAX_NODES", "5000"),
            ("SEAROUTE_LAND_PATH", "/data/land.json"),
        ]))
        .expect("config");

        assert_eq!(config.planner.budget.time_limit, Duration::from_millis(2500));
        assert_eq!(config.planner.budget.max_expansions, 1000);
        assert_eq!(config.planner.max_nodes, 5000);
        assert_eq!(config.land_path, Some(PathBuf::from("/data/land.json")));
    }

    #[test]
    fn test_config_rejects_garbage_numbers() {
        let err = ServiceConfig::from_lookup(lookup(&[("SEAROUTE_MAX_NODES", "lots")]))
            .expect_err("invalid number");
        assert!(err.to_string().contains("SEAROUTE_MAX_NODES"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_load_builtin_state() {
        let state = AppState::load(&ServiceConfig::default()).expect("state");
        assert_eq!(state.registry().len(), 30);
        assert!(!state.land().is_empty());
        assert!(state.hazards().is_empty());

        let debug = format!("{:?}", state.clone());
        assert!(debug.contains("port_count"));
    }

    #[test]
    fn test_load_hazard_catalog_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("hazards.json");
        fs::write(
            &path,
            r#"[{"center": [12.0, 48.0], "radius": 150, "type": "piracy", "name": "Gulf of Aden"}]"#,
        )
        .expect("write hazards");

        let config = ServiceConfig {
            hazards_path: Some(path),
            ..ServiceConfig::default()
        };
        let state = AppState::load(&config).expect("state");
        assert_eq!(state.hazards().len(), 1);
        assert_eq!(state.hazards()[0].name.as_deref(), Some("Gulf of Aden"));
    }

    #[test]
    fn test_load_missing_file() {
        let config = ServiceConfig {
            ports_path: Some(PathBuf::from("/nonexistent/ports.json")),
            ..ServiceConfig::default()
        };
        match AppState::load(&config).expect_err("missing file") {
            AppStateError::FileNotFound(path) => {
                assert!(path.to_string_lossy().contains("nonexistent"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
