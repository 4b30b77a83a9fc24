//! Port registry: the catalog of named ports and their coordinates.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;

/// Minimum normalized Levenshtein similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Maximum number of suggestions attached to a not-found error.
const MAX_SUGGESTIONS: usize = 3;

static BUILTIN_PORTS: Lazy<std::result::Result<Arc<PortRegistry>, String>> = Lazy::new(|| {
    PortRegistry::from_json_str(include_str!("../data/ports.json"))
        .map(Arc::new)
        .map_err(|err| err.to_string())
});

/// A named port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub name: String,
    pub country: String,
    pub region: String,
    pub coordinate: Coordinate,
    /// Annual container throughput in millions of TEU.
    pub teu_millions: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PortRecord {
    name: String,
    country: String,
    #[serde(default)]
    region: Option<String>,
    lat: f64,
    lon: f64,
    #[serde(default)]
    teu_millions: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PortFile {
    ports: Vec<PortRecord>,
}

/// Read-only catalog of ports, kept in dataset order.
#[derive(Debug, Clone, Default)]
pub struct PortRegistry {
    ports: Vec<Port>,
}

impl PortRegistry {
    /// Build a registry from already-constructed ports.
    ///
    /// Names must be unique ignoring case and surrounding whitespace.
    pub fn from_ports(ports: Vec<Port>) -> Result<Self> {
        let mut seen = HashSet::new();
        for port in &ports {
            port.coordinate.validate()?;
            if !seen.insert(normalize_name(&port.name)) {
                return Err(Error::DuplicatePort {
                    name: port.name.clone(),
                });
            }
        }
        Ok(Self { ports })
    }

    /// Parse a `{"ports": [...]}` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: PortFile = serde_json::from_str(json)?;
        let ports = file
            .ports
            .into_iter()
            .map(|record| Port {
                name: record.name.trim().to_string(),
                country: record.country,
                region: record.region.unwrap_or_default(),
                coordinate: Coordinate {
                    lat: record.lat,
                    lon: record.lon,
                },
                teu_millions: record.teu_millions,
            })
            .collect();
        Self::from_ports(ports)
    }

    /// Load a registry from a JSON file on disk.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let registry = Self::from_json_str(&contents).map_err(|err| Error::DataLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        debug!(path = %path.display(), ports = registry.len(), "loaded port registry");
        Ok(registry)
    }

    /// The embedded dataset of major container ports.
    pub fn builtin() -> Result<Arc<Self>> {
        match &*BUILTIN_PORTS {
            Ok(registry) => Ok(Arc::clone(registry)),
            Err(message) => Err(Error::DataLoad {
                path: "ports.json".into(),
                message: message.clone(),
            }),
        }
    }

    /// Resolve a port by name, ignoring case and surrounding whitespace.
    pub fn resolve(&self, name: &str) -> Result<&Port> {
        let wanted = normalize_name(name);
        self.ports
            .iter()
            .find(|port| normalize_name(&port.name) == wanted)
            .ok_or_else(|| Error::PortNotFound {
                name: name.trim().to_string(),
                suggestions: self.fuzzy_matches(name, MAX_SUGGESTIONS),
            })
    }

    /// All ports in dataset order.
    pub fn list(&self) -> &[Port] {
        &self.ports
    }

    /// Ports whose region matches `region`, ignoring case.
    pub fn by_region(&self, region: &str) -> Vec<&Port> {
        let wanted = normalize_name(region);
        self.ports
            .iter()
            .filter(|port| normalize_name(&port.region) == wanted)
            .collect()
    }

    /// Up to `limit` port names similar to `name`, best match first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let wanted = normalize_name(name);
        let mut scored: Vec<(usize, f64)> = self
            .ports
            .iter()
            .enumerate()
            .map(|(index, port)| {
                let score = strsim::normalized_levenshtein(&wanted, &normalize_name(&port.name));
                (index, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        // Stable sort keeps dataset order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(limit)
            .map(|(index, _)| self.ports[index].name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
