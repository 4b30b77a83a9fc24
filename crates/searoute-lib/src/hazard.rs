//! Circular hazard zones (piracy, weather, shallow water, restricted areas).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geodesy::{cross_track_distance_nm, haversine_nm, Coordinate, NM_PER_DEGREE};

/// Kind of hazard a zone represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HazardCategory {
    Piracy,
    #[default]
    Weather,
    ShallowWater,
    Restricted,
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            HazardCategory::Piracy => "piracy",
            HazardCategory::Weather => "weather",
            HazardCategory::ShallowWater => "shallow-water",
            HazardCategory::Restricted => "restricted",
        };
        f.write_str(value)
    }
}

impl std::str::FromStr for HazardCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "piracy" => Ok(HazardCategory::Piracy),
            "weather" | "storm" => Ok(HazardCategory::Weather),
            "shallow-water" | "shallow_water" | "shallow" => Ok(HazardCategory::ShallowWater),
            "restricted" => Ok(HazardCategory::Restricted),
            other => Err(Error::InvalidHazard {
                message: format!("unknown hazard category '{other}'"),
            }),
        }
    }
}

/// Unit a hazard radius is expressed in on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RadiusUnit {
    #[default]
    Nm,
    #[serde(alias = "degrees")]
    Deg,
}

impl RadiusUnit {
    /// Convert a radius in this unit to nautical miles.
    pub fn to_nm(self, radius: f64) -> f64 {
        match self {
            RadiusUnit::Nm => radius,
            RadiusUnit::Deg => radius * NM_PER_DEGREE,
        }
    }
}

/// A circular area vessels must keep out of.
///
/// Serializes as `{center: [lat, lon], radius, type, name?}` with the radius
/// in nautical miles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HazardRecord")]
pub struct HazardZone {
    pub center: Coordinate,
    #[serde(rename = "radius")]
    pub radius_nm: f64,
    #[serde(rename = "type")]
    pub category: HazardCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Wire form of a hazard accepting either unit.
#[derive(Debug, Deserialize)]
struct HazardRecord {
    center: Coordinate,
    #[serde(alias = "radius_nm")]
    radius: f64,
    #[serde(default)]
    radius_unit: RadiusUnit,
    #[serde(default, rename = "type", alias = "category")]
    category: HazardCategory,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<HazardRecord> for HazardZone {
    type Error = Error;

    fn try_from(record: HazardRecord) -> Result<Self> {
        let zone = HazardZone {
            center: record.center,
            radius_nm: record.radius_unit.to_nm(record.radius),
            category: record.category,
            name: record.name,
        };
        zone.validate()?;
        Ok(zone)
    }
}

impl HazardZone {
    /// Build and validate a hazard zone with a radius in nautical miles.
    pub fn new(center: Coordinate, radius_nm: f64, category: HazardCategory) -> Result<Self> {
        let zone = Self {
            center,
            radius_nm,
            category,
            name: None,
        };
        zone.validate()?;
        Ok(zone)
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.center.validate().map_err(|err| Error::InvalidHazard {
            message: err.to_string(),
        })?;
        if !self.radius_nm.is_finite() || self.radius_nm <= 0.0 {
            return Err(Error::InvalidHazard {
                message: format!("radius must be finite and positive, got {}", self.radius_nm),
            });
        }
        Ok(())
    }

    /// Whether `point` lies within the zone (boundary included).
    pub fn contains(&self, point: Coordinate) -> bool {
        haversine_nm(self.center, point) <= self.radius_nm
    }

    /// Whether the great-circle arc `a -> b` passes within the zone.
    pub fn intersects_segment(&self, a: Coordinate, b: Coordinate) -> bool {
        cross_track_distance_nm(self.center, a, b) <= self.radius_nm
    }

    /// Human-readable label used in unreachable-endpoint messages.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} hazard '{}'", self.category, name),
            None => format!(
                "{} hazard at ({:.3}, {:.3})",
                self.category, self.center.lat, self.center.lon
            ),
        }
    }
}

/// First hazard whose zone contains `point`.
pub fn hazard_containing(point: Coordinate, hazards: &[HazardZone]) -> Option<&HazardZone> {
    hazards.iter().find(|hazard| hazard.contains(point))
}

/// Whether the arc `a -> b` passes through any of `hazards`.
pub fn intersects_hazard(a: Coordinate, b: Coordinate, hazards: &[HazardZone]) -> bool {
    hazards.iter().any(|hazard| hazard.intersects_segment(a, b))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HazardFile {
    Wrapped { hazards: Vec<HazardZone> },
    Bare(Vec<HazardZone>),
}

/// Parse a hazard catalog, either `{"hazards": [...]}` or a bare array.
pub fn hazards_from_json_str(json: &str) -> Result<Vec<HazardZone>> {
    let file: HazardFile = serde_json::from_str(json)?;
    Ok(match file {
        HazardFile::Wrapped { hazards } => hazards,
        HazardFile::Bare(hazards) => hazards,
    })
}

/// Load a hazard catalog from disk.
pub fn hazards_from_json_path(path: &Path) -> Result<Vec<HazardZone>> {
    let contents = fs::read_to_string(path)?;
    hazards_from_json_str(&contents).map_err(|err| Error::DataLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    #[test]
    fn rejects_non_positive_radius() {
        let error = HazardZone::new(coord(0.0, 0.0), 0.0, HazardCategory::Piracy)
            .expect_err("zero radius rejected");
        assert!(format!("{error}").contains("radius must be finite and positive"));
        assert!(HazardZone::new(coord(0.0, 0.0), f64::NAN, HazardCategory::Piracy).is_err());
    }

    #[test]
    fn degree_radius_is_converted_at_the_boundary() {
        let zone: HazardZone = serde_json::from_str(
            r#"{"center":[12.0,45.0],"radius":2.0,"radius_unit":"deg","type":"piracy"}"#,
        )
        .expect("hazard parses");
        assert_eq!(zone.radius_nm, 120.0);
        assert_eq!(zone.category, HazardCategory::Piracy);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let zone = HazardZone::new(coord(10.0, 20.0), 50.0, HazardCategory::ShallowWater)
            .expect("valid hazard");
        let value = serde_json::to_value(&zone).expect("serialize");
        assert_eq!(value["radius"], 50.0);
        assert_eq!(value["type"], "shallow-water");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn segment_check_uses_cross_track_distance() {
        let zone = HazardZone::new(coord(0.5, 0.0), 60.0, HazardCategory::Weather)
            .expect("valid hazard");
        assert!(zone.intersects_segment(coord(0.0, -5.0), coord(0.0, 5.0)));
        assert!(!zone.intersects_segment(coord(3.0, -5.0), coord(3.0, 5.0)));
        assert!(zone.contains(coord(0.0, 0.0)));
    }

    #[test]
    fn catalog_accepts_wrapped_and_bare_forms() {
        let wrapped = hazards_from_json_str(
            r#"{"hazards":[{"center":[0.0,0.0],"radius":10,"type":"restricted","name":"Range"}]}"#,
        )
        .expect("wrapped form");
        assert_eq!(wrapped[0].name.as_deref(), Some("Range"));

        let bare = hazards_from_json_str(r#"[{"center":[0.0,0.0],"radius_nm":10}]"#)
            .expect("bare form");
        assert_eq!(bare[0].category, HazardCategory::Weather);
    }

    #[test]
    fn category_parses_from_cli_text() {
        assert_eq!(
            "Shallow-Water".parse::<HazardCategory>().expect("parses"),
            HazardCategory::ShallowWater
        );
        assert!("volcano".parse::<HazardCategory>().is_err());
    }
}
