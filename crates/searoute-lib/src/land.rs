//! Coastline polygons used to keep routes off land.
//!
//! Geometry is planar in (lon, lat) degrees. Longitudes of query points may be
//! unwrapped past ±180°; each query is tested against the polygon set shifted
//! by -360°, 0° and +360° so routes crossing the antimeridian still see land.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use geo::{BoundingRect, Coord, Intersects, Line, LineString, Polygon, Rect};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::{unwrap_lon, Coordinate};

const LONGITUDE_SHIFTS: [f64; 3] = [-360.0, 0.0, 360.0];

static BUILTIN_LAND: Lazy<std::result::Result<Arc<LandMask>, String>> = Lazy::new(|| {
    LandMask::from_json_str(include_str!("../data/land.json"))
        .map(Arc::new)
        .map_err(|err| err.to_string())
});

#[derive(Debug, Deserialize)]
struct PolygonRecord {
    name: String,
    ring: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct LandFile {
    polygons: Vec<PolygonRecord>,
}

/// A named landmass outline.
#[derive(Debug, Clone)]
pub struct LandPolygon {
    pub name: String,
    polygon: Polygon<f64>,
    bounds: Rect<f64>,
}

impl LandPolygon {
    /// Build a polygon from a ring of `[lat, lon]` vertices.
    pub fn new(name: impl Into<String>, ring: &[[f64; 2]]) -> Result<Self> {
        let name = name.into();
        if ring.len() < 3 {
            return Err(Error::DataLoad {
                path: "land".into(),
                message: format!("polygon '{name}' needs at least 3 vertices"),
            });
        }
        for &[lat, lon] in ring {
            Coordinate::new(lat, lon)?;
        }

        let exterior: LineString<f64> = ring
            .iter()
            .map(|&[lat, lon]| Coord { x: lon, y: lat })
            .collect::<Vec<_>>()
            .into();
        let polygon = Polygon::new(exterior, Vec::new());
        let bounds = polygon.bounding_rect().ok_or_else(|| Error::DataLoad {
            path: "land".into(),
            message: format!("polygon '{name}' has no extent"),
        })?;

        Ok(Self {
            name,
            polygon,
            bounds,
        })
    }

    fn contains_planar(&self, point: Coord<f64>) -> bool {
        within_rect(&self.bounds, point.x, point.x, point.y, point.y)
            && self.polygon.intersects(&point)
    }

    fn intersects_planar(&self, line: &Line<f64>) -> bool {
        let (min_x, max_x) = min_max(line.start.x, line.end.x);
        let (min_y, max_y) = min_max(line.start.y, line.end.y);
        within_rect(&self.bounds, min_x, max_x, min_y, max_y) && line.intersects(&self.polygon)
    }
}

/// Set of coastline polygons.
#[derive(Debug, Clone, Default)]
pub struct LandMask {
    polygons: Vec<LandPolygon>,
}

impl LandMask {
    /// A mask with no land at all (open ocean everywhere).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_polygons(polygons: Vec<LandPolygon>) -> Self {
        Self { polygons }
    }

    /// Parse a `{"polygons": [{"name", "ring": [[lat, lon], ...]}]}` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: LandFile = serde_json::from_str(json)?;
        let polygons = file
            .polygons
            .into_iter()
            .map(|record| LandPolygon::new(record.name, &record.ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { polygons })
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mask = Self::from_json_str(&contents).map_err(|err| Error::DataLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        debug!(path = %path.display(), polygons = mask.len(), "loaded land mask");
        Ok(mask)
    }

    /// The embedded coarse coastline. Main straits and canals are left open.
    pub fn builtin() -> Result<Arc<Self>> {
        match &*BUILTIN_LAND {
            Ok(mask) => Ok(Arc::clone(mask)),
            Err(message) => Err(Error::DataLoad {
                path: "land.json".into(),
                message: message.clone(),
            }),
        }
    }

    /// Name of the polygon containing `point`, if any.
    pub fn polygon_containing(&self, point: Coordinate) -> Option<&str> {
        LONGITUDE_SHIFTS.iter().find_map(|shift| {
            let coord = Coord {
                x: point.lon - shift,
                y: point.lat,
            };
            self.polygons
                .iter()
                .find(|polygon| polygon.contains_planar(coord))
                .map(|polygon| polygon.name.as_str())
        })
    }

    /// Whether `point` is on land (polygon boundary included).
    pub fn contains(&self, point: Coordinate) -> bool {
        self.polygon_containing(point).is_some()
    }

    /// Whether the planar segment `a -> b` touches any polygon.
    ///
    /// `b` is taken on the short way round from `a`, so a leg from 179.8° to
    /// -179.7° spans half a degree rather than the whole globe.
    pub fn intersects_land(&self, a: Coordinate, b: Coordinate) -> bool {
        let b_lon = unwrap_lon(a.lon, b.lon);
        LONGITUDE_SHIFTS.iter().any(|shift| {
            let line = Line::new(
                Coord {
                    x: a.lon - shift,
                    y: a.lat,
                },
                Coord {
                    x: b_lon - shift,
                    y: b.lat,
                },
            );
            self.polygons
                .iter()
                .any(|polygon| polygon.intersects_planar(&line))
        })
    }

    pub fn polygons(&self) -> &[LandPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn within_rect(rect: &Rect<f64>, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
    max_x >= rect.min().x && min_x <= rect.max().x && max_y >= rect.min().y && min_y <= rect.max().y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    fn square_island() -> LandMask {
        LandMask::from_polygons(vec![LandPolygon::new(
            "island",
            &[[-1.0, -1.0], [-1.0, 1.0], [1.0, 1.0], [1.0, -1.0]],
        )
        .expect("valid polygon")])
    }

    #[test]
    fn point_in_polygon() {
        let mask = square_island();
        assert!(mask.contains(coord(0.0, 0.0)));
        assert!(!mask.contains(coord(2.0, 0.0)));
        assert_eq!(mask.polygon_containing(coord(0.5, 0.5)), Some("island"));
    }

    #[test]
    fn segment_crossing_polygon_is_detected() {
        let mask = square_island();
        assert!(mask.intersects_land(coord(0.0, -3.0), coord(0.0, 3.0)));
        assert!(!mask.intersects_land(coord(2.0, -3.0), coord(2.0, 3.0)));
    }

    #[test]
    fn antimeridian_copies_are_tested() {
        let mask = LandMask::from_polygons(vec![LandPolygon::new(
            "dateline",
            &[[-1.0, 178.0], [-1.0, 179.5], [1.0, 179.5], [1.0, 178.0]],
        )
        .expect("valid polygon")]);

        // A point given with an unwrapped longitude beyond +180.
        let unwrapped = Coordinate {
            lat: 0.0,
            lon: -181.0,
        };
        assert!(mask.contains(unwrapped));
        let from = Coordinate {
            lat: 0.0,
            lon: -185.0,
        };
        assert!(mask.intersects_land(from, coord(0.0, -175.0)));
    }

    #[test]
    fn normalized_leg_across_dateline_takes_the_short_way() {
        let mask = LandMask::from_polygons(vec![
            LandPolygon::new(
                "west",
                &[[-5.0, 170.0], [-5.0, 175.0], [5.0, 175.0], [5.0, 170.0]],
            )
            .expect("valid polygon"),
            LandPolygon::new(
                "east",
                &[[-5.0, -175.0], [-5.0, -170.0], [5.0, -170.0], [5.0, -175.0]],
            )
            .expect("valid polygon"),
        ]);

        // Open water between the two islands, in either direction.
        assert!(!mask.intersects_land(coord(0.0, 179.84), coord(0.0, -179.66)));
        assert!(!mask.intersects_land(coord(0.0, -179.66), coord(0.0, 179.84)));
        // A long leg still hits the far island.
        assert!(mask.intersects_land(coord(0.0, 179.0), coord(0.0, -172.0)));
    }

    #[test]
    fn rejects_degenerate_rings() {
        let error = LandPolygon::new("sliver", &[[0.0, 0.0], [1.0, 1.0]]).expect_err("too short");
        assert!(format!("{error}").contains("at least 3 vertices"));
    }

    #[test]
    fn builtin_mask_covers_continents_and_leaves_straits_open() {
        let mask = LandMask::builtin().expect("builtin land");
        assert!(!mask.is_empty());
        // Sahara and central Australia are land.
        assert!(mask.contains(coord(23.0, 10.0)));
        assert!(mask.contains(coord(-25.0, 134.0)));
        // Mid-Atlantic and Strait of Gibraltar are water.
        assert!(!mask.contains(coord(30.0, -40.0)));
        assert!(!mask.contains(coord(35.95, -5.6)));
    }

    #[test]
    fn empty_mask_blocks_nothing() {
        let mask = LandMask::empty();
        assert!(!mask.contains(coord(0.0, 0.0)));
        assert!(!mask.intersects_land(coord(0.0, 0.0), coord(10.0, 10.0)));
    }
}
