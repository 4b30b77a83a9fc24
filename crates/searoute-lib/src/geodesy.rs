//! Spherical-earth geometry shared by the obstacle model, graph builder, and metrics.
//!
//! All distances are great-circle distances on a sphere of radius 6371 km,
//! reported in nautical miles (1 NM = 1.852 km). Distance and interpolation
//! use `geo`'s haversine metric; the minor-arc cross-track distance is local.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use geo::{Destination, Distance, HaversineMeasure, InterpolatePoint, Point};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per nautical mile.
pub const KM_PER_NM: f64 = 1.852;

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = EARTH_RADIUS_KM / KM_PER_NM;

/// Nautical miles per degree of arc along a great circle.
pub const NM_PER_DEGREE: f64 = 60.0;

/// Geographic position in decimal degrees.
///
/// Serializes as a `[lat, lon]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(Error::invalid_coordinate(
                self.lat,
                self.lon,
                "latitude and longitude must be finite",
            ));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::invalid_coordinate(
                self.lat,
                self.lon,
                "latitude must be within [-90, 90]",
            ));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::invalid_coordinate(
                self.lat,
                self.lon,
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(())
    }

    /// Position on the unit sphere (x towards 0°E on the equator, z towards the north pole).
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Self {
            lat: value[0],
            lon: value[1],
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lat, value.lon]
    }
}

/// Haversine metric on a sphere measured in nautical miles.
const SPHERE_NM: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_NM);

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point::new(value.lon, value.lat)
    }
}

/// Great-circle distance between two coordinates in nautical miles.
pub fn haversine_nm(a: Coordinate, b: Coordinate) -> f64 {
    let distance = SPHERE_NM.distance(Point::from(a), Point::from(b));
    // Rounding can push the haversine term past 1 for antipodal points.
    if distance.is_nan() {
        PI * EARTH_RADIUS_NM
    } else {
        distance
    }
}

/// Sum of consecutive great-circle segment lengths.
pub fn path_length_nm(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_nm(pair[0], pair[1]))
        .sum()
}

/// Point at fraction `f` in [0, 1] along the great circle from `a` to `b`.
pub fn interpolate(a: Coordinate, b: Coordinate, f: f64) -> Coordinate {
    if haversine_nm(a, b) > PI * EARTH_RADIUS_NM - 1e-6 {
        // Antipodal endpoints: any great circle works, go through the point a
        // quarter turn due north of `a`.
        let quarter_turn_nm = FRAC_PI_2 * EARTH_RADIUS_NM;
        let mid = to_coordinate(SPHERE_NM.destination(Point::from(a), 0.0, quarter_turn_nm));
        return if f <= 0.5 {
            interpolate(a, mid, f * 2.0)
        } else {
            interpolate(mid, b, (f - 0.5) * 2.0)
        };
    }
    to_coordinate(SPHERE_NM.point_at_ratio_between(Point::from(a), Point::from(b), f))
}

fn to_coordinate(point: Point<f64>) -> Coordinate {
    Coordinate {
        lat: point.y(),
        lon: normalize_lon(point.x()),
    }
}

/// Minimum great-circle distance (NM) from `point` to the minor arc `a -> b`.
///
/// Uses the perpendicular (cross-track) distance when the foot of the
/// perpendicular falls on the arc, otherwise the distance to the nearer end.
pub fn cross_track_distance_nm(point: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let endpoint_distance = haversine_nm(point, a).min(haversine_nm(point, b));

    let va = a.to_unit_vector();
    let vb = b.to_unit_vector();
    let normal = cross(va, vb);
    let normal_len = norm(normal);
    if normal_len < 1e-12 {
        return endpoint_distance;
    }
    let n = scale(normal, 1.0 / normal_len);

    let vp = point.to_unit_vector();
    let offset = dot(vp, n);
    let foot = [
        vp[0] - offset * n[0],
        vp[1] - offset * n[1],
        vp[2] - offset * n[2],
    ];
    if norm(foot) < 1e-12 {
        return endpoint_distance;
    }

    let within_arc = dot(cross(va, foot), n) >= 0.0 && dot(cross(foot, vb), n) >= 0.0;
    if within_arc {
        (EARTH_RADIUS_NM * offset.clamp(-1.0, 1.0).asin().abs()).min(endpoint_distance)
    } else {
        endpoint_distance
    }
}

/// Normalize a longitude into [-180, 180).
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped.abs() < 1e-12 {
        0.0
    } else {
        wrapped
    }
}

/// Shift `lon` by a multiple of 360° so it lies within 180° of `reference`.
pub fn unwrap_lon(reference: f64, lon: f64) -> f64 {
    let mut unwrapped = lon;
    while unwrapped - reference > 180.0 {
        unwrapped -= 360.0;
    }
    while reference - unwrapped > 180.0 {
        unwrapped += 360.0;
    }
    unwrapped
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn scale(a: [f64; 3], factor: f64) -> [f64; 3] {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}
