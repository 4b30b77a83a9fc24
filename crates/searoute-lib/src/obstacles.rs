use std::fmt;

use crate::geodesy::Coordinate;
use crate::hazard::{hazard_containing, intersects_hazard, HazardZone};
use crate::land::LandMask;

/// Why a point cannot be navigated.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstruction<'a> {
    Land { polygon: &'a str },
    Hazard(&'a HazardZone),
}

impl fmt::Display for Obstruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obstruction::Land { polygon } => write!(f, "lies on land ({polygon})"),
            Obstruction::Hazard(hazard) => write!(f, "lies inside {}", hazard.label()),
        }
    }
}

/// Combined land and hazard model for a single planning request.
#[derive(Debug, Clone, Copy)]
pub struct Obstacles<'a> {
    pub land: &'a LandMask,
    pub hazards: &'a [HazardZone],
}

impl<'a> Obstacles<'a> {
    pub fn new(land: &'a LandMask, hazards: &'a [HazardZone]) -> Self {
        Self { land, hazards }
    }

    /// What, if anything, blocks `point`. Land is reported before hazards.
    pub fn point_obstruction(&self, point: Coordinate) -> Option<Obstruction<'a>> {
        if let Some(polygon) = self.land.polygon_containing(point) {
            return Some(Obstruction::Land { polygon });
        }
        hazard_containing(point, self.hazards).map(Obstruction::Hazard)
    }

    pub fn point_blocked(&self, point: Coordinate) -> bool {
        self.point_obstruction(point).is_some()
    }

    /// Whether travelling `a -> b` would cross land or enter a hazard.
    pub fn segment_blocked(&self, a: Coordinate, b: Coordinate) -> bool {
        intersects_hazard(a, b, self.hazards) || self.land.intersects_land(a, b)
    }
}
