use crate::error::Result;
use crate::geodesy::{interpolate, Coordinate};

/// Points sampled along the direct route when the caller does not choose.
pub const DEFAULT_SAMPLES: usize = 32;

/// Sample the great circle from `origin` to `destination`, ignoring obstacles.
///
/// `samples` is clamped to at least 2. The first and last points are the
/// inputs unchanged; a zero-length route yields a single point.
pub fn great_circle(
    origin: Coordinate,
    destination: Coordinate,
    samples: usize,
) -> Result<Vec<Coordinate>> {
    origin.validate()?;
    destination.validate()?;

    if origin == destination {
        return Ok(vec![origin]);
    }

    let samples = samples.max(2);
    let last = samples - 1;
    let mut points = Vec::with_capacity(samples);
    points.push(origin);
    for step in 1..last {
        let fraction = step as f64 / last as f64;
        points.push(interpolate(origin, destination, fraction));
    }
    points.push(destination);
    Ok(points)
}
