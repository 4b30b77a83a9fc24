//! Lattice graph over open water used by the route search.
//!
//! Node ids are dense indices. Lattice nodes come first in row-major order
//! (south to north, west to east), followed by the origin and destination.
//! Node positions keep unwrapped longitudes so that a bounding region spanning
//! the antimeridian stays contiguous.

use tracing::{debug, info};

use crate::error::{Endpoint, Error, Result};
use crate::geodesy::{haversine_nm, unwrap_lon, Coordinate, NM_PER_DEGREE};
use crate::obstacles::Obstacles;
use crate::spatial::NodeIndex;

/// Default lattice spacing in degrees.
pub const DEFAULT_RESOLUTION_DEG: f64 = 0.5;

/// Default padding around the origin/destination bounding box in degrees.
pub const DEFAULT_MARGIN_DEG: f64 = 5.0;

/// Upper bound on lattice points before the resolution is coarsened.
pub const DEFAULT_MAX_NODES: usize = 40_000;

/// Lattice nodes each endpoint tries to connect to.
pub const DEFAULT_ENDPOINT_NEIGHBOURS: usize = 8;

/// Factor applied to the resolution while the lattice is too large.
const RESOLUTION_GROWTH: f64 = 1.25;

/// Lattice latitudes are clamped to this band.
const MAX_LATITUDE: f64 = 85.0;

/// Row/column offsets of the 8-connected neighbourhood in ascending node-id order.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Options controlling lattice construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphOptions {
    pub resolution_deg: f64,
    pub margin_deg: f64,
    pub max_nodes: usize,
    pub endpoint_neighbours: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            resolution_deg: DEFAULT_RESOLUTION_DEG,
            margin_deg: DEFAULT_MARGIN_DEG,
            max_nodes: DEFAULT_MAX_NODES,
            endpoint_neighbours: DEFAULT_ENDPOINT_NEIGHBOURS,
        }
    }
}

impl GraphOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.resolution_deg.is_finite() || self.resolution_deg <= 0.0 {
            return Err(Error::InvalidOptions {
                message: format!(
                    "resolution_deg must be positive, got {}",
                    self.resolution_deg
                ),
            });
        }
        if !self.margin_deg.is_finite() || self.margin_deg < 0.0 {
            return Err(Error::InvalidOptions {
                message: format!("margin_deg must be non-negative, got {}", self.margin_deg),
            });
        }
        if self.max_nodes < 4 {
            return Err(Error::InvalidOptions {
                message: format!("max_nodes must be at least 4, got {}", self.max_nodes),
            });
        }
        if self.endpoint_neighbours == 0 {
            return Err(Error::InvalidOptions {
                message: "endpoint_neighbours must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Directed edge within the navigable graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: usize,
    pub cost_nm: f64,
}

/// Graph of open-water nodes for a single origin/destination pair.
#[derive(Debug, Clone)]
pub struct NavigableGraph {
    nodes: Vec<Coordinate>,
    adjacency: Vec<Vec<Edge>>,
    origin: usize,
    destination: usize,
    resolution_deg: f64,
    margin_deg: f64,
}

impl NavigableGraph {
    /// Position of a node. Longitudes may lie outside [-180, 180].
    pub fn node(&self, id: usize) -> Coordinate {
        self.nodes[id]
    }

    /// Outgoing edges of a node, ordered by target id.
    pub fn neighbours(&self, id: usize) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Lattice spacing actually used after coarsening.
    pub fn resolution_deg(&self) -> f64 {
        self.resolution_deg
    }

    pub fn margin_deg(&self) -> f64 {
        self.margin_deg
    }

    /// Total node count including the two endpoints.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    fn add_edge(&mut self, a: usize, b: usize, cost_nm: f64) {
        self.adjacency[a].push(Edge { target: b, cost_nm });
        self.adjacency[b].push(Edge { target: a, cost_nm });
    }
}

/// Lattice geometry derived from the bounding region.
#[derive(Debug, Clone, Copy)]
struct Lattice {
    lat0: f64,
    lon0: f64,
    rows: usize,
    cols: usize,
    resolution: f64,
}

impl Lattice {
    fn plan(origin: Coordinate, destination: Coordinate, options: &GraphOptions) -> Self {
        let lat0 = (origin.lat.min(destination.lat) - options.margin_deg).max(-MAX_LATITUDE);
        let lat1 = (origin.lat.max(destination.lat) + options.margin_deg).min(MAX_LATITUDE);
        let lon0 = origin.lon.min(destination.lon) - options.margin_deg;
        let lon1 = origin.lon.max(destination.lon) + options.margin_deg;

        let mut resolution = options.resolution_deg;
        let (mut rows, mut cols) = (
            steps(lat0, lat1, resolution),
            steps(lon0, lon1, resolution),
        );
        while rows.saturating_mul(cols) > options.max_nodes {
            resolution *= RESOLUTION_GROWTH;
            rows = steps(lat0, lat1, resolution);
            cols = steps(lon0, lon1, resolution);
        }

        Self {
            lat0,
            lon0,
            rows,
            cols,
            resolution,
        }
    }

    fn point(&self, row: usize, col: usize) -> Coordinate {
        Coordinate {
            lat: self.lat0 + row as f64 * self.resolution,
            lon: self.lon0 + col as f64 * self.resolution,
        }
    }
}

fn steps(start: f64, end: f64, resolution: f64) -> usize {
    if end < start {
        0
    } else {
        ((end - start) / resolution).floor() as usize + 1
    }
}

/// Build the open-water graph for one voyage.
///
/// Fails with [`Error::Unreachable`] when an endpoint is itself obstructed and
/// with [`Error::NoRoute`] when an endpoint cannot be connected to the lattice.
pub fn build_navigable_graph(
    origin: Coordinate,
    destination: Coordinate,
    obstacles: &Obstacles<'_>,
    options: &GraphOptions,
) -> Result<NavigableGraph> {
    options.validate()?;
    origin.validate()?;
    destination.validate()?;

    let destination_unwrapped = Coordinate {
        lat: destination.lat,
        lon: unwrap_lon(origin.lon, destination.lon),
    };

    if let Some(obstruction) = obstacles.point_obstruction(origin) {
        return Err(Error::Unreachable {
            endpoint: Endpoint::Origin,
            reason: obstruction.to_string(),
        });
    }
    if let Some(obstruction) = obstacles.point_obstruction(destination_unwrapped) {
        return Err(Error::Unreachable {
            endpoint: Endpoint::Destination,
            reason: obstruction.to_string(),
        });
    }

    let lattice = Lattice::plan(origin, destination_unwrapped, options);
    debug!(
        rows = lattice.rows,
        cols = lattice.cols,
        resolution_deg = lattice.resolution,
        margin_deg = options.margin_deg,
        "planned lattice"
    );

    // Step 1: open-water lattice nodes
    let mut slots: Vec<Option<usize>> = vec![None; lattice.rows * lattice.cols];
    let mut nodes = Vec::new();
    for row in 0..lattice.rows {
        for col in 0..lattice.cols {
            let point = lattice.point(row, col);
            if !obstacles.point_blocked(point) {
                slots[row * lattice.cols + col] = Some(nodes.len());
                nodes.push(point);
            }
        }
    }
    let lattice_nodes = nodes.len();

    let origin_id = lattice_nodes;
    let destination_id = lattice_nodes + 1;
    nodes.push(origin);
    nodes.push(destination_unwrapped);

    let mut graph = NavigableGraph {
        adjacency: vec![Vec::new(); nodes.len()],
        nodes,
        origin: origin_id,
        destination: destination_id,
        resolution_deg: lattice.resolution,
        margin_deg: options.margin_deg,
    };

    // Step 2: 8-connected lattice edges, each undirected pair tested once
    for row in 0..lattice.rows {
        for col in 0..lattice.cols {
            let Some(id) = slots[row * lattice.cols + col] else {
                continue;
            };
            for (dr, dc) in NEIGHBOUR_OFFSETS {
                let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
                else {
                    continue;
                };
                if r >= lattice.rows || c >= lattice.cols {
                    continue;
                }
                let Some(neighbour) = slots[r * lattice.cols + c] else {
                    continue;
                };
                if neighbour <= id {
                    continue;
                }
                let (a, b) = (graph.nodes[id], graph.nodes[neighbour]);
                if !obstacles.segment_blocked(a, b) {
                    graph.add_edge(id, neighbour, haversine_nm(a, b));
                }
            }
        }
    }

    // Step 3: connect the endpoints
    let index = NodeIndex::build((0..lattice_nodes).map(|id| (id, graph.nodes[id])));
    let origin_links = attach_endpoint(&mut graph, &index, origin_id, obstacles, options);
    let destination_links =
        attach_endpoint(&mut graph, &index, destination_id, obstacles, options);

    let direct_nm = haversine_nm(origin, destination_unwrapped);
    let cell_nm = lattice.resolution * NM_PER_DEGREE;
    let direct_link =
        direct_nm <= cell_nm && !obstacles.segment_blocked(origin, destination_unwrapped);
    if direct_link {
        graph.add_edge(origin_id, destination_id, direct_nm);
    }

    if !direct_link && (origin_links == 0 || destination_links == 0) {
        debug!(
            origin_links,
            destination_links, "endpoint could not be connected to the lattice"
        );
        return Err(Error::NoRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    }

    for edges in &mut graph.adjacency {
        edges.sort_by_key(|edge| edge.target);
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        resolution_deg = graph.resolution_deg,
        margin_deg = graph.margin_deg,
        "built navigable graph"
    );

    Ok(graph)
}

fn attach_endpoint(
    graph: &mut NavigableGraph,
    index: &NodeIndex,
    endpoint: usize,
    obstacles: &Obstacles<'_>,
    options: &GraphOptions,
) -> usize {
    let position = graph.nodes[endpoint];
    let mut links = 0;
    for candidate in index.nearest(position, options.endpoint_neighbours) {
        let target = graph.nodes[candidate];
        if !obstacles.segment_blocked(position, target) {
            graph.add_edge(endpoint, candidate, haversine_nm(position, target));
            links += 1;
        }
    }
    links
}
