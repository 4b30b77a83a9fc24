//! KD-tree over grid nodes for nearest-node lookup.
//!
//! Nodes are indexed by their position on the unit sphere so that straight-line
//! (chord) distance orders candidates the same way as great-circle distance,
//! including across the antimeridian.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::geodesy::Coordinate;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-neighbour index keyed by node id.
pub struct NodeIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    len: usize,
}

impl NodeIndex {
    /// Index `(node_id, coordinate)` pairs.
    pub fn build<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (usize, Coordinate)>,
    {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut len = 0;
        for (id, coordinate) in nodes {
            tree.add(&coordinate.to_unit_vector(), id);
            len += 1;
        }
        Self { tree, len }
    }

    /// Up to `k` node ids nearest to `point`, closest first.
    ///
    /// Ties on distance are ordered by node id.
    pub fn nearest(&self, point: Coordinate, k: usize) -> Vec<usize> {
        if k == 0 || self.len == 0 {
            return Vec::new();
        }
        let mut results: Vec<(usize, f64)> = self
            .tree
            .nearest_n::<SquaredEuclidean>(&point.to_unit_vector(), k)
            .into_iter()
            .map(|neighbour| (neighbour.item, neighbour.distance))
            .collect();
        results.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        results.into_iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIndex").field("len", &self.len).finish()
    }
}
