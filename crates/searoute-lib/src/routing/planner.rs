//! Search strategies behind a common trait.
//!
//! [`plan_voyage`](super::plan_voyage) only talks to [`RoutePlanner`], so new
//! algorithms can be added without touching the orchestration.

use crate::error::Result;
use crate::graph::NavigableGraph;
use crate::path::{find_path_a_star, find_path_dijkstra, PathOutcome, SearchDeadline};

use super::RouteAlgorithm;

/// A path search strategy over a [`NavigableGraph`].
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Search from `start` to `goal` within the shared deadline.
    fn find_path(
        &self,
        graph: &NavigableGraph,
        start: usize,
        goal: usize,
        deadline: &SearchDeadline,
    ) -> Result<PathOutcome>;

    /// Whether the search is guided by a distance-to-goal estimate.
    fn uses_heuristic(&self) -> bool {
        false
    }
}

/// Uniform-cost search over great-circle edge lengths.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &NavigableGraph,
        start: usize,
        goal: usize,
        deadline: &SearchDeadline,
    ) -> Result<PathOutcome> {
        find_path_dijkstra(graph, start, goal, deadline)
    }
}

/// A* guided by great-circle distance to the destination.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &NavigableGraph,
        start: usize,
        goal: usize,
        deadline: &SearchDeadline,
    ) -> Result<PathOutcome> {
        find_path_a_star(graph, start, goal, deadline)
    }

    fn uses_heuristic(&self) -> bool {
        true
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}
