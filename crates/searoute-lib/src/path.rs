use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geodesy::haversine_nm;
use crate::graph::NavigableGraph;
use crate::routing::RouteAlgorithm;

/// Default cap on node expansions per search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 2_000_000;

/// Default wall-clock limit for planning one voyage.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

/// Resource limits applied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_expansions: usize,
    pub time_limit: Duration,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

impl SearchBudget {
    /// Start the clock. The returned deadline can be shared by several searches.
    pub fn start(self) -> SearchDeadline {
        SearchDeadline {
            budget: self,
            started: Instant::now(),
        }
    }
}

/// A [`SearchBudget`] bound to the instant planning began.
#[derive(Debug, Clone, Copy)]
pub struct SearchDeadline {
    budget: SearchBudget,
    started: Instant,
}

impl SearchDeadline {
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn check(&self, expansions: usize) -> Result<()> {
        let elapsed = self.started.elapsed();
        if expansions > self.budget.max_expansions || elapsed > self.budget.time_limit {
            return Err(Error::SearchTimeout {
                expansions,
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathOutcome {
    /// Node ids from start to goal inclusive.
    pub nodes: Vec<usize>,
    /// Nodes removed from the open set before the goal was reached.
    pub expansions: usize,
}

/// Find the lowest-cost path with the requested algorithm.
pub fn find_path(
    graph: &NavigableGraph,
    start: usize,
    goal: usize,
    algorithm: RouteAlgorithm,
    deadline: &SearchDeadline,
) -> Result<PathOutcome> {
    match algorithm {
        RouteAlgorithm::Dijkstra => find_path_dijkstra(graph, start, goal, deadline),
        RouteAlgorithm::AStar => find_path_a_star(graph, start, goal, deadline),
    }
}

/// Run Dijkstra's algorithm over great-circle edge costs.
pub fn find_path_dijkstra(
    graph: &NavigableGraph,
    start: usize,
    goal: usize,
    deadline: &SearchDeadline,
) -> Result<PathOutcome> {
    search(graph, start, goal, deadline, |_| 0.0)
}

/// Run A* search using great-circle distance to the goal as the heuristic.
///
/// Edge costs are great-circle distances, so the heuristic is consistent and
/// the first time the goal is expanded its cost is optimal.
pub fn find_path_a_star(
    graph: &NavigableGraph,
    start: usize,
    goal: usize,
    deadline: &SearchDeadline,
) -> Result<PathOutcome> {
    let target = graph.node(goal);
    search(graph, start, goal, deadline, |node| {
        haversine_nm(graph.node(node), target)
    })
}

fn search<H>(
    graph: &NavigableGraph,
    start: usize,
    goal: usize,
    deadline: &SearchDeadline,
    heuristic: H,
) -> Result<PathOutcome>
where
    H: Fn(usize) -> f64,
{
    if start == goal {
        return Ok(PathOutcome {
            nodes: vec![start],
            expansions: 0,
        });
    }

    let count = graph.node_count();
    let mut costs = vec![f64::INFINITY; count];
    let mut parents: Vec<Option<usize>> = vec![None; count];
    let mut closed = vec![false; count];
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;
    let mut expansions = 0usize;

    costs[start] = 0.0;
    queue.push(QueueEntry::new(start, 0.0, heuristic(start), sequence));

    while let Some(entry) = queue.pop() {
        if closed[entry.node] || entry.cost.0 > costs[entry.node] {
            continue;
        }
        closed[entry.node] = true;
        expansions += 1;
        deadline.check(expansions)?;

        if entry.node == goal {
            return Ok(PathOutcome {
                nodes: reconstruct_path(&parents, start, goal),
                expansions,
            });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if closed[next] {
                continue;
            }
            let next_cost = entry.cost.0 + edge.cost_nm;
            // Strictly lower only: equal-cost alternatives keep the first parent.
            if next_cost < costs[next] {
                costs[next] = next_cost;
                parents[next] = Some(entry.node);
                sequence += 1;
                queue.push(QueueEntry::new(next, next_cost, heuristic(next), sequence));
            }
        }
    }

    tracing::debug!(expansions, "open set exhausted without reaching goal");
    Err(Error::NoRoute {
        origin: graph.node(start).to_string(),
        destination: graph.node(goal).to_string(),
    })
}

fn reconstruct_path(parents: &[Option<usize>], start: usize, goal: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
    priority: FloatOrd,
    sequence: u64,
}

impl QueueEntry {
    fn new(node: usize, cost: f64, heuristic: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            priority: FloatOrd(cost + heuristic),
            sequence,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap; earlier pushes win ties.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::Coordinate;
    use crate::graph::{build_navigable_graph, GraphOptions};
    use crate::hazard::{HazardCategory, HazardZone};
    use crate::land::LandMask;
    use crate::obstacles::Obstacles;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    fn open_graph(hazards: &[HazardZone]) -> NavigableGraph {
        let land = LandMask::empty();
        let obstacles = Obstacles::new(&land, hazards);
        let options = GraphOptions {
            resolution_deg: 0.5,
            margin_deg: 3.0,
            ..GraphOptions::default()
        };
        build_navigable_graph(coord(0.0, 0.0), coord(0.0, 6.0), &obstacles, &options)
            .expect("graph builds")
    }

    fn path_cost(graph: &NavigableGraph, nodes: &[usize]) -> f64 {
        nodes
            .windows(2)
            .map(|pair| haversine_nm(graph.node(pair[0]), graph.node(pair[1])))
            .sum()
    }

    #[test]
    fn start_equals_goal_returns_single_node() {
        let graph = open_graph(&[]);
        let deadline = SearchBudget::default().start();
        let outcome = find_path_dijkstra(&graph, 3, 3, &deadline).expect("path");
        assert_eq!(outcome.nodes, vec![3]);
        assert_eq!(outcome.expansions, 0);
    }

    #[test]
    fn dijkstra_and_a_star_agree_on_cost() {
        let graph = open_graph(&[]);
        let deadline = SearchBudget::default().start();
        let dijkstra = find_path_dijkstra(&graph, graph.origin(), graph.destination(), &deadline)
            .expect("path");
        let a_star =
            find_path_a_star(&graph, graph.origin(), graph.destination(), &deadline).expect("path");

        assert_eq!(dijkstra.nodes.first(), Some(&graph.origin()));
        assert_eq!(dijkstra.nodes.last(), Some(&graph.destination()));
        let difference =
            (path_cost(&graph, &dijkstra.nodes) - path_cost(&graph, &a_star.nodes)).abs();
        assert!(difference < 1e-6, "costs differ by {difference}");
        assert!(a_star.expansions <= dijkstra.expansions);
    }

    #[test]
    fn search_is_deterministic() {
        let graph = open_graph(&[]);
        let first = find_path(
            &graph,
            graph.origin(),
            graph.destination(),
            RouteAlgorithm::AStar,
            &SearchBudget::default().start(),
        )
        .expect("path");
        for _ in 0..5 {
            let again = find_path(
                &graph,
                graph.origin(),
                graph.destination(),
                RouteAlgorithm::AStar,
                &SearchBudget::default().start(),
            )
            .expect("path");
            assert_eq!(again, first);
        }
    }

    #[test]
    fn detours_around_hazard() {
        let hazards =
            vec![HazardZone::new(coord(0.0, 3.0), 60.0, HazardCategory::Weather).expect("hazard")];
        let graph = open_graph(&hazards);
        let outcome = find_path_a_star(
            &graph,
            graph.origin(),
            graph.destination(),
            &SearchBudget::default().start(),
        )
        .expect("path");
        let direct = haversine_nm(coord(0.0, 0.0), coord(0.0, 6.0));
        assert!(path_cost(&graph, &outcome.nodes) > direct);
        for pair in outcome.nodes.windows(2) {
            assert!(!hazards[0].intersects_segment(graph.node(pair[0]), graph.node(pair[1])));
        }
    }

    #[test]
    fn tiny_expansion_budget_times_out() {
        let graph = open_graph(&[]);
        let deadline = SearchBudget {
            max_expansions: 3,
            time_limit: Duration::from_secs(10),
        }
        .start();
        let error = find_path_dijkstra(&graph, graph.origin(), graph.destination(), &deadline)
            .expect_err("budget exceeded");
        match error {
            Error::SearchTimeout { expansions, .. } => assert_eq!(expansions, 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_time_limit_times_out() {
        let graph = open_graph(&[]);
        let deadline = SearchBudget {
            max_expansions: usize::MAX,
            time_limit: Duration::ZERO,
        }
        .start();
        std::thread::sleep(Duration::from_millis(2));
        let error = find_path_a_star(&graph, graph.origin(), graph.destination(), &deadline)
            .expect_err("time exceeded");
        assert!(matches!(error, Error::SearchTimeout { .. }));
    }

    #[test]
    fn queue_entries_break_ties_by_insertion_order() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry::new(7, 1.0, 0.0, 2));
        heap.push(QueueEntry::new(9, 1.0, 0.0, 1));
        heap.push(QueueEntry::new(1, 0.5, 0.0, 3));
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![1, 9, 7]);
    }
}
