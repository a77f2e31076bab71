//! A* search over a weighted node graph
//!
//! Nodes move `Unvisited -> Open -> Closed` and are never reopened. The
//! heuristic is the straight-line distance to the goal, which keeps the
//! search optimal as long as every edge weight is at least the distance
//! between its endpoints (see [`Graph::check_edge_weights`]).
//!
//! Among open nodes with equal `f`, the one discovered first is expanded
//! first. All search state is local to one [`AStarPlanner::find_path`] call.

use log::{debug, trace};

use crate::common::geometry::distance;
use crate::common::{Endpoint, GraphPlanner, PlanningError, PlanningResult, Point2D};
use crate::graph::Graph;
use crate::path_planning::open_set::OpenSet;
use crate::path_planning::path::{reconstruct_path, GraphPath, SearchOutcome};

/// Visitation status of a node during one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Unvisited,
    Open,
    Closed,
}

/// Initial accumulated cost of the start node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCost {
    Zero,
    /// Seed `g(start)` with the start node's record cost
    BaseCost,
}

/// Configuration for A* planner
#[derive(Debug, Clone)]
pub struct AStarConfig {
    pub start_cost: StartCost,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            start_cost: StartCost::Zero,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    g: f64,
    f: f64,
    status: NodeStatus,
    parent: Option<usize>,
}

impl SearchNode {
    fn unvisited() -> Self {
        Self {
            g: f64::INFINITY,
            f: f64::INFINITY,
            status: NodeStatus::Unvisited,
            parent: None,
        }
    }
}

/// A* graph planner
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    fn calc_heuristic(position: &Point2D, goal: &Point2D) -> f64 {
        distance(position, goal)
    }

    fn resolve(graph: &Graph, id: &str, endpoint: Endpoint) -> PlanningResult<usize> {
        graph.node_index(id).ok_or_else(|| PlanningError::NodeNotFound {
            id: id.to_string(),
            endpoint,
        })
    }

    /// Find the cheapest path from `start` to `goal`.
    ///
    /// Returns `NodeNotFound` before searching if either id is absent.
    pub fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> PlanningResult<SearchOutcome> {
        let start_index = Self::resolve(graph, start, Endpoint::Start)?;
        let goal_index = Self::resolve(graph, goal, Endpoint::Goal)?;
        let goal_position = graph.nodes()[goal_index].position;

        let mut states = vec![SearchNode::unvisited(); graph.node_count()];
        let mut open_set = OpenSet::new();

        let g0 = match self.config.start_cost {
            StartCost::Zero => 0.0,
            StartCost::BaseCost => graph.nodes()[start_index].base_cost,
        };
        let f0 = g0 + Self::calc_heuristic(&graph.nodes()[start_index].position, &goal_position);
        states[start_index] = SearchNode {
            g: g0,
            f: f0,
            status: NodeStatus::Open,
            parent: None,
        };
        open_set.push(start_index, f0);

        let mut expanded = 0;
        while let Some((current, _)) = open_set.pop_min() {
            if current == goal_index {
                let indices = reconstruct_path(current, |i| states[i].parent, states.len());
                let nodes: Vec<String> = indices
                    .iter()
                    .map(|&i| graph.nodes()[i].id.clone())
                    .collect();
                let cost = graph.path_cost(&nodes)?;
                debug!(
                    "A* reached '{}' from '{}' after {} expansions, {} nodes, cost {:.3}",
                    goal,
                    start,
                    expanded,
                    nodes.len(),
                    cost
                );
                return Ok(SearchOutcome::Found {
                    path: GraphPath { nodes, cost },
                    expanded,
                });
            }

            expanded += 1;
            let SearchNode { g, f, .. } = states[current];
            trace!(
                "expand '{}' g={:.3} f={:.3} open={}",
                graph.nodes()[current].id,
                g,
                f,
                open_set.len()
            );

            for &next in graph.neighbors(current) {
                let state = states[next];
                if state.status == NodeStatus::Closed {
                    continue;
                }
                let weight = match graph.edge_weight(current, next) {
                    Some(w) => w,
                    None => continue,
                };
                let new_g = g + weight;

                match state.status {
                    NodeStatus::Unvisited => {}
                    NodeStatus::Open if new_g < state.g => trace!(
                        "relax '{}' g {:.3} -> {:.3}",
                        graph.nodes()[next].id,
                        state.g,
                        new_g
                    ),
                    _ => continue,
                }

                let new_f = new_g + Self::calc_heuristic(&graph.nodes()[next].position, &goal_position);
                states[next] = SearchNode {
                    g: new_g,
                    f: new_f,
                    status: NodeStatus::Open,
                    parent: Some(current),
                };
                open_set.push(next, new_f);
            }

            states[current].status = NodeStatus::Closed;
        }

        debug!(
            "A* found no path from '{}' to '{}' after {} expansions",
            start, goal, expanded
        );
        Ok(SearchOutcome::NoPathFound { expanded })
    }
}

impl GraphPlanner for AStarPlanner {
    fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> PlanningResult<SearchOutcome> {
        AStarPlanner::find_path(self, graph, start, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::geometry;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn graph_from(nodes: &[(&str, f64, f64)], edges: &[(&str, &str, f64)]) -> Graph {
        let mut graph = Graph::new();
        for &(id, x, y) in nodes {
            graph.add_node(id, Point2D::new(x, y), 0.0).unwrap();
        }
        for &(a, b, w) in edges {
            graph.add_edge_by_id(a, b, w).unwrap();
        }
        graph
    }

    fn coursera_graph() -> Graph {
        graph_from(
            &[
                ("1", 0.0, 0.0),
                ("2", 12.0, 4.0),
                ("3", 10.0, 2.0),
                ("4", 10.0, -2.0),
                ("5", 12.0, -4.0),
                ("6", 20.0, 0.0),
            ],
            &[
                ("1", "3", 18.0),
                ("1", "4", 12.0),
                ("1", "5", 30.0),
                ("3", "2", 27.0),
                ("3", "6", 15.0),
                ("4", "6", 20.0),
                ("4", "5", 8.0),
                ("2", "6", 10.0),
                ("5", "6", 10.0),
            ],
        )
    }

    /// Cheapest cost by Bellman-Ford style relaxation over all edges
    fn exhaustive_cost(graph: &Graph, start: usize, goal: usize) -> Option<f64> {
        let mut dist = vec![f64::INFINITY; graph.node_count()];
        dist[start] = 0.0;
        for _ in 0..graph.node_count() {
            for (a, b, w) in graph.edges() {
                if dist[a] + w < dist[b] {
                    dist[b] = dist[a] + w;
                }
                if dist[b] + w < dist[a] {
                    dist[a] = dist[b] + w;
                }
            }
        }
        dist[goal].is_finite().then(|| dist[goal])
    }

    #[test]
    fn test_prefers_direct_edge() {
        let graph = graph_from(
            &[("A", 0.0, 0.0), ("B", 10.0, 0.0), ("C", 5.0, 5.0)],
            &[("A", "B", 15.0), ("A", "C", 8.0), ("C", "B", 8.0)],
        );
        let path = AStarPlanner::default()
            .find_path(&graph, "A", "B")
            .unwrap()
            .into_path();
        assert_eq!(path.nodes, vec!["A", "B"]);
        assert_eq!(path.cost, 15.0);
    }

    #[test]
    fn test_coursera_scene() {
        let graph = coursera_graph();
        let outcome = AStarPlanner::default().find_path(&graph, "1", "6").unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(path.nodes, vec!["1", "4", "5", "6"]);
        assert_eq!(path.cost, 30.0);
        assert_eq!(outcome.expanded(), 4);
        assert_eq!(graph.path_cost(&["1", "3", "6"]).unwrap(), 33.0);
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = coursera_graph();
        let path = AStarPlanner::default()
            .find_path(&graph, "3", "3")
            .unwrap()
            .into_path();
        assert_eq!(path.nodes, vec!["3"]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_base_cost_seeding_keeps_path_cost() {
        let mut graph = Graph::new();
        graph.add_node("s", Point2D::new(0.0, 0.0), 100.0).unwrap();
        graph.add_node("g", Point2D::new(1.0, 0.0), 0.0).unwrap();
        graph.add_edge_by_id("s", "g", 2.0).unwrap();
        let planner = AStarPlanner::new(AStarConfig {
            start_cost: StartCost::BaseCost,
        });
        let path = planner.find_path(&graph, "s", "g").unwrap().into_path();
        assert_eq!(path.nodes, vec!["s", "g"]);
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn test_disconnected_graph() {
        let graph = graph_from(
            &[("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 5.0, 0.0), ("d", 6.0, 0.0)],
            &[("a", "b", 1.0), ("c", "d", 1.0)],
        );
        let outcome = AStarPlanner::default().find_path(&graph, "a", "d").unwrap();
        assert!(matches!(outcome, SearchOutcome::NoPathFound { expanded: 2 }));
        assert!(outcome.into_path().is_empty());
    }

    #[test]
    fn test_missing_endpoints() {
        let graph = coursera_graph();
        let planner = AStarPlanner::default();
        assert!(matches!(
            planner.find_path(&graph, "x", "6"),
            Err(PlanningError::NodeNotFound { endpoint: Endpoint::Start, ref id }) if id == "x"
        ));
        assert!(matches!(
            planner.find_path(&graph, "1", "y"),
            Err(PlanningError::NodeNotFound { endpoint: Endpoint::Goal, ref id }) if id == "y"
        ));
    }

    #[test]
    fn test_relaxation_reorders_open_set() {
        // 'm' is first reached through the expensive edge s-m, then relaxed
        // through 'a'; it must still be expanded before 'x'.
        let graph = graph_from(
            &[
                ("s", 0.0, 0.0),
                ("a", 1.0, 1.0),
                ("m", 2.0, 0.0),
                ("x", 3.0, 3.0),
                ("g", 4.0, 0.0),
            ],
            &[
                ("s", "m", 20.0),
                ("s", "a", 1.5),
                ("a", "m", 1.5),
                ("s", "x", 5.0),
                ("x", "g", 5.0),
                ("m", "g", 2.0),
            ],
        );
        let path = AStarPlanner::default()
            .find_path(&graph, "s", "g")
            .unwrap()
            .into_path();
        assert_eq!(path.nodes, vec!["s", "a", "m", "g"]);
        assert_relative_eq!(path.cost, 5.0);
    }

    #[test]
    fn test_idempotent() {
        let graph = coursera_graph();
        let planner = AStarPlanner::default();
        let first = planner.find_path(&graph, "1", "2").unwrap();
        let second = planner.find_path(&graph, "1", "2").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_optimal_on_random_admissible_graphs() {
        let mut rng = StdRng::seed_from_u64(42);
        let planner = AStarPlanner::default();

        for _ in 0..25 {
            let mut graph = Graph::new();
            let n = 12;
            for i in 0..n {
                let p = Point2D::new(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0));
                graph.add_node(&i.to_string(), p, 0.0).unwrap();
            }
            for _ in 0..30 {
                let a = rng.gen_range(0..n);
                let b = rng.gen_range(0..n);
                if a == b {
                    continue;
                }
                let d = geometry::distance(&graph.nodes()[a].position, &graph.nodes()[b].position);
                let w = d * rng.gen_range(1.0..2.0);
                graph.add_edge(a, b, w).unwrap();
            }
            assert!(graph.check_edge_weights().is_empty());

            let outcome = planner.find_path(&graph, "0", "11").unwrap();
            match (exhaustive_cost(&graph, 0, 11), outcome.path()) {
                (Some(best), Some(path)) => assert_relative_eq!(path.cost, best, epsilon = 1e-9),
                (None, None) => {}
                (expected, found) => panic!("expected {:?}, found {:?}", expected, found),
            }
        }
    }
}
