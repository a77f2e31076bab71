//! Weighted undirected planar graph with circular obstacles
//!
//! Nodes are stored in insertion order and addressed either by their string
//! id or by their dense index. Every edge is stored symmetrically so both
//! directions can be looked up, and neighbor lists keep insertion order so
//! search and export are deterministic.

use std::collections::HashMap;

use itertools::Itertools;

use crate::common::{Obstacle, PlanningError, PlanningResult, Point2D};

/// A node of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub position: Point2D,
    /// Externally supplied cost-so-far carried by the node record
    pub base_cost: f64,
}

/// Result of an edge insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsertion {
    Inserted,
    /// The edge existed already (in either direction); nothing changed
    AlreadyPresent,
}

/// Graph of positioned nodes, symmetric weighted edges and obstacles
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_costs: HashMap<(usize, usize), f64>,
    edges: Vec<(usize, usize)>,
    obstacles: Vec<Obstacle>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Insert a node, returning its index.
    ///
    /// Ids must be writable as a record field: non-empty, no commas, no
    /// surrounding whitespace and no leading `#`.
    pub fn add_node(&mut self, id: &str, position: Point2D, base_cost: f64) -> PlanningResult<usize> {
        if id.is_empty() || id.contains(',') || id.trim() != id || id.starts_with('#') {
            return Err(PlanningError::InvalidParameter(format!(
                "node id '{}' cannot be written as a record field",
                id
            )));
        }
        if self.index.contains_key(id) {
            return Err(PlanningError::DuplicateNode(id.to_string()));
        }
        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_string(),
            position,
            base_cost,
        });
        self.index.insert(id.to_string(), index);
        self.adjacency.push(Vec::new());
        Ok(index)
    }

    /// Insert an undirected edge between two node indices.
    ///
    /// Re-inserting an existing edge keeps the stored weight and reports
    /// [`EdgeInsertion::AlreadyPresent`].
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) -> PlanningResult<EdgeInsertion> {
        let n = self.nodes.len();
        if a >= n || b >= n {
            return Err(PlanningError::InvalidParameter(format!(
                "edge ({}, {}) out of range for {} nodes",
                a, b, n
            )));
        }
        if a == b {
            return Err(PlanningError::SelfConnectionAttempt(self.nodes[a].id.clone()));
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(PlanningError::InvalidParameter(format!(
                "edge {}-{} weight must be non-negative, got {}",
                self.nodes[a].id, self.nodes[b].id, weight
            )));
        }
        if self.edge_costs.contains_key(&(a, b)) {
            return Ok(EdgeInsertion::AlreadyPresent);
        }

        self.edge_costs.insert((a, b), weight);
        self.edge_costs.insert((b, a), weight);
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edges.push((a, b));
        Ok(EdgeInsertion::Inserted)
    }

    /// Insert an undirected edge between two node ids
    pub fn add_edge_by_id(&mut self, id1: &str, id2: &str, weight: f64) -> PlanningResult<EdgeInsertion> {
        let a = self.require_edge_endpoint(id1, id2, id1)?;
        let b = self.require_edge_endpoint(id1, id2, id2)?;
        self.add_edge(a, b, weight)
    }

    fn require_edge_endpoint(&self, id1: &str, id2: &str, id: &str) -> PlanningResult<usize> {
        self.node_index(id).ok_or_else(|| PlanningError::UnknownNode {
            from: id1.to_string(),
            to: id2.to_string(),
            missing: id.to_string(),
        })
    }

    /// Neighbor indices of a node, in edge insertion order
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbor ids of a node, `None` if the id is unknown
    pub fn neighbor_ids(&self, id: &str) -> Option<Vec<&str>> {
        let i = self.node_index(id)?;
        Some(
            self.adjacency[i]
                .iter()
                .map(|&j| self.nodes[j].id.as_str())
                .collect(),
        )
    }

    /// Weight of the edge from `a` to `b`
    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.edge_costs.get(&(a, b)).copied()
    }

    pub fn edge_weight_by_id(&self, id1: &str, id2: &str) -> Option<f64> {
        self.edge_weight(self.node_index(id1)?, self.node_index(id2)?)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_costs.contains_key(&(a, b))
    }

    /// Undirected edges `(a, b, weight)` in insertion order, each listed once
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.edges
            .iter()
            .map(move |&(a, b)| (a, b, self.edge_costs[&(a, b)]))
    }

    /// Sum of edge weights along a sequence of node ids.
    ///
    /// Empty and single-node sequences cost nothing. Works for any candidate
    /// sequence, not only for paths produced by a search.
    pub fn path_cost<S: AsRef<str>>(&self, path: &[S]) -> PlanningResult<f64> {
        path.iter().tuple_windows().try_fold(0.0, |acc, (from, to)| {
            let (from, to) = (from.as_ref(), to.as_ref());
            if let Some(missing) = [from, to].into_iter().find(|id| !self.contains(id)) {
                return Err(PlanningError::UnknownNode {
                    from: from.to_string(),
                    to: to.to_string(),
                    missing: missing.to_string(),
                });
            }
            let weight = self
                .edge_weight_by_id(from, to)
                .ok_or_else(|| PlanningError::MissingEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                })?;
            Ok(acc + weight)
        })
    }
}
