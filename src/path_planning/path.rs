//! Search results and parent-link path reconstruction

use crate::common::Point2D;
use crate::graph::Graph;

/// Ordered node ids from start to goal with their summed edge cost
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub nodes: Vec<String>,
    pub cost: f64,
}

impl GraphPath {
    /// The empty path, meaning no path exists
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            cost: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node positions along the path; unknown ids are skipped
    pub fn positions(&self, graph: &Graph) -> Vec<Point2D> {
        self.nodes
            .iter()
            .filter_map(|id| graph.node_by_id(id).map(|n| n.position))
            .collect()
    }
}

impl Default for GraphPath {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of a search that ran to completion
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found { path: GraphPath, expanded: usize },
    /// The open set ran empty before the goal was reached
    NoPathFound { expanded: usize },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&GraphPath> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            SearchOutcome::NoPathFound { .. } => None,
        }
    }

    /// The found path, or the empty path
    pub fn into_path(self) -> GraphPath {
        match self {
            SearchOutcome::Found { path, .. } => path,
            SearchOutcome::NoPathFound { .. } => GraphPath::empty(),
        }
    }

    pub fn expanded(&self) -> usize {
        match self {
            SearchOutcome::Found { expanded, .. } | SearchOutcome::NoPathFound { expanded } => *expanded,
        }
    }
}

/// Follow parent links from `node` back to the root and return the chain root first.
///
/// At most `limit` nodes are collected, which bounds the walk even if the
/// parent links were to contain a cycle.
pub fn reconstruct_path<F>(node: usize, parent_of: F, limit: usize) -> Vec<usize>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut path = vec![node];
    let mut current = node;
    while let Some(parent) = parent_of(current) {
        if path.len() >= limit {
            break;
        }
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
