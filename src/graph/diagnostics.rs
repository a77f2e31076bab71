//! Edge-weight diagnostics
//!
//! The Euclidean heuristic is only admissible when no edge is cheaper than
//! the straight line between its endpoints. Nothing enforces that on load,
//! so [`Graph::check_edge_weights`] scans for offending edges.

use log::warn;

use crate::common::geometry::distance;
use crate::graph::model::Graph;

/// An edge advertising a cost below the straight-line distance
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeightViolation {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub distance: f64,
}

/// Summary of edge weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCostStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Graph {
    /// Report every edge whose weight is less than the Euclidean distance of its endpoints
    pub fn check_edge_weights(&self) -> Vec<EdgeWeightViolation> {
        self.edges()
            .filter_map(|(a, b, weight)| {
                let (na, nb) = (&self.nodes()[a], &self.nodes()[b]);
                let d = distance(&na.position, &nb.position);
                if d > weight {
                    warn!(
                        "edge {}-{} weight {} is below its length {:.3}; heuristic is not admissible",
                        na.id, nb.id, weight, d
                    );
                    Some(EdgeWeightViolation {
                        from: na.id.clone(),
                        to: nb.id.clone(),
                        weight,
                        distance: d,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Min, max and mean edge weight, `None` without edges
    pub fn edge_cost_stats(&self) -> Option<EdgeCostStats> {
        let (count, min, max, sum) = self.edges().fold(
            (0usize, f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(count, min, max, sum), (_, _, w)| (count + 1, min.min(w), max.max(w), sum + w),
        );
        if count == 0 {
            return None;
        }
        Some(EdgeCostStats {
            min,
            max,
            mean: sum / count as f64,
        })
    }
}
