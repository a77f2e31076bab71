//! Common traits defining interfaces for planning algorithms

use crate::common::error::PlanningResult;
use crate::graph::Graph;
use crate::path_planning::SearchOutcome;

/// Trait for search algorithms operating on a weighted node graph
pub trait GraphPlanner {
    /// Find a path between two node ids of `graph`
    fn find_path(&self, graph: &Graph, start: &str, goal: &str) -> PlanningResult<SearchOutcome>;
}

/// Trait for algorithms that grow a graph by sampling free space (PRM, etc.)
pub trait RoadmapBuilder {
    /// Summary returned after a successful build
    type Report;

    /// Add sampled nodes and edges to `graph`
    fn build<R: rand::Rng>(&self, graph: &mut Graph, rng: &mut R) -> PlanningResult<Self::Report>;
}
