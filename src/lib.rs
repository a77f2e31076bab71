//! roadmap_planner - A* graph search and probabilistic roadmaps
//!
//! This crate loads a weighted planar graph with circular obstacles, grows
//! it with a Probabilistic Road-Map (PRM) where needed, and finds shortest
//! paths on it with A*.

// Core modules
pub mod common;
pub mod graph;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Bounds, Endpoint, Obstacle, Point2D};
pub use common::{GraphPlanner, RoadmapBuilder};
pub use common::{PlanningError, PlanningResult};
pub use graph::{Graph, LoadReport};
pub use path_planning::{AStarConfig, AStarPlanner, GraphPath, PrmConfig, RngSeed, RoadmapGenerator, SearchOutcome};
