//! Utility modules for roadmap_planner

pub mod visualization;

pub use visualization::{colors, plot_roadmap, PathStyle, PointStyle, Visualizer};
