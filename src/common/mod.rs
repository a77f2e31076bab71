//! Common types, geometry, traits, and error definitions for roadmap_planner
//!
//! This module provides the foundational building blocks used by the
//! graph model, the search engine and the roadmap generator.

pub mod types;
pub mod geometry;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
