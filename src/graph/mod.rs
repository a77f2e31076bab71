//! Graph model, record loading/export and diagnostics

pub mod model;
pub mod records;
pub mod diagnostics;

pub use model::*;
pub use records::{EdgeRecord, LoadReport, NodeRecord, ObstacleRecord};
pub use diagnostics::*;
