//! Error types for roadmap_planner

use thiserror::Error;

/// Which end of a search request an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Main error type for graph loading, search and roadmap generation
#[derive(Debug, Error)]
pub enum PlanningError {
    /// A record line could not be split into its fields or a field did not parse
    #[error("Malformed record '{line}': {reason}")]
    MalformedRecord { line: String, reason: String },

    /// An edge references a node id that is not in the node table
    #[error("Edge {from}-{to} references unknown node '{missing}'")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    /// A node id was inserted twice
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    /// Search start or goal is absent from the graph
    #[error("{endpoint} node '{id}' not found")]
    NodeNotFound { id: String, endpoint: Endpoint },

    /// Two consecutive nodes of a path are not joined by an edge
    #[error("No edge between '{from}' and '{to}'")]
    MissingEdge { from: String, to: String },

    /// The generator could not place the requested number of free samples
    #[error("Sampling exhausted after {attempts} attempts: placed {placed} of {requested} samples")]
    SamplingExhausted {
        placed: usize,
        requested: usize,
        attempts: usize,
    },

    /// Tried to connect a node to itself
    #[error("Refusing to connect node '{0}' to itself")]
    SelfConnectionAttempt(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Plotting failed
    #[error("Visualization error: {0}")]
    Visualization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::NodeNotFound {
            id: "7".to_string(),
            endpoint: Endpoint::Goal,
        };
        assert_eq!(format!("{}", err), "goal node '7' not found");

        let err = PlanningError::SamplingExhausted {
            placed: 3,
            requested: 10,
            attempts: 500,
        };
        assert!(format!("{err}").contains("placed 3 of 10"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }
}
