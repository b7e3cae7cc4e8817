//! Error types for the route planner.
//!
//! Only structural problems are errors: a path that walks over a missing edge,
//! an unknown node, malformed input files or an invalid configuration.
//! "No route under these constraints" is never an error; the searches report it
//! through their return value.

use crate::network::NodeIndex;

/// Errors raised by the graph model, loader, metrics helper and searches.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// A consecutive pair in a path has no corresponding edge
    #[error("no edge {from} -> {to} in the graph")]
    MissingEdge { from: String, to: String },

    /// A node identifier that is not part of the graph
    #[error("unknown node id: {0}")]
    UnknownNode(String),

    /// A node index outside the graph
    #[error("node index {0} is out of bounds")]
    UnknownNodeIndex(NodeIndex),

    /// Two nodes share the same identifier
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// Edge attributes violate the model (non-positive time, negative cost...)
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: &'static str,
    },

    /// A mode name that is not one of the supported transport modes
    #[error("unknown transport mode: {0}")]
    UnknownMode(String),

    /// Search parameters that cannot be run
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::MissingEdge { from: "N1".into(), to: "N3".into() };
        assert_eq!(err.to_string(), "no edge N1 -> N3 in the graph");

        let err = RouterError::UnknownMode("tram".into());
        assert_eq!(err.to_string(), "unknown transport mode: tram");
    }
}
