//! Error types for the graph engine.
//!
//! The core graph operations (lookup, linking, sorting, rendering) are total.
//! Errors only surface at the edges: removing a node that is no longer in
//! the graph, malformed refspecs, failures reported by a tracking source and
//! unreadable settings.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors produced by the graph engine.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The node id does not belong to the graph (or was already removed).
    #[error("node {0} is not part of the graph")]
    UnknownNode(NodeId),

    /// A fetch refspec could not be parsed.
    #[error("invalid fetch refspec {spec:?}: {reason}")]
    FetchSpec {
        spec: String,
        reason: &'static str,
    },

    /// The tracking source failed while discovering the graph.
    #[error("{context}: {reason}")]
    Source {
        context: String,
        reason: String,
    },

    /// Settings could not be deserialized.
    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),
}

impl GraphError {
    /// Build a [`GraphError::Source`] error.
    ///
    /// Intended for [`TrackingSource`](crate::discovery::TrackingSource)
    /// implementations wrapping failures of the external tool.
    pub fn source(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Source {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;
