//! Error types for graph construction and pattern preparation.
//!
//! Errors only occur while graphs and patterns are being built or validated,
//! never while the search runs. A search that finds nothing returns an
//! empty result.

use thiserror::Error;

/// Errors raised before a search begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubgraphError {
    /// An edge or lookup referenced a node that was never added.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// The pattern is empty or internally inconsistent.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl SubgraphError {
    /// Create an unknown node error from any debuggable identifier.
    pub fn unknown_node(id: &impl std::fmt::Debug) -> Self {
        Self::UnknownNode(format!("{id:?}"))
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }
}
