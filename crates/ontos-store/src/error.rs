//! Error types for element stores

use crate::record::EdgeId;
use ontos_model::ElementId;

/// Errors raised by an [`ElementStore`](crate::ElementStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No vertex with this identity
    #[error("vertex not found: {0}")]
    VertexNotFound(ElementId),

    /// No edge with this identity
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Edge endpoint missing or otherwise invalid
    #[error("invalid edge {id}: {reason}")]
    InvalidEdge { id: EdgeId, reason: String },

    /// Backend-specific failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create invalid edge error
    pub fn invalid_edge(id: EdgeId, reason: impl Into<String>) -> Self {
        Self::InvalidEdge {
            id,
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = StoreError::VertexNotFound(ElementId::raw("v1"));
        assert_eq!(err.to_string(), "vertex not found: v1");
        let err = StoreError::invalid_edge(EdgeId::raw("e1"), "missing endpoint");
        assert_eq!(err.to_string(), "invalid edge e1: missing endpoint");
    }
}
