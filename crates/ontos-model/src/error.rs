//! Error types for the schema model

/// Errors raised while building or querying the schema model
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// IRI is empty or malformed
    #[error("invalid iri: '{0}'")]
    InvalidIri(String),

    /// Unknown element kind name
    #[error("unknown element kind: '{0}'")]
    UnknownKind(String),

    /// Unknown property data type name
    #[error("unknown property type: '{0}'")]
    UnknownPropertyType(String),

    /// Unknown text index hint name
    #[error("unknown text index hint: '{0}'")]
    UnknownTextIndexHint(String),

    /// Parent chain loops back on itself
    #[error("hierarchy cycle through {0}")]
    HierarchyCycle(String),
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
