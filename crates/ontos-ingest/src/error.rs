//! Error types for schema document ingestion

use ontos_engine::OntologyError;
use std::path::PathBuf;

/// Errors raised while parsing or importing a schema document
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Document text could not be decoded
    #[error("{format} parse error: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// No parser registered for the file extension
    #[error("no parser registered for {}", .0.display())]
    NoParser(PathBuf),

    /// Document or companion resource could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Class or object property declares more than one super type
    #[error("{iri} declares {count} super types; at most one is supported")]
    MultipleSuperTypes { iri: String, count: usize },

    /// Super-type or dependent-property chain loops back on itself
    #[error("declaration cycle through {0}")]
    Cycle(String),

    /// Recognised annotation with a value of the wrong shape
    #[error("invalid value for {property} on {iri}: {message}")]
    InvalidAnnotation {
        iri: String,
        property: String,
        message: String,
    },

    /// Data property range is not a known datatype
    #[error("data property {iri} has unknown range {range}")]
    UnknownDataType { iri: String, range: String },

    /// Neither the caller nor the document names the document
    #[error("document has no iri")]
    MissingDocumentIri,

    /// Schema engine rejected a change
    #[error(transparent)]
    Ontology(#[from] OntologyError),
}

impl IngestError {
    /// Create parse error
    #[inline]
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create resource error for path
    #[inline]
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    /// Create invalid annotation error
    #[inline]
    pub fn invalid_annotation(
        iri: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAnnotation {
            iri: iri.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Check if the schema engine denied access
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Ontology(e) if e.is_access_denied())
    }

    /// Check if the document violates a schema invariant
    ///
    /// Covers multiple super types and declaration cycles as well as
    /// invariant violations the engine reports.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            Self::MultipleSuperTypes { .. } | Self::Cycle(_) => true,
            Self::Ontology(e) => e.is_invariant_violation(),
            _ => false,
        }
    }
}

/// Result type alias for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = IngestError::MultipleSuperTypes {
            iri: "http://x#a".to_string(),
            count: 2,
        };
        assert!(err.to_string().contains("2 super types"));
        assert!(err.is_invariant_violation());
        let err = IngestError::NoParser(PathBuf::from("schema.owl"));
        assert_eq!(err.to_string(), "no parser registered for schema.owl");
    }

    #[test]
    fn ontology_errors_convert() {
        let err: IngestError = OntologyError::access_denied("u", "nope").into();
        assert!(err.is_access_denied());
        assert!(err.to_string().contains("access denied"));
    }
}
