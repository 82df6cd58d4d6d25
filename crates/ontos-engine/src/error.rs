//! Error types for the schema engine
//!
//! The taxonomy separates:
//! - missing authority ([`OntologyError::AccessDenied`])
//! - structural problems ([`OntologyError::InvariantViolation`])
//! - unknown IRIs ([`OntologyError::NotFound`])
//! - deliberate limitations ([`OntologyError::NotImplemented`])
//!
//! None of these are retried automatically.

use ontos_model::{ElementKind, ModelError};
use ontos_store::StoreError;

/// Main schema engine error type
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// Missing privilege, missing workspace access, or mutation of a
    /// published element without authority
    #[error("access denied for user '{user}': {reason}")]
    AccessDenied { user: String, reason: String },

    /// Structural rule broken by the requested change
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// No element with this IRI is visible in the scope
    #[error("{kind} not found: {iri}")]
    NotFound { kind: ElementKind, iri: String },

    /// Sandboxed extension of published elements
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Model failure
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl OntologyError {
    /// Create access denied error
    #[inline]
    pub fn access_denied(user: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            user: user.into(),
            reason: reason.into(),
        }
    }

    /// Create invariant violation error
    #[inline]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Create not found error
    #[inline]
    pub fn not_found(kind: ElementKind, iri: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            iri: iri.into(),
        }
    }

    /// Create not implemented error
    #[inline]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }

    /// Check if error is retryable
    ///
    /// Every error in this taxonomy is structural or authoritative.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    #[inline]
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

/// Result type alias for schema engine operations
pub type OntologyResult<T> = Result<T, OntologyError>;
