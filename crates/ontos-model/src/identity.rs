//! Stable element identities
//!
//! Provides [`ElementId`], the storage key of a schema element, derived from
//! the element kind, its IRI and (for sandboxed elements) the workspace it
//! was created in.

use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Closed set of schema element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Concept (vertex type)
    Concept,
    /// Relationship (edge label)
    Relationship,
    /// Property (including extended data tables)
    Property,
}

impl ElementKind {
    /// All kinds, in load order
    pub const ALL: [Self; 3] = [Self::Concept, Self::Relationship, Self::Property];

    /// Short lowercase tag used in identities and logs
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Relationship => "relationship",
            Self::Property => "property",
        }
    }

    /// Type name mixed into dynamic IRI hashes
    #[inline]
    #[must_use]
    pub const fn dynamic_iri_tag(self) -> &'static str {
        match self {
            Self::Concept => "class org.visallo.core.model.ontology.Concept",
            Self::Relationship => "class org.visallo.core.model.ontology.Relationship",
            Self::Property => "class org.visallo.core.model.ontology.OntologyProperty",
        }
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ElementKind {
    type Err = crate::error::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "concept" => Ok(Self::Concept),
            "relationship" => Ok(Self::Relationship),
            "property" => Ok(Self::Property),
            other => Err(crate::error::ModelError::UnknownKind(other.to_string())),
        }
    }
}

/// Storage identity of a schema element
///
/// Public elements hash `(kind, iri)`; sandboxed elements additionally hash
/// the workspace id, so a sandboxed variant never collides with the public
/// variant or with another workspace's variant of the same IRI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Derive the identity of an element created in `scope`
    #[must_use]
    pub fn derive(kind: ElementKind, iri: &str, scope: &Scope) -> Self {
        let mut hasher = Sha256::new();
        for part in [kind.tag(), iri] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        if let Some(workspace) = scope.workspace_id() {
            hasher.update((workspace.as_str().len() as u64).to_le_bytes());
            hasher.update(workspace.as_str().as_bytes());
        }
        let digest = hasher.finalize();
        Self(format!("{}_{}", kind.tag(), hex::encode(&digest[..16])))
    }

    /// Wrap an existing raw id (workspace vertices, data vertices)
    #[inline]
    #[must_use]
    pub fn raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity of the vertex representing a workspace
    #[inline]
    #[must_use]
    pub fn for_workspace(workspace: &crate::scope::WorkspaceId) -> Self {
        Self(format!("workspace_{workspace}"))
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::Public);
        let b = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::Public);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("concept_"));
    }

    #[test]
    fn workspace_variant_differs_from_public() {
        let public = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::Public);
        let w1 = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::workspace("w1"));
        let w2 = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::workspace("w2"));
        assert_ne!(public, w1);
        assert_ne!(w1, w2);
    }

    #[test]
    fn kind_is_part_of_identity() {
        let c = ElementId::derive(ElementKind::Concept, "http://x#a", &Scope::Public);
        let r = ElementId::derive(ElementKind::Relationship, "http://x#a", &Scope::Public);
        assert_ne!(c, r);
    }

    #[test]
    fn length_prefix_prevents_ambiguity() {
        // "ab" + workspace "c" must not equal "a" + workspace "bc"
        let x = ElementId::derive(ElementKind::Concept, "ab", &Scope::workspace("c"));
        let y = ElementId::derive(ElementKind::Concept, "a", &Scope::workspace("bc"));
        assert_ne!(x, y);
    }

    #[test]
    fn kind_parse() {
        assert_eq!("Concept".parse::<ElementKind>().unwrap(), ElementKind::Concept);
        assert!("vertex".parse::<ElementKind>().is_err());
    }
}
