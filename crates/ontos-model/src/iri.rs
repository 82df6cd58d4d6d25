//! IRIs, well-known schema names and dynamic IRI generation

use crate::error::{ModelError, ModelResult};
use crate::identity::ElementKind;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Globally unique, URI-shaped name of a schema element
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Wrap a string without validation
    #[inline]
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Parse and validate an IRI
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidIri`] for blank strings or strings with whitespace
    pub fn parse(iri: &str) -> ModelResult<Self> {
        if iri.is_empty() || iri.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidIri(iri.to_string()));
        }
        Ok(Self(iri.to_string()))
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment or last path segment (used as a fallback display name)
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit(['#', '/'])
            .find(|s| !s.is_empty())
            .unwrap_or(&self.0)
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Iri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Parentless root of the concept hierarchy
pub const ROOT_CONCEPT_IRI: &str = "http://www.w3.org/2002/07/owl#Thing";

/// Universal entity concept, child of the root
pub const ENTITY_CONCEPT_IRI: &str = "http://visallo.org#entity";

/// Parentless root of the relationship hierarchy, hidden from users
pub const TOP_RELATIONSHIP_IRI: &str = "http://www.w3.org/2002/07/owl#topObjectProperty";

/// Data type IRI marking a property as an extended data table
pub const EXTENDED_DATA_TABLE_IRI: &str = "http://visallo.org#extendedDataTable";

/// Namespace of generated IRIs
pub const DYNAMIC_IRI_PREFIX: &str = "http://visallo.org/";

/// Display names are truncated to this many characters before hashing
pub const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Generate a deterministic, collision-resistant IRI for a user-named element
///
/// The display name is trimmed, whitespace runs become `_`, it is lowercased
/// and truncated to [`MAX_DISPLAY_NAME_LEN`] characters. The hash covers the
/// kind, scope tag, normalized name and every extra salt, in that order; the
/// path segment keeps only `[a-z0-9_]`.
///
/// # Examples
///
/// ```
/// use ontos_model::{generate_dynamic_iri, ElementKind};
///
/// let iri = generate_dynamic_iri(ElementKind::Concept, "XxX", "w0", &[]);
/// assert_eq!(
///     iri.as_str(),
///     "http://visallo.org/xxx#545f80459971026861f7d0a767a058474788f5d8"
/// );
/// ```
#[must_use]
pub fn generate_dynamic_iri(
    kind: ElementKind,
    display_name: &str,
    scope_tag: &str,
    extra: &[&str],
) -> Iri {
    let name = normalize_display_name(display_name);

    let mut hasher = Sha1::new();
    hasher.update(kind.dynamic_iri_tag().as_bytes());
    hasher.update(scope_tag.as_bytes());
    hasher.update(name.as_bytes());
    for salt in extra {
        hasher.update(salt.as_bytes());
    }
    let hash = hex::encode(hasher.finalize());

    let segment: String = name
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();

    Iri(format!("{DYNAMIC_IRI_PREFIX}{segment}#{hash}"))
}

fn normalize_display_name(display_name: &str) -> String {
    let joined = display_name.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .to_lowercase()
        .chars()
        .take(MAX_DISPLAY_NAME_LEN)
        .collect()
}
