//! Engine configuration
//!
//! [`OntologyConfig`] is deserialized from TOML:
//!
//! ```toml
//! [cache]
//! max_capacity = 64
//!
//! [import]
//! lock_name = "ontology-import"
//! resource_dir = "ontology/icons"
//!
//! [[import.documents]]
//! path = "ontology/base.json"
//! iri = "http://example.org/base"
//! ```

use crate::error::{OntologyError, OntologyResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of scopes kept in the snapshot cache
pub const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Default name of the start-up import lock
pub const DEFAULT_IMPORT_LOCK: &str = "ontology-import";

/// Schema engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Snapshot cache settings
    pub cache: CacheConfig,
    /// Start-up ingestion settings
    pub import: ImportConfig,
}

/// Snapshot cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached scopes
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Start-up ingestion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Name of the mutex serializing start-up imports
    pub lock_name: String,
    /// Documents imported at start, in order
    pub documents: Vec<DocumentSource>,
    /// Default directory icon file names resolve against
    pub resource_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            lock_name: DEFAULT_IMPORT_LOCK.to_string(),
            documents: Vec::new(),
            resource_dir: None,
        }
    }
}

/// A schema document to import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// File to read
    pub path: PathBuf,
    /// Global name the document is recorded under
    pub iri: String,
}

impl OntologyConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`OntologyError::Config`] if the text is not valid configuration
    pub fn from_toml_str(text: &str) -> OntologyResult<Self> {
        toml::from_str(text).map_err(|e| OntologyError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`OntologyError::Config`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> OntologyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OntologyError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Set snapshot cache capacity
    #[must_use]
    pub fn with_cache_capacity(mut self, max_capacity: u64) -> Self {
        self.cache.max_capacity = max_capacity;
        self
    }

    /// Set the import lock name
    #[must_use]
    pub fn with_lock_name(mut self, name: impl Into<String>) -> Self {
        self.import.lock_name = name.into();
        self
    }

    /// Append a document to the start-up import list
    #[must_use]
    pub fn with_document(mut self, path: impl Into<PathBuf>, iri: impl Into<String>) -> Self {
        self.import.documents.push(DocumentSource {
            path: path.into(),
            iri: iri.into(),
        });
        self
    }

    /// Set the default resource directory
    #[must_use]
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.import.resource_dir = Some(dir.into());
        self
    }
}
