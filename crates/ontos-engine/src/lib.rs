//! Ontos Schema Engine
//!
//! Sandboxed schema management for a graph store: concepts, relationships
//! and properties exist publicly or privately in one workspace, and
//! sandboxed edits are published explicitly.
//!
//! # Overview
//!
//! - **Privilege gate**: decision table over system user, public and workspace scopes
//! - **Mutation engine**: idempotent create-or-get, updates, publish and
//!   cascading delete, all writing through an [`ElementStore`](ontos_store::ElementStore)
//! - **Snapshot cache**: per-scope [`Ontology`](ontos_model::Ontology) built on
//!   a miss and cleared explicitly
//! - **Configuration**: TOML-backed [`OntologyConfig`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ontos_engine::prelude::*;
//! use ontos_model::{Scope, ENTITY_CONCEPT_IRI};
//! use ontos_store::MemoryStore;
//!
//! let repo = OntologyRepository::open(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(StaticAuthorization::new()),
//!     OntologyConfig::default(),
//! )
//! .unwrap();
//!
//! let person = repo
//!     .get_or_create_concept(
//!         &ConceptDefinition::new("http://example.org#person").parent(ENTITY_CONCEPT_IRI),
//!         &User::system(),
//!         &Scope::Public,
//!     )
//!     .unwrap();
//! assert_eq!(person.parent_iri.as_ref().map(|p| p.as_str()), Some(ENTITY_CONCEPT_IRI));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod config;
pub mod definition;
pub mod error;
mod lifecycle;
mod loader;
mod locks;
mod mutation;
pub mod privilege;
pub mod repository;
pub mod schema;

// Re-exports
pub use cache::SnapshotCache;
pub use config::{CacheConfig, DocumentSource, ImportConfig, OntologyConfig};
pub use definition::{ConceptDefinition, ElementUpdate, PropertyDefinition, RelationshipDefinition};
pub use error::{OntologyError, OntologyResult};
pub use privilege::{AuthorizationProvider, Operation, Privilege, StaticAuthorization, User};
pub use repository::{OntologyRepository, StoredDocument};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the schema engine
    pub use crate::{
        AuthorizationProvider, ConceptDefinition, ElementUpdate, OntologyConfig, OntologyError,
        OntologyRepository, OntologyResult, Privilege, PropertyDefinition, RelationshipDefinition,
        StaticAuthorization, User,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
