//! Ontos Schema Ingestion
//!
//! Parses schema documents and imports them into an
//! [`OntologyRepository`](ontos_engine::OntologyRepository).
//!
//! # Overview
//!
//! - **Documents**: serde model of classes, object properties and data
//!   properties with their annotations
//! - **Parsers**: extension-keyed registry with JSON and YAML built in
//! - **Annotations**: vocabulary mapping annotation properties to element updates
//! - **Pipeline**: phased import, skipped when the content hash is unchanged
//! - **Locks**: process-wide named mutexes serializing start-up imports
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ontos_engine::{OntologyConfig, OntologyRepository, StaticAuthorization, User};
//! use ontos_ingest::{JsonDocumentParser, OntologyImporter};
//! use ontos_model::Scope;
//! use ontos_store::MemoryStore;
//!
//! let repo = Arc::new(
//!     OntologyRepository::open(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(StaticAuthorization::new()),
//!         OntologyConfig::default(),
//!     )
//!     .unwrap(),
//! );
//! let importer = OntologyImporter::new(repo.clone());
//!
//! let doc = br#"{"iri": "http://example.org/doc", "classes": [{"iri": "http://example.org/doc#thing"}]}"#;
//! let outcome = importer
//!     .import_document(doc, &JsonDocumentParser, None, None, &User::system(), &Scope::Public)
//!     .unwrap();
//! assert!(!outcome.is_unchanged());
//! assert!(repo.get_concept_by_iri("http://example.org/doc#thing", &Scope::Public).unwrap().is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod annotations;
pub mod document;
pub mod error;
pub mod lock;
pub mod parsers;
pub mod pipeline;

// Re-exports
pub use annotations::{Directive, IconSlot};
pub use document::{
    Annotation, AnnotationValue, ClassDeclaration, DataPropertyDeclaration, Literal,
    ObjectPropertyDeclaration, SchemaDocument,
};
pub use error::{IngestError, IngestResult};
pub use lock::NamedLocks;
pub use parsers::{DocumentParser, JsonDocumentParser, ParserRegistry, YamlDocumentParser};
pub use pipeline::{
    DefaultHooks, ImportContext, ImportHooks, ImportOutcome, ImportSummary, OntologyImporter,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for document ingestion
    pub use crate::{
        DocumentParser, ImportHooks, ImportOutcome, IngestError, IngestResult, OntologyImporter,
        ParserRegistry, SchemaDocument,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
