//! Ontos Schema Model
//!
//! In-memory representation of a sandboxed graph schema.
//!
//! # Overview
//!
//! - **Scope / Visibility**: public vs. one workspace's sandbox, and the
//!   stored metadata a [`SandboxStatus`] is derived from
//! - **ElementId**: stable storage identity per (kind, IRI, workspace)
//! - **Concept / Relationship / Property**: schema elements
//! - **Hierarchy**: single-parent tree over IRIs
//! - **Ontology**: immutable per-scope snapshot
//!
//! # Example
//!
//! ```rust
//! use ontos_model::{Scope, Visibility, WorkspaceId, SandboxStatus};
//!
//! let vis = Visibility::workspace(WorkspaceId::new("w1"));
//! assert_eq!(vis.sandbox_status(&Scope::workspace("w1")), SandboxStatus::Private);
//! assert_eq!(vis.sandbox_status(&Scope::Public), SandboxStatus::Public);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod element;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod iri;
pub mod ontology;
pub mod property_type;
pub mod scope;

// Re-exports
pub use element::{Concept, ElementCore, Property, PropertyShape, Relationship, SchemaElement};
pub use error::{ModelError, ModelResult};
pub use hierarchy::Hierarchy;
pub use identity::{ElementId, ElementKind};
pub use iri::{
    generate_dynamic_iri, Iri, DYNAMIC_IRI_PREFIX, ENTITY_CONCEPT_IRI, EXTENDED_DATA_TABLE_IRI,
    MAX_DISPLAY_NAME_LEN, ROOT_CONCEPT_IRI, TOP_RELATIONSHIP_IRI,
};
pub use ontology::Ontology;
pub use property_type::{PropertyType, TextIndexHint};
pub use scope::{SandboxStatus, Scope, Visibility, WorkspaceId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the schema model
    pub use crate::{
        Concept, ElementKind, Iri, Ontology, Property, PropertyType, Relationship, SandboxStatus,
        Scope, Visibility, WorkspaceId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
