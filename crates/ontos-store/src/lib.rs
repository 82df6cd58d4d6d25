//! Ontos Element Store
//!
//! Storage contract the schema engine writes through, plus a thread-safe
//! in-memory implementation.
//!
//! # Overview
//!
//! - **ElementStore**: vertex, property and edge operations, every read
//!   filtered by [`Scope`](ontos_model::Scope)
//! - **MemoryStore**: [`dashmap`]-backed implementation
//! - **Records**: vertex, edge and property snapshots plus existence queries
//!
//! # Example
//!
//! ```rust
//! use ontos_model::{ElementId, Scope, Visibility, WorkspaceId};
//! use ontos_store::{ElementStore, MemoryStore, PropertyEntry, VertexKind};
//!
//! let store = MemoryStore::new();
//! let id = ElementId::raw("c1");
//! let private = Visibility::workspace(WorkspaceId::new("w1"));
//! store.upsert_vertex(&id, VertexKind::Concept, &private).unwrap();
//! store.set_property(&id, PropertyEntry::new("iri", "http://x#a")).unwrap();
//!
//! assert!(store.vertex(&id, &Scope::Public).unwrap().is_none());
//! assert!(store.vertex(&id, &Scope::workspace("w1")).unwrap().is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod adapter;
pub mod error;
pub mod memory;
pub mod record;

// Re-exports
pub use adapter::ElementStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::{
    Direction, EdgeId, EdgeRecord, ExistenceQuery, PropertyEntry, PropertyValue, VertexKind,
    VertexRecord,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with element stores
    pub use crate::{
        Direction, EdgeRecord, ElementStore, MemoryStore, PropertyEntry, PropertyValue,
        StoreError, StoreResult, VertexKind, VertexRecord,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
