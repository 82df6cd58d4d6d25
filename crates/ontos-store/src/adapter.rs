//! Element store adapter contract
//!
//! [`ElementStore`] is the boundary between the schema engine and the graph
//! storage engine. Every read takes the [`Scope`] it is performed in and only
//! returns records whose visibility is readable in that scope.

use crate::error::StoreResult;
use crate::record::{
    Direction, EdgeId, EdgeRecord, ExistenceQuery, PropertyEntry, VertexKind, VertexRecord,
};
use ontos_model::{ElementId, Scope, Visibility};
use std::fmt::Debug;

/// Graph-backed vertex, property and edge storage
///
/// Implementations must be internally synchronized. `upsert_vertex` must be
/// atomic per identity: concurrent calls with the same id observe a single
/// vertex.
pub trait ElementStore: Send + Sync + Debug {
    /// Create the vertex if absent and return its current state
    ///
    /// An existing vertex keeps its visibility and properties.
    fn upsert_vertex(
        &self,
        id: &ElementId,
        kind: VertexKind,
        visibility: &Visibility,
    ) -> StoreResult<VertexRecord>;

    /// Read a vertex visible in `scope`
    fn vertex(&self, id: &ElementId, scope: &Scope) -> StoreResult<Option<VertexRecord>>;

    /// Every vertex of a kind visible in `scope`
    fn vertices(&self, kind: VertexKind, scope: &Scope) -> StoreResult<Vec<VertexRecord>>;

    /// Vertices of a kind whose string property `name` equals `value`
    fn find_vertices(
        &self,
        kind: VertexKind,
        name: &str,
        value: &str,
        scope: &Scope,
    ) -> StoreResult<Vec<VertexRecord>>;

    /// Write a property value, replacing any value with the same name and key
    fn set_property(&self, id: &ElementId, entry: PropertyEntry) -> StoreResult<()>;

    /// Remove values of a property; `key = None` removes every key
    ///
    /// Returns the number of values removed.
    fn remove_property(&self, id: &ElementId, name: &str, key: Option<&str>) -> StoreResult<usize>;

    /// Replace the vertex's visibility
    fn alter_vertex_visibility(&self, id: &ElementId, visibility: &Visibility) -> StoreResult<()>;

    /// Replace the visibility of every property value on the vertex
    fn alter_property_visibilities(&self, id: &ElementId, visibility: &Visibility) -> StoreResult<()>;

    /// Add an edge; adding an edge whose id already exists is a no-op
    fn add_edge(&self, edge: EdgeRecord) -> StoreResult<EdgeId>;

    /// Replace an edge's visibility
    fn alter_edge_visibility(&self, id: &EdgeId, visibility: &Visibility) -> StoreResult<()>;

    /// Delete an edge
    fn delete_edge(&self, id: &EdgeId) -> StoreResult<()>;

    /// Delete a vertex and every incident edge
    fn delete_vertex(&self, id: &ElementId) -> StoreResult<()>;

    /// Edges incident to a vertex, optionally filtered by label
    fn edges(
        &self,
        id: &ElementId,
        direction: Direction,
        label: Option<&str>,
        scope: &Scope,
    ) -> StoreResult<Vec<EdgeRecord>>;

    /// Every edge carrying one of `labels` visible in `scope`
    fn edges_with_labels(&self, labels: &[&str], scope: &Scope) -> StoreResult<Vec<EdgeRecord>>;

    /// Count data elements matching the query
    fn count_matching(&self, query: &ExistenceQuery, scope: &Scope) -> StoreResult<u64>;

    /// Make prior writes visible to subsequent reads
    fn flush(&self) -> StoreResult<()>;
}
