//! Thread-safe in-memory element store
//!
//! Provides [`MemoryStore`], an [`ElementStore`] backed by concurrent maps.
//! Writes are immediately readable, so [`ElementStore::flush`] only counts
//! calls.

use crate::adapter::ElementStore;
use crate::error::{StoreError, StoreResult};
use crate::record::{
    Direction, EdgeId, EdgeRecord, ExistenceQuery, PropertyEntry, VertexKind, VertexRecord,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ontos_model::{ElementId, Scope, Visibility};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory graph store
///
/// Vertices and edges live in [`DashMap`]s; an adjacency map indexes the
/// edges incident to each vertex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vertices: DashMap<ElementId, VertexRecord>,
    edges: DashMap<EdgeId, EdgeRecord>,
    adjacency: DashMap<ElementId, BTreeSet<EdgeId>>,
    flushes: AtomicU64,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices of every kind
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges of every label
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of `flush` calls so far
    #[inline]
    #[must_use]
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Insert a data vertex typed by the schema
    ///
    /// # Errors
    /// Never fails for the in-memory store; the signature mirrors the trait
    pub fn insert_data_vertex(
        &self,
        id: &ElementId,
        properties: Vec<PropertyEntry>,
        visibility: &Visibility,
    ) -> StoreResult<()> {
        self.upsert_vertex(id, VertexKind::Data, visibility)?;
        for entry in properties {
            self.set_property(id, entry)?;
        }
        Ok(())
    }

    /// Insert a data edge between two data vertices
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidEdge`] if either endpoint is missing
    pub fn insert_data_edge(
        &self,
        from: &ElementId,
        label: &str,
        to: &ElementId,
        visibility: &Visibility,
    ) -> StoreResult<EdgeId> {
        self.add_edge(EdgeRecord::new(from.clone(), label, to.clone(), visibility.clone()))
    }

    fn is_data_vertex(&self, id: &ElementId) -> bool {
        self.vertices
            .get(id)
            .is_some_and(|v| v.kind == VertexKind::Data)
    }

    fn with_vertex_mut<T>(
        &self,
        id: &ElementId,
        f: impl FnOnce(&mut VertexRecord) -> T,
    ) -> StoreResult<T> {
        let mut vertex = self
            .vertices
            .get_mut(id)
            .ok_or_else(|| StoreError::VertexNotFound(id.clone()))?;
        Ok(f(&mut vertex))
    }
}

impl ElementStore for MemoryStore {
    fn upsert_vertex(
        &self,
        id: &ElementId,
        kind: VertexKind,
        visibility: &Visibility,
    ) -> StoreResult<VertexRecord> {
        let record = match self.vertices.entry(id.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                tracing::trace!(%id, ?kind, %visibility, "vertex created");
                slot.insert(VertexRecord::new(id.clone(), kind, visibility.clone()))
                    .clone()
            }
        };
        Ok(record)
    }

    fn vertex(&self, id: &ElementId, scope: &Scope) -> StoreResult<Option<VertexRecord>> {
        Ok(self
            .vertices
            .get(id)
            .filter(|v| v.visibility.is_visible_in(scope))
            .map(|v| v.visible_in(scope)))
    }

    fn vertices(&self, kind: VertexKind, scope: &Scope) -> StoreResult<Vec<VertexRecord>> {
        let mut out: Vec<VertexRecord> = self
            .vertices
            .iter()
            .filter(|v| v.kind == kind && v.visibility.is_visible_in(scope))
            .map(|v| v.visible_in(scope))
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn find_vertices(
        &self,
        kind: VertexKind,
        name: &str,
        value: &str,
        scope: &Scope,
    ) -> StoreResult<Vec<VertexRecord>> {
        let mut out: Vec<VertexRecord> = self
            .vertices
            .iter()
            .filter(|v| v.kind == kind && v.visibility.is_visible_in(scope))
            .map(|v| v.visible_in(scope))
            .filter(|v| v.entries(name).any(|e| e.value.as_str() == Some(value)))
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn set_property(&self, id: &ElementId, entry: PropertyEntry) -> StoreResult<()> {
        self.with_vertex_mut(id, |vertex| {
            match vertex
                .properties
                .iter_mut()
                .find(|p| p.name == entry.name && p.key == entry.key)
            {
                Some(existing) => *existing = entry,
                None => vertex.properties.push(entry),
            }
        })
    }

    fn remove_property(&self, id: &ElementId, name: &str, key: Option<&str>) -> StoreResult<usize> {
        self.with_vertex_mut(id, |vertex| {
            let before = vertex.properties.len();
            vertex
                .properties
                .retain(|p| !(p.name == name && key.map_or(true, |k| p.key == k)));
            before - vertex.properties.len()
        })
    }

    fn alter_vertex_visibility(&self, id: &ElementId, visibility: &Visibility) -> StoreResult<()> {
        self.with_vertex_mut(id, |vertex| vertex.visibility = visibility.clone())
    }

    fn alter_property_visibilities(&self, id: &ElementId, visibility: &Visibility) -> StoreResult<()> {
        self.with_vertex_mut(id, |vertex| {
            for entry in &mut vertex.properties {
                entry.visibility = visibility.clone();
            }
        })
    }

    fn add_edge(&self, edge: EdgeRecord) -> StoreResult<EdgeId> {
        for end in [&edge.from, &edge.to] {
            if !self.vertices.contains_key(end) {
                return Err(StoreError::invalid_edge(
                    edge.id.clone(),
                    format!("endpoint {end} does not exist"),
                ));
            }
        }
        let id = edge.id.clone();
        let (from, to) = (edge.from.clone(), edge.to.clone());
        if let Entry::Vacant(slot) = self.edges.entry(id.clone()) {
            slot.insert(edge);
            self.adjacency.entry(from).or_default().insert(id.clone());
            self.adjacency.entry(to).or_default().insert(id.clone());
        }
        Ok(id)
    }

    fn alter_edge_visibility(&self, id: &EdgeId, visibility: &Visibility) -> StoreResult<()> {
        let mut edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| StoreError::EdgeNotFound(id.clone()))?;
        edge.visibility = visibility.clone();
        Ok(())
    }

    fn delete_edge(&self, id: &EdgeId) -> StoreResult<()> {
        let (_, edge) = self
            .edges
            .remove(id)
            .ok_or_else(|| StoreError::EdgeNotFound(id.clone()))?;
        for end in [&edge.from, &edge.to] {
            if let Some(mut incident) = self.adjacency.get_mut(end) {
                incident.remove(id);
            }
        }
        Ok(())
    }

    fn delete_vertex(&self, id: &ElementId) -> StoreResult<()> {
        self.vertices
            .remove(id)
            .ok_or_else(|| StoreError::VertexNotFound(id.clone()))?;
        let incident = self
            .adjacency
            .remove(id)
            .map(|(_, edges)| edges)
            .unwrap_or_default();
        for edge_id in incident {
            if let Some((_, edge)) = self.edges.remove(&edge_id) {
                if let Some(mut other) = self.adjacency.get_mut(edge.other_end(id)) {
                    other.remove(&edge_id);
                }
            }
        }
        Ok(())
    }

    fn edges(
        &self,
        id: &ElementId,
        direction: Direction,
        label: Option<&str>,
        scope: &Scope,
    ) -> StoreResult<Vec<EdgeRecord>> {
        let incident: Vec<EdgeId> = self
            .adjacency
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        let out = incident
            .iter()
            .filter_map(|edge_id| self.edges.get(edge_id).map(|e| e.clone()))
            .filter(|e| match direction {
                Direction::Out => &e.from == id,
                Direction::In => &e.to == id,
                Direction::Both => true,
            })
            .filter(|e| label.map_or(true, |l| e.label == l))
            .filter(|e| e.visibility.is_visible_in(scope))
            .collect();
        Ok(out)
    }

    fn edges_with_labels(&self, labels: &[&str], scope: &Scope) -> StoreResult<Vec<EdgeRecord>> {
        let mut out: Vec<EdgeRecord> = self
            .edges
            .iter()
            .filter(|e| labels.contains(&e.label.as_str()) && e.visibility.is_visible_in(scope))
            .map(|e| e.clone())
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn count_matching(&self, query: &ExistenceQuery, scope: &Scope) -> StoreResult<u64> {
        let count = match query {
            ExistenceQuery::PropertyValueIn { name, values } => self
                .vertices
                .iter()
                .filter(|v| v.kind == VertexKind::Data && v.visibility.is_visible_in(scope))
                .filter(|v| {
                    v.entries(name).any(|e| {
                        e.visibility.is_visible_in(scope)
                            && e.value.match_key().is_some_and(|k| values.contains(&k))
                    })
                })
                .count(),
            ExistenceQuery::HasProperty { name } => {
                let vertices = self
                    .vertices
                    .iter()
                    .filter(|v| v.kind == VertexKind::Data && v.visibility.is_visible_in(scope))
                    .filter(|v| v.entries(name).any(|e| e.visibility.is_visible_in(scope)))
                    .count();
                let data_edges: Vec<ElementId> = self
                    .edges
                    .iter()
                    .filter(|e| e.visibility.is_visible_in(scope) && e.properties.contains_key(name))
                    .map(|e| e.from.clone())
                    .collect();
                vertices + data_edges.iter().filter(|from| self.is_data_vertex(from)).count()
            }
            ExistenceQuery::EdgeLabel { label } => {
                let sources: Vec<ElementId> = self
                    .edges
                    .iter()
                    .filter(|e| &e.label == label && e.visibility.is_visible_in(scope))
                    .map(|e| e.from.clone())
                    .collect();
                sources.iter().filter(|from| self.is_data_vertex(from)).count()
            }
        };
        Ok(count as u64)
    }

    fn flush(&self) -> StoreResult<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontos_model::WorkspaceId;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn ws(id: &str) -> Visibility {
        Visibility::workspace(WorkspaceId::new(id))
    }

    #[test]
    fn upsert_is_idempotent() {
        let store = MemoryStore::new();
        let id = ElementId::raw("c1");
        store.upsert_vertex(&id, VertexKind::Concept, &Visibility::public()).unwrap();
        store.set_property(&id, PropertyEntry::new("iri", "http://x#a")).unwrap();

        let again = store.upsert_vertex(&id, VertexKind::Concept, &ws("w1")).unwrap();
        assert!(again.visibility.is_public());
        assert_eq!(again.str_value("iri"), Some("http://x#a"));
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn concurrent_upserts_create_one_vertex() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .upsert_vertex(&ElementId::raw("same"), VertexKind::Concept, &Visibility::public())
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn reads_respect_scope() {
        let store = MemoryStore::new();
        let private = ElementId::raw("p");
        store.upsert_vertex(&private, VertexKind::Concept, &ws("w1")).unwrap();
        assert!(store.vertex(&private, &Scope::Public).unwrap().is_none());
        assert!(store.vertex(&private, &Scope::workspace("w1")).unwrap().is_some());
        assert!(store.vertex(&private, &Scope::workspace("w2")).unwrap().is_none());
        assert_eq!(store.vertices(VertexKind::Concept, &Scope::workspace("w1")).unwrap().len(), 1);
    }

    #[test]
    fn set_property_replaces_same_key() {
        let store = MemoryStore::new();
        let id = ElementId::raw("c");
        store.upsert_vertex(&id, VertexKind::Concept, &Visibility::public()).unwrap();
        store.set_property(&id, PropertyEntry::new("displayName", "A")).unwrap();
        store.set_property(&id, PropertyEntry::new("displayName", "B")).unwrap();
        store.set_property(&id, PropertyEntry::new("intent", "x").with_key("x")).unwrap();
        store.set_property(&id, PropertyEntry::new("intent", "y").with_key("y")).unwrap();
        let v = store.vertex(&id, &Scope::Public).unwrap().unwrap();
        assert_eq!(v.str_value("displayName"), Some("B"));
        assert_eq!(v.entries("intent").count(), 2);

        assert_eq!(store.remove_property(&id, "intent", Some("x")).unwrap(), 1);
        assert_eq!(store.remove_property(&id, "intent", None).unwrap(), 1);
    }

    #[test]
    fn find_vertices_by_value() {
        let store = MemoryStore::new();
        for (id, iri) in [("a", "http://x#a"), ("b", "http://x#b")] {
            let id = ElementId::raw(id);
            store.upsert_vertex(&id, VertexKind::Concept, &Visibility::public()).unwrap();
            store.set_property(&id, PropertyEntry::new("iri", iri)).unwrap();
        }
        let found = store
            .find_vertices(VertexKind::Concept, "iri", "http://x#b", &Scope::Public)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ElementId::raw("b"));
    }

    #[test]
    fn edges_are_deduplicated_and_removed_with_vertex() {
        let store = MemoryStore::new();
        let (a, b) = (ElementId::raw("a"), ElementId::raw("b"));
        for id in [&a, &b] {
            store.upsert_vertex(id, VertexKind::Concept, &Visibility::public()).unwrap();
        }
        store.add_edge(EdgeRecord::new(a.clone(), "isA", b.clone(), Visibility::public())).unwrap();
        store.add_edge(EdgeRecord::new(a.clone(), "isA", b.clone(), Visibility::public())).unwrap();
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.edges(&b, Direction::In, Some("isA"), &Scope::Public).unwrap().len(), 1);
        assert!(store.edges(&b, Direction::Out, None, &Scope::Public).unwrap().is_empty());

        store.delete_vertex(&a).unwrap();
        assert_eq!(store.edge_count(), 0);
        assert!(store.edges(&b, Direction::Both, None, &Scope::Public).unwrap().is_empty());
    }

    #[test]
    fn add_edge_requires_endpoints() {
        let store = MemoryStore::new();
        let err = store
            .add_edge(EdgeRecord::new(ElementId::raw("a"), "x", ElementId::raw("b"), Visibility::public()))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidEdge { .. }));
    }

    #[test]
    fn existence_queries_count_data_only() {
        let store = MemoryStore::new();
        let schema = ElementId::raw("schema");
        store.upsert_vertex(&schema, VertexKind::Concept, &Visibility::public()).unwrap();
        store.set_property(&schema, PropertyEntry::new("conceptType", "http://x#person")).unwrap();

        let (p1, p2) = (ElementId::raw("p1"), ElementId::raw("p2"));
        store
            .insert_data_vertex(&p1, vec![PropertyEntry::new("conceptType", "http://x#person")], &Visibility::public())
            .unwrap();
        store
            .insert_data_vertex(&p2, vec![PropertyEntry::new("http://x#name", "Bob")], &ws("w1"))
            .unwrap();
        store.insert_data_edge(&p1, "http://x#knows", &p2, &ws("w1")).unwrap();

        let by_type = ExistenceQuery::PropertyValueIn {
            name: "conceptType".to_string(),
            values: vec!["http://x#person".to_string()],
        };
        assert_eq!(store.count_matching(&by_type, &Scope::Public).unwrap(), 1);

        let has_name = ExistenceQuery::HasProperty { name: "http://x#name".to_string() };
        assert_eq!(store.count_matching(&has_name, &Scope::Public).unwrap(), 0);
        assert_eq!(store.count_matching(&has_name, &Scope::workspace("w1")).unwrap(), 1);

        let knows = ExistenceQuery::EdgeLabel { label: "http://x#knows".to_string() };
        assert_eq!(store.count_matching(&knows, &Scope::workspace("w1")).unwrap(), 1);
        assert_eq!(store.count_matching(&knows, &Scope::Public).unwrap(), 0);
    }

    #[test]
    fn flush_is_counted() {
        let store = MemoryStore::new();
        store.flush().unwrap();
        store.flush().unwrap();
        assert_eq!(store.flush_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_deleted_vertex_leaves_no_edges(
            pairs in proptest::collection::vec((0..6usize, 0..6usize), 0..20),
            victim in 0..6usize,
        ) {
            let store = MemoryStore::new();
            let ids: Vec<ElementId> = (0..6).map(|i| ElementId::raw(format!("v{i}"))).collect();
            for id in &ids {
                store.upsert_vertex(id, VertexKind::Concept, &Visibility::public()).unwrap();
            }
            for (from, to) in pairs {
                store
                    .add_edge(EdgeRecord::new(ids[from].clone(), "rel", ids[to].clone(), Visibility::public()))
                    .unwrap();
            }
            store.delete_vertex(&ids[victim]).unwrap();

            let remaining = store.edges_with_labels(&["rel"], &Scope::Public).unwrap();
            prop_assert_eq!(remaining.len(), store.edge_count());
            prop_assert!(remaining.iter().all(|e| e.from != ids[victim] && e.to != ids[victim]));
            for id in ids.iter().filter(|id| **id != ids[victim]) {
                for edge in store.edges(id, Direction::Both, None, &Scope::Public).unwrap() {
                    prop_assert!(edge.from == *id || edge.to == *id);
                }
            }
        }
    }
}
