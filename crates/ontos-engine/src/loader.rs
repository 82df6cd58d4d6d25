//! Materializes schema elements from stored records
//!
//! Lookup is always by the `iri` property among vertices visible in the
//! scope. When a workspace scope sees both a sandboxed and a public vertex
//! with the same IRI, the sandboxed vertex wins.

use crate::schema::{keys, labels};
use ontos_model::{
    Concept, ElementCore, ElementKind, Iri, Ontology, Property, PropertyShape, PropertyType,
    Relationship, SandboxStatus, Scope, TextIndexHint,
};
use ontos_store::{
    Direction, EdgeRecord, ElementStore, PropertyValue, StoreResult, VertexKind, VertexRecord,
};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Read-side view over an [`ElementStore`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct SchemaLoader<'a> {
    store: &'a dyn ElementStore,
}

impl<'a> SchemaLoader<'a> {
    pub(crate) fn new(store: &'a dyn ElementStore) -> Self {
        Self { store }
    }

    /// Effective vertex of the element with this IRI
    pub(crate) fn resolve(
        &self,
        kind: ElementKind,
        iri: &str,
        scope: &Scope,
    ) -> StoreResult<Option<VertexRecord>> {
        let mut candidates = self
            .store
            .find_vertices(kind.into(), keys::IRI, iri, scope)?;
        let sandboxed = candidates
            .iter()
            .position(|v| v.visibility.sandbox_status(scope) == SandboxStatus::Private);
        Ok(match sandboxed {
            Some(index) => Some(candidates.swap_remove(index)),
            None => candidates.into_iter().next(),
        })
    }

    /// Effective vertices of a kind, one per IRI
    fn effective_vertices(&self, kind: ElementKind, scope: &Scope) -> StoreResult<Vec<VertexRecord>> {
        let mut by_iri: BTreeMap<String, VertexRecord> = BTreeMap::new();
        for vertex in self.store.vertices(kind.into(), scope)? {
            let Some(iri) = vertex.str_value(keys::IRI).map(str::to_string) else {
                continue;
            };
            match by_iri.entry(iri) {
                Entry::Vacant(slot) => {
                    slot.insert(vertex);
                }
                Entry::Occupied(mut slot) => {
                    if vertex.visibility.sandbox_status(scope) == SandboxStatus::Private {
                        slot.insert(vertex);
                    }
                }
            }
        }
        Ok(by_iri.into_values().collect())
    }

    /// Vertices at the far end of `label` edges, in chain order
    fn linked(
        &self,
        id: &ontos_model::ElementId,
        direction: Direction,
        label: &str,
        scope: &Scope,
    ) -> StoreResult<Vec<VertexRecord>> {
        let mut edges = self.store.edges(id, direction, Some(label), scope)?;
        edges.sort_by(|a, b| chain_order(a).cmp(&chain_order(b)).then_with(|| a.id.cmp(&b.id)));
        let mut out = Vec::with_capacity(edges.len());
        for edge in &edges {
            if let Some(vertex) = self.store.vertex(edge.other_end(id), scope)? {
                out.push(vertex);
            }
        }
        Ok(out)
    }

    fn linked_iris(
        &self,
        id: &ontos_model::ElementId,
        direction: Direction,
        label: &str,
        scope: &Scope,
    ) -> StoreResult<Vec<Iri>> {
        Ok(self
            .linked(id, direction, label, scope)?
            .iter()
            .filter_map(|v| v.str_value(keys::IRI).map(Iri::new))
            .collect())
    }

    pub(crate) fn concept(&self, record: &VertexRecord, scope: &Scope) -> StoreResult<Concept> {
        let parent = self
            .linked_iris(&record.id, Direction::Out, labels::IS_A, scope)?
            .into_iter()
            .next();
        let mut concept = Concept::new(read_core(record, scope), parent);
        concept.glyph_icon = bytes(record, keys::GLYPH_ICON);
        concept.glyph_icon_selected = bytes(record, keys::GLYPH_ICON_SELECTED);
        concept.map_glyph_icon = bytes(record, keys::MAP_GLYPH_ICON);
        concept.color = string(record, keys::COLOR);
        concept.properties = self
            .linked_iris(&record.id, Direction::Out, labels::HAS_PROPERTY, scope)?
            .into_iter()
            .collect();
        Ok(concept)
    }

    pub(crate) fn relationship(&self, record: &VertexRecord, scope: &Scope) -> StoreResult<Relationship> {
        let parent = self
            .linked_iris(&record.id, Direction::Out, labels::IS_A, scope)?
            .into_iter()
            .next();
        let mut relationship = Relationship::new(read_core(record, scope), parent);
        relationship.domain_concept_iris = self
            .linked_iris(&record.id, Direction::Out, labels::HAS_DOMAIN, scope)?
            .into_iter()
            .collect();
        relationship.range_concept_iris = self
            .linked_iris(&record.id, Direction::Out, labels::HAS_RANGE, scope)?
            .into_iter()
            .collect();
        relationship.inverse_of_iris = self
            .linked_iris(&record.id, Direction::Both, labels::INVERSE_OF, scope)?
            .into_iter()
            .filter(|iri| iri != relationship.iri())
            .collect();
        relationship.properties = self
            .linked_iris(&record.id, Direction::Out, labels::HAS_PROPERTY, scope)?
            .into_iter()
            .collect();
        Ok(relationship)
    }

    pub(crate) fn property(&self, record: &VertexRecord, scope: &Scope) -> StoreResult<Property> {
        let data_type = record
            .str_value(keys::DATA_TYPE)
            .and_then(|s| s.parse::<PropertyType>().ok())
            .unwrap_or_default();
        let mut core = read_core(record, scope);
        core.sortable = record
            .bool_value(keys::SORTABLE)
            .unwrap_or_else(|| data_type.is_sortable_by_default());

        let mut property = Property::new(core, data_type);
        property.text_index_hints = record
            .entries(keys::TEXT_INDEX_HINTS)
            .filter_map(|e| TextIndexHint::parse_list(&e.key).ok())
            .flatten()
            .collect();
        property.possible_values = record
            .value(keys::POSSIBLE_VALUES)
            .and_then(PropertyValue::as_json)
            .and_then(|json| serde_json::from_value(json.clone()).ok());
        property.boost = record.value(keys::BOOST).and_then(PropertyValue::as_f64);
        property.dependent_property_iris =
            self.linked_iris(&record.id, Direction::Out, labels::HAS_DEPENDENT_PROPERTY, scope)?;

        for owner in self.linked(&record.id, Direction::In, labels::HAS_PROPERTY, scope)? {
            let Some(iri) = owner.str_value(keys::IRI).map(Iri::new) else {
                continue;
            };
            match owner.kind {
                VertexKind::Concept => {
                    property.concept_iris.insert(iri);
                }
                VertexKind::Relationship => {
                    property.relationship_iris.insert(iri);
                }
                _ => {}
            }
        }
        property.extended_data_table_iris = self
            .linked_iris(&record.id, Direction::In, labels::HAS_COLUMN, scope)?
            .into_iter()
            .collect();
        if property.is_extended_data_table() {
            property.shape = PropertyShape::ExtendedDataTable {
                column_iris: self.linked_iris(&record.id, Direction::Out, labels::HAS_COLUMN, scope)?,
            };
        }
        Ok(property)
    }

    pub(crate) fn concepts(&self, scope: &Scope) -> StoreResult<Vec<Concept>> {
        self.effective_vertices(ElementKind::Concept, scope)?
            .iter()
            .map(|v| self.concept(v, scope))
            .collect()
    }

    pub(crate) fn relationships(&self, scope: &Scope) -> StoreResult<Vec<Relationship>> {
        self.effective_vertices(ElementKind::Relationship, scope)?
            .iter()
            .map(|v| self.relationship(v, scope))
            .collect()
    }

    pub(crate) fn properties(&self, scope: &Scope) -> StoreResult<Vec<Property>> {
        self.effective_vertices(ElementKind::Property, scope)?
            .iter()
            .map(|v| self.property(v, scope))
            .collect()
    }

    /// Build a full snapshot, fetching the three kinds concurrently
    pub(crate) fn ontology(&self, scope: &Scope) -> StoreResult<Ontology> {
        let ((concepts, relationships), properties) = rayon::join(
            || rayon::join(|| self.concepts(scope), || self.relationships(scope)),
            || self.properties(scope),
        );
        Ok(Ontology::new(scope.clone(), concepts?, relationships?, properties?))
    }
}

fn chain_order(edge: &EdgeRecord) -> i64 {
    edge.properties
        .get(labels::ORDER)
        .and_then(PropertyValue::as_i64)
        .unwrap_or(0)
}

fn string(record: &VertexRecord, name: &str) -> Option<String> {
    record.str_value(name).map(str::to_string)
}

fn bytes(record: &VertexRecord, name: &str) -> Option<Vec<u8>> {
    record
        .value(name)
        .and_then(PropertyValue::as_bytes)
        .map(<[u8]>::to_vec)
}

fn read_core(record: &VertexRecord, scope: &Scope) -> ElementCore {
    let iri = Iri::new(record.str_value(keys::IRI).unwrap_or_default());
    let mut core = ElementCore::new(record.id.clone(), iri, record.visibility.clone(), scope.clone());
    core.display_name = string(record, keys::DISPLAY_NAME);
    core.intents = record
        .entries(keys::INTENT)
        .filter_map(|e| e.value.as_str().map(str::to_string))
        .collect::<BTreeSet<_>>();
    core.title_formula = string(record, keys::TITLE_FORMULA);
    core.subtitle_formula = string(record, keys::SUBTITLE_FORMULA);
    core.time_formula = string(record, keys::TIME_FORMULA);
    core.validation_formula = string(record, keys::VALIDATION_FORMULA);
    core.display_formula = string(record, keys::DISPLAY_FORMULA);
    core.user_visible = record.bool_value(keys::USER_VISIBLE).unwrap_or(true);
    core.searchable = record.bool_value(keys::SEARCHABLE).unwrap_or(true);
    core.sortable = record.bool_value(keys::SORTABLE).unwrap_or(true);
    core.addable = record.bool_value(keys::ADDABLE).unwrap_or(true);
    core.updateable = record.bool_value(keys::UPDATEABLE).unwrap_or(true);
    core.deleteable = record.bool_value(keys::DELETEABLE).unwrap_or(true);
    core.sort_priority = record.value(keys::SORT_PRIORITY).and_then(PropertyValue::as_i64);
    core.display_type = string(record, keys::DISPLAY_TYPE);
    core.property_group = string(record, keys::PROPERTY_GROUP);
    core.extra = record
        .entries(keys::EXTRA)
        .filter_map(|e| e.value.as_str().map(|v| (e.key.clone(), v.to_string())))
        .collect();
    core
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontos_model::{ElementId, Visibility, WorkspaceId};
    use ontos_store::{MemoryStore, PropertyEntry};

    fn concept_vertex(store: &MemoryStore, id: &str, iri: &str, visibility: Visibility) -> ElementId {
        let id = ElementId::raw(id);
        store.upsert_vertex(&id, VertexKind::Concept, &visibility).unwrap();
        store
            .set_property(&id, PropertyEntry::new(keys::IRI, iri).with_visibility(visibility))
            .unwrap();
        id
    }

    #[test]
    fn sandboxed_copy_wins_in_its_workspace() {
        let store = MemoryStore::new();
        let w1 = Visibility::workspace(WorkspaceId::new("w1"));
        concept_vertex(&store, "public", "http://x#a", Visibility::public());
        concept_vertex(&store, "private", "http://x#a", w1);
        let loader = SchemaLoader::new(&store);

        let public = loader.resolve(ElementKind::Concept, "http://x#a", &Scope::Public).unwrap().unwrap();
        assert_eq!(public.id, ElementId::raw("public"));
        let sandboxed = loader
            .resolve(ElementKind::Concept, "http://x#a", &Scope::workspace("w1"))
            .unwrap()
            .unwrap();
        assert_eq!(sandboxed.id, ElementId::raw("private"));
        assert_eq!(loader.concepts(&Scope::workspace("w1")).unwrap().len(), 1);
    }

    #[test]
    fn core_attributes_fall_back_to_defaults() {
        let store = MemoryStore::new();
        let id = concept_vertex(&store, "c", "http://x#c", Visibility::public());
        store.set_property(&id, PropertyEntry::new(keys::SEARCHABLE, false)).unwrap();
        store
            .set_property(&id, PropertyEntry::new(keys::INTENT, "person").with_key("person"))
            .unwrap();
        store
            .set_property(&id, PropertyEntry::new(keys::EXTRA, "blue").with_key("http://x#shade"))
            .unwrap();
        let record = store.vertex(&id, &Scope::Public).unwrap().unwrap();
        let concept = SchemaLoader::new(&store).concept(&record, &Scope::Public).unwrap();
        assert!(!concept.core.searchable);
        assert!(concept.core.user_visible);
        assert!(concept.core.has_intent("person"));
        assert_eq!(concept.core.extra.get("http://x#shade").map(String::as_str), Some("blue"));
        assert!(concept.parent_iri.is_none());
    }

    #[test]
    fn chain_order_sorts_linked_vertices() {
        let store = MemoryStore::new();
        let owner = concept_vertex(&store, "owner", "http://x#owner", Visibility::public());
        for (i, name) in ["b", "a", "c"].iter().enumerate() {
            let target = concept_vertex(&store, name, &format!("http://x#{name}"), Visibility::public());
            let edge = EdgeRecord::new(owner.clone(), labels::HAS_DOMAIN, target, Visibility::public())
                .with_property(labels::ORDER, i as i64);
            store.add_edge(edge).unwrap();
        }
        let iris = SchemaLoader::new(&store)
            .linked_iris(&owner, Direction::Out, labels::HAS_DOMAIN, &Scope::Public)
            .unwrap();
        assert_eq!(iris, vec![Iri::new("http://x#b"), Iri::new("http://x#a"), Iri::new("http://x#c")]);
    }
}
