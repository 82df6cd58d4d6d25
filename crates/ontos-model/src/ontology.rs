//! Scope-specific schema snapshot
//!
//! [`Ontology`] is an immutable, materialized view of every concept,
//! relationship and property visible in one scope.

use crate::element::{Concept, Property, Relationship, SchemaElement};
use crate::hierarchy::Hierarchy;
use crate::iri::Iri;
use crate::scope::{SandboxStatus, Scope};
use std::collections::BTreeMap;

/// Immutable schema snapshot for one scope
#[derive(Debug, Clone)]
pub struct Ontology {
    scope: Scope,
    concepts: BTreeMap<Iri, Concept>,
    relationships: BTreeMap<Iri, Relationship>,
    properties: BTreeMap<Iri, Property>,
    concept_tree: Hierarchy,
    relationship_tree: Hierarchy,
}

impl Ontology {
    /// Assemble a snapshot
    ///
    /// The property map is the union of `properties`, the properties named by
    /// the concepts and relationships, and the columns of every extended data
    /// table; entries named but not supplied are skipped.
    #[must_use]
    pub fn new(
        scope: Scope,
        concepts: Vec<Concept>,
        relationships: Vec<Relationship>,
        properties: Vec<Property>,
    ) -> Self {
        let concepts: BTreeMap<Iri, Concept> =
            concepts.into_iter().map(|c| (c.iri().clone(), c)).collect();
        let relationships: BTreeMap<Iri, Relationship> =
            relationships.into_iter().map(|r| (r.iri().clone(), r)).collect();

        let mut pool: BTreeMap<Iri, Property> =
            properties.into_iter().map(|p| (p.iri().clone(), p)).collect();
        let mut aggregated = BTreeMap::new();
        let referenced = concepts
            .values()
            .flat_map(|c| c.properties.iter())
            .chain(relationships.values().flat_map(|r| r.properties.iter()))
            .cloned()
            .collect::<Vec<_>>();
        for iri in referenced {
            if let Some(p) = pool.remove(&iri) {
                aggregated.insert(iri, p);
            }
        }
        // columns are owned only by their table, so they arrive through the pool
        aggregated.append(&mut pool);

        let concept_tree = Hierarchy::from_pairs(
            concepts
                .values()
                .map(|c| (c.iri().clone(), c.parent_iri.clone())),
        );
        let relationship_tree = Hierarchy::from_pairs(
            relationships
                .values()
                .map(|r| (r.iri().clone(), r.parent_iri.clone())),
        );

        Self {
            scope,
            concepts,
            relationships,
            properties: aggregated,
            concept_tree,
            relationship_tree,
        }
    }

    /// Scope this snapshot was built for
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Public iff every member element is public
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        let all_public = self.concepts.values().all(|c| c.sandbox_status().is_public())
            && self.relationships.values().all(|r| r.sandbox_status().is_public())
            && self.properties.values().all(|p| p.sandbox_status().is_public());
        if all_public {
            SandboxStatus::Public
        } else {
            SandboxStatus::Private
        }
    }

    #[must_use]
    pub fn concept(&self, iri: &str) -> Option<&Concept> {
        self.concepts.get(iri)
    }

    #[must_use]
    pub fn relationship(&self, iri: &str) -> Option<&Relationship> {
        self.relationships.get(iri)
    }

    #[must_use]
    pub fn property(&self, iri: &str) -> Option<&Property> {
        self.properties.get(iri)
    }

    /// Look up an element of any kind
    #[must_use]
    pub fn element(&self, iri: &str) -> Option<SchemaElement> {
        self.concept(iri)
            .cloned()
            .map(SchemaElement::from)
            .or_else(|| self.relationship(iri).cloned().map(SchemaElement::from))
            .or_else(|| self.property(iri).cloned().map(SchemaElement::from))
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Aggregated properties from every source
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// The concept and every descendant, breadth first
    #[must_use]
    pub fn concept_and_all_children(&self, iri: &str) -> Vec<&Concept> {
        self.concept_tree
            .self_and_descendants(iri)
            .iter()
            .filter_map(|i| self.concepts.get(i))
            .collect()
    }

    /// The relationship and every descendant, breadth first
    #[must_use]
    pub fn relationship_and_all_children(&self, iri: &str) -> Vec<&Relationship> {
        self.relationship_tree
            .self_and_descendants(iri)
            .iter()
            .filter_map(|i| self.relationships.get(i))
            .collect()
    }

    /// Ancestors of a concept, nearest first
    #[must_use]
    pub fn concept_ancestors(&self, iri: &str) -> Vec<&Concept> {
        self.concept_tree
            .ancestors(iri)
            .unwrap_or_default()
            .iter()
            .filter_map(|i| self.concepts.get(i))
            .collect()
    }

    /// Ancestors of a relationship, nearest first
    #[must_use]
    pub fn relationship_ancestors(&self, iri: &str) -> Vec<&Relationship> {
        self.relationship_tree
            .ancestors(iri)
            .unwrap_or_default()
            .iter()
            .filter_map(|i| self.relationships.get(i))
            .collect()
    }

    /// Relationships whose domain or range names the concept
    #[must_use]
    pub fn relationships_referencing(&self, concept_iri: &str) -> Vec<&Relationship> {
        self.relationships
            .values()
            .filter(|r| r.references_concept(concept_iri))
            .collect()
    }

    /// Concept hierarchy
    #[inline]
    #[must_use]
    pub fn concept_tree(&self) -> &Hierarchy {
        &self.concept_tree
    }

    /// Relationship hierarchy
    #[inline]
    #[must_use]
    pub fn relationship_tree(&self) -> &Hierarchy {
        &self.relationship_tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementCore;
    use crate::identity::{ElementId, ElementKind};
    use crate::property_type::PropertyType;
    use crate::scope::{Visibility, WorkspaceId};
    use pretty_assertions::assert_eq;

    fn core(kind: ElementKind, iri: &str, vis: Visibility, scope: &Scope) -> ElementCore {
        ElementCore::new(ElementId::derive(kind, iri, scope), Iri::new(iri), vis, scope.clone())
    }

    fn concept(iri: &str, parent: Option<&str>, scope: &Scope) -> Concept {
        Concept::new(
            core(ElementKind::Concept, iri, Visibility::public(), scope),
            parent.map(Iri::new),
        )
    }

    #[test]
    fn hierarchy_queries() {
        let scope = Scope::Public;
        let ontology = Ontology::new(
            scope.clone(),
            vec![
                concept("root", None, &scope),
                concept("entity", Some("root"), &scope),
                concept("person", Some("entity"), &scope),
            ],
            vec![],
            vec![],
        );
        assert_eq!(ontology.concept_and_all_children("entity").len(), 2);
        let ancestors: Vec<&str> = ontology
            .concept_ancestors("person")
            .iter()
            .map(|c| c.iri().as_str())
            .collect();
        assert_eq!(ancestors, vec!["entity", "root"]);
        assert_eq!(ontology.sandbox_status(), SandboxStatus::Public);
    }

    #[test]
    fn private_member_makes_snapshot_private() {
        let scope = Scope::workspace("w1");
        let private = Concept::new(
            core(
                ElementKind::Concept,
                "mine",
                Visibility::workspace(WorkspaceId::new("w1")),
                &scope,
            ),
            Some(Iri::new("root")),
        );
        let ontology = Ontology::new(scope.clone(), vec![concept("root", None, &scope), private], vec![], vec![]);
        assert_eq!(ontology.sandbox_status(), SandboxStatus::Private);
    }

    #[test]
    fn aggregated_properties_include_table_columns() {
        let scope = Scope::Public;
        let mut table = Property::new(
            core(ElementKind::Property, "table", Visibility::public(), &scope),
            PropertyType::ExtendedDataTable,
        );
        table.shape = crate::element::PropertyShape::ExtendedDataTable {
            column_iris: vec![Iri::new("column")],
        };
        let column = Property::new(
            core(ElementKind::Property, "column", Visibility::public(), &scope),
            PropertyType::String,
        );
        let mut thing = concept("root", None, &scope);
        thing.properties.insert(Iri::new("table"));

        let ontology = Ontology::new(scope, vec![thing], vec![], vec![table, column]);
        assert_eq!(ontology.property_count(), 2);
        assert!(ontology.property("column").is_some());
        assert!(ontology.element("table").is_some());
    }
}
