//! Publish and cascading delete
//!
//! Publishing is the one-way PRIVATE to PUBLIC transition of a single
//! element; it does not cascade to attached properties or children.
//! Deleting checks children, references and live graph usage, then removes
//! private properties left without an owner.

use crate::error::{OntologyError, OntologyResult};
use crate::privilege::{authorize, Operation, User};
use crate::repository::OntologyRepository;
use crate::schema::{keys, labels};
use ontos_model::{
    ElementId, ElementKind, Iri, Ontology, Property, SandboxStatus, Scope, WorkspaceId,
};
use ontos_store::{Direction, ExistenceQuery, VertexRecord};

impl OntologyRepository {
    /// Publish a concept out of a workspace
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] without the PUBLISH privilege
    /// - [`OntologyError::NotFound`] if the concept is not visible in the workspace
    /// - [`OntologyError::InvariantViolation`] if another workspace already published the IRI
    pub fn publish_concept(&self, iri: &str, user: &User, workspace: &WorkspaceId) -> OntologyResult<()> {
        self.publish(ElementKind::Concept, iri, user, workspace)
    }

    /// Publish a relationship out of a workspace
    ///
    /// # Errors
    /// Same as [`publish_concept`](Self::publish_concept)
    pub fn publish_relationship(
        &self,
        iri: &str,
        user: &User,
        workspace: &WorkspaceId,
    ) -> OntologyResult<()> {
        self.publish(ElementKind::Relationship, iri, user, workspace)
    }

    /// Publish a property out of a workspace
    ///
    /// # Errors
    /// Same as [`publish_concept`](Self::publish_concept)
    pub fn publish_property(&self, iri: &str, user: &User, workspace: &WorkspaceId) -> OntologyResult<()> {
        self.publish(ElementKind::Property, iri, user, workspace)
    }

    fn publish(
        &self,
        kind: ElementKind,
        iri: &str,
        user: &User,
        workspace: &WorkspaceId,
    ) -> OntologyResult<()> {
        let scope = Scope::Workspace(workspace.clone());
        authorize(self.authorization.as_ref(), user, Operation::Publish, &scope)?;
        let record = self.require(kind, iri, &scope)?;
        if record.visibility.sandbox_status(&scope) == SandboxStatus::Public {
            tracing::debug!(%kind, iri, "already public");
            return Ok(());
        }

        let public = self.store.find_vertices(kind.into(), keys::IRI, iri, &Scope::Public)?;
        if public.iter().any(|v| v.id != record.id) {
            return Err(OntologyError::invariant(format!(
                "{kind} {iri} is already published"
            )));
        }

        let published = record.visibility.without(workspace);
        self.store.alter_vertex_visibility(&record.id, &published)?;
        self.store.alter_property_visibilities(&record.id, &published)?;

        for edge in self.store.edges(&record.id, Direction::Both, None, &scope)? {
            if !edge.visibility.names(workspace) {
                continue;
            }
            if edge.label == labels::WORKSPACE_TO_ONTOLOGY {
                self.store.delete_edge(&edge.id)?;
                continue;
            }
            let other_is_public = self
                .store
                .vertex(edge.other_end(&record.id), &scope)?
                .is_some_and(|v| !v.visibility.names(workspace));
            if other_is_public {
                self.store
                    .alter_edge_visibility(&edge.id, &edge.visibility.without(workspace))?;
            }
        }
        self.store.flush()?;
        tracing::debug!(%kind, iri, %workspace, "published");
        Ok(())
    }

    /// Delete a private concept
    ///
    /// Fails if the concept has children, is the domain or range of a
    /// relationship, is published, or still types graph data. Private
    /// properties owned only by this concept are deleted with it.
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] without ADMIN, in public scope, or for a published concept
    /// - [`OntologyError::NotFound`] if the concept is not visible
    /// - [`OntologyError::InvariantViolation`] if a precondition fails
    pub fn delete_concept(&self, iri: &str, user: &User, scope: &Scope) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Delete, scope)?;
        let record = self.require(ElementKind::Concept, iri, scope)?;
        let ontology = self.loader().ontology(scope)?;

        let family = ontology.concept_and_all_children(iri).len();
        if family > 1 {
            return Err(OntologyError::invariant(format!(
                "concept {iri} has {} descendant concepts",
                family - 1
            )));
        }
        let referencing: Vec<&str> = ontology
            .relationships_referencing(iri)
            .iter()
            .map(|r| r.iri().as_str())
            .collect();
        if !referencing.is_empty() {
            return Err(OntologyError::invariant(format!(
                "concept {iri} is the domain or range of {}",
                referencing.join(", ")
            )));
        }
        self.ensure_private(&record, ElementKind::Concept, iri, user, scope)?;
        self.ensure_unused(
            &ExistenceQuery::PropertyValueIn {
                name: keys::CONCEPT_TYPE.to_string(),
                values: vec![iri.to_string()],
            },
            ElementKind::Concept,
            iri,
            scope,
        )?;

        let orphans = sole_owned(&ontology, |p| p.concept_iris.contains(iri));
        self.store.delete_vertex(&record.id)?;
        self.delete_orphans(&orphans, iri)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, orphans = orphans.len(), "concept deleted");
        Ok(())
    }

    /// Delete a private relationship
    ///
    /// Fails if the relationship has children, is published, or labels graph
    /// edges. Private properties owned only by it are deleted with it.
    ///
    /// # Errors
    /// Same taxonomy as [`delete_concept`](Self::delete_concept)
    pub fn delete_relationship(&self, iri: &str, user: &User, scope: &Scope) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Delete, scope)?;
        let record = self.require(ElementKind::Relationship, iri, scope)?;
        let ontology = self.loader().ontology(scope)?;

        let family = ontology.relationship_and_all_children(iri).len();
        if family > 1 {
            return Err(OntologyError::invariant(format!(
                "relationship {iri} has {} descendant relationships",
                family - 1
            )));
        }
        self.ensure_private(&record, ElementKind::Relationship, iri, user, scope)?;
        self.ensure_unused(
            &ExistenceQuery::EdgeLabel {
                label: iri.to_string(),
            },
            ElementKind::Relationship,
            iri,
            scope,
        )?;

        let orphans = sole_owned(&ontology, |p| p.relationship_iris.contains(iri));
        self.store.delete_vertex(&record.id)?;
        self.delete_orphans(&orphans, iri)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, orphans = orphans.len(), "relationship deleted");
        Ok(())
    }

    /// Delete a private property
    ///
    /// Fails if the property is published or any graph vertex or edge holds
    /// a value for it. Deleting an extended data table also deletes private
    /// columns owned only by that table.
    ///
    /// # Errors
    /// Same taxonomy as [`delete_concept`](Self::delete_concept)
    pub fn delete_property(&self, iri: &str, user: &User, scope: &Scope) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Delete, scope)?;
        let record = self.require(ElementKind::Property, iri, scope)?;
        self.ensure_private(&record, ElementKind::Property, iri, user, scope)?;
        self.ensure_unused(
            &ExistenceQuery::HasProperty {
                name: iri.to_string(),
            },
            ElementKind::Property,
            iri,
            scope,
        )?;

        let ontology = self.loader().ontology(scope)?;
        let orphans = sole_owned(&ontology, |p| p.extended_data_table_iris.contains(iri));
        self.store.delete_vertex(&record.id)?;
        self.delete_orphans(&orphans, iri)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, orphans = orphans.len(), "property deleted");
        Ok(())
    }

    fn ensure_private(
        &self,
        record: &VertexRecord,
        kind: ElementKind,
        iri: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        if record.visibility.sandbox_status(scope) == SandboxStatus::Public {
            return Err(OntologyError::access_denied(
                user.id(),
                format!("{kind} {iri} is published and cannot be deleted"),
            ));
        }
        Ok(())
    }

    fn ensure_unused(
        &self,
        query: &ExistenceQuery,
        kind: ElementKind,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<()> {
        let in_use = self.store.count_matching(query, scope)?;
        if in_use > 0 {
            return Err(OntologyError::invariant(format!(
                "{kind} {iri} is still used by {in_use} graph elements"
            )));
        }
        Ok(())
    }

    fn delete_orphans(&self, orphans: &[Orphan], owner: &str) -> OntologyResult<()> {
        for orphan in orphans {
            self.store.delete_vertex(&orphan.id)?;
            tracing::debug!(property = %orphan.iri, owner, "orphaned property deleted");
        }
        Ok(())
    }
}

/// Property scheduled for cascade deletion
#[derive(Debug, Clone)]
struct Orphan {
    id: ElementId,
    iri: Iri,
}

/// Private properties whose only owner matches `owned_by`
fn sole_owned(ontology: &Ontology, owned_by: impl Fn(&Property) -> bool) -> Vec<Orphan> {
    ontology
        .properties()
        .filter(|p| p.sandbox_status() == SandboxStatus::Private)
        .filter(|p| p.owner_count() == 1 && owned_by(p))
        .map(|p| Orphan {
            id: p.core.id.clone(),
            iri: p.iri().clone(),
        })
        .collect()
}
