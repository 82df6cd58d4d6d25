//! Create-or-get and update operations
//!
//! Every operation is privilege checked (see [`crate::privilege`]) and
//! writes through to the element store. The snapshot cache is left alone;
//! callers clear it once their batch of changes is complete.

use crate::definition::{
    ConceptDefinition, ElementUpdate, PropertyDefinition, RelationshipDefinition, StoredChange,
};
use crate::error::{OntologyError, OntologyResult};
use crate::privilege::{authorize, Operation, User};
use crate::repository::OntologyRepository;
use crate::schema::{keys, labels};
use ontos_model::{
    Concept, ElementId, ElementKind, Iri, Property, PropertyType, Relationship, SandboxStatus,
    Scope, Visibility, ROOT_CONCEPT_IRI, TOP_RELATIONSHIP_IRI,
};
use ontos_store::{
    Direction, EdgeRecord, PropertyEntry, PropertyValue, StoreError, VertexKind, VertexRecord,
};
use std::collections::BTreeSet;

impl OntologyRepository {
    /// Return the concept with this IRI, creating it if absent
    ///
    /// An existing concept is returned unchanged unless
    /// `purge_changeable` is set. A new concept is linked to its parent and,
    /// in a workspace scope, to that workspace.
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] if the user may not write in `scope`
    /// - [`OntologyError::InvariantViolation`] if the parent is missing or unresolvable
    pub fn get_or_create_concept(
        &self,
        definition: &ConceptDefinition,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<Concept> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let iri = definition.iri.as_str();
        let id = ElementId::derive(ElementKind::Concept, iri, scope);
        let _guard = self.locks.lock(&id);

        if let Some(existing) = self.resolve(ElementKind::Concept, iri, scope)? {
            if definition.purge_changeable {
                self.purge_changeable(&existing, ElementKind::Concept, iri, user, scope)?;
            }
            let record = self.require(ElementKind::Concept, iri, scope)?;
            return Ok(self.loader().concept(&record, scope)?);
        }

        let parent = match (&definition.parent_iri, iri) {
            (_, ROOT_CONCEPT_IRI) => None,
            (Some(parent), _) => Some(self.reference(ElementKind::Concept, parent.as_str(), scope, iri)?),
            (None, _) => {
                return Err(OntologyError::invariant(format!("concept {iri} has no parent")));
            }
        };

        let record = self.create_vertex(&id, VertexKind::Concept, iri, scope)?;
        if let Some(name) = &definition.display_name {
            self.write_value(&id, keys::DISPLAY_NAME, name.as_str(), scope)?;
        }
        if let Some(color) = &definition.color {
            self.write_value(&id, keys::COLOR, color.as_str(), scope)?;
        }
        if let Some(parent) = parent {
            self.link(&id, labels::IS_A, &parent.id, scope, None)?;
        }
        self.attach_to_workspace(&id, scope)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, "concept created");

        let record = self.fresh(&record.id, scope)?;
        Ok(self.loader().concept(&record, scope)?)
    }

    /// Return the relationship with this IRI, creating it if absent
    ///
    /// A new relationship needs at least one domain and one range concept
    /// unless it is the top relationship; its parent defaults to the top
    /// relationship. An existing relationship gains any domain or range
    /// concepts it is missing.
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] if the user may not write in `scope`
    /// - [`OntologyError::InvariantViolation`] for empty or unresolvable domain/range
    /// - [`OntologyError::NotImplemented`] when extending a published relationship from a workspace
    pub fn get_or_create_relationship(
        &self,
        definition: &RelationshipDefinition,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<Relationship> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let iri = definition.iri.as_str();
        let id = ElementId::derive(ElementKind::Relationship, iri, scope);
        let _guard = self.locks.lock(&id);

        if let Some(existing) = self.resolve(ElementKind::Relationship, iri, scope)? {
            if definition.purge_changeable {
                self.purge_changeable(&existing, ElementKind::Relationship, iri, user, scope)?;
            }
            let current = self.loader().relationship(&existing, scope)?;
            let missing_domain = missing(&definition.domain_iris, |i| {
                current.domain_concept_iris.contains(i)
            });
            if !missing_domain.is_empty() {
                self.add_domain_concepts(iri, &missing_domain, user, scope)?;
            }
            let missing_range = missing(&definition.range_iris, |i| {
                current.range_concept_iris.contains(i)
            });
            if !missing_range.is_empty() {
                self.add_range_concepts(iri, &missing_range, user, scope)?;
            }
            let record = self.require(ElementKind::Relationship, iri, scope)?;
            return Ok(self.loader().relationship(&record, scope)?);
        }

        let is_top = iri == TOP_RELATIONSHIP_IRI;
        if !is_top && (definition.domain_iris.is_empty() || definition.range_iris.is_empty()) {
            return Err(OntologyError::invariant(format!(
                "relationship {iri} needs at least one domain and one range concept"
            )));
        }
        let parent = if is_top {
            None
        } else {
            let parent_iri = definition
                .parent_iri
                .as_ref()
                .map_or(TOP_RELATIONSHIP_IRI, Iri::as_str);
            Some(self.reference(ElementKind::Relationship, parent_iri, scope, iri)?)
        };
        let domain = self.references(ElementKind::Concept, &definition.domain_iris, scope, iri)?;
        let range = self.references(ElementKind::Concept, &definition.range_iris, scope, iri)?;

        let record = self.create_vertex(&id, VertexKind::Relationship, iri, scope)?;
        if let Some(name) = &definition.display_name {
            self.write_value(&id, keys::DISPLAY_NAME, name.as_str(), scope)?;
        }
        if let Some(parent) = parent {
            self.link(&id, labels::IS_A, &parent.id, scope, None)?;
        }
        for (order, concept) in domain.iter().enumerate() {
            self.link(&id, labels::HAS_DOMAIN, &concept.id, scope, Some(order))?;
        }
        for (order, concept) in range.iter().enumerate() {
            self.link(&id, labels::HAS_RANGE, &concept.id, scope, Some(order))?;
        }
        self.attach_to_workspace(&id, scope)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, "relationship created");

        let record = self.fresh(&record.id, scope)?;
        Ok(self.loader().relationship(&record, scope)?)
    }

    /// Return the property with this IRI, creating it if absent
    ///
    /// A new property must name at least one owning concept, relationship or
    /// extended data table. An existing property has the new owners merged
    /// in and, if a different dependent chain is given, the chain rewritten.
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] if the user may not write in `scope`
    /// - [`OntologyError::InvariantViolation`] for missing or unresolvable owners and dependents
    /// - [`OntologyError::NotImplemented`] when extending a published property from a workspace
    pub fn get_or_create_property(
        &self,
        definition: &PropertyDefinition,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<Property> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let iri = definition.iri.as_str();
        let id = ElementId::derive(ElementKind::Property, iri, scope);
        let _guard = self.locks.lock(&id);

        if let Some(existing) = self.resolve(ElementKind::Property, iri, scope)? {
            if definition.purge_changeable {
                self.purge_changeable(&existing, ElementKind::Property, iri, user, scope)?;
            }
            self.merge_property(&existing, definition, user, scope)?;
            let record = self.require(ElementKind::Property, iri, scope)?;
            return Ok(self.loader().property(&record, scope)?);
        }

        if !definition.has_owner() {
            return Err(OntologyError::invariant(format!(
                "property {iri} must be attached to at least one concept, relationship or extended data table"
            )));
        }
        let concepts = self.references(ElementKind::Concept, &definition.concept_iris, scope, iri)?;
        let relationships =
            self.references(ElementKind::Relationship, &definition.relationship_iris, scope, iri)?;
        let tables = self.tables(&definition.extended_data_table_iris, scope, iri)?;
        let dependents =
            self.references(ElementKind::Property, &definition.dependent_property_iris, scope, iri)?;

        let record = self.create_vertex(&id, VertexKind::Property, iri, scope)?;
        self.write_value(&id, keys::DATA_TYPE, definition.data_type.as_str(), scope)?;
        if let Some(name) = &definition.display_name {
            self.write_value(&id, keys::DISPLAY_NAME, name.as_str(), scope)?;
        }
        if !definition.text_index_hints.is_empty() {
            let change = ElementUpdate::TextIndexHints(definition.text_index_hints.clone()).into_change();
            self.apply_change(&id, change, scope)?;
        }
        if let Some(values) = &definition.possible_values {
            let change = ElementUpdate::PossibleValues(Some(values.clone())).into_change();
            self.apply_change(&id, change, scope)?;
        }
        for owner in concepts.iter().chain(&relationships) {
            self.link(&owner.id, labels::HAS_PROPERTY, &id, scope, None)?;
        }
        for table in &tables {
            self.add_column(table, &id, scope)?;
        }
        self.rewrite_dependents(&id, &dependents, scope)?;
        self.attach_to_workspace(&id, scope)?;
        self.store.flush()?;
        tracing::debug!(iri, %scope, data_type = %definition.data_type, "property created");

        let record = self.fresh(&record.id, scope)?;
        Ok(self.loader().property(&record, scope)?)
    }

    fn merge_property(
        &self,
        existing: &VertexRecord,
        definition: &PropertyDefinition,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        let iri = definition.iri.as_str();
        let current = self.loader().property(existing, scope)?;

        let current_owners: BTreeSet<Iri> = current
            .concept_iris
            .iter()
            .chain(&current.relationship_iris)
            .cloned()
            .collect();
        let mut wanted = current_owners.clone();
        wanted.extend(definition.concept_iris.iter().cloned());
        wanted.extend(definition.relationship_iris.iter().cloned());
        if wanted != current_owners {
            let wanted: Vec<Iri> = wanted.into_iter().collect();
            self.update_property_domain_iris(iri, &wanted, user, scope)?;
        }

        let new_tables = missing(&definition.extended_data_table_iris, |t| {
            current.extended_data_table_iris.contains(t)
        });
        if !new_tables.is_empty() {
            self.ensure_extendable(existing, ElementKind::Property, iri, scope)?;
            for table in self.tables(&new_tables, scope, iri)? {
                self.add_column(&table, &existing.id, scope)?;
            }
        }

        if !definition.dependent_property_iris.is_empty()
            && definition.dependent_property_iris != current.dependent_property_iris
        {
            self.ensure_mutable(existing, ElementKind::Property, iri, user, scope)?;
            let dependents = self.references(
                ElementKind::Property,
                &definition.dependent_property_iris,
                scope,
                iri,
            )?;
            self.rewrite_dependents(&existing.id, &dependents, scope)?;
        }
        self.store.flush()?;
        Ok(())
    }

    /// Set or clear one attribute of an element
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] if the user may not write in `scope`,
    ///   or the element is published and `scope` is a workspace
    /// - [`OntologyError::NotFound`] if the element is not visible
    /// - [`OntologyError::InvariantViolation`] if the attribute does not exist on `kind`
    pub fn update_element(
        &self,
        kind: ElementKind,
        iri: &str,
        update: ElementUpdate,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        if !update.applies_to(kind) {
            return Err(OntologyError::invariant(format!(
                "attribute {} does not apply to a {kind}",
                update.attribute()
            )));
        }
        let record = self.require(kind, iri, scope)?;
        self.ensure_mutable(&record, kind, iri, user, scope)?;
        let attribute = update.attribute();
        self.apply_change(&record.id, update.into_change(), scope)?;
        self.store.flush()?;
        tracing::debug!(%kind, iri, attribute, %scope, "element updated");
        Ok(())
    }

    /// Add an intent tag
    ///
    /// # Errors
    /// Same as [`update_element`](Self::update_element)
    pub fn add_intent(
        &self,
        kind: ElementKind,
        iri: &str,
        intent: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        self.change_intent(kind, iri, intent, true, user, scope)
    }

    /// Remove an intent tag
    ///
    /// # Errors
    /// Same as [`update_element`](Self::update_element)
    pub fn remove_intent(
        &self,
        kind: ElementKind,
        iri: &str,
        intent: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        self.change_intent(kind, iri, intent, false, user, scope)
    }

    fn change_intent(
        &self,
        kind: ElementKind,
        iri: &str,
        intent: &str,
        add: bool,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let record = self.require(kind, iri, scope)?;
        self.ensure_mutable(&record, kind, iri, user, scope)?;
        let change = if add {
            StoredChange::SetKeyed {
                name: keys::INTENT,
                key: intent.to_string(),
                value: intent.into(),
            }
        } else {
            StoredChange::RemoveKeyed {
                name: keys::INTENT,
                key: intent.to_string(),
            }
        };
        self.apply_change(&record.id, change, scope)?;
        self.store.flush()?;
        tracing::debug!(%kind, iri, intent, add, "intent changed");
        Ok(())
    }

    /// Add concepts to a relationship's domain
    ///
    /// # Errors
    /// - [`OntologyError::NotImplemented`] if the relationship is published and `scope` is a workspace
    /// - [`OntologyError::InvariantViolation`] if a concept cannot be resolved
    pub fn add_domain_concepts(
        &self,
        relationship_iri: &str,
        concept_iris: &[Iri],
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        self.add_endpoint_concepts(labels::HAS_DOMAIN, relationship_iri, concept_iris, user, scope)
    }

    /// Add concepts to a relationship's range
    ///
    /// # Errors
    /// Same as [`add_domain_concepts`](Self::add_domain_concepts)
    pub fn add_range_concepts(
        &self,
        relationship_iri: &str,
        concept_iris: &[Iri],
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        self.add_endpoint_concepts(labels::HAS_RANGE, relationship_iri, concept_iris, user, scope)
    }

    fn add_endpoint_concepts(
        &self,
        label: &str,
        relationship_iri: &str,
        concept_iris: &[Iri],
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let record = self.require(ElementKind::Relationship, relationship_iri, scope)?;
        self.ensure_extendable(&record, ElementKind::Relationship, relationship_iri, scope)?;
        let concepts = self.references(ElementKind::Concept, concept_iris, scope, relationship_iri)?;

        let existing: BTreeSet<ElementId> = self
            .store
            .edges(&record.id, Direction::Out, Some(label), scope)?
            .into_iter()
            .map(|e| e.to)
            .collect();
        let mut order = existing.len();
        for concept in concepts.iter().filter(|c| !existing.contains(&c.id)) {
            self.link(&record.id, label, &concept.id, scope, Some(order))?;
            order += 1;
        }
        self.store.flush()?;
        tracing::debug!(relationship = relationship_iri, label, added = order - existing.len(), "endpoints added");
        Ok(())
    }

    /// Link two relationships as inverses of each other
    ///
    /// # Errors
    /// - [`OntologyError::NotFound`] if either relationship is not visible
    /// - [`OntologyError::NotImplemented`] if either is published and `scope` is a workspace
    pub fn add_inverse_of(
        &self,
        relationship_iri: &str,
        inverse_iri: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let forward = self.require(ElementKind::Relationship, relationship_iri, scope)?;
        let inverse = self.require(ElementKind::Relationship, inverse_iri, scope)?;
        self.ensure_extendable(&forward, ElementKind::Relationship, relationship_iri, scope)?;
        self.ensure_extendable(&inverse, ElementKind::Relationship, inverse_iri, scope)?;
        self.link(&forward.id, labels::INVERSE_OF, &inverse.id, scope, None)?;
        self.link(&inverse.id, labels::INVERSE_OF, &forward.id, scope, None)?;
        self.store.flush()?;
        tracing::debug!(relationship = relationship_iri, inverse = inverse_iri, "inverse linked");
        Ok(())
    }

    /// Replace the concepts and relationships a property is attached to
    ///
    /// # Errors
    /// - [`OntologyError::NotFound`] if the property is not visible
    /// - [`OntologyError::NotImplemented`] if the property is published and `scope` is a workspace
    /// - [`OntologyError::InvariantViolation`] if an owner cannot be resolved
    pub fn update_property_domain_iris(
        &self,
        property_iri: &str,
        domain_iris: &[Iri],
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, scope)?;
        let record = self.require(ElementKind::Property, property_iri, scope)?;
        self.ensure_extendable(&record, ElementKind::Property, property_iri, scope)?;

        let mut owners = Vec::with_capacity(domain_iris.len());
        for iri in domain_iris {
            let owner = match self.resolve(ElementKind::Concept, iri.as_str(), scope)? {
                Some(concept) => concept,
                None => self.reference(ElementKind::Relationship, iri.as_str(), scope, property_iri)?,
            };
            owners.push(owner);
        }
        let wanted: BTreeSet<&ElementId> = owners.iter().map(|o| &o.id).collect();

        let current = self
            .store
            .edges(&record.id, Direction::In, Some(labels::HAS_PROPERTY), scope)?;
        for edge in current.iter().filter(|e| !wanted.contains(&e.from)) {
            self.store.delete_edge(&edge.id)?;
        }
        let linked: BTreeSet<&ElementId> = current.iter().map(|e| &e.from).collect();
        for owner in owners.iter().filter(|o| !linked.contains(&o.id)) {
            self.link(&owner.id, labels::HAS_PROPERTY, &record.id, scope, None)?;
        }
        self.store.flush()?;
        tracing::debug!(property = property_iri, owners = owners.len(), "property domain replaced");
        Ok(())
    }

    /// Reject changes to a published element from a workspace
    pub(crate) fn ensure_mutable(
        &self,
        record: &VertexRecord,
        kind: ElementKind,
        iri: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        if !scope.is_public() && record.visibility.sandbox_status(scope) == SandboxStatus::Public {
            return Err(OntologyError::access_denied(
                user.id(),
                format!("{kind} {iri} is published and cannot be changed from {scope}"),
            ));
        }
        Ok(())
    }

    /// Reject sandboxed extension of a published element
    fn ensure_extendable(
        &self,
        record: &VertexRecord,
        kind: ElementKind,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<()> {
        if !scope.is_public() && record.visibility.sandbox_status(scope) == SandboxStatus::Public {
            return Err(OntologyError::not_implemented(format!(
                "extending published {kind} {iri} from {scope}"
            )));
        }
        Ok(())
    }

    fn purge_changeable(
        &self,
        record: &VertexRecord,
        kind: ElementKind,
        iri: &str,
        user: &User,
        scope: &Scope,
    ) -> OntologyResult<()> {
        self.ensure_mutable(record, kind, iri, user, scope)?;
        let names: BTreeSet<&str> = record
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| !keys::IDENTITY.contains(name))
            .collect();
        for name in &names {
            self.store.remove_property(&record.id, name, None)?;
        }
        tracing::debug!(%kind, iri, purged = names.len(), "changeable attributes purged");
        Ok(())
    }

    /// Resolve an IRI another element refers to
    pub(crate) fn reference(
        &self,
        kind: ElementKind,
        iri: &str,
        scope: &Scope,
        referrer: &str,
    ) -> OntologyResult<VertexRecord> {
        self.resolve(kind, iri, scope)?.ok_or_else(|| {
            OntologyError::invariant(format!("{referrer} refers to unknown {kind} {iri}"))
        })
    }

    fn references(
        &self,
        kind: ElementKind,
        iris: &[Iri],
        scope: &Scope,
        referrer: &str,
    ) -> OntologyResult<Vec<VertexRecord>> {
        iris.iter()
            .map(|iri| self.reference(kind, iri.as_str(), scope, referrer))
            .collect()
    }

    /// Resolve extended data tables a property becomes a column of
    fn tables(&self, iris: &[Iri], scope: &Scope, referrer: &str) -> OntologyResult<Vec<VertexRecord>> {
        let tables = self.references(ElementKind::Property, iris, scope, referrer)?;
        for table in &tables {
            let is_table = table
                .str_value(keys::DATA_TYPE)
                .is_some_and(|t| t == PropertyType::ExtendedDataTable.as_str());
            if !is_table {
                return Err(OntologyError::invariant(format!(
                    "{referrer} names {} as a table, but it is not an extended data table",
                    table.str_value(keys::IRI).unwrap_or_default()
                )));
            }
        }
        Ok(tables)
    }

    fn add_column(&self, table: &VertexRecord, column: &ElementId, scope: &Scope) -> OntologyResult<()> {
        let position = self
            .store
            .edges(&table.id, Direction::Out, Some(labels::HAS_COLUMN), scope)?
            .len();
        self.link(&table.id, labels::HAS_COLUMN, column, scope, Some(position))
    }

    fn rewrite_dependents(
        &self,
        id: &ElementId,
        dependents: &[VertexRecord],
        scope: &Scope,
    ) -> OntologyResult<()> {
        for edge in self
            .store
            .edges(id, Direction::Out, Some(labels::HAS_DEPENDENT_PROPERTY), scope)?
        {
            self.store.delete_edge(&edge.id)?;
        }
        for (order, dependent) in dependents.iter().enumerate() {
            self.link(id, labels::HAS_DEPENDENT_PROPERTY, &dependent.id, scope, Some(order))?;
        }
        Ok(())
    }

    fn create_vertex(
        &self,
        id: &ElementId,
        kind: VertexKind,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<VertexRecord> {
        let record = self.store.upsert_vertex(id, kind, &scope.visibility())?;
        self.write_value(id, keys::IRI, iri, scope)?;
        Ok(record)
    }

    fn fresh(&self, id: &ElementId, scope: &Scope) -> OntologyResult<VertexRecord> {
        self.store
            .vertex(id, scope)?
            .ok_or_else(|| StoreError::VertexNotFound(id.clone()).into())
    }

    fn write_value(
        &self,
        id: &ElementId,
        name: &str,
        value: impl Into<PropertyValue>,
        scope: &Scope,
    ) -> OntologyResult<()> {
        let entry = PropertyEntry::new(name, value).with_visibility(scope.visibility());
        Ok(self.store.set_property(id, entry)?)
    }

    pub(crate) fn apply_change(
        &self,
        id: &ElementId,
        change: StoredChange,
        scope: &Scope,
    ) -> OntologyResult<()> {
        let visibility = scope.visibility();
        match change {
            StoredChange::Replace { name, values } => {
                self.store.remove_property(id, name, None)?;
                for (key, value) in values {
                    let entry = PropertyEntry::new(name, value)
                        .with_key(key)
                        .with_visibility(visibility.clone());
                    self.store.set_property(id, entry)?;
                }
            }
            StoredChange::SetKeyed { name, key, value } => {
                let entry = PropertyEntry::new(name, value)
                    .with_key(key)
                    .with_visibility(visibility);
                self.store.set_property(id, entry)?;
            }
            StoredChange::RemoveKeyed { name, key } => {
                self.store.remove_property(id, name, Some(&key))?;
            }
        }
        Ok(())
    }

    fn link(
        &self,
        from: &ElementId,
        label: &str,
        to: &ElementId,
        scope: &Scope,
        order: Option<usize>,
    ) -> OntologyResult<()> {
        let mut edge = EdgeRecord::new(from.clone(), label, to.clone(), scope.visibility());
        if let Some(order) = order {
            edge = edge.with_property(labels::ORDER, i64::try_from(order).unwrap_or(i64::MAX));
        }
        self.store.add_edge(edge)?;
        Ok(())
    }

    fn attach_to_workspace(&self, id: &ElementId, scope: &Scope) -> OntologyResult<()> {
        let Some(workspace) = scope.workspace_id() else {
            return Ok(());
        };
        let workspace_vertex = ElementId::for_workspace(workspace);
        self.store.upsert_vertex(
            &workspace_vertex,
            VertexKind::Workspace,
            &Visibility::workspace(workspace.clone()),
        )?;
        self.link(&workspace_vertex, labels::WORKSPACE_TO_ONTOLOGY, id, scope, None)
    }
}

fn missing(wanted: &[Iri], present: impl Fn(&Iri) -> bool) -> Vec<Iri> {
    wanted.iter().filter(|i| !present(i)).cloned().collect()
}
