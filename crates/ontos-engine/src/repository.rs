//! Schema repository: read API, snapshot cache and bootstrap
//!
//! [`OntologyRepository`] owns an element store, an authorization provider
//! and a [`SnapshotCache`]. Reads go through the cache; mutations (see the
//! `mutation` and `lifecycle` modules) write through to the store and never
//! invalidate the cache on their own.

use crate::cache::SnapshotCache;
use crate::config::OntologyConfig;
use crate::definition::{ConceptDefinition, ElementUpdate, RelationshipDefinition};
use crate::error::{OntologyError, OntologyResult};
use crate::loader::SchemaLoader;
use crate::locks::IdentityLocks;
use crate::privilege::{authorize, AuthorizationProvider, Operation, User};
use crate::schema::keys;
use ontos_model::{
    generate_dynamic_iri, Concept, ElementKind, Iri, Ontology, Property, Relationship, Scope,
    ENTITY_CONCEPT_IRI, ROOT_CONCEPT_IRI, TOP_RELATIONSHIP_IRI,
};
use ontos_store::{ElementStore, PropertyEntry, PropertyValue, VertexRecord};
use std::sync::Arc;

/// A schema document previously recorded on the root concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Position in import order
    pub ordinal: usize,
    /// Global document name
    pub iri: String,
    /// Hex content hash
    pub hash: String,
    /// Raw document bytes
    pub bytes: Vec<u8>,
}

/// Sandboxed schema engine over an element store
#[derive(Debug)]
pub struct OntologyRepository {
    pub(crate) store: Arc<dyn ElementStore>,
    pub(crate) authorization: Arc<dyn AuthorizationProvider>,
    pub(crate) cache: SnapshotCache,
    pub(crate) locks: IdentityLocks,
    config: OntologyConfig,
}

impl OntologyRepository {
    /// Open a repository, creating the well-known elements if absent
    ///
    /// The root concept, the entity concept and the hidden top relationship
    /// are created by the system user in public scope.
    ///
    /// # Errors
    /// Returns an error if the store rejects a bootstrap write
    pub fn open(
        store: Arc<dyn ElementStore>,
        authorization: Arc<dyn AuthorizationProvider>,
        config: OntologyConfig,
    ) -> OntologyResult<Self> {
        let repository = Self {
            store,
            authorization,
            cache: SnapshotCache::new(config.cache.max_capacity),
            locks: IdentityLocks::default(),
            config,
        };
        repository.bootstrap()?;
        Ok(repository)
    }

    fn bootstrap(&self) -> OntologyResult<()> {
        let system = User::system();
        let public = Scope::Public;
        self.get_or_create_concept(
            &ConceptDefinition::new(ROOT_CONCEPT_IRI).display_name("Thing"),
            &system,
            &public,
        )?;
        self.get_or_create_concept(
            &ConceptDefinition::new(ENTITY_CONCEPT_IRI)
                .parent(ROOT_CONCEPT_IRI)
                .display_name("Entity"),
            &system,
            &public,
        )?;
        let top = self.get_or_create_relationship(
            &RelationshipDefinition::new(TOP_RELATIONSHIP_IRI),
            &system,
            &public,
        )?;
        if top.core.user_visible {
            self.update_element(
                ElementKind::Relationship,
                TOP_RELATIONSHIP_IRI,
                ElementUpdate::UserVisible(false),
                &system,
                &public,
            )?;
        }
        tracing::debug!("well-known schema elements present");
        Ok(())
    }

    /// Underlying element store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ElementStore> {
        &self.store
    }

    /// Authorization collaborator
    #[inline]
    #[must_use]
    pub fn authorization(&self) -> &Arc<dyn AuthorizationProvider> {
        &self.authorization
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    /// Per-scope snapshot cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub(crate) fn loader(&self) -> SchemaLoader<'_> {
        SchemaLoader::new(self.store.as_ref())
    }

    /// Uncached effective vertex of an element
    pub(crate) fn resolve(
        &self,
        kind: ElementKind,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<Option<VertexRecord>> {
        Ok(self.loader().resolve(kind, iri, scope)?)
    }

    /// Uncached effective vertex of an element that must exist
    pub(crate) fn require(&self, kind: ElementKind, iri: &str, scope: &Scope) -> OntologyResult<VertexRecord> {
        self.resolve(kind, iri, scope)?
            .ok_or_else(|| OntologyError::not_found(kind, iri))
    }

    /// Snapshot of the whole schema visible in `scope`
    ///
    /// # Errors
    /// Returns an error if the snapshot has to be built and a store read fails
    pub fn get_ontology(&self, scope: &Scope) -> OntologyResult<Arc<Ontology>> {
        let load = |scope: &Scope| -> OntologyResult<Ontology> { Ok(self.loader().ontology(scope)?) };
        self.cache.get_or_load(scope, &load)
    }

    /// Concept by IRI
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_concept_by_iri(&self, iri: &str, scope: &Scope) -> OntologyResult<Option<Concept>> {
        Ok(self.get_ontology(scope)?.concept(iri).cloned())
    }

    /// Relationship by IRI
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_relationship_by_iri(
        &self,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<Option<Relationship>> {
        Ok(self.get_ontology(scope)?.relationship(iri).cloned())
    }

    /// Property by IRI
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_property_by_iri(&self, iri: &str, scope: &Scope) -> OntologyResult<Option<Property>> {
        Ok(self.get_ontology(scope)?.property(iri).cloned())
    }

    /// Every concept, with the properties attached to each
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_concepts(&self, scope: &Scope) -> OntologyResult<Vec<Concept>> {
        Ok(self.get_ontology(scope)?.concepts().cloned().collect())
    }

    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_relationships(&self, scope: &Scope) -> OntologyResult<Vec<Relationship>> {
        Ok(self.get_ontology(scope)?.relationships().cloned().collect())
    }

    /// Aggregated properties, including table columns
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built
    pub fn get_properties(&self, scope: &Scope) -> OntologyResult<Vec<Property>> {
        Ok(self.get_ontology(scope)?.properties().cloned().collect())
    }

    /// The concept followed by every descendant
    ///
    /// # Errors
    /// Returns [`OntologyError::NotFound`] if the concept is not visible
    pub fn get_concept_and_all_children(&self, iri: &str, scope: &Scope) -> OntologyResult<Vec<Concept>> {
        let ontology = self.get_ontology(scope)?;
        let all = ontology.concept_and_all_children(iri);
        if all.is_empty() {
            return Err(OntologyError::not_found(ElementKind::Concept, iri));
        }
        Ok(all.into_iter().cloned().collect())
    }

    /// The relationship followed by every descendant
    ///
    /// # Errors
    /// Returns [`OntologyError::NotFound`] if the relationship is not visible
    pub fn get_relationship_and_all_children(
        &self,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<Vec<Relationship>> {
        let ontology = self.get_ontology(scope)?;
        let all = ontology.relationship_and_all_children(iri);
        if all.is_empty() {
            return Err(OntologyError::not_found(ElementKind::Relationship, iri));
        }
        Ok(all.into_iter().cloned().collect())
    }

    /// Ancestors of a concept, nearest first
    ///
    /// # Errors
    /// Returns [`OntologyError::NotFound`] if the concept is not visible
    pub fn get_concept_ancestors(&self, iri: &str, scope: &Scope) -> OntologyResult<Vec<Concept>> {
        let ontology = self.get_ontology(scope)?;
        if ontology.concept(iri).is_none() {
            return Err(OntologyError::not_found(ElementKind::Concept, iri));
        }
        Ok(ontology.concept_ancestors(iri).into_iter().cloned().collect())
    }

    /// Ancestors of a relationship, nearest first
    ///
    /// # Errors
    /// Returns [`OntologyError::NotFound`] if the relationship is not visible
    pub fn get_relationship_ancestors(
        &self,
        iri: &str,
        scope: &Scope,
    ) -> OntologyResult<Vec<Relationship>> {
        let ontology = self.get_ontology(scope)?;
        if ontology.relationship(iri).is_none() {
            return Err(OntologyError::not_found(ElementKind::Relationship, iri));
        }
        Ok(ontology
            .relationship_ancestors(iri)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Evict every cached snapshot
    pub fn clear_cache(&self) {
        tracing::trace!("snapshot cache cleared");
        self.cache.invalidate_all();
    }

    /// Evict the snapshot of one scope
    pub fn clear_cache_scope(&self, scope: &Scope) {
        tracing::trace!(%scope, "snapshot cache scope cleared");
        self.cache.invalidate(scope);
    }

    /// Deterministic IRI for a user-named element created in `scope`
    #[must_use]
    pub fn generate_dynamic_iri(
        &self,
        kind: ElementKind,
        display_name: &str,
        scope: &Scope,
        extra: &[&str],
    ) -> Iri {
        generate_dynamic_iri(kind, display_name, scope.tag(), extra)
    }

    /// Documents recorded on the root concept, in import order
    ///
    /// # Errors
    /// Returns an error if the root concept cannot be read
    pub fn stored_documents(&self) -> OntologyResult<Vec<StoredDocument>> {
        let root = self.require(ElementKind::Concept, ROOT_CONCEPT_IRI, &Scope::Public)?;
        let mut documents: Vec<StoredDocument> = root
            .entries(keys::ONTOLOGY_FILE)
            .filter_map(|entry| {
                Some(StoredDocument {
                    ordinal: entry.key.parse().ok()?,
                    iri: entry.metadata.get(keys::DOCUMENT_IRI)?.clone(),
                    hash: entry.metadata.get(keys::ONTOLOGY_FILE_HASH)?.clone(),
                    bytes: entry.value.as_bytes()?.to_vec(),
                })
            })
            .collect();
        documents.sort_by_key(|d| d.ordinal);
        Ok(documents)
    }

    /// Hash recorded for a document, if it was imported before
    ///
    /// # Errors
    /// Returns an error if the root concept cannot be read
    pub fn stored_document_hash(&self, document_iri: &str) -> OntologyResult<Option<String>> {
        Ok(self
            .stored_documents()?
            .into_iter()
            .find(|d| d.iri == document_iri)
            .map(|d| d.hash))
    }

    /// Record a successfully imported document on the root concept
    ///
    /// A document imported again keeps its ordinal; a new one is appended.
    ///
    /// # Errors
    /// - [`OntologyError::AccessDenied`] if the user may not change the public schema
    /// - any error writing the root concept
    pub fn record_document(
        &self,
        document_iri: &str,
        bytes: &[u8],
        hash: &str,
        user: &User,
    ) -> OntologyResult<()> {
        authorize(self.authorization.as_ref(), user, Operation::Write, &Scope::Public)?;
        let root = self.require(ElementKind::Concept, ROOT_CONCEPT_IRI, &Scope::Public)?;
        let documents = self.stored_documents()?;
        let ordinal = documents
            .iter()
            .find(|d| d.iri == document_iri)
            .map_or_else(
                || documents.iter().map(|d| d.ordinal + 1).max().unwrap_or(0),
                |d| d.ordinal,
            );
        let entry = PropertyEntry::new(keys::ONTOLOGY_FILE, PropertyValue::Bytes(bytes.to_vec()))
            .with_key(format!("{ordinal:06}"))
            .with_metadata(keys::DOCUMENT_IRI, document_iri)
            .with_metadata(keys::ONTOLOGY_FILE_HASH, hash);
        self.store.set_property(&root.id, entry)?;
        self.store.flush()?;
        tracing::debug!(document = document_iri, ordinal, "document recorded");
        Ok(())
    }
}
