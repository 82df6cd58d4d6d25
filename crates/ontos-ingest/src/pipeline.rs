//! Phased document import
//!
//! [`OntologyImporter`] turns a [`SchemaDocument`] into schema elements in
//! five phases, clearing the snapshot cache after each so later phases see
//! what earlier ones created:
//!
//! 1. annotation-property declarations ([`ImportHooks`])
//! 2. classes as concepts, super classes first
//! 3. object properties as relationships, super properties first
//! 4. inverse-of links between relationships
//! 5. data properties: extended data tables, then everything else with
//!    dependent properties before the composites that name them
//!
//! Public imports are recorded on the root concept once every phase has
//! succeeded, and a public import whose content hash matches the recorded one
//! is skipped. Workspace imports always run and are never recorded.

use crate::annotations::{dependent_iris, interpret, Directive};
use crate::document::{
    Annotation, ClassDeclaration, DataPropertyDeclaration, ObjectPropertyDeclaration, SchemaDocument,
};
use crate::error::{IngestError, IngestResult};
use crate::lock::NamedLocks;
use crate::parsers::{DocumentParser, ParserRegistry};
use ontos_engine::privilege::{authorize, Operation};
use ontos_engine::{
    ConceptDefinition, OntologyRepository, PropertyDefinition, RelationshipDefinition, StoredDocument,
    User,
};
use ontos_model::{
    ElementKind, Iri, Property, PropertyType, Scope, ENTITY_CONCEPT_IRI, ROOT_CONCEPT_IRI,
};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

/// Extension points called during import
pub trait ImportHooks: Send + Sync + Debug {
    /// Called once per declared annotation property, before any class
    ///
    /// # Errors
    /// An error aborts the import
    fn on_annotation_property(&self, _iri: &str, _context: &ImportContext<'_>) -> IngestResult<()> {
        Ok(())
    }
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl ImportHooks for DefaultHooks {}

/// Where and as whom a document is imported
#[derive(Debug, Clone, Copy)]
pub struct ImportContext<'a> {
    /// Repository receiving the declarations
    pub repository: &'a OntologyRepository,
    /// Acting user of every schema change
    pub user: &'a User,
    /// Public, or the workspace the import is private to
    pub scope: &'a Scope,
    /// Directory icon file names resolve against
    pub resource_dir: Option<&'a Path>,
}

/// Counts of elements a successful import declared
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Name the document was imported under
    pub document_iri: String,
    /// Hex SHA-256 of the document bytes
    pub hash: String,
    /// Declared classes
    pub concepts: usize,
    /// Declared object properties
    pub relationships: usize,
    /// Declared data properties
    pub properties: usize,
}

/// Result of importing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(ImportSummary),
    /// Content hash matched the recorded one
    Unchanged { document_iri: String },
}

impl ImportOutcome {
    #[must_use]
    pub fn document_iri(&self) -> &str {
        match self {
            Self::Imported(summary) => &summary.document_iri,
            Self::Unchanged { document_iri } => document_iri,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }
}

/// Imports schema documents into a repository
#[derive(Debug)]
pub struct OntologyImporter {
    repository: Arc<OntologyRepository>,
    parsers: ParserRegistry,
    hooks: Box<dyn ImportHooks>,
}

impl OntologyImporter {
    /// Create importer with the default parsers and hooks
    #[must_use]
    pub fn new(repository: Arc<OntologyRepository>) -> Self {
        Self {
            repository,
            parsers: ParserRegistry::default(),
            hooks: Box::new(DefaultHooks),
        }
    }

    /// Replace the import hooks
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl ImportHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Register an additional parser
    #[must_use]
    pub fn with_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.parsers.register(parser);
        self
    }

    #[inline]
    #[must_use]
    pub fn repository(&self) -> &Arc<OntologyRepository> {
        &self.repository
    }

    #[inline]
    #[must_use]
    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// Documents imported so far, in import order
    ///
    /// # Errors
    /// Returns an error if the records cannot be read
    pub fn stored_documents(&self) -> IngestResult<Vec<StoredDocument>> {
        Ok(self.repository.stored_documents()?)
    }

    /// Import every configured document in public scope
    ///
    /// Holds the configured import lock for the whole run. Documents without
    /// an explicit resource directory resolve icons next to the document.
    ///
    /// # Errors
    /// Stops at the first document that fails
    pub fn load_configured(&self, user: &User) -> IngestResult<Vec<ImportOutcome>> {
        let import = &self.repository.config().import;
        NamedLocks::global().with_lock(&import.lock_name, || {
            import
                .documents
                .iter()
                .map(|source| {
                    let resource_dir = import.resource_dir.as_deref().or_else(|| source.path.parent());
                    self.import_file(&source.path, Some(&source.iri), resource_dir, user, &Scope::Public)
                })
                .collect()
        })
    }

    /// Read, parse and import a document file
    ///
    /// The parser is chosen by extension. Without an explicit resource
    /// directory, icons resolve next to the document.
    ///
    /// # Errors
    /// - [`IngestError::NoParser`] for an unknown extension
    /// - [`IngestError::Resource`] if the file cannot be read
    /// - anything [`import_document`](Self::import_document) returns
    pub fn import_file(
        &self,
        path: &Path,
        document_iri: Option<&str>,
        resource_dir: Option<&Path>,
        user: &User,
        scope: &Scope,
    ) -> IngestResult<ImportOutcome> {
        let parser = self
            .parsers
            .find_for_path(path)
            .ok_or_else(|| IngestError::NoParser(path.to_path_buf()))?;
        let bytes = std::fs::read(path).map_err(|e| IngestError::resource(path, e))?;
        let resource_dir = resource_dir.or_else(|| path.parent());
        self.import_document(&bytes, parser, document_iri, resource_dir, user, scope)
    }

    /// Parse and import document bytes
    ///
    /// `document_iri` overrides the name the document gives itself.
    ///
    /// # Errors
    /// - [`IngestError::Ontology`] wrapping access denied if the user may not
    ///   write to the scope
    /// - [`IngestError::Parse`] for malformed input
    /// - [`IngestError::MissingDocumentIri`] if the document has no name
    /// - [`IngestError::MultipleSuperTypes`] or [`IngestError::Cycle`] for
    ///   unsupported declaration structure
    /// - [`IngestError::Ontology`] if the schema engine rejects a change
    pub fn import_document(
        &self,
        bytes: &[u8],
        parser: &dyn DocumentParser,
        document_iri: Option<&str>,
        resource_dir: Option<&Path>,
        user: &User,
        scope: &Scope,
    ) -> IngestResult<ImportOutcome> {
        authorize(self.repository.authorization().as_ref(), user, Operation::Write, scope)?;
        let hash = hex::encode(Sha256::digest(bytes));
        let document = parser.parse(bytes)?;
        let document_iri = match document_iri {
            Some(iri) => iri.to_string(),
            None if !document.iri.is_empty() => document.iri.clone(),
            None => return Err(IngestError::MissingDocumentIri),
        };

        if scope.is_public()
            && self.repository.stored_document_hash(&document_iri)?.as_deref() == Some(hash.as_str())
        {
            tracing::info!(document = %document_iri, "document unchanged, skipping import");
            return Ok(ImportOutcome::Unchanged { document_iri });
        }
        tracing::info!(
            document = %document_iri,
            declarations = document.declaration_count(),
            %scope,
            "importing document"
        );

        let context = ImportContext {
            repository: &self.repository,
            user,
            scope,
            resource_dir,
        };
        let mut run = ImportRun::new(context, &document);
        run.annotation_properties(self.hooks.as_ref())?;
        run.classes()?;
        run.object_properties()?;
        run.inverses()?;
        run.data_properties()?;

        if scope.is_public() {
            self.repository.record_document(&document_iri, bytes, &hash, user)?;
        }
        self.repository.clear_cache();
        let summary = ImportSummary {
            document_iri,
            hash,
            concepts: run.classes.count(),
            relationships: run.relationships.count(),
            properties: run.properties.count(),
        };
        tracing::info!(
            document = %summary.document_iri,
            concepts = summary.concepts,
            relationships = summary.relationships,
            properties = summary.properties,
            "document imported"
        );
        Ok(ImportOutcome::Imported(summary))
    }
}

/// Declarations of one kind already imported or in progress
#[derive(Debug, Default)]
struct Progress {
    visiting: HashSet<String>,
    done: HashSet<String>,
}

impl Progress {
    /// `Ok(false)` if already imported; `Cycle` if `iri` is on the current chain
    fn begin(&mut self, iri: &str) -> IngestResult<bool> {
        if self.done.contains(iri) {
            return Ok(false);
        }
        if !self.visiting.insert(iri.to_string()) {
            return Err(IngestError::Cycle(iri.to_string()));
        }
        Ok(true)
    }

    fn finish(&mut self, iri: &str) {
        self.visiting.remove(iri);
        self.done.insert(iri.to_string());
    }

    fn count(&self) -> usize {
        self.done.len()
    }
}

/// State of one document import
struct ImportRun<'a> {
    context: ImportContext<'a>,
    document: &'a SchemaDocument,
    classes: Progress,
    relationships: Progress,
    properties: Progress,
}

impl<'a> ImportRun<'a> {
    fn new(context: ImportContext<'a>, document: &'a SchemaDocument) -> Self {
        Self {
            context,
            document,
            classes: Progress::default(),
            relationships: Progress::default(),
            properties: Progress::default(),
        }
    }

    fn repository(&self) -> &'a OntologyRepository {
        self.context.repository
    }

    fn annotation_properties(&mut self, hooks: &dyn ImportHooks) -> IngestResult<()> {
        for iri in &self.document.annotation_properties {
            hooks.on_annotation_property(iri, &self.context)?;
        }
        self.repository().clear_cache();
        Ok(())
    }

    fn classes(&mut self) -> IngestResult<()> {
        let document = self.document;
        for class in &document.classes {
            self.class(class)?;
        }
        self.repository().clear_cache();
        tracing::debug!(concepts = self.classes.count(), "classes imported");
        Ok(())
    }

    fn class(&mut self, class: &'a ClassDeclaration) -> IngestResult<()> {
        let iri = class.iri.as_str();
        if !self.classes.begin(iri)? {
            return Ok(());
        }
        let parent = match single_super(iri, &class.super_classes)? {
            Some(parent) => Some(parent),
            None if iri == ROOT_CONCEPT_IRI => None,
            None if iri == ENTITY_CONCEPT_IRI => Some(ROOT_CONCEPT_IRI),
            None => Some(ENTITY_CONCEPT_IRI),
        };
        let document = self.document;
        if let Some(declared) = parent.and_then(|p| document.class(p)) {
            self.class(declared)?;
        }

        let mut definition = ConceptDefinition::new(iri).purge_changeable(true);
        if let Some(parent) = parent {
            definition = definition.parent(parent);
        }
        let ImportContext { user, scope, .. } = self.context;
        self.repository().get_or_create_concept(&definition, user, scope)?;
        self.annotate(ElementKind::Concept, iri, &class.annotations)?;
        self.classes.finish(iri);
        Ok(())
    }

    fn object_properties(&mut self) -> IngestResult<()> {
        let document = self.document;
        for property in &document.object_properties {
            self.object_property(property)?;
        }
        self.repository().clear_cache();
        tracing::debug!(relationships = self.relationships.count(), "object properties imported");
        Ok(())
    }

    fn object_property(&mut self, property: &'a ObjectPropertyDeclaration) -> IngestResult<()> {
        let iri = property.iri.as_str();
        if !self.relationships.begin(iri)? {
            return Ok(());
        }
        let parent = single_super(iri, &property.super_properties)?;
        let document = self.document;
        if let Some(declared) = parent.and_then(|p| document.object_property(p)) {
            self.object_property(declared)?;
        }

        let mut definition = RelationshipDefinition::new(iri).purge_changeable(true);
        if let Some(parent) = parent {
            definition = definition.parent(parent);
        }
        for concept in self.known_concepts(iri, "domain", &property.domain)? {
            definition = definition.domain(concept);
        }
        for concept in self.known_concepts(iri, "range", &property.range)? {
            definition = definition.range(concept);
        }
        let ImportContext { user, scope, .. } = self.context;
        self.repository().get_or_create_relationship(&definition, user, scope)?;
        self.annotate(ElementKind::Relationship, iri, &property.annotations)?;
        self.relationships.finish(iri);
        Ok(())
    }

    /// Concepts among `iris` visible in scope; the rest are logged and skipped
    fn known_concepts(&self, owner: &str, role: &str, iris: &[String]) -> IngestResult<Vec<Iri>> {
        let ontology = self.repository().get_ontology(self.context.scope)?;
        Ok(iris
            .iter()
            .filter(|iri| {
                let known = ontology.concept(iri).is_some();
                if !known {
                    tracing::warn!(relationship = owner, role, concept = %iri, "skipping unresolved concept");
                }
                known
            })
            .map(Iri::new)
            .collect())
    }

    fn inverses(&mut self) -> IngestResult<()> {
        let ImportContext { user, scope, .. } = self.context;
        let ontology = self.repository().get_ontology(scope)?;
        for property in &self.document.object_properties {
            for inverse in &property.inverse_of {
                if ontology.relationship(&property.iri).is_none() || ontology.relationship(inverse).is_none() {
                    tracing::warn!(relationship = %property.iri, inverse = %inverse, "skipping unresolved inverse");
                    continue;
                }
                self.repository()
                    .add_inverse_of(&property.iri, inverse, user, scope)?;
            }
        }
        self.repository().clear_cache();
        Ok(())
    }

    fn data_properties(&mut self) -> IngestResult<()> {
        let document = self.document;
        for table in document
            .data_properties
            .iter()
            .filter(|p| p.range.as_deref() == Some(ontos_model::EXTENDED_DATA_TABLE_IRI))
        {
            self.data_property(table)?;
        }
        self.repository().clear_cache();

        for property in &document.data_properties {
            self.data_property(property)?;
        }
        self.repository().clear_cache();
        tracing::debug!(properties = self.properties.count(), "data properties imported");
        Ok(())
    }

    fn data_property(&mut self, property: &'a DataPropertyDeclaration) -> IngestResult<()> {
        let iri = property.iri.as_str();
        if !self.properties.begin(iri)? {
            return Ok(());
        }
        let data_type = data_type(property)?;
        let dependents = dependent_iris(&property.annotations);
        let document = self.document;
        for dependent in &dependents {
            if let Some(declared) = document.data_property(dependent.as_str()) {
                self.data_property(declared)?;
            }
        }

        let mut definition = PropertyDefinition::new(iri, data_type).purge_changeable(true);
        let ontology = self.repository().get_ontology(self.context.scope)?;
        for owner in &property.domain {
            let owner = owner.as_str();
            if ontology.concept(owner).is_some() {
                definition = definition.concept(owner);
            } else if ontology.relationship(owner).is_some() {
                definition = definition.relationship(owner);
            } else if ontology.property(owner).is_some_and(Property::is_extended_data_table) {
                definition = definition.table(owner);
            } else {
                tracing::warn!(property = iri, owner, "skipping unresolved owner");
            }
        }
        for dependent in dependents {
            definition = definition.dependent(dependent);
        }
        let ImportContext { user, scope, .. } = self.context;
        self.repository().get_or_create_property(&definition, user, scope)?;
        self.annotate(ElementKind::Property, iri, &property.annotations)?;
        self.properties.finish(iri);
        Ok(())
    }

    fn annotate(&self, kind: ElementKind, iri: &str, annotations: &[Annotation]) -> IngestResult<()> {
        let ImportContext { user, scope, .. } = self.context;
        let repository = self.repository();
        for annotation in annotations {
            match interpret(iri, kind, annotation)? {
                Directive::Update(update) => repository.update_element(kind, iri, update, user, scope)?,
                Directive::Intent(intent) => repository.add_intent(kind, iri, &intent, user, scope)?,
                Directive::Icon { slot, file_name } => {
                    if let Some(bytes) = self.icon(iri, &file_name)? {
                        repository.update_element(kind, iri, slot.update(bytes), user, scope)?;
                    }
                }
                Directive::Dependent(_) => {}
            }
        }
        Ok(())
    }

    /// Icon bytes, or `None` if the file is missing
    fn icon(&self, iri: &str, file_name: &str) -> IngestResult<Option<Vec<u8>>> {
        let Some(dir) = self.context.resource_dir else {
            tracing::warn!(element = iri, file_name, "no resource directory, icon skipped");
            return Ok(None);
        };
        let path = dir.join(file_name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(element = iri, path = %path.display(), "icon file missing");
                Ok(None)
            }
            Err(e) => Err(IngestError::resource(path, e)),
        }
    }
}

fn single_super<'s>(iri: &str, supers: &'s [String]) -> IngestResult<Option<&'s str>> {
    match supers {
        [] => Ok(None),
        [one] => Ok(Some(one.as_str())),
        many => Err(IngestError::MultipleSuperTypes {
            iri: iri.to_string(),
            count: many.len(),
        }),
    }
}

fn data_type(property: &DataPropertyDeclaration) -> IngestResult<PropertyType> {
    match &property.range {
        None => Ok(PropertyType::String),
        Some(range) => PropertyType::from_datatype_iri(range).ok_or_else(|| IngestError::UnknownDataType {
            iri: property.iri.clone(),
            range: range.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_detects_cycles() {
        let mut progress = Progress::default();
        assert!(progress.begin("a").unwrap());
        assert!(progress.begin("b").unwrap());
        assert!(matches!(progress.begin("a"), Err(IngestError::Cycle(iri)) if iri == "a"));
        progress.finish("b");
        assert!(!progress.begin("b").unwrap());
        assert_eq!(progress.count(), 1);
    }

    #[test]
    fn at_most_one_super_type() {
        let supers = vec!["http://x#a".to_string(), "http://x#b".to_string()];
        assert!(single_super("http://x#c", &[]).unwrap().is_none());
        assert_eq!(single_super("http://x#c", &supers[..1]).unwrap(), Some("http://x#a"));
        assert!(matches!(
            single_super("http://x#c", &supers),
            Err(IngestError::MultipleSuperTypes { count: 2, .. })
        ));
    }

    #[test]
    fn missing_range_means_string() {
        let mut property = DataPropertyDeclaration {
            iri: "http://x#p".to_string(),
            ..DataPropertyDeclaration::default()
        };
        assert_eq!(data_type(&property).unwrap(), PropertyType::String);
        property.range = Some("http://x#mystery".to_string());
        assert!(matches!(data_type(&property), Err(IngestError::UnknownDataType { .. })));
    }
}
