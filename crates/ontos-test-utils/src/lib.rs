//! Testing utilities for the Ontos workspace
//!
//! Shared fixtures: a repository over an in-memory store with a standard
//! set of users, plus helpers for declaring elements and graph data.

#![allow(missing_docs)]

use ontos_engine::{
    ConceptDefinition, OntologyConfig, OntologyRepository, Privilege, PropertyDefinition,
    RelationshipDefinition, StaticAuthorization, User,
};
use ontos_model::{
    Concept, ElementId, Property, PropertyType, Relationship, Scope, Visibility, WorkspaceId,
    ENTITY_CONCEPT_IRI,
};
use ontos_store::{MemoryStore, PropertyEntry};
use std::sync::Arc;

/// Workspace every fixture user can write to
pub const WORKSPACE: &str = "w1";

/// Second workspace, for isolation checks
pub const OTHER_WORKSPACE: &str = "w2";

/// Holds ADD and write access to both workspaces
pub const EDITOR: &str = "editor";

/// Holds PUBLISH
pub const PUBLISHER: &str = "publisher";

/// Holds ADD and ADMIN and write access to both workspaces
pub const ADMIN: &str = "admin";

/// Holds nothing
pub const READER: &str = "reader";

/// Repository plus direct handle on its store
#[derive(Debug)]
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub authorization: Arc<StaticAuthorization>,
    pub repo: Arc<OntologyRepository>,
}

impl Fixture {
    /// Workspace scope of [`WORKSPACE`]
    pub fn workspace(&self) -> Scope {
        Scope::workspace(WORKSPACE)
    }

    /// Add a data vertex typed by a concept
    pub fn add_instance(&self, id: &str, concept_iri: &str, scope: &Scope) -> ElementId {
        let id = ElementId::raw(id);
        let entry = PropertyEntry::new(ontos_engine::schema::keys::CONCEPT_TYPE, concept_iri)
            .with_visibility(scope.visibility());
        self.store
            .insert_data_vertex(&id, vec![entry], &scope.visibility())
            .unwrap();
        id
    }

    /// Create a concept under `parent` as the system user
    pub fn concept(&self, iri: &str, parent: &str, scope: &Scope) -> Concept {
        self.repo
            .get_or_create_concept(
                &ConceptDefinition::new(iri).parent(parent),
                &User::system(),
                scope,
            )
            .unwrap()
    }

    /// Create a relationship as the system user
    pub fn relationship(&self, iri: &str, domain: &str, range: &str, scope: &Scope) -> Relationship {
        self.repo
            .get_or_create_relationship(
                &RelationshipDefinition::new(iri).domain(domain).range(range),
                &User::system(),
                scope,
            )
            .unwrap()
    }

    /// Create a string property attached to the given concepts as the system user
    pub fn property(&self, iri: &str, concepts: &[&str], scope: &Scope) -> Property {
        let definition = concepts
            .iter()
            .fold(PropertyDefinition::new(iri, PropertyType::String), |d, c| d.concept(*c));
        self.repo
            .get_or_create_property(&definition, &User::system(), scope)
            .unwrap()
    }
}

/// Authorization table with the fixture users
pub fn authorization() -> StaticAuthorization {
    StaticAuthorization::new()
        .with_privileges(EDITOR, [Privilege::Add])
        .with_workspace_write(EDITOR, WORKSPACE)
        .with_workspace_write(EDITOR, OTHER_WORKSPACE)
        .with_privileges(PUBLISHER, [Privilege::Publish])
        .with_privileges(ADMIN, [Privilege::Add, Privilege::Admin])
        .with_workspace_write(ADMIN, WORKSPACE)
        .with_workspace_write(ADMIN, OTHER_WORKSPACE)
}

/// Fresh repository over an empty in-memory store
pub fn fixture() -> Fixture {
    fixture_with_config(OntologyConfig::default())
}

pub fn fixture_with_config(config: OntologyConfig) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let authorization = Arc::new(authorization());
    let repo = Arc::new(OntologyRepository::open(store.clone(), authorization.clone(), config).unwrap());
    Fixture {
        store,
        authorization,
        repo,
    }
}

/// Fixture with a public `person` concept under ENTITY
pub fn fixture_with_person() -> Fixture {
    let fixture = fixture();
    fixture.concept(PERSON, ENTITY_CONCEPT_IRI, &Scope::Public);
    fixture
}

pub const PERSON: &str = "http://example.org/test#person";
pub const PLACE: &str = "http://example.org/test#place";
pub const KNOWS: &str = "http://example.org/test#knows";
pub const NAME: &str = "http://example.org/test#name";

pub fn user(id: &str) -> User {
    User::new(id)
}

pub fn workspace_id(id: &str) -> WorkspaceId {
    WorkspaceId::new(id)
}

pub fn private_to(id: &str) -> Visibility {
    Visibility::workspace(WorkspaceId::new(id))
}

/// Minimal JSON schema document exercising every declaration kind
pub const SAMPLE_DOCUMENT_JSON: &str = r##"{
  "iri": "http://example.org/sample",
  "classes": [
    {
      "iri": "http://example.org/sample#person",
      "superClasses": ["http://visallo.org#entity"],
      "annotations": [
        { "property": "http://www.w3.org/2000/01/rdf-schema#label", "value": "Person" },
        { "property": "http://visallo.org#intent", "value": "person" },
        { "property": "http://visallo.org#color", "value": "rgb(28, 137, 28)" }
      ]
    },
    {
      "iri": "http://example.org/sample#employee",
      "superClasses": ["http://example.org/sample#person"],
      "annotations": [
        { "property": "http://www.w3.org/2000/01/rdf-schema#label", "value": "Employee" }
      ]
    },
    {
      "iri": "http://example.org/sample#company",
      "superClasses": ["http://visallo.org#entity"]
    }
  ],
  "objectProperties": [
    {
      "iri": "http://example.org/sample#worksFor",
      "domain": ["http://example.org/sample#person"],
      "range": ["http://example.org/sample#company"],
      "annotations": [
        { "property": "http://www.w3.org/2000/01/rdf-schema#label", "value": "Works For" }
      ]
    },
    {
      "iri": "http://example.org/sample#employs",
      "domain": ["http://example.org/sample#company"],
      "range": ["http://example.org/sample#person"],
      "inverseOf": ["http://example.org/sample#worksFor"]
    }
  ],
  "dataProperties": [
    {
      "iri": "http://example.org/sample#name",
      "domain": ["http://example.org/sample#person", "http://example.org/sample#company"],
      "range": "http://www.w3.org/2001/XMLSchema#string",
      "annotations": [
        { "property": "http://visallo.org#textIndexHints", "value": "ALL" },
        { "property": "http://www.w3.org/2000/01/rdf-schema#label", "value": "Name" }
      ]
    },
    {
      "iri": "http://example.org/sample#phones",
      "domain": ["http://example.org/sample#person"],
      "range": "http://visallo.org#extendedDataTable"
    },
    {
      "iri": "http://example.org/sample#phoneNumber",
      "domain": ["http://example.org/sample#phones"],
      "range": "http://www.w3.org/2001/XMLSchema#string"
    },
    {
      "iri": "http://example.org/sample#since",
      "domain": ["http://example.org/sample#worksFor"],
      "range": "http://www.w3.org/2001/XMLSchema#dateTime"
    }
  ]
}"##;
