//! Publish and cascading delete

use ontos_engine::prelude::*;
use ontos_model::{ElementId, PropertyType, SandboxStatus, Scope, ENTITY_CONCEPT_IRI};
use ontos_store::{ElementStore, PropertyEntry, VertexKind};
use ontos_test_utils::{
    fixture_with_person, private_to, user, workspace_id, Fixture, ADMIN, EDITOR, OTHER_WORKSPACE,
    PERSON, PLACE, PUBLISHER, WORKSPACE,
};
use pretty_assertions::assert_eq;

const CITY: &str = "http://example.org/test#city";
const VISITED: &str = "http://example.org/test#visited";
const POPULATION: &str = "http://example.org/test#population";
const LABEL: &str = "http://example.org/test#label";

fn private_place(f: &Fixture) {
    f.repo
        .get_or_create_concept(
            &ConceptDefinition::new(PLACE).parent(ENTITY_CONCEPT_IRI),
            &user(EDITOR),
            &f.workspace(),
        )
        .unwrap();
}

#[test]
fn publish_requires_privilege() {
    let f = fixture_with_person();
    private_place(&f);
    let err = f
        .repo
        .publish_concept(PLACE, &user(EDITOR), &workspace_id(WORKSPACE))
        .unwrap_err();
    assert!(err.is_access_denied());
}

#[test]
fn published_concept_is_visible_everywhere() {
    let f = fixture_with_person();
    private_place(&f);
    assert!(f.repo.get_concept_by_iri(PLACE, &Scope::Public).unwrap().is_none());

    f.repo
        .publish_concept(PLACE, &user(PUBLISHER), &workspace_id(WORKSPACE))
        .unwrap();
    f.repo.clear_cache();

    let public = f.repo.get_concept_by_iri(PLACE, &Scope::Public).unwrap().unwrap();
    assert_eq!(public.sandbox_status(), SandboxStatus::Public);
    assert_eq!(public.parent_iri.as_ref().map(|p| p.as_str()), Some(ENTITY_CONCEPT_IRI));

    let sibling = f
        .repo
        .get_concept_by_iri(PLACE, &Scope::workspace(OTHER_WORKSPACE))
        .unwrap()
        .unwrap();
    assert_eq!(sibling.sandbox_status(), SandboxStatus::Public);
    let own = f.repo.get_concept_by_iri(PLACE, &f.workspace()).unwrap().unwrap();
    assert_eq!(own.sandbox_status(), SandboxStatus::Public);
}

#[test]
fn publishing_twice_is_a_no_op() {
    let f = fixture_with_person();
    private_place(&f);
    let ws = workspace_id(WORKSPACE);
    f.repo.publish_concept(PLACE, &user(PUBLISHER), &ws).unwrap();
    let vertices = f.store.vertex_count();
    let edges = f.store.edge_count();

    f.repo.publish_concept(PLACE, &user(PUBLISHER), &ws).unwrap();
    assert_eq!(f.store.vertex_count(), vertices);
    assert_eq!(f.store.edge_count(), edges);
}

#[test]
fn publish_drops_workspace_link() {
    let f = fixture_with_person();
    private_place(&f);
    let before = f.store.edge_count();
    f.repo
        .publish_concept(PLACE, &user(PUBLISHER), &workspace_id(WORKSPACE))
        .unwrap();
    assert_eq!(f.store.edge_count(), before - 1);
}

#[test]
fn publish_does_not_cascade_to_properties() {
    let f = fixture_with_person();
    private_place(&f);
    let scope = f.workspace();
    f.repo
        .get_or_create_property(
            &PropertyDefinition::new(POPULATION, PropertyType::Integer).concept(PLACE),
            &user(EDITOR),
            &scope,
        )
        .unwrap();
    let ws = workspace_id(WORKSPACE);
    f.repo.publish_concept(PLACE, &user(PUBLISHER), &ws).unwrap();
    f.repo.clear_cache();

    let place = f.repo.get_concept_by_iri(PLACE, &Scope::Public).unwrap().unwrap();
    assert!(place.properties.is_empty());
    assert!(f.repo.get_property_by_iri(POPULATION, &Scope::Public).unwrap().is_none());
    let private = f.repo.get_property_by_iri(POPULATION, &scope).unwrap().unwrap();
    assert_eq!(private.sandbox_status(), SandboxStatus::Private);

    f.repo.publish_property(POPULATION, &user(PUBLISHER), &ws).unwrap();
    f.repo.clear_cache();
    let place = f.repo.get_concept_by_iri(PLACE, &Scope::Public).unwrap().unwrap();
    assert!(place.properties.contains(POPULATION));
    let population = f.repo.get_property_by_iri(POPULATION, &Scope::Public).unwrap().unwrap();
    assert_eq!(population.data_type, PropertyType::Integer);
}

#[test]
fn second_workspace_cannot_publish_an_already_published_iri() {
    let f = fixture_with_person();
    let definition = ConceptDefinition::new(PLACE).parent(ENTITY_CONCEPT_IRI);
    for workspace in [WORKSPACE, OTHER_WORKSPACE] {
        f.repo
            .get_or_create_concept(&definition, &user(EDITOR), &Scope::workspace(workspace))
            .unwrap();
    }

    f.repo
        .publish_concept(PLACE, &user(PUBLISHER), &workspace_id(WORKSPACE))
        .unwrap();
    let err = f
        .repo
        .publish_concept(PLACE, &user(PUBLISHER), &workspace_id(OTHER_WORKSPACE))
        .unwrap_err();
    assert!(err.is_invariant_violation());

    let public = f
        .store
        .find_vertices(VertexKind::Concept, "iri", PLACE, &Scope::Public)
        .unwrap();
    assert_eq!(public.len(), 1);
    let sibling = f
        .repo
        .get_concept_by_iri(PLACE, &Scope::workspace(OTHER_WORKSPACE))
        .unwrap()
        .unwrap();
    assert_eq!(sibling.sandbox_status(), SandboxStatus::Private);
}

#[test]
fn publish_unknown_element_is_not_found() {
    let f = fixture_with_person();
    let err = f
        .repo
        .publish_relationship(VISITED, &user(PUBLISHER), &workspace_id(WORKSPACE))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_requires_admin_in_a_workspace() {
    let f = fixture_with_person();
    private_place(&f);
    let err = f
        .repo
        .delete_concept(PLACE, &user(EDITOR), &f.workspace())
        .unwrap_err();
    assert!(err.is_access_denied());
    let err = f
        .repo
        .delete_concept(PLACE, &user(ADMIN), &Scope::Public)
        .unwrap_err();
    assert!(err.is_access_denied());
    let err = f
        .repo
        .delete_concept(PLACE, &User::system(), &Scope::Public)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_published_concept_is_denied() {
    let f = fixture_with_person();
    let err = f
        .repo
        .delete_concept(PERSON, &user(ADMIN), &f.workspace())
        .unwrap_err();
    assert!(err.is_access_denied());
}

#[test]
fn delete_concept_with_children_fails() {
    let f = fixture_with_person();
    let scope = f.workspace();
    private_place(&f);
    f.concept(CITY, PLACE, &scope);
    let err = f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap_err();
    assert!(err.is_invariant_violation());

    f.repo.delete_concept(CITY, &user(ADMIN), &scope).unwrap();
    f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap();
    f.repo.clear_cache();
    assert!(f.repo.get_concept_by_iri(PLACE, &scope).unwrap().is_none());
}

#[test]
fn delete_concept_referenced_by_relationship_fails() {
    let f = fixture_with_person();
    let scope = f.workspace();
    private_place(&f);
    f.relationship(VISITED, PERSON, PLACE, &scope);
    let err = f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap_err();
    assert!(err.is_invariant_violation());

    f.repo.delete_relationship(VISITED, &user(ADMIN), &scope).unwrap();
    f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap();
}

#[test]
fn delete_concept_in_use_fails() {
    let f = fixture_with_person();
    let scope = f.workspace();
    private_place(&f);
    f.add_instance("v1", PLACE, &scope);
    let err = f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn delete_relationship_in_use_fails() {
    let f = fixture_with_person();
    let scope = f.workspace();
    private_place(&f);
    f.relationship(VISITED, PERSON, PLACE, &scope);
    let alice = f.add_instance("alice", PERSON, &scope);
    let paris = f.add_instance("paris", PLACE, &scope);
    f.store
        .insert_data_edge(&alice, VISITED, &paris, &private_to(WORKSPACE))
        .unwrap();
    let err = f
        .repo
        .delete_relationship(VISITED, &user(ADMIN), &scope)
        .unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn delete_property_in_use_fails() {
    let f = fixture_with_person();
    let scope = f.workspace();
    f.property(LABEL, &[PERSON], &scope);
    f.store
        .insert_data_vertex(
            &ElementId::raw("alice"),
            vec![PropertyEntry::new(LABEL, "Alice").with_visibility(private_to(WORKSPACE))],
            &private_to(WORKSPACE),
        )
        .unwrap();
    let err = f.repo.delete_property(LABEL, &user(ADMIN), &scope).unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn delete_concept_cascades_to_sole_owned_properties() {
    let f = fixture_with_person();
    let scope = f.workspace();
    private_place(&f);
    f.property(POPULATION, &[PLACE], &scope);
    let shared = f.property(LABEL, &[PLACE, PERSON], &scope);
    assert_eq!(shared.owner_count(), 2);

    f.repo.delete_concept(PLACE, &user(ADMIN), &scope).unwrap();
    f.repo.clear_cache();
    assert!(f.repo.get_property_by_iri(POPULATION, &scope).unwrap().is_none());
    let shared = f.repo.get_property_by_iri(LABEL, &scope).unwrap().unwrap();
    assert_eq!(shared.owner_count(), 1);
    assert!(shared.concept_iris.contains(PERSON));
}

#[test]
fn delete_table_cascades_to_columns() {
    let f = fixture_with_person();
    let scope = f.workspace();
    let editor = user(EDITOR);
    let table = "http://example.org/test#addresses";
    let column = "http://example.org/test#street";
    f.repo
        .get_or_create_property(
            &PropertyDefinition::new(table, PropertyType::ExtendedDataTable).concept(PERSON),
            &editor,
            &scope,
        )
        .unwrap();
    f.repo
        .get_or_create_property(
            &PropertyDefinition::new(column, PropertyType::String).table(table),
            &editor,
            &scope,
        )
        .unwrap();

    f.repo.delete_property(table, &user(ADMIN), &scope).unwrap();
    f.repo.clear_cache();
    assert!(f.repo.get_property_by_iri(table, &scope).unwrap().is_none());
    assert!(f.repo.get_property_by_iri(column, &scope).unwrap().is_none());
}

#[test]
fn workspaces_do_not_see_each_other() {
    let f = fixture_with_person();
    private_place(&f);
    let sibling = Scope::workspace(OTHER_WORKSPACE);
    assert!(f.repo.get_concept_by_iri(PLACE, &sibling).unwrap().is_none());
    let err = f.repo.delete_concept(PLACE, &user(ADMIN), &sibling).unwrap_err();
    assert!(err.is_not_found());
}
