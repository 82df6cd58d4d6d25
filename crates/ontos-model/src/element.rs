//! In-memory schema elements
//!
//! [`Concept`], [`Relationship`] and [`Property`] share an [`ElementCore`]
//! with the attributes every schema element carries. [`SchemaElement`] is
//! the closed tagged union over the three kinds.
//!
//! Every element is materialized for a [`Scope`]; its [`SandboxStatus`] is
//! computed from the stored visibility and that scope on each call.

use crate::identity::{ElementId, ElementKind};
use crate::iri::Iri;
use crate::property_type::{PropertyType, TextIndexHint};
use crate::scope::{SandboxStatus, Scope, Visibility};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Attributes shared by every schema element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementCore {
    /// Storage identity
    pub id: ElementId,
    /// Global name
    pub iri: Iri,
    /// Human readable name
    pub display_name: Option<String>,
    /// Free-form intent tags
    pub intents: BTreeSet<String>,
    /// Formula producing the title of an instance
    pub title_formula: Option<String>,
    /// Formula producing the subtitle of an instance
    pub subtitle_formula: Option<String>,
    /// Formula producing the time display of an instance
    pub time_formula: Option<String>,
    /// Formula validating a value
    pub validation_formula: Option<String>,
    /// Formula rendering a value
    pub display_formula: Option<String>,
    pub user_visible: bool,
    pub searchable: bool,
    pub sortable: bool,
    pub addable: bool,
    pub updateable: bool,
    pub deleteable: bool,
    /// Ordering hint for display
    pub sort_priority: Option<i64>,
    pub display_type: Option<String>,
    pub property_group: Option<String>,
    /// Pass-through attributes with no dedicated field
    pub extra: BTreeMap<String, String>,
    /// Stored visibility of the element vertex
    pub visibility: Visibility,
    /// Scope the element was materialized for
    pub scope: Scope,
}

impl ElementCore {
    /// Create core attributes with default flags
    #[must_use]
    pub fn new(id: ElementId, iri: Iri, visibility: Visibility, scope: Scope) -> Self {
        Self {
            id,
            iri,
            display_name: None,
            intents: BTreeSet::new(),
            title_formula: None,
            subtitle_formula: None,
            time_formula: None,
            validation_formula: None,
            display_formula: None,
            user_visible: true,
            searchable: true,
            sortable: true,
            addable: true,
            updateable: true,
            deleteable: true,
            sort_priority: None,
            display_type: None,
            property_group: None,
            extra: BTreeMap::new(),
            visibility,
            scope,
        }
    }

    /// Sandbox status relative to the materialization scope
    #[inline]
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        self.visibility.sandbox_status(&self.scope)
    }

    /// Display name, falling back to the IRI's local name
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.iri.local_name())
    }

    /// Check for an intent tag
    #[inline]
    #[must_use]
    pub fn has_intent(&self, intent: &str) -> bool {
        self.intents.contains(intent)
    }
}

/// A vertex type in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub core: ElementCore,
    /// Parent concept; `None` only for the root concept
    pub parent_iri: Option<Iri>,
    pub glyph_icon: Option<Vec<u8>>,
    pub glyph_icon_selected: Option<Vec<u8>>,
    pub map_glyph_icon: Option<Vec<u8>>,
    pub color: Option<String>,
    /// Properties attached directly to this concept
    pub properties: BTreeSet<Iri>,
}

impl Concept {
    /// Create a concept with no attributes set
    #[must_use]
    pub fn new(core: ElementCore, parent_iri: Option<Iri>) -> Self {
        Self {
            core,
            parent_iri,
            glyph_icon: None,
            glyph_icon_selected: None,
            map_glyph_icon: None,
            color: None,
            properties: BTreeSet::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.core.iri
    }

    #[inline]
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        self.core.sandbox_status()
    }
}

/// An edge label in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub core: ElementCore,
    /// Parent relationship; `None` only for the top relationship
    pub parent_iri: Option<Iri>,
    /// Concepts an edge may start from, in declaration order
    pub domain_concept_iris: IndexSet<Iri>,
    /// Concepts an edge may end at, in declaration order
    pub range_concept_iris: IndexSet<Iri>,
    pub inverse_of_iris: BTreeSet<Iri>,
    /// Properties attached directly to this relationship
    pub properties: BTreeSet<Iri>,
}

impl Relationship {
    /// Create a relationship with no domain or range
    #[must_use]
    pub fn new(core: ElementCore, parent_iri: Option<Iri>) -> Self {
        Self {
            core,
            parent_iri,
            domain_concept_iris: IndexSet::new(),
            range_concept_iris: IndexSet::new(),
            inverse_of_iris: BTreeSet::new(),
            properties: BTreeSet::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.core.iri
    }

    #[inline]
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        self.core.sandbox_status()
    }

    /// Check if the concept is in the domain or range
    #[must_use]
    pub fn references_concept(&self, iri: &str) -> bool {
        self.domain_concept_iris.contains(iri) || self.range_concept_iris.contains(iri)
    }
}

/// Shape of a property's values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyShape {
    /// Ordinary scalar property
    Scalar,
    /// Value is a table; columns are themselves properties, in order
    ExtendedDataTable { column_iris: Vec<Iri> },
}

/// A property that concepts, relationships or tables may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub core: ElementCore,
    pub data_type: PropertyType,
    pub shape: PropertyShape,
    pub text_index_hints: BTreeSet<TextIndexHint>,
    /// Enumerated values: stored key to display label
    pub possible_values: Option<BTreeMap<String, String>>,
    /// Components of a composite value, in order
    pub dependent_property_iris: Vec<Iri>,
    pub boost: Option<f64>,
    /// Owning concepts, derived from attachment edges
    pub concept_iris: BTreeSet<Iri>,
    /// Owning relationships, derived from attachment edges
    pub relationship_iris: BTreeSet<Iri>,
    /// Owning extended data tables, derived from column edges
    pub extended_data_table_iris: BTreeSet<Iri>,
}

impl Property {
    /// Create a property of the given type with no owners
    #[must_use]
    pub fn new(core: ElementCore, data_type: PropertyType) -> Self {
        let shape = if data_type == PropertyType::ExtendedDataTable {
            PropertyShape::ExtendedDataTable {
                column_iris: Vec::new(),
            }
        } else {
            PropertyShape::Scalar
        };
        Self {
            core,
            data_type,
            shape,
            text_index_hints: BTreeSet::new(),
            possible_values: None,
            dependent_property_iris: Vec::new(),
            boost: None,
            concept_iris: BTreeSet::new(),
            relationship_iris: BTreeSet::new(),
            extended_data_table_iris: BTreeSet::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.core.iri
    }

    #[inline]
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        self.core.sandbox_status()
    }

    /// Check if this property is an extended data table
    #[inline]
    #[must_use]
    pub fn is_extended_data_table(&self) -> bool {
        matches!(self.shape, PropertyShape::ExtendedDataTable { .. })
    }

    /// Column properties of an extended data table
    #[must_use]
    pub fn table_column_iris(&self) -> Option<&[Iri]> {
        match &self.shape {
            PropertyShape::ExtendedDataTable { column_iris } => Some(column_iris),
            PropertyShape::Scalar => None,
        }
    }

    /// Number of concepts, relationships and tables owning this property
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.concept_iris.len() + self.relationship_iris.len() + self.extended_data_table_iris.len()
    }
}

/// Closed union over every schema element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaElement {
    Concept(Concept),
    Relationship(Relationship),
    Property(Property),
}

impl SchemaElement {
    /// Shared attributes
    #[must_use]
    pub fn core(&self) -> &ElementCore {
        match self {
            Self::Concept(c) => &c.core,
            Self::Relationship(r) => &r.core,
            Self::Property(p) => &p.core,
        }
    }

    /// Element kind
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Concept(_) => ElementKind::Concept,
            Self::Relationship(_) => ElementKind::Relationship,
            Self::Property(_) => ElementKind::Property,
        }
    }

    #[inline]
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.core().iri
    }

    #[inline]
    #[must_use]
    pub fn sandbox_status(&self) -> SandboxStatus {
        self.core().sandbox_status()
    }
}

impl From<Concept> for SchemaElement {
    fn from(value: Concept) -> Self {
        Self::Concept(value)
    }
}

impl From<Relationship> for SchemaElement {
    fn from(value: Relationship) -> Self {
        Self::Relationship(value)
    }
}

impl From<Property> for SchemaElement {
    fn from(value: Property) -> Self {
        Self::Property(value)
    }
}
