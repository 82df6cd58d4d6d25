//! Parsed schema document
//!
//! A [`SchemaDocument`] is the format-neutral shape every
//! [`DocumentParser`](crate::parsers::DocumentParser) produces. Field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A schema document: classes, object properties and data properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaDocument {
    /// Global document name; the caller may override it
    pub iri: String,
    /// Documents this one builds on
    pub imports: Vec<String>,
    /// Declared annotation properties
    pub annotation_properties: Vec<String>,
    pub classes: Vec<ClassDeclaration>,
    pub object_properties: Vec<ObjectPropertyDeclaration>,
    pub data_properties: Vec<DataPropertyDeclaration>,
}

impl SchemaDocument {
    #[must_use]
    pub fn class(&self, iri: &str) -> Option<&ClassDeclaration> {
        self.classes.iter().find(|c| c.iri == iri)
    }

    #[must_use]
    pub fn object_property(&self, iri: &str) -> Option<&ObjectPropertyDeclaration> {
        self.object_properties.iter().find(|p| p.iri == iri)
    }

    #[must_use]
    pub fn data_property(&self, iri: &str) -> Option<&DataPropertyDeclaration> {
        self.data_properties.iter().find(|p| p.iri == iri)
    }

    /// Number of declarations of every kind
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.classes.len() + self.object_properties.len() + self.data_properties.len()
    }
}

/// Class declaration, imported as a concept
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassDeclaration {
    pub iri: String,
    pub super_classes: Vec<String>,
    pub annotations: Vec<Annotation>,
}

/// Object property declaration, imported as a relationship
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPropertyDeclaration {
    pub iri: String,
    pub super_properties: Vec<String>,
    pub domain: Vec<String>,
    pub range: Vec<String>,
    pub inverse_of: Vec<String>,
    pub annotations: Vec<Annotation>,
}

/// Data property declaration, imported as a property
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataPropertyDeclaration {
    pub iri: String,
    /// Owning classes, object properties or extended data tables
    pub domain: Vec<String>,
    /// Datatype IRI; absent means string
    pub range: Option<String>,
    pub annotations: Vec<Annotation>,
}

/// Annotation assertion on a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub property: String,
    pub value: AnnotationValue,
}

impl Annotation {
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Value of an annotation: an IRI reference or a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Iri { iri: String },
    Literal(Literal),
}

impl AnnotationValue {
    /// Lexical form of the value
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Self::Iri { iri } => iri.clone(),
            Self::Literal(literal) => literal.to_string(),
        }
    }

    /// Boolean value, accepting the lexical forms `true` and `false`
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Bool(b)) => Some(*b),
            Self::Literal(Literal::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Literal(Literal::Integer(i)) => Some(*i),
            Self::Literal(Literal::Text(text)) => text.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Literal(Literal::Float(f)) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Literal(Literal::Integer(i)) => Some(*i as f64),
            Self::Literal(Literal::Text(text)) => text.trim().parse().ok(),
            Self::Iri { .. } | Self::Literal(Literal::Bool(_)) => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::Literal(Literal::Text(value.to_string()))
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }
}

/// Literal annotation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
