//! Stored vertex, edge and property records

use ontos_model::{ElementId, ElementKind, Scope, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Kind of a stored vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Schema concept
    Concept,
    /// Schema relationship
    Relationship,
    /// Schema property
    Property,
    /// Workspace that sandboxed elements hang off
    Workspace,
    /// Ordinary graph data typed by the schema
    Data,
}

impl From<ElementKind> for VertexKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Concept => Self::Concept,
            ElementKind::Relationship => Self::Relationship,
            ElementKind::Property => Self::Property,
        }
    }
}

/// A stored property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl PropertyValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// String form used by value-matching queries
    #[must_use]
    pub fn match_key(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bytes(_) | Self::Json(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One stored value of a (possibly multi-valued) property
///
/// `(name, key)` identifies the value; single-valued properties use the
/// empty key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    pub key: String,
    pub value: PropertyValue,
    pub visibility: Visibility,
    pub metadata: BTreeMap<String, String>,
}

impl PropertyEntry {
    /// Single-valued public entry
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            key: String::new(),
            value: value.into(),
            visibility: Visibility::public(),
            metadata: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

/// Snapshot of a stored vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: ElementId,
    pub kind: VertexKind,
    pub visibility: Visibility,
    pub properties: Vec<PropertyEntry>,
}

impl VertexRecord {
    /// Create a vertex with no properties
    #[must_use]
    pub fn new(id: ElementId, kind: VertexKind, visibility: Visibility) -> Self {
        Self {
            id,
            kind,
            visibility,
            properties: Vec::new(),
        }
    }

    /// First value of a property
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Every entry of a property, in insertion order
    pub fn entries<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PropertyEntry> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }

    #[must_use]
    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(PropertyValue::as_str)
    }

    #[must_use]
    pub fn bool_value(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(PropertyValue::as_bool)
    }

    /// Copy with only the property values readable in `scope`
    #[must_use]
    pub fn visible_in(&self, scope: &Scope) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            visibility: self.visibility.clone(),
            properties: self
                .properties
                .iter()
                .filter(|p| p.visibility.is_visible_in(scope))
                .cloned()
                .collect(),
        }
    }
}

/// Identity of a stored edge
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Deterministic id for the edge `from -label-> to`
    #[must_use]
    pub fn between(from: &ElementId, label: &str, to: &ElementId) -> Self {
        Self(format!("{from}-{label}-{to}"))
    }

    #[inline]
    #[must_use]
    pub fn raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a stored edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub from: ElementId,
    pub to: ElementId,
    pub label: String,
    pub visibility: Visibility,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl EdgeRecord {
    /// New edge with a deterministic id
    #[must_use]
    pub fn new(from: ElementId, label: impl Into<String>, to: ElementId, visibility: Visibility) -> Self {
        let label = label.into();
        Self {
            id: EdgeId::between(&from, &label, &to),
            from,
            to,
            label,
            visibility,
            properties: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// The endpoint opposite `id`
    #[must_use]
    pub fn other_end(&self, id: &ElementId) -> &ElementId {
        if &self.from == id {
            &self.to
        } else {
            &self.from
        }
    }
}

/// Edge direction relative to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
    Both,
}

/// Bounded existence query over graph data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistenceQuery {
    /// Data vertices whose property `name` has one of `values`
    PropertyValueIn { name: String, values: Vec<String> },
    /// Data vertices or edges holding any value for `name`
    HasProperty { name: String },
    /// Data edges carrying `label`
    EdgeLabel { label: String },
}
