//! Inputs to create-or-get and update operations

use crate::schema::keys;
use ontos_model::{ElementKind, Iri, PropertyType, TextIndexHint};
use ontos_store::PropertyValue;
use std::collections::{BTreeMap, BTreeSet};

/// Declaration of a concept
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptDefinition {
    pub iri: Iri,
    /// Required for every concept except the root
    pub parent_iri: Option<Iri>,
    pub display_name: Option<String>,
    pub color: Option<String>,
    /// Authoritative re-declaration: reset changeable attributes of an
    /// existing element
    pub purge_changeable: bool,
}

impl ConceptDefinition {
    #[must_use]
    pub fn new(iri: impl Into<Iri>) -> Self {
        Self {
            iri: iri.into(),
            parent_iri: None,
            display_name: None,
            color: None,
            purge_changeable: false,
        }
    }

    #[must_use]
    pub fn parent(mut self, iri: impl Into<Iri>) -> Self {
        self.parent_iri = Some(iri.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn purge_changeable(mut self, purge: bool) -> Self {
        self.purge_changeable = purge;
        self
    }
}

/// Declaration of a relationship
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDefinition {
    pub iri: Iri,
    /// Defaults to the top relationship
    pub parent_iri: Option<Iri>,
    pub display_name: Option<String>,
    pub domain_iris: Vec<Iri>,
    pub range_iris: Vec<Iri>,
    pub purge_changeable: bool,
}

impl RelationshipDefinition {
    #[must_use]
    pub fn new(iri: impl Into<Iri>) -> Self {
        Self {
            iri: iri.into(),
            parent_iri: None,
            display_name: None,
            domain_iris: Vec::new(),
            range_iris: Vec::new(),
            purge_changeable: false,
        }
    }

    #[must_use]
    pub fn parent(mut self, iri: impl Into<Iri>) -> Self {
        self.parent_iri = Some(iri.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, iri: impl Into<Iri>) -> Self {
        self.domain_iris.push(iri.into());
        self
    }

    #[must_use]
    pub fn range(mut self, iri: impl Into<Iri>) -> Self {
        self.range_iris.push(iri.into());
        self
    }

    #[must_use]
    pub fn purge_changeable(mut self, purge: bool) -> Self {
        self.purge_changeable = purge;
        self
    }
}

/// Declaration of a property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub iri: Iri,
    pub data_type: PropertyType,
    pub display_name: Option<String>,
    pub concept_iris: Vec<Iri>,
    pub relationship_iris: Vec<Iri>,
    /// Tables this property is a column of
    pub extended_data_table_iris: Vec<Iri>,
    /// Components of a composite value, in order
    pub dependent_property_iris: Vec<Iri>,
    pub text_index_hints: BTreeSet<TextIndexHint>,
    pub possible_values: Option<BTreeMap<String, String>>,
    pub purge_changeable: bool,
}

impl PropertyDefinition {
    #[must_use]
    pub fn new(iri: impl Into<Iri>, data_type: PropertyType) -> Self {
        Self {
            iri: iri.into(),
            data_type,
            display_name: None,
            concept_iris: Vec::new(),
            relationship_iris: Vec::new(),
            extended_data_table_iris: Vec::new(),
            dependent_property_iris: Vec::new(),
            text_index_hints: BTreeSet::new(),
            possible_values: None,
            purge_changeable: false,
        }
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Attach to a concept
    #[must_use]
    pub fn concept(mut self, iri: impl Into<Iri>) -> Self {
        self.concept_iris.push(iri.into());
        self
    }

    /// Attach to a relationship
    #[must_use]
    pub fn relationship(mut self, iri: impl Into<Iri>) -> Self {
        self.relationship_iris.push(iri.into());
        self
    }

    /// Add as a column of an extended data table
    #[must_use]
    pub fn table(mut self, iri: impl Into<Iri>) -> Self {
        self.extended_data_table_iris.push(iri.into());
        self
    }

    #[must_use]
    pub fn dependent(mut self, iri: impl Into<Iri>) -> Self {
        self.dependent_property_iris.push(iri.into());
        self
    }

    #[must_use]
    pub fn text_index_hints(mut self, hints: impl IntoIterator<Item = TextIndexHint>) -> Self {
        self.text_index_hints.extend(hints);
        self
    }

    #[must_use]
    pub fn possible_values(mut self, values: BTreeMap<String, String>) -> Self {
        self.possible_values = Some(values);
        self
    }

    #[must_use]
    pub fn purge_changeable(mut self, purge: bool) -> Self {
        self.purge_changeable = purge;
        self
    }

    /// Check if at least one owner is named
    #[must_use]
    pub fn has_owner(&self) -> bool {
        !(self.concept_iris.is_empty()
            && self.relationship_iris.is_empty()
            && self.extended_data_table_iris.is_empty())
    }
}

/// Change to a single typed attribute; `None` clears it
#[derive(Debug, Clone, PartialEq)]
pub enum ElementUpdate {
    DisplayName(Option<String>),
    UserVisible(bool),
    Searchable(bool),
    Sortable(bool),
    Addable(bool),
    Updateable(bool),
    Deleteable(bool),
    SortPriority(Option<i64>),
    TitleFormula(Option<String>),
    SubtitleFormula(Option<String>),
    TimeFormula(Option<String>),
    ValidationFormula(Option<String>),
    DisplayFormula(Option<String>),
    DisplayType(Option<String>),
    PropertyGroup(Option<String>),
    /// Concepts only
    Color(Option<String>),
    /// Concepts only
    GlyphIcon(Option<Vec<u8>>),
    /// Concepts only
    GlyphIconSelected(Option<Vec<u8>>),
    /// Concepts only
    MapGlyphIcon(Option<Vec<u8>>),
    /// Properties only
    Boost(Option<f64>),
    /// Properties only
    PossibleValues(Option<BTreeMap<String, String>>),
    /// Properties only
    TextIndexHints(BTreeSet<TextIndexHint>),
    /// Pass-through attribute with no dedicated field
    Extra { name: String, value: Option<String> },
}

/// How an update is written to the store
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoredChange {
    /// Replace every value of `name` with the keyed values
    Replace {
        name: &'static str,
        values: Vec<(String, PropertyValue)>,
    },
    SetKeyed {
        name: &'static str,
        key: String,
        value: PropertyValue,
    },
    RemoveKeyed { name: &'static str, key: String },
}

impl ElementUpdate {
    /// Stored attribute name
    #[must_use]
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::DisplayName(_) => keys::DISPLAY_NAME,
            Self::UserVisible(_) => keys::USER_VISIBLE,
            Self::Searchable(_) => keys::SEARCHABLE,
            Self::Sortable(_) => keys::SORTABLE,
            Self::Addable(_) => keys::ADDABLE,
            Self::Updateable(_) => keys::UPDATEABLE,
            Self::Deleteable(_) => keys::DELETEABLE,
            Self::SortPriority(_) => keys::SORT_PRIORITY,
            Self::TitleFormula(_) => keys::TITLE_FORMULA,
            Self::SubtitleFormula(_) => keys::SUBTITLE_FORMULA,
            Self::TimeFormula(_) => keys::TIME_FORMULA,
            Self::ValidationFormula(_) => keys::VALIDATION_FORMULA,
            Self::DisplayFormula(_) => keys::DISPLAY_FORMULA,
            Self::DisplayType(_) => keys::DISPLAY_TYPE,
            Self::PropertyGroup(_) => keys::PROPERTY_GROUP,
            Self::Color(_) => keys::COLOR,
            Self::GlyphIcon(_) => keys::GLYPH_ICON,
            Self::GlyphIconSelected(_) => keys::GLYPH_ICON_SELECTED,
            Self::MapGlyphIcon(_) => keys::MAP_GLYPH_ICON,
            Self::Boost(_) => keys::BOOST,
            Self::PossibleValues(_) => keys::POSSIBLE_VALUES,
            Self::TextIndexHints(_) => keys::TEXT_INDEX_HINTS,
            Self::Extra { .. } => keys::EXTRA,
        }
    }

    /// Check if the attribute exists on elements of this kind
    #[must_use]
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        match self {
            Self::Color(_) | Self::GlyphIcon(_) | Self::GlyphIconSelected(_) | Self::MapGlyphIcon(_) => {
                kind == ElementKind::Concept
            }
            Self::Boost(_) | Self::PossibleValues(_) | Self::TextIndexHints(_) => {
                kind == ElementKind::Property
            }
            _ => true,
        }
    }

    pub(crate) fn into_change(self) -> StoredChange {
        let name = self.attribute();
        let single = |value: Option<PropertyValue>| StoredChange::Replace {
            name,
            values: value.map(|v| (String::new(), v)).into_iter().collect(),
        };
        match self {
            Self::UserVisible(flag)
            | Self::Searchable(flag)
            | Self::Sortable(flag)
            | Self::Addable(flag)
            | Self::Updateable(flag)
            | Self::Deleteable(flag) => single(Some(flag.into())),
            Self::SortPriority(priority) => single(priority.map(PropertyValue::from)),
            Self::DisplayName(text)
            | Self::TitleFormula(text)
            | Self::SubtitleFormula(text)
            | Self::TimeFormula(text)
            | Self::ValidationFormula(text)
            | Self::DisplayFormula(text)
            | Self::DisplayType(text)
            | Self::PropertyGroup(text)
            | Self::Color(text) => single(text.map(PropertyValue::from)),
            Self::GlyphIcon(icon) | Self::GlyphIconSelected(icon) | Self::MapGlyphIcon(icon) => {
                single(icon.map(PropertyValue::Bytes))
            }
            Self::Boost(boost) => single(boost.map(PropertyValue::from)),
            Self::PossibleValues(values) => single(values.map(|map| {
                PropertyValue::Json(serde_json::Value::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect(),
                ))
            })),
            Self::TextIndexHints(hints) => StoredChange::Replace {
                name,
                values: hints
                    .into_iter()
                    .map(|h| (h.as_str().to_string(), PropertyValue::from(h.as_str())))
                    .collect(),
            },
            Self::Extra { name: key, value } => match value {
                Some(value) => StoredChange::SetKeyed {
                    name,
                    key,
                    value: value.into(),
                },
                None => StoredChange::RemoveKeyed { name, key },
            },
        }
    }
}
