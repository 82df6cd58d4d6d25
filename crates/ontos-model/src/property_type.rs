//! Property data types and text-indexing hints

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Data type of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    /// Free text
    #[default]
    String,
    /// Date or date-time
    Date,
    /// True/false
    Boolean,
    /// Latitude/longitude point
    GeoPoint,
    /// Arbitrary geographic shape
    GeoShape,
    /// Whole number
    Integer,
    /// Floating point number
    Double,
    /// Fixed point monetary amount
    Currency,
    /// Reference to a directory entity (user, group)
    DirectoryEntity,
    /// Value is a sub-table with its own column properties
    ExtendedDataTable,
}

impl PropertyType {
    /// Canonical upper-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
            Self::GeoPoint => "GEO_POINT",
            Self::GeoShape => "GEO_SHAPE",
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Currency => "CURRENCY",
            Self::DirectoryEntity => "DIRECTORY_ENTITY",
            Self::ExtendedDataTable => "EXTENDED_DATA_TABLE",
        }
    }

    /// Map a schema-document datatype IRI to a property type
    #[must_use]
    pub fn from_datatype_iri(iri: &str) -> Option<Self> {
        let ty = match iri {
            "http://www.w3.org/2001/XMLSchema#string" => Self::String,
            "http://www.w3.org/2001/XMLSchema#boolean" => Self::Boolean,
            "http://www.w3.org/2001/XMLSchema#dateTime" | "http://www.w3.org/2001/XMLSchema#date" => {
                Self::Date
            }
            "http://www.w3.org/2001/XMLSchema#int"
            | "http://www.w3.org/2001/XMLSchema#integer"
            | "http://www.w3.org/2001/XMLSchema#long" => Self::Integer,
            "http://www.w3.org/2001/XMLSchema#double" | "http://www.w3.org/2001/XMLSchema#float" => {
                Self::Double
            }
            "http://www.w3.org/2001/XMLSchema#decimal" | "http://visallo.org#currency" => {
                Self::Currency
            }
            "http://visallo.org#geolocation" => Self::GeoPoint,
            "http://visallo.org#geoshape" => Self::GeoShape,
            "http://visallo.org#directory/entity" => Self::DirectoryEntity,
            crate::iri::EXTENDED_DATA_TABLE_IRI => Self::ExtendedDataTable,
            _ => return None,
        };
        Some(ty)
    }

    /// Check if values of this type can be sorted by default
    #[must_use]
    pub const fn is_sortable_by_default(self) -> bool {
        !matches!(self, Self::GeoPoint | Self::GeoShape | Self::ExtendedDataTable)
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        let ty = match s.to_ascii_uppercase().as_str() {
            "STRING" => Self::String,
            "DATE" => Self::Date,
            "BOOLEAN" => Self::Boolean,
            "GEO_POINT" | "GEO_LOCATION" => Self::GeoPoint,
            "GEO_SHAPE" => Self::GeoShape,
            "INTEGER" => Self::Integer,
            "DOUBLE" => Self::Double,
            "CURRENCY" => Self::Currency,
            "DIRECTORY_ENTITY" => Self::DirectoryEntity,
            "EXTENDED_DATA_TABLE" => Self::ExtendedDataTable,
            _ => return Err(ModelError::UnknownPropertyType(s.to_string())),
        };
        Ok(ty)
    }
}

/// How the search index should treat text values of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextIndexHint {
    /// Index as analyzed full text
    FullText,
    /// Index for exact matching
    ExactMatch,
}

impl TextIndexHint {
    /// Canonical upper-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullText => "FULL_TEXT",
            Self::ExactMatch => "EXACT_MATCH",
        }
    }

    /// Parse a comma separated hint list
    ///
    /// `ALL` expands to every hint and `NONE` to the empty set.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownTextIndexHint`] for unrecognized names
    pub fn parse_list(value: &str) -> ModelResult<BTreeSet<Self>> {
        let mut hints = BTreeSet::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_uppercase().as_str() {
                "NONE" => {}
                "ALL" => {
                    hints.insert(Self::FullText);
                    hints.insert(Self::ExactMatch);
                }
                "FULL_TEXT" => {
                    hints.insert(Self::FullText);
                }
                "EXACT_MATCH" => {
                    hints.insert(Self::ExactMatch);
                }
                _ => return Err(ModelError::UnknownTextIndexHint(part.to_string())),
            }
        }
        Ok(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn datatype_mapping() {
        assert_eq!(
            PropertyType::from_datatype_iri("http://www.w3.org/2001/XMLSchema#dateTime"),
            Some(PropertyType::Date)
        );
        assert_eq!(
            PropertyType::from_datatype_iri(crate::iri::EXTENDED_DATA_TABLE_IRI),
            Some(PropertyType::ExtendedDataTable)
        );
        assert_eq!(PropertyType::from_datatype_iri("http://example.org#nope"), None);
    }

    #[test]
    fn parse_round_trip_names() {
        for ty in [PropertyType::GeoPoint, PropertyType::ExtendedDataTable, PropertyType::Currency] {
            assert_eq!(ty.as_str().parse::<PropertyType>().unwrap(), ty);
        }
    }

    #[test]
    fn serialized_names_match_canonical_names() {
        for ty in [PropertyType::String, PropertyType::GeoShape, PropertyType::DirectoryEntity] {
            assert_eq!(serde_json::to_value(ty).unwrap(), serde_json::json!(ty.as_str()));
        }
        let hints: BTreeSet<TextIndexHint> = serde_json::from_str(r#"["EXACT_MATCH","FULL_TEXT"]"#).unwrap();
        assert_eq!(hints, TextIndexHint::parse_list("ALL").unwrap());
    }

    #[test]
    fn hint_lists() {
        assert_eq!(TextIndexHint::parse_list("ALL").unwrap().len(), 2);
        assert!(TextIndexHint::parse_list("NONE").unwrap().is_empty());
        let hints = TextIndexHint::parse_list("EXACT_MATCH, full_text").unwrap();
        assert!(hints.contains(&TextIndexHint::FullText));
        assert!(TextIndexHint::parse_list("FUZZY").is_err());
    }
}
