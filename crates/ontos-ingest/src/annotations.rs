//! Annotation vocabulary
//!
//! Maps document annotations onto element updates. Recognised annotation
//! properties become typed [`ElementUpdate`]s; anything else, or a
//! recognised annotation on an element kind that has no such attribute, is
//! kept as a pass-through string.

use crate::document::Annotation;
use crate::error::{IngestError, IngestResult};
use ontos_engine::ElementUpdate;
use ontos_model::{ElementKind, Iri, TextIndexHint};
use std::collections::BTreeMap;

/// Recognised annotation property IRIs
pub mod vocabulary {
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const INTENT: &str = "http://visallo.org#intent";
    pub const SEARCHABLE: &str = "http://visallo.org#searchable";
    pub const SORTABLE: &str = "http://visallo.org#sortable";
    pub const ADDABLE: &str = "http://visallo.org#addable";
    pub const USER_VISIBLE: &str = "http://visallo.org#userVisible";
    pub const UPDATEABLE: &str = "http://visallo.org#updateable";
    pub const DELETEABLE: &str = "http://visallo.org#deleteable";
    pub const SORT_PRIORITY: &str = "http://visallo.org#sortPriority";
    pub const GLYPH_ICON_FILE_NAME: &str = "http://visallo.org#glyphIconFileName";
    pub const GLYPH_ICON_SELECTED_FILE_NAME: &str = "http://visallo.org#glyphIconSelectedFileName";
    pub const MAP_GLYPH_ICON_FILE_NAME: &str = "http://visallo.org#mapGlyphIconFileName";
    pub const COLOR: &str = "http://visallo.org#color";
    pub const DISPLAY_TYPE: &str = "http://visallo.org#displayType";
    pub const PROPERTY_GROUP: &str = "http://visallo.org#propertyGroup";
    pub const TITLE_FORMULA: &str = "http://visallo.org#titleFormula";
    pub const SUBTITLE_FORMULA: &str = "http://visallo.org#subtitleFormula";
    pub const TIME_FORMULA: &str = "http://visallo.org#timeFormula";
    pub const VALIDATION_FORMULA: &str = "http://visallo.org#validationFormula";
    pub const DISPLAY_FORMULA: &str = "http://visallo.org#displayFormula";
    pub const TEXT_INDEX_HINTS: &str = "http://visallo.org#textIndexHints";
    pub const POSSIBLE_VALUES: &str = "http://visallo.org#possibleValues";
    pub const DEPENDENT_PROPERTY_IRIS: &str = "http://visallo.org#dependentPropertyIris";
    pub const BOOST: &str = "http://visallo.org#boost";
}

/// Icon attribute an icon file is loaded into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSlot {
    Glyph,
    GlyphSelected,
    Map,
}

impl IconSlot {
    /// Update storing the icon bytes
    #[must_use]
    pub fn update(self, bytes: Vec<u8>) -> ElementUpdate {
        match self {
            Self::Glyph => ElementUpdate::GlyphIcon(Some(bytes)),
            Self::GlyphSelected => ElementUpdate::GlyphIconSelected(Some(bytes)),
            Self::Map => ElementUpdate::MapGlyphIcon(Some(bytes)),
        }
    }
}

/// What an annotation asks the importer to do
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Set a single attribute
    Update(ElementUpdate),
    /// Add an intent tag
    Intent(String),
    /// Load an icon file from the resource directory
    Icon { slot: IconSlot, file_name: String },
    /// Next component of a composite property, in declaration order
    Dependent(Iri),
}

/// Interpret one annotation on an element of `kind`
///
/// # Errors
/// Returns [`IngestError::InvalidAnnotation`] when a recognised annotation
/// carries a value of the wrong shape
pub fn interpret(iri: &str, kind: ElementKind, annotation: &Annotation) -> IngestResult<Directive> {
    use vocabulary as v;

    let property = annotation.property.as_str();
    let value = &annotation.value;
    let invalid = |message: &str| IngestError::invalid_annotation(iri, property, message);
    let flag = || value.as_bool().ok_or_else(|| invalid("expected true or false"));
    let text = || Some(value.lexical());

    let directive = match property {
        v::RDFS_LABEL => Directive::Update(ElementUpdate::DisplayName(text())),
        v::INTENT => Directive::Intent(value.lexical()),
        v::SEARCHABLE => Directive::Update(ElementUpdate::Searchable(flag()?)),
        v::SORTABLE => Directive::Update(ElementUpdate::Sortable(flag()?)),
        v::ADDABLE => Directive::Update(ElementUpdate::Addable(flag()?)),
        v::USER_VISIBLE => Directive::Update(ElementUpdate::UserVisible(flag()?)),
        v::UPDATEABLE => Directive::Update(ElementUpdate::Updateable(flag()?)),
        v::DELETEABLE => Directive::Update(ElementUpdate::Deleteable(flag()?)),
        v::SORT_PRIORITY => {
            let priority = value.as_i64().ok_or_else(|| invalid("expected an integer"))?;
            Directive::Update(ElementUpdate::SortPriority(Some(priority)))
        }
        v::GLYPH_ICON_FILE_NAME => icon(IconSlot::Glyph, value.lexical()),
        v::GLYPH_ICON_SELECTED_FILE_NAME => icon(IconSlot::GlyphSelected, value.lexical()),
        v::MAP_GLYPH_ICON_FILE_NAME => icon(IconSlot::Map, value.lexical()),
        v::COLOR => Directive::Update(ElementUpdate::Color(text())),
        v::DISPLAY_TYPE => Directive::Update(ElementUpdate::DisplayType(text())),
        v::PROPERTY_GROUP => Directive::Update(ElementUpdate::PropertyGroup(text())),
        v::TITLE_FORMULA => Directive::Update(ElementUpdate::TitleFormula(text())),
        v::SUBTITLE_FORMULA => Directive::Update(ElementUpdate::SubtitleFormula(text())),
        v::TIME_FORMULA => Directive::Update(ElementUpdate::TimeFormula(text())),
        v::VALIDATION_FORMULA => Directive::Update(ElementUpdate::ValidationFormula(text())),
        v::DISPLAY_FORMULA => Directive::Update(ElementUpdate::DisplayFormula(text())),
        v::TEXT_INDEX_HINTS => {
            let hints = TextIndexHint::parse_list(&value.lexical())
                .map_err(|e| invalid(&e.to_string()))?;
            Directive::Update(ElementUpdate::TextIndexHints(hints))
        }
        v::POSSIBLE_VALUES => {
            let values: BTreeMap<String, String> = serde_json::from_str(&value.lexical())
                .map_err(|e| invalid(&format!("expected a JSON object of strings: {e}")))?;
            Directive::Update(ElementUpdate::PossibleValues(Some(values)))
        }
        v::DEPENDENT_PROPERTY_IRIS => Directive::Dependent(Iri::new(value.lexical())),
        v::BOOST => {
            let boost = value.as_f64().ok_or_else(|| invalid("expected a number"))?;
            Directive::Update(ElementUpdate::Boost(Some(boost)))
        }
        _ => return Ok(pass_through(annotation)),
    };

    let applies = match &directive {
        Directive::Update(update) => update.applies_to(kind),
        Directive::Intent(_) => true,
        Directive::Icon { .. } => kind == ElementKind::Concept,
        Directive::Dependent(_) => kind == ElementKind::Property,
    };
    Ok(if applies {
        directive
    } else {
        pass_through(annotation)
    })
}

fn icon(slot: IconSlot, file_name: String) -> Directive {
    Directive::Icon { slot, file_name }
}

fn pass_through(annotation: &Annotation) -> Directive {
    Directive::Update(ElementUpdate::Extra {
        name: annotation.property.clone(),
        value: Some(annotation.value.lexical()),
    })
}

/// Dependent property IRIs declared on a data property, in order
#[must_use]
pub fn dependent_iris(annotations: &[Annotation]) -> Vec<Iri> {
    annotations
        .iter()
        .filter(|a| a.property == vocabulary::DEPENDENT_PROPERTY_IRIS)
        .map(|a| Iri::new(a.value.lexical()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(kind: ElementKind, property: &str, value: impl Into<crate::document::AnnotationValue>) -> Directive {
        interpret("http://x#e", kind, &Annotation::new(property, value)).unwrap()
    }

    #[test]
    fn label_and_flags() {
        assert_eq!(
            run(ElementKind::Concept, vocabulary::RDFS_LABEL, "Person"),
            Directive::Update(ElementUpdate::DisplayName(Some("Person".to_string())))
        );
        assert_eq!(
            run(ElementKind::Property, vocabulary::SEARCHABLE, "false"),
            Directive::Update(ElementUpdate::Searchable(false))
        );
        assert_eq!(
            run(ElementKind::Relationship, vocabulary::INTENT, "knows"),
            Directive::Intent("knows".to_string())
        );
    }

    #[test]
    fn bad_flag_is_rejected() {
        let err = interpret(
            "http://x#e",
            ElementKind::Concept,
            &Annotation::new(vocabulary::ADDABLE, "sometimes"),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::InvalidAnnotation { .. }));
    }

    #[test]
    fn property_only_annotations() {
        let hints = run(ElementKind::Property, vocabulary::TEXT_INDEX_HINTS, "ALL");
        assert!(matches!(hints, Directive::Update(ElementUpdate::TextIndexHints(h)) if h.len() == 2));

        let values = run(ElementKind::Property, vocabulary::POSSIBLE_VALUES, r#"{"a": "Alpha"}"#);
        let expected = BTreeMap::from([("a".to_string(), "Alpha".to_string())]);
        assert_eq!(values, Directive::Update(ElementUpdate::PossibleValues(Some(expected))));

        assert_eq!(
            run(ElementKind::Property, vocabulary::BOOST, "2.5"),
            Directive::Update(ElementUpdate::Boost(Some(2.5)))
        );
    }

    #[test]
    fn icons_apply_to_concepts_only() {
        assert_eq!(
            run(ElementKind::Concept, vocabulary::GLYPH_ICON_FILE_NAME, "person.png"),
            Directive::Icon {
                slot: IconSlot::Glyph,
                file_name: "person.png".to_string()
            }
        );
        assert_eq!(
            run(ElementKind::Property, vocabulary::MAP_GLYPH_ICON_FILE_NAME, "pin.png"),
            Directive::Update(ElementUpdate::Extra {
                name: vocabulary::MAP_GLYPH_ICON_FILE_NAME.to_string(),
                value: Some("pin.png".to_string()),
            })
        );
    }

    #[test]
    fn unknown_annotations_pass_through() {
        assert_eq!(
            run(ElementKind::Concept, "http://example.org#shade", "blue"),
            Directive::Update(ElementUpdate::Extra {
                name: "http://example.org#shade".to_string(),
                value: Some("blue".to_string()),
            })
        );
    }

    #[test]
    fn dependents_keep_order() {
        let annotations = vec![
            Annotation::new(vocabulary::DEPENDENT_PROPERTY_IRIS, "http://x#last"),
            Annotation::new(vocabulary::RDFS_LABEL, "Name"),
            Annotation::new(vocabulary::DEPENDENT_PROPERTY_IRIS, "http://x#first"),
        ];
        assert_eq!(
            dependent_iris(&annotations),
            vec![Iri::new("http://x#last"), Iri::new("http://x#first")]
        );
    }
}
