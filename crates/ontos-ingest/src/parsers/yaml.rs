//! YAML schema documents

use crate::document::SchemaDocument;
use crate::error::{IngestError, IngestResult};
use crate::parsers::DocumentParser;

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentParser;

impl DocumentParser for YamlDocumentParser {
    fn parse(&self, bytes: &[u8]) -> IngestResult<SchemaDocument> {
        serde_yaml::from_slice(bytes).map_err(|e| IngestError::parse("yaml", e.to_string()))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AnnotationValue;

    #[test]
    fn parse_annotations() {
        let doc = YamlDocumentParser
            .parse(
                br#"
iri: http://x
classes:
  - iri: http://x#a
    superClasses: [http://visallo.org#entity]
    annotations:
      - property: http://visallo.org#searchable
        value: false
      - property: http://visallo.org#sortPriority
        value: 3
"#,
            )
            .unwrap();
        let annotations = &doc.classes[0].annotations;
        assert_eq!(annotations[0].value, AnnotationValue::from(false));
        assert_eq!(annotations[1].value.as_i64(), Some(3));
    }

    #[test]
    fn syntax_error() {
        let err = YamlDocumentParser.parse(b"classes: [unclosed").unwrap_err();
        assert!(matches!(err, IngestError::Parse { format: "yaml", .. }));
    }
}
