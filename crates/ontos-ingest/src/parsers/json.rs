//! JSON schema documents

use crate::document::SchemaDocument;
use crate::error::{IngestError, IngestResult};
use crate::parsers::DocumentParser;

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse(&self, bytes: &[u8]) -> IngestResult<SchemaDocument> {
        serde_json::from_slice(bytes).map_err(|e| IngestError::parse("json", e.to_string()))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_declarations() {
        let doc = JsonDocumentParser
            .parse(
                br#"{
                    "iri": "http://x",
                    "classes": [{"iri": "http://x#a", "superClasses": ["http://x#b"]}],
                    "objectProperties": [{"iri": "http://x#r", "domain": ["http://x#a"], "range": ["http://x#a"]}],
                    "dataProperties": [{"iri": "http://x#p", "domain": ["http://x#a"]}]
                }"#,
            )
            .unwrap();
        assert_eq!(doc.classes[0].super_classes, vec!["http://x#b".to_string()]);
        assert_eq!(doc.object_properties[0].range.len(), 1);
        assert!(doc.data_properties[0].range.is_none());
    }

    #[test]
    fn syntax_error() {
        let err = JsonDocumentParser.parse(b"{ not json").unwrap_err();
        assert!(matches!(err, IngestError::Parse { format: "json", .. }));
    }
}
