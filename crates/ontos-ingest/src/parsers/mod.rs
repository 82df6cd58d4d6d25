//! Schema document parsers
//!
//! Turns document bytes into a [`SchemaDocument`]:
//! - JSON via serde_json
//! - YAML via serde_yaml
//!
//! [`ParserRegistry`] picks a parser by file extension.

use crate::document::SchemaDocument;
use crate::error::IngestResult;
use std::fmt::Debug;
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonDocumentParser;
pub use yaml::YamlDocumentParser;

/// Parser for one document format
///
/// Implement this trait to add support for new formats.
pub trait DocumentParser: Send + Sync + Debug {
    /// Decode document bytes
    ///
    /// # Errors
    /// Returns [`IngestError::Parse`](crate::IngestError::Parse) for malformed input
    fn parse(&self, bytes: &[u8]) -> IngestResult<SchemaDocument>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Extension-keyed parser lookup
#[derive(Debug)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(JsonDocumentParser);
        registry.register(YamlDocumentParser);
        registry
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser; later registrations win for shared extensions
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.insert(0, Box::new(parser));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(path))
            .map(|p| &**p)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EmptyParser;

    impl DocumentParser for EmptyParser {
        fn parse(&self, _bytes: &[u8]) -> IngestResult<SchemaDocument> {
            Ok(SchemaDocument::default())
        }

        fn extensions(&self) -> &[&str] {
            &["json"]
        }
    }

    #[test]
    fn parser_can_parse_by_extension() {
        let parser = JsonDocumentParser;
        assert!(parser.can_parse(Path::new("schema.json")));
        assert!(parser.can_parse(Path::new("/path/to/SCHEMA.JSON")));
        assert!(!parser.can_parse(Path::new("schema.owl")));
        assert!(!parser.can_parse(Path::new("schema")));
    }

    #[test]
    fn default_registry_knows_json_and_yaml() {
        let registry = ParserRegistry::default();
        assert!(registry.find_for_path(Path::new("a.json")).is_some());
        assert!(registry.find_for_path(Path::new("a.yml")).is_some());
        assert!(registry.find_for_path(Path::new("a.yaml")).is_some());
        assert!(registry.find_for_path(Path::new("a.owl")).is_none());
        assert!(registry.all_extensions().contains(&"yaml"));
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = ParserRegistry::default();
        registry.register(EmptyParser);
        let parser = registry.find_for_path(Path::new("a.json")).unwrap();
        assert_eq!(parser.parse(b"not json").unwrap(), SchemaDocument::default());
    }
}
