//! Stored layout of schema elements
//!
//! Property names written on element vertices and labels of the edges that
//! wire elements together. Every edge kind is distinct.

/// Property names on element vertices
pub mod keys {
    /// Global element name
    pub const IRI: &str = "iri";
    /// Human readable label
    pub const DISPLAY_NAME: &str = "displayName";
    /// Multi-valued; the key is the intent itself
    pub const INTENT: &str = "intent";
    /// Expression rendering an instance title
    pub const TITLE_FORMULA: &str = "titleFormula";
    /// Expression rendering an instance subtitle
    pub const SUBTITLE_FORMULA: &str = "subtitleFormula";
    /// Expression rendering an instance timestamp
    pub const TIME_FORMULA: &str = "timeFormula";
    /// Expression a property value must satisfy
    pub const VALIDATION_FORMULA: &str = "validationFormula";
    /// Expression rendering a property value
    pub const DISPLAY_FORMULA: &str = "displayFormula";
    /// Shown in user interfaces
    pub const USER_VISIBLE: &str = "userVisible";
    /// Included in search
    pub const SEARCHABLE: &str = "searchable";
    /// Usable as a sort key
    pub const SORTABLE: &str = "sortable";
    /// Users may add values
    pub const ADDABLE: &str = "addable";
    /// Users may change values
    pub const UPDATEABLE: &str = "updateable";
    /// Users may remove values
    pub const DELETEABLE: &str = "deleteable";
    /// Order among sibling properties
    pub const SORT_PRIORITY: &str = "sortPriority";
    /// Rendering hint for property values
    pub const DISPLAY_TYPE: &str = "displayType";
    /// Group a property is shown under
    pub const PROPERTY_GROUP: &str = "propertyGroup";
    /// Icon image bytes
    pub const GLYPH_ICON: &str = "glyphIcon";
    /// Icon image bytes when selected
    pub const GLYPH_ICON_SELECTED: &str = "glyphIconSelected";
    /// Map marker image bytes
    pub const MAP_GLYPH_ICON: &str = "mapGlyphIcon";
    /// Display color
    pub const COLOR: &str = "color";
    /// Canonical property type name
    pub const DATA_TYPE: &str = "dataType";
    /// Multi-valued; the key is the hint name
    pub const TEXT_INDEX_HINTS: &str = "textIndexHints";
    /// JSON object of allowed values and their labels
    pub const POSSIBLE_VALUES: &str = "possibleValues";
    /// Search relevance multiplier
    pub const BOOST: &str = "boost";
    /// Multi-valued pass-through attributes; the key is the attribute name
    pub const EXTRA: &str = "extra";
    /// Ingested documents on the root concept; the key is a zero-padded ordinal
    pub const ONTOLOGY_FILE: &str = "ontologyFile";

    /// Metadata of an [`ONTOLOGY_FILE`] entry
    pub const DOCUMENT_IRI: &str = "documentIri";
    /// Hex SHA-256 of the recorded document
    pub const ONTOLOGY_FILE_HASH: &str = "ontologyFileHash";

    /// Property on data vertices naming their concept
    pub const CONCEPT_TYPE: &str = "conceptType";

    /// Attributes that survive a re-declaration purge
    pub const IDENTITY: &[&str] = &[IRI, DATA_TYPE, ONTOLOGY_FILE];
}

/// Edge labels between element vertices
pub mod labels {
    /// child -> parent
    pub const IS_A: &str = "isA";
    /// relationship -> concept
    pub const HAS_DOMAIN: &str = "hasDomain";
    /// relationship -> concept
    pub const HAS_RANGE: &str = "hasRange";
    /// relationship -> relationship
    pub const INVERSE_OF: &str = "inverseOf";
    /// concept or relationship -> property
    pub const HAS_PROPERTY: &str = "hasProperty";
    /// composite property -> component, ordered by [`ORDER`]
    pub const HAS_DEPENDENT_PROPERTY: &str = "hasDependentProperty";
    /// extended data table -> column, ordered by [`ORDER`]
    pub const HAS_COLUMN: &str = "hasColumn";
    /// workspace -> sandboxed element
    pub const WORKSPACE_TO_ONTOLOGY: &str = "workspaceToOntology";

    /// Edge property holding the position in an ordered chain
    pub const ORDER: &str = "order";
}
