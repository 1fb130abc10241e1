//! Package plumbing: relationships, content types and XML namespaces
//!
//! An XLSX file is a ZIP package whose parts are linked by relationship
//! files (`*.rels`) and typed by `[Content_Types].xml`. The workbook keeps
//! both in memory so that adding a shared-string table or removing a sheet
//! updates the package graph together with the document.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;

/// Part names inside the package
pub mod parts {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const CORE: &str = "docProps/core.xml";
    pub const APP: &str = "docProps/app.xml";
    pub const WORKBOOK: &str = "xl/workbook.xml";
    pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
    pub const STYLES: &str = "xl/styles.xml";
    pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
    pub const THEME: &str = "xl/theme/theme1.xml";
    /// Directory holding the worksheet parts
    pub const WORKSHEETS: &str = "xl/worksheets";
}

/// Content types used in the manifest
pub mod content_types {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
    pub const SHARED_STRINGS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.comments+xml";
    pub const VML_DRAWING: &str = "application/vnd.openxmlformats-officedocument.vmlDrawing";
}

const OFFICE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CORE_PROPERTIES_URI: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Well-known namespace URIs keyed by their conventional prefix
static NAMESPACES: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("spreadsheetml", "http://schemas.openxmlformats.org/spreadsheetml/2006/main"),
        ("content-types", "http://schemas.openxmlformats.org/package/2006/content-types"),
        ("relationships", "http://schemas.openxmlformats.org/package/2006/relationships"),
        ("drawingml", "http://schemas.openxmlformats.org/drawingml/2006/main"),
        ("r", OFFICE_RELATIONSHIPS),
        (
            "cp",
            "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        ),
        ("dc", "http://purl.org/dc/elements/1.1/"),
        ("dcterms", "http://purl.org/dc/terms/"),
        ("dcmitype", "http://purl.org/dc/dcmitype/"),
        ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        (
            "vt",
            "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
        ),
        ("xml", "http://www.w3.org/XML/1998/namespace"),
        (
            "extended-properties",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        ),
    ]
    .into_iter()
    .collect()
});

/// Namespace URI for a conventional prefix such as `"r"` or `"dcterms"`
pub fn namespace(prefix: &str) -> Option<&'static str> {
    NAMESPACES.get(prefix).copied()
}

/// What a relationship points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    OfficeDocument,
    CoreProperties,
    ExtendedProperties,
    Worksheet,
    Styles,
    SharedStrings,
    Theme,
    Hyperlink,
    Comments,
    VmlDrawing,
    /// Any other type, kept by URI
    Unknown(String),
}

impl RelationshipKind {
    /// The relationship type URI written to `.rels` files
    pub fn type_uri(&self) -> String {
        let suffix = match self {
            RelationshipKind::CoreProperties => return CORE_PROPERTIES_URI.to_string(),
            RelationshipKind::Unknown(uri) => return uri.clone(),
            RelationshipKind::OfficeDocument => "officeDocument",
            RelationshipKind::ExtendedProperties => "extended-properties",
            RelationshipKind::Worksheet => "worksheet",
            RelationshipKind::Styles => "styles",
            RelationshipKind::SharedStrings => "sharedStrings",
            RelationshipKind::Theme => "theme",
            RelationshipKind::Hyperlink => "hyperlink",
            RelationshipKind::Comments => "comments",
            RelationshipKind::VmlDrawing => "vmlDrawing",
        };
        format!("{}/{}", OFFICE_RELATIONSHIPS, suffix)
    }

    /// Classify a type URI. The strict-conformance namespace is accepted too.
    pub fn from_type_uri(uri: &str) -> Self {
        if uri == CORE_PROPERTIES_URI || uri.ends_with("/metadata/core-properties") {
            return RelationshipKind::CoreProperties;
        }
        match uri.rsplit('/').next().unwrap_or(uri) {
            "officeDocument" => RelationshipKind::OfficeDocument,
            "extended-properties" => RelationshipKind::ExtendedProperties,
            "worksheet" => RelationshipKind::Worksheet,
            "styles" => RelationshipKind::Styles,
            "sharedStrings" => RelationshipKind::SharedStrings,
            "theme" => RelationshipKind::Theme,
            "hyperlink" => RelationshipKind::Hyperlink,
            "comments" => RelationshipKind::Comments,
            "vmlDrawing" => RelationshipKind::VmlDrawing,
            _ => RelationshipKind::Unknown(uri.to_string()),
        }
    }
}

/// Whether a target is a part inside the package or an external URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

/// One edge of the package graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// `rIdN`, unique within its `.rels` file
    pub id: String,
    pub kind: RelationshipKind,
    pub target: String,
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        kind: RelationshipKind,
        target: impl Into<String>,
        target_mode: TargetMode,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
            target_mode,
        }
    }

    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.id, self.target)
    }
}

/// The contents of one `.rels` file, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Relationship> {
        self.items.iter_mut().find(|r| r.id == id)
    }

    /// The lowest `rIdN` not in use
    pub fn next_id(&self) -> String {
        (1..)
            .map(|i| format!("rId{}", i))
            .find(|id| self.get(id).is_none())
            .unwrap_or_default()
    }

    /// Add a relationship under a fresh id and return that id
    pub fn add(
        &mut self,
        kind: RelationshipKind,
        target: impl Into<String>,
        target_mode: TargetMode,
    ) -> String {
        let id = self.next_id();
        self.items
            .push(Relationship::new(id.clone(), kind, target, target_mode));
        id
    }

    /// Insert a relationship with a caller-chosen id, replacing any
    /// existing one with the same id
    pub fn insert(&mut self, relationship: Relationship) {
        match self.items.iter_mut().find(|r| r.id == relationship.id) {
            Some(existing) => *existing = relationship,
            None => self.items.push(relationship),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let position = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(position))
    }

    /// Relationships of one kind, in order
    pub fn by_kind<'a>(
        &'a self,
        kind: &'a RelationshipKind,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.items.iter().filter(move |r| &r.kind == kind)
    }

    /// First relationship pointing at `target`
    pub fn find_target(&self, target: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.target == target)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Part names in the manifest always start with `/`
fn normalize_part(part: &str) -> String {
    if part.starts_with('/') {
        part.to_string()
    } else {
        format!("/{}", part)
    }
}

/// `[Content_Types].xml`: default types by extension and overrides by part
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// A manifest with the `rels` and `xml` defaults and no overrides
    pub fn new() -> Self {
        let mut manifest = Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        };
        manifest.register_default("rels", content_types::RELATIONSHIPS);
        manifest.register_default("xml", content_types::XML);
        manifest
    }

    pub fn register_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    pub fn register_override(&mut self, part: &str, content_type: &str) {
        self.overrides
            .insert(normalize_part(part), content_type.to_string());
    }

    /// Remove an override; false if there was none
    pub fn remove_override(&mut self, part: &str) -> bool {
        self.overrides.remove(&normalize_part(part)).is_some()
    }

    pub fn has_override(&self, part: &str) -> bool {
        self.overrides.contains_key(&normalize_part(part))
    }

    /// Content type of a part: its override, else the default for its extension
    pub fn content_type(&self, part: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(&normalize_part(part)) {
            return Some(ct);
        }
        let extension = part.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults.get(&extension).map(String::as_str)
    }

    /// `(extension, content type)` pairs
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `(part name, content type)` pairs, part names with a leading `/`
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_uris() {
        let kinds = [
            RelationshipKind::OfficeDocument,
            RelationshipKind::CoreProperties,
            RelationshipKind::Worksheet,
            RelationshipKind::SharedStrings,
            RelationshipKind::Hyperlink,
            RelationshipKind::VmlDrawing,
        ];
        for kind in kinds {
            assert_eq!(RelationshipKind::from_type_uri(&kind.type_uri()), kind);
        }
        assert_eq!(
            RelationshipKind::Styles.type_uri(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
        );
        assert_eq!(
            RelationshipKind::from_type_uri("urn:custom"),
            RelationshipKind::Unknown("urn:custom".into())
        );
    }

    #[test]
    fn test_next_id_fills_gaps() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(RelationshipKind::Worksheet, "a.xml", TargetMode::Internal), "rId1");
        assert_eq!(rels.add(RelationshipKind::Worksheet, "b.xml", TargetMode::Internal), "rId2");
        rels.remove("rId1");
        assert_eq!(rels.next_id(), "rId1");
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.find_target("b.xml").map(|r| r.id.as_str()), Some("rId2"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut rels = Relationships::new();
        rels.insert(Relationship::new(
            "rId7",
            RelationshipKind::Hyperlink,
            "http://a",
            TargetMode::External,
        ));
        rels.insert(Relationship::new(
            "rId7",
            RelationshipKind::Hyperlink,
            "http://b",
            TargetMode::External,
        ));
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.get("rId7").map(|r| r.target.as_str()), Some("http://b"));
        assert!(rels.get("rId7").map_or(false, Relationship::is_external));
    }

    #[test]
    fn test_manifest_lookup() {
        let mut manifest = Manifest::new();
        manifest.register_override("xl/workbook.xml", content_types::WORKBOOK);
        assert!(manifest.has_override("/xl/workbook.xml"));
        assert_eq!(manifest.content_type("xl/workbook.xml"), Some(content_types::WORKBOOK));
        assert_eq!(manifest.content_type("/xl/other.xml"), Some(content_types::XML));
        assert_eq!(manifest.content_type("/xl/image.png"), None);
        assert!(manifest.remove_override("/xl/workbook.xml"));
        assert!(!manifest.remove_override("/xl/workbook.xml"));
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(
            namespace("r"),
            Some("http://schemas.openxmlformats.org/officeDocument/2006/relationships")
        );
        assert_eq!(namespace("nope"), None);
    }
}
