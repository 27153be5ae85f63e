//! FHIR CodeSystem model
//!
//! Version-agnostic model for CodeSystems (terminology), shaped around the
//! fields an administrative console edits. Everything else is kept in
//! `extensions` so a load/save cycle never drops server data.

use super::complex::*;
use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// FHIR CodeSystem resource
///
/// Declares the existence of and describes a code system or code system supplement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    /// Resource type - always "CodeSystem"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Business version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Name (computer friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name (human friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication status
    pub status: PublicationStatus,

    /// Name of the publisher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// If code comparison is case sensitive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    /// Content type (not-present | example | fragment | complete | supplement)
    #[serde(default)]
    pub content: CodeSystemContentMode,

    /// Concepts in the code system
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub concept: Vec<ConceptNode>,

    /// Additional content
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

fn default_resource_type() -> String {
    "CodeSystem".to_string()
}

/// Content mode for a code system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeSystemContentMode {
    NotPresent,
    Example,
    Fragment,
    #[default]
    Complete,
    Supplement,
}

impl CodeSystemContentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotPresent => "not-present",
            Self::Example => "example",
            Self::Fragment => "fragment",
            Self::Complete => "complete",
            Self::Supplement => "supplement",
        }
    }
}

impl std::fmt::Display for CodeSystemContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CodeSystemContentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "not-present" => Ok(Self::NotPresent),
            "example" => Ok(Self::Example),
            "fragment" => Ok(Self::Fragment),
            "complete" => Ok(Self::Complete),
            "supplement" => Ok(Self::Supplement),
            other => Err(Error::InvalidFieldValue(format!(
                "content '{other}' (expected not-present | example | fragment | complete | supplement)"
            ))),
        }
    }
}

/// Concept in the code system
///
/// `children` is always present once a node exists; on the wire it is the
/// FHIR `concept` element and is omitted when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConceptNode {
    /// Code that identifies the concept
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,

    /// Text to display to the user
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub display: String,

    /// Formal definition
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub definition: String,

    /// Child concepts (nested hierarchy)
    #[serde(
        rename = "concept",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ConceptNode>,

    /// Designations, properties and anything else not edited here
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ConceptNode {
    /// A blank concept: empty code, display and definition, no children.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_children(mut self, children: Vec<ConceptNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// Levels in this subtree; a leaf is 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Deepest concept nesting a saved CodeSystem may have.
///
/// Every level costs two JSON nesting levels (the concept object and its
/// `concept` array), and the JSON reader stops at 128.
pub const MAX_CONCEPT_DEPTH: usize = 48;

impl CodeSystem {
    /// Create a new CodeSystem with minimal required fields
    pub fn new(
        url: impl Into<String>,
        status: PublicationStatus,
        content: CodeSystemContentMode,
    ) -> Self {
        Self {
            resource_type: "CodeSystem".to_string(),
            id: None,
            url: url.into(),
            version: None,
            name: None,
            title: None,
            status,
            publisher: None,
            description: None,
            case_sensitive: None,
            content,
            concept: Vec::new(),
            extensions: Map::new(),
        }
    }

    /// The starting point for a resource created in the console: draft,
    /// complete, case sensitive, no concepts.
    pub fn draft() -> Self {
        let mut cs = Self::new(
            String::new(),
            PublicationStatus::Draft,
            CodeSystemContentMode::Complete,
        );
        cs.case_sensitive = Some(true);
        cs
    }

    /// Total number of concepts at every level.
    pub fn concept_count(&self) -> usize {
        self.concept.iter().map(ConceptNode::subtree_len).sum()
    }

    /// Levels in the concept hierarchy; 0 without concepts.
    pub fn concept_depth(&self) -> usize {
        self.concept.iter().map(ConceptNode::depth).max().unwrap_or(0)
    }

    /// Problems that block a save.
    ///
    /// Concepts are reported by dotted index path (`0.2.1`).
    pub fn validation_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.url.trim().is_empty() {
            issues.push("url is required".to_string());
        }
        if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            issues.push("name is required".to_string());
        }
        collect_empty_codes(&self.concept, &mut Vec::new(), &mut issues);
        if let Some(issue) = self.depth_issue() {
            issues.push(issue);
        }
        issues
    }

    fn depth_issue(&self) -> Option<String> {
        let depth = self.concept_depth();
        (depth > MAX_CONCEPT_DEPTH).then(|| {
            format!("concept hierarchy is {depth} levels deep (at most {MAX_CONCEPT_DEPTH})")
        })
    }

    /// Parse a CodeSystem from JSON.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Pretty-printed JSON, as stored on disk.
    pub fn write_json_pretty<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(issue) = self.depth_issue() {
            return Err(Error::InvalidFieldValue(issue));
        }
        match self.validation_issues().into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(Error::MissingField(issue)),
        }
    }
}

fn collect_empty_codes(nodes: &[ConceptNode], prefix: &mut Vec<usize>, out: &mut Vec<String>) {
    for (idx, node) in nodes.iter().enumerate() {
        prefix.push(idx);
        if node.code.trim().is_empty() {
            let path = prefix
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(".");
            out.push(format!("concept {path} has no code"));
        }
        collect_empty_codes(&node.children, prefix, out);
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concept_without_children_reads_as_empty_vec() {
        let node: ConceptNode = serde_json::from_value(json!({ "code": "A" })).unwrap();
        assert_eq!(node.code, "A");
        assert!(node.children.is_empty());
        assert!(node.display.is_empty());
    }

    #[test]
    fn null_elements_read_as_empty() {
        let node: ConceptNode = serde_json::from_value(json!({
            "code": "A",
            "display": null,
            "definition": null,
            "concept": null
        }))
        .unwrap();
        assert_eq!(node, ConceptNode::new("A"));
    }

    #[test]
    fn empty_elements_are_omitted_on_write() {
        let value = serde_json::to_value(ConceptNode::new("A")).unwrap();
        assert_eq!(value, json!({ "code": "A" }));
    }

    #[test]
    fn unmodelled_concept_elements_round_trip() {
        let raw = json!({
            "code": "A",
            "display": "Alpha",
            "designation": [{ "language": "it", "value": "Alfa" }],
            "property": [{ "code": "status", "valueCode": "active" }],
            "concept": [{ "code": "A1" }]
        });
        let node: ConceptNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.children.len(), 1);
        assert!(node.extensions.contains_key("designation"));
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn draft_defaults() {
        let cs = CodeSystem::draft();
        assert_eq!(cs.status, PublicationStatus::Draft);
        assert_eq!(cs.content, CodeSystemContentMode::Complete);
        assert_eq!(cs.case_sensitive, Some(true));
        assert!(cs.concept.is_empty());
    }

    #[test]
    fn validation_reports_nested_empty_codes() {
        let mut cs = CodeSystem::draft();
        cs.url = "http://example.org/cs".into();
        cs.name = Some("Example".into());
        cs.concept = vec![
            ConceptNode::new("A")
                .with_children(vec![ConceptNode::new("A1"), ConceptNode::empty()]),
            ConceptNode::empty(),
        ];

        let issues = cs.validation_issues();
        assert_eq!(issues, vec!["concept 0.1 has no code", "concept 1 has no code"]);
        assert!(matches!(cs.validate(), Err(Error::MissingField(_))));
    }

    #[test]
    fn concept_count_includes_descendants() {
        let mut cs = CodeSystem::draft();
        cs.concept = vec![
            ConceptNode::new("A").with_children(vec![
                ConceptNode::new("A1").with_children(vec![ConceptNode::new("A1a")]),
            ]),
            ConceptNode::new("B"),
        ];
        assert_eq!(cs.concept_count(), 4);
        assert_eq!(cs.concept_depth(), 3);
    }

    fn chain(depth: usize) -> ConceptNode {
        (1..depth).fold(ConceptNode::new("leaf"), |child, _| {
            ConceptNode::new("c").with_children(vec![child])
        })
    }

    #[test]
    fn validation_caps_concept_depth() {
        let mut cs = CodeSystem::draft();
        cs.url = "http://example.org/cs".into();
        cs.name = Some("Deep".into());

        cs.concept = vec![chain(MAX_CONCEPT_DEPTH)];
        assert!(cs.validation_issues().is_empty());

        cs.concept = vec![chain(MAX_CONCEPT_DEPTH + 1)];
        assert_eq!(
            cs.validation_issues(),
            vec![format!(
                "concept hierarchy is {} levels deep (at most {MAX_CONCEPT_DEPTH})",
                MAX_CONCEPT_DEPTH + 1
            )]
        );
        assert!(matches!(cs.validate(), Err(Error::InvalidFieldValue(_))));
    }

    #[test]
    fn deepest_valid_hierarchy_reads_back() {
        let mut cs = CodeSystem::draft();
        cs.concept = vec![chain(MAX_CONCEPT_DEPTH)];

        let mut buf = Vec::new();
        cs.write_json_pretty(&mut buf).unwrap();
        let reread = CodeSystem::from_json_reader(buf.as_slice()).unwrap();
        assert_eq!(reread.concept_depth(), MAX_CONCEPT_DEPTH);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = CodeSystem::from_json_reader(&b"{\"concept\": ["[..]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn content_mode_parses_kebab_case() {
        assert_eq!(
            "not-present".parse::<CodeSystemContentMode>().unwrap(),
            CodeSystemContentMode::NotPresent
        );
        assert!("partial".parse::<CodeSystemContentMode>().is_err());
    }
}
