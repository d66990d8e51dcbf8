//! Tree Node Data Structures
//!
//! This module defines the single [`Node`] struct used by every view in the
//! explorer (Game Data, Solar System, Search Results).
//!
//! # Architecture
//!
//! - **Arena addressing**: nodes are stored in a [`NodeTree`](crate::tree::NodeTree)
//!   and refer to each other by [`NodeId`]; `parent` is a plain index and never
//!   implies ownership
//! - **Tagged payload**: [`NodeKind`] carries kind-specific data (orbital
//!   elements, JSON scalar category, pending child counts), so traversal and
//!   caching code is uniform and specialised fields are reached only after a
//!   match on the tag
//! - **Borrowed source**: [`SourceRef`] points into a shared parsed document
//!   instead of owning a copy of the JSON subtree

use crate::models::orbital::OrbitalData;
use crate::tree::cache::AggregateCache;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Index of a node inside its [`NodeTree`](crate::tree::NodeTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a celestial body, derived from its position in the
/// orbital hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelestialClass {
    Star,
    Planet,
    Moon,
}

/// Category of a JSON scalar, used for icons and tooltips only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JsonValueType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Date,
}

impl JsonValueType {
    /// Classify a scalar value. Returns `None` for objects and arrays.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Number(n) if n.is_f64() => Some(Self::Float),
            Value::Number(_) => Some(Self::Integer),
            Value::String(s) if DateTime::parse_from_rfc3339(s).is_ok() => Some(Self::Date),
            Value::String(_) => Some(Self::String),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Date => "Date",
        }
    }
}

/// Node type tag with kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Unknown,
    Root,
    DataFolder,
    DataFile,
    CelestialBody(CelestialClass, OrbitalData),
    Ship(OrbitalData),
    Asteroid(OrbitalData),
    Player(OrbitalData),
    DynamicObject(OrbitalData),
    JsonObject,
    JsonArray,
    JsonProperty(JsonValueType),
    JsonValue(JsonValueType),
    /// Stand-in for children that have not been materialised yet.
    ExpansionPending {
        pending: usize,
        collapse_arrays: bool,
    },
    SearchResultSet,
    /// Entry in a search presentation tree pointing at a node of the searched tree.
    SearchResult(NodeId),
    /// Sentinel for a subtree whose source could not be loaded.
    LoadError(String),
}

impl NodeKind {
    /// String form of the type tag, matched by search queries.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Root => "Root",
            Self::DataFolder => "DataFolder",
            Self::DataFile => "DataFile",
            Self::CelestialBody(CelestialClass::Star, _) => "Star",
            Self::CelestialBody(CelestialClass::Planet, _) => "Planet",
            Self::CelestialBody(CelestialClass::Moon, _) => "Moon",
            Self::Ship(_) => "Ship",
            Self::Asteroid(_) => "Asteroid",
            Self::Player(_) => "Player",
            Self::DynamicObject(_) => "DynamicObject",
            Self::JsonObject => "JsonObject",
            Self::JsonArray => "JsonArray",
            Self::JsonProperty(_) => "JsonProperty",
            Self::JsonValue(_) => "JsonValue",
            Self::ExpansionPending { .. } => "ExpansionPending",
            Self::SearchResultSet => "SearchResultSet",
            Self::SearchResult(_) => "SearchResult",
            Self::LoadError(_) => "LoadError",
        }
    }

    /// Orbital attributes, for solar-system node kinds.
    pub fn orbital(&self) -> Option<&OrbitalData> {
        match self {
            Self::CelestialBody(_, data)
            | Self::Ship(data)
            | Self::Asteroid(data)
            | Self::Player(data)
            | Self::DynamicObject(data) => Some(data),
            _ => None,
        }
    }

    pub fn celestial_class(&self) -> Option<CelestialClass> {
        match self {
            Self::CelestialBody(class, _) => Some(*class),
            _ => None,
        }
    }

    pub fn is_celestial_body(&self) -> bool {
        matches!(self, Self::CelestialBody(..))
    }

    pub fn is_ship(&self) -> bool {
        matches!(self, Self::Ship(_))
    }

    pub fn is_expansion_pending(&self) -> bool {
        matches!(self, Self::ExpansionPending { .. })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Read-only reference to the JSON value a node was built from.
///
/// Holds a shared handle to the parsed document and an RFC 6901 pointer into
/// it; the referenced value is looked up on demand.
#[derive(Clone)]
pub struct SourceRef {
    document: Arc<Value>,
    pointer: String,
}

impl SourceRef {
    /// Reference the whole document.
    pub fn root(document: Arc<Value>) -> Self {
        Self {
            document,
            pointer: String::new(),
        }
    }

    pub fn new(document: Arc<Value>, pointer: impl Into<String>) -> Self {
        Self {
            document,
            pointer: pointer.into(),
        }
    }

    pub fn document(&self) -> &Arc<Value> {
        &self.document
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Look up the referenced value. `None` if the pointer no longer resolves.
    pub fn resolve(&self) -> Option<&Value> {
        self.document.pointer(&self.pointer)
    }

    /// Reference to member `key` of the referenced object.
    pub fn child_key(&self, key: &str) -> Self {
        let escaped = key.replace('~', "~0").replace('/', "~1");
        Self {
            document: Arc::clone(&self.document),
            pointer: format!("{}/{}", self.pointer, escaped),
        }
    }

    /// Reference to element `index` of the referenced array.
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            document: Arc::clone(&self.document),
            pointer: format!("{}/{}", self.pointer, index),
        }
    }
}

impl PartialEq for SourceRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.document, &other.document) && self.pointer == other.pointer
    }
}

impl fmt::Debug for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRef")
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

/// A node in any explorer view.
///
/// Structural fields (`parent`, `children`) and the aggregate cache are only
/// mutated through [`NodeTree`](crate::tree::NodeTree) so that cache
/// invalidation cannot be skipped.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    name: String,
    display_text: Option<String>,
    tooltip: Option<String>,
    source: Option<SourceRef>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) cache: AggregateCache,
}

impl Node {
    /// Create a detached node with no children.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            display_text: None,
            tooltip: None,
            source: None,
            parent: None,
            children: Vec::new(),
            cache: AggregateCache::default(),
        }
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display text, falling back to the name when unset.
    pub fn display_text(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.name)
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn source(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_display_text(&mut self, text: impl Into<String>) {
        self.display_text = Some(text.into());
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = Some(tooltip.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orbital::OrbitData;
    use serde_json::json;

    #[test]
    fn test_display_text_falls_back_to_name() {
        let node = Node::new(NodeKind::JsonObject, "Ships");
        assert_eq!(node.display_text(), "Ships");

        let node = node.with_display_text("Ships [3]");
        assert_eq!(node.name(), "Ships");
        assert_eq!(node.display_text(), "Ships [3]");
    }

    #[test]
    fn test_kind_tags() {
        let data = OrbitalData::new(1, -1, OrbitData::default());
        assert_eq!(
            NodeKind::CelestialBody(CelestialClass::Star, data.clone()).tag(),
            "Star"
        );
        assert_eq!(NodeKind::Ship(data.clone()).to_string(), "Ship");
        assert_eq!(
            NodeKind::ExpansionPending {
                pending: 3,
                collapse_arrays: false
            }
            .tag(),
            "ExpansionPending"
        );
        assert!(NodeKind::Ship(data).orbital().is_some());
        assert!(NodeKind::JsonArray.orbital().is_none());
    }

    #[test]
    fn test_json_value_type_classification() {
        assert_eq!(JsonValueType::of(&json!(null)), Some(JsonValueType::Null));
        assert_eq!(JsonValueType::of(&json!(true)), Some(JsonValueType::Boolean));
        assert_eq!(JsonValueType::of(&json!(42)), Some(JsonValueType::Integer));
        assert_eq!(JsonValueType::of(&json!(4.2)), Some(JsonValueType::Float));
        assert_eq!(JsonValueType::of(&json!("abc")), Some(JsonValueType::String));
        assert_eq!(
            JsonValueType::of(&json!("2017-10-18T12:00:00Z")),
            Some(JsonValueType::Date)
        );
        assert_eq!(JsonValueType::of(&json!({})), None);
        assert_eq!(JsonValueType::of(&json!([])), None);
    }

    #[test]
    fn test_source_ref_pointer_escaping() {
        let doc = Arc::new(json!({"a/b": {"c~d": [10, 20]}}));
        let source = SourceRef::root(doc)
            .child_key("a/b")
            .child_key("c~d")
            .child_index(1);

        assert_eq!(source.pointer(), "/a~1b/c~0d/1");
        assert_eq!(source.resolve(), Some(&json!(20)));
    }

    #[test]
    fn test_source_ref_unresolvable() {
        let doc = Arc::new(json!({"a": 1}));
        let source = SourceRef::new(doc, "/missing");
        assert!(source.resolve().is_none());
    }
}
