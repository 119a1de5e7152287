//! # The document model
//!
//! This module follows the JSON serialization of Atlassian Document Format
//! (ADF) nodes, which is itself derived from the `prosemirror` node schema.
//! Unknown node and mark types are kept around as [`NodeType::Other`] and
//! [`MarkType::Other`] so that deserialization never fails on new upstream
//! content.
pub mod de;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// The `type` tag of a [`Node`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Text,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    Rule,
    HardBreak,
    /// Any type this crate doesn't know about
    Other(String),
}

impl NodeType {
    /// The tag as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Self::Doc => "doc",
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::Text => "text",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::ListItem => "listItem",
            Self::CodeBlock => "codeBlock",
            Self::Blockquote => "blockquote",
            Self::Rule => "rule",
            Self::HardBreak => "hardBreak",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "doc" => Self::Doc,
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "text" => Self::Text,
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            "codeBlock" => Self::CodeBlock,
            "blockquote" => Self::Blockquote,
            "rule" => Self::Rule,
            "hardBreak" => Self::HardBreak,
            _ => Self::Other(tag),
        }
    }
}

impl From<NodeType> for String {
    fn from(nt: NodeType) -> String {
        match nt {
            NodeType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

/// The `type` tag of a [`Mark`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MarkType {
    Strong,
    Em,
    Code,
    Strike,
    Underline,
    Link,
    TextColor,
    Other(String),
}

impl Default for MarkType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for MarkType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "strong" => Self::Strong,
            "em" => Self::Em,
            "code" => Self::Code,
            "strike" => Self::Strike,
            "underline" => Self::Underline,
            "link" => Self::Link,
            "textColor" => Self::TextColor,
            _ => Self::Other(tag),
        }
    }
}

impl From<MarkType> for String {
    fn from(mt: MarkType) -> String {
        let tag = match mt {
            MarkType::Strong => "strong",
            MarkType::Em => "em",
            MarkType::Code => "code",
            MarkType::Strike => "strike",
            MarkType::Underline => "underline",
            MarkType::Link => "link",
            MarkType::TextColor => "textColor",
            MarkType::Other(tag) => return tag,
        };
        tag.to_owned()
    }
}

/// Node or mark specific attributes
///
/// ADF attributes differ per node type and new ones appear regularly, so
/// they are kept as a plain JSON object with a few typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Attrs(pub Map<String, Value>);

impl Attrs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a string or number attribute as text
    ///
    /// `null`, booleans, arrays and objects count as missing.
    pub fn scalar(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
impl Attrs {
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }
}

/// An inline formatting annotation on a text node
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Mark {
    #[serde(rename = "type", default)]
    pub kind: MarkType,
    #[serde(
        default,
        deserialize_with = "de::deserialize_or_default",
        skip_serializing_if = "Attrs::is_empty"
    )]
    pub attrs: Attrs,
}

#[cfg(test)]
impl From<MarkType> for Mark {
    fn from(kind: MarkType) -> Self {
        Self {
            kind,
            attrs: Attrs::default(),
        }
    }
}

/// A single element of an ADF tree
///
/// Every field is optional: the root `doc` wrapper carries a `version`,
/// text nodes carry `text` and `marks`, everything else may have `content`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeType>,
    /// `Some` whenever the key is present, `Some(Value::Null)` for `null`
    #[serde(
        default,
        deserialize_with = "de::deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Fragment>,
    #[serde(
        default,
        deserialize_with = "de::deserialize_or_default",
        skip_serializing_if = "Attrs::is_empty"
    )]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::deserialize_or_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub marks: Vec<Mark>,
}

pub type Fragment = Vec<Node>;

impl Node {
    /// Whether this is the top-level wrapper that carries a format version
    pub fn is_root(&self) -> bool {
        self.version.is_some() && self.content.is_some()
    }

    /// The children of this node (empty if absent)
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn is_type(&self, kind: &NodeType) -> bool {
        self.kind.as_ref() == Some(kind)
    }
}

#[cfg(test)]
impl Node {
    /// Create a node of the given type with children
    pub fn new(kind: NodeType, content: Fragment) -> Self {
        Self {
            kind: Some(kind),
            content: Some(content),
            ..Self::default()
        }
    }

    /// Create an ADF root node (`doc`, version 1)
    pub fn doc(content: Fragment) -> Self {
        Self {
            version: Some(Value::from(1)),
            ..Self::new(NodeType::Doc, content)
        }
    }

    /// Create a plain text node
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            kind: Some(NodeType::Text),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Attrs, MarkType, Node, NodeType};
    use serde_json::json;

    #[test]
    fn test_known_and_unknown_types() {
        let node: Node = serde_json::from_value(json!({
            "type": "panel",
            "attrs": { "panelType": "info" },
            "content": [
                { "type": "bulletList", "content": [] },
                { "type": "text", "text": "x", "marks": [{ "type": "subsup" }, {}] }
            ]
        }))
        .unwrap();

        assert_eq!(node.kind, Some(NodeType::Other("panel".to_owned())));
        assert_eq!(node.attrs.scalar("panelType").as_deref(), Some("info"));
        assert!(node.children()[0].is_type(&NodeType::BulletList));
        assert_eq!(
            node.children()[1].marks[0].kind,
            MarkType::Other("subsup".to_owned())
        );
        assert_eq!(node.children()[1].marks[1].kind, MarkType::default());
    }

    #[test]
    fn test_null_fields() {
        let node: Node = serde_json::from_value(json!({
            "type": "text",
            "text": "hi",
            "attrs": null,
            "marks": null,
        }))
        .unwrap();
        assert_eq!(node, Node::text("hi"));
    }

    #[test]
    fn test_empty_object() {
        let node: Node = serde_json::from_str("{}").unwrap();
        assert_eq!(node, Node::default());
        assert!(!node.is_root());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_root_detection() {
        let node: Node =
            serde_json::from_value(json!({ "type": "doc", "version": 1, "content": [] })).unwrap();
        assert!(node.is_root());

        let node: Node = serde_json::from_value(json!({ "type": "doc", "content": [] })).unwrap();
        assert!(!node.is_root());

        // The key counts, not its value
        let node: Node =
            serde_json::from_value(json!({ "version": null, "content": [] })).unwrap();
        assert_eq!(node.version, Some(serde_json::Value::Null));
        assert!(node.is_root());
    }

    #[test]
    fn test_scalar_attrs() {
        let attrs = Attrs::default()
            .with("level", 2)
            .with("text", "2")
            .with("flag", true)
            .with("none", serde_json::Value::Null);
        assert_eq!(attrs.scalar("level").as_deref(), Some("2"));
        assert_eq!(attrs.scalar("text").as_deref(), Some("2"));
        assert_eq!(attrs.scalar("flag"), None);
        assert_eq!(attrs.scalar("none"), None);
        assert_eq!(attrs.scalar("missing"), None);
    }

    #[test]
    fn test_serialize_tags() {
        let node = Node::new(
            NodeType::Heading,
            vec![Node::new(NodeType::HardBreak, vec![])],
        )
        .with_attrs(Attrs::default().with("level", 2));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "heading",
                "attrs": { "level": 2 },
                "content": [{ "type": "hardBreak", "content": [] }]
            })
        );
    }
}
