//! Node and attribute types.

use serde::{Deserialize, Serialize};

/// A document tree node, discriminated by its `type` tag.
///
/// Kinds map one-to-one onto the mdast node types of the same name.
/// `Heading` additionally carries the derived anchor id the compiler
/// assigns; it is renderer metadata and never part of the visible text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root {
        children: Vec<Node>,
    },
    Heading {
        depth: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    InlineCode {
        value: String,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        value: String,
    },
    Html {
        value: String,
    },
    Break,
    ThematicBreak,
    Blockquote {
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u32>,
        spread: bool,
        children: Vec<Node>,
    },
    ListItem {
        spread: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Delete {
        children: Vec<Node>,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        alt: String,
    },
    Table {
        align: Vec<Option<Align>>,
        children: Vec<Node>,
    },
    TableRow {
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    Yaml {
        value: String,
    },
    Toml {
        value: String,
    },
    /// Generic container directive (`:::name[label]`), the raw form the
    /// parser emits before any rewrite pass runs.
    ContainerDirective {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        children: Vec<Node>,
    },
    /// Synthesized component invocation (`Admonition`, `Exercise`, ...).
    MdxJsxFlowElement {
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
}

/// Column alignment for `Table` nodes. A column without an explicit
/// alignment is `None` in the table's `align` vector (serialized `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Attribute on a synthesized element.
///
/// `value: None` is a presence-only (boolean) attribute; it still
/// serializes, with an explicit `null` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Attribute {
    /// String-valued attribute.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Presence-only attribute.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root { children }
    }

    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        Node::Heading {
            depth,
            id: None,
            children,
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        Node::InlineCode {
            value: value.into(),
        }
    }

    pub fn code(lang: Option<String>, value: impl Into<String>) -> Self {
        Node::Code {
            lang,
            value: value.into(),
        }
    }

    pub fn directive(name: impl Into<String>, label: Option<String>, children: Vec<Node>) -> Self {
        Node::ContainerDirective {
            name: name.into(),
            label,
            children,
        }
    }

    pub fn jsx_element(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    ) -> Self {
        Node::MdxJsxFlowElement {
            name: name.into(),
            attributes,
            children,
        }
    }

    /// The node's children, if this kind has any.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root { children }
            | Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::Blockquote { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::Link { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children }
            | Node::TableCell { children }
            | Node::ContainerDirective { children, .. }
            | Node::MdxJsxFlowElement { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Mutable access to the node's children, if this kind has any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root { children }
            | Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::Blockquote { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::Link { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children }
            | Node::TableCell { children }
            | Node::ContainerDirective { children, .. }
            | Node::MdxJsxFlowElement { children, .. } => Some(children),
            _ => None,
        }
    }

    /// The node's literal value, if this is a value-bearing leaf.
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Text { value }
            | Node::InlineCode { value }
            | Node::Code { value, .. }
            | Node::Html { value }
            | Node::Yaml { value }
            | Node::Toml { value } => Some(value),
            _ => None,
        }
    }

    /// Heading depth, if this node is a heading.
    pub fn heading_depth(&self) -> Option<u8> {
        match self {
            Node::Heading { depth, .. } => Some(*depth),
            _ => None,
        }
    }

    /// Whether this node is a heading of exactly the given depth.
    pub fn is_heading(&self, depth: u8) -> bool {
        self.heading_depth() == Some(depth)
    }
}
