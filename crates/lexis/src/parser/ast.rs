//! Public AST types produced by resource parsers.
//!
//! This is the inbound boundary of the engine: any parser that produces a
//! list of [`EntryNode`] can feed [`create_entries`](crate::entry::create_entries).
//! The types derive serde so the AST can also be shipped pre-parsed as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One parsed translation unit: `{ id, value?, index?, attrs? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttributeNode>,
}

impl EntryNode {
    /// A node with only a raw string value.
    pub fn simple(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(Node::Raw(value.into())),
            index: None,
            attrs: BTreeMap::new(),
        }
    }
}

/// An attribute value: either a bare node or a node with its own index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeNode {
    Plain(Node),
    Indexed {
        value: Node,
        #[serde(default)]
        index: Vec<Node>,
    },
}

/// A value position in the AST.
///
/// Raw strings are compiled when entries are created: if they contain
/// `{{ … }}` placeables they become complex strings, otherwise they stay
/// literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Raw(String),
    Expr(NodeExpr),
}

impl Node {
    /// Shorthand for an identifier node.
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Expr(NodeExpr::Identifier { name: name.into() })
    }

    /// Shorthand for a single-argument call node, e.g. `plural(n)`.
    pub fn call(callee: impl Into<String>, arg: Node) -> Self {
        Node::Expr(NodeExpr::Call {
            callee: Box::new(Node::identifier(callee)),
            args: vec![arg],
        })
    }
}

/// Expression nodes, tagged by `type` in their serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeExpr {
    /// Reference to a macro, an argument or another entry.
    Identifier { name: String },
    /// A literal that is never scanned for placeables.
    String { content: String },
    /// Concatenation; raw parts are literal fragments.
    ComplexString { content: Vec<Node> },
    /// Selection among keyed branches.
    Hash {
        items: BTreeMap<String, Node>,
        #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
        default_key: Option<String>,
    },
    /// Macro call.
    Call { callee: Box<Node>, args: Vec<Node> },
}
