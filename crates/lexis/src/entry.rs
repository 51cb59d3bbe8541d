//! Compact entry representation built from parsed resources.
//!
//! Most translations are plain strings. Those are stored as
//! [`Entry::Bare`] and resolve to their content without touching the
//! evaluator. Everything else becomes an [`EntryBody`] holding an expression
//! tree, an optional index and optional attributes.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::parser::{AttributeNode, EntryNode, Node, NodeExpr, has_placeables, split_placeables};

/// One translatable unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A string with no placeables, index or attributes.
    Bare(String),
    /// Anything that needs evaluation.
    Complex(Box<EntryBody>),
}

impl Entry {
    /// The bare string, if this entry takes the fast path.
    pub fn as_bare(&self) -> Option<&str> {
        match self {
            Entry::Bare(s) => Some(s),
            Entry::Complex(_) => None,
        }
    }

    /// The structured body, if this entry needs evaluation.
    pub fn body(&self) -> Option<&EntryBody> {
        match self {
            Entry::Bare(_) => None,
            Entry::Complex(body) => Some(body),
        }
    }

    /// Attributes of this entry; bare entries have none.
    pub fn attributes(&self) -> Option<&BTreeMap<String, Entry>> {
        self.body().map(|body| &body.attributes)
    }
}

/// The structured part of an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryBody {
    /// Value expression; entries may consist of attributes only.
    pub value: Option<Expression>,
    /// Selectors, one per nesting level of hash values.
    pub index: Vec<Expression>,
    /// Attributes. Attribute entries never carry attributes themselves.
    pub attributes: BTreeMap<String, Entry>,
}

/// The expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal string.
    String(String),
    /// A macro, argument or entry reference.
    Identifier(String),
    /// Literal fragments and placeables, concatenated in order.
    ComplexString(Vec<Expression>),
    /// Keyed branches selected through the entry's index.
    Hash(Hash),
    /// A macro call.
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
}

/// A selection among branches.
#[derive(Debug, Clone, PartialEq)]
pub struct Hash {
    pub branches: BTreeMap<String, Expression>,
    /// Explicit default branch; `"other"` is tried when absent.
    pub default_key: Option<String>,
}

impl Hash {
    /// The key tried when the index does not pick a branch.
    pub fn default_key(&self) -> &str {
        self.default_key.as_deref().unwrap_or("other")
    }
}

impl Display for Expression {
    /// Source-like form, used to render failed placeables.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expression::String(s) => write!(f, "\"{s}\""),
            Expression::Identifier(name) => write!(f, "{name}"),
            Expression::ComplexString(parts) => {
                for part in parts {
                    match part {
                        Expression::String(s) => write!(f, "{s}")?,
                        other => write!(f, "{{{{ {other} }}}}")?,
                    }
                }
                Ok(())
            }
            Expression::Hash(hash) => {
                let keys: Vec<&str> = hash.branches.keys().map(String::as_str).collect();
                write!(f, "{{ {} }}", keys.join(", "))
            }
            Expression::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{callee}({})", args.join(", "))
            }
        }
    }
}

/// Build the entry map for one resource.
///
/// Later nodes with the same id replace earlier ones.
pub fn create_entries(nodes: Vec<EntryNode>) -> HashMap<String, Entry> {
    nodes
        .into_iter()
        .map(|node| {
            let id = node.id.clone();
            (id, create_entry(node))
        })
        .collect()
}

/// Build a single entry, taking the bare-string fast path when possible.
pub fn create_entry(node: EntryNode) -> Entry {
    let EntryNode {
        value,
        index,
        attrs,
        ..
    } = node;
    let index = index.unwrap_or_default();

    if index.is_empty()
        && attrs.is_empty()
        && let Some(text) = value.as_ref().and_then(literal_text)
    {
        return Entry::Bare(text.to_string());
    }

    let attributes = attrs
        .into_iter()
        .map(|(name, attr)| (name, create_attribute(attr)))
        .collect();

    Entry::Complex(Box::new(EntryBody {
        value: value.map(compile_value),
        index: index.into_iter().map(compile_value).collect(),
        attributes,
    }))
}

fn create_attribute(node: AttributeNode) -> Entry {
    let (value, index) = match node {
        AttributeNode::Plain(value) => (value, Vec::new()),
        AttributeNode::Indexed { value, index } => (value, index),
    };
    if index.is_empty()
        && let Some(text) = literal_text(&value)
    {
        return Entry::Bare(text.to_string());
    }
    Entry::Complex(Box::new(EntryBody {
        value: Some(compile_value(value)),
        index: index.into_iter().map(compile_value).collect(),
        attributes: BTreeMap::new(),
    }))
}

/// The text of a node that needs no evaluation.
fn literal_text(node: &Node) -> Option<&str> {
    match node {
        Node::Raw(raw) if !has_placeables(raw) => Some(raw),
        Node::Expr(NodeExpr::String { content }) => Some(content),
        Node::Raw(_) | Node::Expr(_) => None,
    }
}

/// Compile a value position: raw strings are scanned for placeables.
fn compile_value(node: Node) -> Expression {
    match node {
        Node::Raw(raw) => compile_raw(raw),
        Node::Expr(expr) => compile_expr(expr),
    }
}

fn compile_raw(raw: String) -> Expression {
    if !has_placeables(&raw) {
        return Expression::String(raw);
    }
    Expression::ComplexString(
        split_placeables(&raw)
            .into_iter()
            .map(compile_part)
            .collect(),
    )
}

/// Compile a part of a complex string; raw parts are literal.
fn compile_part(node: Node) -> Expression {
    match node {
        Node::Raw(raw) => Expression::String(raw),
        Node::Expr(expr) => compile_expr(expr),
    }
}

fn compile_expr(expr: NodeExpr) -> Expression {
    match expr {
        NodeExpr::Identifier { name } => Expression::Identifier(name),
        NodeExpr::String { content } => Expression::String(content),
        NodeExpr::ComplexString { content } => {
            Expression::ComplexString(content.into_iter().map(compile_part).collect())
        }
        NodeExpr::Hash { items, default_key } => Expression::Hash(Hash {
            branches: items
                .into_iter()
                .map(|(key, value)| (key, compile_value(value)))
                .collect(),
            default_key,
        }),
        NodeExpr::Call { callee, args } => Expression::Call {
            callee: Box::new(compile_part(*callee)),
            args: args.into_iter().map(compile_part).collect(),
        },
    }
}
