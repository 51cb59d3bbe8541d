//! Placeable scanner using winnow.
//!
//! Splits raw strings into literal fragments and `{{ … }}` placeables. A
//! placeable body is an identifier or a call such as `plural(n)`. Text that
//! looks like a placeable but does not parse stays literal.

use winnow::combinator::{alt, delimited, opt, repeat, separated};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use super::ast::{Node, NodeExpr};

/// Whether a raw string contains at least one well-formed placeable.
pub fn has_placeables(input: &str) -> bool {
    input.contains("{{")
        && split_placeables(input)
            .iter()
            .any(|part| matches!(part, Node::Expr(_)))
}

/// Split a raw string into literal and placeable parts.
///
/// Adjacent literal characters are merged into a single `Node::Raw`.
pub fn split_placeables(input: &str) -> Vec<Node> {
    let mut remaining = input;
    match segments(&mut remaining) {
        Ok(parts) if remaining.is_empty() => parts,
        // `any` accepts every character, so the scan always consumes the input.
        Ok(_) | Err(_) => vec![Node::Raw(input.to_string())],
    }
}

/// Parse a standalone selector expression such as `plural(n)` or `gender`.
pub(crate) fn parse_expression(input: &str) -> Option<Node> {
    let mut remaining = input.trim();
    let node = expression(&mut remaining).ok()?;
    remaining.is_empty().then_some(node)
}

/// Parse the whole input into segments.
fn segments(input: &mut &str) -> ModalResult<Vec<Node>> {
    let parts: Vec<Node> = repeat(0.., alt((placeable, literal_char))).parse_next(input)?;
    Ok(merge_literals(parts))
}

/// Parse a placeable: {{ expression }}
fn placeable(input: &mut &str) -> ModalResult<Node> {
    delimited(("{{", ws), expression, (ws, "}}")).parse_next(input)
}

/// Parse a single literal character.
fn literal_char(input: &mut &str) -> ModalResult<Node> {
    any.map(|c: char| Node::Raw(c.to_string())).parse_next(input)
}

/// Parse an identifier or a call: name | name(arg, ...)
pub(crate) fn expression(input: &mut &str) -> ModalResult<Node> {
    let name = identifier(input)?;
    let args: Option<Vec<Node>> = opt(call_args).parse_next(input)?;
    Ok(match args {
        Some(args) => Node::Expr(NodeExpr::Call {
            callee: Box::new(Node::identifier(name)),
            args,
        }),
        None => Node::identifier(name),
    })
}

/// Parse call arguments: (arg1, arg2, ...)
fn call_args(input: &mut &str) -> ModalResult<Vec<Node>> {
    delimited(
        ('(', ws),
        separated(0.., expression, (ws, ',', ws)),
        (ws, ')'),
    )
    .parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Parse an identifier.
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-').parse_next(input)
}

/// Merge adjacent Raw parts.
fn merge_literals(parts: Vec<Node>) -> Vec<Node> {
    let mut result: Vec<Node> = Vec::with_capacity(parts.len());

    for part in parts {
        match part {
            Node::Raw(text) => {
                if let Some(Node::Raw(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Node::Raw(text));
                }
            }
            other @ Node::Expr(_) => result.push(other),
        }
    }

    result
}
