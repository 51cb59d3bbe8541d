//! JSON resource format: the entry AST serialized with serde.

use super::ast::EntryNode;
use super::error::ParseError;

/// Parse a JSON array of entry nodes.
///
/// ```
/// use lexis::parser::{Node, parse_json};
///
/// let nodes = parse_json(r#"[{"id": "hello", "value": "Hello"}]"#).unwrap();
/// assert_eq!(nodes[0].value, Some(Node::Raw("Hello".to_string())));
/// ```
pub fn parse_json(source: &str) -> Result<Vec<EntryNode>, ParseError> {
    serde_json::from_str(source).map_err(|e| ParseError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}
