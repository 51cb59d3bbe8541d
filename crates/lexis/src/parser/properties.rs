//! Line-oriented `key = value` resource format.
//!
//! Supported syntax:
//! - `# comment` lines and blank lines
//! - `id = value`
//! - `id.attr = value` (one attribute level only)
//! - `id = {[ plural(n) ]}` followed by `id[one] = …` hash members
//! - `id.attr[key] = …` hash members on attributes
//! - a trailing `\` continues the entry on the next line
//! - escapes `\\ \n \r \t \b \f \{ \} \" \'` and `\uXXXX`
//!
//! Lines that do not look like `key = value` are skipped.

use std::collections::BTreeMap;

use winnow::combinator::{delimited, opt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{rest, take_till, take_while};

use super::ast::{AttributeNode, EntryNode, Node, NodeExpr};
use super::error::ParseError;
use super::placeable::parse_expression;

/// Parse a properties resource into entry nodes, in first-definition order.
pub fn parse_properties(source: &str) -> Result<Vec<EntryNode>, ParseError> {
    let mut builder = AstBuilder::default();

    for (line_no, line) in logical_lines(source) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut input = trimmed;
        let Ok((key, value)) = entry_line(&mut input) else {
            continue;
        };
        let value = unescape(value);
        builder.set(line_no, key, value)?;
    }

    Ok(builder.finish())
}

/// Join continuation lines, yielding each logical line with its 1-based
/// starting line number.
fn logical_lines(source: &str) -> Vec<(usize, String)> {
    let physical: Vec<&str> = source.lines().collect();
    let mut lines = Vec::new();
    let mut i = 0;
    while i < physical.len() {
        let start = i + 1;
        let mut line = physical[i].to_string();
        while ends_with_continuation(&line) && i + 1 < physical.len() {
            line.pop();
            i += 1;
            line.push_str(physical[i].trim());
        }
        lines.push((start, line));
        i += 1;
    }
    lines
}

/// A trailing backslash that is not itself escaped.
fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// Parsed left-hand side of an entry line.
#[derive(Debug, PartialEq)]
struct EntryKey<'a> {
    name: &'a str,
    member: Option<&'a str>,
}

/// Parse `key = value`, returning the key and the raw (escaped) value.
fn entry_line<'i>(input: &mut &'i str) -> ModalResult<(EntryKey<'i>, &'i str)> {
    let key = entry_key(input)?;
    take_while(0.., char::is_whitespace).void().parse_next(input)?;
    '='.parse_next(input)?;
    take_while(0.., char::is_whitespace).void().parse_next(input)?;
    let value = rest.verify(|v: &&str| !v.is_empty()).parse_next(input)?;
    Ok((key, value))
}

/// Parse `name[member]?` where name may contain one `.attr` segment.
fn entry_key<'i>(input: &mut &'i str) -> ModalResult<EntryKey<'i>> {
    let name = take_till(1.., |c: char| c == '[' || c == '=' || c.is_whitespace())
        .parse_next(input)?;
    let member = opt(delimited('[', take_till(0.., ']'), ']')).parse_next(input)?;
    Ok(EntryKey { name, member })
}

/// Parse an index value: {[ expression ]}
fn index_value(text: &str) -> Option<Node> {
    let mut input = text.trim();
    let body = preceded::<_, _, _, ContextError, _, _>("{[", take_till(0.., ']'))
        .parse_next(&mut input)
        .ok()?;
    if input.trim() != "]}" {
        return None;
    }
    parse_expression(body)
}

/// A value slot being assembled from several lines.
#[derive(Debug, Default)]
struct Slot {
    value: Option<SlotValue>,
    index: Option<Node>,
}

#[derive(Debug)]
enum SlotValue {
    Raw(String),
    Hash(BTreeMap<String, Node>),
}

impl Slot {
    fn set_raw(&mut self, value: String) {
        self.value = Some(SlotValue::Raw(value));
    }

    /// Add a hash member; a previous raw value must be an index declaration.
    fn set_member(&mut self, line: usize, key: &str, value: String) -> Result<(), ParseError> {
        match self.value.take() {
            Some(SlotValue::Raw(raw)) => {
                let Some(index) = index_value(&raw) else {
                    return Err(ParseError::MalformedIndex { line, text: raw });
                };
                self.index = Some(index);
                self.value = Some(SlotValue::Hash(BTreeMap::from([(
                    key.to_string(),
                    Node::Raw(value),
                )])));
            }
            Some(SlotValue::Hash(mut items)) => {
                items.insert(key.to_string(), Node::Raw(value));
                self.value = Some(SlotValue::Hash(items));
            }
            None => {
                self.value = Some(SlotValue::Hash(BTreeMap::from([(
                    key.to_string(),
                    Node::Raw(value),
                )])));
            }
        }
        Ok(())
    }

    fn into_parts(self) -> (Option<Node>, Option<Vec<Node>>) {
        let value = self.value.map(|value| match value {
            SlotValue::Raw(raw) => Node::Raw(raw),
            SlotValue::Hash(items) => Node::Expr(NodeExpr::Hash {
                items,
                default_key: None,
            }),
        });
        (value, self.index.map(|index| vec![index]))
    }
}

#[derive(Debug, Default)]
struct PendingEntry {
    value: Slot,
    attrs: BTreeMap<String, Slot>,
}

#[derive(Debug, Default)]
struct AstBuilder {
    order: Vec<String>,
    entries: BTreeMap<String, PendingEntry>,
}

impl AstBuilder {
    fn set(&mut self, line: usize, key: EntryKey<'_>, value: String) -> Result<(), ParseError> {
        let mut segments = key.name.split('.');
        let id = segments.next().unwrap_or_default();
        let attr = segments.next();
        if segments.next().is_some() {
            return Err(ParseError::NestedAttribute {
                line,
                name: key.name.to_string(),
            });
        }

        if !self.entries.contains_key(id) {
            self.order.push(id.to_string());
        }
        let entry = self.entries.entry(id.to_string()).or_default();
        let slot = match attr {
            Some(attr) => entry.attrs.entry(attr.to_string()).or_default(),
            None => &mut entry.value,
        };
        match key.member {
            Some(member) => slot.set_member(line, member, value),
            None => {
                slot.set_raw(value);
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Vec<EntryNode> {
        let mut nodes = Vec::with_capacity(self.order.len());
        for id in self.order {
            let Some(pending) = self.entries.remove(&id) else {
                continue;
            };
            let (value, index) = pending.value.into_parts();
            let attrs = pending
                .attrs
                .into_iter()
                .filter_map(|(name, slot)| {
                    let (value, index) = slot.into_parts();
                    let value = value?;
                    let node = match index {
                        Some(index) => AttributeNode::Indexed { value, index },
                        None => AttributeNode::Plain(value),
                    };
                    Some((name, node))
                })
                .collect();
            nodes.push(EntryNode {
                id,
                value,
                index,
                attrs,
            });
        }
        nodes
    }
}

/// Resolve backslash escapes.
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let mut hex = String::new();
                while hex.len() < 4 {
                    match chars.peek() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            hex.push(*h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other @ ('\\' | '{' | '}' | '"' | '\'')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_control_and_unicode() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r"\u00e9t\u00E9"), "été");
        assert_eq!(unescape(r"\{\{ n \}\}"), "{{ n }}");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn continuation_requires_odd_backslashes() {
        assert!(ends_with_continuation("abc \\"));
        assert!(!ends_with_continuation("abc \\\\"));
    }

    #[test]
    fn index_value_accepts_macro_and_identifier() {
        assert_eq!(
            index_value("{[ plural(n) ]}"),
            Some(Node::call("plural", Node::identifier("n")))
        );
        assert_eq!(index_value("{[foo]}"), Some(Node::identifier("foo")));
        assert_eq!(index_value("plural(n)"), None);
    }
}
