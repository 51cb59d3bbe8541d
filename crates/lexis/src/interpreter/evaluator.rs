//! Entry evaluation engine.
//!
//! Walks an entry's expression tree against an argument map and the entries
//! of the same locale. Placeables are substituted with their values isolated
//! between U+2068 FIRST STRONG ISOLATE and U+2069 POP DIRECTIONAL ISOLATE.
//! Hash values pick a branch through the entry's index, one selector per
//! nesting level.

use std::collections::HashMap;

use crate::entry::{Entry, Expression, Hash};
use crate::interpreter::error::compute_suggestions;
use crate::interpreter::macros::Macro;
use crate::interpreter::plural::category_str;
use crate::interpreter::{EvalContext, EvalError};
use crate::types::Value;

/// Maximum number of placeables in one string.
pub const MAX_PLACEABLES: usize = 100;

/// Strings this long or longer cannot be substituted into a placeable.
pub const MAX_PLACEABLE_LENGTH: usize = 2500;

const FSI: char = '\u{2068}';
const PDI: char = '\u{2069}';

/// Source of sibling entries for identifier resolution.
pub trait EntryLookup {
    /// The entry defined under `id`, if any.
    fn lookup_entry(&self, id: &str) -> Option<&Entry>;
}

impl EntryLookup for HashMap<String, Entry> {
    fn lookup_entry(&self, id: &str) -> Option<&Entry> {
        self.get(id)
    }
}

/// What an evaluation can see besides its arguments.
#[derive(Clone, Copy)]
struct Scope<'e> {
    entries: &'e dyn EntryLookup,
    lang: &'e str,
}

/// Format the value of an entry.
///
/// Bare entries return their content without touching the context. Complex
/// entries push `id` on the call stack for the duration of the evaluation.
///
/// # Errors
///
/// Returns an error whose [`kind`](EvalError::kind) tells the caller how to
/// fall back:
/// - Runtime: unknown reference, macro misuse, cycle, limits
/// - Value: a string with failed placeables, carrying the partial text
/// - Index: the branch of a hash could not be determined
pub fn format_entry(
    id: &str,
    entry: &Entry,
    ctx: &mut EvalContext<'_>,
    entries: &dyn EntryLookup,
    lang: &str,
) -> Result<Value, EvalError> {
    format_entry_in(id, entry, ctx, Scope { entries, lang })
}

fn format_entry_in(
    id: &str,
    entry: &Entry,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<Value, EvalError> {
    let body = match entry {
        Entry::Bare(text) => return Ok(Value::String(text.clone())),
        Entry::Complex(body) => body,
    };
    let Some(value) = &body.value else {
        return Err(EvalError::MissingValue { id: id.to_string() });
    };

    ctx.push_call(id)?;
    let result = format_expr(value, &body.index, 0, ctx, scope);
    ctx.pop_call();
    result
}

/// Evaluate an expression. `depth` is the number of hashes entered so far,
/// which picks the selector from `index`.
fn format_expr(
    expr: &Expression,
    index: &[Expression],
    depth: usize,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<Value, EvalError> {
    match expr {
        Expression::String(s) => Ok(Value::String(s.clone())),
        Expression::Identifier(name) => resolve_identifier(name, ctx, scope),
        Expression::ComplexString(parts) => {
            format_complex_string(parts, index, depth, ctx, scope).map(Value::String)
        }
        Expression::Hash(hash) => {
            let branch = select_branch(hash, index.get(depth), ctx, scope)?;
            format_expr(branch, index, depth + 1, ctx, scope)
        }
        Expression::Call { callee, args } => {
            let call = eval_call(callee, args, ctx, scope)?;
            Ok(Value::String(
                category_str(call.mac.apply(scope.lang, call.n)).to_string(),
            ))
        }
    }
}

/// Resolve an identifier: macros first, then arguments, then entries.
fn resolve_identifier(
    name: &str,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<Value, EvalError> {
    if let Some(mac) = Macro::lookup(name) {
        return Err(EvalError::MacroArity {
            name: mac.name().to_string(),
            expected: mac.arity(),
            got: 0,
        });
    }

    if let Some(value) = ctx.get_arg(name) {
        if !value.is_valid_argument() {
            return Err(EvalError::InvalidArgument {
                name: name.to_string(),
            });
        }
        return Ok(value.clone());
    }

    if let Some(entry) = scope.entries.lookup_entry(name) {
        return format_entry_in(name, entry, ctx, scope);
    }

    Err(EvalError::UnknownReference {
        name: name.to_string(),
    })
}

/// Concatenate literal parts and placeables.
///
/// A placeable that fails is written back in source form and the string is
/// completed; the result is then a value error carrying that text. Cycles,
/// depth and size limits abort immediately.
fn format_complex_string(
    parts: &[Expression],
    index: &[Expression],
    depth: usize,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<String, EvalError> {
    let count = parts
        .iter()
        .filter(|part| !matches!(part, Expression::String(_)))
        .count();
    if count > MAX_PLACEABLES {
        return Err(EvalError::TooManyPlaceables {
            count,
            max: MAX_PLACEABLES,
        });
    }

    let mut output = String::new();
    let mut first_error: Option<EvalError> = None;
    for part in parts {
        if let Expression::String(literal) = part {
            output.push_str(literal);
            continue;
        }
        match format_placeable(part, index, depth, ctx, scope) {
            Ok(text) => {
                output.push(FSI);
                output.push_str(&text);
                output.push(PDI);
            }
            Err(err) if err.is_recoverable_in_placeable() => {
                output.push_str("{{ ");
                output.push_str(&part.to_string());
                output.push_str(" }}");
                first_error.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    match first_error {
        Some(source) => Err(EvalError::Value {
            partial: output,
            source: Box::new(source),
        }),
        None => Ok(output),
    }
}

fn format_placeable(
    expr: &Expression,
    index: &[Expression],
    depth: usize,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<String, EvalError> {
    let value = format_expr(expr, index, depth, ctx, scope)?;
    if let Value::String(_) = value {
        let length = value.char_len();
        if length >= MAX_PLACEABLE_LENGTH {
            return Err(EvalError::PlaceableTooLong {
                length,
                max: MAX_PLACEABLE_LENGTH,
            });
        }
    }
    Ok(value.to_string())
}

/// Pick the branch of a hash.
///
/// The selector decides the key. Without a selector, or when its key is not
/// a branch, the default key is tried. Selector failures are index errors.
fn select_branch<'h>(
    hash: &'h Hash,
    selector: Option<&Expression>,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<&'h Expression, EvalError> {
    let key = match selector {
        Some(selector) => Some(
            selector_key(selector, hash, ctx, scope).map_err(EvalError::into_index_error)?,
        ),
        None => None,
    };

    if let Some(branch) = key.as_ref().and_then(|key| hash.branches.get(key)) {
        return Ok(branch);
    }
    if let Some(branch) = hash.branches.get(hash.default_key()) {
        return Ok(branch);
    }

    let key = key.unwrap_or_else(|| hash.default_key().to_string());
    let available: Vec<String> = hash.branches.keys().cloned().collect();
    let suggestions = compute_suggestions(&key, &available);
    Err(EvalError::Index {
        source: Box::new(EvalError::MissingVariant {
            key,
            available,
            suggestions,
        }),
    })
}

/// Evaluate a selector to a hash key.
///
/// Macro calls produce a category, with exact-value branches taking
/// precedence for numeric arguments. Any other expression is formatted and its text is the key.
fn selector_key(
    selector: &Expression,
    hash: &Hash,
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<String, EvalError> {
    let Expression::Call { callee, args } = selector else {
        return format_expr(selector, &[], 0, ctx, scope).map(|value| value.to_string());
    };

    let call = eval_call(callee, args, ctx, scope)?;
    if call.numeric
        && let Some(exact) = call.mac.exact_key(call.n)
        && hash.branches.contains_key(exact)
    {
        return Ok(exact.to_string());
    }
    Ok(category_str(call.mac.apply(scope.lang, call.n)).to_string())
}

/// A checked macro call with its coerced argument.
struct MacroCall {
    mac: Macro,
    n: f64,
    /// The argument was a number, not a string parsed as one.
    numeric: bool,
}

/// Check a macro call and coerce its argument to a number.
fn eval_call(
    callee: &Expression,
    args: &[Expression],
    ctx: &mut EvalContext<'_>,
    scope: Scope<'_>,
) -> Result<MacroCall, EvalError> {
    let mac = match callee {
        Expression::Identifier(name) => {
            Macro::lookup(name).ok_or_else(|| EvalError::NotAMacro { name: name.clone() })?
        }
        other => {
            return Err(EvalError::NotAMacro {
                name: other.to_string(),
            });
        }
    };

    let [arg] = args else {
        return Err(EvalError::MacroArity {
            name: mac.name().to_string(),
            expected: mac.arity(),
            got: args.len(),
        });
    };

    let value = format_expr(arg, &[], 0, ctx, scope)?;
    let n = value.to_number().ok_or_else(|| EvalError::NonNumericArgument {
        name: mac.name().to_string(),
        value: value.to_string(),
    })?;
    Ok(MacroCall {
        mac,
        n,
        numeric: value.as_number().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::create_entries;
    use crate::interpreter::ErrorKind;
    use crate::parser::parse_properties;

    fn format(source: &str, id: &str, args: &HashMap<String, Value>) -> Result<Value, EvalError> {
        let entries = create_entries(parse_properties(source).unwrap());
        let mut ctx = EvalContext::new(args);
        format_entry(id, &entries[id], &mut ctx, &entries, "en")
    }

    #[test]
    fn placeables_are_isolated() {
        let args = HashMap::from([("n".to_string(), Value::Number(3))]);
        let value = format("unread = Unread: {{ n }}", "unread", &args).unwrap();
        assert_eq!(value.to_string(), "Unread: \u{2068}3\u{2069}");
    }

    #[test]
    fn call_stack_is_empty_after_failure() {
        let entries = create_entries(parse_properties("a = {{ missing }}").unwrap());
        let args = HashMap::new();
        let mut ctx = EvalContext::new(&args);
        let err = format_entry("a", &entries["a"], &mut ctx, &entries, "en").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(ctx.call_stack().is_empty());
    }

    #[test]
    fn too_many_placeables() {
        let source = format!("many = {}", "{{ n }}".repeat(MAX_PLACEABLES + 1));
        let args = HashMap::from([("n".to_string(), Value::Number(1))]);
        let err = format(&source, "many", &args).unwrap_err();
        assert_eq!(
            err,
            EvalError::TooManyPlaceables {
                count: MAX_PLACEABLES + 1,
                max: MAX_PLACEABLES
            }
        );
    }

    #[test]
    fn long_placeable_is_rejected() {
        let args = HashMap::from([(
            "s".to_string(),
            Value::String("x".repeat(MAX_PLACEABLE_LENGTH)),
        )]);
        let err = format("long = {{ s }}", "long", &args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);

        let args = HashMap::from([(
            "s".to_string(),
            Value::String("x".repeat(MAX_PLACEABLE_LENGTH - 1)),
        )]);
        assert!(format("long = {{ s }}", "long", &args).is_ok());
    }
}
