//! Error types for entry evaluation.

use strsim::levenshtein;
use thiserror::Error;

/// How the fallback protocol treats an evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed reference or macro misuse. Never salvaged.
    Runtime,
    /// A complex string could not substitute every placeable. The partial
    /// text may be shown if no fallback language does better.
    Value,
    /// The selector of a hash could not be evaluated, so the relevant
    /// branch is unknown. Never salvaged.
    Index,
}

/// An error that occurred during entry evaluation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// Identifier is neither a macro, an argument nor an entry.
    #[error("unknown reference: '{name}'")]
    UnknownReference { name: String },

    /// Argument value is not a string or a finite number.
    #[error("argument '{name}' must be a string or a finite number")]
    InvalidArgument { name: String },

    /// A call whose callee does not resolve to a macro.
    #[error("'{name}' is not a macro")]
    NotAMacro { name: String },

    /// Wrong number of arguments passed to a macro.
    #[error("macro '{name}' expects {expected} argument(s), got {got}")]
    MacroArity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A macro argument that does not coerce to a finite number.
    #[error("macro '{name}' expects a number, got '{value}'")]
    NonNumericArgument { name: String, value: String },

    /// A value-less entry referenced where a value is required.
    #[error("entry '{id}' has no value")]
    MissingValue { id: String },

    /// Cyclic reference detected during evaluation.
    #[error("cyclic reference detected: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// Maximum recursion depth exceeded.
    #[error("maximum recursion depth exceeded")]
    MaxDepthExceeded,

    /// A substituted value longer than the placeable limit.
    #[error("too many characters in placeable ({length}, max allowed is {max})")]
    PlaceableTooLong { length: usize, max: usize },

    /// More placeables in one string than allowed.
    #[error("too many placeables ({count}, max allowed is {max})")]
    TooManyPlaceables { count: usize, max: usize },

    /// No branch matched the selector and the hash has no default.
    #[error("{}", missing_variant_message(key, available, suggestions))]
    MissingVariant {
        key: String,
        available: Vec<String>,
        suggestions: Vec<String>,
    },

    /// A complex string with failed placeables.
    #[error("value error: {source}")]
    Value {
        /// Text assembled so far, failed placeables in source form.
        partial: String,
        source: Box<EvalError>,
    },

    /// The selector of a hash failed.
    #[error("index error: {source}")]
    Index { source: Box<EvalError> },
}

impl EvalError {
    /// Classify this error for the fallback protocol.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Value { .. } => ErrorKind::Value,
            EvalError::Index { .. } => ErrorKind::Index,
            _ => ErrorKind::Runtime,
        }
    }

    /// Partial text carried by a value error.
    pub fn partial(&self) -> Option<&str> {
        match self {
            EvalError::Value { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Wrap as an index error unless this already is one.
    pub(crate) fn into_index_error(self) -> EvalError {
        match self {
            EvalError::Index { .. } => self,
            other => EvalError::Index {
                source: Box::new(other),
            },
        }
    }

    /// Whether a placeable failing with this error may be rendered in
    /// source form. Cycles and the size limits abort the whole string.
    pub(crate) fn is_recoverable_in_placeable(&self) -> bool {
        !matches!(
            self,
            EvalError::CyclicReference { .. }
                | EvalError::MaxDepthExceeded
                | EvalError::PlaceableTooLong { .. }
                | EvalError::TooManyPlaceables { .. }
        )
    }
}

fn missing_variant_message(key: &str, available: &[String], suggestions: &[String]) -> String {
    let mut message = format!(
        "missing variant '{key}', available: {}",
        available.join(", ")
    );
    if !suggestions.is_empty() {
        message.push_str(&format!("; did you mean: {}?", suggestions.join(", ")));
    }
    message
}

/// Compute up to three keys close to `key` by edit distance.
///
/// Keys longer than three characters tolerate a distance of two, shorter
/// keys a distance of one. Closest keys come first.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.chars().count() > 3 { 2 } else { 1 };
    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (levenshtein(key, candidate), candidate))
        .filter(|(distance, _)| *distance > 0 && *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
