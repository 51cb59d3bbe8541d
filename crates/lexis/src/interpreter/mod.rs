//! Lexis interpreter for evaluating entries.
//!
//! This module provides the evaluation engine that takes compiled entries
//! and produces formatted values. It resolves references to arguments and
//! sibling entries, selects hash branches through macros such as `plural`,
//! and substitutes placeables.

mod context;
mod error;
mod evaluator;
mod macros;
mod plural;

pub use context::{DEFAULT_MAX_DEPTH, EvalContext};
pub use error::{ErrorKind, EvalError, compute_suggestions};
pub use evaluator::{EntryLookup, MAX_PLACEABLE_LENGTH, MAX_PLACEABLES, format_entry};
pub use macros::Macro;
pub use plural::{category_str, plural_category};
