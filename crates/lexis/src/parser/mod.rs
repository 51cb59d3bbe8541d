//! Resource parsers and the AST they produce.
//!
//! Parsing is a collaborator of the engine rather than part of it: the
//! engine consumes [`EntryNode`]s from whichever [`ResourceParser`] is
//! registered for a resource's extension. Two formats ship by default.

pub mod ast;
pub mod error;
mod json;
mod placeable;
mod properties;
mod registry;

pub use ast::*;
pub use error::ParseError;
pub use json::parse_json;
pub use placeable::{has_placeables, split_placeables};
pub use properties::parse_properties;
pub use registry::{ParserRegistry, ResourceParser, extension_of};
