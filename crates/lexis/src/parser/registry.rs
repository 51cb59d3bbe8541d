//! Pluggable parsers keyed by resource file extension.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use super::ast::EntryNode;
use super::error::ParseError;
use super::json::parse_json;
use super::properties::parse_properties;

/// Turns resource text into entry nodes.
pub trait ResourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<Vec<EntryNode>, ParseError>;
}

impl<F> ResourceParser for F
where
    F: Fn(&str) -> Result<Vec<EntryNode>, ParseError> + Send + Sync,
{
    fn parse(&self, source: &str) -> Result<Vec<EntryNode>, ParseError> {
        self(source)
    }
}

/// Registry of parsers by file extension (without the dot).
///
/// The default registry knows `properties` and `json`.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn ResourceParser>>,
}

impl ParserRegistry {
    /// Create a registry with no parsers.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Register a parser, replacing any parser for the same extension.
    pub fn register(&mut self, extension: impl Into<String>, parser: impl ResourceParser + 'static) {
        self.parsers.insert(extension.into(), Arc::new(parser));
    }

    /// Get the parser for an extension.
    pub fn get(&self, extension: &str) -> Option<&dyn ResourceParser> {
        self.parsers.get(extension).map(|parser| parser.as_ref())
    }

    /// Get the parser for a resource id, using the text after its last `.`.
    pub fn for_resource(&self, res_id: &str) -> Option<&dyn ResourceParser> {
        self.get(extension_of(res_id))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("properties", parse_properties);
        registry.register("json", parse_json);
        registry
    }
}

impl Debug for ParserRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut extensions: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        f.debug_struct("ParserRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

/// The extension of a resource id, or `""` when it has none.
pub fn extension_of(res_id: &str) -> &str {
    res_id
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains('/'))
        .unwrap_or_default()
}
