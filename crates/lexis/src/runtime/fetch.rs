//! The resource transport boundary.

use std::collections::HashMap;
use std::future::{Future, ready};

use crate::runtime::FetchError;

/// Fetches the source text of a resource for a language.
///
/// The engine never retries or times out a fetch; an implementation that
/// needs either wraps its own transport. Each `(res_id, language)` pair is
/// fetched at most once per [`Env`](crate::runtime::Env) cache lifetime.
pub trait ResourceFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        res_id: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// A fetcher serving resources from memory.
///
/// # Example
///
/// ```
/// use lexis::runtime::MemoryFetcher;
///
/// let fetcher = MemoryFetcher::new()
///     .with("app.properties", "en-US", "hello = Hello")
///     .with("app.properties", "fr", "hello = Bonjour");
/// assert_eq!(fetcher.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    sources: HashMap<(String, String), String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the source of `res_id` in `language`.
    #[must_use]
    pub fn with(
        mut self,
        res_id: impl Into<String>,
        language: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.insert(res_id, language, source);
        self
    }

    /// Add or replace the source of `res_id` in `language`.
    pub fn insert(
        &mut self,
        res_id: impl Into<String>,
        language: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.sources
            .insert((res_id.into(), language.into()), source.into());
    }

    /// Number of stored sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn fetch(
        &self,
        res_id: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        let result = self
            .sources
            .get(&(res_id.to_string(), language.to_string()))
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                res_id: res_id.to_string(),
                language: language.to_string(),
            });
        ready(result)
    }
}
