//! Error types for resource loading and context use.

use std::io;

use thiserror::Error;

/// An error returned synchronously by the context API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// Resolution attempted before a language chain was negotiated.
    #[error("no languages have been requested for this context")]
    NotRequested,

    /// A requested language tag is not well-formed BCP 47.
    #[error("invalid language tag '{tag}'")]
    InvalidLanguage { tag: String },

    /// `request_languages` was called with no languages.
    #[error("at least one language must be requested")]
    EmptyLanguageList,
}

/// An error reported by a [`ResourceFetcher`](crate::runtime::ResourceFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The resource does not exist for this language.
    #[error("resource '{res_id}' not found for '{language}'")]
    NotFound { res_id: String, language: String },

    /// Transport-level I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Any other fetcher-specific failure.
    #[error("{0}")]
    Other(String),
}

/// A resource that could not be loaded.
///
/// Load errors are cached in place of the resource and reported through
/// diagnostics. They never surface from the resolution API.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The fetcher failed.
    #[error("failed to fetch '{res_id}' for '{language}': {source}")]
    Fetch {
        res_id: String,
        language: String,
        #[source]
        source: FetchError,
    },

    /// The fetched text did not parse.
    #[error("{res_id}:{line}:{column}: {message}")]
    Parse {
        res_id: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// No parser is registered for the resource's extension.
    #[error("no parser for '{res_id}' (extension '{extension}')")]
    UnknownFormat { res_id: String, extension: String },
}

impl LoadError {
    /// Id of the resource that failed.
    pub fn res_id(&self) -> &str {
        match self {
            LoadError::Fetch { res_id, .. }
            | LoadError::Parse { res_id, .. }
            | LoadError::UnknownFormat { res_id, .. } => res_id,
        }
    }
}
