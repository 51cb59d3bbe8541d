//! Non-fatal problems observed while resolving.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::interpreter::ErrorKind;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticDetail {
    /// An entry is missing from a language of the chain.
    NotFound { id: String },
    /// An entry or attribute failed to evaluate.
    Resolve {
        id: String,
        kind: ErrorKind,
        message: String,
    },
    /// A resource failed to fetch or parse.
    Load { res_id: String, message: String },
}

/// A problem reported on the diagnostic stream.
///
/// Diagnostics describe fallbacks and failed loads; they are never returned
/// as errors from the resolution API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Language the problem occurred in.
    pub language: String,
    pub detail: DiagnosticDetail,
}

impl Diagnostic {
    pub fn not_found(language: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            language: language.into(),
            detail: DiagnosticDetail::NotFound { id: id.into() },
        }
    }

    pub fn resolve(
        language: impl Into<String>,
        id: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            language: language.into(),
            detail: DiagnosticDetail::Resolve {
                id: id.into(),
                kind,
                message: message.into(),
            },
        }
    }

    pub fn load(
        language: impl Into<String>,
        res_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            language: language.into(),
            detail: DiagnosticDetail::Load {
                res_id: res_id.into(),
                message: message.into(),
            },
        }
    }

    /// Entry id the diagnostic is about, if any.
    pub fn id(&self) -> Option<&str> {
        match &self.detail {
            DiagnosticDetail::NotFound { id } | DiagnosticDetail::Resolve { id, .. } => Some(id),
            DiagnosticDetail::Load { .. } => None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let language = &self.language;
        match &self.detail {
            DiagnosticDetail::NotFound { id } => write!(f, "[{language}] '{id}' not found"),
            DiagnosticDetail::Resolve { id, kind, message } => {
                write!(f, "[{language}] '{id}' failed ({kind:?}): {message}")
            }
            DiagnosticDetail::Load { res_id, message } => {
                write!(f, "[{language}] cannot load '{res_id}': {message}")
            }
        }
    }
}
