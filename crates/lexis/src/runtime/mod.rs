//! Asynchronous resource loading and fallback resolution.
//!
//! An [`Env`] owns the fetcher and the resource cache. Each consumer creates
//! a [`Context`] over the resources it needs, requests its preferred
//! languages and resolves ids; missing or broken translations fall back
//! through the negotiated chain and are reported as [`Diagnostic`]s.

mod context;
mod diagnostic;
mod env;
mod error;
mod fetch;
mod locale;
mod negotiate;
mod pseudo;

pub use context::{Context, EntityTranslation, ReadyState, Translation};
pub use diagnostic::{Diagnostic, DiagnosticDetail, Severity};
pub use env::{DEFAULT_DIAGNOSTIC_CAPACITY, Env};
pub use error::{ContextError, FetchError, LoadError};
pub use fetch::{MemoryFetcher, ResourceFetcher};
pub use locale::{Locale, ResourceSlot};
pub use negotiate::negotiate_languages;
pub use pseudo::PseudoStrategy;
