//! The shared environment: fetcher, parsers and the resource cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use bon::bon;
use tokio::sync::{OnceCell, broadcast};
use tracing::{debug, error, warn};

use crate::entry::{Entry, create_entries};
use crate::parser::{ParserRegistry, extension_of};
use crate::runtime::{
    Context, Diagnostic, DiagnosticDetail, LoadError, PseudoStrategy, ResourceFetcher,
    ResourceSlot,
};

/// Default capacity of the diagnostic channel.
pub const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 64;

type SlotCell = Arc<OnceCell<ResourceSlot>>;

/// Shared state behind every [`Context`] of an application.
///
/// The environment owns the fetcher, the parser registry and a cache of
/// loaded resources keyed by `(resource id, language)`. Each key is fetched
/// and parsed at most once: concurrent requests for the same key wait on the
/// same initialization, and failures are cached like successes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use lexis::runtime::{Env, MemoryFetcher};
///
/// let fetcher = MemoryFetcher::new().with("app.properties", "en-US", "hello = Hello");
/// let env = Arc::new(
///     Env::builder()
///         .fetcher(fetcher)
///         .default_language("en-US")
///         .available_languages(vec!["en-US".to_string(), "fr".to_string()])
///         .build(),
/// );
/// let ctx = env.create_context(["app.properties"]);
/// assert_eq!(ctx.resource_ids(), ["app.properties"]);
/// ```
pub struct Env<F> {
    fetcher: F,
    default_language: String,
    available_languages: Vec<String>,
    parsers: ParserRegistry,
    cache: Mutex<HashMap<(String, String), SlotCell>>,
    diagnostics: broadcast::Sender<Diagnostic>,
}

#[bon]
impl<F: ResourceFetcher> Env<F> {
    #[builder]
    pub fn new(
        fetcher: F,
        #[builder(into)] default_language: String,
        #[builder(default)] available_languages: Vec<String>,
        #[builder(default)] parsers: ParserRegistry,
        #[builder(default = DEFAULT_DIAGNOSTIC_CAPACITY)] diagnostic_capacity: usize,
    ) -> Self {
        let (diagnostics, _) = broadcast::channel(diagnostic_capacity.max(1));
        Self {
            fetcher,
            default_language,
            available_languages,
            parsers,
            cache: Mutex::new(HashMap::new()),
            diagnostics,
        }
    }
}

impl<F: ResourceFetcher> Env<F> {
    /// Language every fallback chain ends with.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Languages the application ships resources for.
    pub fn available_languages(&self) -> &[String] {
        &self.available_languages
    }

    /// Create a context over an ordered list of resources.
    pub fn create_context(
        self: &Arc<Self>,
        res_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Context<F> {
        Context::new(Arc::clone(self), res_ids.into_iter().map(Into::into).collect())
    }

    /// Subscribe to the diagnostic stream.
    ///
    /// Receivers only see diagnostics emitted after they subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<Diagnostic> {
        self.diagnostics.subscribe()
    }

    /// Drop every cached resource; later loads fetch again.
    ///
    /// Locales already built by existing contexts keep their resources.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(slots = cache.len(), "invalidating resource cache");
        cache.clear();
    }

    /// Language whose plural rules apply to `language`.
    pub fn plural_language<'a>(&'a self, language: &'a str) -> &'a str {
        if self.derives_pseudo(language).is_some() {
            &self.default_language
        } else {
            language
        }
    }

    /// Load one resource in one language, through the cache.
    pub async fn get_resource(&self, res_id: &str, language: &str) -> ResourceSlot {
        match self.derives_pseudo(language) {
            Some(strategy) => {
                self.cached(res_id, language, self.load_pseudo(res_id, strategy))
                    .await
            }
            None => {
                self.cached(res_id, language, self.load(res_id, language))
                    .await
            }
        }
    }

    /// Report a diagnostic to subscribers and to the log.
    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic.detail {
            DiagnosticDetail::Load { .. } => error!(%diagnostic, "resource failed to load"),
            DiagnosticDetail::NotFound { .. } | DiagnosticDetail::Resolve { .. } => {
                warn!(%diagnostic, "falling back");
            }
        }
        // No receivers is not an error.
        let _ = self.diagnostics.send(diagnostic);
    }

    /// The pseudo strategy for `language`, unless the application ships
    /// real resources under that code.
    fn derives_pseudo(&self, language: &str) -> Option<PseudoStrategy> {
        PseudoStrategy::for_code(language)
            .filter(|_| !self.available_languages.iter().any(|code| code == language))
    }

    async fn cached(
        &self,
        res_id: &str,
        language: &str,
        init: impl Future<Output = ResourceSlot>,
    ) -> ResourceSlot {
        let cell = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                cache
                    .entry((res_id.to_string(), language.to_string()))
                    .or_default(),
            )
        };
        if let Some(slot) = cell.get() {
            debug!(res_id, language, "resource cache hit");
            return Arc::clone(slot);
        }
        Arc::clone(cell.get_or_init(|| init).await)
    }

    async fn load(&self, res_id: &str, language: &str) -> ResourceSlot {
        debug!(res_id, language, "loading resource");
        let result = self.fetch_and_parse(res_id, language).await;
        if let Err(err) = &result {
            self.report(Diagnostic::load(language, err.res_id(), err.to_string()));
        }
        Arc::new(result)
    }

    async fn fetch_and_parse(
        &self,
        res_id: &str,
        language: &str,
    ) -> Result<HashMap<String, Entry>, LoadError> {
        let Some(parser) = self.parsers.for_resource(res_id) else {
            return Err(LoadError::UnknownFormat {
                res_id: res_id.to_string(),
                extension: extension_of(res_id).to_string(),
            });
        };
        let source = self
            .fetcher
            .fetch(res_id, language)
            .await
            .map_err(|source| LoadError::Fetch {
                res_id: res_id.to_string(),
                language: language.to_string(),
                source,
            })?;
        let nodes = parser.parse(&source).map_err(|err| LoadError::Parse {
            res_id: res_id.to_string(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        })?;
        Ok(create_entries(nodes))
    }

    async fn load_pseudo(&self, res_id: &str, strategy: PseudoStrategy) -> ResourceSlot {
        let default = self.default_language.as_str();
        let base = self
            .cached(res_id, default, self.load(res_id, default))
            .await;
        match base.as_ref() {
            Ok(entries) => {
                debug!(res_id, language = strategy.code(), "deriving pseudo-locale");
                Arc::new(Ok(strategy.transform_entries(entries)))
            }
            Err(_) => base,
        }
    }
}
