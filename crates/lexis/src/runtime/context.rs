//! Resolution sessions with language fallback.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::entry::Entry;
use crate::interpreter::{EvalContext, EvalError, format_entry};
use crate::runtime::{ContextError, Diagnostic, Env, Locale, ResourceFetcher, negotiate_languages};
use crate::types::{Language, Value};

/// Progress of a context towards resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    /// No languages requested yet.
    Unrequested,
    /// Languages negotiated; the first locale is not built yet.
    Fetching,
    /// The first locale of the chain is built.
    Ready,
}

/// A resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub value: String,
    /// Language that produced the value; `None` when every language failed
    /// and the value is the bracketed id.
    pub language: Option<String>,
}

/// A resolved entity: its value and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTranslation {
    /// `None` for entries that only carry attributes.
    pub value: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub language: Option<String>,
}

/// One consumer's view of the resources: an ordered list of resource ids
/// resolved through a fallback chain of languages.
///
/// Locales are built lazily. The first one is built by [`ready`](Self::ready)
/// or by the first resolution; later ones only when fallback reaches them.
/// Resolution never fails because of missing or broken translations: those
/// are reported on the environment's diagnostic stream and the next language
/// is tried. The worst case result is the id in brackets.
pub struct Context<F> {
    env: Arc<Env<F>>,
    res_ids: Vec<String>,
    languages: Vec<Language>,
    locales: Vec<OnceCell<Arc<Locale>>>,
}

/// Where the value of an id came from.
struct Found {
    value: Option<String>,
    locale: Option<Arc<Locale>>,
}

impl<F: ResourceFetcher> Context<F> {
    pub(crate) fn new(env: Arc<Env<F>>, res_ids: Vec<String>) -> Self {
        Self {
            env,
            res_ids,
            languages: Vec::new(),
            locales: Vec::new(),
        }
    }

    pub fn resource_ids(&self) -> &[String] {
        &self.res_ids
    }

    /// The negotiated fallback chain, most preferred first.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn state(&self) -> ReadyState {
        match self.locales.first() {
            None => ReadyState::Unrequested,
            Some(cell) if cell.initialized() => ReadyState::Ready,
            Some(_) => ReadyState::Fetching,
        }
    }

    /// Negotiate the fallback chain from the consumer's preferred languages.
    ///
    /// Requesting again replaces the chain and drops the locales built for
    /// the previous one; cached resources stay in the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidLanguage`] for a malformed tag and
    /// [`ContextError::EmptyLanguageList`] when `requested` is empty.
    pub fn request_languages(
        &mut self,
        requested: &[impl AsRef<str>],
    ) -> Result<&[Language], ContextError> {
        let chain = negotiate_languages(
            self.env.default_language(),
            self.env.available_languages(),
            requested,
        )?;
        debug!(?chain, "negotiated languages");
        self.languages = chain.into_iter().map(Language::new).collect();
        self.locales = self.languages.iter().map(|_| OnceCell::new()).collect();
        Ok(&self.languages)
    }

    /// Build the first locale of the chain.
    pub async fn ready(&self) -> Result<(), ContextError> {
        if self.languages.is_empty() {
            return Err(ContextError::NotRequested);
        }
        self.locale(0).await;
        Ok(())
    }

    /// Resolve the value of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NotRequested`] before languages were requested.
    pub async fn resolve_value(
        &self,
        id: &str,
        args: &HashMap<String, Value>,
    ) -> Result<Translation, ContextError> {
        let found = self.find(id, args, false).await?;
        Ok(Translation {
            value: found.value.unwrap_or_else(|| format!("[{id}]")),
            language: found.locale.map(|locale| locale.language().code().to_string()),
        })
    }

    /// Resolve the value and attributes of `id`.
    ///
    /// Attributes come from the language that produced the value. An
    /// attribute that fails to evaluate is left out.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NotRequested`] before languages were requested.
    pub async fn resolve_entity(
        &self,
        id: &str,
        args: &HashMap<String, Value>,
    ) -> Result<EntityTranslation, ContextError> {
        let found = self.find(id, args, true).await?;
        let Some(locale) = found.locale else {
            return Ok(EntityTranslation {
                value: Some(format!("[{id}]")),
                ..EntityTranslation::default()
            });
        };
        let attributes = self.format_attributes(id, &locale, args);
        Ok(EntityTranslation {
            value: found.value,
            attributes,
            language: Some(locale.language().code().to_string()),
        })
    }

    /// Resolve several values in order.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NotRequested`] before languages were requested.
    pub async fn resolve_values(
        &self,
        requests: &[(&str, &HashMap<String, Value>)],
    ) -> Result<Vec<Translation>, ContextError> {
        let mut translations = Vec::with_capacity(requests.len());
        for (id, args) in requests {
            translations.push(self.resolve_value(id, args).await?);
        }
        Ok(translations)
    }

    /// Walk the chain until a language produces the value of `id`.
    ///
    /// Partial text of the first value error is kept as a salvage and used
    /// when no language succeeds. Entities may lack a value; plain value
    /// resolution treats that as a failure, and entity resolution prefers an
    /// earlier salvage over a later entry without a value.
    async fn find(
        &self,
        id: &str,
        args: &HashMap<String, Value>,
        allow_missing_value: bool,
    ) -> Result<Found, ContextError> {
        if self.languages.is_empty() {
            return Err(ContextError::NotRequested);
        }

        let mut salvage: Option<Found> = None;
        for position in 0..self.languages.len() {
            let locale = self.locale(position).await;
            let code = locale.language().code();
            let Some(entry) = locale.get_entry(id) else {
                self.env.report(Diagnostic::not_found(code, id));
                continue;
            };
            if allow_missing_value && !has_value(entry) {
                return Ok(salvage.unwrap_or(Found {
                    value: None,
                    locale: Some(locale),
                }));
            }

            let mut ctx = EvalContext::new(args);
            let plural_language = locale.plural_language();
            let result = format_entry(id, entry, &mut ctx, locale.as_ref(), plural_language);
            match result {
                Ok(value) => {
                    return Ok(Found {
                        value: Some(value.to_string()),
                        locale: Some(locale),
                    });
                }
                Err(err) => {
                    self.report_failure(code, id, &err);
                    if salvage.is_none()
                        && let Some(partial) = err.partial()
                    {
                        salvage = Some(Found {
                            value: Some(partial.to_string()),
                            locale: Some(Arc::clone(&locale)),
                        });
                    }
                }
            }
        }

        Ok(salvage.unwrap_or(Found {
            value: None,
            locale: None,
        }))
    }

    fn format_attributes(
        &self,
        id: &str,
        locale: &Locale,
        args: &HashMap<String, Value>,
    ) -> BTreeMap<String, String> {
        let Some(attributes) = locale.get_entry(id).and_then(Entry::attributes) else {
            return BTreeMap::new();
        };
        let code = locale.language().code();
        let mut formatted = BTreeMap::new();
        for (name, attribute) in attributes {
            let attribute_id = format!("{id}.{name}");
            let mut ctx = EvalContext::new(args);
            let result = format_entry(
                &attribute_id,
                attribute,
                &mut ctx,
                locale,
                locale.plural_language(),
            );
            match result {
                Ok(value) => {
                    formatted.insert(name.clone(), value.to_string());
                }
                Err(err) => self.report_failure(code, &attribute_id, &err),
            }
        }
        formatted
    }

    fn report_failure(&self, language: &str, id: &str, err: &EvalError) {
        self.env
            .report(Diagnostic::resolve(language, id, err.kind(), err.to_string()));
    }

    /// The locale at `position` of the chain, built on first use.
    async fn locale(&self, position: usize) -> Arc<Locale> {
        let language = &self.languages[position];
        let locale = self.locales[position]
            .get_or_init(|| self.build_locale(language))
            .await;
        Arc::clone(locale)
    }

    async fn build_locale(&self, language: &Language) -> Arc<Locale> {
        let code = language.code();
        debug!(language = code, resources = self.res_ids.len(), "building locale");
        let slots = join_all(
            self.res_ids
                .iter()
                .map(|res_id| self.env.get_resource(res_id, code)),
        )
        .await;
        let resources = self.res_ids.iter().cloned().zip(slots).collect();
        let plural_language = self.env.plural_language(code).to_string();
        let locale = Locale::new(language.clone(), plural_language, resources);
        for (res_id, _) in locale.failed_resources() {
            debug!(language = code, res_id, "locale built without resource");
        }
        Arc::new(locale)
    }
}

fn has_value(entry: &Entry) -> bool {
    entry.body().is_none_or(|body| body.value.is_some())
}
