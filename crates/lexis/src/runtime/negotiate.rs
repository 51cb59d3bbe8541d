//! Fallback chain negotiation.

use icu_locale_core::Locale;

use crate::runtime::{ContextError, PseudoStrategy};

/// Build a fallback chain from the languages a consumer asked for.
///
/// Each requested tag picks an available language: an exact match first
/// (ASCII case-insensitive, `_` read as `-`), otherwise the first available
/// language with the same primary subtag. Pseudo-locales are always
/// available but only match exactly. The chain never repeats a language and
/// always ends with `default`, spelled as the environment spells it.
///
/// # Errors
///
/// Returns [`ContextError::InvalidLanguage`] for a tag that is not
/// well-formed BCP 47 and [`ContextError::EmptyLanguageList`] when nothing
/// was requested.
///
/// # Example
///
/// ```
/// use lexis::runtime::negotiate_languages;
///
/// let available = ["en-US".to_string(), "fr".to_string(), "pt-BR".to_string()];
/// let chain = negotiate_languages("en-US", &available, &["pt_PT", "FR"]).unwrap();
/// assert_eq!(chain, ["pt-BR", "fr", "en-US"]);
/// ```
pub fn negotiate_languages(
    default: &str,
    available: &[String],
    requested: &[impl AsRef<str>],
) -> Result<Vec<String>, ContextError> {
    if requested.is_empty() {
        return Err(ContextError::EmptyLanguageList);
    }

    let mut chain: Vec<String> = Vec::new();
    for tag in requested {
        let tag = tag.as_ref();
        validate_tag(tag)?;
        if let Some(found) = match_language(tag, available)
            && !chain.iter().any(|code| same_tag(code, &found))
        {
            chain.push(found);
        }
    }

    if !chain.iter().any(|code| same_tag(code, default)) {
        chain.push(default.to_string());
    }
    Ok(chain)
}

fn validate_tag(tag: &str) -> Result<(), ContextError> {
    normalize(tag)
        .parse::<Locale>()
        .map(|_| ())
        .map_err(|_| ContextError::InvalidLanguage {
            tag: tag.to_string(),
        })
}

fn match_language(tag: &str, available: &[String]) -> Option<String> {
    if let Some(strategy) = PseudoStrategy::for_code(&normalize(tag)) {
        return Some(strategy.code().to_string());
    }
    if let Some(exact) = available.iter().find(|code| same_tag(code, tag)) {
        return Some(exact.clone());
    }
    let primary = primary_subtag(tag);
    available
        .iter()
        .find(|code| PseudoStrategy::for_code(code).is_none() && primary_subtag(code) == primary)
        .cloned()
}

fn normalize(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn same_tag(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn primary_subtag(tag: &str) -> String {
    let normalized = normalize(tag);
    normalized
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}
