//! A realized language of a context's fallback chain.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entry::Entry;
use crate::interpreter::EntryLookup;
use crate::runtime::LoadError;
use crate::types::Language;

/// The cached result of loading one resource in one language.
///
/// Failures are kept in the slot so that a broken resource is fetched once
/// and then contributes no entries.
pub type ResourceSlot = Arc<Result<HashMap<String, Entry>, LoadError>>;

/// All resources of a context, loaded for one language.
///
/// A locale exists only once every one of its resources has settled, either
/// loaded or failed.
#[derive(Debug)]
pub struct Locale {
    language: Language,
    /// Language whose plural rules apply; differs for pseudo-locales.
    plural_language: String,
    resources: Vec<(String, ResourceSlot)>,
}

impl Locale {
    pub(crate) fn new(
        language: Language,
        plural_language: String,
        resources: Vec<(String, ResourceSlot)>,
    ) -> Self {
        Self {
            language,
            plural_language,
            resources,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Language tag used to select plural categories.
    pub fn plural_language(&self) -> &str {
        &self.plural_language
    }

    /// The entry `id` from the first resource that defines it.
    pub fn get_entry(&self, id: &str) -> Option<&Entry> {
        self.resources
            .iter()
            .filter_map(|(_, slot)| slot.as_ref().as_ref().ok())
            .find_map(|entries| entries.get(id))
    }

    /// Resources that failed to load, in resource order.
    pub fn failed_resources(&self) -> impl Iterator<Item = (&str, &LoadError)> {
        self.resources.iter().filter_map(|(res_id, slot)| {
            let err = slot.as_ref().as_ref().err()?;
            Some((res_id.as_str(), err))
        })
    }
}

impl EntryLookup for Locale {
    fn lookup_entry(&self, id: &str) -> Option<&Entry> {
        self.get_entry(id)
    }
}
