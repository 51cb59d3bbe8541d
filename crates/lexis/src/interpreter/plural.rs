//! CLDR plural category resolution.
//!
//! Different languages have different plural rules - English has "one" and
//! "other", Russian has "one", "few", "many" and "other", and Arabic uses all
//! six categories.
//!
//! Plural rules are cached per thread per language tag so that `PluralRules`
//! are not re-created on every selection. Tags that do not parse, and
//! languages without CLDR data, resolve with root rules, where every number
//! is "other".

use std::cell::RefCell;
use std::collections::HashMap;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by language tag. `None` marks
    /// a tag whose rules could not be built.
    static PLURAL_RULES_CACHE: RefCell<HashMap<String, Option<PluralRules>>> =
        RefCell::new(HashMap::new());
}

/// Build `PluralRules` for a language tag.
fn build_rules(tag: &str) -> Option<PluralRules> {
    let loc: Locale = tag.replace('_', "-").parse().ok()?;
    PluralRules::try_new(loc.into(), PluralRuleType::Cardinal.into()).ok()
}

/// Translate a `PluralCategory` enum to its string representation.
pub fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Operands for a finite number. Integral values are exact; fractional values
/// keep the digits of their shortest decimal form.
fn operands(n: f64) -> PluralOperands {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return PluralOperands::from(n as i64);
    }
    n.to_string()
        .parse::<PluralOperands>()
        .unwrap_or_else(|_| PluralOperands::from(n.trunc() as i64))
}

/// Get the CLDR plural category for a number in a given language.
///
/// Non-finite numbers are "other" in every language.
///
/// # Examples
///
/// ```
/// use icu_plurals::PluralCategory;
/// use lexis::interpreter::plural_category;
///
/// assert_eq!(plural_category("en-US", 1.0), PluralCategory::One);
/// assert_eq!(plural_category("en-US", 1.5), PluralCategory::Other);
/// assert_eq!(plural_category("ru", 2.0), PluralCategory::Few);
/// assert_eq!(plural_category("ru", 5.0), PluralCategory::Many);
/// assert_eq!(plural_category("not a tag", 1.0), PluralCategory::Other);
/// ```
pub fn plural_category(tag: &str, n: f64) -> PluralCategory {
    if !n.is_finite() {
        return PluralCategory::Other;
    }
    let operands = operands(n);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        let rules = cache
            .entry(tag.to_string())
            .or_insert_with(|| build_rules(tag));
        match rules {
            Some(rules) => rules.category_for(operands),
            None => PluralCategory::Other,
        }
    })
}
