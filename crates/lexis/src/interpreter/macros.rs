//! Engine-provided macros.

use icu_plurals::PluralCategory;

use crate::interpreter::plural::plural_category;

/// A callable selector provided by the engine.
///
/// Macros take precedence over arguments and entries of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macro {
    /// `plural(n)`: the CLDR cardinal category of `n`.
    Plural,
}

impl Macro {
    /// Look up a macro by name.
    pub fn lookup(name: &str) -> Option<Macro> {
        match name {
            "plural" => Some(Macro::Plural),
            _ => None,
        }
    }

    /// The name a macro is called by.
    pub fn name(self) -> &'static str {
        match self {
            Macro::Plural => "plural",
        }
    }

    /// Number of arguments the macro takes.
    pub fn arity(self) -> usize {
        match self {
            Macro::Plural => 1,
        }
    }

    /// Apply the macro to an already coerced argument.
    pub fn apply(self, lang: &str, n: f64) -> PluralCategory {
        match self {
            Macro::Plural => plural_category(lang, n),
        }
    }

    /// Hash key chosen ahead of the plural rules for the exact values 0, 1
    /// and 2, when the argument is numeric and the hash has a branch with
    /// that name.
    pub fn exact_key(self, n: f64) -> Option<&'static str> {
        match self {
            Macro::Plural if n == 0.0 => Some("zero"),
            Macro::Plural if n == 1.0 => Some("one"),
            Macro::Plural if n == 2.0 => Some("two"),
            Macro::Plural => None,
        }
    }
}
