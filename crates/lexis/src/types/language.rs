use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::runtime::PseudoStrategy;

/// Language subtags written right-to-left.
const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ps", "ur"];

/// Text direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// A language in a fallback chain.
///
/// # Example
///
/// ```
/// use lexis::{Direction, Language};
///
/// assert_eq!(Language::new("ar-EG").direction(), Direction::Rtl);
/// assert_eq!(Language::new("de").direction(), Direction::Ltr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    code: String,
    direction: Direction,
}

impl Language {
    /// Create a language, deriving its direction from the tag.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let direction = direction_of(&code);
        Self { code, direction }
    }

    /// The language tag.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code)
    }
}

fn direction_of(code: &str) -> Direction {
    if let Some(strategy) = PseudoStrategy::for_code(code) {
        return strategy.direction();
    }
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    if RTL_LANGUAGES.contains(&primary) {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}
