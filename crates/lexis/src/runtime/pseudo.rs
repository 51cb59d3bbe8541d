//! Built-in pseudo-locales.
//!
//! Pseudo-locales are derived from the default language's resources to
//! exercise layouts without real translations. Only literal text changes:
//! identifiers, placeables, hash keys and indexes are kept, and so are
//! markup tags and character references inside literals.

use std::collections::HashMap;

use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

use crate::entry::{Entry, EntryBody, Expression, Hash};
use crate::types::Direction;

const ACCENTED_UPPER: [char; 26] = [
    'Ȧ', 'Ɓ', 'Ƈ', 'Ḓ', 'Ḗ', 'Ƒ', 'Ɠ', 'Ħ', 'Ī', 'Ĵ', 'Ķ', 'Ŀ', 'Ḿ', 'Ƞ', 'Ǿ', 'Ƥ', 'Ɋ', 'Ř', 'Ş',
    'Ŧ', 'Ŭ', 'Ṽ', 'Ẇ', 'Ẋ', 'Ẏ', 'Ẑ',
];
const ACCENTED_LOWER: [char; 26] = [
    'ȧ', 'ƀ', 'ƈ', 'ḓ', 'ḗ', 'ƒ', 'ɠ', 'ħ', 'ī', 'ĵ', 'ķ', 'ŀ', 'ḿ', 'ƞ', 'ǿ', 'ƥ', 'ɋ', 'ř', 'ş',
    'ŧ', 'ŭ', 'ṽ', 'ẇ', 'ẋ', 'ẏ', 'ẑ',
];
const FLIPPED_UPPER: [char; 26] = [
    '∀', 'Ԑ', 'Ↄ', 'ᗡ', 'Ǝ', 'Ⅎ', '⅁', 'H', 'I', 'ſ', 'Ӽ', '˥', 'W', 'N', 'O', 'Ԁ', 'Ò', 'ᴚ', 'S',
    '⊥', '∩', 'Ʌ', 'M', 'X', '⅄', 'Z',
];
const FLIPPED_LOWER: [char; 26] = [
    'ɐ', 'q', 'ɔ', 'p', 'ǝ', 'ɟ', 'ƃ', 'ɥ', 'ı', 'ɾ', 'ʞ', 'ʅ', 'ɯ', 'u', 'o', 'd', 'b', 'ɹ', 's',
    'ʇ', 'n', 'ʌ', 'ʍ', 'x', 'ʎ', 'z',
];

const RLO: char = '\u{202e}';
const PDF: char = '\u{202c}';

/// A pseudo-localization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoStrategy {
    /// `qps-ploc`: accented letters, vowels doubled.
    Accented,
    /// `qps-plocm`: flipped letters, words forced right-to-left.
    Mirrored,
}

impl PseudoStrategy {
    /// The strategy registered under a language code.
    pub fn for_code(code: &str) -> Option<PseudoStrategy> {
        match code {
            "qps-ploc" => Some(PseudoStrategy::Accented),
            "qps-plocm" => Some(PseudoStrategy::Mirrored),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PseudoStrategy::Accented => "qps-ploc",
            PseudoStrategy::Mirrored => "qps-plocm",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            PseudoStrategy::Accented => Direction::Ltr,
            PseudoStrategy::Mirrored => Direction::Rtl,
        }
    }

    /// Transform literal text, leaving markup untouched.
    ///
    /// ```
    /// use lexis::runtime::PseudoStrategy;
    ///
    /// assert_eq!(PseudoStrategy::Accented.translate("Hi <b>you</b>"), "Ħīī <b>ẏǿǿŭŭ</b>");
    /// ```
    pub fn translate(self, text: &str) -> String {
        let mut output = String::with_capacity(text.len() * 2);
        for segment in segments(text) {
            match segment {
                Segment::Markup(markup) => output.push_str(markup),
                Segment::Text(text) => match self {
                    PseudoStrategy::Accented => accent(text, &mut output),
                    PseudoStrategy::Mirrored => mirror(text, &mut output),
                },
            }
        }
        output
    }

    /// Derive the pseudo entries of a resource from its source entries.
    pub fn transform_entries(self, entries: &HashMap<String, Entry>) -> HashMap<String, Entry> {
        entries
            .iter()
            .map(|(id, entry)| (id.clone(), self.transform_entry(entry)))
            .collect()
    }

    fn transform_entry(self, entry: &Entry) -> Entry {
        match entry {
            Entry::Bare(text) => Entry::Bare(self.translate(text)),
            Entry::Complex(body) => Entry::Complex(Box::new(EntryBody {
                value: body.value.as_ref().map(|value| self.transform_expr(value)),
                index: body.index.clone(),
                attributes: body
                    .attributes
                    .iter()
                    .map(|(name, attr)| (name.clone(), self.transform_entry(attr)))
                    .collect(),
            })),
        }
    }

    fn transform_expr(self, expr: &Expression) -> Expression {
        match expr {
            Expression::String(text) => Expression::String(self.translate(text)),
            Expression::ComplexString(parts) => Expression::ComplexString(
                parts.iter().map(|part| self.transform_expr(part)).collect(),
            ),
            Expression::Hash(hash) => Expression::Hash(Hash {
                branches: hash
                    .branches
                    .iter()
                    .map(|(key, branch)| (key.clone(), self.transform_expr(branch)))
                    .collect(),
                default_key: hash.default_key.clone(),
            }),
            Expression::Identifier(_) | Expression::Call { .. } => expr.clone(),
        }
    }
}

fn accent(text: &str, output: &mut String) {
    for c in text.chars() {
        let mapped = map_letter(c, &ACCENTED_UPPER, &ACCENTED_LOWER);
        output.push(mapped);
        if matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u') {
            output.push(mapped);
        }
    }
}

fn mirror(text: &str, output: &mut String) {
    let mut in_word = false;
    for c in text.chars() {
        let word_char = c.is_ascii_alphanumeric() || c == '_';
        if word_char && !in_word {
            output.push(RLO);
        } else if !word_char && in_word {
            output.push(PDF);
        }
        in_word = word_char;
        output.push(map_letter(c, &FLIPPED_UPPER, &FLIPPED_LOWER));
    }
    if in_word {
        output.push(PDF);
    }
}

fn map_letter(c: char, upper: &[char; 26], lower: &[char; 26]) -> char {
    let table = match c {
        'A'..='Z' => upper,
        'a'..='z' => lower,
        _ => return c,
    };
    let offset = u32::from(c.to_ascii_lowercase()) - u32::from('a');
    usize::try_from(offset)
        .ok()
        .and_then(|offset| table.get(offset))
        .copied()
        .unwrap_or(c)
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Markup(&'a str),
}

/// Split literal text into markup (`<…>` tags, `&…;` references) and text.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut input = text;
    let parsed: ModalResult<Vec<Segment<'_>>> =
        repeat(0.., alt((markup, text_run))).parse_next(&mut input);
    match parsed {
        Ok(parts) if input.is_empty() => parts,
        Ok(_) | Err(_) => vec![Segment::Text(text)],
    }
}

fn markup<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    alt((
        delimited('<', take_till(1.., '>'), '>'),
        delimited(
            '&',
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '#'),
            ';',
        ),
    ))
    .take()
    .map(Segment::Markup)
    .parse_next(input)
}

/// Text up to the next `<` or `&`, or a lone `<` / `&` that opens no markup.
fn text_run<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    alt((take_till(1.., ['<', '&']), any.take()))
        .map(Segment::Text)
        .parse_next(input)
}
