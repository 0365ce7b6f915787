//! Raw text to slug-safe text.

use std::collections::HashMap;

use slugline_data::{DEFAULT_SEPARATOR, SlugConfig};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Maps raw candidate text to a slug. An empty result means "skip this candidate".
///
/// Implementations must be deterministic and produce URL-safe output.
pub trait Normalizer {
    fn normalize(&self, raw: &str) -> String;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Letters with no canonical decomposition to ASCII.
const FALLBACK_TABLE: &[(char, &str)] = &[
    ('ß', "ss"),
    ('æ', "ae"),
    ('œ', "oe"),
    ('ø', "o"),
    ('đ', "d"),
    ('ð', "d"),
    ('þ', "th"),
    ('ł', "l"),
    ('ı', "i"),
    ('ħ', "h"),
];

const GERMAN_TABLE: &[(char, &str)] = &[('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")];

const SCANDINAVIAN_TABLE: &[(char, &str)] = &[('æ', "ae"), ('ø', "oe"), ('å', "aa")];

/// Built-in substitutions for a locale, or an empty table for unknown locales.
pub fn locale_table(locale: &str) -> &'static [(char, &'static str)] {
    match locale {
        "de" => GERMAN_TABLE,
        "da" | "nb" | "no" => SCANDINAVIAN_TABLE,
        _ => &[],
    }
}

/// Default normalization policy.
///
/// Lowercases, strips diacritics, applies locale substitutions, and turns any
/// run of disallowed characters into a single separator. Leading and trailing
/// separators are dropped, so whitespace-only input comes out empty.
///
/// ```
/// use slugline_engine::normalize::{Normalizer, SlugNormalizer};
///
/// let normalizer = SlugNormalizer::default();
/// assert_eq!(normalizer.normalize("Peugot 206"), "peugot-206");
/// assert_eq!(normalizer.normalize("  Crème Brûlée!! "), "creme-brulee");
/// assert_eq!(normalizer.normalize(" \t "), "");
/// ```
#[derive(Debug, Clone)]
pub struct SlugNormalizer {
    separator: String,
    substitutions: HashMap<char, String>,
    max_length: Option<usize>,
}

impl Default for SlugNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl SlugNormalizer {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            substitutions: HashMap::new(),
            max_length: None,
        }
    }

    /// Build the normalizer described by `config`.
    ///
    /// Explicit transliterations win over the locale table. Keys that are not
    /// a single character are ignored here; validation reports them.
    pub fn from_config(config: &SlugConfig) -> Self {
        let mut normalizer = Self::new(config.sequence_separator.clone());
        normalizer.max_length = config.max_length;
        if let Some(locale) = &config.locale {
            normalizer = normalizer.with_locale(locale);
        }
        for (from, to) in &config.transliterations {
            let mut chars = from.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                normalizer.substitutions.insert(ch, to.clone());
            }
        }
        normalizer
    }

    #[must_use]
    pub fn with_locale(mut self, locale: &str) -> Self {
        for (from, to) in locale_table(locale) {
            self.substitutions.insert(*from, (*to).to_string());
        }
        self
    }

    #[must_use]
    pub fn with_substitution(mut self, from: char, to: impl Into<String>) -> Self {
        self.substitutions.insert(from, to.into());
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn transliterate(ch: char, out: &mut SlugBuffer<'_>) {
        if is_combining_mark(ch) {
            return;
        }
        if let Some((_, ascii)) = FALLBACK_TABLE.iter().find(|(from, _)| *from == ch) {
            out.push_str(ascii);
            return;
        }
        let mut kept = false;
        for part in std::iter::once(ch).nfd() {
            if is_combining_mark(part) {
                continue;
            }
            if part.is_ascii_alphanumeric() {
                out.push(part.to_ascii_lowercase());
                kept = true;
            } else {
                out.boundary();
            }
        }
        if !kept {
            out.boundary();
        }
    }
}

impl Normalizer for SlugNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let mut out = SlugBuffer::new(&self.separator);
        for ch in raw.chars() {
            if let Some(replacement) = self.substitutions.get(&ch) {
                out.push_str(replacement);
                continue;
            }
            for lower in ch.to_lowercase() {
                if let Some(replacement) = self.substitutions.get(&lower) {
                    out.push_str(replacement);
                } else if lower.is_ascii_alphanumeric() {
                    out.push(lower);
                } else if lower.is_ascii() {
                    out.boundary();
                } else {
                    Self::transliterate(lower, &mut out);
                }
            }
        }

        let mut slug = out.finish();
        if let Some(max) = self.max_length
            && slug.len() > max
        {
            // output is pure ASCII, so any byte index is a char boundary
            slug.truncate(max);
            let kept = slug.trim_end_matches(|c| self.separator.contains(c)).len();
            slug.truncate(kept);
        }
        slug
    }
}

/// Normalize with the default policy and `-` separator.
pub fn normalize(raw: &str) -> String {
    SlugNormalizer::default().normalize(raw)
}

/// Accumulates slug characters, emitting at most one separator between runs.
struct SlugBuffer<'a> {
    slug: String,
    separator: &'a str,
    pending_separator: bool,
}

impl<'a> SlugBuffer<'a> {
    fn new(separator: &'a str) -> Self {
        Self {
            slug: String::new(),
            separator,
            pending_separator: false,
        }
    }

    fn push(&mut self, ch: char) {
        if self.pending_separator && !self.slug.is_empty() {
            self.slug.push_str(self.separator);
        }
        self.slug.push(ch);
        self.pending_separator = false;
    }

    fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_ascii_alphanumeric() {
                self.push(ch.to_ascii_lowercase());
            } else {
                self.boundary();
            }
        }
    }

    fn boundary(&mut self) {
        self.pending_separator = true;
    }

    fn finish(self) -> String {
        self.slug
    }
}
