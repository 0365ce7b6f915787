use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field that holds the persisted slug unless configured otherwise.
pub const DEFAULT_SLUG_FIELD: &str = "slug";
/// Separator used between slug parts and before a conflict token.
pub const DEFAULT_SEPARATOR: &str = "-";
/// Entity value that seeds the slug unless configured otherwise.
pub const DEFAULT_CANDIDATE_SOURCE: &str = "name";
/// Locales with a built-in transliteration table.
pub const SUPPORTED_LOCALES: &[&str] = &["da", "de", "nb", "no"];
/// Characters a sequence separator may be built from (RFC 3986 unreserved punctuation).
pub const SEPARATOR_CHARS: &[char] = &['-', '_', '.', '~'];

/// Top-level contents of a slug configuration file.
///
/// ```toml
/// [defaults]
/// sequence_separator = "-"
///
/// [entities.restaurant]
/// candidate_source = "name"
/// scope_field = "city"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlugConfigFile {
    #[serde(default)]
    pub defaults: SlugDefaults,
    #[serde(default)]
    pub entities: BTreeMap<String, SlugDef>,
}

impl SlugConfigFile {
    /// Resolve the configuration for one entity type.
    ///
    /// Entity types without their own section get the shared defaults.
    pub fn config_for(&self, entity_type: &str) -> SlugConfig {
        match self.entities.get(entity_type) {
            Some(def) => def.resolve(&self.defaults),
            None => SlugDef::default().resolve(&self.defaults),
        }
    }
}

/// Shared settings every entity type falls back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugDefaults {
    #[serde(default = "default_slug_field")]
    pub slug_field: String,
    #[serde(default = "default_separator")]
    pub sequence_separator: String,
    #[serde(default = "default_candidate_source")]
    pub candidate_source: String,
    #[serde(default = "default_reserved_words")]
    pub reserved_words: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub transliterations: BTreeMap<String, String>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl Default for SlugDefaults {
    fn default() -> Self {
        Self {
            slug_field: default_slug_field(),
            sequence_separator: default_separator(),
            candidate_source: default_candidate_source(),
            reserved_words: default_reserved_words(),
            locale: None,
            transliterations: BTreeMap::new(),
            max_length: None,
        }
    }
}

/// Per-entity overrides. Anything left unset falls back to [`SlugDefaults`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlugDef {
    pub slug_field: Option<String>,
    pub sequence_separator: Option<String>,
    pub candidate_source: Option<String>,
    /// Attribute whose value partitions the uniqueness scope (e.g. slugs unique per city).
    pub scope_field: Option<String>,
    pub reserved_words: Option<Vec<String>>,
    pub locale: Option<String>,
    /// Merged over the default transliterations, entity entries winning.
    #[serde(default)]
    pub transliterations: BTreeMap<String, String>,
    pub max_length: Option<usize>,
}

impl SlugDef {
    /// Layer these overrides over `defaults`, producing a fully resolved config.
    pub fn resolve(&self, defaults: &SlugDefaults) -> SlugConfig {
        let mut transliterations = defaults.transliterations.clone();
        transliterations.extend(self.transliterations.clone());

        SlugConfig {
            slug_field: self.slug_field.clone().unwrap_or_else(|| defaults.slug_field.clone()),
            sequence_separator: self
                .sequence_separator
                .clone()
                .unwrap_or_else(|| defaults.sequence_separator.clone()),
            candidate_source: self
                .candidate_source
                .clone()
                .unwrap_or_else(|| defaults.candidate_source.clone()),
            scope_field: self.scope_field.clone(),
            reserved_words: self
                .reserved_words
                .clone()
                .unwrap_or_else(|| defaults.reserved_words.clone()),
            locale: self.locale.clone().or_else(|| defaults.locale.clone()),
            transliterations,
            max_length: self.max_length.or(defaults.max_length),
        }
    }
}

/// Fully resolved slug configuration for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugConfig {
    pub slug_field: String,
    pub sequence_separator: String,
    pub candidate_source: String,
    pub scope_field: Option<String>,
    pub reserved_words: Vec<String>,
    pub locale: Option<String>,
    pub transliterations: BTreeMap<String, String>,
    pub max_length: Option<usize>,
}

impl Default for SlugConfig {
    fn default() -> Self {
        SlugDef::default().resolve(&SlugDefaults::default())
    }
}

impl SlugConfig {
    pub fn with_slug_field(mut self, field: impl Into<String>) -> Self {
        self.slug_field = field.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.sequence_separator = separator.into();
        self
    }

    pub fn with_candidate_source(mut self, source: impl Into<String>) -> Self {
        self.candidate_source = source.into();
        self
    }

    pub fn with_scope_field(mut self, field: impl Into<String>) -> Self {
        self.scope_field = Some(field.into());
        self
    }

    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

fn default_slug_field() -> String {
    DEFAULT_SLUG_FIELD.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_candidate_source() -> String {
    DEFAULT_CANDIDATE_SOURCE.to_string()
}

fn default_reserved_words() -> Vec<String> {
    vec!["new".to_string(), "edit".to_string()]
}
