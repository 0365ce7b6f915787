use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for a resolved slug configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingValue { field: &'static str },
    InvalidValue { field: &'static str, context: String },
    Conflict { first: &'static str, second: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingValue { field } => {
                write!(f, "missing value for '{field}'")
            },
            ValidationError::InvalidValue { field, context } => {
                write!(f, "invalid '{field}' ({context})")
            },
            ValidationError::Conflict { first, second, value } => {
                write!(f, "'{first}' and '{second}' both name '{value}'")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a resolved slug configuration.
///
/// ```
/// use slugline_data::{SlugConfig, ValidationError, validate_config};
///
/// assert!(validate_config(&SlugConfig::default()).is_empty());
///
/// let config = SlugConfig::default().with_separator("");
/// assert_eq!(
///     validate_config(&config),
///     vec![ValidationError::MissingValue { field: "sequence_separator" }]
/// );
/// ```
pub fn validate_config(config: &SlugConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require("slug_field", &config.slug_field, &mut errors);
    require("candidate_source", &config.candidate_source, &mut errors);

    if config.sequence_separator.is_empty() {
        errors.push(ValidationError::MissingValue {
            field: "sequence_separator",
        });
    } else if let Some(bad) = config
        .sequence_separator
        .chars()
        .find(|ch| !SEPARATOR_CHARS.contains(ch))
    {
        errors.push(ValidationError::InvalidValue {
            field: "sequence_separator",
            context: format!("'{bad}' is not one of {SEPARATOR_CHARS:?}"),
        });
    }

    if !config.slug_field.trim().is_empty() && config.slug_field == config.candidate_source {
        errors.push(ValidationError::Conflict {
            first: "slug_field",
            second: "candidate_source",
            value: config.slug_field.clone(),
        });
    }

    if let Some(scope) = &config.scope_field {
        if scope.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: "scope_field",
                context: "blank field name".to_string(),
            });
        } else if *scope == config.slug_field {
            errors.push(ValidationError::Conflict {
                first: "slug_field",
                second: "scope_field",
                value: scope.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for word in &config.reserved_words {
        if word.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: "reserved_words",
                context: "blank reserved word".to_string(),
            });
        } else if !seen.insert(word.as_str()) {
            errors.push(ValidationError::InvalidValue {
                field: "reserved_words",
                context: format!("'{word}' listed twice"),
            });
        }
    }

    if let Some(locale) = &config.locale
        && !SUPPORTED_LOCALES.contains(&locale.as_str())
    {
        errors.push(ValidationError::InvalidValue {
            field: "locale",
            context: format!("no transliteration table for '{locale}'"),
        });
    }

    for (from, to) in &config.transliterations {
        let mut chars = from.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphanumeric() || SEPARATOR_CHARS.contains(&ch) => {
                // normalized output is built from these characters
                errors.push(ValidationError::InvalidValue {
                    field: "transliterations",
                    context: format!("key '{from}' is already slug-safe and cannot be remapped"),
                });
            },
            (Some(_), None) => {},
            _ => errors.push(ValidationError::InvalidValue {
                field: "transliterations",
                context: format!("key '{from}' must be a single character"),
            }),
        }
        if !to.is_ascii() {
            errors.push(ValidationError::InvalidValue {
                field: "transliterations",
                context: format!("replacement '{to}' for '{from}' is not ASCII"),
            });
        }
    }

    if config.max_length == Some(0) {
        errors.push(ValidationError::InvalidValue {
            field: "max_length",
            context: "must be at least 1".to_string(),
        });
    }

    errors
}

fn require(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::MissingValue { field });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SlugConfig::default()).is_empty());
    }

    #[test]
    fn blank_fields_are_reported() {
        let config = SlugConfig::default().with_slug_field(" ").with_candidate_source("");
        let errors = validate_config(&config);
        assert!(errors.contains(&ValidationError::MissingValue { field: "slug_field" }));
        assert!(errors.contains(&ValidationError::MissingValue {
            field: "candidate_source"
        }));
    }

    #[test]
    fn separator_must_be_url_safe_punctuation() {
        for ok in ["-", "_", "--", ".", "~"] {
            let config = SlugConfig::default().with_separator(ok);
            assert!(validate_config(&config).is_empty(), "separator {ok:?} rejected");
        }
        for bad in ["x", "/", " ", "-1"] {
            let config = SlugConfig::default().with_separator(bad);
            let errors = validate_config(&config);
            assert!(
                errors
                    .iter()
                    .any(|err| matches!(err, ValidationError::InvalidValue { field, .. } if *field == "sequence_separator")),
                "separator {bad:?} accepted"
            );
        }
    }

    #[test]
    fn overlapping_fields_are_reported() {
        let config = SlugConfig::default()
            .with_candidate_source("slug")
            .with_scope_field("slug");
        let errors = validate_config(&config);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::Conflict { second, .. } if *second == "candidate_source")));
        assert!(errors.iter().any(|err| matches!(err, ValidationError::Conflict { second, .. } if *second == "scope_field")));
    }

    #[test]
    fn unknown_locale_is_reported() {
        let config = SlugConfig::default().with_locale("xx");
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("'xx'"));
        assert!(validate_config(&SlugConfig::default().with_locale("de")).is_empty());
    }

    #[test]
    fn slug_safe_transliteration_keys_are_rejected() {
        for key in ["-", "_", ".", "~", "a", "Z", "7"] {
            let mut config = SlugConfig::default();
            config.transliterations.insert(key.into(), "dash".into());
            let errors = validate_config(&config);
            assert_eq!(errors.len(), 1, "key {key:?} accepted");
            assert!(errors[0].to_string().contains("already slug-safe"));
        }

        let mut config = SlugConfig::default();
        config.transliterations.insert("&".into(), "and".into());
        config.transliterations.insert("ø".into(), "oe".into());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn bad_transliterations_and_lengths_are_reported() {
        let mut config = SlugConfig::default().with_max_length(0);
        config.transliterations.insert("ab".into(), "x".into());
        config.transliterations.insert("€".into(), "£".into());
        config.reserved_words.push("new".into());

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|err| err.to_string().contains("single character")));
        assert!(errors.iter().any(|err| err.to_string().contains("not ASCII")));
        assert!(errors.iter().any(|err| err.to_string().contains("listed twice")));
        assert!(errors.iter().any(|err| err.to_string().contains("at least 1")));
    }
}
