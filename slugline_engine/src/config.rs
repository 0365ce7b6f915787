//! Slug configuration file loader.
//!
//! Configuration lives in a TOML file with a `[defaults]` table and one
//! `[entities.<type>]` table per entity type. Entity values are layered over
//! the defaults once, when the file is resolved.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use slugline_data::{SlugConfig, SlugConfigFile, validate_config};

use crate::error::SlugError;

/// Read and parse a slug configuration file.
///
/// # Errors
/// File IO or TOML parse errors.
pub fn load_config_file(path: &Path) -> Result<SlugConfigFile> {
    let text = fs::read_to_string(path).with_context(|| format!("reading slug config {}", path.display()))?;
    let file: SlugConfigFile =
        toml::from_str(&text).with_context(|| format!("parsing slug config {}", path.display()))?;
    info!(
        "slug config loaded from {} ({} entity sections)",
        path.display(),
        file.entities.len()
    );
    Ok(file)
}

/// Load `path` and resolve a validated configuration for `entity_type`.
///
/// # Errors
/// Loader errors, or `SlugError::InvalidConfig` if the resolved values fail validation.
pub fn load_entity_config(path: &Path, entity_type: &str) -> Result<SlugConfig> {
    let file = load_config_file(path)?;
    if !file.entities.contains_key(entity_type) {
        warn!(
            "no [entities.{entity_type}] section in {}, using defaults",
            path.display()
        );
    }
    let config = file.config_for(entity_type);
    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(SlugError::InvalidConfig(errors))
            .with_context(|| format!("resolving '{entity_type}' slug config from {}", path.display()));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn entity_section_is_layered_over_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("slugs.toml");
        fs::write(
            &path,
            r#"
[defaults]
sequence_separator = "_"
locale = "de"

[entities.restaurant]
candidate_source = "title"
scope_field = "city"
max_length = 32
"#,
        )?;

        let config = load_entity_config(&path, "restaurant")?;
        assert_eq!(config.sequence_separator, "_");
        assert_eq!(config.locale.as_deref(), Some("de"));
        assert_eq!(config.candidate_source, "title");
        assert_eq!(config.scope_field.as_deref(), Some("city"));
        assert_eq!(config.max_length, Some(32));
        assert_eq!(config.slug_field, "slug");

        let fallback = load_entity_config(&path, "menu")?;
        assert_eq!(fallback.candidate_source, "name");
        assert_eq!(fallback.sequence_separator, "_");
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("slugs.toml");
        fs::write(&path, "[entities.car]\nsequence_separator = \"/\"\n")?;

        let err = load_entity_config(&path, "car").unwrap_err();
        assert!(err.downcast_ref::<SlugError>().is_some());
        assert!(format!("{err:#}").contains("sequence_separator"));
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config_file(Path::new("/nonexistent/slugs.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/slugs.toml"));
    }

    #[test]
    fn malformed_toml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("slugs.toml");
        fs::write(&path, "[defaults\nsequence_separator = 3")?;
        assert!(load_config_file(&path).is_err());
        Ok(())
    }
}
