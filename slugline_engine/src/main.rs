#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** slugline **
//! Generate unique slugs for a list of titles against an in-memory corpus.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use slugline_engine::config::load_entity_config;
use slugline_engine::{MemoryStore, Record, SLUGLINE_VERSION, Scope, SlugConfig, Slugger};

#[derive(Parser)]
#[command(author, version, about = "Generate unique, URL-safe slugs for a list of titles.")]
struct Cli {
    /// TOML file with `[defaults]` and `[entities.<type>]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Entity type the titles belong to.
    #[arg(long, default_value = "record")]
    entity: String,
    /// Override the sequence separator.
    #[arg(long)]
    separator: Option<String>,
    /// Override the transliteration locale (de, da, nb, no).
    #[arg(long)]
    locale: Option<String>,
    /// Reserved word; may be given more than once. Replaces configured reserved words.
    #[arg(long = "reserved")]
    reserved: Vec<String>,
    /// Slug already present in the corpus; may be given more than once.
    #[arg(long = "taken")]
    taken: Vec<String>,
    /// Titles to slug, in order. Each one is saved before the next is generated.
    #[arg(required = true)]
    titles: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("slugline {SLUGLINE_VERSION} starting");

    let config = build_config(&cli)?;
    let store = MemoryStore::new();
    let scope = Scope::new(cli.entity.as_str());
    for slug in &cli.taken {
        store
            .seed(&scope, slug)
            .with_context(|| format!("seeding taken slug '{slug}'"))?;
    }
    info!("{} taken slugs seeded for {scope}", cli.taken.len());

    let slugger = Slugger::new(config, &store).context("while building slugger")?;
    let source = slugger.config().candidate_source.clone();
    let slug_field = slugger.config().slug_field.clone();

    let mut failures = 0usize;
    for title in &cli.titles {
        let mut record = Record::new(cli.entity.as_str()).with(source.as_str(), title.as_str());
        match store.save(&slugger, &mut record) {
            Ok(_) => match record.get(&slug_field) {
                Some(slug) => println!("{title} -> {}", slug.bright_green()),
                None => println!("{title} -> {}", "(no slug)".yellow()),
            },
            Err(err) => {
                failures += 1;
                println!("{title} -> {}", err.to_string().bright_red());
            },
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} titles could not be slugged", cli.titles.len());
    }
    Ok(())
}

/// Resolve configuration from the optional file, then apply command-line overrides.
fn build_config(cli: &Cli) -> Result<SlugConfig> {
    let mut config = match &cli.config {
        Some(path) => load_entity_config(path, &cli.entity)?,
        None => SlugConfig::default(),
    };
    if let Some(separator) = &cli.separator {
        config.sequence_separator.clone_from(separator);
    }
    if let Some(locale) = &cli.locale {
        config.locale = Some(locale.clone());
    }
    if !cli.reserved.is_empty() {
        config.reserved_words.clone_from(&cli.reserved);
    }
    Ok(config)
}
