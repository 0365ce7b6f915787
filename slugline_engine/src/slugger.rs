//! Top-level slug generation.
//!
//! [`Slugger`] owns a resolved configuration, a uniqueness oracle and a
//! normalizer. Hosts call [`Slugger::before_save`] right before they write a
//! record; it runs the write-once gate and, if the gate opens, stores a fresh
//! slug into the configured field.

use log::{debug, info, warn};
use slugline_data::{SlugConfig, validate_config};
use uuid::Uuid;

use crate::candidate::CandidateSpec;
use crate::conflict::ConflictResolver;
use crate::error::SlugError;
use crate::host::{Scope, SlugHost};
use crate::normalize::{Normalizer, SlugNormalizer};
use crate::oracle::UniquenessOracle;
use crate::resolver::{Resolution, SlugResolver};

/// Slug generator for one entity type.
#[derive(Debug)]
pub struct Slugger<O, N = SlugNormalizer> {
    config: SlugConfig,
    oracle: O,
    normalizer: N,
    conflicts: ConflictResolver,
}

impl<O: UniquenessOracle> Slugger<O> {
    /// Validate `config` and build a generator using the default normalizer.
    ///
    /// # Errors
    /// `SlugError::InvalidConfig` listing every validation failure.
    pub fn new(config: SlugConfig, oracle: O) -> Result<Self, SlugError> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(SlugError::InvalidConfig(errors));
        }
        let normalizer = SlugNormalizer::from_config(&config);
        Ok(Self {
            config,
            oracle,
            normalizer,
            conflicts: ConflictResolver::default(),
        })
    }
}

impl<O: UniquenessOracle, N: Normalizer> Slugger<O, N> {
    /// Swap in a different normalization policy.
    pub fn with_normalizer<M: Normalizer>(self, normalizer: M) -> Slugger<O, M> {
        Slugger {
            config: self.config,
            oracle: self.oracle,
            normalizer,
            conflicts: self.conflicts,
        }
    }

    #[must_use]
    pub fn with_conflict_resolver(mut self, conflicts: ConflictResolver) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn config(&self) -> &SlugConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Generate a slug for `host` from `candidates`, in the host's own scope.
    ///
    /// The host's current identity is excluded, so a record never conflicts
    /// with the slug it already holds.
    ///
    /// # Errors
    /// See [`Slugger::generate_in`].
    pub fn generate<H: SlugHost>(&self, host: &H, candidates: &CandidateSpec<H>) -> Result<String, SlugError> {
        let scope = Scope::for_host(host, &self.config)?;
        self.generate_in(host, candidates, &scope, host.id())
    }

    /// Generate a slug against an explicit scope and exclusion.
    ///
    /// Returns the first free candidate, or the first usable candidate with a
    /// conflict token appended when all of them are taken.
    ///
    /// # Errors
    /// - `UnresolvableInput` if no candidate normalized to anything
    /// - `Reserved` if every usable candidate was a reserved word
    /// - `Collaborator` for failures raised by the host or the oracle
    pub fn generate_in<H: SlugHost>(
        &self,
        host: &H,
        candidates: &CandidateSpec<H>,
        scope: &Scope,
        exclude: Option<Uuid>,
    ) -> Result<String, SlugError> {
        let separator = self.config.sequence_separator.as_str();
        let resolver = SlugResolver::new(&self.oracle, &self.config.reserved_words);
        let sequence = candidates.sequence(host, separator);
        let resolution = resolver.resolve(sequence, |raw| host.normalize_slug(raw, &self.normalizer), scope, exclude)?;

        match resolution {
            Resolution::Free(slug) => {
                info!("slug '{slug}' chosen in {scope}");
                Ok(slug)
            },
            Resolution::Exhausted { first: Some(first), .. } => {
                let slug = self.conflicts.resolve(&first, separator, self.config.max_length);
                warn!("every candidate taken in {scope}, falling back to '{slug}'");
                Ok(slug)
            },
            Resolution::Exhausted {
                first: None,
                first_reserved: Some(slug),
            } => Err(SlugError::Reserved {
                scope: scope.clone(),
                slug,
            }),
            Resolution::Exhausted {
                first: None,
                first_reserved: None,
            } => Err(SlugError::UnresolvableInput { scope: scope.clone() }),
        }
    }

    /// Write-once gate: generate only while the stored slug is absent and the
    /// candidate source has something in it.
    ///
    /// # Errors
    /// Propagates failed attribute reads.
    pub fn should_generate<H: SlugHost + ?Sized>(&self, host: &H) -> Result<bool, SlugError> {
        let stored = host.read_attribute(&self.config.slug_field)?;
        if stored.is_some_and(|slug| !slug.is_empty()) {
            return Ok(false);
        }
        let base = host.read_attribute(&self.config.candidate_source)?;
        Ok(base.is_some_and(|value| !value.trim().is_empty()))
    }

    /// Pre-persist hook: run the gate, then generate and store the slug.
    ///
    /// Returns the new slug, or `None` when the gate kept the current value.
    ///
    /// # Errors
    /// Anything from [`Slugger::should_generate`] or [`Slugger::generate`],
    /// plus a failed write of the slug field. Nothing is written on error.
    pub fn before_save<H: SlugHost>(&self, host: &mut H) -> Result<Option<String>, SlugError> {
        if !self.should_generate(host)? {
            debug!("slug generation skipped for {} {:?}", host.entity_type(), host.id());
            return Ok(None);
        }
        let candidates = host.slug_candidates(&self.config);
        let slug = self.generate(host, &candidates)?;
        host.write_attribute(&self.config.slug_field, Some(slug.clone()))?;
        Ok(Some(slug))
    }
}
