//! First-free-candidate search.
//!
//! Pulls raw candidates one at a time, normalizes each, and asks the oracle
//! about it. The first free slug ends the search, so nothing after it is
//! pulled from the sequence.

use std::collections::HashSet;

use log::debug;
use uuid::Uuid;

use crate::error::SlugError;
use crate::host::Scope;
use crate::oracle::UniquenessOracle;

/// Outcome of walking a candidate sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// This slug was free when checked.
    Free(String),
    /// Every candidate was empty, reserved, or taken.
    Exhausted {
        /// First candidate that normalized to a usable, non-reserved slug.
        first: Option<String>,
        /// First candidate rejected as a reserved word.
        first_reserved: Option<String>,
    },
}

impl Resolution {
    pub fn free(&self) -> Option<&str> {
        match self {
            Resolution::Free(slug) => Some(slug),
            Resolution::Exhausted { .. } => None,
        }
    }
}

/// Drives candidates through normalization and the uniqueness oracle.
#[derive(Debug)]
pub struct SlugResolver<'a, O: ?Sized> {
    oracle: &'a O,
    reserved_words: &'a [String],
}

impl<'a, O: UniquenessOracle + ?Sized> SlugResolver<'a, O> {
    pub fn new(oracle: &'a O, reserved_words: &'a [String]) -> Self {
        Self { oracle, reserved_words }
    }

    /// Return the first free normalized candidate, or what the fallback needs.
    ///
    /// Empty normalizations and reserved words are skipped without a query.
    ///
    /// # Errors
    /// The first failure from the sequence or the oracle, unchanged.
    pub fn resolve<I, F>(
        &self,
        candidates: I,
        normalize: F,
        scope: &Scope,
        exclude: Option<Uuid>,
    ) -> Result<Resolution, SlugError>
    where
        I: IntoIterator<Item = Result<String, SlugError>>,
        F: Fn(&str) -> String,
    {
        let reserved: HashSet<String> = self
            .reserved_words
            .iter()
            .map(|word| normalize(word.as_str()))
            .filter(|word| !word.is_empty())
            .collect();

        let mut first = None;
        let mut first_reserved = None;
        for candidate in candidates {
            let raw = candidate?;
            let slug = normalize(&raw);
            if slug.is_empty() {
                debug!("candidate {raw:?} normalized to nothing, skipping");
                continue;
            }
            if reserved.contains(&slug) {
                debug!("candidate '{slug}' is reserved, skipping");
                if first_reserved.is_none() {
                    first_reserved = Some(slug);
                }
                continue;
            }
            if !self.oracle.exists(scope, &slug, exclude)? {
                debug!("candidate '{slug}' is free in {scope}");
                return Ok(Resolution::Free(slug));
            }
            debug!("candidate '{slug}' is taken in {scope}");
            if first.is_none() {
                first = Some(slug);
            }
        }

        Ok(Resolution::Exhausted { first, first_reserved })
    }
}
