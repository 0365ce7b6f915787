//! The seam between slug generation and the entity that owns the slug.
//!
//! A host is whatever the persistence layer calls a record: it knows its own
//! type and identity, can read and write named attributes, and may override
//! how its candidates are built and normalized.

use std::fmt;

use slugline_data::SlugConfig;
use uuid::Uuid;

use crate::candidate::{Candidate, CandidateSpec};
use crate::error::SlugError;
use crate::normalize::Normalizer;

/// An entity that carries a slug.
pub trait SlugHost {
    /// Entity type name; slugs only collide within the same type.
    fn entity_type(&self) -> &str;

    /// Persisted identity, or `None` for a record that has never been written.
    fn id(&self) -> Option<Uuid>;

    /// Read a named value. Unknown and unset names are both `Ok(None)` unless
    /// the host chooses to treat unknown names as an error.
    ///
    /// # Errors
    /// Whatever the host's attribute storage raises.
    fn read_attribute(&self, name: &str) -> anyhow::Result<Option<String>>;

    /// Store (or clear, with `None`) a named value.
    ///
    /// # Errors
    /// Whatever the host's attribute storage raises.
    fn write_attribute(&mut self, name: &str, value: Option<String>) -> anyhow::Result<()>;

    /// Candidates tried by the pre-persist hook, in order.
    ///
    /// Defaults to a single reference to the configured candidate source.
    fn slug_candidates(&self, config: &SlugConfig) -> CandidateSpec<Self>
    where
        Self: Sized,
    {
        CandidateSpec::from(vec![Candidate::reference(config.candidate_source.clone())])
    }

    /// Turn one raw candidate into slug form.
    fn normalize_slug(&self, raw: &str, normalizer: &dyn Normalizer) -> String {
        normalizer.normalize(raw)
    }
}

/// The set of stored slugs a uniqueness check runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    pub entity_type: String,
    pub partition: Option<String>,
}

impl Scope {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            partition: None,
        }
    }

    pub fn partitioned(entity_type: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            partition: Some(partition.into()),
        }
    }

    /// Scope of `host` under `config`, reading the partition from `scope_field` if one is set.
    ///
    /// A blank partition value counts as absent.
    ///
    /// # Errors
    /// Propagates a failed attribute read from the host.
    pub fn for_host<H: SlugHost + ?Sized>(host: &H, config: &SlugConfig) -> Result<Scope, SlugError> {
        let partition = match &config.scope_field {
            Some(field) => host.read_attribute(field)?.filter(|value| !value.trim().is_empty()),
            None => None,
        };
        Ok(Scope {
            entity_type: host.entity_type().to_string(),
            partition,
        })
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.partition {
            Some(partition) => write!(f, "{}/{}", self.entity_type, partition),
            None => write!(f, "{}", self.entity_type),
        }
    }
}
