//! Failure kinds surfaced by slug generation and the reference store.

use slugline_data::ValidationError;
use thiserror::Error;

use crate::host::Scope;

/// Everything that can stop a slug from being generated or written.
///
/// Running out of free candidates is not an error: it is answered with a
/// conflict-token fallback. Only an input with nothing to build on ends here.
#[derive(Debug, Error)]
pub enum SlugError {
    #[error("no candidate for {scope} produced a usable slug")]
    UnresolvableInput { scope: Scope },
    #[error("every candidate for {scope} is a reserved word (first was '{slug}')")]
    Reserved { scope: Scope, slug: String },
    #[error("slug '{slug}' was claimed by another record in {scope} before this write")]
    PersistenceConflict { scope: Scope, slug: String },
    #[error("invalid slug configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl SlugError {
    /// True when clearing the slug and running the hook again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SlugError::PersistenceConflict { .. })
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
