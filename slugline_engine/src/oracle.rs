//! Uniqueness checks against the stored slug corpus.

use std::sync::Arc;

use uuid::Uuid;

use crate::host::Scope;

/// Answers "is this slug already held by someone else in this scope?".
///
/// The answer is only valid at call time: another writer may claim the slug
/// before the caller writes it, and the store's unique constraint decides.
/// A failed query is an error, never a "no".
pub trait UniquenessOracle {
    /// # Errors
    /// Whatever the underlying query raises.
    fn exists(&self, scope: &Scope, slug: &str, exclude: Option<Uuid>) -> anyhow::Result<bool>;
}

impl<T: UniquenessOracle + ?Sized> UniquenessOracle for &T {
    fn exists(&self, scope: &Scope, slug: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        (**self).exists(scope, slug, exclude)
    }
}

impl<T: UniquenessOracle + ?Sized> UniquenessOracle for Arc<T> {
    fn exists(&self, scope: &Scope, slug: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        (**self).exists(scope, slug, exclude)
    }
}
