//! In-memory slug corpus with a unique constraint.
//!
//! Stands in for a database table with a unique index on (scope, slug). The
//! uniqueness oracle reads it under a shared lock; writes re-check under the
//! exclusive lock and reject a slug another record already holds.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use log::{info, warn};
use uuid::Uuid;

use crate::error::SlugError;
use crate::host::{Scope, SlugHost};
use crate::idgen::new_id;
use crate::normalize::Normalizer;
use crate::oracle::UniquenessOracle;
use crate::record::Record;
use crate::slugger::Slugger;

type Corpus = HashMap<Scope, HashMap<String, Uuid>>;

/// Slug → owning record, per scope.
///
/// A poisoned lock is an error for every operation, reads included.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slugs: RwLock<Corpus>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `slug` for record `id`, releasing whatever slug it held before.
    ///
    /// # Errors
    /// `PersistenceConflict` if another record holds `slug` in `scope`.
    pub fn persist(&self, scope: &Scope, id: Uuid, slug: &str) -> Result<(), SlugError> {
        let mut slugs = self.write()?;
        if let Some(owner) = slugs.get(scope).and_then(|held| held.get(slug))
            && *owner != id
        {
            warn!("unique constraint rejected '{slug}' in {scope}");
            return Err(SlugError::PersistenceConflict {
                scope: scope.clone(),
                slug: slug.to_string(),
            });
        }
        for held in slugs.values_mut() {
            held.retain(|_, owner| *owner != id);
        }
        slugs.entry(scope.clone()).or_default().insert(slug.to_string(), id);
        Ok(())
    }

    /// Record an existing slug owned by some other, fresh record.
    ///
    /// # Errors
    /// As for [`MemoryStore::persist`].
    pub fn seed(&self, scope: &Scope, slug: &str) -> Result<Uuid, SlugError> {
        let id = new_id();
        self.persist(scope, id, slug)?;
        Ok(id)
    }

    /// Run the pre-persist hook on `record`, then write it.
    ///
    /// New records get an identity only once the write succeeds. On a
    /// `PersistenceConflict` the generated slug stays on the record; clear it
    /// and save again to retry.
    ///
    /// # Errors
    /// Anything from [`Slugger::before_save`], or `PersistenceConflict`.
    pub fn save<O, N>(&self, slugger: &Slugger<O, N>, record: &mut Record) -> Result<Uuid, SlugError>
    where
        O: UniquenessOracle,
        N: Normalizer,
    {
        slugger.before_save(record)?;
        let id = record.id().unwrap_or_else(new_id);
        let scope = Scope::for_host(&*record, slugger.config())?;
        match record.get(&slugger.config().slug_field) {
            Some(slug) if !slug.is_empty() => {
                self.persist(&scope, id, slug)?;
                info!("saved {scope} record {id} as '{slug}'");
            },
            _ => info!("saved {scope} record {id} without a slug"),
        }
        record.assign_id(id);
        Ok(id)
    }

    /// Slug currently held by record `id` in `scope`.
    ///
    /// # Errors
    /// A poisoned store lock.
    pub fn slug_of(&self, scope: &Scope, id: Uuid) -> Result<Option<String>, SlugError> {
        let slugs = self.read()?;
        Ok(slugs
            .get(scope)
            .and_then(|held| held.iter().find(|(_, owner)| **owner == id))
            .map(|(slug, _)| slug.clone()))
    }

    /// Number of slugs stored in `scope`.
    ///
    /// # Errors
    /// A poisoned store lock.
    pub fn len(&self, scope: &Scope) -> Result<usize, SlugError> {
        Ok(self.read()?.get(scope).map_or(0, HashMap::len))
    }

    /// # Errors
    /// A poisoned store lock.
    pub fn is_empty(&self, scope: &Scope) -> Result<bool, SlugError> {
        Ok(self.len(scope)? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Corpus>, SlugError> {
        Ok(self.slugs.read().map_err(|_| anyhow!("slug store lock poisoned"))?)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Corpus>, SlugError> {
        Ok(self.slugs.write().map_err(|_| anyhow!("slug store lock poisoned"))?)
    }
}

impl UniquenessOracle for MemoryStore {
    fn exists(&self, scope: &Scope, slug: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        let slugs = self.read()?;
        Ok(slugs
            .get(scope)
            .and_then(|held| held.get(slug))
            .is_some_and(|owner| Some(*owner) != exclude))
    }
}
