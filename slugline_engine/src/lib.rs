#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** slugline **
//! Unique, URL-safe slugs from ordered, lazily evaluated candidates.
//!
//! A host entity hands a [`CandidateSpec`] to a [`Slugger`]. Candidates are
//! resolved one at a time, normalized, and checked against a
//! [`UniquenessOracle`]; the first free one wins. If all are taken, the first
//! usable candidate gets a random conflict token appended.
//!
//! ```
//! use slugline_engine::{MemoryStore, Record, SlugConfig, Slugger};
//!
//! let store = MemoryStore::new();
//! let slugger = Slugger::new(SlugConfig::default(), &store)?;
//!
//! let mut car = Record::new("car").with("name", "Peugot 206");
//! store.save(&slugger, &mut car)?;
//! assert_eq!(car.get("slug"), Some("peugot-206"));
//!
//! let mut twin = Record::new("car").with("name", "Peugot 206");
//! store.save(&slugger, &mut twin)?;
//! assert!(twin.get("slug").is_some_and(|slug| slug.starts_with("peugot-206-")));
//! # Ok::<(), slugline_engine::SlugError>(())
//! ```

pub const SLUGLINE_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod candidate;
pub mod config;
pub mod conflict;
pub mod error;
pub mod host;
pub mod idgen;
pub mod normalize;
pub mod oracle;
pub mod record;
pub mod resolver;
pub mod slugger;
pub mod store;

// Re-exports for convenience
pub use candidate::{Candidate, CandidateSequence, CandidateSpec, CandidateValue};
pub use conflict::ConflictResolver;
pub use error::SlugError;
pub use host::{Scope, SlugHost};
pub use normalize::{Normalizer, SlugNormalizer, normalize};
pub use oracle::UniquenessOracle;
pub use record::Record;
pub use resolver::{Resolution, SlugResolver};
pub use slugger::Slugger;
pub use slugline_data::{SlugConfig, SlugConfigFile, SlugDef, SlugDefaults, ValidationError, validate_config};
pub use store::MemoryStore;
