//! Shared configuration model for slugline.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_config};
