//! Mapkeep Engine library.
//!
//! Everything that moves maps between memory and storage.
//!
//! ## Structure
//!
//! - `records/` - Flat field records, their codecs and the relational schema
//! - `use_cases/` - Loading, saving, comparing and redacting maps
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `error` - Load and save errors

pub mod error;
pub mod infrastructure;
pub mod records;
pub mod use_cases;

pub use error::{LoadError, SaveError};
pub use use_cases::load::LoadedMap;
