//! Port traits for infrastructure boundaries.
//!
//! The relational map format goes through [`RelationalStore`] so the
//! reader and writer can be exercised against a mock as well as SQLite.

mod error;
mod store;

pub use error::StoreError;
pub use store::{RelationalStore, Row};

#[cfg(test)]
pub use store::MockRelationalStore;
