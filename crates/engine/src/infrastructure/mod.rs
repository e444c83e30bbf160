//! Infrastructure implementations.
//!
//! Contains the relational store port with its SQLite adapter, the two map
//! formats, and environment settings.

pub mod hierarchical;
pub mod ports;
pub mod relational;
pub mod settings;
pub mod sqlite;
