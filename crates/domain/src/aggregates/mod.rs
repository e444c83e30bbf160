//! Aggregate roots - domain objects that own their related data
//!
//! The map grid owns every tile, and every tile owns its fixtures. Container
//! fixtures own their members, so a loaded map is one tree with no shared
//! references into it.

pub mod map_grid;

pub use map_grid::{FixturePlacement, MapGrid, Tile};
