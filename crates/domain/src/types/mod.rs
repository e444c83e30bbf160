//! # Mapkeep Domain Types
//!
//! Shared vocabulary types: grid coordinates, terrain, fixed-vocabulary
//! statuses and quantities. Pure data, no I/O; all serializable.

// Grid coordinates
mod location;
pub use location::{Location, MapDimensions};

// Terrain vocabulary
mod terrain;
pub use terrain::{River, TileType};

// Settlement and field statuses
mod status;
pub use status::{FieldStatus, TownKind, TownSize, TownStatus};

// Quantities
mod amount;
pub use amount::{Amount, Quantity};
