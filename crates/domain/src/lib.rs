//! # Mapkeep Domain
//!
//! The in-memory model of a grid strategy-game map: fixtures and their
//! containment rules, the map grid with its placement invariants, the per-load
//! identifier registry and warnings channel, and the structural subset
//! comparison used to check round trips and player views.
//!
//! Nothing here performs I/O. Map formats live in `mapkeep-engine`.

pub mod types;

pub mod aggregates;
pub mod containment;
pub mod entities;
pub mod error;
pub mod id_registry;
pub mod ids;
pub mod subset;
pub mod warning;

pub use aggregates::{FixturePlacement, MapGrid, Tile};
pub use containment::{Containee, ContaineeKind};
pub use entities::{
    Adventure, Animal, AnimalTracks, Battlefield, Cache, Cave, CommunityStats, Fixture,
    FixtureKind, Forest, Fortress, Ground, Grove, Hill, Immortal, Implement, Job, Meadow, Mine,
    MineralVein, Oasis, Player, Players, Portal, ResourcePile, Shrub, Skill, StoneDeposit,
    TextNote, Town, Unit, Village, Worker, WorkerStats,
};
pub use error::DomainError;
pub use id_registry::IdRegistry;
pub use ids::{FixtureId, PlayerId};
pub use subset::{DiagnosticSink, IsSubset, SilentSink, TracingSink};
pub use types::{
    Amount, FieldStatus, Location, MapDimensions, Quantity, River, TileType, TownKind, TownSize,
    TownStatus,
};
pub use warning::{Warning, WarningPolicy, Warnings};
