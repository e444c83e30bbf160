//! Base terrain and river vocabulary.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The base terrain of a tile.
///
/// `Unknown` means "no information", not a terrain of its own; the subset
/// comparison treats it as a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    #[default]
    Unknown,
    Tundra,
    Desert,
    Ocean,
    Plains,
    Jungle,
    Steppe,
    Swamp,
}

impl TileType {
    pub fn all() -> &'static [TileType] {
        &[
            TileType::Unknown,
            TileType::Tundra,
            TileType::Desert,
            TileType::Ocean,
            TileType::Plains,
            TileType::Jungle,
            TileType::Steppe,
            TileType::Swamp,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::Unknown => "unknown",
            TileType::Tundra => "tundra",
            TileType::Desert => "desert",
            TileType::Ocean => "ocean",
            TileType::Plains => "plains",
            TileType::Jungle => "jungle",
            TileType::Steppe => "steppe",
            TileType::Swamp => "swamp",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TileType::Unknown)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TileType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileType::all()
            .iter()
            .copied()
            .find(|tile| tile.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown terrain type: {}", s)))
    }
}

/// A river segment on a tile: one of the four edges, or a lake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum River {
    North,
    South,
    East,
    West,
    Lake,
}

impl River {
    pub fn all() -> &'static [River] {
        &[River::North, River::South, River::East, River::West, River::Lake]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            River::North => "north",
            River::South => "south",
            River::East => "east",
            River::West => "west",
            River::Lake => "lake",
        }
    }
}

impl fmt::Display for River {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for River {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        River::all()
            .iter()
            .copied()
            .find(|river| river.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown river direction: {}", s)))
    }
}
