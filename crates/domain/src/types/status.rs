//! Fixed-vocabulary status fields carried by settlements, mines and fields.
//!
//! All of these are stored as lowercase text by both map formats.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a town, village or mine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TownStatus {
    Active,
    Abandoned,
    Ruined,
    Burned,
}

impl TownStatus {
    pub fn all() -> &'static [TownStatus] {
        &[
            TownStatus::Active,
            TownStatus::Abandoned,
            TownStatus::Ruined,
            TownStatus::Burned,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TownStatus::Active => "active",
            TownStatus::Abandoned => "abandoned",
            TownStatus::Ruined => "ruined",
            TownStatus::Burned => "burned",
        }
    }
}

/// Size class of a town-like settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TownSize {
    Small,
    Medium,
    Large,
}

impl TownSize {
    pub fn all() -> &'static [TownSize] {
        &[TownSize::Small, TownSize::Medium, TownSize::Large]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TownSize::Small => "small",
            TownSize::Medium => "medium",
            TownSize::Large => "large",
        }
    }
}

/// Which sort of town-like settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TownKind {
    Town,
    City,
    Fortification,
}

impl TownKind {
    pub fn all() -> &'static [TownKind] {
        &[TownKind::Town, TownKind::City, TownKind::Fortification]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TownKind::Town => "town",
            TownKind::City => "city",
            TownKind::Fortification => "fortification",
        }
    }
}

/// Growth stage of a field or meadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Fallow,
    Seeding,
    Growing,
    Bearing,
}

impl FieldStatus {
    pub fn all() -> &'static [FieldStatus] {
        &[
            FieldStatus::Fallow,
            FieldStatus::Seeding,
            FieldStatus::Growing,
            FieldStatus::Bearing,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Fallow => "fallow",
            FieldStatus::Seeding => "seeding",
            FieldStatus::Growing => "growing",
            FieldStatus::Bearing => "bearing",
        }
    }
}

macro_rules! text_vocabulary {
    ($name:ident, $label:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.to_lowercase();
                $name::all()
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == lowered)
                    .ok_or_else(|| DomainError::parse(format!("Unknown {}: {}", $label, s)))
            }
        }
    };
}

text_vocabulary!(TownStatus, "town status");
text_vocabulary!(TownSize, "town size");
text_vocabulary!(TownKind, "town kind");
text_vocabulary!(FieldStatus, "field status");
