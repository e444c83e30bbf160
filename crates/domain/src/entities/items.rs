//! Portable goods: resource piles and implements
//!
//! Both can sit directly on a tile or be carried by a fortress, unit or worker.

use crate::ids::FixtureId;
use crate::types::Quantity;

/// A quantity of some resource ("food"/"wheat", "wood"/"oak planks", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePile {
    pub id: FixtureId,
    /// General category, e.g. "food".
    pub kind: String,
    /// Specific contents, e.g. "wheat".
    pub contents: String,
    pub quantity: Quantity,
    /// Turn the pile was produced, if known.
    pub created: Option<i32>,
    pub image: Option<String>,
}

impl ResourcePile {
    pub fn new(
        id: FixtureId,
        kind: impl Into<String>,
        contents: impl Into<String>,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            contents: contents.into(),
            quantity,
            created: None,
            image: None,
        }
    }
}

/// A tool, vehicle or piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Implement {
    pub id: FixtureId,
    pub kind: String,
    pub count: i32,
    pub image: Option<String>,
}

impl Implement {
    pub fn new(id: FixtureId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            count: 1,
            image: None,
        }
    }
}
