//! Terrain features - immobile, unowned fixtures that describe a tile
//!
//! Forest and Ground double as a tile's *primary* forest/ground; any further
//! ones at the same location live in the tile's general fixture bag.

use crate::ids::FixtureId;
use crate::types::{Amount, FieldStatus, TownStatus};

/// A forest. `rows` marks managed plantations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Forest {
    pub id: FixtureId,
    pub kind: String,
    pub rows: bool,
    pub acres: Option<Amount>,
    pub image: Option<String>,
}

impl Forest {
    pub fn new(id: FixtureId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            rows: false,
            acres: None,
            image: None,
        }
    }

    pub fn in_rows(mut self) -> Self {
        self.rows = true;
        self
    }

    pub fn with_acres(mut self, acres: Amount) -> Self {
        self.acres = Some(acres);
        self
    }
}

/// The rock or soil underlying a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ground {
    pub id: FixtureId,
    pub kind: String,
    pub exposed: bool,
    pub image: Option<String>,
}

impl Ground {
    pub fn new(id: FixtureId, kind: impl Into<String>, exposed: bool) -> Self {
        Self {
            id,
            kind: kind.into(),
            exposed,
            image: None,
        }
    }
}

/// A grove of trees, or an orchard if `orchard` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grove {
    pub id: FixtureId,
    pub kind: String,
    pub orchard: bool,
    pub cultivated: bool,
    pub population: Option<i32>,
    pub image: Option<String>,
}

/// A meadow, or a cultivated field if `field` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meadow {
    pub id: FixtureId,
    pub kind: String,
    pub field: bool,
    pub cultivated: bool,
    pub status: FieldStatus,
    pub acres: Option<Amount>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shrub {
    pub id: FixtureId,
    pub kind: String,
    pub population: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mine {
    pub id: FixtureId,
    pub kind: String,
    pub status: TownStatus,
    pub image: Option<String>,
}

/// A vein of ore or gems. `dc` is the discovery difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MineralVein {
    pub id: FixtureId,
    pub kind: String,
    pub exposed: bool,
    pub dc: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoneDeposit {
    pub id: FixtureId,
    pub kind: String,
    pub dc: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hill {
    pub id: FixtureId,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oasis {
    pub id: FixtureId,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cave {
    pub id: FixtureId,
    pub dc: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Battlefield {
    pub id: FixtureId,
    pub dc: i32,
    pub image: Option<String>,
}
