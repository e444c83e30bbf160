//! Animals and other things that move around the map on their own.

use crate::ids::FixtureId;

/// A population of animals, or a single (possibly talking) animal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Animal {
    pub id: FixtureId,
    pub kind: String,
    pub talking: bool,
    /// Free-text status such as "wild" or "domesticated".
    pub status: String,
    /// Turn of birth, if known.
    pub born: Option<i32>,
    pub population: i32,
    pub image: Option<String>,
}

impl Animal {
    pub fn new(id: FixtureId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            talking: false,
            status: "wild".to_string(),
            born: None,
            population: 1,
            image: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Evidence that an animal passed through. Not authoritative map state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimalTracks {
    pub id: FixtureId,
    pub kind: String,
    pub image: Option<String>,
}

/// A sphinx, djinn, dragon or similar singular creature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Immortal {
    pub id: FixtureId,
    pub kind: String,
    pub image: Option<String>,
}
