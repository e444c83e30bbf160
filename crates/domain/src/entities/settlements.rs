//! Towns, cities, fortifications and villages, with their population statistics
//!
//! A settlement becomes a container once it has a [`CommunityStats`] block;
//! it can hold at most one.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use super::items::ResourcePile;
use super::same_members;
use crate::error::DomainError;
use crate::entities::FixtureKind;
use crate::ids::{FixtureId, PlayerId};
use crate::types::{TownKind, TownSize, TownStatus};

/// Population statistics of a settlement.
#[derive(Debug, Clone, Default)]
pub struct CommunityStats {
    pub population: i32,
    /// Skill name to highest level practised in the settlement.
    pub expertise: BTreeMap<String, i32>,
    /// IDs of the fields, groves and mines the settlement works.
    pub worked_fields: BTreeSet<FixtureId>,
    pub produced: Vec<ResourcePile>,
    pub consumed: Vec<ResourcePile>,
}

impl CommunityStats {
    pub fn new(population: i32) -> Self {
        Self {
            population,
            ..Self::default()
        }
    }
}

impl PartialEq for CommunityStats {
    fn eq(&self, other: &Self) -> bool {
        self.population == other.population
            && self.expertise == other.expertise
            && self.worked_fields == other.worked_fields
            && same_members(&self.produced, &other.produced)
            && same_members(&self.consumed, &other.consumed)
    }
}

impl Eq for CommunityStats {}

impl Hash for CommunityStats {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.population.hash(state);
        self.expertise.hash(state);
        self.worked_fields.hash(state);
    }
}

/// A town, city or fortification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Town {
    pub id: FixtureId,
    pub kind: TownKind,
    pub status: TownStatus,
    pub size: TownSize,
    pub dc: i32,
    pub name: String,
    pub owner: PlayerId,
    pub image: Option<String>,
    pub portrait: Option<String>,
    population: Option<CommunityStats>,
}

impl Town {
    pub fn new(
        id: FixtureId,
        kind: TownKind,
        status: TownStatus,
        size: TownSize,
        name: impl Into<String>,
        owner: PlayerId,
    ) -> Self {
        Self {
            id,
            kind,
            status,
            size,
            dc: 0,
            name: name.into(),
            owner,
            image: None,
            portrait: None,
            population: None,
        }
    }

    pub fn population(&self) -> Option<&CommunityStats> {
        self.population.as_ref()
    }

    pub fn population_mut(&mut self) -> Option<&mut CommunityStats> {
        self.population.as_mut()
    }

    /// Attach the population block. A second block is an error.
    pub fn set_population(&mut self, stats: CommunityStats) -> Result<(), DomainError> {
        if self.population.is_some() {
            return Err(DomainError::second_occupant(
                FixtureKind::Town,
                self.id,
                "population",
            ));
        }
        self.population = Some(stats);
        Ok(())
    }

    pub(crate) fn clear_population(&mut self) {
        self.population = None;
    }
}

/// A village. Villages have a dominant race but no size class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Village {
    pub id: FixtureId,
    pub status: TownStatus,
    pub name: String,
    pub owner: PlayerId,
    pub race: String,
    pub image: Option<String>,
    pub portrait: Option<String>,
    population: Option<CommunityStats>,
}

impl Village {
    pub fn new(
        id: FixtureId,
        status: TownStatus,
        name: impl Into<String>,
        owner: PlayerId,
        race: impl Into<String>,
    ) -> Self {
        Self {
            id,
            status,
            name: name.into(),
            owner,
            race: race.into(),
            image: None,
            portrait: None,
            population: None,
        }
    }

    pub fn population(&self) -> Option<&CommunityStats> {
        self.population.as_ref()
    }

    pub fn population_mut(&mut self) -> Option<&mut CommunityStats> {
        self.population.as_mut()
    }

    pub fn set_population(&mut self, stats: CommunityStats) -> Result<(), DomainError> {
        if self.population.is_some() {
            return Err(DomainError::second_occupant(
                FixtureKind::Village,
                self.id,
                "population",
            ));
        }
        self.population = Some(stats);
        Ok(())
    }

    pub(crate) fn clear_population(&mut self) {
        self.population = None;
    }
}
