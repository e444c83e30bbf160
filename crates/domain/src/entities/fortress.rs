//! Fortress entity - a player's stronghold and the units stationed in it

use std::hash::{Hash, Hasher};

use super::{same_members, Fixture, FixtureKind};
use crate::containment::{self, ContaineeKind};
use crate::error::DomainError;
use crate::ids::{FixtureId, PlayerId};
use crate::types::TownSize;

/// A fortress. Holds units, resource piles and implements.
#[derive(Debug, Clone)]
pub struct Fortress {
    pub id: FixtureId,
    pub owner: PlayerId,
    pub name: String,
    pub size: TownSize,
    pub image: Option<String>,
    pub portrait: Option<String>,
    members: Vec<Fixture>,
}

impl Fortress {
    pub fn new(id: FixtureId, owner: PlayerId, name: impl Into<String>, size: TownSize) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            size,
            image: None,
            portrait: None,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Fixture] {
        &self.members
    }

    /// Add a member, checked against the containment table.
    pub fn add_member(&mut self, member: Fixture) -> Result<(), DomainError> {
        containment::check(
            FixtureKind::Fortress,
            self.id,
            ContaineeKind::Fixture(member.kind()),
        )?;
        self.members.push(member);
        Ok(())
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<Fixture> {
        &mut self.members
    }
}

impl PartialEq for Fortress {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.owner == other.owner
            && self.name == other.name
            && self.size == other.size
            && self.image == other.image
            && self.portrait == other.portrait
            && same_members(&self.members, &other.members)
    }
}

impl Eq for Fortress {}

impl Hash for Fortress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.owner.hash(state);
        self.name.hash(state);
        self.size.hash(state);
    }
}
