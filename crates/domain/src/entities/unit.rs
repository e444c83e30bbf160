//! Unit entity - a group of workers, animals and supplies under one owner

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use super::{same_members, Fixture, FixtureKind};
use crate::containment::{self, ContaineeKind};
use crate::error::DomainError;
use crate::ids::{FixtureId, PlayerId};

/// A unit in the field.
///
/// Orders and results are keyed by turn number.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: FixtureId,
    pub owner: PlayerId,
    pub kind: String,
    pub name: String,
    pub orders: BTreeMap<i32, String>,
    pub results: BTreeMap<i32, String>,
    pub image: Option<String>,
    pub portrait: Option<String>,
    members: Vec<Fixture>,
}

impl Unit {
    pub fn new(
        id: FixtureId,
        owner: PlayerId,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner,
            kind: kind.into(),
            name: name.into(),
            orders: BTreeMap::new(),
            results: BTreeMap::new(),
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
            FixtureKind::Unit,
            self.id,
            ContaineeKind::Fixture(member.kind()),
        )?;
        self.members.push(member);
        Ok(())
    }

    pub fn set_orders(&mut self, turn: i32, orders: impl Into<String>) {
        self.orders.insert(turn, orders.into());
    }

    pub fn set_results(&mut self, turn: i32, results: impl Into<String>) {
        self.results.insert(turn, results.into());
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<Fixture> {
        &mut self.members
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.owner == other.owner
            && self.kind == other.kind
            && self.name == other.name
            && self.orders == other.orders
            && self.results == other.results
            && self.image == other.image
            && self.portrait == other.portrait
            && same_members(&self.members, &other.members)
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.owner.hash(state);
        self.kind.hash(state);
        self.name.hash(state);
    }
}
