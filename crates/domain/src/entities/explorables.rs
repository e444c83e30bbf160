//! Things to find: caches, portals, adventure hooks and free-text notes

use crate::ids::{FixtureId, PlayerId};
use crate::types::Location;

/// A hidden stash. Not authoritative map state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cache {
    pub id: FixtureId,
    pub kind: String,
    pub contents: String,
    pub image: Option<String>,
}

/// A free-text annotation, optionally tied to the turn it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextNote {
    pub id: FixtureId,
    pub text: String,
    pub turn: Option<i32>,
    pub image: Option<String>,
}

/// A gate to another world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Portal {
    pub id: FixtureId,
    pub destination_world: String,
    /// Where it leads in the other world, if known.
    pub destination: Option<Location>,
    pub image: Option<String>,
}

/// An adventure hook, possibly already claimed by a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Adventure {
    pub id: FixtureId,
    pub owner: PlayerId,
    pub brief: String,
    pub full: String,
    pub image: Option<String>,
}
