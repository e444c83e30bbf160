//! Players and the per-map player registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// A player of the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Whether this is the player whose turn/view the map represents.
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current: false,
            portrait: None,
            country: None,
        }
    }

    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// The players known to one map, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Players {
    players: BTreeMap<PlayerId, Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a player. Adding a current player clears the flag on
    /// every other player.
    pub fn insert(&mut self, player: Player) {
        if player.current {
            for other in self.players.values_mut() {
                other.current = false;
            }
        }
        self.players.insert(player.id, player);
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn current(&self) -> Option<&Player> {
        self.players.values().find(|player| player.current)
    }

    /// Make `id` the current player. Unknown IDs leave nobody current.
    pub fn set_current(&mut self, id: PlayerId) {
        for player in self.players.values_mut() {
            player.current = player.id == id;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<Player> for Players {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        let mut players = Players::new();
        for player in iter {
            players.insert(player);
        }
        players
    }
}
