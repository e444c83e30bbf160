//! MapGrid aggregate - the authoritative in-memory state of one map
//!
//! # Invariants
//!
//! - A location has at most one primary forest and one primary ground. A
//!   forest or ground that is not primary lives in the tile's fixture bag.
//! - A fixture that duplicates the primary forest or ground of its location
//!   (content-equal, ID aside) is never added to the bag.
//! - Tiles that were never touched read as [`Tile::default`]: unknown terrain,
//!   no rivers, no fixtures.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use crate::entities::{same_members, Fixture, Forest, Ground, Player, Players};
use crate::error::DomainError;
use crate::ids::{FixtureId, PlayerId};
use crate::subset::{IsSubset, SilentSink};
use crate::types::{Location, MapDimensions, River, TileType};
use crate::warning::{Warning, Warnings};

/// What [`MapGrid::add_fixture`] did with a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixturePlacement {
    /// Inserted into the location's fixture bag.
    Added,
    /// Content-equal to the location's primary forest or ground; dropped.
    DroppedDuplicate,
    /// Replaced a fixture with the same ID that one of them was a subset of.
    Replaced,
    /// Shares an ID with an unrelated fixture; both were kept.
    KeptBoth,
}

/// State of one location.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    pub terrain: TileType,
    pub mountainous: bool,
    pub rivers: BTreeSet<River>,
    forest: Option<Forest>,
    ground: Option<Ground>,
    fixtures: Vec<Fixture>,
}

impl Tile {
    /// The primary forest.
    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref()
    }

    /// The primary ground.
    pub fn ground(&self) -> Option<&Ground> {
        self.ground.as_ref()
    }

    /// Every fixture other than the primary forest and ground.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// The primary forest and ground as fixtures, followed by the bag.
    pub fn all_fixtures(&self) -> impl Iterator<Item = Fixture> + '_ {
        let forest = self.forest.clone().map(Fixture::from);
        let ground = self.ground.clone().map(Fixture::from);
        forest
            .into_iter()
            .chain(ground)
            .chain(self.fixtures.iter().cloned())
    }

    pub fn is_blank(&self) -> bool {
        *self == Tile::default()
    }

    fn is_primary_duplicate(&self, fixture: &Fixture) -> bool {
        match fixture {
            Fixture::Forest(_) => self.forest.as_ref().is_some_and(|primary| {
                Fixture::from(primary.clone()).equals_ignoring_id(fixture)
            }),
            Fixture::Ground(_) => self.ground.as_ref().is_some_and(|primary| {
                Fixture::from(primary.clone()).equals_ignoring_id(fixture)
            }),
            _ => false,
        }
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.terrain == other.terrain
            && self.mountainous == other.mountainous
            && self.rivers == other.rivers
            && self.forest == other.forest
            && self.ground == other.ground
            && same_members(&self.fixtures, &other.fixtures)
    }
}

impl Eq for Tile {}

/// The whole map: dimensions, players, turn, and per-location state.
#[derive(Debug, Clone)]
pub struct MapGrid {
    dimensions: MapDimensions,
    players: Players,
    current_turn: i32,
    tiles: BTreeMap<Location, Tile>,
}

impl MapGrid {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(dimensions: MapDimensions, players: Players, current_turn: i32) -> Self {
        Self {
            dimensions,
            players,
            current_turn,
            tiles: BTreeMap::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn current_turn(&self) -> i32 {
        self.current_turn
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.current()
    }

    /// The tile at `location`, if anything was ever set there.
    pub fn tile(&self, location: Location) -> Option<&Tile> {
        self.tiles.get(&location)
    }

    /// Touched tiles in location order.
    pub fn tiles(&self) -> impl Iterator<Item = (Location, &Tile)> {
        self.tiles.iter().map(|(location, tile)| (*location, tile))
    }

    pub fn base_terrain(&self, location: Location) -> TileType {
        self.tile(location)
            .map(|tile| tile.terrain)
            .unwrap_or_default()
    }

    pub fn is_mountainous(&self, location: Location) -> bool {
        self.tile(location).is_some_and(|tile| tile.mountainous)
    }

    pub fn rivers(&self, location: Location) -> impl Iterator<Item = River> + '_ {
        self.tile(location)
            .into_iter()
            .flat_map(|tile| tile.rivers.iter().copied())
    }

    pub fn forest(&self, location: Location) -> Option<&Forest> {
        self.tile(location).and_then(Tile::forest)
    }

    pub fn ground(&self, location: Location) -> Option<&Ground> {
        self.tile(location).and_then(Tile::ground)
    }

    pub fn fixtures(&self, location: Location) -> &[Fixture] {
        self.tile(location).map(Tile::fixtures).unwrap_or(&[])
    }

    /// Find a fixture in any location's bag, searching container members,
    /// mounts and equipment too.
    pub fn find_fixture(&self, id: FixtureId) -> Option<(Location, Cow<'_, Fixture>)> {
        self.tiles.iter().find_map(|(location, tile)| {
            tile.fixtures
                .iter()
                .find_map(|fixture| fixture.find(id))
                .map(|found| (*location, found))
        })
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    fn tile_mut(&mut self, location: Location) -> &mut Tile {
        self.tiles.entry(location).or_default()
    }

    pub fn set_current_turn(&mut self, turn: i32) {
        self.current_turn = turn;
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player);
    }

    pub fn set_current_player(&mut self, id: PlayerId) {
        self.players.set_current(id);
    }

    pub fn set_base_terrain(&mut self, location: Location, terrain: TileType) {
        self.tile_mut(location).terrain = terrain;
    }

    pub fn set_mountainous(&mut self, location: Location, mountainous: bool) {
        self.tile_mut(location).mountainous = mountainous;
    }

    pub fn add_rivers(&mut self, location: Location, rivers: impl IntoIterator<Item = River>) {
        self.tile_mut(location).rivers.extend(rivers);
    }

    pub fn remove_rivers(&mut self, location: Location, rivers: impl IntoIterator<Item = River>) {
        let tile = self.tile_mut(location);
        for river in rivers {
            tile.rivers.remove(&river);
        }
    }

    /// Set or clear the primary forest, returning the one it displaced.
    pub fn set_forest(&mut self, location: Location, forest: Option<Forest>) -> Option<Forest> {
        std::mem::replace(&mut self.tile_mut(location).forest, forest)
    }

    /// Set or clear the primary ground, returning the one it displaced.
    pub fn set_ground(&mut self, location: Location, ground: Option<Ground>) -> Option<Ground> {
        std::mem::replace(&mut self.tile_mut(location).ground, ground)
    }

    /// Add a fixture to a location's bag.
    ///
    /// A content-duplicate of the primary forest or ground is dropped. A
    /// fixture sharing its ID with one already in the bag replaces it when
    /// either is a subset of the other; otherwise both are kept and a
    /// [`Warning::DuplicateFixture`] is recorded, which is the only way this
    /// can fail.
    pub fn add_fixture(
        &mut self,
        location: Location,
        fixture: Fixture,
        warnings: &mut Warnings,
    ) -> Result<FixturePlacement, DomainError> {
        let tile = self.tile_mut(location);
        if tile.is_primary_duplicate(&fixture) {
            tracing::debug!(%fixture, %location, "dropping duplicate of primary terrain fixture");
            return Ok(FixturePlacement::DroppedDuplicate);
        }
        let id = fixture.id();
        let same_id = tile
            .fixtures
            .iter()
            .position(|existing| existing.id() == id);
        let Some(index) = same_id else {
            tile.fixtures.push(fixture);
            return Ok(FixturePlacement::Added);
        };
        let existing = &tile.fixtures[index];
        let related = existing.is_subset(&fixture, &mut SilentSink)
            || fixture.is_subset(existing, &mut SilentSink);
        if related {
            tile.fixtures[index] = fixture;
            Ok(FixturePlacement::Replaced)
        } else {
            tile.fixtures.push(fixture);
            warnings.record(Warning::DuplicateFixture { id, location })?;
            Ok(FixturePlacement::KeptBoth)
        }
    }

    /// Place a top-level fixture the way map readers do: the first forest and
    /// ground seen at a location become primary, everything else goes through
    /// [`MapGrid::add_fixture`].
    pub fn place_fixture(
        &mut self,
        location: Location,
        fixture: Fixture,
        warnings: &mut Warnings,
    ) -> Result<FixturePlacement, DomainError> {
        let tile = self.tile_mut(location);
        let (forest_free, ground_free) = (tile.forest.is_none(), tile.ground.is_none());
        match fixture {
            Fixture::Forest(forest) if forest_free => {
                self.tile_mut(location).forest = Some(forest);
                Ok(FixturePlacement::Added)
            }
            Fixture::Ground(ground) if ground_free => {
                self.tile_mut(location).ground = Some(ground);
                Ok(FixturePlacement::Added)
            }
            other => self.add_fixture(location, other, warnings),
        }
    }

    /// Remove a fixture from a location. Primary forest and ground count.
    pub fn remove_fixture(&mut self, location: Location, fixture: &Fixture) -> bool {
        let Some(tile) = self.tiles.get_mut(&location) else {
            return false;
        };
        match fixture {
            Fixture::Forest(forest) if tile.forest.as_ref() == Some(forest) => {
                tile.forest = None;
                return true;
            }
            Fixture::Ground(ground) if tile.ground.as_ref() == Some(ground) => {
                tile.ground = None;
                return true;
            }
            _ => {}
        }
        match tile.fixtures.iter().position(|existing| existing == fixture) {
            Some(index) => {
                tile.fixtures.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deep, independent copy of the map.
    ///
    /// With `zero` set, owned fixtures not owned by `player` are redacted;
    /// see [`Fixture::copy_for`].
    pub fn copy(&self, zero: bool, player: PlayerId) -> MapGrid {
        let tiles = self
            .tiles
            .iter()
            .map(|(location, tile)| {
                let copy = Tile {
                    fixtures: tile
                        .fixtures
                        .iter()
                        .map(|fixture| fixture.copy_for(zero, player))
                        .collect(),
                    ..tile.clone()
                };
                (*location, copy)
            })
            .collect();
        MapGrid {
            dimensions: self.dimensions,
            players: self.players.clone(),
            current_turn: self.current_turn,
            tiles,
        }
    }
}

impl PartialEq for MapGrid {
    fn eq(&self, other: &Self) -> bool {
        let blank = Tile::default();
        let locations: BTreeSet<&Location> = self.tiles.keys().chain(other.tiles.keys()).collect();
        self.dimensions == other.dimensions
            && self.current_turn == other.current_turn
            && self.players == other.players
            && locations.into_iter().all(|location| {
                self.tiles.get(location).unwrap_or(&blank)
                    == other.tiles.get(location).unwrap_or(&blank)
            })
    }
}

impl Eq for MapGrid {}

impl Hash for MapGrid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimensions.hash(state);
        self.current_turn.hash(state);
        self.current_player().map(|player| player.id).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Animal, Unit, Worker};

    fn grid() -> MapGrid {
        let mut players = Players::new();
        players.insert(Player::new(PlayerId::new(1), "Ann"));
        players.insert(Player::new(PlayerId::new(2), "Ben"));
        MapGrid::new(MapDimensions::new(5, 5, MapDimensions::CURRENT_VERSION), players, 3)
    }

    fn unit(id: i32, owner: i32) -> Fixture {
        Unit::new(FixtureId::new(id), PlayerId::new(owner), "scouts", "Eyes").into()
    }

    const HERE: Location = Location::new(2, 3);

    #[test]
    fn test_duplicate_of_primary_forest_is_dropped() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        map.set_forest(HERE, Some(Forest::new(FixtureId::new(1), "pine")));

        let copy = Fixture::from(Forest::new(FixtureId::new(2), "pine"));
        assert_eq!(
            map.add_fixture(HERE, copy, &mut warnings),
            Ok(FixturePlacement::DroppedDuplicate)
        );
        let other = Fixture::from(Forest::new(FixtureId::new(3), "oak"));
        assert_eq!(map.add_fixture(HERE, other, &mut warnings), Ok(FixturePlacement::Added));
        assert_eq!(map.fixtures(HERE).len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_same_id_subset_replaces() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        map.add_fixture(HERE, unit(7, 2), &mut warnings)
            .expect("first placement");

        let Fixture::Unit(mut fuller) = unit(7, 2) else {
            unreachable!()
        };
        fuller
            .add_member(Worker::new(FixtureId::new(8), "Ana", "human").into())
            .expect("workers belong in units");
        assert_eq!(
            map.add_fixture(HERE, fuller.into(), &mut warnings),
            Ok(FixturePlacement::Replaced)
        );
        assert_eq!(map.fixtures(HERE).len(), 1);
        assert_eq!(map.fixtures(HERE)[0].members().len(), 1);
    }

    #[test]
    fn test_same_id_unrelated_keeps_both_with_warning() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        map.add_fixture(HERE, unit(7, 2), &mut warnings)
            .expect("first placement");
        let animal = Fixture::from(Animal::new(FixtureId::new(7), "bear"));
        assert_eq!(
            map.add_fixture(HERE, animal, &mut warnings),
            Ok(FixturePlacement::KeptBoth)
        );
        assert_eq!(map.fixtures(HERE).len(), 2);
        assert_eq!(
            warnings.items(),
            &[Warning::DuplicateFixture {
                id: FixtureId::new(7),
                location: HERE
            }]
        );
    }

    #[test]
    fn test_place_fixture_fills_primary_slots_first() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        map.place_fixture(HERE, Forest::new(FixtureId::new(1), "pine").into(), &mut warnings)
            .expect("primary");
        map.place_fixture(HERE, Forest::new(FixtureId::new(2), "oak").into(), &mut warnings)
            .expect("bag");
        map.place_fixture(HERE, Ground::new(FixtureId::new(3), "loam", true).into(), &mut warnings)
            .expect("primary");
        assert_eq!(map.forest(HERE).map(|f| f.kind.as_str()), Some("pine"));
        assert_eq!(map.ground(HERE).map(|g| g.id), Some(FixtureId::new(3)));
        assert_eq!(map.fixtures(HERE).len(), 1);
    }

    #[test]
    fn test_rivers_and_terrain() {
        let mut map = grid();
        map.set_base_terrain(HERE, TileType::Jungle);
        map.add_rivers(HERE, [River::North, River::Lake]);
        map.remove_rivers(HERE, [River::North]);
        assert_eq!(map.base_terrain(HERE), TileType::Jungle);
        assert_eq!(map.rivers(HERE).collect::<Vec<_>>(), vec![River::Lake]);
        assert_eq!(map.base_terrain(Location::new(0, 0)), TileType::Unknown);
    }

    #[test]
    fn test_find_and_remove_fixture() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        let Fixture::Unit(mut scouts) = unit(7, 2) else {
            unreachable!()
        };
        scouts
            .add_member(Worker::new(FixtureId::new(8), "Ana", "human").into())
            .expect("workers belong in units");
        let scouts = Fixture::from(scouts);
        map.add_fixture(HERE, scouts.clone(), &mut warnings)
            .expect("placement");

        let (location, worker) = map.find_fixture(FixtureId::new(8)).expect("nested worker");
        assert_eq!(location, HERE);
        assert_eq!(worker.id(), FixtureId::new(8));

        assert!(map.remove_fixture(HERE, &scouts));
        assert!(!map.remove_fixture(HERE, &scouts));
        assert!(map.find_fixture(FixtureId::new(7)).is_none());
    }

    #[test]
    fn test_equality_ignores_fixture_order_and_blank_tiles() {
        let mut warnings = Warnings::collecting();
        let mut left = grid();
        let mut right = grid();
        left.add_fixture(HERE, unit(7, 2), &mut warnings).expect("placement");
        left.add_fixture(HERE, unit(9, 1), &mut warnings).expect("placement");
        right.add_fixture(HERE, unit(9, 1), &mut warnings).expect("placement");
        right.add_fixture(HERE, unit(7, 2), &mut warnings).expect("placement");
        right.set_mountainous(Location::new(0, 0), false);
        assert_eq!(left, right);

        right.set_current_turn(4);
        assert_ne!(left, right);
    }

    #[test]
    fn test_copy_is_independent_and_redacts() {
        let mut map = grid();
        let mut warnings = Warnings::collecting();
        let Fixture::Unit(mut foreign) = unit(7, 2) else {
            unreachable!()
        };
        foreign.set_orders(3, "march");
        map.add_fixture(HERE, foreign.into(), &mut warnings)
            .expect("placement");

        let full = map.copy(false, PlayerId::new(1));
        assert_eq!(full, map);

        let mut redacted = map.copy(true, PlayerId::new(1));
        let Fixture::Unit(copy) = &redacted.fixtures(HERE)[0] else {
            panic!("copy keeps kinds");
        };
        assert!(copy.orders.is_empty());

        redacted.set_base_terrain(HERE, TileType::Desert);
        assert_eq!(map.base_terrain(HERE), TileType::Unknown);
    }
}
