//! The fixture sum type - every placeable game object
//!
//! One variant per kind, with the kind available as a plain tag through
//! [`Fixture::kind`]. Capabilities that only some kinds have (owner, portrait,
//! members) are exposed as methods returning `Option` or an empty slice.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::explorables::{Adventure, Cache, Portal, TextNote};
use super::fortress::Fortress;
use super::items::{Implement, ResourcePile};
use super::mobiles::{Animal, AnimalTracks, Immortal};
use super::settlements::{Town, Village};
use super::terrain_features::{
    Battlefield, Cave, Forest, Ground, Grove, Hill, Meadow, Mine, MineralVein, Oasis, Shrub,
    StoneDeposit,
};
use super::unit::Unit;
use super::worker::Worker;
use crate::error::DomainError;
use crate::ids::{FixtureId, PlayerId};

/// The kind tag of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    Forest,
    Ground,
    Grove,
    Meadow,
    Shrub,
    Mine,
    MineralVein,
    StoneDeposit,
    Hill,
    Oasis,
    Cave,
    Battlefield,
    Animal,
    AnimalTracks,
    Immortal,
    Cache,
    TextNote,
    Portal,
    Adventure,
    Town,
    Village,
    Fortress,
    Unit,
    Worker,
    ResourcePile,
    Implement,
}

impl FixtureKind {
    pub fn all() -> &'static [FixtureKind] {
        &[
            FixtureKind::Forest,
            FixtureKind::Ground,
            FixtureKind::Grove,
            FixtureKind::Meadow,
            FixtureKind::Shrub,
            FixtureKind::Mine,
            FixtureKind::MineralVein,
            FixtureKind::StoneDeposit,
            FixtureKind::Hill,
            FixtureKind::Oasis,
            FixtureKind::Cave,
            FixtureKind::Battlefield,
            FixtureKind::Animal,
            FixtureKind::AnimalTracks,
            FixtureKind::Immortal,
            FixtureKind::Cache,
            FixtureKind::TextNote,
            FixtureKind::Portal,
            FixtureKind::Adventure,
            FixtureKind::Town,
            FixtureKind::Village,
            FixtureKind::Fortress,
            FixtureKind::Unit,
            FixtureKind::Worker,
            FixtureKind::ResourcePile,
            FixtureKind::Implement,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureKind::Forest => "forest",
            FixtureKind::Ground => "ground",
            FixtureKind::Grove => "grove",
            FixtureKind::Meadow => "meadow",
            FixtureKind::Shrub => "shrub",
            FixtureKind::Mine => "mine",
            FixtureKind::MineralVein => "mineral",
            FixtureKind::StoneDeposit => "stone",
            FixtureKind::Hill => "hill",
            FixtureKind::Oasis => "oasis",
            FixtureKind::Cave => "cave",
            FixtureKind::Battlefield => "battlefield",
            FixtureKind::Animal => "animal",
            FixtureKind::AnimalTracks => "tracks",
            FixtureKind::Immortal => "immortal",
            FixtureKind::Cache => "cache",
            FixtureKind::TextNote => "text",
            FixtureKind::Portal => "portal",
            FixtureKind::Adventure => "adventure",
            FixtureKind::Town => "town",
            FixtureKind::Village => "village",
            FixtureKind::Fortress => "fortress",
            FixtureKind::Unit => "unit",
            FixtureKind::Worker => "worker",
            FixtureKind::ResourcePile => "resource",
            FixtureKind::Implement => "implement",
        }
    }

    /// Kinds that can hold other fixtures or nested records.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            FixtureKind::Fortress
                | FixtureKind::Unit
                | FixtureKind::Worker
                | FixtureKind::Town
                | FixtureKind::Village
        )
    }

    /// Kinds excluded from subset comparison: caches, free text and tracks.
    pub fn is_non_authoritative(&self) -> bool {
        matches!(
            self,
            FixtureKind::Cache | FixtureKind::TextNote | FixtureKind::AnimalTracks
        )
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FixtureKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixtureKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown fixture kind: {}", s)))
    }
}

/// Any placeable game object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fixture {
    Forest(Forest),
    Ground(Ground),
    Grove(Grove),
    Meadow(Meadow),
    Shrub(Shrub),
    Mine(Mine),
    MineralVein(MineralVein),
    StoneDeposit(StoneDeposit),
    Hill(Hill),
    Oasis(Oasis),
    Cave(Cave),
    Battlefield(Battlefield),
    Animal(Animal),
    AnimalTracks(AnimalTracks),
    Immortal(Immortal),
    Cache(Cache),
    TextNote(TextNote),
    Portal(Portal),
    Adventure(Adventure),
    Town(Town),
    Village(Village),
    Fortress(Fortress),
    Unit(Unit),
    Worker(Worker),
    ResourcePile(ResourcePile),
    Implement(Implement),
}

/// Apply the same expression to whichever struct the variant wraps.
macro_rules! each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Fixture::Forest($inner) => $body,
            Fixture::Ground($inner) => $body,
            Fixture::Grove($inner) => $body,
            Fixture::Meadow($inner) => $body,
            Fixture::Shrub($inner) => $body,
            Fixture::Mine($inner) => $body,
            Fixture::MineralVein($inner) => $body,
            Fixture::StoneDeposit($inner) => $body,
            Fixture::Hill($inner) => $body,
            Fixture::Oasis($inner) => $body,
            Fixture::Cave($inner) => $body,
            Fixture::Battlefield($inner) => $body,
            Fixture::Animal($inner) => $body,
            Fixture::AnimalTracks($inner) => $body,
            Fixture::Immortal($inner) => $body,
            Fixture::Cache($inner) => $body,
            Fixture::TextNote($inner) => $body,
            Fixture::Portal($inner) => $body,
            Fixture::Adventure($inner) => $body,
            Fixture::Town($inner) => $body,
            Fixture::Village($inner) => $body,
            Fixture::Fortress($inner) => $body,
            Fixture::Unit($inner) => $body,
            Fixture::Worker($inner) => $body,
            Fixture::ResourcePile($inner) => $body,
            Fixture::Implement($inner) => $body,
        }
    };
}

impl Fixture {
    pub fn id(&self) -> FixtureId {
        each_variant!(self, inner => inner.id)
    }

    pub fn set_id(&mut self, id: FixtureId) {
        each_variant!(self, inner => inner.id = id)
    }

    pub fn kind(&self) -> FixtureKind {
        match self {
            Fixture::Forest(_) => FixtureKind::Forest,
            Fixture::Ground(_) => FixtureKind::Ground,
            Fixture::Grove(_) => FixtureKind::Grove,
            Fixture::Meadow(_) => FixtureKind::Meadow,
            Fixture::Shrub(_) => FixtureKind::Shrub,
            Fixture::Mine(_) => FixtureKind::Mine,
            Fixture::MineralVein(_) => FixtureKind::MineralVein,
            Fixture::StoneDeposit(_) => FixtureKind::StoneDeposit,
            Fixture::Hill(_) => FixtureKind::Hill,
            Fixture::Oasis(_) => FixtureKind::Oasis,
            Fixture::Cave(_) => FixtureKind::Cave,
            Fixture::Battlefield(_) => FixtureKind::Battlefield,
            Fixture::Animal(_) => FixtureKind::Animal,
            Fixture::AnimalTracks(_) => FixtureKind::AnimalTracks,
            Fixture::Immortal(_) => FixtureKind::Immortal,
            Fixture::Cache(_) => FixtureKind::Cache,
            Fixture::TextNote(_) => FixtureKind::TextNote,
            Fixture::Portal(_) => FixtureKind::Portal,
            Fixture::Adventure(_) => FixtureKind::Adventure,
            Fixture::Town(_) => FixtureKind::Town,
            Fixture::Village(_) => FixtureKind::Village,
            Fixture::Fortress(_) => FixtureKind::Fortress,
            Fixture::Unit(_) => FixtureKind::Unit,
            Fixture::Worker(_) => FixtureKind::Worker,
            Fixture::ResourcePile(_) => FixtureKind::ResourcePile,
            Fixture::Implement(_) => FixtureKind::Implement,
        }
    }

    /// Per-instance display-image override.
    pub fn image(&self) -> Option<&str> {
        each_variant!(self, inner => inner.image.as_deref())
    }

    pub fn set_image(&mut self, image: Option<String>) {
        each_variant!(self, inner => inner.image = image)
    }

    /// Portrait override, for kinds that have one.
    pub fn portrait(&self) -> Option<&str> {
        match self {
            Fixture::Town(town) => town.portrait.as_deref(),
            Fixture::Village(village) => village.portrait.as_deref(),
            Fixture::Fortress(fortress) => fortress.portrait.as_deref(),
            Fixture::Unit(unit) => unit.portrait.as_deref(),
            Fixture::Worker(worker) => worker.portrait.as_deref(),
            _ => None,
        }
    }

    /// Owning player, for kinds that implement ownership.
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Fixture::Adventure(adventure) => Some(adventure.owner),
            Fixture::Town(town) => Some(town.owner),
            Fixture::Village(village) => Some(village.owner),
            Fixture::Fortress(fortress) => Some(fortress.owner),
            Fixture::Unit(unit) => Some(unit.owner),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Nested fixtures of a fortress or unit; empty for everything else.
    pub fn members(&self) -> &[Fixture] {
        match self {
            Fixture::Fortress(fortress) => fortress.members(),
            Fixture::Unit(unit) => unit.members(),
            _ => &[],
        }
    }

    /// Find this fixture or anything nested in it by ID, depth first.
    ///
    /// A worker's mount and equipment are not held as fixtures, so they come
    /// back owned.
    pub fn find(&self, id: FixtureId) -> Option<Cow<'_, Fixture>> {
        if self.id() == id {
            return Some(Cow::Borrowed(self));
        }
        if let Fixture::Worker(worker) = self {
            if let Some(mount) = worker.mount().filter(|mount| mount.id == id) {
                return Some(Cow::Owned(mount.clone().into()));
            }
            if let Some(implement) = worker.equipment().iter().find(|i| i.id == id) {
                return Some(Cow::Owned(implement.clone().into()));
            }
        }
        self.members().iter().find_map(|member| member.find(id))
    }

    /// Content equality with the ID left out of the comparison.
    pub fn equals_ignoring_id(&self, other: &Fixture) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        let mut renumbered = other.clone();
        renumbered.set_id(self.id());
        *self == renumbered
    }

    /// Deep copy for a player's view of the map.
    ///
    /// With `zero` set, fixtures that have an owner other than `player` lose
    /// their sensitive contents: members of fortresses and units are omitted,
    /// unit orders and results are cleared, settlement population statistics
    /// are dropped, town DCs are zeroed and adventure descriptions are blanked.
    pub fn copy_for(&self, zero: bool, player: PlayerId) -> Fixture {
        let mut copy = self.clone();
        if zero && self.owner().is_some_and(|owner| owner != player) {
            copy.zero();
        }
        copy
    }

    fn zero(&mut self) {
        match self {
            Fixture::Fortress(fortress) => fortress.members_mut().clear(),
            Fixture::Unit(unit) => {
                unit.orders.clear();
                unit.results.clear();
                unit.members_mut().clear();
            }
            Fixture::Town(town) => {
                town.dc = 0;
                town.clear_population();
            }
            Fixture::Village(village) => village.clear_population(),
            Fixture::Adventure(adventure) => adventure.full.clear(),
            _ => {}
        }
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID #{})", self.kind(), self.id())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Fixture {
                fn from(value: $variant) -> Self {
                    Fixture::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Forest,
    Ground,
    Grove,
    Meadow,
    Shrub,
    Mine,
    MineralVein,
    StoneDeposit,
    Hill,
    Oasis,
    Cave,
    Battlefield,
    Animal,
    AnimalTracks,
    Immortal,
    Cache,
    TextNote,
    Portal,
    Adventure,
    Town,
    Village,
    Fortress,
    Unit,
    Worker,
    ResourcePile,
    Implement,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TownKind, TownSize, TownStatus};
    use crate::CommunityStats;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FixtureKind::all() {
            assert_eq!(kind.as_str().parse::<FixtureKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_equals_ignoring_id() {
        let a = Fixture::from(Forest::new(FixtureId::new(1), "pine"));
        let b = Fixture::from(Forest::new(FixtureId::new(2), "pine"));
        let c = Fixture::from(Forest::new(FixtureId::new(1), "oak"));
        assert!(a.equals_ignoring_id(&b));
        assert!(!a.equals_ignoring_id(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_reaches_nested_members() {
        let mut unit = Unit::new(FixtureId::new(5), PlayerId::new(1), "scouts", "Eyes");
        unit.add_member(Worker::new(FixtureId::new(10), "Ana", "human").into())
            .expect("workers belong in units");
        let mut fortress = Fortress::new(FixtureId::new(1), PlayerId::new(1), "Keep", TownSize::Small);
        fortress.add_member(unit.into()).expect("units belong in fortresses");
        let fixture = Fixture::from(fortress);
        assert_eq!(
            fixture.find(FixtureId::new(10)).map(|found| found.kind()),
            Some(FixtureKind::Worker)
        );
        assert!(fixture.find(FixtureId::new(99)).is_none());
    }

    #[test]
    fn test_find_reaches_mount_and_equipment() {
        let mut worker = Worker::new(FixtureId::new(10), "Ana", "human");
        worker
            .set_mount(Animal::new(FixtureId::new(11), "horse"))
            .expect("first mount");
        worker.add_equipment(Implement::new(FixtureId::new(12), "plow"));
        let mut unit = Unit::new(FixtureId::new(5), PlayerId::new(1), "farmers", "Tillers");
        unit.add_member(worker.into()).expect("workers belong in units");
        let fixture = Fixture::from(unit);

        let mount = fixture.find(FixtureId::new(11)).expect("mount");
        assert!(matches!(mount.as_ref(), Fixture::Animal(animal) if animal.kind == "horse"));
        let implement = fixture.find(FixtureId::new(12)).expect("equipment");
        assert_eq!(implement.kind(), FixtureKind::Implement);
    }

    #[test]
    fn test_copy_for_zeroes_only_other_players() {
        let mut town = Town::new(
            FixtureId::new(3),
            TownKind::Town,
            TownStatus::Active,
            TownSize::Medium,
            "Brook",
            PlayerId::new(2),
        );
        town.dc = 15;
        town.set_population(CommunityStats::new(40)).expect("first block");
        let fixture = Fixture::from(town);

        let own_view = fixture.copy_for(true, PlayerId::new(2));
        assert_eq!(own_view, fixture);

        let Fixture::Town(foreign) = fixture.copy_for(true, PlayerId::new(1)) else {
            panic!("copy keeps the kind");
        };
        assert_eq!(foreign.dc, 0);
        assert!(foreign.population().is_none());

        assert_eq!(fixture.copy_for(false, PlayerId::new(1)), fixture);
    }

    #[test]
    fn test_copy_for_omits_members_of_foreign_units() {
        let mut unit = Unit::new(FixtureId::new(7), PlayerId::new(2), "army", "Host");
        unit.set_orders(3, "march north");
        unit.add_member(Worker::new(FixtureId::new(8), "Cy", "dwarf").into())
            .expect("workers belong in units");
        let Fixture::Unit(copy) = Fixture::from(unit).copy_for(true, PlayerId::new(1)) else {
            panic!("copy keeps the kind");
        };
        assert!(copy.members().is_empty());
        assert!(copy.orders.is_empty());
        assert_eq!(copy.name, "Host");
    }
}
