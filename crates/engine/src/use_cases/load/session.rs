//! The two-phase load of a flat record stream.
//!
//! Phase one ([`LoadSession::accept`]) decodes records in whatever order they
//! arrive and stages them. Phase two ([`LoadSession::finish`]) links every
//! nested record to its container, innermost containers first, then places
//! the top-level fixtures on the grid. A fatal error in either phase means no
//! map at all.

use std::collections::{HashMap, HashSet};

use mapkeep_domain::containment::{self, Containee, ContaineeKind};
use mapkeep_domain::{
    Fixture, FixtureId, IdRegistry, Location, MapDimensions, MapGrid, Player, River, TileType,
    Warning, WarningPolicy, Warnings,
};

use crate::error::LoadError;
use crate::records::codec::{self, Placement};
use crate::records::{Record, RecordKind};

/// A successfully loaded map and the warnings raised while loading it.
#[derive(Debug)]
pub struct LoadedMap {
    pub map: MapGrid,
    pub warnings: Vec<Warning>,
}

/// Progress callback, called with the number of records read so far.
pub type ProgressFn = Box<dyn FnMut(usize)>;

enum Pending {
    Member(usize),
    Entry(Containee),
}

/// State of one load, from the first record to the finished map.
pub struct LoadSession {
    registry: IdRegistry,
    warnings: Warnings,
    progress_interval: usize,
    on_progress: Option<ProgressFn>,
    seen: usize,
    header: Option<(MapDimensions, i32)>,
    players: Vec<Player>,
    tiles: Vec<(Location, TileType, bool)>,
    rivers: Vec<(Location, River)>,
    // Fixture arena: index -> fixture, its ID and its placement.
    fixtures: Vec<Option<Fixture>>,
    ids: Vec<FixtureId>,
    placements: Vec<Placement>,
    // Container ID -> arena index. A repeated container ID indexes the last one.
    containers: HashMap<FixtureId, usize>,
    entries: Vec<(FixtureId, RecordKind, Containee)>,
}

impl LoadSession {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// A session reporting progress every `progress_interval` records; zero
    /// disables progress reporting.
    pub fn new(policy: WarningPolicy, progress_interval: usize) -> Self {
        Self {
            registry: IdRegistry::new(),
            warnings: Warnings::new(policy),
            progress_interval,
            on_progress: None,
            seen: 0,
            header: None,
            players: Vec::new(),
            tiles: Vec::new(),
            rivers: Vec::new(),
            fixtures: Vec::new(),
            ids: Vec::new(),
            placements: Vec::new(),
            containers: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    // =========================================================================
    // Phase one
    // =========================================================================

    /// Decode and stage one record.
    pub fn accept(&mut self, record: &Record) -> Result<(), LoadError> {
        self.tick();
        let warnings = &mut self.warnings;
        match record.kind() {
            RecordKind::Map => {
                self.header = Some(codec::decode_header(record, warnings)?);
            }
            RecordKind::Player => self.players.push(codec::decode_player(record, warnings)?),
            RecordKind::Tile => self.tiles.push(codec::decode_tile(record, warnings)?),
            RecordKind::River => self.rivers.push(codec::decode_river(record, warnings)?),
            RecordKind::Fixture(_) => {
                let (fixture, placement) = codec::decode_fixture(record, warnings)?;
                let id = self.registry.register(fixture.id(), warnings)?;
                let index = self.fixtures.len();
                if fixture.is_container() {
                    self.containers.insert(id, index);
                }
                self.fixtures.push(Some(fixture));
                self.ids.push(id);
                self.placements.push(placement);
            }
            kind => {
                let (parent, entry) = codec::decode_entry(record, warnings)?;
                if let Containee::Production { pile, .. } = &entry {
                    self.registry.register(pile.id, warnings)?;
                }
                self.entries.push((parent, kind, entry));
            }
        }
        Ok(())
    }

    fn tick(&mut self) {
        self.seen += 1;
        if self.progress_interval == 0 || self.seen % self.progress_interval != 0 {
            return;
        }
        tracing::info!(records = self.seen, "Reading map");
        if let Some(on_progress) = self.on_progress.as_mut() {
            on_progress(self.seen);
        }
    }

    // =========================================================================
    // Phase two
    // =========================================================================

    fn container_index(&self, parent: FixtureId, kind: impl ToString) -> Result<usize, LoadError> {
        self.containers
            .get(&parent)
            .copied()
            .ok_or_else(|| LoadError::OrphanReference {
                kind: kind.to_string(),
                parent,
            })
    }

    /// Link every staged record and build the map.
    pub fn finish(mut self) -> Result<LoadedMap, LoadError> {
        let (dimensions, current_turn) = self.header.ok_or(LoadError::MissingHeader)?;

        let count = self.fixtures.len();
        let mut children: Vec<Vec<(ContaineeKind, Pending)>> =
            (0..count).map(|_| Vec::new()).collect();
        let mut parent_of: Vec<Option<usize>> = vec![None; count];
        for index in 0..count {
            let Placement::In(parent) = self.placements[index] else {
                continue;
            };
            let Some(fixture) = self.fixtures[index].as_ref() else {
                continue;
            };
            let kind = fixture.kind();
            let container = self.container_index(parent, kind)?;
            parent_of[index] = Some(container);
            children[container].push((ContaineeKind::Fixture(kind), Pending::Member(index)));
        }
        for (parent, kind, entry) in std::mem::take(&mut self.entries) {
            let container = self.container_index(parent, kind)?;
            children[container].push((entry.kind(), Pending::Entry(entry)));
        }

        let roots: Vec<usize> = (0..count)
            .filter(|index| matches!(self.placements[*index], Placement::At(_)))
            .collect();
        self.check_reachable(&roots, &children, &parent_of)?;

        let mut map = MapGrid::new(
            dimensions,
            self.players.drain(..).collect(),
            current_turn,
        );
        for (location, terrain, mountainous) in self.tiles.drain(..) {
            map.set_base_terrain(location, terrain);
            map.set_mountainous(location, mountainous);
        }
        for (location, river) in self.rivers.drain(..) {
            map.add_rivers(location, [river]);
        }

        for index in roots {
            let Placement::At(location) = self.placements[index] else {
                continue;
            };
            let fixture = self.build(index, &mut children)?;
            map.place_fixture(location, fixture, &mut self.warnings)?;
        }

        tracing::debug!(
            records = self.seen,
            ids = self.registry.len(),
            warnings = self.warnings.len(),
            "Finished loading map"
        );
        Ok(LoadedMap {
            map,
            warnings: self.warnings.into_inner(),
        })
    }

    /// Every nested fixture must hang, through its containers, off a
    /// top-level one; anything else sits on a containment cycle.
    fn check_reachable(
        &self,
        roots: &[usize],
        children: &[Vec<(ContaineeKind, Pending)>],
        parent_of: &[Option<usize>],
    ) -> Result<(), LoadError> {
        let mut reached = vec![false; self.fixtures.len()];
        let mut stack = roots.to_vec();
        while let Some(index) = stack.pop() {
            if std::mem::replace(&mut reached[index], true) {
                continue;
            }
            stack.extend(children[index].iter().filter_map(|(_, child)| match child {
                Pending::Member(member) => Some(*member),
                Pending::Entry(_) => None,
            }));
        }
        let Some(start) = reached.iter().position(|reached| !reached) else {
            return Ok(());
        };
        let mut visited = HashSet::new();
        let mut current = start;
        while visited.insert(current) {
            match parent_of[current] {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Err(LoadError::ContainmentCycle {
            container: self.ids[current],
        })
    }

    /// Take fixture `index` out of the arena with everything it contains
    /// attached, innermost first.
    fn build(
        &mut self,
        index: usize,
        children: &mut [Vec<(ContaineeKind, Pending)>],
    ) -> Result<Fixture, LoadError> {
        let mut fixture = self.fixtures[index]
            .take()
            .ok_or(LoadError::ContainmentCycle {
                container: self.ids[index],
            })?;
        let mut pending = std::mem::take(&mut children[index]);
        pending.sort_by_key(|(kind, _)| kind.attach_order());
        for (kind, child) in pending {
            containment::check(fixture.kind(), fixture.id(), kind)?;
            let child = match child {
                Pending::Member(member) => Containee::Fixture(self.build(member, children)?),
                Pending::Entry(entry) => entry,
            };
            containment::attach(&mut fixture, child)?;
        }
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use mapkeep_domain::{DomainError, FixtureKind};

    fn header() -> Record {
        codec::encode_header(MapDimensions::new(5, 5, 2), 4)
    }

    fn fixture(kind: FixtureKind, id: i32) -> Record {
        Record::new(RecordKind::Fixture(kind)).with("id", id)
    }

    fn unit_at(id: i32, row: i32, column: i32) -> Record {
        fixture(FixtureKind::Unit, id)
            .with("row", row)
            .with("column", column)
            .with("owner", 1)
            .with("kind", "explorers")
            .with("name", "Far")
    }

    fn worker_in(id: i32, parent: i32) -> Record {
        fixture(FixtureKind::Worker, id)
            .with("parent", parent)
            .with("name", "Ana")
            .with("race", "human")
    }

    fn load(records: &[Record]) -> Result<LoadedMap, LoadError> {
        let mut session = LoadSession::new(WarningPolicy::Collect, 0);
        for record in records {
            session.accept(record)?;
        }
        session.finish()
    }

    #[test]
    fn test_nested_records_link_regardless_of_order() {
        let job = Record::new(RecordKind::Job)
            .with("parent", 10)
            .with("name", "farmer")
            .with("level", 2);
        let skill = Record::new(RecordKind::Skill)
            .with("parent", 10)
            .with("job", "farmer")
            .with("name", "plowing")
            .with("level", 1)
            .with("hours", 5);
        let records = [skill, job, worker_in(10, 5), unit_at(5, 1, 1), header()];

        let loaded = load(&records).expect("loads");
        let fixtures = loaded.map.fixtures(Location::new(1, 1));
        assert_eq!(fixtures.len(), 1);
        let Fixture::Unit(unit) = &fixtures[0] else {
            panic!("expected a unit, got {}", fixtures[0]);
        };
        let Fixture::Worker(worker) = &unit.members()[0] else {
            panic!("expected a worker");
        };
        let farmer = worker.job("farmer").expect("job attached");
        assert_eq!(farmer.level, 2);
        assert_eq!(farmer.skill("plowing").map(|s| s.hours), Some(5));
    }

    #[test]
    fn test_missing_parent_is_an_orphan() {
        let err = load(&[header(), worker_in(10, 99)]).expect_err("orphan");
        assert!(matches!(
            err,
            LoadError::OrphanReference { ref kind, parent } if kind == "worker" && parent == FixtureId::new(99)
        ));
    }

    #[test]
    fn test_non_container_parent_is_an_orphan() {
        let hill = fixture(FixtureKind::Hill, 3).with("row", 0).with("column", 0);
        let err = load(&[header(), hill, worker_in(10, 3)]).expect_err("hill holds nothing");
        assert!(matches!(err, LoadError::OrphanReference { .. }));
    }

    #[test]
    fn test_illegal_pair_is_fatal() {
        let inner = fixture(FixtureKind::Unit, 6)
            .with("parent", 5)
            .with("owner", 1)
            .with("kind", "scouts")
            .with("name", "Near");
        let err = load(&[header(), unit_at(5, 0, 0), inner]).expect_err("unit in unit");
        assert!(matches!(
            err,
            LoadError::Domain(DomainError::IllegalContainment { .. })
        ));
    }

    #[test]
    fn test_containment_cycle_is_fatal() {
        let fortress = fixture(FixtureKind::Fortress, 1)
            .with("parent", 2)
            .with("owner", 1)
            .with("name", "Keep")
            .with("size", "small");
        let unit = fixture(FixtureKind::Unit, 2)
            .with("parent", 1)
            .with("owner", 1)
            .with("kind", "guards")
            .with("name", "Watch");
        let err = load(&[header(), fortress, unit]).expect_err("cycle");
        assert!(matches!(err, LoadError::ContainmentCycle { .. }));
    }

    #[test]
    fn test_second_population_block_is_fatal() {
        let town = fixture(FixtureKind::Town, 7)
            .with("row", 2)
            .with("column", 2)
            .with("kind", "town")
            .with("status", "active")
            .with("size", "small")
            .with("discoverDC", 10)
            .with("name", "Brook")
            .with("owner", 1);
        let population = |size: i32| {
            Record::new(RecordKind::Population)
                .with("parent", 7)
                .with("population", size)
        };
        let err = load(&[header(), town, population(10), population(20)])
            .expect_err("two population blocks");
        assert!(matches!(
            err,
            LoadError::Domain(DomainError::SecondOccupant { slot: "population", .. })
        ));
    }

    #[test]
    fn test_population_entries_need_a_block() {
        let village = fixture(FixtureKind::Village, 8)
            .with("row", 2)
            .with("column", 2)
            .with("status", "active")
            .with("name", "Reed")
            .with("owner", 1)
            .with("race", "elf");
        let field = Record::new(RecordKind::WorkedField)
            .with("parent", 8)
            .with("field", 3);
        let err = load(&[header(), village, field]).expect_err("no population block");
        assert!(matches!(err, LoadError::Domain(DomainError::EmptySlot { .. })));
    }

    #[test]
    fn test_missing_header_and_old_version() {
        assert!(matches!(
            load(&[unit_at(5, 0, 0)]),
            Err(LoadError::MissingHeader)
        ));
        let old = codec::encode_header(MapDimensions::new(5, 5, 1), 0);
        assert!(matches!(
            load(&[old]),
            Err(LoadError::UnsupportedVersion { found: 1 })
        ));
    }

    #[test]
    fn test_duplicate_id_warns_or_fails_by_policy() {
        let hill = |id: i32| fixture(FixtureKind::Hill, id).with("row", 0).with("column", 0);
        let loaded = load(&[header(), hill(3), hill(3)]).expect("collect policy");
        assert!(loaded
            .warnings
            .contains(&Warning::DuplicateId { id: FixtureId::new(3) }));

        let mut strict = LoadSession::new(WarningPolicy::Strict, 0);
        strict.accept(&header()).expect("header");
        strict.accept(&hill(3)).expect("first");
        assert!(matches!(
            strict.accept(&hill(3)),
            Err(LoadError::Domain(DomainError::Escalated(Warning::DuplicateId { .. })))
        ));
    }

    #[test]
    fn test_progress_is_reported_every_interval() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = LoadSession::new(WarningPolicy::Collect, 2)
            .with_progress(Box::new(move |count| sink.borrow_mut().push(count)));
        for record in [header(), unit_at(1, 0, 0), unit_at(2, 0, 1), unit_at(3, 0, 2), unit_at(4, 1, 0)] {
            session.accept(&record).expect("accepts");
        }
        assert_eq!(*seen.borrow(), vec![2, 4]);
        session.finish().expect("finishes");
    }
}
