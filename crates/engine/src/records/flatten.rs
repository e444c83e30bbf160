//! Turning a map into the flat record stream both writers consume.

use mapkeep_domain::{CommunityStats, Containee, Fixture, Job, MapGrid};

use super::codec::{self, Placement};
use super::Record;

/// Every record describing `map`, grouped by kind in [`super::RecordKind::order`].
///
/// Within a location the primary forest and ground come first, so a reader
/// placing fixtures in record order restores them as primary.
pub fn flatten(map: &MapGrid) -> Vec<Record> {
    let mut records = vec![codec::encode_header(map.dimensions(), map.current_turn())];
    records.extend(map.players().iter().map(codec::encode_player));
    for (location, tile) in map.tiles() {
        if tile.is_blank() {
            continue;
        }
        records.push(codec::encode_tile(location, tile.terrain, tile.mountainous));
        records.extend(
            tile.rivers
                .iter()
                .map(|river| codec::encode_river(location, *river)),
        );
        for fixture in tile.all_fixtures() {
            push_fixture(&mut records, &fixture, Placement::At(location));
        }
    }
    records.sort_by_key(|record| record.kind().order());
    records
}

/// What a container holds: member fixtures, and entries that are not fixtures.
#[derive(Debug, Default)]
pub struct Contents {
    pub members: Vec<Fixture>,
    pub entries: Vec<Containee>,
}

/// The contents of `fixture`; empty for anything that is not a container.
pub fn contents(fixture: &Fixture) -> Contents {
    let mut contents = Contents::default();
    match fixture {
        Fixture::Fortress(fortress) => contents.members.extend_from_slice(fortress.members()),
        Fixture::Unit(unit) => {
            contents.members.extend_from_slice(unit.members());
            let orders = unit.orders.iter().map(|entry| (entry, false));
            let results = unit.results.iter().map(|entry| (entry, true));
            for ((turn, text), results) in orders.chain(results) {
                contents.entries.push(Containee::Orders {
                    turn: *turn,
                    text: text.clone(),
                    results,
                });
            }
        }
        Fixture::Worker(worker) => {
            for job in worker.jobs() {
                contents
                    .entries
                    .push(Containee::Job(Job::new(&job.name, job.level)));
                for skill in &job.skills {
                    contents.entries.push(Containee::Skill {
                        job: job.name.clone(),
                        skill: skill.clone(),
                    });
                }
            }
            contents
                .members
                .extend(worker.mount().cloned().map(Fixture::from));
            contents
                .members
                .extend(worker.equipment().iter().cloned().map(Fixture::from));
        }
        Fixture::Town(town) => population_entries(&mut contents.entries, town.population()),
        Fixture::Village(village) => {
            population_entries(&mut contents.entries, village.population())
        }
        _ => {}
    }
    contents
}

fn push_fixture(records: &mut Vec<Record>, fixture: &Fixture, placement: Placement) {
    records.push(codec::encode_fixture(fixture, placement));
    let parent = fixture.id();
    let Contents { members, entries } = contents(fixture);
    for member in &members {
        push_fixture(records, member, Placement::In(parent));
    }
    records.extend(
        entries
            .iter()
            .filter_map(|entry| codec::encode_entry(parent, entry)),
    );
}

fn population_entries(entries: &mut Vec<Containee>, stats: Option<&CommunityStats>) {
    let Some(stats) = stats else {
        return;
    };
    entries.push(Containee::Population(CommunityStats::new(stats.population)));
    for (skill, level) in &stats.expertise {
        entries.push(Containee::Expertise {
            skill: skill.clone(),
            level: *level,
        });
    }
    entries.extend(stats.worked_fields.iter().copied().map(Containee::WorkedField));
    let produced = stats.produced.iter().map(|pile| (pile, false));
    let consumed = stats.consumed.iter().map(|pile| (pile, true));
    for (pile, consumed) in produced.chain(consumed) {
        entries.push(Containee::Production {
            pile: pile.clone(),
            consumed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FieldValue, RecordKind};
    use mapkeep_domain::{
        Animal, FixtureId, FixtureKind, Forest, Location, MapDimensions, PlayerId, Players, Skill,
        TileType, Unit, Warnings, Worker,
    };

    fn sample() -> MapGrid {
        let mut map = MapGrid::new(MapDimensions::new(4, 4, 2), Players::new(), 3);
        let at = Location::new(2, 3);
        map.set_base_terrain(at, TileType::Jungle);
        let mut warnings = Warnings::strict();
        map.place_fixture(at, Forest::new(FixtureId::new(1), "teak").into(), &mut warnings)
            .expect("primary forest");
        map.place_fixture(at, Forest::new(FixtureId::new(2), "palm").into(), &mut warnings)
            .expect("second forest");

        let mut worker = Worker::new(FixtureId::new(10), "Ana", "human");
        worker.add_skill("farmer", Skill::new("plowing", 1, 20));
        worker
            .set_mount(Animal::new(FixtureId::new(11), "horse"))
            .expect("mount");
        let mut unit = Unit::new(FixtureId::new(5), PlayerId::new(1), "explorers", "Far");
        unit.set_orders(3, "go north");
        unit.add_member(worker.into()).expect("worker in unit");
        map.place_fixture(at, unit.into(), &mut warnings)
            .expect("unit");
        map
    }

    #[test]
    fn test_records_are_grouped_by_kind() {
        let records = flatten(&sample());
        let orders: Vec<_> = records.iter().map(|r| r.kind().order()).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert_eq!(records[0].kind(), RecordKind::Map);
    }

    #[test]
    fn test_primary_forest_precedes_other_forests() {
        let records = flatten(&sample());
        let forests: Vec<_> = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Fixture(FixtureKind::Forest))
            .filter_map(|r| r.get("id").cloned())
            .collect();
        assert_eq!(forests, vec![FieldValue::Integer(1), FieldValue::Integer(2)]);
    }

    #[test]
    fn test_nested_contents_reference_their_parent() {
        let records = flatten(&sample());
        let parent_of = |kind: RecordKind| {
            records
                .iter()
                .find(|r| r.kind() == kind)
                .and_then(|r| r.get("parent").cloned())
        };
        assert_eq!(parent_of(RecordKind::Fixture(FixtureKind::Worker)), Some(FieldValue::Integer(5)));
        assert_eq!(parent_of(RecordKind::Fixture(FixtureKind::Animal)), Some(FieldValue::Integer(10)));
        assert_eq!(parent_of(RecordKind::Job), Some(FieldValue::Integer(10)));
        assert_eq!(parent_of(RecordKind::Skill), Some(FieldValue::Integer(10)));
        assert_eq!(parent_of(RecordKind::Orders), Some(FieldValue::Integer(5)));
        assert!(records
            .iter()
            .any(|r| r.kind() == RecordKind::Tile && r.get("terrain") == Some(&"jungle".into())));
    }
}
