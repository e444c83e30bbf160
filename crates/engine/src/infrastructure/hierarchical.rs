//! The hierarchical (JSON) map format.
//!
//! Containment is expressed by nesting, so no linking pass is needed: each
//! node's members are decoded, then attached to it before it is attached to
//! its own container. Node fields are the same as the relational columns,
//! minus the location or parent reference the tree already implies.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use mapkeep_domain::containment::{self, Containee};
use mapkeep_domain::{
    Fixture, FixtureId, IdRegistry, Location, MapDimensions, MapGrid, Player, River, TileType,
    Warnings,
};

use crate::error::LoadError;
use crate::infrastructure::settings::EngineSettings;
use crate::records::codec::{self, Placement};
use crate::records::flatten::{contents, Contents};
use crate::records::{FieldValue, Fields, Record, RecordKind};
use crate::use_cases::load::LoadedMap;

/// A fixture or nested entry: its fields plus a `tag` and optional `members`.
pub type Node = serde_json::Map<String, Value>;

const TAG: &str = "tag";
const MEMBERS: &str = "members";
const PLACEMENT_FIELDS: [&str; 3] = ["row", "column", "parent"];

fn no_turn() -> i32 {
    -1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub version: i64,
    pub rows: i32,
    pub columns: i32,
    #[serde(default = "no_turn")]
    pub current_turn: i32,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub tiles: Vec<TileDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDocument {
    pub row: i32,
    pub column: i32,
    #[serde(default)]
    pub terrain: TileType,
    #[serde(default)]
    pub mountainous: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rivers: Vec<River>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixtures: Vec<Node>,
}

// =============================================================================
// Writing
// =============================================================================

fn node_from_record(record: Record) -> Node {
    let kind = record.kind();
    let mut node = Node::new();
    node.insert(TAG.into(), Value::String(kind.as_str().into()));
    for (name, value) in record.into_fields() {
        if PLACEMENT_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let value = match value {
            FieldValue::Integer(value) => Value::Number(Number::from(value)),
            FieldValue::Text(value) => Value::String(value),
            FieldValue::Boolean(value) => Value::Bool(value),
        };
        node.insert(name, value);
    }
    node
}

fn fixture_node(fixture: &Fixture) -> Node {
    let parent = fixture.id();
    let mut node = node_from_record(codec::encode_fixture(fixture, Placement::In(parent)));
    let Contents { members, entries } = contents(fixture);
    let mut nested: Vec<Value> = members
        .iter()
        .map(|member| Value::Object(fixture_node(member)))
        .collect();
    nested.extend(
        entries
            .iter()
            .filter_map(|entry| codec::encode_entry(parent, entry))
            .map(|record| Value::Object(node_from_record(record))),
    );
    if !nested.is_empty() {
        node.insert(MEMBERS.into(), Value::Array(nested));
    }
    node
}

pub fn to_document(map: &MapGrid) -> MapDocument {
    let dimensions = map.dimensions();
    let tiles = map
        .tiles()
        .filter(|(_, tile)| !tile.is_blank())
        .map(|(location, tile)| TileDocument {
            row: location.row,
            column: location.column,
            terrain: tile.terrain,
            mountainous: tile.mountainous,
            rivers: tile.rivers.iter().copied().collect(),
            fixtures: tile.all_fixtures().map(|f| fixture_node(&f)).collect(),
        })
        .collect();
    MapDocument {
        version: i64::from(dimensions.version),
        rows: dimensions.rows,
        columns: dimensions.columns,
        current_turn: map.current_turn(),
        players: map.players().iter().cloned().collect(),
        tiles,
    }
}

pub fn write_document(map: &MapGrid) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_document(map))
}

// =============================================================================
// Reading
// =============================================================================

struct TreeReader {
    registry: IdRegistry,
    warnings: Warnings,
    progress_interval: usize,
    seen: usize,
}

impl TreeReader {
    fn tick(&mut self) {
        self.seen += 1;
        if self.progress_interval != 0 && self.seen % self.progress_interval == 0 {
            tracing::info!(nodes = self.seen, "Reading map");
        }
    }

    fn record(node: &Node, placement: Placement) -> Result<Record, LoadError> {
        let tag = match node.get(TAG) {
            Some(Value::String(tag)) => tag,
            Some(_) => return Err(LoadError::invalid_field("node", TAG, "not a string")),
            None => return Err(LoadError::missing_field("node", TAG)),
        };
        let kind: RecordKind = tag
            .parse()
            .map_err(|reason: String| LoadError::invalid_field("node", TAG, reason))?;
        let mut fields = Fields::new();
        for (name, value) in node {
            if name == TAG || name == MEMBERS {
                continue;
            }
            let value = match value {
                Value::Null => continue,
                Value::Bool(value) => FieldValue::Boolean(*value),
                Value::String(value) => FieldValue::Text(value.clone()),
                Value::Number(number) => number.as_i64().map(FieldValue::Integer).ok_or_else(|| {
                    LoadError::invalid_field(kind, name, format!("{} is not an integer", number))
                })?,
                Value::Array(_) | Value::Object(_) => {
                    return Err(LoadError::invalid_field(kind, name, "expected a scalar"))
                }
            };
            fields.insert(name.clone(), value);
        }
        let mut record = Record::from_fields(kind, fields);
        placement.write(&mut record);
        Ok(record)
    }

    fn members(node: &Node) -> Result<&[Value], LoadError> {
        match node.get(MEMBERS) {
            None => Ok(&[]),
            Some(Value::Array(members)) => Ok(members.as_slice()),
            Some(_) => Err(LoadError::invalid_field("node", MEMBERS, "not an array")),
        }
    }

    fn fixture(&mut self, node: &Node, placement: Placement) -> Result<Fixture, LoadError> {
        let record = Self::record(node, placement)?;
        self.fixture_from(node, &record)
    }

    /// Decode a fixture from its already converted `record`, then its members.
    fn fixture_from(&mut self, node: &Node, record: &Record) -> Result<Fixture, LoadError> {
        self.tick();
        if !matches!(record.kind(), RecordKind::Fixture(_)) {
            return Err(LoadError::invalid_field(
                record.kind(),
                TAG,
                "only fixtures can stand on a tile",
            ));
        }
        let (mut fixture, _) = codec::decode_fixture(record, &mut self.warnings)?;
        self.registry.register(fixture.id(), &mut self.warnings)?;

        let mut nested = Vec::new();
        for member in Self::members(node)? {
            let Value::Object(member) = member else {
                return Err(LoadError::invalid_field(record.kind(), MEMBERS, "member is not an object"));
            };
            nested.push(self.containee(member, fixture.id())?);
        }
        nested.sort_by_key(|containee| containee.kind().attach_order());
        for containee in nested {
            containment::attach(&mut fixture, containee)?;
        }
        Ok(fixture)
    }

    fn containee(&mut self, node: &Node, parent: FixtureId) -> Result<Containee, LoadError> {
        let record = Self::record(node, Placement::In(parent))?;
        if let RecordKind::Fixture(_) = record.kind() {
            return Ok(Containee::Fixture(self.fixture_from(node, &record)?));
        }
        self.tick();
        let (_, entry) = codec::decode_entry(&record, &mut self.warnings)?;
        if let Containee::Production { pile, .. } = &entry {
            self.registry.register(pile.id, &mut self.warnings)?;
        }
        Ok(entry)
    }
}

/// Build a map from a parsed JSON document.
pub fn from_value(value: Value, settings: &EngineSettings) -> Result<LoadedMap, LoadError> {
    let version = value
        .get("version")
        .and_then(Value::as_i64)
        .ok_or_else(|| LoadError::missing_field(RecordKind::Map, "version"))?;
    if version != i64::from(MapDimensions::CURRENT_VERSION) {
        return Err(LoadError::UnsupportedVersion { found: version });
    }
    let document: MapDocument = serde_json::from_value(value)?;

    let mut reader = TreeReader {
        registry: IdRegistry::new(),
        warnings: Warnings::new(settings.warning_policy),
        progress_interval: settings.progress_interval,
        seen: 0,
    };
    let mut map = MapGrid::new(
        MapDimensions::new(document.rows, document.columns, MapDimensions::CURRENT_VERSION),
        document.players.into_iter().collect(),
        document.current_turn,
    );
    for tile in document.tiles {
        let location = Location::new(tile.row, tile.column);
        map.set_base_terrain(location, tile.terrain);
        map.set_mountainous(location, tile.mountainous);
        map.add_rivers(location, tile.rivers);
        for node in &tile.fixtures {
            let fixture = reader.fixture(node, Placement::At(location))?;
            map.place_fixture(location, fixture, &mut reader.warnings)?;
        }
    }
    Ok(LoadedMap {
        map,
        warnings: reader.warnings.into_inner(),
    })
}

pub fn read_document(text: &str, settings: &EngineSettings) -> Result<LoadedMap, LoadError> {
    from_value(serde_json::from_str(text)?, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapkeep_domain::{
        Animal, CommunityStats, Forest, Job, PlayerId, Players, Skill, Town, TownKind, TownSize,
        TownStatus, Unit, Worker,
    };
    use serde_json::json;

    fn sample() -> MapGrid {
        let mut players = Players::new();
        let mut ann = Player::new(PlayerId::new(1), "Ann").with_portrait("ann.png");
        ann.current = true;
        players.insert(ann);
        let mut map = MapGrid::new(MapDimensions::new(4, 4, 2), players, 6);
        let at = Location::new(2, 3);
        map.set_base_terrain(at, TileType::Jungle);
        map.add_rivers(at, [River::North, River::Lake]);
        let mut warnings = Warnings::strict();
        map.place_fixture(at, Forest::new(FixtureId::new(1), "teak").into(), &mut warnings)
            .expect("forest");

        let mut worker = Worker::new(FixtureId::new(10), "Ana", "human");
        worker.add_job(Job::new("farmer", 2).with_skill(Skill::new("plowing", 1, 20)));
        worker
            .set_mount(Animal::new(FixtureId::new(11), "horse").with_status("domesticated"))
            .expect("mount");
        let mut unit = Unit::new(FixtureId::new(5), PlayerId::new(1), "explorers", "Far");
        unit.set_orders(6, "go north");
        unit.set_results(5, "found a river");
        unit.add_member(worker.into()).expect("worker");
        map.place_fixture(at, unit.into(), &mut warnings).expect("unit");

        let mut town = Town::new(
            FixtureId::new(20),
            TownKind::City,
            TownStatus::Active,
            TownSize::Large,
            "Brook",
            PlayerId::new(1),
        );
        let mut stats = CommunityStats::new(300);
        stats.expertise.insert("smith".into(), 4);
        stats.worked_fields.insert(FixtureId::new(1));
        town.set_population(stats).expect("population");
        map.place_fixture(Location::new(0, 0), town.into(), &mut warnings)
            .expect("town");
        map
    }

    #[test]
    fn test_document_round_trip_preserves_the_map() {
        let map = sample();
        let text = write_document(&map).expect("serializes");
        let loaded = read_document(&text, &EngineSettings::default()).expect("reads back");
        assert_eq!(loaded.map, map);
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    }

    #[test]
    fn test_nesting_replaces_parent_references() {
        let document = to_document(&sample());
        let tile = document
            .tiles
            .iter()
            .find(|tile| (tile.row, tile.column) == (2, 3))
            .expect("tile (2, 3)");
        let unit = &tile.fixtures[1];
        assert_eq!(unit.get(TAG), Some(&json!("unit")));
        assert!(unit.get("parent").is_none() && unit.get("row").is_none());
        let members = unit.get(MEMBERS).and_then(Value::as_array).expect("members");
        assert!(members.iter().any(|m| m.get(TAG) == Some(&json!("worker"))));
        assert!(members.iter().any(|m| m.get(TAG) == Some(&json!("orders"))));
    }

    #[test]
    fn test_old_version_is_rejected_before_anything_else() {
        let err = from_value(json!({"version": 1, "tiles": "garbage"}), &EngineSettings::default())
            .expect_err("old version");
        assert!(matches!(err, LoadError::UnsupportedVersion { found: 1 }));
    }

    #[test]
    fn test_members_attach_in_dependency_order() {
        let value = json!({
            "version": 2, "rows": 3, "columns": 3,
            "tiles": [{
                "row": 1, "column": 1, "terrain": "plains",
                "fixtures": [{
                    "tag": "village", "id": 4, "status": "active", "name": "Reed",
                    "owner": 1, "race": "elf",
                    "members": [
                        {"tag": "expertise", "skill": "fishing", "level": 2},
                        {"tag": "population", "population": 40}
                    ]
                }]
            }]
        });
        let loaded = from_value(value, &EngineSettings::default()).expect("loads");
        let fixtures = loaded.map.fixtures(Location::new(1, 1));
        let Fixture::Village(village) = &fixtures[0] else {
            panic!("expected a village");
        };
        let stats = village.population().expect("population attached");
        assert_eq!(stats.population, 40);
        assert_eq!(stats.expertise.get("fishing"), Some(&2));
    }

    #[test]
    fn test_nested_fixtures_keep_their_own_members() {
        let value = json!({
            "version": 2, "rows": 3, "columns": 3,
            "tiles": [{
                "row": 2, "column": 2,
                "fixtures": [{
                    "tag": "unit", "id": 7, "owner": 2, "kind": "riders", "name": "Dust",
                    "members": [{
                        "tag": "worker", "id": 8, "name": "Ana", "race": "human",
                        "members": [
                            {"tag": "skill", "job": "rider", "name": "saddle", "level": 1, "hours": 3},
                            {"tag": "animal", "id": 9, "kind": "horse", "talking": false,
                             "status": "domesticated", "population": 1},
                            {"tag": "job", "name": "rider", "level": 2}
                        ]
                    }]
                }]
            }]
        });
        let loaded = from_value(value, &EngineSettings::default()).expect("loads");
        let (_, worker) = loaded
            .map
            .find_fixture(FixtureId::new(8))
            .expect("worker inside the unit");
        let Fixture::Worker(worker) = worker.as_ref() else {
            panic!("expected a worker");
        };
        let job = worker.job("rider").expect("job attached");
        assert_eq!(job.level, 2);
        assert_eq!(job.skill("saddle").map(|skill| skill.hours), Some(3));
        assert_eq!(worker.mount().map(|mount| mount.id), Some(FixtureId::new(9)));
        assert!(loaded.map.find_fixture(FixtureId::new(9)).is_some());
    }

    #[test]
    fn test_illegal_nesting_is_fatal() {
        let value = json!({
            "version": 2, "rows": 3, "columns": 3,
            "tiles": [{
                "row": 0, "column": 0,
                "fixtures": [{
                    "tag": "hill", "id": 1,
                    "members": [{"tag": "animal", "id": 2, "kind": "goat", "talking": false,
                                 "status": "wild", "population": 1}]
                }]
            }]
        });
        let err = from_value(value, &EngineSettings::default()).expect_err("hill holds nothing");
        assert!(matches!(err, LoadError::Domain(_)));
    }
}
