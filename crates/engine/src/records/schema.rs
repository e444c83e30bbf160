//! Column layout of every record kind.
//!
//! The relational store creates one table per kind from these columns. Columns
//! marked `optional` were added after the first release of the format; a table
//! written by an older release may lack them, and the writer adds them on
//! demand.

use mapkeep_domain::FixtureKind;

use super::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Stored as an integer 0 or 1.
    Boolean,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub optional: bool,
}

const fn col(name: &'static str, column_type: ColumnType) -> Column {
    Column {
        name,
        column_type,
        optional: false,
    }
}

const fn opt(name: &'static str, column_type: ColumnType) -> Column {
    Column {
        name,
        column_type,
        optional: true,
    }
}

use ColumnType::{Boolean, Integer, Text};

const HEADER: &[Column] = &[
    col("version", Integer),
    col("rows", Integer),
    col("columns", Integer),
    col("currentTurn", Integer),
];

const PLAYER: &[Column] = &[
    col("id", Integer),
    col("name", Text),
    col("current", Boolean),
    opt("portrait", Text),
    opt("country", Text),
];

const TILE: &[Column] = &[
    col("row", Integer),
    col("column", Integer),
    col("terrain", Text),
    col("mountainous", Boolean),
];

const RIVER: &[Column] = &[col("row", Integer), col("column", Integer), col("river", Text)];

/// Every fixture record: its ID, and either a location or a parent.
const FIXTURE_BASE: &[Column] = &[
    col("id", Integer),
    col("row", Integer),
    col("column", Integer),
    col("parent", Integer),
    opt("image", Text),
];

const PILE: &[Column] = &[
    col("kind", Text),
    col("contents", Text),
    col("quantity", Text),
    col("units", Text),
    opt("created", Integer),
];

const JOB: &[Column] = &[col("parent", Integer), col("name", Text), col("level", Integer)];

const SKILL: &[Column] = &[
    col("parent", Integer),
    col("job", Text),
    col("name", Text),
    col("level", Integer),
    col("hours", Integer),
];

const POPULATION: &[Column] = &[col("parent", Integer), col("population", Integer)];

const EXPERTISE: &[Column] = &[col("parent", Integer), col("skill", Text), col("level", Integer)];

const WORKED_FIELD: &[Column] = &[col("parent", Integer), col("field", Integer)];

const PRODUCTION: &[Column] = &[
    col("parent", Integer),
    col("id", Integer),
    col("consumed", Boolean),
    col("kind", Text),
    col("contents", Text),
    col("quantity", Text),
    col("units", Text),
    opt("created", Integer),
];

const ORDERS: &[Column] = &[
    col("parent", Integer),
    col("turn", Integer),
    col("results", Boolean),
    col("text", Text),
];

const FOREST: &[Column] = &[col("kind", Text), col("rows", Boolean), opt("acres", Text)];

const GROUND: &[Column] = &[col("kind", Text), col("exposed", Boolean)];

const GROVE: &[Column] = &[
    col("kind", Text),
    col("orchard", Boolean),
    col("cultivated", Boolean),
    opt("population", Integer),
];

const MEADOW: &[Column] = &[
    col("kind", Text),
    col("field", Boolean),
    col("cultivated", Boolean),
    col("status", Text),
    opt("acres", Text),
];

const SHRUB: &[Column] = &[col("kind", Text), opt("population", Integer)];

const MINE: &[Column] = &[col("kind", Text), col("status", Text)];

const MINERAL_VEIN: &[Column] = &[
    col("kind", Text),
    col("exposed", Boolean),
    col("discoverDC", Integer),
];

const STONE_DEPOSIT: &[Column] = &[col("kind", Text), col("discoverDC", Integer)];

const DISCOVERABLE: &[Column] = &[col("discoverDC", Integer)];

const ANIMAL: &[Column] = &[
    col("kind", Text),
    col("talking", Boolean),
    col("status", Text),
    opt("born", Integer),
    col("population", Integer),
];

const KIND_ONLY: &[Column] = &[col("kind", Text)];

const CACHE: &[Column] = &[col("kind", Text), col("contents", Text)];

const TEXT_NOTE: &[Column] = &[col("text", Text), opt("turn", Integer)];

const PORTAL: &[Column] = &[
    col("destinationWorld", Text),
    opt("destinationRow", Integer),
    opt("destinationColumn", Integer),
];

const ADVENTURE: &[Column] = &[col("owner", Integer), col("brief", Text), col("full", Text)];

const TOWN: &[Column] = &[
    col("kind", Text),
    col("status", Text),
    col("size", Text),
    col("discoverDC", Integer),
    col("name", Text),
    col("owner", Integer),
    opt("portrait", Text),
];

const VILLAGE: &[Column] = &[
    col("status", Text),
    col("name", Text),
    col("owner", Integer),
    col("race", Text),
    opt("portrait", Text),
];

const FORTRESS: &[Column] = &[
    col("owner", Integer),
    col("name", Text),
    col("size", Text),
    opt("portrait", Text),
];

const UNIT: &[Column] = &[
    col("owner", Integer),
    col("kind", Text),
    col("name", Text),
    opt("portrait", Text),
];

const WORKER: &[Column] = &[
    col("name", Text),
    col("race", Text),
    opt("note", Text),
    opt("portrait", Text),
    opt("hp", Integer),
    opt("maxHp", Integer),
    opt("strength", Integer),
    opt("dexterity", Integer),
    opt("constitution", Integer),
    opt("intelligence", Integer),
    opt("wisdom", Integer),
    opt("charisma", Integer),
];

const IMPLEMENT: &[Column] = &[col("kind", Text), col("count", Integer)];

fn fixture_columns(kind: FixtureKind) -> &'static [Column] {
    match kind {
        FixtureKind::Forest => FOREST,
        FixtureKind::Ground => GROUND,
        FixtureKind::Grove => GROVE,
        FixtureKind::Meadow => MEADOW,
        FixtureKind::Shrub => SHRUB,
        FixtureKind::Mine => MINE,
        FixtureKind::MineralVein => MINERAL_VEIN,
        FixtureKind::StoneDeposit => STONE_DEPOSIT,
        FixtureKind::Hill | FixtureKind::Oasis => &[],
        FixtureKind::Cave | FixtureKind::Battlefield => DISCOVERABLE,
        FixtureKind::Animal => ANIMAL,
        FixtureKind::AnimalTracks | FixtureKind::Immortal => KIND_ONLY,
        FixtureKind::Cache => CACHE,
        FixtureKind::TextNote => TEXT_NOTE,
        FixtureKind::Portal => PORTAL,
        FixtureKind::Adventure => ADVENTURE,
        FixtureKind::Town => TOWN,
        FixtureKind::Village => VILLAGE,
        FixtureKind::Fortress => FORTRESS,
        FixtureKind::Unit => UNIT,
        FixtureKind::Worker => WORKER,
        FixtureKind::ResourcePile => PILE,
        FixtureKind::Implement => IMPLEMENT,
    }
}

/// Every column of a kind, in table order.
pub fn columns(kind: RecordKind) -> Vec<Column> {
    match kind {
        RecordKind::Map => HEADER.to_vec(),
        RecordKind::Player => PLAYER.to_vec(),
        RecordKind::Tile => TILE.to_vec(),
        RecordKind::River => RIVER.to_vec(),
        RecordKind::Fixture(fixture) => FIXTURE_BASE
            .iter()
            .chain(fixture_columns(fixture))
            .copied()
            .collect(),
        RecordKind::Job => JOB.to_vec(),
        RecordKind::Skill => SKILL.to_vec(),
        RecordKind::Population => POPULATION.to_vec(),
        RecordKind::Expertise => EXPERTISE.to_vec(),
        RecordKind::WorkedField => WORKED_FIELD.to_vec(),
        RecordKind::Production => PRODUCTION.to_vec(),
        RecordKind::Orders => ORDERS.to_vec(),
    }
}

/// The named column of a kind, if it has one.
pub fn column(kind: RecordKind, name: &str) -> Option<Column> {
    columns(kind).into_iter().find(|column| column.name == name)
}
