//! Field-by-field translation between domain values and records.
//!
//! Each `encode_*` has a `decode_*` inverse. Fixture records carry either a
//! location or a parent reference, never both; nested entries (jobs, skills,
//! population statistics, orders) always carry a parent.

use mapkeep_domain::{
    Adventure, Amount, Animal, AnimalTracks, Battlefield, Cache, Cave, CommunityStats, Containee,
    Fixture, FixtureId, FixtureKind, Forest, Fortress, Ground, Grove, Hill, Immortal, Implement,
    Job, Location, MapDimensions, Meadow, Mine, MineralVein, Oasis, Player, PlayerId, Portal,
    Quantity, ResourcePile, River, Shrub, Skill, StoneDeposit, TextNote, TileType, Town, Unit,
    Village, Warnings, Worker, WorkerStats,
};

use super::{FieldReader, Record, RecordKind};
use crate::error::LoadError;

/// Where a fixture record says its fixture belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top level, on the grid.
    At(Location),
    /// Nested inside the container with this ID.
    In(FixtureId),
}

impl Placement {
    /// Set the record's location or parent field.
    pub fn write(self, record: &mut Record) {
        match self {
            Placement::At(location) => {
                record.set("row", location.row);
                record.set("column", location.column);
            }
            Placement::In(parent) => record.set("parent", parent.get()),
        }
    }

    fn read(reader: &mut FieldReader<'_>) -> Result<Placement, LoadError> {
        let parent = reader.optional_int("parent")?;
        let located = reader.has("row") || reader.has("column");
        match (parent, located) {
            (Some(_), true) => Err(LoadError::invalid_field(
                reader.record().kind(),
                "parent",
                "record has both a location and a parent",
            )),
            (Some(parent), false) => Ok(Placement::In(FixtureId::new(parent))),
            (None, _) => Ok(Placement::At(Location::new(
                reader.int("row")?,
                reader.int("column")?,
            ))),
        }
    }
}

// =============================================================================
// Header, players, terrain
// =============================================================================

pub fn encode_header(dimensions: MapDimensions, current_turn: i32) -> Record {
    Record::new(RecordKind::Map)
        .with("version", dimensions.version)
        .with("rows", dimensions.rows)
        .with("columns", dimensions.columns)
        .with("currentTurn", current_turn)
}

/// Decode the header, rejecting any format version but the current one.
pub fn decode_header(
    record: &Record,
    warnings: &mut Warnings,
) -> Result<(MapDimensions, i32), LoadError> {
    let mut reader = FieldReader::new(record, warnings);
    let version = reader.integer("version")?;
    if version != i64::from(MapDimensions::CURRENT_VERSION) {
        return Err(LoadError::UnsupportedVersion { found: version });
    }
    let dimensions = MapDimensions::new(
        reader.int("rows")?,
        reader.int("columns")?,
        MapDimensions::CURRENT_VERSION,
    );
    let current_turn = reader.int_or("currentTurn", -1)?;
    Ok((dimensions, current_turn))
}

pub fn encode_player(player: &Player) -> Record {
    let mut record = Record::new(RecordKind::Player)
        .with("id", player.id.get())
        .with("name", player.name.as_str())
        .with("current", player.current);
    record.set_opt("portrait", player.portrait.as_deref());
    record.set_opt("country", player.country.as_deref());
    record
}

pub fn decode_player(record: &Record, warnings: &mut Warnings) -> Result<Player, LoadError> {
    let mut reader = FieldReader::new(record, warnings);
    let mut player = Player::new(PlayerId::new(reader.int("id")?), reader.text("name")?);
    player.current = reader.optional_boolean("current")?.unwrap_or(false);
    player.portrait = reader.override_text("portrait")?;
    player.country = reader.optional_text("country")?;
    Ok(player)
}

pub fn encode_tile(location: Location, terrain: TileType, mountainous: bool) -> Record {
    Record::new(RecordKind::Tile)
        .with("row", location.row)
        .with("column", location.column)
        .with("terrain", terrain.as_str())
        .with("mountainous", mountainous)
}

pub fn decode_tile(
    record: &Record,
    warnings: &mut Warnings,
) -> Result<(Location, TileType, bool), LoadError> {
    let mut reader = FieldReader::new(record, warnings);
    let location = Location::new(reader.int("row")?, reader.int("column")?);
    let terrain = reader.parsed::<TileType>("terrain")?;
    let mountainous = reader.optional_boolean("mountainous")?.unwrap_or(false);
    Ok((location, terrain, mountainous))
}

pub fn encode_river(location: Location, river: River) -> Record {
    Record::new(RecordKind::River)
        .with("row", location.row)
        .with("column", location.column)
        .with("river", river.as_str())
}

pub fn decode_river(record: &Record, warnings: &mut Warnings) -> Result<(Location, River), LoadError> {
    let mut reader = FieldReader::new(record, warnings);
    let location = Location::new(reader.int("row")?, reader.int("column")?);
    Ok((location, reader.parsed::<River>("river")?))
}

// =============================================================================
// Fixtures
// =============================================================================

fn write_pile(record: &mut Record, pile: &ResourcePile) {
    record.set("kind", pile.kind.as_str());
    record.set("contents", pile.contents.as_str());
    record.set("quantity", pile.quantity.amount.to_string());
    record.set("units", pile.quantity.units.as_str());
    record.set_opt("created", pile.created);
}

fn read_pile(reader: &mut FieldReader<'_>, id: FixtureId) -> Result<ResourcePile, LoadError> {
    let kind = reader.text("kind")?;
    let contents = reader.text("contents")?;
    let amount = reader.parsed::<Amount>("quantity")?;
    let units = reader.text_or("units", "")?;
    let mut pile = ResourcePile::new(id, kind, contents, Quantity::new(amount, units));
    pile.created = reader.optional_int("created")?;
    Ok(pile)
}

/// A fixture's own scalar fields; members and other nested data are
/// separate records.
pub fn encode_fixture(fixture: &Fixture, placement: Placement) -> Record {
    let mut record = Record::new(RecordKind::Fixture(fixture.kind())).with("id", fixture.id().get());
    placement.write(&mut record);
    record.set_opt("image", fixture.image());
    match fixture {
        Fixture::Forest(forest) => {
            record.set("kind", forest.kind.as_str());
            record.set("rows", forest.rows);
            record.set_opt("acres", forest.acres.map(|acres| acres.to_string()));
        }
        Fixture::Ground(ground) => {
            record.set("kind", ground.kind.as_str());
            record.set("exposed", ground.exposed);
        }
        Fixture::Grove(grove) => {
            record.set("kind", grove.kind.as_str());
            record.set("orchard", grove.orchard);
            record.set("cultivated", grove.cultivated);
            record.set_opt("population", grove.population);
        }
        Fixture::Meadow(meadow) => {
            record.set("kind", meadow.kind.as_str());
            record.set("field", meadow.field);
            record.set("cultivated", meadow.cultivated);
            record.set("status", meadow.status.as_str());
            record.set_opt("acres", meadow.acres.map(|acres| acres.to_string()));
        }
        Fixture::Shrub(shrub) => {
            record.set("kind", shrub.kind.as_str());
            record.set_opt("population", shrub.population);
        }
        Fixture::Mine(mine) => {
            record.set("kind", mine.kind.as_str());
            record.set("status", mine.status.as_str());
        }
        Fixture::MineralVein(vein) => {
            record.set("kind", vein.kind.as_str());
            record.set("exposed", vein.exposed);
            record.set("discoverDC", vein.dc);
        }
        Fixture::StoneDeposit(stone) => {
            record.set("kind", stone.kind.as_str());
            record.set("discoverDC", stone.dc);
        }
        Fixture::Hill(_) | Fixture::Oasis(_) => {}
        Fixture::Cave(cave) => record.set("discoverDC", cave.dc),
        Fixture::Battlefield(battlefield) => record.set("discoverDC", battlefield.dc),
        Fixture::Animal(animal) => {
            record.set("kind", animal.kind.as_str());
            record.set("talking", animal.talking);
            record.set("status", animal.status.as_str());
            record.set_opt("born", animal.born);
            record.set("population", animal.population);
        }
        Fixture::AnimalTracks(tracks) => record.set("kind", tracks.kind.as_str()),
        Fixture::Immortal(immortal) => record.set("kind", immortal.kind.as_str()),
        Fixture::Cache(cache) => {
            record.set("kind", cache.kind.as_str());
            record.set("contents", cache.contents.as_str());
        }
        Fixture::TextNote(note) => {
            record.set("text", note.text.as_str());
            record.set_opt("turn", note.turn);
        }
        Fixture::Portal(portal) => {
            record.set("destinationWorld", portal.destination_world.as_str());
            record.set_opt("destinationRow", portal.destination.map(|l| l.row));
            record.set_opt("destinationColumn", portal.destination.map(|l| l.column));
        }
        Fixture::Adventure(adventure) => {
            record.set("owner", adventure.owner.get());
            record.set("brief", adventure.brief.as_str());
            record.set("full", adventure.full.as_str());
        }
        Fixture::Town(town) => {
            record.set("kind", town.kind.as_str());
            record.set("status", town.status.as_str());
            record.set("size", town.size.as_str());
            record.set("discoverDC", town.dc);
            record.set("name", town.name.as_str());
            record.set("owner", town.owner.get());
            record.set_opt("portrait", town.portrait.as_deref());
        }
        Fixture::Village(village) => {
            record.set("status", village.status.as_str());
            record.set("name", village.name.as_str());
            record.set("owner", village.owner.get());
            record.set("race", village.race.as_str());
            record.set_opt("portrait", village.portrait.as_deref());
        }
        Fixture::Fortress(fortress) => {
            record.set("owner", fortress.owner.get());
            record.set("name", fortress.name.as_str());
            record.set("size", fortress.size.as_str());
            record.set_opt("portrait", fortress.portrait.as_deref());
        }
        Fixture::Unit(unit) => {
            record.set("owner", unit.owner.get());
            record.set("kind", unit.kind.as_str());
            record.set("name", unit.name.as_str());
            record.set_opt("portrait", unit.portrait.as_deref());
        }
        Fixture::Worker(worker) => {
            record.set("name", worker.name.as_str());
            record.set("race", worker.race.as_str());
            record.set_opt("note", worker.note.as_deref());
            record.set_opt("portrait", worker.portrait.as_deref());
            if let Some(stats) = worker.stats {
                record.set("hp", stats.hp);
                record.set("maxHp", stats.max_hp);
                record.set("strength", stats.strength);
                record.set("dexterity", stats.dexterity);
                record.set("constitution", stats.constitution);
                record.set("intelligence", stats.intelligence);
                record.set("wisdom", stats.wisdom);
                record.set("charisma", stats.charisma);
            }
        }
        Fixture::ResourcePile(pile) => write_pile(&mut record, pile),
        Fixture::Implement(implement) => {
            record.set("kind", implement.kind.as_str());
            record.set("count", implement.count);
        }
    }
    record
}

fn read_stats(reader: &mut FieldReader<'_>) -> Result<Option<WorkerStats>, LoadError> {
    if !reader.has("hp") {
        return Ok(None);
    }
    Ok(Some(WorkerStats {
        hp: reader.int("hp")?,
        max_hp: reader.int("maxHp")?,
        strength: reader.int("strength")?,
        dexterity: reader.int("dexterity")?,
        constitution: reader.int("constitution")?,
        intelligence: reader.int("intelligence")?,
        wisdom: reader.int("wisdom")?,
        charisma: reader.int("charisma")?,
    }))
}

/// Decode a fixture record into the fixture and where it belongs.
pub fn decode_fixture(
    record: &Record,
    warnings: &mut Warnings,
) -> Result<(Fixture, Placement), LoadError> {
    let RecordKind::Fixture(kind) = record.kind() else {
        return Err(LoadError::invalid_field(
            record.kind(),
            "kind",
            "not a fixture record",
        ));
    };
    let mut reader = FieldReader::new(record, warnings);
    let id = reader.id("id")?;
    let placement = Placement::read(&mut reader)?;
    let image = reader.override_text("image")?;

    let mut fixture: Fixture = match kind {
        FixtureKind::Forest => Forest {
            id,
            kind: reader.text("kind")?,
            rows: reader.boolean_or("rows", false)?,
            acres: reader.optional_parsed::<Amount>("acres")?,
            image: None,
        }
        .into(),
        FixtureKind::Ground => Ground {
            id,
            kind: reader.text("kind")?,
            exposed: reader.boolean_or("exposed", false)?,
            image: None,
        }
        .into(),
        FixtureKind::Grove => Grove {
            id,
            kind: reader.text("kind")?,
            orchard: reader.boolean_or("orchard", false)?,
            cultivated: reader.boolean_or("cultivated", false)?,
            population: reader.optional_int("population")?,
            image: None,
        }
        .into(),
        FixtureKind::Meadow => Meadow {
            id,
            kind: reader.text("kind")?,
            field: reader.boolean_or("field", true)?,
            cultivated: reader.boolean_or("cultivated", false)?,
            status: reader.parsed("status")?,
            acres: reader.optional_parsed::<Amount>("acres")?,
            image: None,
        }
        .into(),
        FixtureKind::Shrub => Shrub {
            id,
            kind: reader.text("kind")?,
            population: reader.optional_int("population")?,
            image: None,
        }
        .into(),
        FixtureKind::Mine => Mine {
            id,
            kind: reader.text("kind")?,
            status: reader.parsed("status")?,
            image: None,
        }
        .into(),
        FixtureKind::MineralVein => MineralVein {
            id,
            kind: reader.text("kind")?,
            exposed: reader.boolean_or("exposed", false)?,
            dc: reader.int_or("discoverDC", 0)?,
            image: None,
        }
        .into(),
        FixtureKind::StoneDeposit => StoneDeposit {
            id,
            kind: reader.text("kind")?,
            dc: reader.int_or("discoverDC", 0)?,
            image: None,
        }
        .into(),
        FixtureKind::Hill => Hill { id, image: None }.into(),
        FixtureKind::Oasis => Oasis { id, image: None }.into(),
        FixtureKind::Cave => Cave {
            id,
            dc: reader.int_or("discoverDC", 0)?,
            image: None,
        }
        .into(),
        FixtureKind::Battlefield => Battlefield {
            id,
            dc: reader.int_or("discoverDC", 0)?,
            image: None,
        }
        .into(),
        FixtureKind::Animal => Animal {
            id,
            kind: reader.text("kind")?,
            talking: reader.boolean_or("talking", false)?,
            status: reader.text_or("status", "wild")?,
            born: reader.optional_int("born")?,
            population: reader.int_or("population", 1)?,
            image: None,
        }
        .into(),
        FixtureKind::AnimalTracks => AnimalTracks {
            id,
            kind: reader.text("kind")?,
            image: None,
        }
        .into(),
        FixtureKind::Immortal => Immortal {
            id,
            kind: reader.text("kind")?,
            image: None,
        }
        .into(),
        FixtureKind::Cache => Cache {
            id,
            kind: reader.text("kind")?,
            contents: reader.text_or("contents", "")?,
            image: None,
        }
        .into(),
        FixtureKind::TextNote => TextNote {
            id,
            text: reader.text_or("text", "")?,
            turn: reader.optional_int("turn")?,
            image: None,
        }
        .into(),
        FixtureKind::Portal => {
            let destination_world = reader.text("destinationWorld")?;
            let row = reader.optional_int("destinationRow")?;
            let column = reader.optional_int("destinationColumn")?;
            Portal {
                id,
                destination_world,
                destination: row.zip(column).map(|(row, column)| Location::new(row, column)),
                image: None,
            }
            .into()
        }
        FixtureKind::Adventure => Adventure {
            id,
            owner: reader.owner()?,
            brief: reader.text_or("brief", "")?,
            full: reader.text_or("full", "")?,
            image: None,
        }
        .into(),
        FixtureKind::Town => {
            let mut town = Town::new(
                id,
                reader.parsed("kind")?,
                reader.parsed("status")?,
                reader.parsed("size")?,
                reader.text_or("name", "")?,
                reader.owner()?,
            );
            town.dc = reader.int_or("discoverDC", 0)?;
            town.portrait = reader.override_text("portrait")?;
            town.into()
        }
        FixtureKind::Village => {
            let mut village = Village::new(
                id,
                reader.parsed("status")?,
                reader.text_or("name", "")?,
                reader.owner()?,
                reader.text("race")?,
            );
            village.portrait = reader.override_text("portrait")?;
            village.into()
        }
        FixtureKind::Fortress => {
            let mut fortress = Fortress::new(
                id,
                reader.owner()?,
                reader.text_or("name", "")?,
                reader.parsed_or("size", mapkeep_domain::TownSize::Small)?,
            );
            fortress.portrait = reader.override_text("portrait")?;
            fortress.into()
        }
        FixtureKind::Unit => {
            let mut unit = Unit::new(
                id,
                reader.owner()?,
                reader.text("kind")?,
                reader.text_or("name", "")?,
            );
            unit.portrait = reader.override_text("portrait")?;
            unit.into()
        }
        FixtureKind::Worker => {
            let mut worker = Worker::new(id, reader.text("name")?, reader.text_or("race", "human")?);
            worker.note = reader.optional_text("note")?;
            worker.portrait = reader.override_text("portrait")?;
            worker.stats = read_stats(&mut reader)?;
            worker.into()
        }
        FixtureKind::ResourcePile => read_pile(&mut reader, id)?.into(),
        FixtureKind::Implement => Implement {
            id,
            kind: reader.text("kind")?,
            count: reader.int_or("count", 1)?,
            image: None,
        }
        .into(),
    };
    fixture.set_image(image);
    Ok((fixture, placement))
}

// =============================================================================
// Nested entries
// =============================================================================

/// Record for a nested entry that is not itself a fixture.
///
/// Returns `None` for [`Containee::Fixture`]; those are fixture records.
pub fn encode_entry(parent: FixtureId, entry: &Containee) -> Option<Record> {
    let record = match entry {
        Containee::Fixture(_) => return None,
        Containee::Job(job) => Record::new(RecordKind::Job)
            .with("name", job.name.as_str())
            .with("level", job.level),
        Containee::Skill { job, skill } => Record::new(RecordKind::Skill)
            .with("job", job.as_str())
            .with("name", skill.name.as_str())
            .with("level", skill.level)
            .with("hours", skill.hours),
        Containee::Population(stats) => {
            Record::new(RecordKind::Population).with("population", stats.population)
        }
        Containee::Expertise { skill, level } => Record::new(RecordKind::Expertise)
            .with("skill", skill.as_str())
            .with("level", *level),
        Containee::WorkedField(field) => {
            Record::new(RecordKind::WorkedField).with("field", field.get())
        }
        Containee::Production { pile, consumed } => {
            let mut record = Record::new(RecordKind::Production)
                .with("id", pile.id.get())
                .with("consumed", *consumed);
            write_pile(&mut record, pile);
            record
        }
        Containee::Orders {
            turn,
            text,
            results,
        } => Record::new(RecordKind::Orders)
            .with("turn", *turn)
            .with("results", *results)
            .with("text", text.as_str()),
    };
    Some(record.with("parent", parent.get()))
}

/// Decode a nested-entry record into its parent ID and the entry.
pub fn decode_entry(
    record: &Record,
    warnings: &mut Warnings,
) -> Result<(FixtureId, Containee), LoadError> {
    let mut reader = FieldReader::new(record, warnings);
    let parent = reader.id("parent")?;
    let entry = match record.kind() {
        RecordKind::Job => Containee::Job(Job::new(reader.text("name")?, reader.int_or("level", 0)?)),
        RecordKind::Skill => Containee::Skill {
            job: reader.text("job")?,
            skill: Skill::new(
                reader.text("name")?,
                reader.int_or("level", 0)?,
                reader.int_or("hours", 0)?,
            ),
        },
        RecordKind::Population => {
            Containee::Population(CommunityStats::new(reader.int("population")?))
        }
        RecordKind::Expertise => Containee::Expertise {
            skill: reader.text("skill")?,
            level: reader.int("level")?,
        },
        RecordKind::WorkedField => Containee::WorkedField(reader.id("field")?),
        RecordKind::Production => {
            let id = reader.id("id")?;
            let consumed = reader.boolean_or("consumed", false)?;
            Containee::Production {
                pile: read_pile(&mut reader, id)?,
                consumed,
            }
        }
        RecordKind::Orders => Containee::Orders {
            turn: reader.int("turn")?,
            results: reader.boolean_or("results", false)?,
            text: reader.text_or("text", "")?,
        },
        other => {
            return Err(LoadError::invalid_field(
                other,
                "kind",
                "not a nested-entry record",
            ))
        }
    };
    Ok((parent, entry))
}
