//! Which fixtures may contain which
//!
//! The table of legal (container kind, containee kind) pairs lives here and
//! nowhere else. Both map formats attach nested data through [`attach`], so a
//! pairing rejected for one format is rejected for the other.

use std::fmt;

use crate::entities::{CommunityStats, Fixture, FixtureKind, Job, ResourcePile, Skill};
use crate::error::DomainError;
use crate::ids::FixtureId;

/// The kind of something that can be nested inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContaineeKind {
    Fixture(FixtureKind),
    Job,
    Skill,
    /// A settlement's population-statistics block.
    Population,
    /// A skill-level entry in a settlement's population statistics.
    Expertise,
    /// A field worked by a settlement.
    WorkedField,
    /// A resource produced or consumed by a settlement.
    Production,
    /// A unit's orders or results for one turn.
    Orders,
}

impl ContaineeKind {
    /// Attachment order within one container: blocks that other entries
    /// extend (population, jobs) come first.
    pub fn attach_order(&self) -> u8 {
        match self {
            ContaineeKind::Population | ContaineeKind::Job => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for ContaineeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContaineeKind::Fixture(kind) => write!(f, "{}", kind),
            ContaineeKind::Job => f.write_str("job"),
            ContaineeKind::Skill => f.write_str("skill"),
            ContaineeKind::Population => f.write_str("population"),
            ContaineeKind::Expertise => f.write_str("expertise"),
            ContaineeKind::WorkedField => f.write_str("worked field"),
            ContaineeKind::Production => f.write_str("production"),
            ContaineeKind::Orders => f.write_str("orders"),
        }
    }
}

const LEGAL_PAIRS: &[(FixtureKind, ContaineeKind)] = &[
    (FixtureKind::Fortress, ContaineeKind::Fixture(FixtureKind::Unit)),
    (FixtureKind::Fortress, ContaineeKind::Fixture(FixtureKind::ResourcePile)),
    (FixtureKind::Fortress, ContaineeKind::Fixture(FixtureKind::Implement)),
    (FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::Worker)),
    (FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::Animal)),
    (FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::ResourcePile)),
    (FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::Implement)),
    (FixtureKind::Unit, ContaineeKind::Orders),
    // A worker's animal is its mount
    (FixtureKind::Worker, ContaineeKind::Fixture(FixtureKind::Animal)),
    (FixtureKind::Worker, ContaineeKind::Fixture(FixtureKind::Implement)),
    (FixtureKind::Worker, ContaineeKind::Job),
    (FixtureKind::Worker, ContaineeKind::Skill),
    (FixtureKind::Town, ContaineeKind::Population),
    (FixtureKind::Town, ContaineeKind::Expertise),
    (FixtureKind::Town, ContaineeKind::WorkedField),
    (FixtureKind::Town, ContaineeKind::Production),
    (FixtureKind::Village, ContaineeKind::Population),
    (FixtureKind::Village, ContaineeKind::Expertise),
    (FixtureKind::Village, ContaineeKind::WorkedField),
    (FixtureKind::Village, ContaineeKind::Production),
];

/// Whether `container` may hold `child` at all.
pub fn is_legal(container: FixtureKind, child: ContaineeKind) -> bool {
    LEGAL_PAIRS.contains(&(container, child))
}

/// [`is_legal`] as a `Result`, naming the offending container.
pub fn check(
    container: FixtureKind,
    container_id: FixtureId,
    child: ContaineeKind,
) -> Result<(), DomainError> {
    if is_legal(container, child) {
        Ok(())
    } else {
        Err(DomainError::illegal_containment(container, container_id, child))
    }
}

/// Something waiting to be attached to a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Containee {
    Fixture(Fixture),
    Job(Job),
    Skill { job: String, skill: Skill },
    Population(CommunityStats),
    Expertise { skill: String, level: i32 },
    WorkedField(FixtureId),
    Production { pile: ResourcePile, consumed: bool },
    /// Orders for a turn, or with `results` set, what came of them.
    Orders { turn: i32, text: String, results: bool },
}

impl Containee {
    pub fn kind(&self) -> ContaineeKind {
        match self {
            Containee::Fixture(fixture) => ContaineeKind::Fixture(fixture.kind()),
            Containee::Job(_) => ContaineeKind::Job,
            Containee::Skill { .. } => ContaineeKind::Skill,
            Containee::Population(_) => ContaineeKind::Population,
            Containee::Expertise { .. } => ContaineeKind::Expertise,
            Containee::WorkedField(_) => ContaineeKind::WorkedField,
            Containee::Production { .. } => ContaineeKind::Production,
            Containee::Orders { .. } => ContaineeKind::Orders,
        }
    }
}

/// Attach `child` to `container`.
///
/// Fails on a pair outside the table, on a second mount or population block,
/// and on population entries for a settlement that has no population block.
/// Jobs, skills, implements, production entries and orders are cumulative.
pub fn attach(container: &mut Fixture, child: Containee) -> Result<(), DomainError> {
    check(container.kind(), container.id(), child.kind())?;
    match (container, child) {
        (Fixture::Fortress(fortress), Containee::Fixture(member)) => fortress.add_member(member),
        (Fixture::Unit(unit), Containee::Fixture(member)) => unit.add_member(member),
        (Fixture::Unit(unit), Containee::Orders { turn, text, results }) => {
            if results {
                unit.set_results(turn, text);
            } else {
                unit.set_orders(turn, text);
            }
            Ok(())
        }
        (Fixture::Worker(worker), Containee::Fixture(Fixture::Animal(mount))) => {
            worker.set_mount(mount)
        }
        (Fixture::Worker(worker), Containee::Fixture(Fixture::Implement(implement))) => {
            worker.add_equipment(implement);
            Ok(())
        }
        (Fixture::Worker(worker), Containee::Job(job)) => {
            worker.add_job(job);
            Ok(())
        }
        (Fixture::Worker(worker), Containee::Skill { job, skill }) => {
            worker.add_skill(&job, skill);
            Ok(())
        }
        (Fixture::Town(town), Containee::Population(stats)) => town.set_population(stats),
        (Fixture::Village(village), Containee::Population(stats)) => {
            village.set_population(stats)
        }
        (Fixture::Town(town), entry) => {
            extend_population(FixtureKind::Town, town.id, town.population_mut(), entry)
        }
        (Fixture::Village(village), entry) => {
            extend_population(FixtureKind::Village, village.id, village.population_mut(), entry)
        }
        (container, child) => Err(DomainError::illegal_containment(
            container.kind(),
            container.id(),
            child.kind(),
        )),
    }
}

fn extend_population(
    kind: FixtureKind,
    id: FixtureId,
    stats: Option<&mut CommunityStats>,
    entry: Containee,
) -> Result<(), DomainError> {
    let Some(stats) = stats else {
        return Err(DomainError::empty_slot(kind, id, "population"));
    };
    match entry {
        Containee::Expertise { skill, level } => {
            stats.expertise.insert(skill, level);
        }
        Containee::WorkedField(field) => {
            stats.worked_fields.insert(field);
        }
        Containee::Production { pile, consumed: false } => stats.produced.push(pile),
        Containee::Production { pile, consumed: true } => stats.consumed.push(pile),
        other => return Err(DomainError::illegal_containment(kind, id, other.kind())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Animal, Forest, Fortress, Implement, Town, Unit, Worker};
    use crate::ids::PlayerId;
    use crate::types::{Amount, Quantity, TownKind, TownSize, TownStatus};

    fn worker(id: i32) -> Fixture {
        Worker::new(FixtureId::new(id), "Ana", "human").into()
    }

    fn town(id: i32) -> Fixture {
        Town::new(
            FixtureId::new(id),
            TownKind::Town,
            TownStatus::Active,
            TownSize::Small,
            "Brook",
            PlayerId::new(1),
        )
        .into()
    }

    #[test]
    fn test_table_matches_documented_pairs() {
        assert!(is_legal(FixtureKind::Fortress, ContaineeKind::Fixture(FixtureKind::Unit)));
        assert!(is_legal(FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::Worker)));
        assert!(is_legal(FixtureKind::Worker, ContaineeKind::Job));
        assert!(is_legal(FixtureKind::Village, ContaineeKind::Population));
        assert!(!is_legal(FixtureKind::Fortress, ContaineeKind::Fixture(FixtureKind::Worker)));
        assert!(!is_legal(FixtureKind::Unit, ContaineeKind::Fixture(FixtureKind::Unit)));
        assert!(!is_legal(FixtureKind::Forest, ContaineeKind::Fixture(FixtureKind::Animal)));
    }

    #[test]
    fn test_attach_worker_to_unit() {
        let mut unit: Fixture =
            Unit::new(FixtureId::new(5), PlayerId::new(1), "explorers", "Far").into();
        attach(&mut unit, Containee::Fixture(worker(10))).expect("legal pair");
        assert_eq!(unit.members().len(), 1);
        assert_eq!(unit.members()[0].id(), FixtureId::new(10));
    }

    #[test]
    fn test_illegal_pair_is_rejected() {
        let mut fortress: Fixture =
            Fortress::new(FixtureId::new(1), PlayerId::new(1), "Keep", TownSize::Small).into();
        let forest: Fixture = Forest::new(FixtureId::new(2), "oak").into();
        let err = attach(&mut fortress, Containee::Fixture(forest)).expect_err("illegal");
        assert!(matches!(err, DomainError::IllegalContainment { .. }));
        assert!(fortress.members().is_empty());
    }

    #[test]
    fn test_worker_mount_is_single_but_equipment_cumulative() {
        let mut container = worker(10);
        attach(
            &mut container,
            Containee::Fixture(Animal::new(FixtureId::new(11), "horse").into()),
        )
        .expect("first mount");
        for id in [12, 13] {
            attach(
                &mut container,
                Containee::Fixture(Implement::new(FixtureId::new(id), "axe").into()),
            )
            .expect("equipment is cumulative");
        }
        let err = attach(
            &mut container,
            Containee::Fixture(Animal::new(FixtureId::new(14), "mule").into()),
        )
        .expect_err("second mount");
        assert!(matches!(err, DomainError::SecondOccupant { slot: "mount", .. }));
        let Fixture::Worker(worker) = container else {
            panic!("still a worker");
        };
        assert_eq!(worker.equipment().len(), 2);
    }

    #[test]
    fn test_population_entries_need_a_population_block() {
        let mut settlement = town(3);
        let err = attach(
            &mut settlement,
            Containee::Expertise {
                skill: "farming".into(),
                level: 2,
            },
        )
        .expect_err("no population yet");
        assert!(matches!(err, DomainError::EmptySlot { .. }));

        attach(&mut settlement, Containee::Population(CommunityStats::new(50)))
            .expect("first block");
        attach(
            &mut settlement,
            Containee::Production {
                pile: ResourcePile::new(
                    FixtureId::new(30),
                    "food",
                    "bread",
                    Quantity::new(Amount::Integer(4), "loaves"),
                ),
                consumed: true,
            },
        )
        .expect("population exists now");
        let Fixture::Town(town) = settlement else {
            panic!("still a town");
        };
        assert_eq!(town.population().map(|p| p.consumed.len()), Some(1));
    }

    #[test]
    fn test_second_population_is_fatal() {
        let mut settlement = town(3);
        attach(&mut settlement, Containee::Population(CommunityStats::new(50)))
            .expect("first block");
        let err = attach(&mut settlement, Containee::Population(CommunityStats::new(60)))
            .expect_err("second block");
        assert!(matches!(err, DomainError::SecondOccupant { .. }));
    }
}
