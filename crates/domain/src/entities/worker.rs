//! Workers and their jobs and skills
//!
//! A worker is a container: it may ride at most one mount, carry any number of
//! implements, and practise any number of jobs, each with its own skills.

use std::hash::{Hash, Hasher};

use super::items::Implement;
use super::mobiles::Animal;
use super::same_members;
use crate::entities::FixtureKind;
use crate::error::DomainError;
use crate::ids::FixtureId;

/// A worker's core statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

/// A skill within a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Skill {
    pub name: String,
    pub level: i32,
    /// Hours of experience toward the next level.
    pub hours: i32,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: i32, hours: i32) -> Self {
        Self {
            name: name.into(),
            level,
            hours,
        }
    }
}

/// A job (profession) a worker has levels in.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub level: i32,
    pub skills: Vec<Skill>,
}

impl Job {
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Self {
            name: name.into(),
            level,
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.name == name)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.level == other.level
            && same_members(&self.skills, &other.skills)
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.level.hash(state);
    }
}

/// A member of a unit.
#[derive(Debug, Clone)]
pub struct Worker {
    pub id: FixtureId,
    pub name: String,
    pub race: String,
    pub stats: Option<WorkerStats>,
    pub note: Option<String>,
    pub image: Option<String>,
    pub portrait: Option<String>,
    jobs: Vec<Job>,
    mount: Option<Animal>,
    equipment: Vec<Implement>,
}

impl Worker {
    pub fn new(id: FixtureId, name: impl Into<String>, race: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            race: race.into(),
            stats: None,
            note: None,
            image: None,
            portrait: None,
            jobs: Vec::new(),
            mount: None,
            equipment: Vec::new(),
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }

    pub fn mount(&self) -> Option<&Animal> {
        self.mount.as_ref()
    }

    pub fn equipment(&self) -> &[Implement] {
        &self.equipment
    }

    /// Jobs are cumulative; any number may be added.
    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Add a skill to the named job, creating the job at level 0 if the
    /// worker does not have it yet.
    pub fn add_skill(&mut self, job_name: &str, skill: Skill) {
        match self.jobs.iter_mut().find(|job| job.name == job_name) {
            Some(job) => job.skills.push(skill),
            None => self.jobs.push(Job::new(job_name, 0).with_skill(skill)),
        }
    }

    /// A worker rides at most one mount.
    pub fn set_mount(&mut self, mount: Animal) -> Result<(), DomainError> {
        if self.mount.is_some() {
            return Err(DomainError::second_occupant(
                FixtureKind::Worker,
                self.id,
                "mount",
            ));
        }
        self.mount = Some(mount);
        Ok(())
    }

    pub fn add_equipment(&mut self, implement: Implement) {
        self.equipment.push(implement);
    }
}

impl PartialEq for Worker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.race == other.race
            && self.stats == other.stats
            && self.note == other.note
            && self.image == other.image
            && self.portrait == other.portrait
            && self.mount == other.mount
            && same_members(&self.jobs, &other.jobs)
            && same_members(&self.equipment, &other.equipment)
    }
}

impl Eq for Worker {}

impl Hash for Worker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
        self.race.hash(state);
        self.stats.hash(state);
        self.mount.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_creates_missing_job() {
        let mut worker = Worker::new(FixtureId::new(10), "Ana", "human");
        worker.add_skill("smith", Skill::new("forging", 2, 40));
        let job = worker.job("smith").expect("job created on demand");
        assert_eq!(job.level, 0);
        assert_eq!(job.skill("forging").map(|s| s.level), Some(2));
    }

    #[test]
    fn test_second_mount_is_rejected() {
        let mut worker = Worker::new(FixtureId::new(10), "Ana", "human");
        worker
            .set_mount(Animal::new(FixtureId::new(11), "horse"))
            .expect("first mount");
        let err = worker
            .set_mount(Animal::new(FixtureId::new(12), "camel"))
            .expect_err("second mount");
        assert_eq!(err.to_string(), "worker 10 already has a mount");
        assert_eq!(worker.mount().map(|m| m.id), Some(FixtureId::new(11)));
    }

    #[test]
    fn test_equality_ignores_job_order() {
        let mut a = Worker::new(FixtureId::new(1), "Bo", "elf");
        a.add_job(Job::new("farmer", 1));
        a.add_job(Job::new("miner", 2));
        let mut b = Worker::new(FixtureId::new(1), "Bo", "elf");
        b.add_job(Job::new("miner", 2));
        b.add_job(Job::new("farmer", 1));
        assert_eq!(a, b);
    }
}
