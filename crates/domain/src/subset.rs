//! Directional structural comparison of fixtures and maps
//!
//! `reference.is_subset(candidate, sink)` asks whether everything observable in
//! `candidate` is also true of `reference`. Every mismatch is written to the
//! sink as one line and the comparison carries on, so a single run yields the
//! complete difference. Fields a redacted copy blanks out (town DC, adventure
//! text, unit orders, container members, population statistics) are read as
//! "unknown" when absent from the candidate, so a player's view is a subset of
//! the map it was made from.

use std::fmt::Display;

use crate::aggregates::{MapGrid, Tile};
use crate::entities::{CommunityStats, Fixture, Job, Worker};
use crate::types::Location;

/// Where subset diagnostics go.
pub trait DiagnosticSink {
    fn report(&mut self, line: String);
}

impl DiagnosticSink for Vec<String> {
    fn report(&mut self, line: String) {
        self.push(line);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn report(&mut self, _line: String) {}
}

/// Writes every diagnostic as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, line: String) {
        tracing::info!(mismatch = %line, "subset check");
    }
}

/// Asymmetric structural containment.
pub trait IsSubset {
    /// Whether every observable fact in `candidate` also holds for `self`.
    fn is_subset(&self, candidate: &Self, sink: &mut dyn DiagnosticSink) -> bool;
}

fn same<T: PartialEq>(
    sink: &mut dyn DiagnosticSink,
    context: &dyn Display,
    field: &str,
    ours: &T,
    theirs: &T,
) -> bool {
    if ours == theirs {
        true
    } else {
        sink.report(format!("In {}: {} differs", context, field));
        false
    }
}

/// An optional candidate field is fine when absent, otherwise it must match.
fn same_if_known<T: PartialEq>(
    sink: &mut dyn DiagnosticSink,
    context: &dyn Display,
    field: &str,
    ours: &Option<T>,
    theirs: &Option<T>,
) -> bool {
    match theirs {
        None => true,
        Some(_) => same(sink, context, field, ours, theirs),
    }
}

/// Find a counterpart for each of `theirs` in `ours`: first by ID, recursing
/// with reporting; failing that, any fixture it is silently a subset of.
fn members_subset(
    sink: &mut dyn DiagnosticSink,
    context: &dyn Display,
    ours: &[Fixture],
    theirs: &[Fixture],
) -> bool {
    let mut ok = true;
    for member in theirs {
        ok &= has_counterpart(sink, context, ours, member);
    }
    ok
}

fn has_counterpart(
    sink: &mut dyn DiagnosticSink,
    context: &dyn Display,
    ours: &[Fixture],
    candidate: &Fixture,
) -> bool {
    let quietly_covers = |fixture: &Fixture| fixture.is_subset(candidate, &mut SilentSink);
    let same_id: Vec<&Fixture> = ours
        .iter()
        .filter(|fixture| fixture.id() == candidate.id() && fixture.kind() == candidate.kind())
        .collect();
    if same_id.iter().any(|&fixture| quietly_covers(fixture)) {
        return true;
    }
    if let Some(first) = same_id.first() {
        return first.is_subset(candidate, sink);
    }
    if ours.iter().any(quietly_covers) {
        return true;
    }
    sink.report(format!("In {}: extra fixture {}", context, candidate));
    false
}

fn worker_subset(ours: &Worker, theirs: &Worker, sink: &mut dyn DiagnosticSink) -> bool {
    let context: &dyn Display = &format!("worker {} (ID #{})", ours.name, ours.id);
    let mut ok = true;
    ok &= same(sink, context, "name", &ours.name, &theirs.name);
    ok &= same(sink, context, "race", &ours.race, &theirs.race);
    ok &= same_if_known(sink, context, "stats", &ours.stats, &theirs.stats);
    ok &= same_if_known(sink, context, "note", &ours.note, &theirs.note);
    ok &= same_if_known(sink, context, "image", &ours.image, &theirs.image);
    ok &= same_if_known(sink, context, "portrait", &ours.portrait, &theirs.portrait);
    for job in theirs.jobs() {
        ok &= match ours.job(&job.name) {
            Some(our_job) => job_subset(our_job, job, context, sink),
            None => {
                sink.report(format!("In {}: extra job {}", context, job.name));
                false
            }
        };
    }
    if let Some(mount) = theirs.mount() {
        ok &= match ours.mount() {
            Some(our_mount) => same(sink, context, "mount", our_mount, mount),
            None => {
                sink.report(format!("In {}: extra mount", context));
                false
            }
        };
    }
    for implement in theirs.equipment() {
        if !ours.equipment().contains(implement) {
            sink.report(format!("In {}: extra equipment {}", context, implement.kind));
            ok = false;
        }
    }
    ok
}

fn job_subset(ours: &Job, theirs: &Job, worker: &dyn Display, sink: &mut dyn DiagnosticSink) -> bool {
    let context: &dyn Display = &format!("{}, job {}", worker, ours.name);
    let mut ok = same(sink, context, "level", &ours.level, &theirs.level);
    for skill in &theirs.skills {
        ok &= match ours.skill(&skill.name) {
            Some(our_skill) => same(sink, context, &format!("skill {}", skill.name), our_skill, skill),
            None => {
                sink.report(format!("In {}: extra skill {}", context, skill.name));
                false
            }
        };
    }
    ok
}

fn population_subset(
    ours: Option<&CommunityStats>,
    theirs: Option<&CommunityStats>,
    context: &dyn Display,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let Some(theirs) = theirs else {
        return true;
    };
    let Some(ours) = ours else {
        sink.report(format!("In {}: extra population statistics", context));
        return false;
    };
    let mut ok = same(sink, context, "population", &ours.population, &theirs.population);
    for (skill, level) in &theirs.expertise {
        if ours.expertise.get(skill) != Some(level) {
            sink.report(format!("In {}: expertise in {} differs", context, skill));
            ok = false;
        }
    }
    if !theirs.worked_fields.is_subset(&ours.worked_fields) {
        sink.report(format!("In {}: extra worked fields", context));
        ok = false;
    }
    for (label, our_piles, their_piles) in [
        ("production", &ours.produced, &theirs.produced),
        ("consumption", &ours.consumed, &theirs.consumed),
    ] {
        for pile in their_piles {
            if !our_piles.contains(pile) {
                sink.report(format!("In {}: extra {} of {}", context, label, pile.contents));
                ok = false;
            }
        }
    }
    ok
}

impl IsSubset for Fixture {
    /// IDs are not compared here; callers pair fixtures up by ID first.
    fn is_subset(&self, candidate: &Fixture, sink: &mut dyn DiagnosticSink) -> bool {
        let context: &dyn Display = self;
        match (self, candidate) {
            (Fixture::Fortress(ours), Fixture::Fortress(theirs)) => {
                let mut ok = true;
                ok &= same(sink, context, "owner", &ours.owner, &theirs.owner);
                ok &= same(sink, context, "name", &ours.name, &theirs.name);
                ok &= same(sink, context, "size", &ours.size, &theirs.size);
                ok &= same_if_known(sink, context, "image", &ours.image, &theirs.image);
                ok &= same_if_known(sink, context, "portrait", &ours.portrait, &theirs.portrait);
                ok &= members_subset(sink, context, ours.members(), theirs.members());
                ok
            }
            (Fixture::Unit(ours), Fixture::Unit(theirs)) => {
                let mut ok = true;
                ok &= same(sink, context, "owner", &ours.owner, &theirs.owner);
                ok &= same(sink, context, "kind", &ours.kind, &theirs.kind);
                ok &= same(sink, context, "name", &ours.name, &theirs.name);
                ok &= same_if_known(sink, context, "image", &ours.image, &theirs.image);
                ok &= same_if_known(sink, context, "portrait", &ours.portrait, &theirs.portrait);
                for (label, our_turns, their_turns) in [
                    ("orders", &ours.orders, &theirs.orders),
                    ("results", &ours.results, &theirs.results),
                ] {
                    for (turn, text) in their_turns {
                        if our_turns.get(turn) != Some(text) {
                            sink.report(format!("In {}: {} for turn {} differ", context, label, turn));
                            ok = false;
                        }
                    }
                }
                ok &= members_subset(sink, context, ours.members(), theirs.members());
                ok
            }
            (Fixture::Worker(ours), Fixture::Worker(theirs)) => worker_subset(ours, theirs, sink),
            (Fixture::Town(ours), Fixture::Town(theirs)) => {
                let mut ok = true;
                ok &= same(sink, context, "kind", &ours.kind, &theirs.kind);
                ok &= same(sink, context, "status", &ours.status, &theirs.status);
                ok &= same(sink, context, "size", &ours.size, &theirs.size);
                ok &= same(sink, context, "name", &ours.name, &theirs.name);
                ok &= same(sink, context, "owner", &ours.owner, &theirs.owner);
                ok &= same_if_known(sink, context, "image", &ours.image, &theirs.image);
                ok &= same_if_known(sink, context, "portrait", &ours.portrait, &theirs.portrait);
                if theirs.dc != 0 {
                    ok &= same(sink, context, "DC", &ours.dc, &theirs.dc);
                }
                ok &= population_subset(ours.population(), theirs.population(), context, sink);
                ok
            }
            (Fixture::Village(ours), Fixture::Village(theirs)) => {
                let mut ok = true;
                ok &= same(sink, context, "status", &ours.status, &theirs.status);
                ok &= same(sink, context, "name", &ours.name, &theirs.name);
                ok &= same(sink, context, "owner", &ours.owner, &theirs.owner);
                ok &= same(sink, context, "race", &ours.race, &theirs.race);
                ok &= same_if_known(sink, context, "image", &ours.image, &theirs.image);
                ok &= same_if_known(sink, context, "portrait", &ours.portrait, &theirs.portrait);
                ok &= population_subset(ours.population(), theirs.population(), context, sink);
                ok
            }
            (Fixture::Adventure(ours), Fixture::Adventure(theirs)) => {
                let mut ok = true;
                ok &= same(sink, context, "owner", &ours.owner, &theirs.owner);
                ok &= same(sink, context, "brief", &ours.brief, &theirs.brief);
                if !theirs.full.is_empty() {
                    ok &= same(sink, context, "full description", &ours.full, &theirs.full);
                }
                ok
            }
            (ours, theirs) if ours.kind() != theirs.kind() => {
                sink.report(format!("In {}: kind differs ({})", context, theirs.kind()));
                false
            }
            (ours, theirs) => {
                if ours.equals_ignoring_id(theirs) {
                    true
                } else {
                    sink.report(format!("In {}: contents differ", context));
                    false
                }
            }
        }
    }
}

fn tile_subset(
    location: Location,
    ours: &Tile,
    theirs: &Tile,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let context: &dyn Display = &format!("tile {}", location);
    let mut ok = true;
    if !theirs.terrain.is_unknown() {
        ok &= same(sink, context, "terrain", &ours.terrain, &theirs.terrain);
    }
    if theirs.mountainous && !ours.mountainous {
        sink.report(format!("In {}: candidate is mountainous", context));
        ok = false;
    }
    if !theirs.rivers.is_subset(&ours.rivers) {
        sink.report(format!("In {}: extra rivers", context));
        ok = false;
    }

    let ours_all: Vec<Fixture> = ours.all_fixtures().collect();
    if let Some(forest) = theirs.forest() {
        let forest = Fixture::from(forest.clone());
        if !ours_all.iter().any(|fixture| fixture.equals_ignoring_id(&forest)) {
            sink.report(format!("In {}: primary forest differs", context));
            ok = false;
        }
    }
    if let Some(ground) = theirs.ground() {
        let ground = Fixture::from(ground.clone());
        if !ours_all.iter().any(|fixture| fixture.equals_ignoring_id(&ground)) {
            sink.report(format!("In {}: primary ground differs", context));
            ok = false;
        }
    }
    for fixture in theirs.fixtures() {
        if fixture.kind().is_non_authoritative() {
            continue;
        }
        ok &= has_counterpart(sink, context, &ours_all, fixture);
    }
    ok
}

impl IsSubset for MapGrid {
    fn is_subset(&self, candidate: &MapGrid, sink: &mut dyn DiagnosticSink) -> bool {
        let mut ok = true;
        if self.dimensions() != candidate.dimensions() {
            sink.report(format!(
                "Dimensions differ: {} vs {}",
                self.dimensions(),
                candidate.dimensions()
            ));
            ok = false;
        }
        for player in candidate.players().iter() {
            if !self.players().contains(player.id) {
                sink.report(format!("Extra player {} ({})", player.name, player.id));
                ok = false;
            }
        }
        let blank = Tile::default();
        for (location, theirs) in candidate.tiles() {
            let ours = self.tile(location).unwrap_or(&blank);
            ok &= tile_subset(location, ours, theirs, sink);
        }
        ok
    }
}
