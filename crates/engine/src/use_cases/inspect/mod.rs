//! Comparing maps and producing a player's redacted view.

use mapkeep_domain::{DiagnosticSink, IsSubset, MapGrid, PlayerId};

/// Outcome of comparing a candidate map against a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Everything observable in the candidate also holds for the reference.
    pub is_subset: bool,
    /// The maps are equal as wholes.
    pub is_equal: bool,
}

/// Compare `candidate` against `reference`, reporting each mismatch to `sink`.
pub fn compare(
    reference: &MapGrid,
    candidate: &MapGrid,
    sink: &mut dyn DiagnosticSink,
) -> Comparison {
    let is_subset = reference.is_subset(candidate, sink);
    let is_equal = reference == candidate;
    tracing::debug!(is_subset, is_equal, "Compared maps");
    Comparison {
        is_subset,
        is_equal,
    }
}

/// `map` as `player` may see it: other players' fixtures lose their private
/// details.
pub fn player_view(map: &MapGrid, player: PlayerId) -> MapGrid {
    if !map.players().contains(player) {
        tracing::warn!(%player, "Redacting for a player the map does not know");
    }
    map.copy(true, player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapkeep_domain::{
        Fixture, FixtureId, Location, MapDimensions, Player, Players, Unit, Warnings, Worker,
    };

    fn map_with_units() -> MapGrid {
        let mut players = Players::new();
        players.insert(Player::new(PlayerId::new(1), "Ann"));
        players.insert(Player::new(PlayerId::new(2), "Bo"));
        let mut map = MapGrid::new(MapDimensions::new(3, 3, 2), players, 4);
        let mut warnings = Warnings::strict();
        for (id, owner) in [(10, 1), (20, 2)] {
            let mut unit = Unit::new(FixtureId::new(id), PlayerId::new(owner), "scouts", "Eyes");
            unit.set_orders(4, "Watch the ford");
            unit.add_member(Worker::new(FixtureId::new(id + 1), "Lia", "elf").into())
                .expect("workers join units");
            map.place_fixture(Location::new(1, 1), unit.into(), &mut warnings)
                .expect("placed");
        }
        map
    }

    fn unit(map: &MapGrid, id: i32) -> Unit {
        match map
            .find_fixture(FixtureId::new(id))
            .map(|(_, found)| found.into_owned())
        {
            Some(Fixture::Unit(unit)) => unit,
            other => panic!("expected unit {id}, got {other:?}"),
        }
    }

    #[test]
    fn test_player_view_keeps_own_units_and_redacts_others() {
        let map = map_with_units();
        let view = player_view(&map, PlayerId::new(1));

        assert_eq!(unit(&view, 10).members().len(), 1);
        assert!(!unit(&view, 10).orders.is_empty());
        assert!(unit(&view, 20).members().is_empty());
        assert!(unit(&view, 20).orders.is_empty());
    }

    #[test]
    fn test_player_view_is_a_subset_but_not_equal() {
        let map = map_with_units();
        let view = player_view(&map, PlayerId::new(1));
        let mut lines = Vec::new();

        let forward = compare(&map, &view, &mut lines);
        assert_eq!(
            forward,
            Comparison {
                is_subset: true,
                is_equal: false
            }
        );
        assert!(lines.is_empty(), "{lines:?}");

        let backward = compare(&view, &map, &mut lines);
        assert!(!backward.is_subset);
        assert!(!lines.is_empty());
    }

    #[test]
    fn test_identical_maps_compare_equal() {
        let map = map_with_units();
        let copy = map.copy(false, PlayerId::new(1));
        let mut lines = Vec::new();
        let result = compare(&map, &copy, &mut lines);
        assert!(result.is_subset && result.is_equal);
        assert!(lines.is_empty());
    }
}
