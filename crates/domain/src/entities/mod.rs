//! Domain entities - fixtures and players

mod explorables;
mod fixture;
mod fortress;
mod items;
mod mobiles;
mod player;
mod settlements;
mod terrain_features;
mod unit;
mod worker;

pub use explorables::{Adventure, Cache, Portal, TextNote};
pub use fixture::{Fixture, FixtureKind};
pub use fortress::Fortress;
pub use items::{Implement, ResourcePile};
pub use mobiles::{Animal, AnimalTracks, Immortal};
pub use player::{Player, Players};
pub use settlements::{CommunityStats, Town, Village};
pub use terrain_features::{
    Battlefield, Cave, Forest, Ground, Grove, Hill, Meadow, Mine, MineralVein, Oasis, Shrub,
    StoneDeposit,
};
pub use unit::Unit;
pub use worker::{Job, Skill, Worker, WorkerStats};

/// Order-insensitive comparison of two member lists (multiset equality).
pub(crate) fn same_members<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut matched = vec![false; right.len()];
    for item in left {
        let found = right
            .iter()
            .enumerate()
            .find(|(index, candidate)| !matched[*index] && *candidate == item)
            .map(|(index, _)| index);
        match found {
            Some(index) => matched[index] = true,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::same_members;

    #[test]
    fn test_same_members_is_multiset_equality() {
        assert!(same_members(&[1, 2, 2], &[2, 1, 2]));
        assert!(!same_members(&[1, 2, 2], &[1, 1, 2]));
        assert!(!same_members(&[1], &[1, 1]));
        assert!(same_members::<i32>(&[], &[]));
    }
}
