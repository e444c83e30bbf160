//! Grid coordinates and map dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (row, column) key into the map grid.
///
/// Locations are plain values: they are never allocated, only compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub column: i32,
}

impl Location {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The size of a map and the format version it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapDimensions {
    pub rows: i32,
    pub columns: i32,
    pub version: i32,
}

impl MapDimensions {
    /// The only map format version this crate reads and writes.
    pub const CURRENT_VERSION: i32 = 2;

    pub const fn new(rows: i32, columns: i32, version: i32) -> Self {
        Self {
            rows,
            columns,
            version,
        }
    }

    /// Whether the location lies inside these dimensions.
    pub fn contains(&self, location: Location) -> bool {
        (0..self.rows).contains(&location.row) && (0..self.columns).contains(&location.column)
    }

    /// Every location on the map, row-major.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| Location::new(row, column)))
    }
}

impl fmt::Display for MapDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (v{})", self.rows, self.columns, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let dims = MapDimensions::new(3, 4, 2);
        assert!(dims.contains(Location::new(0, 0)));
        assert!(dims.contains(Location::new(2, 3)));
        assert!(!dims.contains(Location::new(3, 0)));
        assert!(!dims.contains(Location::new(0, -1)));
    }

    #[test]
    fn test_locations_are_row_major() {
        let dims = MapDimensions::new(2, 2, 2);
        let all: Vec<_> = dims.locations().collect();
        assert_eq!(
            all,
            vec![
                Location::new(0, 0),
                Location::new(0, 1),
                Location::new(1, 0),
                Location::new(1, 1),
            ]
        );
    }
}
