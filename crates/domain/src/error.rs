//! Unified error types for the domain layer
//!
//! Every variant here is fatal to a load: structural corruption that cannot be
//! recovered by defaulting. Recoverable conditions go through
//! [`crate::warning::Warnings`] instead.

use thiserror::Error;

use crate::containment::ContaineeKind;
use crate::entities::FixtureKind;
use crate::ids::FixtureId;
use crate::warning::Warning;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The (container, containee) kind pair is not in the containment table
    #[error("A {container} (ID {container_id}) cannot contain a {child}")]
    IllegalContainment {
        container: FixtureKind,
        container_id: FixtureId,
        child: ContaineeKind,
    },

    /// A single-occupancy slot was filled twice
    #[error("{container} {container_id} already has a {slot}")]
    SecondOccupant {
        container: FixtureKind,
        container_id: FixtureId,
        slot: &'static str,
    },

    /// Entries that extend a single-occupancy slot arrived with the slot empty
    #[error("{container} {container_id} has no {slot} to extend")]
    EmptySlot {
        container: FixtureKind,
        container_id: FixtureId,
        slot: &'static str,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A warning escalated under strict validation
    #[error("Escalated warning: {0}")]
    Escalated(Warning),
}

impl DomainError {
    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format:
    /// - Unknown terrain or status names
    /// - Malformed quantities
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for River {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "lake" => Ok(Self::Lake),
    ///             _ => Err(DomainError::parse(format!("Unknown river: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an illegal containment error
    pub fn illegal_containment(
        container: FixtureKind,
        container_id: FixtureId,
        child: ContaineeKind,
    ) -> Self {
        Self::IllegalContainment {
            container,
            container_id,
            child,
        }
    }

    /// Create a second-occupant error
    pub fn second_occupant(
        container: FixtureKind,
        container_id: FixtureId,
        slot: &'static str,
    ) -> Self {
        Self::SecondOccupant {
            container,
            container_id,
            slot,
        }
    }

    /// Create an empty-slot error
    pub fn empty_slot(container: FixtureKind, container_id: FixtureId, slot: &'static str) -> Self {
        Self::EmptySlot {
            container,
            container_id,
            slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown terrain: lava");
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Unknown terrain: lava");
    }

    #[test]
    fn test_illegal_containment_error() {
        let err = DomainError::illegal_containment(
            FixtureKind::Fortress,
            FixtureId::new(5),
            ContaineeKind::Fixture(FixtureKind::Forest),
        );
        assert_eq!(err.to_string(), "A fortress (ID 5) cannot contain a forest");
    }

    #[test]
    fn test_second_occupant_error() {
        let err = DomainError::second_occupant(FixtureKind::Town, FixtureId::new(9), "population");
        assert!(matches!(err, DomainError::SecondOccupant { .. }));
        assert_eq!(err.to_string(), "town 9 already has a population");
    }
}
