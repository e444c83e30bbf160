//! Recoverable data-quality conditions raised while loading a map.
//!
//! Warnings never stop a load on their own. A caller doing strict validation
//! can ask for them to be escalated, in which case recording one yields
//! [`DomainError::Escalated`] instead.

use thiserror::Error;

use crate::error::DomainError;
use crate::ids::FixtureId;
use crate::types::Location;

/// A recoverable data-quality issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// An identifier was registered more than once in one load.
    #[error("Duplicate ID {id}")]
    DuplicateId { id: FixtureId },

    /// Two unrelated fixtures with the same ID were both kept at a location.
    #[error("Duplicate fixture ID {id} at {location}; keeping both")]
    DuplicateFixture { id: FixtureId, location: Location },

    /// An optional field was missing and its default was used.
    #[error("Missing field '{field}' in {kind}; using default '{default}'")]
    MissingField {
        kind: String,
        field: String,
        default: String,
    },

    /// A field was supplied under its old name.
    #[error("Deprecated field '{deprecated}' in {kind}; use '{replacement}' instead")]
    DeprecatedField {
        kind: String,
        deprecated: String,
        replacement: String,
    },
}

/// How recorded warnings are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningPolicy {
    /// Collect and report, never fail.
    #[default]
    Collect,
    /// Every warning becomes fatal.
    Strict,
}

/// Collector for the warnings of one load session.
#[derive(Debug, Default)]
pub struct Warnings {
    policy: WarningPolicy,
    items: Vec<Warning>,
}

impl Warnings {
    pub fn new(policy: WarningPolicy) -> Self {
        Self {
            policy,
            items: Vec::new(),
        }
    }

    pub fn collecting() -> Self {
        Self::new(WarningPolicy::Collect)
    }

    pub fn strict() -> Self {
        Self::new(WarningPolicy::Strict)
    }

    pub fn policy(&self) -> WarningPolicy {
        self.policy
    }

    /// Record a warning, or fail with it under [`WarningPolicy::Strict`].
    pub fn record(&mut self, warning: Warning) -> Result<(), DomainError> {
        tracing::warn!(%warning, "map data warning");
        match self.policy {
            WarningPolicy::Collect => {
                self.items.push(warning);
                Ok(())
            }
            WarningPolicy::Strict => Err(DomainError::Escalated(warning)),
        }
    }

    pub fn items(&self) -> &[Warning] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_inner(self) -> Vec<Warning> {
        self.items
    }
}
