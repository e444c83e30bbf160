//! Error types for reading and writing maps.
//!
//! Everything in [`LoadError`] aborts a load outright; no partially built map
//! is ever returned alongside one. Recoverable conditions are warnings
//! (see [`mapkeep_domain::Warnings`]) and only show up here when escalated.

use std::path::PathBuf;

use mapkeep_domain::{DomainError, FixtureId, MapDimensions};

use crate::infrastructure::ports::StoreError;

/// A fatal problem while loading a map.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Containment rule violation or escalated warning.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A nested record names a parent that was never read as a container.
    #[error("{kind} record refers to parent {parent}, which is not a container in this map")]
    OrphanReference { kind: String, parent: FixtureId },

    /// Following parent references from a container leads back to itself.
    #[error("Containment cycle through {container}")]
    ContainmentCycle { container: FixtureId },

    #[error("{kind} record is missing required field '{field}'")]
    MissingField { kind: String, field: String },

    #[error("{kind} record has an invalid '{field}': {reason}")]
    InvalidField {
        kind: String,
        field: String,
        reason: String,
    },

    #[error("Map has no header record")]
    MissingHeader,

    #[error("Unsupported map version {found} (this build reads version {})", MapDimensions::CURRENT_VERSION)]
    UnsupportedVersion { found: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot tell the map format of {}", .0.display())]
    UnknownFormat(PathBuf),
}

impl LoadError {
    pub fn missing_field(kind: impl ToString, field: impl ToString) -> Self {
        Self::MissingField {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_field(kind: impl ToString, field: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidField {
            kind: kind.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the data is corrupt, as opposed to the store
    /// or file being unreadable.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            Self::Store(_) | Self::Io { .. } | Self::UnknownFormat(_)
        )
    }
}

/// A problem while writing a map.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot tell the map format of {}", .0.display())]
    UnknownFormat(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_message_names_parent() {
        let err = LoadError::OrphanReference {
            kind: "worker".into(),
            parent: FixtureId::new(5),
        };
        assert_eq!(
            err.to_string(),
            "worker record refers to parent 5, which is not a container in this map"
        );
        assert!(err.is_corruption());
    }

    #[test]
    fn test_unsupported_version_message() {
        let err = LoadError::UnsupportedVersion { found: 1 };
        assert_eq!(
            err.to_string(),
            "Unsupported map version 1 (this build reads version 2)"
        );
    }
}
