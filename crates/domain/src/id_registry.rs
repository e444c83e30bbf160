//! Per-load registry of fixture identifiers
//!
//! A registry lives for exactly one load session. It is a plain value owned by
//! whoever runs the load, so nothing leaks from one map into the next.

use std::collections::HashSet;

use crate::error::DomainError;
use crate::ids::FixtureId;
use crate::warning::{Warning, Warnings};

/// Issues and validates fixture IDs for one map.
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    used: HashSet<FixtureId>,
    next_candidate: i32,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ID read from a map.
    ///
    /// A duplicate is tolerated: it raises a [`Warning::DuplicateId`] and the
    /// ID is still returned. The only failure is a strict warning policy.
    pub fn register(
        &mut self,
        id: FixtureId,
        warnings: &mut Warnings,
    ) -> Result<FixtureId, DomainError> {
        if !self.used.insert(id) {
            warnings.record(Warning::DuplicateId { id })?;
        }
        Ok(id)
    }

    /// Mint and register an ID that is not currently registered.
    pub fn create_id(&mut self) -> FixtureId {
        loop {
            let candidate = FixtureId::new(self.next_candidate);
            self.next_candidate = self.next_candidate.wrapping_add(1);
            if self.used.insert(candidate) {
                return candidate;
            }
        }
    }

    pub fn is_registered(&self, id: FixtureId) -> bool {
        self.used.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_register_warns_once_and_returns_id() {
        let mut registry = IdRegistry::new();
        let mut warnings = Warnings::collecting();
        let id = FixtureId::new(12);

        assert_eq!(registry.register(id, &mut warnings), Ok(id));
        assert!(warnings.is_empty());
        assert_eq!(registry.register(id, &mut warnings), Ok(id));
        assert_eq!(warnings.items(), &[Warning::DuplicateId { id }]);
    }

    #[test]
    fn test_duplicate_register_is_fatal_when_strict() {
        let mut registry = IdRegistry::new();
        let mut warnings = Warnings::strict();
        let id = FixtureId::new(3);
        registry.register(id, &mut warnings).expect("first registration");
        let err = registry.register(id, &mut warnings).expect_err("strict");
        assert!(matches!(err, DomainError::Escalated(Warning::DuplicateId { .. })));
    }

    #[test]
    fn test_create_id_skips_registered_values() {
        let mut registry = IdRegistry::new();
        let mut warnings = Warnings::collecting();
        for raw in 0..5 {
            registry
                .register(FixtureId::new(raw), &mut warnings)
                .expect("distinct ids");
        }
        let created = registry.create_id();
        assert_eq!(created, FixtureId::new(5));
        let again = registry.create_id();
        assert_ne!(again, created);
        assert!(registry.is_registered(again));
        assert_eq!(registry.len(), 7);
    }
}
