//! Typed access to record fields.
//!
//! Required fields that are absent or malformed are fatal. Optional fields
//! with a default raise [`Warning::MissingField`] when absent. A few fields
//! were renamed over time; the old name is still read, with a
//! [`Warning::DeprecatedField`].

use std::fmt::Display;
use std::str::FromStr;

use mapkeep_domain::{FixtureId, PlayerId, Warning, Warnings};

use super::{FieldValue, Record};
use crate::error::LoadError;

/// (current name, deprecated name)
const RENAMED: &[(&str, &str)] = &[("kind", "type"), ("discoverDC", "dc")];

/// Reads fields of one record, reporting warnings to the load's collector.
pub struct FieldReader<'a> {
    record: &'a Record,
    warnings: &'a mut Warnings,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a Record, warnings: &'a mut Warnings) -> Self {
        Self { record, warnings }
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn has(&self, name: &str) -> bool {
        self.record.get(name).is_some()
            || RENAMED
                .iter()
                .any(|(current, old)| *current == name && self.record.get(old).is_some())
    }

    fn lookup(&mut self, name: &str) -> Result<Option<&'a FieldValue>, LoadError> {
        let record = self.record;
        if let Some(value) = record.get(name) {
            return Ok(Some(value));
        }
        let Some((_, old)) = RENAMED.iter().find(|(current, _)| *current == name) else {
            return Ok(None);
        };
        match record.get(old) {
            Some(value) => {
                self.warnings.record(Warning::DeprecatedField {
                    kind: record.kind().to_string(),
                    deprecated: old.to_string(),
                    replacement: name.to_string(),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn defaulted(&mut self, name: &str, default: &dyn Display) -> Result<(), LoadError> {
        self.warnings.record(Warning::MissingField {
            kind: self.record.kind().to_string(),
            field: name.to_string(),
            default: default.to_string(),
        })?;
        Ok(())
    }

    fn invalid(&self, name: &str, reason: impl ToString) -> LoadError {
        LoadError::invalid_field(self.record.kind(), name, reason)
    }

    fn missing(&self, name: &str) -> LoadError {
        LoadError::missing_field(self.record.kind(), name)
    }

    // =========================================================================
    // Integers
    // =========================================================================

    pub fn optional_integer(&mut self, name: &str) -> Result<Option<i64>, LoadError> {
        match self.lookup(name)? {
            None => Ok(None),
            Some(FieldValue::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(self.invalid(name, format!("expected an integer, found '{}'", other))),
        }
    }

    pub fn integer(&mut self, name: &str) -> Result<i64, LoadError> {
        self.optional_integer(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_int(&mut self, name: &str) -> Result<Option<i32>, LoadError> {
        match self.optional_integer(name)? {
            None => Ok(None),
            Some(value) => i32::try_from(value)
                .map(Some)
                .map_err(|_| self.invalid(name, format!("{} is out of range", value))),
        }
    }

    pub fn int(&mut self, name: &str) -> Result<i32, LoadError> {
        self.optional_int(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn int_or(&mut self, name: &str, default: i32) -> Result<i32, LoadError> {
        match self.optional_int(name)? {
            Some(value) => Ok(value),
            None => {
                self.defaulted(name, &default)?;
                Ok(default)
            }
        }
    }

    pub fn id(&mut self, name: &str) -> Result<FixtureId, LoadError> {
        self.int(name).map(FixtureId::new)
    }

    /// Owner field; an unowned fixture belongs to the independent player.
    pub fn owner(&mut self) -> Result<PlayerId, LoadError> {
        self.int_or("owner", PlayerId::INDEPENDENT.get())
            .map(PlayerId::new)
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn optional_text(&mut self, name: &str) -> Result<Option<String>, LoadError> {
        match self.lookup(name)? {
            None => Ok(None),
            Some(FieldValue::Text(value)) => Ok(Some(value.clone())),
            Some(other) => Err(self.invalid(name, format!("expected text, found '{}'", other))),
        }
    }

    pub fn text(&mut self, name: &str) -> Result<String, LoadError> {
        self.optional_text(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn text_or(&mut self, name: &str, default: &str) -> Result<String, LoadError> {
        match self.optional_text(name)? {
            Some(value) => Ok(value),
            None => {
                self.defaulted(name, &default)?;
                Ok(default.to_string())
            }
        }
    }

    /// Image or portrait override; absent and empty both mean "none".
    pub fn override_text(&mut self, name: &str) -> Result<Option<String>, LoadError> {
        Ok(self.optional_text(name)?.filter(|value| !value.is_empty()))
    }

    // =========================================================================
    // Booleans
    // =========================================================================

    pub fn optional_boolean(&mut self, name: &str) -> Result<Option<bool>, LoadError> {
        match self.lookup(name)? {
            None => Ok(None),
            Some(FieldValue::Boolean(value)) => Ok(Some(*value)),
            Some(FieldValue::Integer(0)) => Ok(Some(false)),
            Some(FieldValue::Integer(1)) => Ok(Some(true)),
            Some(FieldValue::Text(text)) if text.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(FieldValue::Text(text)) if text.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(self.invalid(name, format!("expected a boolean, found '{}'", other))),
        }
    }

    pub fn boolean_or(&mut self, name: &str, default: bool) -> Result<bool, LoadError> {
        match self.optional_boolean(name)? {
            Some(value) => Ok(value),
            None => {
                self.defaulted(name, &default)?;
                Ok(default)
            }
        }
    }

    // =========================================================================
    // Parsed text
    // =========================================================================

    pub fn optional_parsed<T>(&mut self, name: &str) -> Result<Option<T>, LoadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional_text(name)? {
            None => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|err: T::Err| self.invalid(name, err)),
        }
    }

    pub fn parsed<T>(&mut self, name: &str) -> Result<T, LoadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional_parsed(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn parsed_or<T>(&mut self, name: &str, default: T) -> Result<T, LoadError>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        match self.optional_parsed(name)? {
            Some(value) => Ok(value),
            None => {
                self.defaulted(name, &default)?;
                Ok(default)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordKind;
    use mapkeep_domain::{DomainError, FixtureKind, TownStatus};

    fn forest_record() -> Record {
        Record::new(RecordKind::Fixture(FixtureKind::Forest))
            .with("id", 4)
            .with("type", "pine")
            .with("rows", 1)
    }

    #[test]
    fn test_deprecated_name_is_read_with_warning() {
        let record = forest_record();
        let mut warnings = Warnings::collecting();
        let mut reader = FieldReader::new(&record, &mut warnings);
        assert_eq!(reader.text("kind").expect("old name accepted"), "pine");
        assert!(reader.has("kind"));
        assert_eq!(
            warnings.items(),
            &[Warning::DeprecatedField {
                kind: "forest".into(),
                deprecated: "type".into(),
                replacement: "kind".into(),
            }]
        );
    }

    #[test]
    fn test_missing_optional_field_defaults_with_warning() {
        let record = forest_record();
        let mut warnings = Warnings::collecting();
        let mut reader = FieldReader::new(&record, &mut warnings);
        assert_eq!(reader.int_or("discoverDC", 0).expect("defaulted"), 0);
        assert!(reader.boolean_or("rows", false).expect("integer flag"));
        assert!(matches!(warnings.items(), [Warning::MissingField { field, .. }] if field == "discoverDC"));
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let record = forest_record();
        let mut warnings = Warnings::collecting();
        let mut reader = FieldReader::new(&record, &mut warnings);
        let err = reader.text("name").expect_err("required");
        assert!(matches!(err, LoadError::MissingField { .. }));
    }

    #[test]
    fn test_wrong_type_and_bad_vocabulary_are_fatal() {
        let record = forest_record().with("status", "smouldering");
        let mut warnings = Warnings::collecting();
        let mut reader = FieldReader::new(&record, &mut warnings);
        assert!(matches!(
            reader.text("id"),
            Err(LoadError::InvalidField { .. })
        ));
        assert!(matches!(
            reader.parsed::<TownStatus>("status"),
            Err(LoadError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_strict_policy_escalates_defaults() {
        let record = forest_record();
        let mut warnings = Warnings::strict();
        let mut reader = FieldReader::new(&record, &mut warnings);
        let err = reader.int_or("discoverDC", 0).expect_err("strict");
        assert!(matches!(
            err,
            LoadError::Domain(DomainError::Escalated(Warning::MissingField { .. }))
        ));
    }
}
