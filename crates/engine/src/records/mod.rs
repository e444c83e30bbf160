//! The flat record model both map formats translate to and from.
//!
//! A record is a kind tag plus a mapping of field name to integer, text or
//! boolean. An absent field is simply a missing key. The relational store
//! keeps one table per [`RecordKind`]; the JSON tree keeps the same fields on
//! each node.

use std::collections::BTreeMap;
use std::fmt;

use mapkeep_domain::FixtureKind;

pub mod codec;
pub mod fields;
pub mod flatten;
pub mod schema;

pub use codec::Placement;
pub use fields::FieldReader;

/// One scalar field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Boolean(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Field name to value; absent fields have no entry.
pub type Fields = BTreeMap<String, FieldValue>;

/// Which stream (table, node tag) a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// The single header: version, dimensions, current turn.
    Map,
    Player,
    /// Terrain and mountainous flag of one location.
    Tile,
    /// One river at one location.
    River,
    Fixture(FixtureKind),
    Job,
    Skill,
    Population,
    Expertise,
    WorkedField,
    Production,
    Orders,
}

impl RecordKind {
    /// Every kind, in the order records are written and read.
    pub fn all() -> Vec<RecordKind> {
        let mut kinds = vec![
            RecordKind::Map,
            RecordKind::Player,
            RecordKind::Tile,
            RecordKind::River,
        ];
        kinds.extend(FixtureKind::all().iter().copied().map(RecordKind::Fixture));
        kinds.extend([
            RecordKind::Job,
            RecordKind::Skill,
            RecordKind::Population,
            RecordKind::Expertise,
            RecordKind::WorkedField,
            RecordKind::Production,
            RecordKind::Orders,
        ]);
        kinds
    }

    /// Table name and node tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Map => "map",
            RecordKind::Player => "player",
            RecordKind::Tile => "tile",
            RecordKind::River => "river",
            RecordKind::Fixture(kind) => kind.as_str(),
            RecordKind::Job => "job",
            RecordKind::Skill => "skill",
            RecordKind::Population => "population",
            RecordKind::Expertise => "expertise",
            RecordKind::WorkedField => "worked_field",
            RecordKind::Production => "production",
            RecordKind::Orders => "orders",
        }
    }

    /// Position in [`RecordKind::all`].
    pub fn order(&self) -> usize {
        Self::all()
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(usize::MAX)
    }

    /// Kinds that hang off a container but are not fixtures themselves.
    pub fn is_nested_entry(&self) -> bool {
        matches!(
            self,
            RecordKind::Job
                | RecordKind::Skill
                | RecordKind::Population
                | RecordKind::Expertise
                | RecordKind::WorkedField
                | RecordKind::Production
                | RecordKind::Orders
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown record kind: {}", s))
    }
}

/// A flat, typed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    fields: Fields,
}

impl Record {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: Fields::new(),
        }
    }

    pub fn from_fields(kind: RecordKind, fields: Fields) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Set `name` when `value` is present; leave it absent otherwise.
    pub fn set_opt<V: Into<FieldValue>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in RecordKind::all() {
            assert_eq!(kind.as_str().parse::<RecordKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_order_puts_header_first_and_nested_entries_last() {
        assert_eq!(RecordKind::Map.order(), 0);
        assert!(RecordKind::Fixture(FixtureKind::Unit).order() < RecordKind::Job.order());
        assert!(RecordKind::Job.order() < RecordKind::Skill.order());
    }

    #[test]
    fn test_set_opt_leaves_absent_fields_absent() {
        let mut record = Record::new(RecordKind::Player);
        record.set_opt::<String>("portrait", None);
        record.set_opt("country", Some("Avalon"));
        assert!(record.get("portrait").is_none());
        assert_eq!(record.get("country"), Some(&FieldValue::Text("Avalon".into())));
    }
}
