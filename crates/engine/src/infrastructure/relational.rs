//! The relational map format: one table per record kind.
//!
//! Writing replaces the map's previous contents. A table created by an older
//! release may lack optional columns added since; the first insert that needs
//! one adds every optional column the table lacks and is retried once.

use std::collections::HashSet;

use mapkeep_domain::MapGrid;

use crate::infrastructure::ports::{RelationalStore, StoreError};
use crate::records::flatten::flatten;
use crate::records::{schema, Record, RecordKind};

/// Writes records into a store, preparing each table once per session.
pub struct RelationalWriter<'s, S: RelationalStore + ?Sized> {
    store: &'s mut S,
    ready: HashSet<RecordKind>,
}

impl<'s, S: RelationalStore + ?Sized> RelationalWriter<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            ready: HashSet::new(),
        }
    }

    /// Create the kind's table if needed and empty it; a no-op after the
    /// first call for a kind.
    pub fn ensure_table(&mut self, kind: RecordKind) -> Result<(), StoreError> {
        if self.ready.contains(&kind) {
            return Ok(());
        }
        let table = kind.as_str();
        self.store.create_table(table, &schema::columns(kind))?;
        self.store.clear_table(table)?;
        self.ready.insert(kind);
        Ok(())
    }

    pub fn write(&mut self, record: &Record) -> Result<(), StoreError> {
        let kind = record.kind();
        self.ensure_table(kind)?;
        let table = kind.as_str();
        let missing = match self.store.insert(table, record.fields()) {
            Err(StoreError::MissingColumn { column, .. }) => column,
            other => return other,
        };
        if !schema::column(kind, &missing).is_some_and(|c| c.optional) {
            return Err(StoreError::missing_column(table, missing));
        }
        let existing: HashSet<String> = self.store.columns(table)?.into_iter().collect();
        for definition in schema::columns(kind)
            .into_iter()
            .filter(|c| c.optional && !existing.contains(c.name))
        {
            tracing::info!(table, column = definition.name, "Adding column missing from older table");
            self.store.add_column(table, &definition)?;
        }
        self.store.insert(table, record.fields())
    }
}

/// Replace the store's contents with `map`, in one transaction.
pub fn write_map<S: RelationalStore + ?Sized>(store: &mut S, map: &MapGrid) -> Result<(), StoreError> {
    let records = flatten(map);
    store.begin()?;
    let mut writer = RelationalWriter::new(store);
    for kind in RecordKind::all() {
        writer.ensure_table(kind)?;
    }
    for record in &records {
        writer.write(record)?;
    }
    store.commit()?;
    tracing::debug!(records = records.len(), "Wrote relational map");
    Ok(())
}

/// Every record in the store, kind by kind in [`RecordKind::order`].
///
/// A table that does not exist contributes no records.
pub fn read_records<S: RelationalStore + ?Sized>(store: &mut S) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    for kind in RecordKind::all() {
        let table = kind.as_str();
        if !store.table_exists(table)? {
            tracing::debug!(table, "No table; reading no records");
            continue;
        }
        records.extend(
            store
                .select_all(table)?
                .into_iter()
                .map(|row| Record::from_fields(kind, row)),
        );
    }
    Ok(records)
}
