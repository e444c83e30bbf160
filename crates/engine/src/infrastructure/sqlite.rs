//! SQLite-backed relational store.

use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::infrastructure::ports::{RelationalStore, Row, StoreError};
use crate::records::schema::Column;
use crate::records::FieldValue;

/// SQLite implementation of [`RelationalStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::database("open", e))?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::database("open", e))?;
        Ok(Self { conn })
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
        FieldValue::Boolean(value) => Value::Integer(i64::from(*value)),
    }
}

fn from_sql(value: ValueRef<'_>) -> Result<Option<FieldValue>, StoreError> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(FieldValue::Integer(value))),
        ValueRef::Real(value) => Ok(Some(FieldValue::Text(value.to_string()))),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| Some(FieldValue::Text(text.to_string())))
            .map_err(|e| StoreError::database("select", e)),
        ValueRef::Blob(_) => Err(StoreError::database("select", "unexpected BLOB value")),
    }
}

/// SQLite reports an unknown insert column as "table T has no column named C".
fn missing_column(table: &str, err: &rusqlite::Error) -> Option<StoreError> {
    let rusqlite::Error::SqliteFailure(_, Some(message)) = err else {
        return None;
    };
    let (_, column) = message.split_once("has no column named ")?;
    Some(StoreError::missing_column(table, column.trim()))
}

impl RelationalStore for SqliteStore {
    fn table_exists(&mut self, table: &str) -> Result<bool, StoreError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::database("table_exists", e))?;
        Ok(found.is_some())
    }

    fn create_table(&mut self, table: &str, columns: &[Column]) -> Result<(), StoreError> {
        let definitions: Vec<String> = columns
            .iter()
            .map(|column| format!("{} {}", quote(column.name), column.column_type.sql()))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote(table),
            definitions.join(", ")
        );
        self.conn
            .execute(&sql, [])
            .map_err(|e| StoreError::database("create_table", e))?;
        Ok(())
    }

    fn clear_table(&mut self, table: &str) -> Result<(), StoreError> {
        self.conn
            .execute(&format!("DELETE FROM {}", quote(table)), [])
            .map_err(|e| StoreError::database("clear_table", e))?;
        Ok(())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote(table)))
            .map_err(|e| StoreError::database("columns", e))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|e| StoreError::database("columns", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::database("columns", e))?;
        Ok(names)
    }

    fn add_column(&mut self, table: &str, column: &Column) -> Result<(), StoreError> {
        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote(table),
            quote(column.name),
            column.column_type.sql()
        );
        self.conn
            .execute(&sql, [])
            .map_err(|e| StoreError::database("add_column", e))?;
        Ok(())
    }

    fn insert(&mut self, table: &str, row: &Row) -> Result<(), StoreError> {
        let names: Vec<String> = row.keys().map(|name| quote(name)).collect();
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(table),
            names.join(", "),
            placeholders.join(", ")
        );
        self.conn
            .execute(&sql, params_from_iter(row.values().map(to_sql)))
            .map_err(|e| missing_column(table, &e).unwrap_or_else(|| StoreError::database("insert", e)))?;
        Ok(())
    }

    fn select_all(&mut self, table: &str) -> Result<Vec<Row>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote(table)))
            .map_err(|e| StoreError::database("select", e))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt
            .query([])
            .map_err(|e| StoreError::database("select", e))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(|e| StoreError::database("select", e))? {
            let mut fields = Row::new();
            for (index, name) in names.iter().enumerate() {
                let value = row
                    .get_ref(index)
                    .map_err(|e| StoreError::database("select", e))?;
                if let Some(value) = from_sql(value)? {
                    fields.insert(name.clone(), value);
                }
            }
            result.push(fields);
        }
        Ok(result)
    }

    fn begin(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| StoreError::database("begin", e))
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| StoreError::database("commit", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::schema::ColumnType;

    const NAME: Column = Column {
        name: "name",
        column_type: ColumnType::Text,
        optional: false,
    };
    const PORTRAIT: Column = Column {
        name: "portrait",
        column_type: ColumnType::Text,
        optional: true,
    };

    fn row(pairs: &[(&str, FieldValue)]) -> Row {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_unknown_column_is_reported_as_missing() {
        let mut store = SqliteStore::in_memory().expect("in-memory db");
        store.create_table("player", &[NAME]).expect("create");
        let err = store
            .insert(
                "player",
                &row(&[("name", "Ann".into()), ("portrait", "ann.png".into())]),
            )
            .expect_err("no portrait column");
        assert!(matches!(
            err,
            StoreError::MissingColumn { ref table, ref column } if table == "player" && column == "portrait"
        ));

        assert_eq!(store.columns("player").expect("columns"), vec!["name".to_string()]);
        store.add_column("player", &PORTRAIT).expect("alter");
        store
            .insert(
                "player",
                &row(&[("name", "Ann".into()), ("portrait", "ann.png".into())]),
            )
            .expect("retry succeeds");
    }

    #[test]
    fn test_rows_come_back_in_insertion_order_without_nulls() {
        let mut store = SqliteStore::in_memory().expect("in-memory db");
        assert!(!store.table_exists("player").expect("query"));
        store.create_table("player", &[NAME, PORTRAIT]).expect("create");
        assert!(store.table_exists("player").expect("query"));
        store.begin().expect("begin");
        for name in ["Cy", "Ann", "Bo"] {
            store
                .insert("player", &row(&[("name", name.into())]))
                .expect("insert");
        }
        store.commit().expect("commit");

        let rows = store.select_all("player").expect("select");
        let names: Vec<_> = rows.iter().filter_map(|r| r.get("name").cloned()).collect();
        let expected: Vec<FieldValue> = vec!["Cy".into(), "Ann".into(), "Bo".into()];
        assert_eq!(names, expected);
        assert!(rows.iter().all(|r| !r.contains_key("portrait")));

        store.clear_table("player").expect("clear");
        assert!(store.select_all("player").expect("select").is_empty());
    }
}
