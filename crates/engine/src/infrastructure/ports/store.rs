//! Relational store port.

use crate::records::schema::Column;
use crate::records::Fields;

use super::error::StoreError;

/// One table row: column name to value. NULL columns have no entry.
pub type Row = Fields;

/// Minimal table-per-kind storage the relational map format is written to.
///
/// Implementations own one open database. Tables and columns are named by the
/// caller; rows come back from [`RelationalStore::select_all`] in insertion
/// order.
#[cfg_attr(test, mockall::automock)]
pub trait RelationalStore {
    fn table_exists(&mut self, table: &str) -> Result<bool, StoreError>;

    /// Create `table` with `columns` unless it already exists.
    fn create_table(&mut self, table: &str, columns: &[Column]) -> Result<(), StoreError>;

    /// Delete every row of `table`.
    fn clear_table(&mut self, table: &str) -> Result<(), StoreError>;

    /// Names of the columns `table` currently has.
    fn columns(&mut self, table: &str) -> Result<Vec<String>, StoreError>;

    fn add_column(&mut self, table: &str, column: &Column) -> Result<(), StoreError>;

    /// Insert one row. A column the table lacks is reported as
    /// [`StoreError::MissingColumn`].
    fn insert(&mut self, table: &str, row: &Row) -> Result<(), StoreError>;

    fn select_all(&mut self, table: &str) -> Result<Vec<Row>, StoreError>;

    fn begin(&mut self) -> Result<(), StoreError>;

    fn commit(&mut self) -> Result<(), StoreError>;
}
