//! Error types for store operations.

/// Relational store errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert named a column the table does not have.
    ///
    /// Tables written by an older release lack the optional columns added
    /// since; the writer recovers from this one by adding the column.
    #[error("Table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn missing_column(table: impl ToString, column: impl ToString) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}
