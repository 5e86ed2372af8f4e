//! Primary and foreign key constraints.
//!
//! Only multi-column keys survive as standalone values: single-column keys
//! are absorbed into column annotations during [`Schema`](crate::Schema)
//! construction.

use serde::Serialize;

/// A primary key constraint over one or more columns of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    /// Owning table.
    pub table: String,
    /// Key columns in declaration order.
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Creates a primary key constraint.
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }
}

/// A foreign key constraint from one table's columns to another's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Referencing table.
    pub from_table: String,
    /// Referencing columns.
    pub from_columns: Vec<String>,
    /// Referenced table.
    pub to_table: String,
    /// Referenced columns.
    pub to_columns: Vec<String>,
}

impl ForeignKey {
    /// Creates a foreign key constraint.
    pub fn new(
        from_table: impl Into<String>,
        from_columns: Vec<String>,
        to_table: impl Into<String>,
        to_columns: Vec<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_columns,
            to_table: to_table.into(),
            to_columns,
        }
    }

    /// The annotation text absorbed into a single referencing column.
    pub fn annotation(&self) -> String {
        let to_columns = self.to_columns.join(", ");
        format!("foreign key references {}({})", self.to_table, to_columns)
    }
}
