//! Spider benchmark schema reader.
//!
//! The Spider NL-to-SQL benchmark ships one `tables.json` describing all of
//! its databases; each entry lists tables, typed columns and key
//! constraints by column index. This module turns such entries into the
//! same [`Schema`] value the DDL parser produces, keys included, so every
//! downstream path behaves identically for both inputs.

use serde::Deserialize;

use squish_schema::{Column, ForeignKey, PrimaryKey, Schema, Table};

use crate::{ParseError, Result};

/// One database entry of a Spider `tables.json`.
#[derive(Debug, Deserialize)]
struct SpiderDb {
    db_id: String,
    table_names_original: Vec<String>,
    /// `[table index, column name]` pairs; index -1 marks the `*` column.
    column_names_original: Vec<(i64, String)>,
    column_types: Vec<String>,
    #[serde(default)]
    primary_keys: Vec<usize>,
    #[serde(default)]
    foreign_keys: Vec<(usize, usize)>,
}

impl SpiderDb {
    /// Name of the table owning the column at `col_idx`, plus the column name.
    fn column(&self, col_idx: usize) -> Result<(&str, &str)> {
        let (table_idx, name) = self
            .column_names_original
            .get(col_idx)
            .ok_or_else(|| malformed(&self.db_id, format!("column index {col_idx}")))?;
        let table = usize::try_from(*table_idx)
            .ok()
            .and_then(|i| self.table_names_original.get(i))
            .ok_or_else(|| malformed(&self.db_id, format!("table index {table_idx}")))?;
        Ok((table, name))
    }

    fn into_schema(self) -> Result<Schema> {
        let mut tables: Vec<Table> = self
            .table_names_original
            .iter()
            .map(|name| Table::new(name.clone(), Vec::new()))
            .collect();

        for ((table_idx, name), col_type) in self
            .column_names_original
            .iter()
            .zip(self.column_types.iter())
        {
            // Index -1 is the synthetic `*` column.
            if name == "*" {
                continue;
            }
            let table = usize::try_from(*table_idx)
                .ok()
                .and_then(|i| tables.get_mut(i))
                .ok_or_else(|| malformed(&self.db_id, format!("table index {table_idx}")))?;
            table
                .columns
                .push(Column::new(name.clone(), col_type.to_lowercase()));
        }

        let mut pkeys = Vec::new();
        for &col_idx in &self.primary_keys {
            let (table, column) = self.column(col_idx)?;
            pkeys.push(PrimaryKey::new(table, vec![column.to_string()]));
        }
        let mut fkeys = Vec::new();
        for &(from_idx, to_idx) in &self.foreign_keys {
            let (from_table, from_column) = self.column(from_idx)?;
            let (to_table, to_column) = self.column(to_idx)?;
            fkeys.push(ForeignKey::new(
                from_table,
                vec![from_column.to_string()],
                to_table,
                vec![to_column.to_string()],
            ));
        }

        Ok(Schema::new(tables, pkeys, fkeys))
    }
}

fn malformed(db_id: &str, what: String) -> ParseError {
    ParseError::MalformedSpider {
        db_id: db_id.to_string(),
        detail: what,
    }
}

/// Parses a whole `tables.json`: every database with its id, in file order.
pub fn parse_spider_file(json: &str) -> Result<Vec<(String, Schema)>> {
    let dbs: Vec<SpiderDb> = serde_json::from_str(json)?;
    let mut out = Vec::with_capacity(dbs.len());
    for db in dbs {
        let db_id = db.db_id.clone();
        out.push((db_id, db.into_schema()?));
    }
    Ok(out)
}

/// Parses one database out of a `tables.json` by its `db_id`.
pub fn parse_spider_db(json: &str, db_id: &str) -> Result<Schema> {
    let dbs: Vec<SpiderDb> = serde_json::from_str(json)?;
    let db = dbs
        .into_iter()
        .find(|db| db.db_id == db_id)
        .ok_or_else(|| ParseError::UnknownDatabase {
            db_id: db_id.to_string(),
        })?;
    db.into_schema()
}
