//! SQL DDL → [`Schema`] adapter.
//!
//! Only `CREATE TABLE` statements contribute to the schema; anything else
//! in the script (inserts, indexes, comments) is skipped. Column types and
//! constraints become ordered annotation strings — the type first — and
//! key constraints are routed through [`Schema::new`] so that single-column
//! keys are absorbed the same way no matter whether they were written
//! inline or at table level.

pub mod spider;

use sqlparser::ast::{ColumnOption, CreateTable, Ident, Statement, TableConstraint};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use squish_schema::{Column, ForeignKey, PrimaryKey, Schema, Table};

pub use spider::{parse_spider_db, parse_spider_file};

/// Errors that can occur while parsing schema inputs.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The SQL text could not be parsed at all.
    #[error("failed to parse DDL: {0}")]
    Sql(#[from] sqlparser::parser::ParserError),

    /// A Spider `tables.json` could not be deserialized.
    #[error("failed to parse Spider tables.json: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested database is not in the Spider file.
    #[error("database '{db_id}' not found in Spider tables.json")]
    UnknownDatabase {
        /// The id that was looked up.
        db_id: String,
    },

    /// A Spider entry references indices that do not exist.
    #[error("malformed Spider entry '{db_id}': {detail} out of range")]
    MalformedSpider {
        /// The offending database id.
        db_id: String,
        /// Which reference was out of range.
        detail: String,
    },
}

/// A specialized `Result` type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses `CREATE TABLE` statements into a schema.
pub fn parse_ddl(sql: &str) -> Result<Schema> {
    let dialect = GenericDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut tables = Vec::new();
    let mut pkeys = Vec::new();
    let mut fkeys = Vec::new();
    for statement in statements {
        match statement {
            Statement::CreateTable(create) => {
                convert_table(create, &mut tables, &mut pkeys, &mut fkeys);
            }
            _ => debug!("skipping non-CREATE TABLE statement"),
        }
    }
    Ok(Schema::new(tables, pkeys, fkeys))
}

fn idents(columns: &[Ident]) -> Vec<String> {
    columns.iter().map(|ident| ident.value.clone()).collect()
}

/// Converts one `CREATE TABLE` into a table plus its key constraints.
fn convert_table(
    create: CreateTable,
    tables: &mut Vec<Table>,
    pkeys: &mut Vec<PrimaryKey>,
    fkeys: &mut Vec<ForeignKey>,
) {
    let table_name = create.name.to_string();

    let mut columns = Vec::with_capacity(create.columns.len());
    for column_def in create.columns {
        let data_type = column_def.data_type.to_string().to_lowercase();
        let mut column = Column::new(column_def.name.value, data_type);

        for option_def in column_def.options {
            match option_def.option {
                ColumnOption::NotNull => column.push_annotation("not null"),
                ColumnOption::Null => {}
                ColumnOption::Unique {
                    is_primary: true, ..
                } => pkeys.push(PrimaryKey::new(&table_name, vec![column.name.clone()])),
                ColumnOption::Unique {
                    is_primary: false, ..
                } => column.push_annotation("unique"),
                ColumnOption::ForeignKey {
                    foreign_table,
                    referred_columns,
                    ..
                } => fkeys.push(ForeignKey::new(
                    &table_name,
                    vec![column.name.clone()],
                    foreign_table.to_string(),
                    idents(&referred_columns),
                )),
                ColumnOption::Default(expr) => {
                    column.push_annotation(format!("default {expr}"));
                }
                ColumnOption::Check(expr) => {
                    column.push_annotation(format!("check ({expr})"));
                }
                other => column.push_annotation(other.to_string().to_lowercase()),
            }
        }
        columns.push(column);
    }

    for constraint in create.constraints {
        match constraint {
            TableConstraint::PrimaryKey { columns, .. } => {
                pkeys.push(PrimaryKey::new(&table_name, idents(&columns)));
            }
            TableConstraint::ForeignKey {
                columns,
                foreign_table,
                referred_columns,
                ..
            } => fkeys.push(ForeignKey::new(
                &table_name,
                idents(&columns),
                foreign_table.to_string(),
                idents(&referred_columns),
            )),
            other => debug!(?other, "skipping table constraint"),
        }
    }

    tables.push(Table::new(table_name, columns));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_a_minimal_table() {
        let schema = parse_ddl("create table t(c int);").unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].name, "t");
        let c = &schema.tables[0].columns[0];
        assert_eq!(c.name, "c");
        assert_eq!(c.data_type, "int");
        assert_eq!(c.annotations, vec!["int"]);
    }

    #[test]
    fn inline_primary_key_is_absorbed_with_type_first() {
        let schema = parse_ddl("create table u(k int primary key, v text);").unwrap();
        let k = &schema.tables[0].columns[0];
        assert_eq!(k.annotations, vec!["int", "primary key"]);
        let v = &schema.tables[0].columns[1];
        assert_eq!(v.annotations, vec!["text"]);
        assert!(schema.pkeys.is_empty());
    }

    #[test]
    fn inline_references_become_an_fk_annotation() {
        let schema = parse_ddl(
            "create table o(id int primary key);
             create table l(oid int references o(id));",
        )
        .unwrap();
        let oid = &schema.tables[1].columns[0];
        assert_eq!(
            oid.annotations,
            vec!["int", "foreign key references o(id)"]
        );
        assert!(schema.fkeys.is_empty());
    }

    #[test]
    fn table_level_multi_column_keys_stay_residual() {
        let schema = parse_ddl(
            "create table m(a int, b int, primary key (a, b));
             create table n(x int, y int,
                            foreign key (x, y) references m(a, b));",
        )
        .unwrap();
        assert_eq!(schema.pkeys.len(), 1);
        assert_eq!(schema.pkeys[0].columns, vec!["a", "b"]);
        assert_eq!(schema.fkeys.len(), 1);
        assert_eq!(schema.fkeys[0].to_table, "m");
        assert!(schema.split().is_err());
    }

    #[test]
    fn not_null_and_default_become_annotations() {
        let schema =
            parse_ddl("create table t(a int not null, b int default 0);").unwrap();
        let a = &schema.tables[0].columns[0];
        assert_eq!(a.annotations, vec!["int", "not null"]);
        let b = &schema.tables[0].columns[1];
        assert_eq!(b.annotations, vec!["int", "default 0"]);
    }

    #[test]
    fn parameterized_types_are_lowercased() {
        let schema = parse_ddl("create table t(name varchar(25));").unwrap();
        let name = &schema.tables[0].columns[0];
        assert_eq!(name.data_type, "varchar(25)");
    }

    #[test]
    fn non_create_statements_are_skipped() {
        let schema = parse_ddl(
            "create table t(c int);
             insert into t values (1);",
        )
        .unwrap();
        assert_eq!(schema.tables.len(), 1);
    }

    #[test]
    fn broken_sql_is_an_error() {
        assert!(parse_ddl("create grable t(c int);").is_err());
    }
}
