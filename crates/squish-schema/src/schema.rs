//! The schema value: tables plus residual key constraints, and everything
//! the compressor derives from them.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use squish_token::Tokenizer;
use tracing::warn;

use crate::column::Column;
use crate::fact::{Fact, FactSet};
use crate::key::{ForeignKey, PrimaryKey};
use crate::prefix;
use crate::table::Table;
use crate::{Result, SchemaError};

/// A relational schema: ordered tables plus residual multi-column keys.
///
/// Construction absorbs single-column keys into column annotations
/// (`primary key`, `foreign key references t(c)`); only multi-column keys
/// remain as constraint values. A bare-column-name frequency map is built
/// once at construction and drives the `t.c` qualification rule; per-table
/// splits inherit it so identifiers render identically either way.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
    /// Residual multi-column primary keys.
    pub pkeys: Vec<PrimaryKey>,
    /// Residual multi-column foreign keys.
    pub fkeys: Vec<ForeignKey>,
    #[serde(skip)]
    name_counts: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema, absorbing single-column keys as annotations.
    pub fn new(tables: Vec<Table>, pkeys: Vec<PrimaryKey>, fkeys: Vec<ForeignKey>) -> Self {
        let mut schema = Self {
            tables,
            pkeys: Vec::new(),
            fkeys: Vec::new(),
            name_counts: HashMap::new(),
        };

        for pk in pkeys {
            match pk.columns.as_slice() {
                [column] => {
                    let column = column.clone();
                    schema.annotate_column(&pk.table, &column, "primary key".to_string());
                }
                _ => schema.pkeys.push(pk),
            }
        }
        for fk in fkeys {
            if fk.from_columns.len() == 1 && fk.to_columns.len() == 1 {
                let annotation = fk.annotation();
                let column = fk.from_columns[0].clone();
                schema.annotate_column(&fk.from_table, &column, annotation);
            } else {
                schema.fkeys.push(fk);
            }
        }

        schema.name_counts = bare_name_counts(&schema.tables);
        schema
    }

    /// Appends an annotation to the named column, if it exists.
    fn annotate_column(&mut self, table: &str, column: &str, annotation: String) {
        let target = self
            .tables
            .iter_mut()
            .find(|t| t.name == table)
            .and_then(|t| t.columns.iter_mut().find(|c| c.name == column));
        match target {
            Some(col) => col.push_annotation(annotation),
            None => warn!(table, column, "key constraint references unknown column"),
        }
    }

    /// How often the bare column name occurs across all tables.
    pub fn name_count(&self, name: &str) -> usize {
        self.name_counts.get(name).copied().unwrap_or(0)
    }

    /// The identifier under which a column appears in compressed output:
    /// `table.column` when the bare name is ambiguous across tables,
    /// the bare name otherwise.
    pub fn column_ident(&self, table_name: &str, column: &Column) -> String {
        if self.name_count(&column.name) > 1 {
            format!("{}.{}", table_name, column.name)
        } else {
            column.name.clone()
        }
    }

    /// Distinct annotations in first-appearance order.
    pub fn annotations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for table in &self.tables {
            for column in &table.columns {
                for annotation in &column.annotations {
                    if seen.insert(annotation.clone()) {
                        out.push(annotation.clone());
                    }
                }
            }
        }
        out
    }

    /// All strings usable as identifiers: table predicates, column
    /// identifiers, then distinct annotations.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for table in &self.tables {
            ids.push(table.predicate());
        }
        for table in &self.tables {
            for column in &table.columns {
                ids.push(self.column_ident(&table.name, column));
            }
        }
        ids.extend(self.annotations());
        ids
    }

    /// Derives the true/false fact partition.
    ///
    /// Membership facts pair every column with every table predicate (true
    /// only for the owner); property facts pair every column with every
    /// distinct annotation (true only for declared ones).
    pub fn facts(&self) -> FactSet {
        let annotations = self.annotations();
        let mut facts = FactSet::default();
        let mut seen = HashSet::new();

        for owner in &self.tables {
            for column in &owner.columns {
                let ident = self.column_ident(&owner.name, column);

                for table in &self.tables {
                    let fact = Fact::new(table.predicate(), ident.clone());
                    if seen.insert(fact.clone()) {
                        if table.name == owner.name {
                            facts.true_facts.push(fact);
                        } else {
                            facts.false_facts.push(fact);
                        }
                    }
                }

                let declared: HashSet<&str> =
                    column.annotations.iter().map(String::as_str).collect();
                for annotation in &annotations {
                    let fact = Fact::new(ident.clone(), annotation.clone());
                    if seen.insert(fact.clone()) {
                        if declared.contains(annotation.as_str()) {
                            facts.true_facts.push(fact);
                        } else {
                            facts.false_facts.push(fact);
                        }
                    }
                }
            }
        }
        facts
    }

    /// Merges columns with identical type and annotations within each table.
    ///
    /// The bare-name frequency map is extended with the synthetic `[a b c]`
    /// group names; entries for original names are kept so that ambiguity
    /// decisions made before the merge stay stable.
    pub fn merge_columns(&mut self) {
        for table in &mut self.tables {
            table.merge_columns();
        }
        let mut merged_counts: HashMap<&str, usize> = HashMap::new();
        for table in &self.tables {
            for column in &table.columns {
                if column.merged {
                    *merged_counts.entry(column.name.as_str()).or_insert(0) += 1;
                }
            }
        }
        for (name, count) in merged_counts {
            self.name_counts.insert(name.to_string(), count);
        }
    }

    /// Splits the schema into one single-table schema per table.
    ///
    /// Fails while multi-column keys remain: such constraints cannot be
    /// attributed to one table's compression. Children inherit the parent's
    /// name frequency map, so qualification survives the split.
    pub fn split(&self) -> Result<Vec<Schema>> {
        if !self.pkeys.is_empty() || !self.fkeys.is_empty() {
            return Err(SchemaError::ResidualKeys {
                pkeys: self.pkeys.len(),
                fkeys: self.fkeys.len(),
            });
        }
        Ok(self
            .tables
            .iter()
            .map(|table| Schema {
                tables: vec![table.clone()],
                pkeys: Vec::new(),
                fkeys: Vec::new(),
                name_counts: self.name_counts.clone(),
            })
            .collect())
    }

    /// Candidate shortcut prefixes over table names, column names and
    /// annotations, most frequent first.
    ///
    /// Call before [`Schema::merge_columns`]: synthetic group names dilute
    /// the statistics.
    pub fn prefixes(&self, tokenizer: &dyn Tokenizer) -> Result<Vec<String>> {
        let mut names: Vec<&str> = Vec::new();
        for table in &self.tables {
            names.push(&table.name);
        }
        for table in &self.tables {
            for column in &table.columns {
                names.push(&column.name);
            }
        }
        for table in &self.tables {
            for column in &table.columns {
                for annotation in &column.annotations {
                    names.push(annotation);
                }
            }
        }
        prefix::prefix_candidates(&names, tokenizer)
    }

    /// Uncompressed text rendering, one `name(col:type,…)` line per table.
    pub fn text(&self) -> String {
        let lines: Vec<String> = self.tables.iter().map(Table::text).collect();
        lines.join("\n")
    }

    /// Returns `true` if the schema yields no identifiers at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Counts bare column names across all tables.
fn bare_name_counts(tables: &[Table]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for table in tables {
        for column in &table.columns {
            *counts.entry(column.name.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn single_table() -> Schema {
        // create table t(c int)
        Schema::new(
            vec![Table::new("t", vec![Column::new("c", "int")])],
            vec![],
            vec![],
        )
    }

    #[test]
    fn identifiers_order_tables_columns_annotations() {
        let schema = single_table();
        assert_eq!(schema.identifiers(), vec!["table t", "c", "int"]);
    }

    #[test]
    fn smallest_schema_facts() {
        let schema = single_table();
        let facts = schema.facts();
        assert_eq!(
            facts.true_facts,
            vec![Fact::new("table t", "c"), Fact::new("c", "int")]
        );
        assert!(facts.false_facts.is_empty());
    }

    #[test]
    fn single_column_primary_key_is_absorbed() {
        // create table u(k int primary key, v text)
        let schema = Schema::new(
            vec![Table::new(
                "u",
                vec![Column::new("k", "int"), Column::new("v", "text")],
            )],
            vec![PrimaryKey::new("u", vec!["k".to_string()])],
            vec![],
        );
        assert!(schema.pkeys.is_empty());
        let k = &schema.tables[0].columns[0];
        assert_eq!(k.annotations, vec!["int", "primary key"]);

        let facts = schema.facts();
        for expected in [
            Fact::new("table u", "k"),
            Fact::new("table u", "v"),
            Fact::new("k", "int"),
            Fact::new("k", "primary key"),
            Fact::new("v", "text"),
        ] {
            assert!(facts.true_facts.contains(&expected), "missing {expected}");
        }
        // k is not text, v is neither int nor a key.
        for excluded in [
            Fact::new("k", "text"),
            Fact::new("v", "int"),
            Fact::new("v", "primary key"),
        ] {
            assert!(facts.false_facts.contains(&excluded), "missing {excluded}");
        }
    }

    #[test]
    fn single_column_foreign_key_is_absorbed() {
        // create table o(id int primary key); create table l(oid int references o(id))
        let schema = Schema::new(
            vec![
                Table::new("o", vec![Column::new("id", "int")]),
                Table::new("l", vec![Column::new("oid", "int")]),
            ],
            vec![PrimaryKey::new("o", vec!["id".to_string()])],
            vec![ForeignKey::new(
                "l",
                vec!["oid".to_string()],
                "o",
                vec!["id".to_string()],
            )],
        );
        assert!(schema.fkeys.is_empty());
        let oid = &schema.tables[1].columns[0];
        assert_eq!(
            oid.annotations,
            vec!["int", "foreign key references o(id)"]
        );
    }

    #[test]
    fn multi_column_keys_are_kept_and_block_split() {
        let schema = Schema::new(
            vec![
                Table::new(
                    "m",
                    vec![Column::new("a", "int"), Column::new("b", "int")],
                ),
                Table::new("n", vec![Column::new("c", "int")]),
            ],
            vec![PrimaryKey::new(
                "m",
                vec!["a".to_string(), "b".to_string()],
            )],
            vec![],
        );
        assert_eq!(schema.pkeys.len(), 1);
        assert!(matches!(
            schema.split(),
            Err(SchemaError::ResidualKeys { pkeys: 1, fkeys: 0 })
        ));
    }

    #[test]
    fn ambiguous_columns_are_qualified() {
        let schema = Schema::new(
            vec![
                Table::new("t1", vec![Column::new("name", "text")]),
                Table::new("t2", vec![Column::new("name", "text")]),
            ],
            vec![],
            vec![],
        );
        let ids = schema.identifiers();
        assert!(ids.contains(&"t1.name".to_string()));
        assert!(ids.contains(&"t2.name".to_string()));
        assert!(!ids.contains(&"name".to_string()));
    }

    #[test]
    fn split_children_inherit_qualification() {
        let schema = Schema::new(
            vec![
                Table::new("t1", vec![Column::new("name", "text")]),
                Table::new("t2", vec![Column::new("name", "text")]),
            ],
            vec![],
            vec![],
        );
        let parts = schema.split().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].identifiers(), vec!["table t1", "t1.name", "text"]);
        assert_eq!(parts[1].identifiers(), vec!["table t2", "t2.name", "text"]);
    }

    #[test]
    fn merge_groups_columns_and_extends_counts() {
        let mut col_a = Column::new("a", "int");
        col_a.push_annotation("not null");
        let mut col_b = Column::new("b", "int");
        col_b.push_annotation("not null");
        let mut col_c = Column::new("c", "int");
        col_c.push_annotation("not null");
        let mut schema = Schema::new(
            vec![Table::new("t", vec![col_a, col_b, col_c])],
            vec![],
            vec![],
        );
        schema.merge_columns();
        assert_eq!(schema.tables[0].columns.len(), 1);
        assert_eq!(schema.tables[0].columns[0].name, "[a b c]");
        assert_eq!(schema.name_count("[a b c]"), 1);
        // Original names stay counted.
        assert_eq!(schema.name_count("a"), 1);
        assert_eq!(
            schema.identifiers(),
            vec!["table t", "[a b c]", "int", "not null"]
        );
    }

    #[test]
    fn merge_is_idempotent_at_schema_level() {
        let mut schema = Schema::new(
            vec![Table::new(
                "t",
                vec![Column::new("a", "int"), Column::new("b", "int")],
            )],
            vec![],
            vec![],
        );
        schema.merge_columns();
        let once_ids = schema.identifiers();
        let once_facts = schema.facts();
        schema.merge_columns();
        assert_eq!(schema.identifiers(), once_ids);
        assert_eq!(schema.facts().true_facts, once_facts.true_facts);
    }

    #[test]
    fn text_renders_name_colon_type() {
        let schema = Schema::new(
            vec![
                Table::new("t", vec![Column::new("c", "int")]),
                Table::new("u", vec![Column::new("v", "text")]),
            ],
            vec![],
            vec![],
        );
        assert_eq!(schema.text(), "t(c:int)\nu(v:text)");
    }
}
