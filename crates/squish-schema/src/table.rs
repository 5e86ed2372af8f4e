//! Tables: named, ordered lists of columns.

use serde::Serialize;

use crate::column::Column;

/// A table with its columns in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table from a name and columns.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// The identifier under which this table appears in compressed output.
    ///
    /// The `table ` prefix disambiguates the table from a column of the same
    /// name: a context opened by `table t` states membership, a context
    /// opened by a bare name states column properties.
    pub fn predicate(&self) -> String {
        format!("table {}", self.name)
    }

    /// Uncompressed `name(col:type,…)` rendering.
    pub fn text(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(Column::text).collect();
        format!("{}({})", self.name, columns.join(","))
    }

    /// Partitions columns by `(type, annotations)` and replaces each group of
    /// size > 1 with a single merged column named `[a b c]`.
    ///
    /// First-appearance order is preserved across groups. Calling this twice
    /// is a no-op the second time: after one pass all remaining columns have
    /// pairwise distinct keys.
    pub fn merge_columns(&mut self) {
        let mut groups: Vec<(Vec<usize>, &Column)> = Vec::new();
        for (idx, col) in self.columns.iter().enumerate() {
            match groups.iter_mut().find(|(_, head)| {
                head.data_type == col.data_type && head.annotations == col.annotations
            }) {
                Some((members, _)) => members.push(idx),
                None => groups.push((vec![idx], col)),
            }
        }

        let mut merged = Vec::with_capacity(groups.len());
        for (members, head) in groups {
            if members.len() == 1 {
                merged.push(self.columns[members[0]].clone());
            } else {
                let names: Vec<&str> = members
                    .iter()
                    .map(|&i| self.columns[i].name.as_str())
                    .collect();
                merged.push(Column {
                    name: format!("[{}]", names.join(" ")),
                    data_type: head.data_type.clone(),
                    annotations: head.annotations.clone(),
                    merged: true,
                });
            }
        }
        self.columns = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_null(name: &str) -> Column {
        let mut col = Column::new(name, "int");
        col.push_annotation("not null");
        col
    }

    #[test]
    fn predicate_prefixes_table() {
        let t = Table::new("singer", vec![]);
        assert_eq!(t.predicate(), "table singer");
    }

    #[test]
    fn merge_groups_equal_annotations() {
        let mut t = Table::new(
            "t",
            vec![not_null("a"), not_null("b"), Column::new("d", "text"), not_null("c")],
        );
        t.merge_columns();
        assert_eq!(t.columns.len(), 2);
        assert_eq!(t.columns[0].name, "[a b c]");
        assert!(t.columns[0].merged);
        assert_eq!(t.columns[0].annotations, vec!["int", "not null"]);
        assert_eq!(t.columns[1].name, "d");
        assert!(!t.columns[1].merged);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut t = Table::new("t", vec![not_null("a"), not_null("b"), not_null("c")]);
        t.merge_columns();
        let once = t.clone();
        t.merge_columns();
        assert_eq!(t, once);
    }

    #[test]
    fn singleton_groups_keep_their_column() {
        let mut t = Table::new("t", vec![Column::new("a", "int"), Column::new("b", "text")]);
        t.merge_columns();
        assert_eq!(t.columns.len(), 2);
        assert!(!t.columns[0].merged);
    }
}
