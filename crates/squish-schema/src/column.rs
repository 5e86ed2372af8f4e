//! Typed table columns and their annotations.

use serde::Serialize;

/// A typed table column with an ordered list of annotations.
///
/// The column type is always mirrored as the first annotation so that the
/// type participates in fact derivation like any other column property.
/// Further annotations come from column constraints (`not null`,
/// `primary key`, `foreign key references …`, defaults, …). Duplicates are
/// possible in principle but suppressed by [`Column::push_annotation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name as written in the DDL (or a synthetic `[a b c]` group
    /// name after merging).
    pub name: String,
    /// The column type, e.g. `int`.
    pub data_type: String,
    /// Ordered annotations, starting with the type.
    pub annotations: Vec<String>,
    /// Whether this column is the result of merging several columns with
    /// identical type and annotations.
    pub merged: bool,
}

impl Column {
    /// Creates a column whose only annotation is its type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            annotations: vec![data_type.clone()],
            data_type,
            merged: false,
        }
    }

    /// Creates a column with an explicit annotation list.
    ///
    /// The caller is responsible for including the type in `annotations`
    /// (by convention as the first element).
    pub fn with_annotations(
        name: impl Into<String>,
        data_type: impl Into<String>,
        annotations: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            annotations,
            merged: false,
        }
    }

    /// Appends an annotation unless an identical one is already present.
    pub fn push_annotation(&mut self, annotation: impl Into<String>) {
        let annotation = annotation.into();
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    /// `name:type` rendering used by the uncompressed schema text.
    pub fn text(&self) -> String {
        format!("{}:{}", self.name, self.data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mirrors_type_as_annotation() {
        let col = Column::new("id", "int");
        assert_eq!(col.annotations, vec!["int"]);
        assert!(!col.merged);
    }

    #[test]
    fn push_annotation_deduplicates() {
        let mut col = Column::new("k", "int");
        col.push_annotation("primary key");
        col.push_annotation("primary key");
        assert_eq!(col.annotations, vec!["int", "primary key"]);
    }

    #[test]
    fn text_is_name_colon_type() {
        assert_eq!(Column::new("age", "bigint").text(), "age:bigint");
    }
}
