//! The naive nested rendering: greedy output, slot budget and warm start.

use squish_schema::{Schema, Table};

/// A parenthesis token inside a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    /// `(` — opens a context below the slot's identifier.
    Open,
    /// `)` — closes the innermost context.
    Close,
}

/// One position of the output's abstract sequence.
///
/// A slot holds at most one identifier plus at most one parenthesis;
/// trailing slots may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// The identifier emitted at this position, if any.
    pub ident: Option<String>,
    /// The parenthesis emitted at this position, if any.
    pub paren: Option<Paren>,
}

impl Slot {
    fn ident(ident: String) -> Self {
        Self {
            ident: Some(ident),
            paren: None,
        }
    }

    fn paren(paren: Paren) -> Self {
        Self {
            ident: None,
            paren: Some(paren),
        }
    }

    /// Returns `true` if the slot carries neither identifier nor parenthesis.
    pub fn is_empty(&self) -> bool {
        self.ident.is_none() && self.paren.is_none()
    }
}

/// Appends a parenthesis, attaching it to the preceding identifier slot when
/// that slot has no parenthesis yet; otherwise it occupies its own slot.
fn push_paren(slots: &mut Vec<Slot>, paren: Paren) {
    match slots.last_mut() {
        Some(last) if last.ident.is_some() && last.paren.is_none() => last.paren = Some(paren),
        _ => slots.push(Slot::paren(paren)),
    }
}

/// Naive slot sequence for one table under the ambient schema's identifier
/// rules: `table t` `(` column `(` annotations `)` … `)`.
pub fn naive_table_slots(schema: &Schema, table: &Table) -> Vec<Slot> {
    let mut slots = Vec::new();
    slots.push(Slot::ident(table.predicate()));
    push_paren(&mut slots, Paren::Open);
    for column in &table.columns {
        slots.push(Slot::ident(schema.column_ident(&table.name, column)));
        push_paren(&mut slots, Paren::Open);
        for annotation in &column.annotations {
            slots.push(Slot::ident(annotation.clone()));
        }
        push_paren(&mut slots, Paren::Close);
    }
    push_paren(&mut slots, Paren::Close);
    slots
}

/// Naive slot sequence for a whole schema, table after table.
///
/// Its length is the slot budget of the optimizer: the naive rendering is a
/// feasible encoding, so no optimal encoding needs more slots.
pub fn naive_slots(schema: &Schema) -> Vec<Slot> {
    let mut slots = Vec::new();
    for table in &schema.tables {
        slots.extend(naive_table_slots(schema, table));
    }
    slots
}

/// Joins slots into display text.
///
/// A space separates two slots exactly when the earlier one ends with a
/// bare identifier and the later one starts with an identifier; parentheses
/// bind tightly to their slot. Stray ` )` sequences are collapsed and
/// trailing whitespace is trimmed.
pub fn join_slots(slots: &[Slot]) -> String {
    let mut out = String::new();
    let mut bare_ident = false;
    for slot in slots {
        if let Some(ident) = &slot.ident {
            if bare_ident {
                out.push(' ');
            }
            out.push_str(ident);
        }
        match slot.paren {
            Some(Paren::Open) => out.push('('),
            Some(Paren::Close) => out.push(')'),
            None => {}
        }
        if slot.is_empty() {
            out.push(' ');
        }
        bare_ident = slot.ident.is_some() && slot.paren.is_none();
    }
    out.replace(" )", ")").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use squish_schema::{Column, PrimaryKey, Table};

    use super::*;

    #[test]
    fn smallest_schema_renders_nested() {
        let schema = Schema::new(
            vec![Table::new("t", vec![Column::new("c", "int")])],
            vec![],
            vec![],
        );
        let slots = naive_slots(&schema);
        assert_eq!(slots.len(), 4);
        assert_eq!(join_slots(&slots), "table t(c(int))");
    }

    #[test]
    fn annotations_share_a_context() {
        let schema = Schema::new(
            vec![Table::new(
                "u",
                vec![Column::new("k", "int"), Column::new("v", "text")],
            )],
            vec![PrimaryKey::new("u", vec!["k".to_string()])],
            vec![],
        );
        let slots = naive_slots(&schema);
        assert_eq!(join_slots(&slots), "table u(k(int primary key)v(text))");
        // table u( | k( | int | primary key) | v( | text) | )
        assert_eq!(slots.len(), 7);
    }

    #[test]
    fn consecutive_closes_get_own_slots() {
        let schema = Schema::new(
            vec![Table::new("t", vec![Column::new("c", "int")])],
            vec![],
            vec![],
        );
        let slots = naive_slots(&schema);
        let last = slots.last().unwrap();
        assert_eq!(last.ident, None);
        assert_eq!(last.paren, Some(Paren::Close));
    }

    #[test]
    fn tables_follow_each_other() {
        let schema = Schema::new(
            vec![
                Table::new("a", vec![Column::new("x", "int")]),
                Table::new("b", vec![Column::new("y", "int")]),
            ],
            vec![],
            vec![],
        );
        assert_eq!(
            join_slots(&naive_slots(&schema)),
            "table a(x(int))table b(y(int))"
        );
    }

    #[test]
    fn qualified_names_reach_the_rendering() {
        let schema = Schema::new(
            vec![
                Table::new("t1", vec![Column::new("name", "text")]),
                Table::new("t2", vec![Column::new("name", "text")]),
            ],
            vec![],
            vec![],
        );
        let text = join_slots(&naive_slots(&schema));
        assert!(text.contains("t1.name("));
        assert!(text.contains("t2.name("));
    }

    #[test]
    fn empty_trailing_slots_vanish() {
        let slots = vec![
            Slot::ident("table t".into()),
            Slot {
                ident: None,
                paren: None,
            },
        ];
        assert_eq!(join_slots(&slots), "table t");
    }
}
