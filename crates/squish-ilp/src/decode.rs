//! Turns a solved assignment back into output text.

use squish_milp::Assignment;

use crate::builder::BuiltModel;
use crate::seed::{Slot, join_slots};

impl BuiltModel {
    /// Emits the preamble (one sentence per introduced shortcut) followed by
    /// the body: per slot, the written form of the emitted identifier and
    /// the active parenthesis.
    pub fn decode(&self, assignment: &Assignment) -> String {
        let mut out = String::new();
        for s in self.introduced(assignment) {
            if let Some(sentence) = self.shortcuts().introduction(s) {
                out.push_str(&sentence);
            }
        }

        let slots: Vec<Slot> = (0..self.max_length())
            .map(|p| Slot {
                ident: self.written_form(assignment, p),
                paren: self.paren_at(assignment, p),
            })
            .collect();
        out.push_str(&join_slots(&slots));
        out.trim_end().to_string()
    }
}

/// Undoes the preamble substitutions of a decoded text.
///
/// Reads `"<placeholder> substitutes <substring> "` sentences off the front
/// and replaces every placeholder occurrence in the remaining body with its
/// substring. This is the contract a reader of the compressed text relies
/// on; tests use it to check fact completeness through shortcuts.
pub fn expand_shortcuts(text: &str) -> String {
    let mut rest = text;
    let mut pairs: Vec<(String, String)> = Vec::new();
    loop {
        let Some(mid) = rest.find(" substitutes ") else {
            break;
        };
        let placeholder = &rest[..mid];
        if placeholder.is_empty() || placeholder.contains(['(', ')', ' ']) {
            break;
        }
        let after = &rest[mid + " substitutes ".len()..];
        let Some(end) = after.find(' ') else { break };
        pairs.push((placeholder.to_string(), after[..end].to_string()));
        rest = &after[end + 1..];
    }

    let mut body = rest.to_string();
    // Placeholders from the fixed pool never contain one another, so the
    // replacement order does not matter.
    for (placeholder, substring) in &pairs {
        body = body.replace(placeholder, substring);
    }
    body
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use squish_config::CompressOptions;
    use squish_schema::{Column, Schema, Table};
    use squish_token::ApproxTokenizer;

    use crate::builder::IlpBuilder;
    use crate::shortcut::{ShortcutMap, propose_shortcuts};

    fn options() -> CompressOptions {
        CompressOptions {
            split: false,
            ..CompressOptions::default()
        }
    }

    #[test]
    fn seed_decodes_to_greedy_text() {
        let schema = Schema::new(
            vec![Table::new("t", vec![Column::new("c", "int")])],
            vec![],
            vec![],
        );
        let tok = ApproxTokenizer::new();
        let shortcuts = ShortcutMap::default();
        let built = IlpBuilder::new(&schema, &shortcuts, &tok, &options())
            .build()
            .unwrap();
        let seed = built.seed_assignment();
        assert_eq!(built.decode(&seed), "table t(c(int))");
    }

    #[test]
    fn introduced_shortcut_is_substituted_and_announced() {
        let columns = vec![
            Column::new("buildUpPlaySpeed", "int"),
            Column::new("buildUpPlayPassing", "int"),
            Column::new("buildUpPlayDribbling", "int"),
        ];
        let schema = Schema::new(vec![Table::new("team", columns)], vec![], vec![]);
        let tok = ApproxTokenizer::new();
        let shortcuts = propose_shortcuts(&schema, &tok).unwrap();
        assert_eq!(shortcuts.get(0).unwrap().substring, "buildUpPlay");

        let built = IlpBuilder::new(&schema, &shortcuts, &tok, &options())
            .build()
            .unwrap();
        let mut assignment = built.seed_assignment();

        // Rewrite the first column's slot to use the shortcut form.
        let t = built.id_of("buildUpPlaySpeed").unwrap();
        let p = (0..built.max_length())
            .find(|&p| built.emitted(&assignment, p) == Some(t))
            .unwrap();
        let shortcut_choice = built
            .rep_choices_of(t)
            .iter()
            .position(|c| *c == Some(0))
            .unwrap();
        assignment.set(built.rep_var_id(p, t, 0), 0.0);
        assignment.set(built.rep_var_id(p, t, shortcut_choice), 1.0);
        assignment.set(built.u_var_id(0), 1.0);

        let text = built.decode(&assignment);
        assert!(text.starts_with("PA substitutes buildUpPlay "));
        assert!(text.contains("PASpeed("));
        // The other columns still use their full forms.
        assert!(text.contains("buildUpPlayPassing("));
    }

    #[test]
    fn expand_reverses_the_preamble() {
        let text = "PA substitutes buildUpPlay table team(PASpeed(int)PAPassing(int))";
        assert_eq!(
            super::expand_shortcuts(text),
            "table team(buildUpPlaySpeed(int)buildUpPlayPassing(int))"
        );
    }

    #[test]
    fn expand_without_preamble_is_identity() {
        let text = "table t(c(int))";
        assert_eq!(super::expand_shortcuts(text), text);
    }

    #[test]
    fn expand_handles_two_shortcuts() {
        let text = "PA substitutes player_ PB substitutes overall_ \
                    table p(PAid(int)PBrating(int))";
        assert_eq!(
            super::expand_shortcuts(text),
            "table p(player_id(int)overall_rating(int))"
        );
    }

    #[test]
    fn decode_without_parens_or_idents_is_empty() {
        let schema = Schema::new(
            vec![Table::new("t", vec![Column::new("c", "int")])],
            vec![],
            vec![],
        );
        let tok = ApproxTokenizer::new();
        let shortcuts = ShortcutMap::default();
        let built = IlpBuilder::new(&schema, &shortcuts, &tok, &options())
            .build()
            .unwrap();
        let empty = squish_milp::Assignment::zeros(built.model.num_vars());
        assert_eq!(built.decode(&empty), "");
    }
}
