//! Shortcut candidates: placeholder → substring substitutions.

use serde::Serialize;
use squish_schema::Schema;
use squish_token::Tokenizer;
use tracing::debug;

use crate::Result;

/// The fixed pool of placeholder strings available per compression.
pub const PLACEHOLDERS: [&str; 9] = ["PA", "PB", "PC", "PD", "PE", "PF", "PG", "PH", "PI"];

/// One placeholder → substring pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    /// The short placeholder written in the output (e.g. `PA`).
    pub placeholder: String,
    /// The substring it stands for.
    pub substring: String,
}

/// The ordered, frozen set of shortcut candidates for one compression.
///
/// The ILP decides which subset is actually introduced; this map only fixes
/// which substitutions are on the table and which placeholder each one gets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShortcutMap {
    entries: Vec<Shortcut>,
}

impl ShortcutMap {
    /// Builds a map by pairing candidates with the placeholder pool in order.
    pub fn new(substrings: Vec<String>) -> Self {
        let entries = PLACEHOLDERS
            .iter()
            .zip(substrings)
            .map(|(&placeholder, substring)| Shortcut {
                placeholder: placeholder.to_string(),
                substring,
            })
            .collect();
        Self { entries }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no candidates were proposed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The candidate at `index`.
    pub fn get(&self, index: usize) -> Option<&Shortcut> {
        self.entries.get(index)
    }

    /// All candidates, in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.entries.iter()
    }

    /// Renders `ident` with the given candidate applied (every occurrence of
    /// the substring replaced by the placeholder).
    pub fn apply(&self, index: usize, ident: &str) -> String {
        match self.entries.get(index) {
            Some(s) => ident.replace(&s.substring, &s.placeholder),
            None => ident.to_string(),
        }
    }

    /// The preamble sentence introducing one candidate. The trailing space
    /// is part of the sentence and of its token price.
    pub fn introduction(&self, index: usize) -> Option<String> {
        self.entries
            .get(index)
            .map(|s| format!("{} substitutes {} ", s.placeholder, s.substring))
    }
}

/// Proposes shortcut candidates for a schema: the most frequent multi-token
/// prefixes, capped by the placeholder pool.
///
/// Must run before column merging: synthetic `[a b c]` names dilute the
/// prefix statistics.
pub fn propose_shortcuts(schema: &Schema, tokenizer: &dyn Tokenizer) -> Result<ShortcutMap> {
    let mut prefixes = schema.prefixes(tokenizer)?;
    prefixes.truncate(PLACEHOLDERS.len());
    debug!(candidates = prefixes.len(), "proposed shortcut candidates");
    Ok(ShortcutMap::new(prefixes))
}

#[cfg(test)]
mod tests {
    use squish_schema::{Column, Table};
    use squish_token::ApproxTokenizer;

    use super::*;

    #[test]
    fn shared_prefix_gets_first_placeholder() {
        let columns = [
            "buildUpPlaySpeed",
            "buildUpPlayPassing",
            "buildUpPlayDribbling",
            "buildUpPlayPositioning",
            "buildUpPlayWidth",
        ]
        .iter()
        .map(|name| Column::new(*name, "int"))
        .collect();
        let schema = Schema::new(vec![Table::new("team_attributes", columns)], vec![], vec![]);
        let shortcuts = propose_shortcuts(&schema, &ApproxTokenizer::new()).unwrap();
        assert!(!shortcuts.is_empty());
        let first = shortcuts.get(0).unwrap();
        assert_eq!(first.placeholder, "PA");
        assert_eq!(first.substring, "buildUpPlay");
    }

    #[test]
    fn apply_replaces_substring() {
        let map = ShortcutMap::new(vec!["buildUpPlay".to_string()]);
        assert_eq!(map.apply(0, "buildUpPlaySpeed"), "PASpeed");
        assert_eq!(map.apply(0, "score"), "score");
        assert_eq!(
            map.introduction(0).unwrap(),
            "PA substitutes buildUpPlay "
        );
    }

    #[test]
    fn pool_caps_candidates() {
        // Twelve distinct frequent prefixes cannot all get placeholders.
        let names: Vec<String> = (0..12)
            .flat_map(|i| {
                [
                    format!("group{i:02}long_one"),
                    format!("group{i:02}long_two"),
                ]
            })
            .collect();
        let columns = names.iter().map(|n| Column::new(n, "int")).collect();
        let schema = Schema::new(vec![Table::new("wide", columns)], vec![], vec![]);
        let shortcuts = propose_shortcuts(&schema, &ApproxTokenizer::new()).unwrap();
        assert!(shortcuts.len() <= PLACEHOLDERS.len());
    }
}
