//! Prefix statistics over schema names.
//!
//! Frequent multi-token prefixes (think `buildUpPlay` across half a dozen
//! column names) are the raw material for shortcut candidates: replacing
//! them with a short placeholder can shrink the tokenized output.

use std::collections::HashMap;

use squish_token::Tokenizer;

use crate::Result;

/// Returns candidate prefixes over `names`, most frequent first.
///
/// A candidate is a prefix of at least two characters that
/// - occurs in at least two of the given names (counted with multiplicity),
/// - tokenizes to more than one token (a single-token string cannot get
///   cheaper by substitution), and
/// - is not dominated by a strictly longer surviving prefix with the same
///   occurrence count (the longer prefix saves at least as much).
///
/// Ordering is fully deterministic: occurrence count descending, then prefix
/// length descending, then lexicographic.
pub fn prefix_candidates(names: &[&str], tokenizer: &dyn Tokenizer) -> Result<Vec<String>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        // Every char-boundary prefix of length >= 2, including the full name.
        for (end, _) in name.char_indices().skip(2) {
            *counts.entry(&name[..end]).or_insert(0) += 1;
        }
        if name.chars().count() >= 2 {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut candidates: Vec<(&str, usize)> = Vec::new();
    for (&prefix, &count) in &counts {
        if count < 2 {
            continue;
        }
        if tokenizer.count_tokens(prefix)? > 1 {
            candidates.push((prefix, count));
        }
    }

    // Drop prefixes whose savings a longer equal-count prefix subsumes.
    let dominated: Vec<bool> = candidates
        .iter()
        .map(|&(p, n)| {
            candidates
                .iter()
                .any(|&(q, m)| q.len() > p.len() && q.starts_with(p) && m == n)
        })
        .collect();
    let mut survivors: Vec<(&str, usize)> = candidates
        .into_iter()
        .zip(dominated)
        .filter(|&(_, dead)| !dead)
        .map(|(c, _)| c)
        .collect();

    survivors.sort_by(|&(p, n), &(q, m)| {
        m.cmp(&n)
            .then_with(|| q.len().cmp(&p.len()))
            .then_with(|| p.cmp(q))
    });
    Ok(survivors.into_iter().map(|(p, _)| p.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use squish_token::ApproxTokenizer;

    use super::*;

    #[test]
    fn frequent_shared_prefix_ranks_first() {
        let names = [
            "buildUpPlaySpeed",
            "buildUpPlayPassing",
            "buildUpPlayDribbling",
            "score",
        ];
        let tok = ApproxTokenizer::new();
        let prefixes = prefix_candidates(&names, &tok).unwrap();
        assert_eq!(prefixes.first().map(String::as_str), Some("buildUpPlay"));
        // The shared prefix occurs three times; anything rarer sorts later.
        assert!(!prefixes.iter().any(|p| p.starts_with("score")));
    }

    #[test]
    fn shorter_prefix_with_equal_count_is_dominated() {
        let names = ["playerweight", "playerheight"];
        let tok = ApproxTokenizer::new();
        let prefixes = prefix_candidates(&names, &tok).unwrap();
        // "player" (count 2) dominates "playe", "play", … (also count 2).
        assert!(prefixes.contains(&"player".to_string()));
        assert!(!prefixes.contains(&"play".to_string()));
        assert!(!prefixes.contains(&"playe".to_string()));
    }

    #[test]
    fn single_token_prefixes_are_filtered() {
        // Under the 4-chars-per-token approximation "int" is one token.
        let names = ["int", "int", "int"];
        let tok = ApproxTokenizer::new();
        let prefixes = prefix_candidates(&names, &tok).unwrap();
        assert!(prefixes.is_empty());
    }

    #[test]
    fn multibyte_names_do_not_panic() {
        let names = ["größe_m", "größe_n"];
        let tok = ApproxTokenizer::new();
        let prefixes = prefix_candidates(&names, &tok).unwrap();
        assert!(prefixes.contains(&"größe_".to_string()));
    }
}
