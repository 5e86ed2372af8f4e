//! Character-based token estimation for offline runs.

use crate::{Result, Tokenizer};

/// Deterministic token-count estimate of `ceil(chars / chars_per_token)`.
///
/// Subword tokenizers for English-like text average around four characters
/// per token; this oracle applies that ratio uniformly. It exists for
/// environments without BPE tables and for tests that need stable counts
/// independent of any model revision.
pub struct ApproxTokenizer {
    chars_per_token: usize,
}

impl ApproxTokenizer {
    /// Creates an estimator with the default ratio of four characters per token.
    pub fn new() -> Self {
        Self { chars_per_token: 4 }
    }

    /// Creates an estimator with a custom ratio. `chars_per_token` must be ≥ 1.
    pub fn with_ratio(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for ApproxTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for ApproxTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let chars = text.chars().count();
        Ok(chars.div_ceil(self.chars_per_token))
    }

    fn model(&self) -> &str {
        "approx"
    }
}
