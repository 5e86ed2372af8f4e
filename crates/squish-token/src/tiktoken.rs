//! BPE-backed token counting via `tiktoken-rs`.

use tiktoken_rs::{CoreBPE, get_bpe_from_model};

use crate::{Result, Tokenizer, TokenizerError};

/// Token-count oracle backed by the `tiktoken` BPE tables for one model.
///
/// The BPE tables ship with the crate, so counting works offline. Encoding
/// itself is infallible; only resolving an unknown model name can fail.
pub struct TiktokenTokenizer {
    model: String,
    bpe: CoreBPE,
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl TiktokenTokenizer {
    /// Creates an oracle for the given model name (e.g. `gpt-3.5-turbo`).
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = get_bpe_from_model(model).map_err(|e| TokenizerError::UnknownModel {
            model: model.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self.bpe.encode_with_special_tokens(text).len())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
