//! Tokenizer length oracles.
//!
//! Everything downstream (prefix statistics, shortcut candidates, the ILP
//! objective) only ever asks one question: how many subword tokens does a
//! given string occupy under a named model? That question is captured by the
//! [`Tokenizer`] trait so that the real BPE implementation, an offline
//! approximation, and test doubles are interchangeable.

pub mod approx;
pub mod cache;
pub mod tiktoken;

pub use approx::ApproxTokenizer;
pub use cache::CachedTokenizer;
pub use tiktoken::TiktokenTokenizer;

/// Errors that can occur while counting tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    /// The model name is not known to the tokenizer backend.
    #[error("unknown tokenizer model '{model}': {reason}")]
    UnknownModel {
        /// The model name that failed to resolve.
        model: String,
        /// Backend-provided detail.
        reason: String,
    },

    /// The backend failed while encoding a concrete string.
    #[error("failed to tokenize text: {0}")]
    Encode(String),
}

/// A specialized `Result` type for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;

/// A pure, deterministic token-count oracle for one named model.
///
/// Implementations must be pure: the same text always yields the same count,
/// which is what makes memoization ([`CachedTokenizer`]) and deterministic
/// optimization possible.
pub trait Tokenizer: Send + Sync {
    /// Returns the number of tokens `text` occupies under this model.
    fn count_tokens(&self, text: &str) -> Result<usize>;

    /// Name of the model this oracle answers for.
    fn model(&self) -> &str;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
