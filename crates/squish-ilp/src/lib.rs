//! Optimal schema-to-prompt compression via integer linear programming.
//!
//! The pipeline: a [`Schema`](squish_schema::Schema) yields identifiers and
//! a true/false fact set; [`shortcut`] proposes placeholder substitutions
//! for frequent prefixes; [`seed`] renders the greedy nested text that
//! doubles as slot budget and warm start; [`builder`] turns all of it into
//! a binary program whose feasible points are exactly the well-formed
//! nested texts expressing the required facts; [`decode`] maps the best
//! assignment back to text; [`compress`] orchestrates the per-table runs.

pub mod builder;
pub mod compress;
pub mod decode;
pub mod seed;
pub mod shortcut;

pub use builder::{BuiltModel, IlpBuilder};
pub use compress::{Compression, TableCompression, compress_schema, greedy_text};
pub use decode::expand_shortcuts;
pub use seed::{Paren, Slot, join_slots, naive_slots};
pub use shortcut::{PLACEHOLDERS, Shortcut, ShortcutMap, propose_shortcuts};

use squish_schema::SchemaError;
use squish_token::TokenizerError;

/// Errors that can occur during compression.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// A schema precondition failed (e.g. split requested while
    /// multi-column keys remain).
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The schema yields no identifiers at all.
    #[error("schema yields no identifiers to compress")]
    EmptySchema,

    /// The tokenizer oracle failed.
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// The solver driver failed outright.
    #[error(
        "solver failed after {elapsed_s:.1}s on a model with {nr_variables} \
         variables and {nr_constraints} constraints: {message}"
    )]
    Solver {
        /// Driver-provided detail.
        message: String,
        /// Seconds spent before the failure.
        elapsed_s: f64,
        /// Variables in the model that failed.
        nr_variables: usize,
        /// Constraints in the model that failed.
        nr_constraints: usize,
    },
}

/// A specialized `Result` type for compression operations.
pub type Result<T> = std::result::Result<T, CompressError>;
