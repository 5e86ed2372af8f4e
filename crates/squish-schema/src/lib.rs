//! Relational schema model for prompt compression.
//!
//! This crate owns the pure data side of the system: tables, typed columns,
//! key constraints, and everything derived from them that the optimizer
//! consumes — the identifier enumeration, the true/false fact set, column
//! merging, prefix statistics and per-table splitting.

pub mod column;
pub mod fact;
pub mod key;
pub mod prefix;
pub mod schema;
pub mod table;

pub use column::Column;
pub use fact::{Fact, FactSet};
pub use key::{ForeignKey, PrimaryKey};
pub use schema::Schema;
pub use table::Table;

/// Errors produced by schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema cannot be split per table while multi-column key
    /// constraints remain: those constraints tie tables together.
    #[error(
        "cannot split schema: {pkeys} multi-column primary key(s) and \
         {fkeys} multi-column foreign key(s) remain"
    )]
    ResidualKeys {
        /// Remaining multi-column primary keys.
        pkeys: usize,
        /// Remaining multi-column foreign keys.
        fkeys: usize,
    },

    /// The tokenizer oracle failed while computing prefix statistics.
    #[error(transparent)]
    Tokenizer(#[from] squish_token::TokenizerError),
}

/// A specialized `Result` type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
