//! Solver-agnostic mixed-integer model plumbing.
//!
//! The compressor builds one [`MilpModel`] per schema: a registry of binary
//! variables, linear rows, a dense objective, plus an optional warm start
//! and variable hints. A [`MilpSolver`] turns the model into a
//! [`SolveOutcome`]; the only concrete driver here speaks to COIN-OR CBC.
//!
//! Keeping the model as a plain value has two payoffs: statistics (variable
//! and row counts) come for free, and feasibility of any assignment — the
//! warm start, or whatever a backend returns under a time limit — can be
//! checked without the solver's help.

pub mod cbc;
pub mod model;
pub mod solve;

pub use cbc::CbcSolver;
pub use model::{Assignment, MilpModel, Row, RowSense, VarId};
pub use solve::{MilpSolver, SolveOptions, SolveOutcome};

/// Errors produced by solver drivers.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The backend failed outright (no status, no incumbent).
    #[error("solver backend error: {0}")]
    Backend(String),

    /// An assignment refers to a variable the model does not have.
    #[error("variable index {index} out of range (model has {n_vars} variables)")]
    UnknownVariable {
        /// The offending index.
        index: usize,
        /// Number of variables in the model.
        n_vars: usize,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
