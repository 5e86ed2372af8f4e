//! Command handlers for the `sq` CLI.

pub mod completions;
pub mod compress;
pub mod config_cmd;
pub mod greedy;
pub mod inspect;
pub mod tokens;
