//! Compression options and their on-disk configuration file.
//!
//! The options record travels through the whole pipeline (orchestrator,
//! model builder, solver driver) and is echoed back inside every
//! compression result. Values resolve in three layers: built-in defaults,
//! an optional `squish.yaml` file, then CLI flags.

pub mod config;

pub use config::{
    CompressOptions, ParenWeight, default_config_name, find_config, load_options, render_options,
    save_options,
};

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
