//! The [`CompressOptions`] record and YAML load/save helpers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// How parentheses are priced in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParenWeight {
    /// Every parenthesis costs one weight unit.
    #[default]
    Unit,
    /// Parentheses cost whatever the tokenizer charges for `(` and `)`.
    Tokenized,
}

/// Options controlling one compression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressOptions {
    /// Tokenizer model whose token counts are minimized.
    pub model: String,
    /// Maximal context (parenthesis nesting) depth.
    pub max_depth: usize,
    /// Number of identifiers allowed at context depth > 1 in the hinted
    /// search.
    pub context_k: usize,
    /// Wall-clock solver limit per table, in seconds.
    pub timeout_s: u64,
    /// Seed the solver with the greedy rendering.
    pub start: bool,
    /// Pass frequency-based variable hints to the solver.
    pub hints: bool,
    /// Merge columns with identical type and annotations before compressing.
    pub merge: bool,
    /// Compress each table independently.
    pub split: bool,
    /// Optional clamp on the slot budget (defaults to the greedy length).
    pub upper_bound: Option<usize>,
    /// Objective weight of parentheses.
    pub paren_weight: ParenWeight,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_depth: 3,
            context_k: 10,
            timeout_s: 180,
            start: true,
            hints: true,
            merge: true,
            split: true,
            upper_bound: None,
            paren_weight: ParenWeight::Unit,
        }
    }
}

/// Name of the configuration file searched for in the working directory.
pub fn default_config_name() -> &'static str {
    "squish.yaml"
}

/// Looks for a configuration file in `dir`, returning its path if present.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    for name in [default_config_name(), ".squish.yaml"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Loads options from a YAML file. Missing keys fall back to defaults.
pub fn load_options(path: &Path) -> Result<CompressOptions> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Saves options as YAML.
pub fn save_options(path: &Path, options: &CompressOptions) -> Result<()> {
    std::fs::write(path, render_options(options)?)?;
    Ok(())
}

/// Renders options as the YAML the config file uses.
pub fn render_options(options: &CompressOptions) -> Result<String> {
    Ok(serde_yaml::to_string(options)?)
}
