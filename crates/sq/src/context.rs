//! Runtime context resolved from global flags and the config file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use squish_config::{CompressOptions, find_config, load_options};
use squish_schema::Schema;
use squish_token::{ApproxTokenizer, CachedTokenizer, TiktokenTokenizer, Tokenizer};
use tracing::debug;

use crate::cli::GlobalArgs;

/// Everything command handlers need besides their own arguments.
pub struct RuntimeContext {
    /// Options after layering config file under CLI overrides.
    pub options: CompressOptions,
    /// Use the offline token estimate.
    pub approx: bool,
    /// Read schema inputs as Spider tables.json, selecting this database.
    pub spider: Option<String>,
    /// Emit JSON instead of human-readable output.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbose/debug logging enabled.
    pub verbose: bool,
}

impl RuntimeContext {
    /// Resolves the context: defaults, then `squish.yaml` (or `--config`),
    /// then global flags.
    pub fn from_global_args(global: &GlobalArgs) -> anyhow::Result<Self> {
        let config_path: Option<PathBuf> = match &global.config {
            Some(path) => Some(PathBuf::from(path)),
            None => std::env::current_dir().ok().and_then(|d| find_config(&d)),
        };

        let mut options = match &config_path {
            Some(path) => load_options(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => CompressOptions::default(),
        };
        if let Some(path) = &config_path {
            debug!(path = %path.display(), "loaded config file");
        }
        if let Some(model) = &global.model {
            options.model = model.clone();
        }

        Ok(Self {
            options,
            approx: global.approx,
            spider: global.spider.clone(),
            json: global.json,
            quiet: global.quiet,
            verbose: global.verbose,
        })
    }

    /// Loads a schema from a DDL file, or from a Spider `tables.json` when
    /// `--spider` selects a database.
    pub fn load_schema(&self, path: &str) -> anyhow::Result<Schema> {
        let content = self.read_file(path)?;
        match &self.spider {
            Some(db_id) => squish_parser::parse_spider_db(&content, db_id)
                .with_context(|| format!("reading Spider database '{db_id}' from {path}")),
            None => squish_parser::parse_ddl(&content).with_context(|| format!("parsing {path}")),
        }
    }

    /// Builds the token-count oracle for the configured model.
    ///
    /// Real counts go through a memoizing cache; the model builder asks for
    /// the same identifier strings many times over.
    pub fn tokenizer(&self) -> anyhow::Result<Box<dyn Tokenizer>> {
        if self.approx {
            return Ok(Box::new(ApproxTokenizer::new()));
        }
        let inner = TiktokenTokenizer::for_model(&self.options.model)
            .with_context(|| format!("resolving tokenizer for model '{}'", self.options.model))?;
        Ok(Box::new(CachedTokenizer::new(inner)))
    }

    /// Reads a DDL (or text) file with a path-bearing error.
    pub fn read_file(&self, path: &str) -> anyhow::Result<String> {
        std::fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))
    }
}
