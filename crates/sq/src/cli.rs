//! Clap CLI definitions for the `sq` command.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// sq -- token-minimal prompt schemas from SQL DDL.
///
/// Compresses relational schema definitions into short parenthesis-nested
/// text that preserves every table/column/annotation fact while minimizing
/// the number of subword tokens under a named model.
#[derive(Parser, Debug)]
#[command(
    name = "sq",
    about = "Token-minimal prompt schemas from SQL DDL",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Tokenizer model to minimize for (default: from config or gpt-3.5-turbo).
    #[arg(long, global = true, env = "SQUISH_MODEL")]
    pub model: Option<String>,

    /// Use the offline chars/4 token estimate instead of real BPE tables.
    #[arg(long, global = true)]
    pub approx: bool,

    /// Path to a config file (default: squish.yaml in the working directory).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Treat the input file as a Spider tables.json and select this database.
    #[arg(long, global = true, value_name = "DB_ID")]
    pub spider: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a DDL file via the ILP optimizer.
    Compress(CompressArgs),

    /// Print the greedy nested rendering (the optimizer's seed).
    Greedy(GreedyArgs),

    /// Show the parsed schema: tables, identifiers, fact counts.
    Inspect(InspectArgs),

    /// Count tokens of a file or a literal under the configured model.
    Tokens(TokensArgs),

    /// Show the resolved options, or write a default config file.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for `sq compress`.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Path to the DDL file.
    pub file: String,

    /// Solver time limit per table, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximal context nesting depth.
    #[arg(long)]
    pub depth: Option<usize>,

    /// Identifiers allowed at context depth > 1 in the hinted search.
    #[arg(long)]
    pub context_k: Option<usize>,

    /// Clamp the slot budget below the greedy length.
    #[arg(long)]
    pub upper_bound: Option<usize>,

    /// Do not seed the solver with the greedy rendering.
    #[arg(long)]
    pub no_start: bool,

    /// Do not pass variable hints to the solver.
    #[arg(long)]
    pub no_hints: bool,

    /// Do not merge columns with identical type and annotations.
    #[arg(long)]
    pub no_merge: bool,

    /// Compress the whole schema as one program instead of per table.
    #[arg(long)]
    pub no_split: bool,
}

/// Arguments for `sq greedy`.
#[derive(Args, Debug)]
pub struct GreedyArgs {
    /// Path to the DDL file.
    pub file: String,

    /// Do not merge columns with identical type and annotations.
    #[arg(long)]
    pub no_merge: bool,
}

/// Arguments for `sq inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the DDL file.
    pub file: String,
}

/// Arguments for `sq tokens`.
#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Path to a text file to count.
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub file: Option<String>,

    /// Count this literal instead of reading a file.
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for `sq config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the resolved options to squish.yaml in the working directory.
    #[arg(long)]
    pub init: bool,
}

/// Arguments for `sq completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    pub shell: Shell,
}
