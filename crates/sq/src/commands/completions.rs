//! `sq completions` -- generate shell completion scripts.

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut command = Cli::command();
    generate(args.shell, &mut command, "sq", &mut std::io::stdout());
    Ok(())
}
