//! `sq` -- token-minimal prompt schemas from SQL DDL.
//!
//! Entry point: parses CLI arguments with clap, resolves the runtime
//! context (config file + flags), and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // Solver runs can take minutes; first Ctrl+C exits cleanly, a second
    // one forces the process down.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(130);
    });

    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sq=debug,squish_schema=debug,squish_ilp=debug,squish_milp=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = match RuntimeContext::from_global_args(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Compress(args) => commands::compress::run(&ctx, args),
        Commands::Greedy(args) => commands::greedy::run(&ctx, args),
        Commands::Inspect(args) => commands::inspect::run(&ctx, args),
        Commands::Tokens(args) => commands::tokens::run(&ctx, args),
        Commands::Config(args) => commands::config_cmd::run(&ctx, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
