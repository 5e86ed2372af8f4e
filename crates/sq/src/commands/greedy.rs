//! `sq greedy` -- print the greedy nested rendering.

use serde::Serialize;
use squish_ilp::greedy_text;

use crate::cli::GreedyArgs;
use crate::context::RuntimeContext;
use crate::output;

/// JSON shape of the greedy result.
#[derive(Serialize)]
struct GreedyReport {
    solution: String,
    tokens: usize,
}

pub fn run(ctx: &RuntimeContext, args: &GreedyArgs) -> anyhow::Result<()> {
    let schema = ctx.load_schema(&args.file)?;
    let solution = greedy_text(&schema, !args.no_merge);

    if ctx.json {
        let tokens = ctx.tokenizer()?.count_tokens(&solution)?;
        return output::print_json(&GreedyReport { solution, tokens });
    }
    println!("{solution}");
    if !ctx.quiet {
        let tokens = ctx.tokenizer()?.count_tokens(&solution)?;
        eprintln!("tokens: {tokens}");
    }
    Ok(())
}
