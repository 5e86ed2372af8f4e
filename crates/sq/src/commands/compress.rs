//! `sq compress` -- run the ILP optimizer over a DDL file.

use squish_ilp::compress_schema;
use squish_milp::CbcSolver;

use crate::cli::CompressArgs;
use crate::context::RuntimeContext;
use crate::output;

pub fn run(ctx: &RuntimeContext, args: &CompressArgs) -> anyhow::Result<()> {
    let schema = ctx.load_schema(&args.file)?;

    let mut options = ctx.options.clone();
    if let Some(timeout) = args.timeout {
        options.timeout_s = timeout;
    }
    if let Some(depth) = args.depth {
        options.max_depth = depth;
    }
    if let Some(context_k) = args.context_k {
        options.context_k = context_k;
    }
    if args.upper_bound.is_some() {
        options.upper_bound = args.upper_bound;
    }
    options.start = options.start && !args.no_start;
    options.hints = options.hints && !args.no_hints;
    options.merge = options.merge && !args.no_merge;
    options.split = options.split && !args.no_split;

    let tokenizer = ctx.tokenizer()?;
    let solver = CbcSolver::new();
    let result = compress_schema(&schema, tokenizer.as_ref(), &solver, &options)?;

    if ctx.json {
        return output::print_json(&result);
    }
    let original_tokens = tokenizer.count_tokens(&schema.text())?;
    let compressed_tokens = tokenizer.count_tokens(&result.solution)?;
    output::print_compression(&result, original_tokens, compressed_tokens, ctx.quiet);
    Ok(())
}
