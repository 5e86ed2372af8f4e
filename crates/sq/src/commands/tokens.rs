//! `sq tokens` -- count tokens of a file or literal.

use serde::Serialize;

use crate::cli::TokensArgs;
use crate::context::RuntimeContext;
use crate::output;

/// JSON shape of the count result.
#[derive(Serialize)]
struct TokensReport {
    model: String,
    tokens: usize,
}

pub fn run(ctx: &RuntimeContext, args: &TokensArgs) -> anyhow::Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(file)) => ctx.read_file(file)?,
        (None, None) => anyhow::bail!("pass a file or --text"),
    };
    let tokenizer = ctx.tokenizer()?;
    let tokens = tokenizer.count_tokens(&text)?;

    if ctx.json {
        return output::print_json(&TokensReport {
            model: tokenizer.model().to_string(),
            tokens,
        });
    }
    println!("{tokens}");
    Ok(())
}
