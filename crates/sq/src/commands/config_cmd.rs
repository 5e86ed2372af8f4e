//! `sq config` -- show resolved options or write a default config file.

use anyhow::Context as _;
use squish_config::{default_config_name, render_options, save_options};

use crate::cli::ConfigArgs;
use crate::context::RuntimeContext;
use crate::output;

pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> anyhow::Result<()> {
    if args.init {
        let path = std::env::current_dir()
            .context("resolving working directory")?
            .join(default_config_name());
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        save_options(&path, &ctx.options)
            .with_context(|| format!("writing {}", path.display()))?;
        if !ctx.quiet {
            println!("wrote {}", path.display());
        }
        return Ok(());
    }

    if ctx.json {
        return output::print_json(&ctx.options);
    }
    print!("{}", render_options(&ctx.options)?);
    Ok(())
}
