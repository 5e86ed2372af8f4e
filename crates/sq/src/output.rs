//! Output formatting for the `sq` CLI.

use owo_colors::OwoColorize;
use serde::Serialize;
use squish_ilp::Compression;

/// Prints any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Human-readable compression report: the solution text followed by a stat
/// block comparing token counts and summarizing the solve.
pub fn print_compression(
    result: &Compression,
    original_tokens: usize,
    compressed_tokens: usize,
    quiet: bool,
) {
    println!("{}", result.solution);
    if quiet {
        return;
    }

    eprintln!();
    eprintln!("{}", "-- compression --".bold());
    eprintln!("  original tokens:    {}", original_tokens);
    eprintln!("  compressed tokens:  {}", compressed_tokens);
    let saved = original_tokens.saturating_sub(compressed_tokens);
    let percent = if original_tokens > 0 {
        100.0 * saved as f64 / original_tokens as f64
    } else {
        0.0
    };
    eprintln!("  saved:              {} ({percent:.1}%)", saved.green());
    eprintln!("  variables:          {}", result.nr_variables);
    eprintln!("  constraints:        {}", result.nr_constraints);
    eprintln!("  slot budget:        {}", result.max_length);
    eprintln!("  mip gap:            {:.4}", result.mip_gap);
    eprintln!("  wall clock:         {:.1}s", result.total_s);
    if result.solved {
        eprintln!("  status:             {}", "solved".green());
    } else {
        eprintln!("  status:             {}", "unsolved".red());
    }
    for table in &result.tables {
        if !table.solved {
            eprintln!("    {} {}", "no incumbent for".red(), table.table);
        }
    }
}
