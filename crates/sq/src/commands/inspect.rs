//! `sq inspect` -- show what the optimizer would work with.

use serde::Serialize;
use squish_schema::Schema;

use crate::cli::InspectArgs;
use crate::context::RuntimeContext;
use crate::output;

/// JSON shape of the inspection result.
#[derive(Serialize)]
struct InspectReport<'a> {
    schema: &'a Schema,
    identifiers: Vec<String>,
    nr_true_facts: usize,
    nr_false_facts: usize,
}

pub fn run(ctx: &RuntimeContext, args: &InspectArgs) -> anyhow::Result<()> {
    let schema = ctx.load_schema(&args.file)?;
    let identifiers = schema.identifiers();
    let facts = schema.facts();

    if ctx.json {
        return output::print_json(&InspectReport {
            schema: &schema,
            identifiers,
            nr_true_facts: facts.true_facts.len(),
            nr_false_facts: facts.false_facts.len(),
        });
    }

    for table in &schema.tables {
        println!("{}", table.text());
    }
    println!();
    println!("identifiers ({}):", identifiers.len());
    for ident in &identifiers {
        println!("  {ident}");
    }
    println!(
        "facts: {} true, {} false",
        facts.true_facts.len(),
        facts.false_facts.len()
    );
    if !schema.pkeys.is_empty() || !schema.fkeys.is_empty() {
        println!(
            "residual keys: {} primary, {} foreign (split mode unavailable)",
            schema.pkeys.len(),
            schema.fkeys.len()
        );
    }
    Ok(())
}
