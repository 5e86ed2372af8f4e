//! Compression orchestration: split, build, solve, decode, report.

use std::time::Instant;

use serde::Serialize;
use squish_config::CompressOptions;
use squish_milp::{MilpSolver, SolveOptions, SolveOutcome};
use squish_schema::Schema;
use squish_token::Tokenizer;
use tracing::{debug, info, warn};

use crate::builder::IlpBuilder;
use crate::seed::{join_slots, naive_table_slots};
use crate::shortcut::propose_shortcuts;
use crate::{CompressError, Result};

/// Report for one independently compressed part (a table in split mode, or
/// the whole schema otherwise).
#[derive(Debug, Clone, Serialize)]
pub struct TableCompression {
    /// Name of the compressed part.
    pub table: String,
    /// The decoded text (empty when unsolved).
    pub solution: String,
    /// Variables in this part's model.
    pub nr_variables: usize,
    /// Constraints in this part's model.
    pub nr_constraints: usize,
    /// Relative MIP gap of the reported incumbent.
    pub mip_gap: f64,
    /// Slot budget of this part.
    pub max_length: usize,
    /// Whether a usable incumbent was found.
    pub solved: bool,
}

/// The overall result of one compression call.
#[derive(Debug, Clone, Serialize)]
pub struct Compression {
    /// Concatenated solution text, one part per line.
    pub solution: String,
    /// Total variables across all parts.
    pub nr_variables: usize,
    /// Total constraints across all parts.
    pub nr_constraints: usize,
    /// Worst relative MIP gap across parts.
    pub mip_gap: f64,
    /// Total slot budget across parts.
    pub max_length: usize,
    /// Configured context depth.
    pub max_depth: usize,
    /// Configured per-part solver limit in seconds.
    pub timeout_s: u64,
    /// Configured context-k hint width.
    pub context_k: usize,
    /// Whether warm starts were enabled.
    pub start: bool,
    /// Whether hints were enabled.
    pub hints: bool,
    /// Whether column merging was enabled.
    pub merge: bool,
    /// Whether every part produced a usable incumbent.
    pub solved: bool,
    /// Wall-clock seconds spent in total.
    pub total_s: f64,
    /// Per-part breakdown.
    pub tables: Vec<TableCompression>,
}

/// Greedy nested rendering of a schema, one line per table.
///
/// This is exactly the text the warm start encodes, so it also bounds the
/// optimizer's output length.
pub fn greedy_text(schema: &Schema, merge: bool) -> String {
    let mut schema = schema.clone();
    if merge {
        schema.merge_columns();
    }
    let lines: Vec<String> = schema
        .tables
        .iter()
        .map(|table| join_slots(&naive_table_slots(&schema, table)))
        .collect();
    lines.join("\n")
}

/// Compresses a schema under the given options.
///
/// In split mode every table becomes its own ILP; otherwise the whole
/// schema is one program. Parts that end without an incumbent (infeasible
/// models, timeouts with nothing found) contribute an empty solution line
/// and flip `solved` to false; driver failures abort with an error carrying
/// timing and model statistics.
pub fn compress_schema(
    schema: &Schema,
    tokenizer: &dyn Tokenizer,
    solver: &dyn MilpSolver,
    options: &CompressOptions,
) -> Result<Compression> {
    let started = Instant::now();
    let parts = if options.split {
        schema.split()?
    } else {
        vec![schema.clone()]
    };
    if parts.is_empty() {
        return Err(CompressError::EmptySchema);
    }

    let mut tables = Vec::with_capacity(parts.len());
    for part in parts {
        let name = match part.tables.as_slice() {
            [only] if options.split => only.name.clone(),
            _ => "schema".to_string(),
        };
        info!(part = %name, "compressing");
        tables.push(compress_part(name, part, tokenizer, solver, options, &started)?);
    }

    let solution = tables
        .iter()
        .map(|t| t.solution.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let result = Compression {
        solution,
        nr_variables: tables.iter().map(|t| t.nr_variables).sum(),
        nr_constraints: tables.iter().map(|t| t.nr_constraints).sum(),
        mip_gap: tables.iter().map(|t| t.mip_gap).fold(0.0, f64::max),
        max_length: tables.iter().map(|t| t.max_length).sum(),
        max_depth: options.max_depth,
        timeout_s: options.timeout_s,
        context_k: options.context_k,
        start: options.start,
        hints: options.hints,
        merge: options.merge,
        solved: tables.iter().all(|t| t.solved),
        total_s: started.elapsed().as_secs_f64(),
        tables,
    };
    info!(
        solved = result.solved,
        gap = result.mip_gap,
        total_s = result.total_s,
        "compression finished"
    );
    Ok(result)
}

/// Runs the pipeline for one part: shortcuts, merge, build, solve, decode.
fn compress_part(
    name: String,
    part: Schema,
    tokenizer: &dyn Tokenizer,
    solver: &dyn MilpSolver,
    options: &CompressOptions,
    started: &Instant,
) -> Result<TableCompression> {
    // Shortcut statistics must see the original names, so propose before
    // merging.
    let shortcuts = propose_shortcuts(&part, tokenizer)?;
    let mut part = part;
    if options.merge {
        part.merge_columns();
    }

    let built = IlpBuilder::new(&part, &shortcuts, tokenizer, options).build()?;
    let nr_variables = built.model.num_vars();
    let nr_constraints = built.model.num_rows();
    debug!(
        part = %name,
        nr_variables,
        nr_constraints,
        max_length = built.max_length(),
        "model built"
    );

    let solve_options = SolveOptions {
        time_limit_s: Some(options.timeout_s),
        use_start: options.start,
        use_hints: options.hints,
    };
    let outcome =
        solver
            .solve(&built.model, &solve_options)
            .map_err(|e| CompressError::Solver {
                message: e.to_string(),
                elapsed_s: started.elapsed().as_secs_f64(),
                nr_variables,
                nr_constraints,
            })?;

    let (solution, mip_gap, solved) = match outcome {
        SolveOutcome::Solved { assignment, gap } => (built.decode(&assignment), gap, true),
        SolveOutcome::Feasible { assignment, gap } => (built.decode(&assignment), gap, true),
        SolveOutcome::NoIncumbent { gap } => {
            warn!(part = %name, "solver stopped without an incumbent");
            (String::new(), gap.unwrap_or(f64::INFINITY), false)
        }
        SolveOutcome::Infeasible => {
            warn!(part = %name, "model proven infeasible");
            (String::new(), f64::INFINITY, false)
        }
    };

    Ok(TableCompression {
        table: name,
        solution,
        nr_variables,
        nr_constraints,
        mip_gap,
        max_length: built.max_length(),
        solved,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use squish_milp::{Assignment, MilpModel, SolveOutcome, SolverError};
    use squish_schema::{Column, ForeignKey, PrimaryKey, Table};
    use squish_token::ApproxTokenizer;

    use super::*;

    /// Solver double that returns the model's own warm start as incumbent.
    struct SeedSolver;

    impl MilpSolver for SeedSolver {
        fn solve(
            &self,
            model: &MilpModel,
            options: &SolveOptions,
        ) -> squish_milp::Result<SolveOutcome> {
            assert!(options.use_start);
            let mut assignment = Assignment::zeros(model.num_vars());
            for &(var, value) in model.start() {
                assignment.set(var, value);
            }
            assert!(model.is_feasible(&assignment), "warm start must be feasible");
            Ok(SolveOutcome::Solved {
                assignment,
                gap: 0.0,
            })
        }
    }

    /// Solver double that always fails.
    struct BrokenSolver;

    impl MilpSolver for BrokenSolver {
        fn solve(
            &self,
            _model: &MilpModel,
            _options: &SolveOptions,
        ) -> squish_milp::Result<SolveOutcome> {
            Err(SolverError::Backend("license daemon unreachable".into()))
        }
    }

    fn two_table_schema() -> Schema {
        Schema::new(
            vec![
                Table::new("o", vec![Column::new("id", "int")]),
                Table::new("l", vec![Column::new("oid", "int")]),
            ],
            vec![PrimaryKey::new("o", vec!["id".to_string()])],
            vec![ForeignKey::new(
                "l",
                vec!["oid".to_string()],
                "o",
                vec!["id".to_string()],
            )],
        )
    }

    #[test]
    fn split_mode_compresses_each_table() {
        let schema = two_table_schema();
        let options = CompressOptions::default();
        let result =
            compress_schema(&schema, &ApproxTokenizer::new(), &SeedSolver, &options).unwrap();
        assert!(result.solved);
        assert_eq!(result.tables.len(), 2);
        assert_eq!(result.tables[0].table, "o");
        assert_eq!(result.tables[1].table, "l");
        assert_eq!(
            result.solution,
            "table o(id(int primary key))\n\
             table l(oid(int foreign key references o(id)))"
        );
        assert_eq!(
            result.nr_variables,
            result.tables.iter().map(|t| t.nr_variables).sum::<usize>()
        );
    }

    #[test]
    fn whole_schema_mode_builds_one_model() {
        let schema = two_table_schema();
        let options = CompressOptions {
            split: false,
            ..CompressOptions::default()
        };
        let result =
            compress_schema(&schema, &ApproxTokenizer::new(), &SeedSolver, &options).unwrap();
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.tables[0].table, "schema");
        assert_eq!(
            result.solution,
            "table o(id(int primary key))table l(oid(int foreign key references o(id)))"
        );
    }

    #[test]
    fn split_with_residual_keys_is_rejected() {
        let schema = Schema::new(
            vec![Table::new(
                "m",
                vec![Column::new("a", "int"), Column::new("b", "int")],
            )],
            vec![PrimaryKey::new(
                "m",
                vec!["a".to_string(), "b".to_string()],
            )],
            vec![],
        );
        let options = CompressOptions::default();
        let err = compress_schema(&schema, &ApproxTokenizer::new(), &SeedSolver, &options)
            .unwrap_err();
        assert!(matches!(err, CompressError::Schema(_)));
    }

    #[test]
    fn empty_schema_is_rejected() {
        let schema = Schema::new(vec![], vec![], vec![]);
        let options = CompressOptions::default();
        let err = compress_schema(&schema, &ApproxTokenizer::new(), &SeedSolver, &options)
            .unwrap_err();
        assert!(matches!(err, CompressError::EmptySchema));
    }

    #[test]
    fn solver_failure_carries_statistics() {
        let schema = two_table_schema();
        let options = CompressOptions::default();
        let err = compress_schema(&schema, &ApproxTokenizer::new(), &BrokenSolver, &options)
            .unwrap_err();
        match err {
            CompressError::Solver {
                message,
                nr_variables,
                ..
            } => {
                assert!(message.contains("license daemon"));
                assert!(nr_variables > 0);
            }
            other => panic!("expected solver error, got {other}"),
        }
    }

    #[test]
    fn merge_groups_uniform_columns_in_output() {
        let columns = vec![
            Column::with_annotations("a", "int", vec!["int".into(), "not null".into()]),
            Column::with_annotations("b", "int", vec!["int".into(), "not null".into()]),
            Column::with_annotations("c", "int", vec!["int".into(), "not null".into()]),
        ];
        let schema = Schema::new(vec![Table::new("t", columns)], vec![], vec![]);
        let options = CompressOptions::default();
        let result =
            compress_schema(&schema, &ApproxTokenizer::new(), &SeedSolver, &options).unwrap();
        assert_eq!(result.solution, "table t([a b c](int not null))");
    }

    #[test]
    fn greedy_text_matches_seed_rendering() {
        let schema = two_table_schema();
        assert_eq!(
            greedy_text(&schema, true),
            "table o(id(int primary key))\n\
             table l(oid(int foreign key references o(id)))"
        );
    }
}
