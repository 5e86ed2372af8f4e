//! [`CbcSolver`] -- driver for the COIN-OR CBC branch-and-cut solver.

use coin_cbc::{Model as CbcModel, Sense};
use tracing::debug;

use crate::Result;
use crate::model::{Assignment, MilpModel, RowSense};
use crate::solve::{MilpSolver, SolveOptions, SolveOutcome};

/// Driver over the `coin_cbc` binding.
///
/// The time limit maps to CBC's `seconds` parameter and the warm start to
/// per-column initial-solution values. CBC has no notion of variable hints,
/// so hints are accepted and dropped. Whether a stopped solve left a usable
/// incumbent is decided by checking the returned values against the model's
/// own feasibility checker; CBC's status surface alone does not distinguish
/// "stopped with incumbent" from "stopped empty-handed" reliably.
#[derive(Debug, Clone, Default)]
pub struct CbcSolver;

impl CbcSolver {
    /// Creates a driver with default settings.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for CbcSolver {
    fn solve(&self, model: &MilpModel, options: &SolveOptions) -> Result<SolveOutcome> {
        let mut cbc = CbcModel::default();

        let cols: Vec<_> = model.variables().map(|_| cbc.add_binary()).collect();
        for var in model.variables() {
            let weight = model.objective_coeff(var);
            if weight != 0.0 {
                cbc.set_obj_coeff(cols[var.index()], weight);
            }
        }
        cbc.set_obj_sense(Sense::Minimize);

        for row in model.rows() {
            let r = cbc.add_row();
            for &(var, coeff) in &row.terms {
                cbc.set_weight(r, cols[var.index()], coeff);
            }
            match row.sense {
                RowSense::Le => cbc.set_row_upper(r, row.rhs),
                RowSense::Ge => cbc.set_row_lower(r, row.rhs),
                RowSense::Eq => {
                    cbc.set_row_lower(r, row.rhs);
                    cbc.set_row_upper(r, row.rhs);
                }
            }
        }

        cbc.set_parameter("logLevel", "0");
        if let Some(seconds) = options.time_limit_s {
            cbc.set_parameter("seconds", &seconds.to_string());
        }

        if options.use_start && !model.start().is_empty() {
            debug!(entries = model.start().len(), "installing warm start");
            for &(var, value) in model.start() {
                cbc.set_col_initial_solution(cols[var.index()], value);
            }
        }
        if options.use_hints && !model.hints().is_empty() {
            debug!(
                hints = model.hints().len(),
                "CBC has no hint interface, dropping variable hints"
            );
        }

        debug!(
            vars = model.num_vars(),
            rows = model.num_rows(),
            timeout_s = options.time_limit_s,
            "starting CBC solve"
        );
        let solution = cbc.solve();
        let raw = solution.raw();

        if raw.is_proven_infeasible() {
            return Ok(SolveOutcome::Infeasible);
        }

        let mut assignment = Assignment::zeros(model.num_vars());
        for var in model.variables() {
            assignment.set(var, solution.col(cols[var.index()]).round());
        }

        let objective = raw.obj_value();
        let bound = raw.best_possible_value();
        let gap = relative_gap(objective, bound);

        if raw.is_proven_optimal() {
            debug!(objective, "CBC proved optimality");
            return Ok(SolveOutcome::Solved {
                assignment,
                gap: gap.unwrap_or(0.0),
            });
        }
        if model.is_feasible(&assignment) {
            debug!(objective, ?gap, "CBC stopped with a feasible incumbent");
            return Ok(SolveOutcome::Feasible {
                assignment,
                gap: gap.unwrap_or(f64::INFINITY),
            });
        }
        debug!("CBC stopped without a usable incumbent");
        Ok(SolveOutcome::NoIncumbent { gap })
    }
}

/// Relative distance between incumbent objective and best proven bound.
fn relative_gap(objective: f64, bound: f64) -> Option<f64> {
    if !objective.is_finite() || !bound.is_finite() {
        return None;
    }
    Some((objective - bound).abs() / objective.abs().max(1e-10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_tiny_cover() {
        // min 2x + 3y  s.t.  x + y ≥ 1, x ≤ 0  →  y = 1, objective 3.
        let mut m = MilpModel::new();
        let x = m.add_binary();
        let y = m.add_binary();
        m.add_objective(x, 2.0);
        m.add_objective(y, 3.0);
        m.ge(vec![(x, 1.0), (y, 1.0)], 1.0);
        m.le(vec![(x, 1.0)], 0.0);

        let outcome = CbcSolver::new()
            .solve(&m, &SolveOptions::default())
            .unwrap();
        match outcome {
            SolveOutcome::Solved { assignment, .. } => {
                assert!(!assignment.is_one(x));
                assert!(assignment.is_one(y));
                assert_eq!(m.objective_value(&assignment), 3.0);
            }
            other => panic!("expected Solved, got {other:?}"),
        }
    }

    #[test]
    fn reports_infeasibility() {
        // x ≥ 1 and x ≤ 0 cannot both hold.
        let mut m = MilpModel::new();
        let x = m.add_binary();
        m.ge(vec![(x, 1.0)], 1.0);
        m.le(vec![(x, 1.0)], 0.0);

        let outcome = CbcSolver::new()
            .solve(&m, &SolveOptions::default())
            .unwrap();
        assert!(matches!(outcome, SolveOutcome::Infeasible));
    }

    #[test]
    fn warm_start_round_trips() {
        let mut m = MilpModel::new();
        let x = m.add_binary();
        let y = m.add_binary();
        m.add_objective(x, 1.0);
        m.add_objective(y, 1.0);
        m.ge(vec![(x, 1.0), (y, 1.0)], 1.0);
        m.set_start(vec![(x, 1.0), (y, 0.0)]);

        let outcome = CbcSolver::new()
            .solve(&m, &SolveOptions::default())
            .unwrap();
        let assignment = outcome.assignment().expect("feasible model");
        assert_eq!(m.objective_value(assignment), 1.0);
    }
}
