//! Solver invocation
//!
//! Hands a [`StaffingModel`] to HiGHS under a wall-clock limit and reads the
//! variable values back. The call blocks for up to the time limit; callers
//! that must stay responsive run it through [`crate::BackgroundSolver`].

use good_lp::solvers::{SolutionStatus, WithTimeLimit};
use good_lp::{highs, ResolutionError, Solution, SolverModel, Variable};
use staffopt_core::{Grid3, SolveStatus, StaffingError, Weights};
use std::time::Instant;
use tracing::{debug, info};

use crate::model::{ModelVariables, StaffingModel};

/// Raw variable values read from a solved model
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedValues {
    /// person × task × hour
    pub x: Grid3<f64>,
    pub w: Vec<f64>,
    pub w_max: f64,
    pub w_min: f64,
    pub y: Vec<f64>,
    pub s: Vec<f64>,
    pub u: Vec<f64>,
}

impl SolvedValues {
    /// Read every handle through `value`.
    pub fn read(m: &ModelVariables, value: impl Fn(Variable) -> f64) -> Self {
        let s = (0..m.s.rows())
            .flat_map(|p| m.s.row(p).iter().copied())
            .map(&value)
            .collect();
        Self {
            x: Grid3::from_fn(m.x.dims(), |p, t, h| value(m.x.at(p, t, h))),
            w: m.w.iter().map(|&v| value(v)).collect(),
            w_max: value(m.w_max),
            w_min: value(m.w_min),
            y: m.y.iter().map(|&v| value(v)).collect(),
            s,
            u: m.u.iter().map(|&v| value(v)).collect(),
        }
    }

    /// Objective value at this point
    pub fn objective(&self, w: &Weights) -> f64 {
        let total = |vals: &[f64]| vals.iter().sum::<f64>();
        w.equity * (self.w_max - self.w_min)
            + w.continuity * total(&self.y)
            + w.switching * total(&self.s)
            + w.fixed_violation * total(&self.u)
    }
}

/// What the solver reported
#[derive(Debug)]
pub enum SolveOutcome {
    /// A point was returned; `status` is `Optimal` or `FeasibleTimeout`
    Solved {
        status: SolveStatus,
        values: SolvedValues,
    },
    Infeasible,
}

/// Map the backend's termination reason onto our status.
///
/// Stopping on the MIP gap counts as optimal: the gap is the solver's own
/// optimality tolerance.
pub fn classify(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::TimeLimit => SolveStatus::FeasibleTimeout,
        _ => SolveStatus::Optimal,
    }
}

/// Solve `model` with HiGHS, stopping after `time_limit_secs`.
pub fn run(model: StaffingModel, time_limit_secs: u64) -> Result<SolveOutcome, StaffingError> {
    let StaffingModel {
        variables,
        handles,
        objective,
        constraints,
        stats,
    } = model;

    let mut problem = variables
        .minimise(objective)
        .using(highs)
        .with_time_limit(time_limit_secs as f64);
    for constraint in constraints {
        problem.add_constraint(constraint);
    }

    info!(
        time_limit_secs,
        constraints = stats.constraints,
        "running HiGHS"
    );
    let started = Instant::now();
    let result = problem.solve();
    let elapsed = started.elapsed();

    match result {
        Ok(solution) => {
            let status = classify(solution.status());
            debug!(?elapsed, %status, "solver returned a point");
            let values = SolvedValues::read(&handles, |v| solution.value(v));
            Ok(SolveOutcome::Solved { status, values })
        }
        Err(ResolutionError::Infeasible) => {
            debug!(?elapsed, "solver proved infeasibility");
            Ok(SolveOutcome::Infeasible)
        }
        Err(e) => {
            debug!(?elapsed, error = %e, "solver stopped without a schedule");
            Err(solver_error(&e, time_limit_secs))
        }
    }
}

/// HiGHS reports a stop on the time limit with no incumbent as this
/// `ResolutionError::Other` message.
const NO_SOLUTION_FOUND: &str = "NoSolutionFound";

fn solver_error(e: &ResolutionError, time_limit_secs: u64) -> StaffingError {
    match e {
        ResolutionError::Other(NO_SOLUTION_FOUND) => StaffingError::Solver(format!(
            "time limit of {time_limit_secs}s reached before a feasible schedule was found"
        )),
        other => StaffingError::Solver(other.to_string()),
    }
}
