//! # staffopt-solver
//!
//! Staffing solver built on mixed-integer linear programming.
//!
//! This crate provides:
//! - Model construction (assignment, workload, epigraph and indicator variables)
//! - Solver invocation on HiGHS with a wall-clock limit
//! - Result extraction with near-binary snapping and schedule verification
//! - A coverage pre-check that runs without the solver
//! - Single-flight background solving
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffopt_core::{SolveStatus, StaffingRequest};
//! use staffopt_solver::MilpStaffer;
//!
//! let request = StaffingRequest::new(["Ana"], ["Desk"], [0, 1])
//!     .with_requirement("Desk", 0, 1)
//!     .with_requirement("Desk", 1, 1);
//!
//! let solution = MilpStaffer::new().solve_request(&request)?;
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! ```

pub mod background;
pub mod extract;
pub mod invoke;
pub mod model;
pub mod precheck;

pub use background::{BackgroundSolver, SolveHandle, StartError};
pub use extract::{verify_schedule, Violation, SNAP_TOLERANCE};
pub use model::{build_model, ModelStats};
pub use precheck::coverage_report;

use staffopt_core::{
    normalize, FeasibilityReport, NormalizedProblem, SolveStatus, Staffer, StaffingError,
    StaffingRequest, StaffingSolution,
};
use tracing::{info, warn};

use crate::invoke::SolveOutcome;

/// MILP-based staffer
#[derive(Clone, Debug)]
pub struct MilpStaffer {
    /// Distance from 1.0 still read as an assignment
    pub snap_tolerance: f64,
}

impl MilpStaffer {
    pub fn new() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
        }
    }

    pub fn snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Normalize, build, solve and extract in one call.
    pub fn solve_request(
        &self,
        request: &StaffingRequest,
    ) -> Result<StaffingSolution, StaffingError> {
        let problem = normalize(request)?;
        self.solve(&problem)
    }
}

impl Default for MilpStaffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Staffer for MilpStaffer {
    fn solve(&self, problem: &NormalizedProblem) -> Result<StaffingSolution, StaffingError> {
        // a hand-built problem may never have gone through normalize
        problem.validate()?;
        problem.weights.validate()?;

        let model = build_model(problem);
        info!(
            people = problem.person_count(),
            tasks = problem.task_count(),
            hours = problem.hour_count(),
            variables = model.stats.variables,
            "solving staffing model"
        );

        match invoke::run(model, problem.time_limit_secs())? {
            SolveOutcome::Infeasible => {
                warn!("no assignment satisfies availability, qualification and coverage");
                Ok(StaffingSolution::without_schedule(SolveStatus::Infeasible))
            }
            SolveOutcome::Solved { status, values } => {
                if status == SolveStatus::FeasibleTimeout {
                    warn!(
                        time_limit_secs = problem.time_limit_secs(),
                        "time limit reached, returning best schedule found"
                    );
                }
                let solution = extract::extract(problem, status, &values, self.snap_tolerance)?;
                verify_schedule(problem, &solution).map_err(|violation| {
                    StaffingError::Solver(format!("returned schedule is not feasible: {violation}"))
                })?;
                info!(
                    %status,
                    objective = ?solution.objective_value,
                    load_spread = solution.load_spread,
                    "staffing solved"
                );
                Ok(solution)
            }
        }
    }

    fn precheck(&self, problem: &NormalizedProblem) -> FeasibilityReport {
        coverage_report(problem)
    }
}
