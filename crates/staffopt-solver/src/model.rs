//! Model builder
//!
//! Translates a [`NormalizedProblem`] into a mixed-integer linear program.
//!
//! # Variables
//!
//! - `X[p,t,h]` binary: person `p` works task `t` at hour `h`
//! - `W[p]` integer ≥ 0: hours worked by `p`
//! - `Wmax`, `Wmin` continuous ≥ 0: epigraph bounds on `W`
//! - `Y[p,t,h]` binary, `h` < last: same task at `h` and the next active hour
//! - `S[p,h]` binary, `h` > first: `p` starts working at `h`
//! - `U[p,t,h]` binary: mandatory assignment not honored
//!
//! # Objective (minimize)
//!
//! `alpha·(Wmax − Wmin) + beta·ΣY + gamma·ΣS + epsilon·ΣU`
//!
//! `Y`, `S` and `U` are only bounded from below. Each carries a
//! non-negative weight in a minimization, so the solver never raises one
//! above what the linking inequality forces.

use good_lp::{variable, Constraint, Expression, ProblemVariables, Variable};
use staffopt_core::{Grid2, Grid3, NormalizedProblem};
use tracing::debug;

/// Handles to every decision variable, laid out on the problem axes
#[derive(Debug)]
pub struct ModelVariables {
    /// person × task × hour
    pub x: Grid3<Variable>,
    /// per person
    pub w: Vec<Variable>,
    pub w_max: Variable,
    pub w_min: Variable,
    /// person × task × (hours − 1); slot `h` links hour `h` and `h + 1`
    pub y: Grid3<Variable>,
    /// person × (hours − 1); slot `h` is the start indicator for hour `h + 1`
    pub s: Grid2<Variable>,
    /// person × task × hour
    pub u: Grid3<Variable>,
}

/// Size of a built model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub variables: usize,
    pub binaries: usize,
    pub constraints: usize,
}

/// A MILP ready to hand to a solver
pub struct StaffingModel {
    pub variables: ProblemVariables,
    pub handles: ModelVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub stats: ModelStats,
}

/// Build the staffing MILP for a normalized problem.
pub fn build_model(problem: &NormalizedProblem) -> StaffingModel {
    let (np, nt, nh) = (
        problem.person_count(),
        problem.task_count(),
        problem.hour_count(),
    );
    let links = nh.saturating_sub(1);
    let mut vars = ProblemVariables::new();

    let x = Grid3::from_fn((np, nt, nh), |p, t, h| {
        vars.add(variable().binary().name(format!("X_{p}_{t}_{h}")))
    });
    let w: Vec<Variable> = (0..np)
        .map(|p| vars.add(variable().integer().min(0).name(format!("W_{p}"))))
        .collect();
    let w_max = vars.add(variable().min(0).name("W_max"));
    let w_min = vars.add(variable().min(0).name("W_min"));
    let y = Grid3::from_fn((np, nt, links), |p, t, h| {
        vars.add(variable().binary().name(format!("Y_{p}_{t}_{h}")))
    });
    let s = Grid2::from_fn(np, links, |p, h| {
        vars.add(variable().binary().name(format!("S_{p}_{}", h + 1)))
    });
    let u = Grid3::from_fn((np, nt, nh), |p, t, h| {
        vars.add(variable().binary().name(format!("U_{p}_{t}_{h}")))
    });

    let handles = ModelVariables {
        x,
        w,
        w_max,
        w_min,
        y,
        s,
        u,
    };

    let objective = objective(problem, &handles);
    let constraints = constraints(problem, &handles);

    let binaries = 2 * np * nt * nh + np * nt * links + np * links;
    let stats = ModelStats {
        variables: binaries + np + 2,
        binaries,
        constraints: constraints.len(),
    };
    debug!(
        variables = stats.variables,
        binaries = stats.binaries,
        constraints = stats.constraints,
        "built staffing model"
    );

    StaffingModel {
        variables: vars,
        handles,
        objective,
        constraints,
        stats,
    }
}

fn sum_of(vars: impl IntoIterator<Item = Variable>) -> Expression {
    vars.into_iter().fold(Expression::from(0.0), |acc, v| acc + v)
}

/// Number of tasks `p` is on at active hour `h` (0 or 1 when feasible)
fn on_duty(m: &ModelVariables, p: usize, h: usize) -> Expression {
    let nt = m.x.dims().1;
    sum_of((0..nt).map(|t| m.x.at(p, t, h)))
}

fn objective(problem: &NormalizedProblem, m: &ModelVariables) -> Expression {
    let w = &problem.weights;
    let spread = w.equity * m.w_max - w.equity * m.w_min;
    let continuity = m
        .y
        .iter()
        .fold(Expression::from(0.0), |acc, &v| acc + w.continuity * v);
    let starts = (0..m.s.rows())
        .flat_map(|p| m.s.row(p).iter().copied())
        .fold(Expression::from(0.0), |acc, v| acc + w.switching * v);
    let violations = m
        .u
        .iter()
        .fold(Expression::from(0.0), |acc, &v| acc + w.fixed_violation * v);

    spread + continuity + starts + violations
}

fn constraints(problem: &NormalizedProblem, m: &ModelVariables) -> Vec<Constraint> {
    let (np, nt, nh) = m.x.dims();
    let mut out = Vec::new();

    // availability, at most one task per hour
    for p in 0..np {
        for h in 0..nh {
            let cap = if problem.is_available(p, h) { 1.0 } else { 0.0 };
            out.push(on_duty(m, p, h).leq(cap));
        }
    }

    // exact coverage
    for t in 0..nt {
        for h in 0..nh {
            let staffed = sum_of((0..np).map(|p| m.x.at(p, t, h)));
            out.push(staffed.eq(f64::from(problem.required(t, h))));
        }
    }

    // qualification
    for p in 0..np {
        for t in 0..nt {
            let cap = if problem.is_qualified(p, t) { 1.0 } else { 0.0 };
            for h in 0..nh {
                out.push(Expression::from(m.x.at(p, t, h)).leq(cap));
            }
        }
    }

    // workload accounting and epigraph bounds
    for p in 0..np {
        let worked = sum_of((0..nt).flat_map(|t| (0..nh).map(move |h| m.x.at(p, t, h))));
        out.push((Expression::from(m.w[p]) - worked).eq(0.0));
        out.push((Expression::from(m.w_max) - m.w[p]).geq(0.0));
        out.push((Expression::from(m.w[p]) - m.w_min).geq(0.0));
    }

    // Y >= X[h] + X[h+1] - 1
    for p in 0..np {
        for t in 0..nt {
            for h in 0..nh.saturating_sub(1) {
                let linked =
                    Expression::from(m.y.at(p, t, h)) - m.x.at(p, t, h) - m.x.at(p, t, h + 1);
                out.push(linked.geq(-1.0));
            }
        }
    }

    // S >= on_duty(h) - on_duty(h-1)
    for p in 0..np {
        for h in 1..nh {
            let start =
                Expression::from(m.s.at(p, h - 1)) - on_duty(m, p, h) + on_duty(m, p, h - 1);
            out.push(start.geq(0.0));
        }
    }

    // U >= F - X
    for p in 0..np {
        for t in 0..nt {
            for h in 0..nh {
                let fixed = if problem.is_fixed(p, t, h) { 1.0 } else { 0.0 };
                let honored = Expression::from(m.u.at(p, t, h)) + m.x.at(p, t, h);
                out.push(honored.geq(fixed));
            }
        }
    }

    out
}
