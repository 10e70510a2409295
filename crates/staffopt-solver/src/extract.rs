//! Result extraction and verification
//!
//! Solvers report binaries as floats that are only approximately 0 or 1.
//! A cell counts as assigned when its value is within `tolerance` of 1.
//! More than one assigned task for the same person and hour is reported as
//! [`StaffingError::InconsistentAssignment`] rather than resolved.

use staffopt_core::{HourSlot, NormalizedProblem, SolveStatus, StaffingError, StaffingSolution};
use std::collections::BTreeMap;

use crate::invoke::SolvedValues;

/// Default distance from 1.0 still read as "assigned"
pub const SNAP_TOLERANCE: f64 = 1e-4;

/// Build the schedule and workload from solved values.
pub fn extract(
    problem: &NormalizedProblem,
    status: SolveStatus,
    values: &SolvedValues,
    tolerance: f64,
) -> Result<StaffingSolution, StaffingError> {
    debug_assert!(status.has_schedule());

    let mut assignment = BTreeMap::new();
    let mut workload = BTreeMap::new();

    for (p, person) in problem.people.iter().enumerate() {
        let mut row = BTreeMap::new();
        for (h, hour) in problem.hours.iter().enumerate() {
            let mut on = (0..problem.task_count())
                .filter(|&t| values.x.at(p, t, h) >= 1.0 - tolerance);
            let task = on.next();
            if on.next().is_some() {
                return Err(StaffingError::InconsistentAssignment {
                    person: person.clone(),
                    hour: *hour,
                });
            }
            row.insert(hour.index(), task.map(|t| problem.tasks[t].clone()));
        }
        assignment.insert(person.clone(), row);
        workload.insert(person.clone(), values.w[p].round() as i64);
    }

    let max_load = values.w_max.round() as i64;
    let min_load = values.w_min.round() as i64;

    Ok(StaffingSolution {
        status,
        objective_value: Some(values.objective(&problem.weights)),
        assignment,
        workload,
        load_spread: max_load - min_load,
        max_load,
        min_load,
    })
}

/// A hard constraint broken by an extracted schedule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Unavailable { person: String, hour: HourSlot },
    Unqualified { person: String, task: String },
    Coverage { task: String, hour: HourSlot, required: u32, staffed: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Unavailable { person, hour } => {
                write!(f, "{person} scheduled at {hour} while unavailable")
            }
            Violation::Unqualified { person, task } => {
                write!(f, "{person} scheduled on {task} without qualification")
            }
            Violation::Coverage {
                task,
                hour,
                required,
                staffed,
            } => write!(f, "{task} at {hour} staffed {staffed}, required {required}"),
        }
    }
}

/// Re-check availability, qualification and exact coverage.
pub fn verify_schedule(
    problem: &NormalizedProblem,
    solution: &StaffingSolution,
) -> Result<(), Violation> {
    for (p, person) in problem.people.iter().enumerate() {
        for (h, &hour) in problem.hours.iter().enumerate() {
            let Some(task) = solution.task_at(person, hour) else {
                continue;
            };
            if !problem.is_available(p, h) {
                return Err(Violation::Unavailable {
                    person: person.clone(),
                    hour,
                });
            }
            let qualified = problem
                .task_index(task)
                .is_some_and(|t| problem.is_qualified(p, t));
            if !qualified {
                return Err(Violation::Unqualified {
                    person: person.clone(),
                    task: task.to_string(),
                });
            }
        }
    }

    for (t, task) in problem.tasks.iter().enumerate() {
        for (h, &hour) in problem.hours.iter().enumerate() {
            let required = problem.required(t, h);
            let staffed = solution.head_count(task, hour);
            if staffed != required as usize {
                return Err(Violation::Coverage {
                    task: task.clone(),
                    hour,
                    required,
                    staffed,
                });
            }
        }
    }

    Ok(())
}
