//! Solve outcome handed to presentation and export collaborators

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{HourSlot, PersonId, TaskId};

/// Terminal state of a solve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal within the time limit
    Optimal,
    /// Feasible incumbent found, optimality unproven when the limit fired
    FeasibleTimeout,
    /// No assignment satisfies the hard constraints
    Infeasible,
    /// Solver failure
    Error,
}

impl SolveStatus {
    /// Whether this status carries a schedule
    pub fn has_schedule(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::FeasibleTimeout)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::FeasibleTimeout => "FeasibleTimeout",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedule and workload produced by a solve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingSolution {
    pub status: SolveStatus,
    /// Objective at the returned point; absent without a schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<f64>,
    /// Person → active hour index → task, `None` when idle
    pub assignment: BTreeMap<PersonId, BTreeMap<u8, Option<TaskId>>>,
    /// Person → hours worked
    pub workload: BTreeMap<PersonId, i64>,
    /// `max_load - min_load`
    pub load_spread: i64,
    /// Rounded upper workload bound
    #[serde(default)]
    pub max_load: i64,
    /// Rounded lower workload bound
    #[serde(default)]
    pub min_load: i64,
}

impl StaffingSolution {
    /// Payload for outcomes that produce no schedule
    pub fn without_schedule(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignment: BTreeMap::new(),
            workload: BTreeMap::new(),
            load_spread: 0,
            max_load: 0,
            min_load: 0,
        }
    }

    pub fn has_schedule(&self) -> bool {
        self.status.has_schedule()
    }

    /// Task a person works at an hour, if any
    pub fn task_at(&self, person: &str, hour: HourSlot) -> Option<&str> {
        self.assignment
            .get(person)
            .and_then(|row| row.get(&hour.index()))
            .and_then(|task| task.as_deref())
    }

    pub fn workload_of(&self, person: &str) -> Option<i64> {
        self.workload.get(person).copied()
    }

    /// Number of people on `task` at `hour`
    pub fn head_count(&self, task: &str, hour: HourSlot) -> usize {
        self.assignment
            .values()
            .filter(|row| row.get(&hour.index()).and_then(Option::as_deref) == Some(task))
            .count()
    }
}
