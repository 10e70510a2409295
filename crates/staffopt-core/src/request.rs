//! Staffing request: the raw, sparse configuration handed to the engine
//!
//! This is also the persisted record. Hour keys are catalog indices; they
//! are written as JSON strings on the wire and read back as integers, which
//! `serde_json` does for integer map keys in both directions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ConfigurationError, PersonId, TaskId};

/// Person → hour → 0|1
pub type AvailabilityMap = BTreeMap<PersonId, BTreeMap<u8, u8>>;
/// Person → task → 0|1
pub type QualificationMap = BTreeMap<PersonId, BTreeMap<TaskId, u8>>;
/// Task → hour → head count
pub type RequirementMap = BTreeMap<TaskId, BTreeMap<u8, u32>>;
/// Person → task → hour → 0|1
pub type FixedMap = BTreeMap<PersonId, BTreeMap<TaskId, BTreeMap<u8, u8>>>;

pub const DEFAULT_EQUITY: f64 = 1.0;
pub const DEFAULT_CONTINUITY: f64 = 0.3;
pub const DEFAULT_SWITCH: f64 = 0.5;
pub const DEFAULT_FIXED: f64 = 10.0;
pub const DEFAULT_TIME_LIMIT_SECS: i64 = 60;

// ============================================================================
// Weights
// ============================================================================

/// Objective weights and the solver time budget
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Penalty on the spread between the heaviest and lightest workload
    #[serde(rename = "alpha", default = "default_equity")]
    pub equity: f64,
    /// Penalty per person staying on the same task across consecutive hours
    #[serde(rename = "beta", default = "default_continuity")]
    pub continuity: f64,
    /// Penalty per shift start (idle at one hour, working at the next)
    #[serde(rename = "gamma", default = "default_switch")]
    pub switching: f64,
    /// Penalty per mandatory assignment left unhonored
    #[serde(rename = "epsilon", default = "default_fixed")]
    pub fixed_violation: f64,
    /// Wall-clock budget for the solver, in seconds
    #[serde(rename = "timelimit", default = "default_time_limit")]
    pub time_limit_secs: i64,
}

fn default_equity() -> f64 {
    DEFAULT_EQUITY
}

fn default_continuity() -> f64 {
    DEFAULT_CONTINUITY
}

fn default_switch() -> f64 {
    DEFAULT_SWITCH
}

fn default_fixed() -> f64 {
    DEFAULT_FIXED
}

fn default_time_limit() -> i64 {
    DEFAULT_TIME_LIMIT_SECS
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            equity: DEFAULT_EQUITY,
            continuity: DEFAULT_CONTINUITY,
            switching: DEFAULT_SWITCH,
            fixed_violation: DEFAULT_FIXED,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

impl Weights {
    pub fn new(equity: f64, continuity: f64, switching: f64, fixed_violation: f64) -> Self {
        Self {
            equity,
            continuity,
            switching,
            fixed_violation,
            ..Self::default()
        }
    }

    /// Set the solver time budget
    pub fn time_limit(mut self, seconds: i64) -> Self {
        self.time_limit_secs = seconds;
        self
    }

    /// Named view of the four objective weights, in objective order
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("alpha", self.equity),
            ("beta", self.continuity),
            ("gamma", self.switching),
            ("epsilon", self.fixed_violation),
        ]
    }

    /// Reject negative or non-finite weights and a time limit below one second.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in self.named() {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteWeight { name });
            }
            if value < 0.0 {
                return Err(ConfigurationError::NegativeWeight { name, value });
            }
        }
        if self.time_limit_secs < 1 {
            return Err(ConfigurationError::NonPositiveTimeLimit(self.time_limit_secs));
        }
        Ok(())
    }
}

// ============================================================================
// Request
// ============================================================================

/// A complete staffing configuration, as entered or as persisted
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestRecord", into = "RequestRecord")]
pub struct StaffingRequest {
    pub people: Vec<PersonId>,
    pub tasks: Vec<TaskId>,
    /// Active catalog indices
    pub hours: Vec<u8>,
    /// Availability, default 1
    pub availability: AvailabilityMap,
    /// Qualification, default 1
    pub qualification: QualificationMap,
    /// Required head count, default 0
    pub requirement: RequirementMap,
    /// Mandatory assignments, default 0
    pub fixed: FixedMap,
    pub weights: Weights,
}

/// Flat on-disk layout with the weights beside the matrices.
/// `#[serde(flatten)]` cannot read the integer hour keys back.
#[derive(Clone, Serialize, Deserialize)]
struct RequestRecord {
    #[serde(default)]
    people: Vec<PersonId>,
    #[serde(default)]
    tasks: Vec<TaskId>,
    #[serde(default)]
    hours: Vec<u8>,
    #[serde(rename = "D", default)]
    availability: AvailabilityMap,
    #[serde(rename = "Q", default)]
    qualification: QualificationMap,
    #[serde(rename = "R", default)]
    requirement: RequirementMap,
    #[serde(rename = "F", default)]
    fixed: FixedMap,
    #[serde(default = "default_equity")]
    alpha: f64,
    #[serde(default = "default_continuity")]
    beta: f64,
    #[serde(default = "default_switch")]
    gamma: f64,
    #[serde(default = "default_fixed")]
    epsilon: f64,
    #[serde(default = "default_time_limit")]
    timelimit: i64,
}

impl From<RequestRecord> for StaffingRequest {
    fn from(r: RequestRecord) -> Self {
        Self {
            people: r.people,
            tasks: r.tasks,
            hours: r.hours,
            availability: r.availability,
            qualification: r.qualification,
            requirement: r.requirement,
            fixed: r.fixed,
            weights: Weights::new(r.alpha, r.beta, r.gamma, r.epsilon).time_limit(r.timelimit),
        }
    }
}

impl From<StaffingRequest> for RequestRecord {
    fn from(r: StaffingRequest) -> Self {
        let w = r.weights;
        Self {
            people: r.people,
            tasks: r.tasks,
            hours: r.hours,
            availability: r.availability,
            qualification: r.qualification,
            requirement: r.requirement,
            fixed: r.fixed,
            alpha: w.equity,
            beta: w.continuity,
            gamma: w.switching,
            epsilon: w.fixed_violation,
            timelimit: w.time_limit_secs,
        }
    }
}

impl StaffingRequest {
    pub fn new<P, T>(
        people: impl IntoIterator<Item = P>,
        tasks: impl IntoIterator<Item = T>,
        hours: impl IntoIterator<Item = u8>,
    ) -> Self
    where
        P: Into<PersonId>,
        T: Into<TaskId>,
    {
        Self {
            people: people.into_iter().map(Into::into).collect(),
            tasks: tasks.into_iter().map(Into::into).collect(),
            hours: hours.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set availability for one person at one hour
    pub fn with_availability(mut self, person: &str, hour: u8, available: bool) -> Self {
        self.availability
            .entry(person.to_string())
            .or_default()
            .insert(hour, u8::from(available));
        self
    }

    /// Set whether a person may perform a task
    pub fn with_qualification(mut self, person: &str, task: &str, qualified: bool) -> Self {
        self.qualification
            .entry(person.to_string())
            .or_default()
            .insert(task.to_string(), u8::from(qualified));
        self
    }

    /// Set the head count a task needs at an hour
    pub fn with_requirement(mut self, task: &str, hour: u8, count: u32) -> Self {
        self.requirement
            .entry(task.to_string())
            .or_default()
            .insert(hour, count);
        self
    }

    /// Mark a person/task/hour assignment as mandatory
    pub fn with_fixed(mut self, person: &str, task: &str, hour: u8) -> Self {
        self.fixed
            .entry(person.to_string())
            .or_default()
            .entry(task.to_string())
            .or_default()
            .insert(hour, 1);
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }
}
