//! # staffopt-core
//!
//! Core domain model and traits for the staffopt staffing engine.
//!
//! This crate provides:
//! - The hour-slot catalog (`HourSlot`)
//! - The sparse request record (`StaffingRequest`, `Weights`)
//! - The data normalizer producing a dense `NormalizedProblem`
//! - The solve outcome (`StaffingSolution`, `SolveStatus`)
//! - Core traits: `Staffer`, `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use staffopt_core::{normalize, StaffingRequest};
//!
//! let request = StaffingRequest::new(["Ana", "Ben"], ["Desk"], [0, 1, 2])
//!     .with_availability("Ben", 2, false)
//!     .with_requirement("Desk", 0, 1);
//!
//! let problem = normalize(&request).unwrap();
//! assert!(!problem.is_available(1, 2));
//! assert_eq!(problem.required(0, 0), 1);
//! ```

pub mod dense;
pub mod hours;
pub mod normalize;
pub mod request;
pub mod solution;
pub mod store;

pub use dense::{Grid2, Grid3};
pub use hours::{HourSlot, CATALOG_LEN, CLOCK_HOURS};
pub use normalize::{normalize, NormalizedProblem};
pub use request::{StaffingRequest, Weights};
pub use solution::{SolveStatus, StaffingSolution};

use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier of a person
pub type PersonId = String;

/// Identifier of a task
pub type TaskId = String;

/// One of the three model axes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    People,
    Tasks,
    Hours,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Axis::People => "people",
            Axis::Tasks => "tasks",
            Axis::Hours => "active hours",
        })
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Core staffing abstraction
pub trait Staffer: Send + Sync {
    /// Compute a schedule for a normalized problem.
    ///
    /// `Infeasible` and `FeasibleTimeout` are returned as solutions with the
    /// matching status; only solver failures are errors.
    fn solve(&self, problem: &NormalizedProblem) -> Result<StaffingSolution, StaffingError>;

    /// Cheap necessary-condition check that runs without the solver
    fn precheck(&self, problem: &NormalizedProblem) -> FeasibilityReport;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a solution to the output format
    fn render(
        &self,
        problem: &NormalizedProblem,
        solution: &StaffingSolution,
    ) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of the coverage pre-check
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeasibilityReport {
    pub shortfalls: Vec<Shortfall>,
}

impl FeasibilityReport {
    /// No necessary condition is violated
    pub fn is_clear(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// A requirement that cannot be met by the eligible staff
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shortfall {
    /// Fewer people are available and qualified for a task than it needs
    Task {
        task: TaskId,
        hour: HourSlot,
        required: u32,
        eligible: u32,
    },
    /// Total demand at an hour exceeds the people available then
    Hour {
        hour: HourSlot,
        required: u64,
        available: u32,
    },
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shortfall::Task {
                task,
                hour,
                required,
                eligible,
            } => write!(
                f,
                "{task} at {hour} needs {required} but only {eligible} eligible"
            ),
            Shortfall::Hour {
                hour,
                required,
                available,
            } => write!(
                f,
                "{hour} needs {required} in total but only {available} available"
            ),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Malformed or empty input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No {0} given")]
    EmptyAxis(Axis),

    #[error("Duplicate identifier in {axis}: {id}")]
    DuplicateIdentifier { axis: Axis, id: String },

    #[error("Hour slot {0} is outside the catalog")]
    UnknownHourSlot(u8),

    #[error("Matrix {matrix} holds {value}, expected 0 or 1")]
    InvalidFlag { matrix: &'static str, value: u8 },

    #[error("Matrix {matrix} does not match the problem axes")]
    ShapeMismatch { matrix: &'static str },
}

/// Unusable weights or time limit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Weight {name} must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("Weight {name} must be a finite number")]
    NonFiniteWeight { name: &'static str },

    #[error("Time limit must be at least 1 second, got {0}")]
    NonPositiveTimeLimit(i64),
}

/// Staffing error
#[derive(Debug, Error)]
pub enum StaffingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Solver assigned {person} to more than one task at {hour}")]
    InconsistentAssignment { person: PersonId, hour: HourSlot },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_problem() {
        let err = StaffingError::from(ValidationError::EmptyAxis(Axis::Hours));
        assert_eq!(err.to_string(), "Validation error: No active hours given");

        let err = StaffingError::from(ConfigurationError::NegativeWeight {
            name: "alpha",
            value: -1.0,
        });
        assert!(err.to_string().contains("alpha"));

        let err = StaffingError::InconsistentAssignment {
            person: "Ana".into(),
            hour: HourSlot::new(8).unwrap(),
        };
        assert!(err.to_string().contains("Ana"));
        assert!(err.to_string().contains("00h"));
    }

    #[test]
    fn shortfall_display() {
        let s = Shortfall::Task {
            task: "Desk".into(),
            hour: HourSlot::new(0).unwrap(),
            required: 2,
            eligible: 1,
        };
        assert_eq!(s.to_string(), "Desk at 16h needs 2 but only 1 eligible");
        assert!(FeasibilityReport::default().is_clear());
    }
}
