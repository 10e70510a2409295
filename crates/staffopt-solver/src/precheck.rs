//! Coverage pre-check
//!
//! Necessary conditions for feasibility that can be read straight off the
//! dense matrices: every task/hour needs enough people who are both
//! available and qualified, and each hour's total demand must fit within the
//! people available that hour. Passing the check does not prove
//! feasibility; the solver stays authoritative.

use staffopt_core::{FeasibilityReport, NormalizedProblem, Shortfall};

pub fn coverage_report(problem: &NormalizedProblem) -> FeasibilityReport {
    let mut shortfalls = Vec::new();

    for (h, &hour) in problem.hours.iter().enumerate() {
        let available = (0..problem.person_count())
            .filter(|&p| problem.is_available(p, h))
            .count() as u32;

        let mut demand = 0u64;
        for (t, task) in problem.tasks.iter().enumerate() {
            let required = problem.required(t, h);
            demand += u64::from(required);
            if required == 0 {
                continue;
            }
            let eligible = (0..problem.person_count())
                .filter(|&p| problem.is_available(p, h) && problem.is_qualified(p, t))
                .count() as u32;
            if eligible < required {
                shortfalls.push(Shortfall::Task {
                    task: task.clone(),
                    hour,
                    required,
                    eligible,
                });
            }
        }

        if demand > u64::from(available) {
            shortfalls.push(Shortfall::Hour {
                hour,
                required: demand,
                available,
            });
        }
    }

    FeasibilityReport { shortfalls }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use staffopt_core::{normalize, StaffingRequest};

    #[test]
    fn satisfiable_request_is_clear() {
        let req = StaffingRequest::new(["Ana", "Ben"], ["Desk"], [0, 1])
            .with_requirement("Desk", 0, 2)
            .with_requirement("Desk", 1, 1);
        let report = coverage_report(&normalize(&req).unwrap());
        assert!(report.is_clear());
    }

    #[test]
    fn task_shortfall_counts_only_eligible_people() {
        let req = StaffingRequest::new(["Ana", "Ben", "Caro"], ["Desk"], [0])
            .with_availability("Ben", 0, false)
            .with_qualification("Caro", "Desk", false)
            .with_requirement("Desk", 0, 2);
        let problem = normalize(&req).unwrap();
        let report = coverage_report(&problem);

        assert_eq!(
            report.shortfalls,
            vec![Shortfall::Task {
                task: "Desk".into(),
                hour: problem.hours[0],
                required: 2,
                eligible: 1,
            }]
        );
    }

    #[test]
    fn hour_shortfall_when_total_demand_exceeds_staff() {
        // each task alone is coverable, both together are not
        let req = StaffingRequest::new(["Ana"], ["Desk", "Phone"], [3])
            .with_requirement("Desk", 3, 1)
            .with_requirement("Phone", 3, 1);
        let problem = normalize(&req).unwrap();
        let report = coverage_report(&problem);

        assert_eq!(
            report.shortfalls,
            vec![Shortfall::Hour {
                hour: problem.hours[0],
                required: 2,
                available: 1,
            }]
        );
    }

    #[test]
    fn hour_demand_beyond_u32_is_still_reported() {
        let req = StaffingRequest::new(["Ana", "Ben"], ["Desk", "Phone"], [0])
            .with_requirement("Desk", 0, u32::MAX)
            .with_requirement("Phone", 0, 1);
        let problem = normalize(&req).unwrap();
        let report = coverage_report(&problem);

        assert_eq!(
            report.shortfalls,
            vec![
                Shortfall::Task {
                    task: "Desk".into(),
                    hour: problem.hours[0],
                    required: u32::MAX,
                    eligible: 2,
                },
                Shortfall::Hour {
                    hour: problem.hours[0],
                    required: u64::from(u32::MAX) + 1,
                    available: 2,
                },
            ]
        );
    }
}
