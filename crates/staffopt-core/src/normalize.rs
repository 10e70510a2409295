//! Data normalizer
//!
//! Turns a sparse [`StaffingRequest`] into a [`NormalizedProblem`]: dense
//! matrices over exactly people × tasks × active hours, with every missing
//! cell resolved to its default once.
//!
//! | Matrix | Axes | Default |
//! |--------|------|---------|
//! | availability | person × hour | available |
//! | qualification | person × task | qualified |
//! | requirement | task × hour | 0 |
//! | fixed | person × task × hour | not mandatory |

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::dense::{Grid2, Grid3};
use crate::request::{FixedMap, StaffingRequest, Weights};
use crate::{Axis, HourSlot, PersonId, StaffingError, TaskId, ValidationError};

/// Dense, validated input to the model builder
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedProblem {
    pub people: Vec<PersonId>,
    pub tasks: Vec<TaskId>,
    /// Active hours, ascending catalog order
    pub hours: Vec<HourSlot>,
    /// person × hour
    pub availability: Grid2<bool>,
    /// person × task
    pub qualification: Grid2<bool>,
    /// task × hour
    pub requirement: Grid2<u32>,
    /// person × task × hour
    pub fixed: Grid3<bool>,
    pub weights: Weights,
}

impl NormalizedProblem {
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn hour_count(&self) -> usize {
        self.hours.len()
    }

    pub fn person_index(&self, person: &str) -> Option<usize> {
        self.people.iter().position(|p| p == person)
    }

    pub fn task_index(&self, task: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t == task)
    }

    pub fn hour_index(&self, hour: HourSlot) -> Option<usize> {
        self.hours.binary_search(&hour).ok()
    }

    pub fn is_available(&self, p: usize, h: usize) -> bool {
        self.availability.at(p, h)
    }

    pub fn is_qualified(&self, p: usize, t: usize) -> bool {
        self.qualification.at(p, t)
    }

    pub fn required(&self, t: usize, h: usize) -> u32 {
        self.requirement.at(t, h)
    }

    pub fn is_fixed(&self, p: usize, t: usize, h: usize) -> bool {
        self.fixed.at(p, t, h)
    }

    /// Check axes and matrix shapes of a problem that may not have come
    /// from [`normalize`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (np, nt, nh) = (self.person_count(), self.task_count(), self.hour_count());
        for (axis, len) in [(Axis::People, np), (Axis::Tasks, nt), (Axis::Hours, nh)] {
            if len == 0 {
                return Err(ValidationError::EmptyAxis(axis));
            }
        }

        let shapes = [
            ("D", (self.availability.rows(), self.availability.cols()) == (np, nh)),
            ("Q", (self.qualification.rows(), self.qualification.cols()) == (np, nt)),
            ("R", (self.requirement.rows(), self.requirement.cols()) == (nt, nh)),
            ("F", self.fixed.dims() == (np, nt, nh)),
        ];
        match shapes.into_iter().find(|&(_, ok)| !ok) {
            Some((matrix, _)) => Err(ValidationError::ShapeMismatch { matrix }),
            None => Ok(()),
        }
    }

    /// Solver time budget in whole seconds (validated to be at least 1)
    pub fn time_limit_secs(&self) -> u64 {
        self.weights.time_limit_secs.max(1) as u64
    }

    /// Emit the fully dense request this problem was resolved to.
    ///
    /// Every cell is written explicitly, so normalizing the result again
    /// reproduces `self` exactly.
    pub fn to_request(&self) -> StaffingRequest {
        let hours: Vec<u8> = self.hours.iter().map(|h| h.index()).collect();

        let mut req = StaffingRequest::new(
            self.people.iter().cloned(),
            self.tasks.iter().cloned(),
            hours.iter().copied(),
        )
        .with_weights(self.weights);

        for (p, person) in self.people.iter().enumerate() {
            let row: BTreeMap<u8, u8> = hours
                .iter()
                .enumerate()
                .map(|(h, &idx)| (idx, u8::from(self.is_available(p, h))))
                .collect();
            req.availability.insert(person.clone(), row);

            let skills: BTreeMap<TaskId, u8> = self
                .tasks
                .iter()
                .enumerate()
                .map(|(t, task)| (task.clone(), u8::from(self.is_qualified(p, t))))
                .collect();
            req.qualification.insert(person.clone(), skills);
        }

        for (t, task) in self.tasks.iter().enumerate() {
            let row: BTreeMap<u8, u32> = hours
                .iter()
                .enumerate()
                .map(|(h, &idx)| (idx, self.required(t, h)))
                .collect();
            req.requirement.insert(task.clone(), row);
        }

        let mut fixed = FixedMap::new();
        for (p, person) in self.people.iter().enumerate() {
            let per_task = fixed.entry(person.clone()).or_default();
            for (t, task) in self.tasks.iter().enumerate() {
                let row: BTreeMap<u8, u8> = hours
                    .iter()
                    .enumerate()
                    .map(|(h, &idx)| (idx, u8::from(self.is_fixed(p, t, h))))
                    .collect();
                per_task.insert(task.clone(), row);
            }
        }
        req.fixed = fixed;

        req
    }
}

/// Normalize a request into dense form, validating axes, flags and weights.
pub fn normalize(request: &StaffingRequest) -> Result<NormalizedProblem, StaffingError> {
    let people = clean_identifiers(&request.people, Axis::People)?;
    let tasks = clean_identifiers(&request.tasks, Axis::Tasks)?;
    let hours = active_hours(&request.hours)?;

    request.weights.validate()?;
    let request = &trim_matrix_keys(request);

    let availability = Grid2::from_fn(people.len(), hours.len(), |p, h| {
        lookup(&request.availability, &people[p], hours[h])
    });
    let availability = resolve_flags(availability, "D")?;

    let qualification = Grid2::from_fn(people.len(), tasks.len(), |p, t| {
        request
            .qualification
            .get(&people[p])
            .and_then(|row| row.get(&tasks[t]))
            .copied()
    });
    let qualification = resolve_flags(qualification, "Q")?;

    let requirement = Grid2::from_fn(tasks.len(), hours.len(), |t, h| {
        request
            .requirement
            .get(&tasks[t])
            .and_then(|row| row.get(&hours[h].index()))
            .copied()
            .unwrap_or(0)
    });

    let dims = (people.len(), tasks.len(), hours.len());
    let mut fixed = Grid3::filled(dims, false);
    for (p, person) in people.iter().enumerate() {
        for (t, task) in tasks.iter().enumerate() {
            for (h, hour) in hours.iter().enumerate() {
                let raw = request
                    .fixed
                    .get(person)
                    .and_then(|by_task| by_task.get(task))
                    .and_then(|row| row.get(&hour.index()))
                    .copied();
                fixed.set(p, t, h, flag(raw, false, "F")?);
            }
        }
    }

    let ignored = ignored_entries(request, &people, &tasks, &hours);
    if ignored != IgnoredEntries::default() {
        debug!(
            people = ignored.people,
            tasks = ignored.tasks,
            hours = ignored.hours,
            "ignoring matrix entries outside the active axes"
        );
    }

    debug!(
        people = people.len(),
        tasks = tasks.len(),
        hours = hours.len(),
        "normalized staffing request"
    );

    Ok(NormalizedProblem {
        people,
        tasks,
        hours,
        availability,
        qualification,
        requirement,
        fixed,
        weights: request.weights,
    })
}

/// Trim identifiers, drop blanks, reject duplicates and an empty axis.
fn clean_identifiers(raw: &[String], axis: Axis) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for id in raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateIdentifier {
                axis,
                id: id.to_string(),
            });
        }
        out.push(id.to_string());
    }
    if out.is_empty() {
        return Err(ValidationError::EmptyAxis(axis));
    }
    Ok(out)
}

fn active_hours(raw: &[u8]) -> Result<Vec<HourSlot>, ValidationError> {
    let mut hours = raw
        .iter()
        .map(|&i| HourSlot::new(i))
        .collect::<Result<Vec<_>, _>>()?;
    hours.sort_unstable();
    hours.dedup();
    if hours.is_empty() {
        return Err(ValidationError::EmptyAxis(Axis::Hours));
    }
    Ok(hours)
}

fn lookup(
    map: &BTreeMap<PersonId, BTreeMap<u8, u8>>,
    person: &str,
    hour: HourSlot,
) -> Option<u8> {
    map.get(person).and_then(|row| row.get(&hour.index())).copied()
}

/// Resolve a 0/1 flag, defaulting when absent.
fn flag(raw: Option<u8>, default: bool, matrix: &'static str) -> Result<bool, ValidationError> {
    match raw {
        None => Ok(default),
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(value) => Err(ValidationError::InvalidFlag { matrix, value }),
    }
}

/// Resolve a grid of optional flags whose default is 1.
fn resolve_flags(
    raw: Grid2<Option<u8>>,
    matrix: &'static str,
) -> Result<Grid2<bool>, ValidationError> {
    let mut out = Grid2::filled(raw.rows(), raw.cols(), true);
    for r in 0..raw.rows() {
        for c in 0..raw.cols() {
            out.set(r, c, flag(*raw.get(r, c), true, matrix)?);
        }
    }
    Ok(out)
}

/// Copy of the request with every matrix key trimmed like the axes.
fn trim_matrix_keys(request: &StaffingRequest) -> StaffingRequest {
    fn trimmed<V: Clone>(map: &BTreeMap<String, V>) -> BTreeMap<String, V> {
        map.iter()
            .map(|(k, v)| (k.trim().to_string(), v.clone()))
            .collect()
    }

    StaffingRequest {
        availability: trimmed(&request.availability),
        qualification: request
            .qualification
            .iter()
            .map(|(person, row)| (person.trim().to_string(), trimmed(row)))
            .collect(),
        requirement: trimmed(&request.requirement),
        fixed: request
            .fixed
            .iter()
            .map(|(person, by_task)| (person.trim().to_string(), trimmed(by_task)))
            .collect(),
        ..request.clone()
    }
}

/// Matrix entries keyed outside the active axes
#[derive(Debug, Default, PartialEq, Eq)]
struct IgnoredEntries {
    people: usize,
    tasks: usize,
    hours: usize,
}

fn stray_hours<V>(row: &BTreeMap<u8, V>, known: &HashSet<u8>) -> usize {
    row.keys().filter(|h| !known.contains(h)).count()
}

fn ignored_entries(
    request: &StaffingRequest,
    people: &[String],
    tasks: &[String],
    hours: &[HourSlot],
) -> IgnoredEntries {
    let known_people: HashSet<&str> = people.iter().map(String::as_str).collect();
    let known_tasks: HashSet<&str> = tasks.iter().map(String::as_str).collect();
    let known_hours: HashSet<u8> = hours.iter().map(|h| h.index()).collect();
    let is_person = |p: &&String| known_people.contains(p.as_str());
    let is_task = |t: &&String| known_tasks.contains(t.as_str());

    let mut ignored = IgnoredEntries {
        people: request
            .availability
            .keys()
            .chain(request.qualification.keys())
            .chain(request.fixed.keys())
            .filter(|p| !is_person(p))
            .count(),
        tasks: request.requirement.keys().filter(|t| !is_task(t)).count(),
        hours: 0,
    };

    for (_, row) in request.availability.iter().filter(|(p, _)| is_person(p)) {
        ignored.hours += stray_hours(row, &known_hours);
    }
    for (_, row) in request.qualification.iter().filter(|(p, _)| is_person(p)) {
        ignored.tasks += row.keys().filter(|t| !is_task(t)).count();
    }
    for (_, row) in request.requirement.iter().filter(|(t, _)| is_task(t)) {
        ignored.hours += stray_hours(row, &known_hours);
    }
    for (_, by_task) in request.fixed.iter().filter(|(p, _)| is_person(p)) {
        for (task, row) in by_task {
            if is_task(&task) {
                ignored.hours += stray_hours(row, &known_hours);
            } else {
                ignored.tasks += 1;
            }
        }
    }
    ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigurationError;
    use pretty_assertions::assert_eq;

    fn base() -> StaffingRequest {
        StaffingRequest::new(["Ana", "Ben"], ["Desk", "Phone"], [0, 1, 2])
    }

    #[test]
    fn unspecified_cells_take_defaults() {
        let problem = normalize(&base()).unwrap();
        for p in 0..2 {
            for h in 0..3 {
                assert!(problem.is_available(p, h));
            }
            for t in 0..2 {
                assert!(problem.is_qualified(p, t));
                for h in 0..3 {
                    assert!(!problem.is_fixed(p, t, h));
                }
            }
        }
        for t in 0..2 {
            for h in 0..3 {
                assert_eq!(problem.required(t, h), 0);
            }
        }
    }

    #[test]
    fn explicit_cells_override_defaults() {
        let req = base()
            .with_availability("Ben", 2, false)
            .with_qualification("Ana", "Phone", false)
            .with_requirement("Desk", 1, 2)
            .with_fixed("Ana", "Desk", 0);
        let problem = normalize(&req).unwrap();

        assert!(!problem.is_available(1, 2));
        assert!(problem.is_available(1, 1));
        assert!(!problem.is_qualified(0, 1));
        assert_eq!(problem.required(0, 1), 2);
        assert!(problem.is_fixed(0, 0, 0));
        assert!(!problem.is_fixed(0, 0, 1));
    }

    #[test]
    fn identifiers_trimmed_and_blanks_dropped() {
        let mut req = base();
        req.people = vec!["  Ana ".into(), String::new(), "   ".into(), "Ben".into()];
        let problem = normalize(&req).unwrap();
        assert_eq!(problem.people, vec!["Ana".to_string(), "Ben".to_string()]);
    }

    #[test]
    fn hours_sorted_and_deduplicated() {
        let mut req = base();
        req.hours = vec![9, 2, 9, 0];
        let problem = normalize(&req).unwrap();
        let idx: Vec<u8> = problem.hours.iter().map(|h| h.index()).collect();
        assert_eq!(idx, vec![0, 2, 9]);
    }

    #[test]
    fn empty_axes_rejected() {
        let mut req = base();
        req.people = vec!["  ".into()];
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::EmptyAxis(Axis::People)))
        ));

        let mut req = base();
        req.tasks.clear();
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::EmptyAxis(Axis::Tasks)))
        ));

        let mut req = base();
        req.hours.clear();
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::EmptyAxis(Axis::Hours)))
        ));
    }

    #[test]
    fn duplicate_person_rejected() {
        let mut req = base();
        req.people.push(" Ana".into());
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::DuplicateIdentifier {
                axis: Axis::People,
                ..
            }))
        ));
    }

    #[test]
    fn unknown_hour_rejected() {
        let mut req = base();
        req.hours.push(42);
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::UnknownHourSlot(42)))
        ));
    }

    #[test]
    fn non_binary_flag_rejected() {
        let mut req = base();
        req.availability
            .entry("Ana".into())
            .or_default()
            .insert(1, 2);
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Validation(ValidationError::InvalidFlag {
                matrix: "D",
                value: 2
            }))
        ));
    }

    #[test]
    fn negative_weight_rejected_before_model() {
        let req = base().with_weights(Weights::new(1.0, 0.3, -1.0, 10.0));
        assert!(matches!(
            normalize(&req),
            Err(StaffingError::Configuration(ConfigurationError::NegativeWeight {
                name: "gamma",
                ..
            }))
        ));
    }

    #[test]
    fn entries_outside_axes_are_ignored() {
        let req = base()
            .with_availability("Zoe", 0, false)
            .with_requirement("Cleaning", 0, 3)
            .with_requirement("Desk", 16, 1);
        let problem = normalize(&req).unwrap();
        assert_eq!(problem.person_count(), 2);
        assert_eq!(problem.task_count(), 2);
        assert_eq!(problem.required(0, 0), 0);
    }

    #[test]
    fn matrix_keys_are_trimmed_like_identifiers() {
        let req = base()
            .with_availability(" Ana ", 1, false)
            .with_qualification("Ben ", " Phone", false)
            .with_requirement(" Desk", 2, 1)
            .with_fixed(" Ben", "Desk ", 0);
        let problem = normalize(&req).unwrap();

        assert!(!problem.is_available(0, 1));
        assert!(!problem.is_qualified(1, 1));
        assert_eq!(problem.required(0, 2), 1);
        assert!(problem.is_fixed(1, 0, 0));
    }

    #[test]
    fn ignored_entries_counted_per_axis() {
        let req = base()
            .with_availability("Zoe", 0, false)
            .with_availability("Ana", 7, false)
            .with_qualification("Ana", "Cleaning", true)
            .with_requirement("Cleaning", 0, 3)
            .with_requirement("Desk", 16, 1)
            .with_fixed("Ben", "Cleaning", 0)
            .with_fixed("Ben", "Desk", 5);
        let problem = normalize(&req).unwrap();

        let ignored = ignored_entries(&req, &problem.people, &problem.tasks, &problem.hours);
        assert_eq!(
            ignored,
            IgnoredEntries {
                people: 1,
                tasks: 3,
                hours: 3,
            }
        );

        let clean = ignored_entries(&base(), &problem.people, &problem.tasks, &problem.hours);
        assert_eq!(clean, IgnoredEntries::default());
    }

    #[test]
    fn validate_accepts_normalized_problem() {
        assert_eq!(normalize(&base()).unwrap().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_axis_and_bad_shapes() {
        let mut problem = normalize(&base()).unwrap();
        problem.tasks.clear();
        assert_eq!(
            problem.validate(),
            Err(ValidationError::EmptyAxis(Axis::Tasks))
        );

        let mut problem = normalize(&base()).unwrap();
        problem.requirement = Grid2::filled(2, 2, 0);
        assert_eq!(
            problem.validate(),
            Err(ValidationError::ShapeMismatch { matrix: "R" })
        );

        let mut problem = normalize(&base()).unwrap();
        problem.fixed = Grid3::filled((2, 2, 2), false);
        assert_eq!(
            problem.validate(),
            Err(ValidationError::ShapeMismatch { matrix: "F" })
        );
    }

    #[test]
    fn dense_request_renormalizes_identically() {
        let req = base()
            .with_availability("Ben", 2, false)
            .with_qualification("Ana", "Phone", false)
            .with_requirement("Desk", 1, 2)
            .with_fixed("Ben", "Phone", 0);
        let first = normalize(&req).unwrap();
        let second = normalize(&first.to_request()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn index_lookups() {
        let problem = normalize(&base()).unwrap();
        assert_eq!(problem.person_index("Ben"), Some(1));
        assert_eq!(problem.task_index("Phone"), Some(1));
        assert_eq!(problem.hour_index(HourSlot::new(2).unwrap()), Some(2));
        assert_eq!(problem.hour_index(HourSlot::new(5).unwrap()), None);
    }
}
