//! Round-trip fidelity between the dense problem and its persisted form
//!
//! Normalizing a request, writing it out, reading it back and normalizing
//! again must give the same dense structure.

use pretty_assertions::assert_eq;
use staffopt_core::store::{load_request, save_request};
use staffopt_core::{normalize, StaffingRequest, Weights};
use tempfile::tempdir;

fn night_shift() -> StaffingRequest {
    StaffingRequest::new(["Ana", "Ben", "Caro"], ["Desk", "Phone", "Rounds"], [6, 7, 8, 9])
        .with_availability("Ana", 8, false)
        .with_availability("Caro", 6, false)
        .with_qualification("Ben", "Rounds", false)
        .with_requirement("Desk", 6, 1)
        .with_requirement("Desk", 7, 1)
        .with_requirement("Phone", 8, 2)
        .with_requirement("Rounds", 9, 1)
        .with_fixed("Caro", "Rounds", 9)
        .with_weights(Weights::new(2.0, 0.1, 0.25, 8.0).time_limit(15))
}

#[test]
fn json_string_round_trip_preserves_dense_problem() {
    let first = normalize(&night_shift()).unwrap();

    let json = serde_json::to_string(&first.to_request()).unwrap();
    let reread: StaffingRequest = serde_json::from_str(&json).unwrap();
    let second = normalize(&reread).unwrap();

    assert_eq!(first, second);
}

#[test]
fn file_round_trip_preserves_dense_problem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("night.json");

    let first = normalize(&night_shift()).unwrap();
    save_request(&path, &first.to_request()).unwrap();
    let second = normalize(&load_request(&path).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn persisted_hour_keys_are_strings() {
    let problem = normalize(&night_shift()).unwrap();
    let value = serde_json::to_value(problem.to_request()).unwrap();

    let d_ana = value["D"]["Ana"].as_object().unwrap();
    let keys: Vec<&str> = d_ana.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["6", "7", "8", "9"]);
    assert_eq!(value["D"]["Ana"]["8"], 0);
    assert_eq!(value["F"]["Caro"]["Rounds"]["9"], 1);
    assert_eq!(value["F"]["Ana"]["Desk"]["6"], 0);
}

#[test]
fn dense_form_is_a_fixed_point() {
    let dense = normalize(&night_shift()).unwrap().to_request();
    let again = normalize(&dense).unwrap().to_request();
    assert_eq!(dense, again);
}
