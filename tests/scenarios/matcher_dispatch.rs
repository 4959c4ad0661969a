//! Test: Matcher Dispatch - exactly one handler per call

use crate::helpers::*;
use serde_json::Value;
use std::cell::Cell;
use stepline::{OutcomeMatcher, Runner};

/// A matcher with only a catch-all invokes the catch-all
#[test]
fn test_catch_all_handles_tagged_failure() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);
    let any = Cell::new(0);

    let matcher = OutcomeMatcher::new().on_any_failure(|_| any.set(any.get() + 1));
    let outcome = Runner::new(&pipeline)
        .call_with_matcher(jane_without_email(), &matcher)
        .unwrap();

    assert!(outcome.is_failure());
    assert_eq!(any.get(), 1);
}

/// With both a "validate"-specific and a catch-all handler, only the
/// specific one runs
#[test]
fn test_specific_handler_wins_over_catch_all() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);
    let specific = Cell::new(0);
    let any = Cell::new(0);

    let matcher = OutcomeMatcher::new()
        .on_failure_from("validate", |error| {
            assert!(error.downcast_ref::<NotValidError>().is_some());
            specific.set(specific.get() + 1);
        })
        .on_any_failure(|_| any.set(any.get() + 1));

    Runner::new(&pipeline)
        .call_with_matcher(jane_without_email(), &matcher)
        .unwrap();

    assert_eq!(specific.get(), 1);
    assert_eq!(any.get(), 0);
}

/// A handler for an unrelated step does not match; the catch-all runs
#[test]
fn test_unrelated_handler_falls_to_catch_all() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);
    let unrelated = Cell::new(0);
    let any = Cell::new(0);

    let matcher = OutcomeMatcher::new()
        .on_failure_from("other_step", |_| unrelated.set(unrelated.get() + 1))
        .on_any_failure(|_| any.set(any.get() + 1));

    Runner::new(&pipeline)
        .call_with_matcher(jane_without_email(), &matcher)
        .unwrap();

    assert_eq!(unrelated.get(), 0);
    assert_eq!(any.get(), 1);
}

/// A success invokes the success handler with the unwrapped payload
#[test]
fn test_success_handler_receives_payload() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);
    let hits = Cell::new(0);

    let matcher = OutcomeMatcher::new()
        .on_success(|value: &Value| {
            assert_eq!(value, &jane());
            hits.set(hits.get() + 1);
        })
        .on_any_failure(|_| panic!("no failure handler should run on success"));

    Runner::new(&pipeline).call_with_matcher(jane(), &matcher).unwrap();

    assert_eq!(hits.get(), 1);
}

/// The matcher is a side channel - the returned outcome is unchanged
#[test]
fn test_matcher_does_not_alter_the_outcome() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);

    let matcher = OutcomeMatcher::new().on_success(|_: &Value| {});
    let outcome = Runner::new(&pipeline).call_with_matcher(jane(), &matcher).unwrap();

    assert_success(&outcome, &jane());
}

/// With no registered handler matching, nothing runs and the outcome is
/// still returned
#[test]
fn test_no_matching_handler_is_silent() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);

    let matcher = OutcomeMatcher::new().on_success(|_: &Value| {
        panic!("success handler must not run on failure")
    });
    let outcome = Runner::new(&pipeline)
        .call_with_matcher(jane_without_email(), &matcher)
        .unwrap();

    assert_failure_from(&outcome, "validate");
}
