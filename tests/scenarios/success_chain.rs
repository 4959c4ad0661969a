//! Test: Success Chain - every step succeeds and the value threads through

use crate::helpers::*;
use serde_json::json;
use stepline::{OperationContainer, Pipeline, Runner, StepReturn};

/// All four adapter kinds succeed; the tee effect is observed exactly once
#[test]
fn test_full_success_run() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);

    let outcome = Runner::new(&pipeline).call(jane()).unwrap();

    assert_success(&outcome, &jane());
    assert_eq!(store.records(), vec![jane()]);
}

/// Re-invoking the same runner repeats the tee effect - no memoization
#[test]
fn test_repeat_invocation_repeats_side_effects() {
    let store = RecordedStore::new();
    let pipeline = user_pipeline(&store);
    let runner = Runner::new(&pipeline);

    let first = runner.call(jane()).unwrap();
    let second = runner.call(jane()).unwrap();

    assert_success(&first, &jane());
    assert_success(&second, &jane());
    assert_eq!(store.len(), 2);
}

/// A pipeline with zero steps returns its input unchanged
#[test]
fn test_zero_step_pipeline_is_identity() {
    let pipeline = Pipeline::builder("noop", OperationContainer::new()).build();

    let outcome = Runner::new(&pipeline).call(jane()).unwrap();

    assert_success(&outcome, &jane());
}

/// Map output feeds the next step; the tee step's return value is discarded
#[test]
fn test_value_threads_between_steps() {
    let log = RecordedStore::new();
    let tee_log = log.clone();

    let container = OperationContainer::new()
        .register("enrich", |mut input: serde_json::Value| {
            input["active"] = json!(true);
            StepReturn::Value(input)
        })
        .register("announce", move |input: serde_json::Value| {
            tee_log.save(&input);
            // A tee operation's return value must not replace the input
            StepReturn::Value(json!("ignored"))
        });

    let pipeline = Pipeline::builder("enrichment", container)
        .map("enrich")
        .tee("announce")
        .build();

    let outcome = Runner::new(&pipeline).call(json!({ "name": "Jane" })).unwrap();

    let enriched = json!({ "name": "Jane", "active": true });
    assert_success(&outcome, &enriched);
    assert_eq!(log.records(), vec![enriched]);
}
