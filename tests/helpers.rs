//! Test utility functions for stepline

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use stepline::{catch, OperationContainer, Outcome, Pipeline, StepReturn};
use thiserror::Error;

/// Error raised by the validate operation
#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotValidError(pub String);

/// Error kind the pipelines under test never declare a catch for
#[derive(Debug, Error)]
#[error("storage unavailable")]
pub struct StorageError;

/// Records the values the persist step writes
#[derive(Default, Clone)]
pub struct RecordedStore {
    records: Arc<Mutex<Vec<Value>>>,
}

impl RecordedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a persisted value
    pub fn save(&self, value: &Value) {
        self.records.lock().unwrap().push(value.clone());
    }

    /// All recorded values, in write order
    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

/// Container with the user-record operations the scenarios share
///
/// `process` normalizes the record shape, `verify` returns an outcome
/// unchanged, `validate` raises `NotValidError` when the email is
/// missing, `persist` writes to the recorded store.
pub fn user_operations(store: &RecordedStore) -> OperationContainer<Value> {
    let store = store.clone();

    OperationContainer::new()
        .register("process", |input: Value| {
            let name = input.get("name").cloned().unwrap_or(Value::Null);
            let mut record = json!({ "name": name });
            if let Some(email) = input.get("email") {
                record["email"] = email.clone();
            }
            StepReturn::Value(record)
        })
        .register("verify", |input: Value| {
            StepReturn::Outcome(Outcome::success(input))
        })
        .register("validate", |input: Value| {
            if input.get("email").is_some() {
                StepReturn::Value(input)
            } else {
                StepReturn::raise(NotValidError("email required".to_string()))
            }
        })
        .register("persist", move |input: Value| {
            store.save(&input);
            StepReturn::Unit
        })
}

/// The four-step user-creation pipeline the scenarios share
pub fn user_pipeline(store: &RecordedStore) -> Pipeline<Value> {
    Pipeline::builder("create_user", user_operations(store))
        .map("process")
        .guard("verify")
        .try_step("validate", catch::<NotValidError>())
        .tee("persist")
        .build()
}

/// A complete input record
pub fn jane() -> Value {
    json!({ "name": "Jane", "email": "jane@doe.com" })
}

/// An input record with no email
pub fn jane_without_email() -> Value {
    json!({ "name": "Jane" })
}

/// Assert an outcome is a success carrying `expected`
pub fn assert_success(outcome: &Outcome<Value>, expected: &Value) {
    match outcome {
        Outcome::Success(value) => assert_eq!(value, expected),
        Outcome::Failure { error, origin } => panic!(
            "expected success, got failure from {:?}: {}",
            origin, error
        ),
    }
}

/// Assert an outcome is a failure tagged with `origin`
pub fn assert_failure_from(outcome: &Outcome<Value>, origin: &str) {
    match outcome {
        Outcome::Success(value) => panic!("expected failure, got success: {}", value),
        Outcome::Failure {
            origin: actual, ..
        } => assert_eq!(
            actual.as_deref(),
            Some(origin),
            "failure should be tagged with its origin step"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepline::Runner;

    #[test]
    fn test_user_pipeline_runs_clean_input() {
        let store = RecordedStore::new();
        let pipeline = user_pipeline(&store);

        let outcome = Runner::new(&pipeline).call(jane()).unwrap();

        assert_success(&outcome, &jane());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_recorded_store_tracks_writes() {
        let store = RecordedStore::new();
        assert!(store.is_empty());

        store.save(&jane());
        assert_eq!(store.records(), vec![jane()]);
    }
}
