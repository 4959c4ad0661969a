//! Outcome matcher - optional post-call handler dispatch

use crate::core::outcome::{Outcome, StepError};
use std::collections::HashMap;

type SuccessHandler<'a, T> = Box<dyn Fn(&T) + 'a>;
type FailureHandler<'a> = Box<dyn Fn(&StepError) + 'a>;

/// Handler registrations for a call's terminal outcome
///
/// Holds one optional success handler, failure handlers keyed by origin
/// step name, and at most one catch-all failure handler. Dispatch invokes
/// exactly one handler: the success handler for a success; for a failure,
/// the handler registered for its origin tag, else the catch-all, else
/// nothing. The matcher never alters the outcome a call returns.
pub struct OutcomeMatcher<'a, T> {
    on_success: Option<SuccessHandler<'a, T>>,
    on_failure: HashMap<String, FailureHandler<'a>>,
    catch_all: Option<FailureHandler<'a>>,
}

impl<'a, T> OutcomeMatcher<'a, T> {
    /// Create a matcher with no handlers
    pub fn new() -> Self {
        OutcomeMatcher {
            on_success: None,
            on_failure: HashMap::new(),
            catch_all: None,
        }
    }

    /// Register the success handler, replacing any previous one
    pub fn on_success<F>(mut self, handler: F) -> Self
    where
        F: Fn(&T) + 'a,
    {
        self.on_success = Some(Box::new(handler));
        self
    }

    /// Register a handler for failures originating from `origin`
    pub fn on_failure_from<F>(mut self, origin: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&StepError) + 'a,
    {
        self.on_failure.insert(origin.into(), Box::new(handler));
        self
    }

    /// Register the catch-all failure handler, replacing any previous one
    ///
    /// Runs for failures whose origin has no specific handler, including
    /// failures with no origin tag at all.
    pub fn on_any_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StepError) + 'a,
    {
        self.catch_all = Some(Box::new(handler));
        self
    }

    /// Invoke exactly one matching handler for `outcome`
    pub fn dispatch(&self, outcome: &Outcome<T>) {
        match outcome {
            Outcome::Success(value) => {
                if let Some(handler) = &self.on_success {
                    handler(value);
                }
            }
            Outcome::Failure { error, origin } => {
                let specific = origin.as_deref().and_then(|o| self.on_failure.get(o));
                if let Some(handler) = specific.or(self.catch_all.as_ref()) {
                    handler(error);
                }
            }
        }
    }
}

impl<'a, T> Default for OutcomeMatcher<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
