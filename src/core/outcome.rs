//! Outcome - the result value steps and the pipeline communicate with

use std::fmt;

/// Boxed error type raised by operations and carried by failures
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a step or of a whole pipeline call
///
/// A value is exactly one of `Success` or `Failure`, never both. A
/// `Failure` additionally carries the name of the step that produced it,
/// which drives matcher dispatch.
#[derive(Debug)]
pub enum Outcome<T, E = StepError> {
    /// The step (or pipeline) produced a value
    Success(T),

    /// The step (or pipeline) failed
    Failure {
        /// The failure payload
        error: E,

        /// Name of the step that produced the failure, if any
        origin: Option<String>,
    },
}

impl<T, E> Outcome<T, E> {
    /// Construct a success carrying `value`
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Construct an untagged failure carrying `error`
    pub fn failure(error: E) -> Self {
        Outcome::Failure {
            error,
            origin: None,
        }
    }

    /// Check whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Check whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// The origin tag of a failure, if present
    pub fn origin(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { origin, .. } => origin.as_deref(),
        }
    }

    /// Re-tag a failure with the given origin; a success is returned unchanged
    pub fn with_origin(self, origin: impl Into<String>) -> Self {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure { error, .. } => Outcome::Failure {
                error,
                origin: Some(origin.into()),
            },
        }
    }

    /// Extract the success payload
    ///
    /// Panics if the outcome is a failure: reading the wrong variant is a
    /// programming error, not a recoverable condition.
    pub fn unwrap_success(self) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure { error, origin } => panic!(
                "called unwrap_success on a failure (origin: {:?}): {:?}",
                origin, error
            ),
        }
    }

    /// Extract the failure payload
    ///
    /// Panics if the outcome is a success.
    pub fn unwrap_failure(self) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Outcome::Success(value) => panic!(
                "called unwrap_failure on a success: {:?}",
                value
            ),
            Outcome::Failure { error, .. } => error,
        }
    }
}
