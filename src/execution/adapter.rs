//! Step adapters - normalize raw operation returns into outcomes
//!
//! One normalization rule per adapter kind. Every failure produced here
//! is tagged with the step's name as its origin.

use crate::core::outcome::{Outcome, StepError};
use crate::core::registry::DelegateMissing;
use crate::core::step::{AdapterKind, StepReturn, StepSpec};
use crate::execution::error::EngineError;
use tracing::debug;

/// Normalize the raw return of a non-tee step
pub(crate) fn normalize<T>(spec: &StepSpec, raw: StepReturn<T>) -> Result<Outcome<T>, EngineError> {
    match spec.adapter_kind {
        AdapterKind::Map => match raw {
            StepReturn::Value(value) => Ok(Outcome::success(value)),
            StepReturn::Raised(error) => raised(spec, error),
            _ => invalid(spec, "a plain value"),
        },
        AdapterKind::Guard => match raw {
            StepReturn::Outcome(outcome) => Ok(tag(spec, outcome)),
            StepReturn::Raised(error) => raised(spec, error),
            _ => invalid(spec, "an Outcome"),
        },
        AdapterKind::Try => match raw {
            StepReturn::Value(value) => Ok(Outcome::success(value)),
            StepReturn::Raised(error) => raised(spec, error),
            _ => invalid(spec, "a plain value or a raised error"),
        },
        AdapterKind::Tee => unreachable!("tee steps are normalized with normalize_tee"),
    }
}

/// Normalize a tee step: the raw return is discarded and the original
/// input flows onward, unless the operation raised
pub(crate) fn normalize_tee<T>(
    spec: &StepSpec,
    raw: StepReturn<T>,
    input: T,
) -> Result<Outcome<T>, EngineError> {
    match raw {
        StepReturn::Raised(error) => raised(spec, error),
        _ => Ok(Outcome::success(input)),
    }
}

/// Tag an outcome produced inside a step with the step's name
fn tag<T>(spec: &StepSpec, outcome: Outcome<T>) -> Outcome<T> {
    if outcome.is_failure() {
        outcome.with_origin(spec.name.as_str())
    } else {
        outcome
    }
}

/// Classify a raised error: a delegate miss is a missing operation, a
/// declared catch on a try step converts it into a failure, anything else
/// is fatal
fn raised<T>(spec: &StepSpec, error: StepError) -> Result<Outcome<T>, EngineError> {
    let error = match error.downcast::<DelegateMissing>() {
        Ok(missing) => {
            return Err(EngineError::MissingOperation {
                step: spec.name.clone(),
                key: missing.key,
            })
        }
        Err(error) => error,
    };

    if spec.adapter_kind == AdapterKind::Try {
        if let Some(catch) = &spec.catch {
            if catch.matches(&error) {
                debug!(step = %spec.name, kind = catch.kind_name(), "caught declared error");
                return Ok(Outcome::failure(error).with_origin(spec.name.as_str()));
            }
        }
    }

    Err(EngineError::UnexpectedError {
        step: spec.name.clone(),
        source: error,
    })
}

fn invalid<T>(spec: &StepSpec, expected: &'static str) -> Result<Outcome<T>, EngineError> {
    Err(EngineError::InvalidStepResult {
        step: spec.name.clone(),
        kind: spec.adapter_kind,
        expected,
    })
}
