//! Engine error taxonomy - fatal conditions that abort a call

use crate::core::outcome::StepError;
use crate::core::step::AdapterKind;
use thiserror::Error;

/// Fatal errors surfaced by a pipeline call
///
/// These are programming defects, never ordinary business failures; a
/// failing step produces an `Outcome::Failure` return value instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No resolution source had an operation for the step's key
    #[error("no operation registered for step '{step}' (key '{key}')")]
    MissingOperation {
        /// Step that was being executed
        step: String,
        /// Key the resolver looked for
        key: String,
    },

    /// An operation raised an error no declared catch intercepts
    #[error("step '{step}' raised an undeclared error: {source}")]
    UnexpectedError {
        /// Step whose operation raised
        step: String,
        /// The raised error
        #[source]
        source: StepError,
    },

    /// An operation returned a value its adapter kind does not accept
    ///
    /// A usage error on the step author's side, distinct from both fatal
    /// cases above; it cannot be checked earlier because operations are
    /// late-bound.
    #[error("step '{step}' ({kind:?} adapter) returned an invalid result, expected {expected}")]
    InvalidStepResult {
        /// Step whose operation misbehaved
        step: String,
        /// The step's declared adapter kind
        kind: AdapterKind,
        /// What the adapter would have accepted
        expected: &'static str,
    },
}
