//! stepline - a business-operation pipeline library with pluggable step adapters
//!
//! A pipeline is an ordered sequence of named steps declared once against
//! an operation container; running it is a single call that threads the
//! input value through each step, short-circuits on the first failure,
//! and tags that failure with the step that produced it. Heterogeneous
//! step semantics (transform, guard, catch-a-declared-error, side effect)
//! are normalized by per-step adapters into one `Outcome` contract, and
//! an optional matcher dispatches the terminal outcome to per-origin
//! handlers.

pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{
    catch, AdapterKind, CatchSpec, Delegate, Dependencies, Operation, OperationContainer,
    Outcome, Pipeline, PipelineBuilder, Resolvable, StepError, StepReturn, StepSpec,
};
pub use execution::{EngineError, OutcomeMatcher, Runner};
