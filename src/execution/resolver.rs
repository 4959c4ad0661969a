//! Operation resolution - precedence across dependencies, local overrides,
//! and the container

use crate::core::pipeline::{LocalOverride, Pipeline};
use crate::core::registry::{Delegate, Dependencies, Resolvable};
use crate::core::step::{Operation, StepReturn, StepSpec};
use crate::execution::error::EngineError;
use tracing::debug;

/// Resolves the callable each step actually invokes
///
/// Precedence, first match wins: per-instance dependencies, the
/// pipeline's local overrides (handed a delegate to the container entry
/// they shadow), the container itself. A miss everywhere is fatal - at
/// the step's first invocation, never at declaration time.
pub(crate) struct OperationResolver<'a, T> {
    pipeline: &'a Pipeline<T>,
    dependencies: &'a Dependencies<T>,
}

/// A resolved callable, ready to invoke with the current value
pub(crate) enum ResolvedOperation<'a, T> {
    /// An operation from the dependencies or the container
    Direct(Operation<T>),
    /// A local override plus its delegate to the container entry
    Local {
        operation: &'a LocalOverride<T>,
        delegate: Delegate<T>,
    },
}

impl<'a, T> std::fmt::Debug for ResolvedOperation<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedOperation::Direct(_) => f.write_str("Direct"),
            ResolvedOperation::Local { .. } => f.write_str("Local"),
        }
    }
}

impl<'a, T> ResolvedOperation<'a, T> {
    pub(crate) fn invoke(self, input: T) -> StepReturn<T> {
        match self {
            ResolvedOperation::Direct(operation) => (operation)(input),
            ResolvedOperation::Local {
                operation,
                delegate,
            } => (operation)(input, delegate),
        }
    }
}

impl<'a, T> OperationResolver<'a, T> {
    pub(crate) fn new(pipeline: &'a Pipeline<T>, dependencies: &'a Dependencies<T>) -> Self {
        OperationResolver {
            pipeline,
            dependencies,
        }
    }

    pub(crate) fn resolve(&self, spec: &StepSpec) -> Result<ResolvedOperation<'a, T>, EngineError> {
        let key = spec.operation_key();

        if let Some(operation) = self.dependencies.lookup(key) {
            debug!(step = %spec.name, key, source = "dependencies", "resolved operation");
            return Ok(ResolvedOperation::Direct(operation));
        }

        if let Some(operation) = self.pipeline.local(key) {
            let delegate = Delegate::new(self.pipeline.container().lookup(key), key);
            debug!(step = %spec.name, key, source = "local override", "resolved operation");
            return Ok(ResolvedOperation::Local {
                operation,
                delegate,
            });
        }

        if let Some(operation) = self.pipeline.container().lookup(key) {
            debug!(step = %spec.name, key, source = "container", "resolved operation");
            return Ok(ResolvedOperation::Direct(operation));
        }

        Err(EngineError::MissingOperation {
            step: spec.name.clone(),
            key: key.to_string(),
        })
    }
}
