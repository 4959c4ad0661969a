//! Pipeline runner - executes declared steps in order with short-circuiting

use crate::core::outcome::Outcome;
use crate::core::pipeline::Pipeline;
use crate::core::registry::Dependencies;
use crate::core::step::AdapterKind;
use crate::execution::adapter;
use crate::execution::error::EngineError;
use crate::execution::matcher::OutcomeMatcher;
use crate::execution::resolver::OperationResolver;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// A pipeline instance: a declared pipeline bound to per-instance
/// dependency overrides
///
/// Carries no per-call state, so a single runner can serve repeated and
/// concurrent calls.
pub struct Runner<'p, T> {
    pipeline: &'p Pipeline<T>,
    dependencies: Dependencies<T>,
}

impl<'p, T: Clone> Runner<'p, T> {
    /// Create a runner with no dependency overrides
    pub fn new(pipeline: &'p Pipeline<T>) -> Self {
        Runner {
            pipeline,
            dependencies: Dependencies::new(),
        }
    }

    /// Create a runner with per-instance dependency overrides
    ///
    /// Entries in `dependencies` win over local overrides and container
    /// entries for the same key - the hook for substituting test doubles
    /// without touching the container.
    pub fn with_dependencies(pipeline: &'p Pipeline<T>, dependencies: Dependencies<T>) -> Self {
        Runner {
            pipeline,
            dependencies,
        }
    }

    /// Run the pipeline against `input`
    ///
    /// Steps execute in declared order; each success feeds the next step,
    /// and the first failure is returned immediately with no further step
    /// executed. A pipeline with zero steps returns `Success(input)`
    /// unchanged.
    ///
    /// Fatal conditions - a missing operation, an undeclared raised
    /// error, an adapter-contract violation - abort the call as an
    /// [`EngineError`] instead of becoming a pipeline failure.
    pub fn call(&self, input: T) -> Result<Outcome<T>, EngineError> {
        let call_id = Uuid::new_v4();
        info!(
            %call_id,
            pipeline = %self.pipeline.name(),
            steps = self.pipeline.len(),
            "pipeline call started"
        );

        let result = self.execute(call_id, input);

        match &result {
            Ok(outcome) if outcome.is_success() => {
                info!(%call_id, "pipeline call completed");
            }
            Ok(outcome) => {
                info!(
                    %call_id,
                    origin = outcome.origin().unwrap_or("<untagged>"),
                    "pipeline call halted on failure"
                );
            }
            Err(e) => {
                error!(%call_id, error = %e, "pipeline call aborted");
            }
        }

        result
    }

    /// Run the pipeline and dispatch the terminal outcome to `matcher`
    ///
    /// The matcher is a side channel: the returned outcome is the same
    /// value `call` would have returned. Fatal errors never reach the
    /// matcher.
    pub fn call_with_matcher(
        &self,
        input: T,
        matcher: &OutcomeMatcher<'_, T>,
    ) -> Result<Outcome<T>, EngineError> {
        let outcome = self.call(input)?;
        matcher.dispatch(&outcome);
        Ok(outcome)
    }

    fn execute(&self, call_id: Uuid, input: T) -> Result<Outcome<T>, EngineError> {
        let resolver = OperationResolver::new(self.pipeline, &self.dependencies);
        let mut current = input;

        for spec in self.pipeline.steps() {
            let operation = resolver.resolve(spec)?;
            debug!(%call_id, step = %spec.name, kind = ?spec.adapter_kind, "executing step");

            let outcome = match spec.adapter_kind {
                AdapterKind::Tee => {
                    let raw = operation.invoke(current.clone());
                    adapter::normalize_tee(spec, raw, current)?
                }
                _ => {
                    let raw = operation.invoke(current);
                    adapter::normalize(spec, raw)?
                }
            };

            match outcome {
                Outcome::Success(value) => current = value,
                failure => {
                    warn!(%call_id, step = %spec.name, "step failed, halting pipeline");
                    return Ok(failure);
                }
            }
        }

        Ok(Outcome::Success(current))
    }
}
