//! Pipeline domain model

use crate::core::registry::{Delegate, Resolvable};
use crate::core::step::{CatchSpec, StepReturn, StepSpec};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A local override callable
///
/// Receives the input and a [`Delegate`] to the operation the container
/// holds for the same key, so it can decorate-and-delegate or replace.
pub type LocalOverride<T> = Arc<dyn Fn(T, Delegate<T>) -> StepReturn<T> + Send + Sync>;

/// An ordered, immutable pipeline declaration
///
/// Built once through [`PipelineBuilder`] and never mutated afterwards;
/// safe to share across repeated invocations and across threads. Running
/// it is the engine's job (`Runner` in `execution::engine`).
pub struct Pipeline<T> {
    name: String,
    steps: Vec<StepSpec>,
    locals: HashMap<String, LocalOverride<T>>,
    container: Arc<dyn Resolvable<T> + Send + Sync>,
}

impl<T> Pipeline<T> {
    /// Start declaring a pipeline against an operation container
    pub fn builder<C>(name: impl Into<String>, container: C) -> PipelineBuilder<T>
    where
        C: Resolvable<T> + Send + Sync + 'static,
    {
        PipelineBuilder {
            name: name.into(),
            steps: Vec::new(),
            locals: HashMap::new(),
            container: Arc::new(container),
        }
    }

    /// Pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared steps, in execution order
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// Number of declared steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether the pipeline declares no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn local(&self, key: &str) -> Option<&LocalOverride<T>> {
        self.locals.get(key)
    }

    pub(crate) fn container(&self) -> &(dyn Resolvable<T> + Send + Sync) {
        self.container.as_ref()
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("locals", &self.locals.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Pipeline`] - the code-level declaration surface
pub struct PipelineBuilder<T> {
    name: String,
    steps: Vec<StepSpec>,
    locals: HashMap<String, LocalOverride<T>>,
    container: Arc<dyn Resolvable<T> + Send + Sync>,
}

impl<T> PipelineBuilder<T> {
    /// Append a transforming step
    pub fn map(self, name: impl Into<String>) -> Self {
        self.step(StepSpec::map(name))
    }

    /// Append a transforming step resolved under `key`
    pub fn map_with(self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.step(StepSpec::map(name).keyed(key))
    }

    /// Append a step whose operation returns an `Outcome` itself
    pub fn guard(self, name: impl Into<String>) -> Self {
        self.step(StepSpec::guard(name))
    }

    /// Append a guard step resolved under `key`
    pub fn guard_with(self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.step(StepSpec::guard(name).keyed(key))
    }

    /// Append a step that catches the declared error kind
    pub fn try_step(self, name: impl Into<String>, catch: CatchSpec) -> Self {
        self.step(StepSpec::try_step(name, catch))
    }

    /// Append a try step resolved under `key`
    pub fn try_step_with(
        self,
        name: impl Into<String>,
        key: impl Into<String>,
        catch: CatchSpec,
    ) -> Self {
        self.step(StepSpec::try_step(name, catch).keyed(key))
    }

    /// Append a side-effect step
    pub fn tee(self, name: impl Into<String>) -> Self {
        self.step(StepSpec::tee(name))
    }

    /// Append a side-effect step resolved under `key`
    pub fn tee_with(self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.step(StepSpec::tee(name).keyed(key))
    }

    /// Append an already-built step spec
    pub fn step(mut self, spec: StepSpec) -> Self {
        self.steps.push(spec);
        self
    }

    /// Attach a local override for `key`
    ///
    /// The override takes precedence over the container entry (but not
    /// over per-instance dependencies) and receives a delegate to the
    /// container entry it shadows.
    pub fn local<F>(mut self, key: impl Into<String>, operation: F) -> Self
    where
        F: Fn(T, Delegate<T>) -> StepReturn<T> + Send + Sync + 'static,
    {
        self.locals.insert(key.into(), Arc::new(operation));
        self
    }

    /// Freeze the declaration
    pub fn build(self) -> Pipeline<T> {
        Pipeline {
            name: self.name,
            steps: self.steps,
            locals: self.locals,
            container: self.container,
        }
    }
}
