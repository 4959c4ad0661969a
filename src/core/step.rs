//! Step domain model - adapter kinds, step specs, and the raw operation contract

use crate::core::outcome::{Outcome, StepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a step's raw return value is normalized into an `Outcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// The operation returns a plain value - the step cannot fail
    Map,
    /// The operation returns an `Outcome` itself
    Guard,
    /// The operation returns a plain value or raises a declared error kind
    Try,
    /// The operation runs for its side effect - the input passes through unchanged
    Tee,
}

/// Raw return value of a registered operation
///
/// Operations are late-bound, so the engine cannot know statically which
/// shape a given callable produces; the adapter checks the arm against the
/// step's declared kind at call time. `Raised` is the abnormal-termination
/// channel - only a `Try` step with a matching catch turns it into a
/// pipeline failure.
#[derive(Debug)]
pub enum StepReturn<T> {
    /// A plain value
    Value(T),
    /// An already-formed outcome
    Outcome(Outcome<T>),
    /// An abnormal termination
    Raised(StepError),
    /// Nothing of interest (side-effect-only operations)
    Unit,
}

impl<T> StepReturn<T> {
    /// A plain-value return
    pub fn value(value: T) -> Self {
        StepReturn::Value(value)
    }

    /// Raise an error out of the operation
    pub fn raise(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StepReturn::Raised(Box::new(error))
    }

    /// Convert a `Result` into a plain value or a raised error
    pub fn from_result<E>(result: Result<T, E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match result {
            Ok(value) => StepReturn::Value(value),
            Err(error) => StepReturn::Raised(Box::new(error)),
        }
    }
}

/// The callable type every resolution source produces
pub type Operation<T> = Arc<dyn Fn(T) -> StepReturn<T> + Send + Sync>;

/// A declared error kind intercepted by a `Try` step
///
/// Rust has no error subtyping, so "matching the declared kind" means the
/// raised boxed error downcasts to exactly the declared type.
#[derive(Clone)]
pub struct CatchSpec {
    kind_name: &'static str,
    matches: Arc<dyn Fn(&StepError) -> bool + Send + Sync>,
}

impl CatchSpec {
    /// Declare `E` as the caught error kind
    pub fn of<E>() -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CatchSpec {
            kind_name: std::any::type_name::<E>(),
            matches: Arc::new(|error| error.downcast_ref::<E>().is_some()),
        }
    }

    /// The declared kind's type name, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    /// Check whether a raised error is of the declared kind
    pub fn matches(&self, error: &StepError) -> bool {
        (self.matches)(error)
    }
}

impl fmt::Debug for CatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CatchSpec").field(&self.kind_name).finish()
    }
}

/// Declare the error kind a `Try` step intercepts
pub fn catch<E>() -> CatchSpec
where
    E: std::error::Error + Send + Sync + 'static,
{
    CatchSpec::of::<E>()
}

/// A single declared step of a pipeline
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Step name - the failure origin tag, and the default operation key
    pub name: String,

    /// How the raw return value is normalized
    pub adapter_kind: AdapterKind,

    /// Declared error kind for `Try` steps, absent for every other kind
    pub catch: Option<CatchSpec>,

    /// Operation key override; `name` is used when not set
    operation_key: Option<String>,
}

impl StepSpec {
    fn new(name: impl Into<String>, adapter_kind: AdapterKind) -> Self {
        StepSpec {
            name: name.into(),
            adapter_kind,
            catch: None,
            operation_key: None,
        }
    }

    /// A transforming step - the operation's return value becomes the next input
    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, AdapterKind::Map)
    }

    /// A step whose operation returns an `Outcome` itself
    pub fn guard(name: impl Into<String>) -> Self {
        Self::new(name, AdapterKind::Guard)
    }

    /// A step that converts a raised error of the declared kind into a failure
    pub fn try_step(name: impl Into<String>, catch: CatchSpec) -> Self {
        let mut spec = Self::new(name, AdapterKind::Try);
        spec.catch = Some(catch);
        spec
    }

    /// A side-effect step - the input flows through to the next step unchanged
    pub fn tee(name: impl Into<String>) -> Self {
        Self::new(name, AdapterKind::Tee)
    }

    /// Resolve the operation under `key` instead of the step name
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.operation_key = Some(key.into());
        self
    }

    /// The key used to resolve this step's operation
    pub fn operation_key(&self) -> &str {
        self.operation_key.as_deref().unwrap_or(&self.name)
    }
}
