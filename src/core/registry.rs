//! Operation registry - the name-keyed containers the resolver draws from

use crate::core::step::{Operation, StepReturn};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Lookup capability every operation source exposes to the resolver
///
/// The container a pipeline is declared against only needs to answer
/// key lookups; any registry or service locator can implement this.
pub trait Resolvable<T> {
    /// Find the operation registered under `key`
    fn lookup(&self, key: &str) -> Option<Operation<T>>;
}

/// An explicit name-keyed mapping of operations
///
/// Serves both as the container a pipeline is declared against and as the
/// per-instance dependency overrides (see [`Dependencies`]).
pub struct OperationContainer<T> {
    operations: HashMap<String, Operation<T>>,
}

/// Per-instance operation overrides, bound once at runner construction
pub type Dependencies<T> = OperationContainer<T>;

impl<T> OperationContainer<T> {
    /// Create an empty container
    pub fn new() -> Self {
        OperationContainer {
            operations: HashMap::new(),
        }
    }

    /// Register an operation under `key`, replacing any previous entry
    pub fn register<F>(mut self, key: impl Into<String>, operation: F) -> Self
    where
        F: Fn(T) -> StepReturn<T> + Send + Sync + 'static,
    {
        self.operations.insert(key.into(), Arc::new(operation));
        self
    }

    /// Check whether an operation is registered under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.operations.contains_key(key)
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check whether the container has no operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<T> Default for OperationContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for OperationContainer<T> {
    fn clone(&self) -> Self {
        OperationContainer {
            operations: self.operations.clone(),
        }
    }
}

impl<T> Resolvable<T> for OperationContainer<T> {
    fn lookup(&self, key: &str) -> Option<Operation<T>> {
        self.operations.get(key).cloned()
    }
}

/// Handle to the operation the next resolution layer would have produced
///
/// Passed to a local override so it can decorate the input and delegate
/// onward instead of fully replacing the registered operation.
pub struct Delegate<T> {
    parent: Option<Operation<T>>,
    key: String,
}

/// Raised when an override delegates to a key with no registered operation
#[derive(Debug, Error)]
#[error("no operation registered behind delegate for key '{key}'")]
pub(crate) struct DelegateMissing {
    pub(crate) key: String,
}

impl<T> Delegate<T> {
    pub(crate) fn new(parent: Option<Operation<T>>, key: impl Into<String>) -> Self {
        Delegate {
            parent,
            key: key.into(),
        }
    }

    /// Check whether an operation is registered behind this delegate
    pub fn is_registered(&self) -> bool {
        self.parent.is_some()
    }

    /// Invoke the delegated operation
    ///
    /// Raises a missing-operation error (fatal when it reaches the engine)
    /// if nothing is registered behind the delegate.
    pub fn call(&self, input: T) -> StepReturn<T> {
        match &self.parent {
            Some(operation) => (operation)(input),
            None => StepReturn::Raised(Box::new(DelegateMissing {
                key: self.key.clone(),
            })),
        }
    }
}
