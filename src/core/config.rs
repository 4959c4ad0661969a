//! Pipeline declaration from YAML or JSON
//!
//! The config surface declares the *shape* of a pipeline - ordered steps
//! with adapter kinds, names, optional operation keys, and catch-kind
//! names. Operations and caught error types are code-level values, so a
//! config is bound against an operation container and a [`CatchRegistry`]
//! to produce a runnable [`Pipeline`]. Local overrides cannot be declared
//! in config.

use crate::core::pipeline::Pipeline;
use crate::core::registry::Resolvable;
use crate::core::step::{AdapterKind, CatchSpec, StepSpec};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Top-level pipeline declaration loaded from YAML or JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered pipeline steps
    pub steps: Vec<StepConfig>,
}

/// Step declaration as written in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Adapter kind (`map`, `guard`, `try`, `tee`)
    pub kind: AdapterKind,

    /// Step name - the failure origin tag, and the default operation key
    pub name: String,

    /// Operation key, when it differs from the step name
    #[serde(default)]
    pub operation: Option<String>,

    /// Name of the declared error kind, mandatory for `try` steps
    #[serde(default)]
    pub catch: Option<String>,
}

impl PipelineConfig {
    /// Load a pipeline declaration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a pipeline declaration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a pipeline declaration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the declaration
    ///
    /// Step names may repeat: failures are tagged with the producing
    /// step's name, so with a shared name the last failing declaration
    /// governs matcher dispatch.
    pub fn validate(&self) -> Result<()> {
        for step in &self.steps {
            if step.name.is_empty() {
                anyhow::bail!("step with empty name");
            }

            match step.kind {
                AdapterKind::Try => {
                    if step.catch.is_none() {
                        anyhow::bail!("try step '{}' must declare a catch kind", step.name);
                    }
                }
                _ => {
                    if step.catch.is_some() {
                        anyhow::bail!(
                            "step '{}' declares a catch kind but is not a try step",
                            step.name
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Bind the declaration to a container and catch registry
    pub fn build<T, C>(&self, container: C, catches: &CatchRegistry) -> Result<Pipeline<T>>
    where
        C: Resolvable<T> + Send + Sync + 'static,
    {
        let mut builder = Pipeline::builder(self.name.as_str(), container);

        for step in &self.steps {
            let spec = match step.kind {
                AdapterKind::Map => StepSpec::map(step.name.as_str()),
                AdapterKind::Guard => StepSpec::guard(step.name.as_str()),
                AdapterKind::Tee => StepSpec::tee(step.name.as_str()),
                AdapterKind::Try => {
                    let catch_name = step.catch.as_ref().ok_or_else(|| {
                        anyhow::anyhow!("try step '{}' must declare a catch kind", step.name)
                    })?;
                    let catch = catches.get(catch_name).ok_or_else(|| {
                        anyhow::anyhow!(
                            "unknown catch kind '{}' for step '{}'",
                            catch_name,
                            step.name
                        )
                    })?;
                    StepSpec::try_step(step.name.as_str(), catch.clone())
                }
            };

            let spec = match &step.operation {
                Some(key) => spec.keyed(key.as_str()),
                None => spec,
            };

            builder = builder.step(spec);
        }

        Ok(builder.build())
    }
}

/// Binds config-level catch names to declared error kinds
#[derive(Default, Clone)]
pub struct CatchRegistry {
    catches: HashMap<String, CatchSpec>,
}

impl CatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        CatchRegistry {
            catches: HashMap::new(),
        }
    }

    /// Register `E` under `name`, replacing any previous entry
    pub fn register<E>(mut self, name: impl Into<String>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.catches.insert(name.into(), CatchSpec::of::<E>());
        self
    }

    /// Find the catch spec registered under `name`
    pub fn get(&self, name: &str) -> Option<&CatchSpec> {
        self.catches.get(name)
    }
}
