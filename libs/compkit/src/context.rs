//! Per-hook view of the manager handed to components.

use std::sync::Arc;

use clap::ArgMatches;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::contracts::{Application, Component};
use crate::error::ComponentError;
use crate::registry::Registry;

/// Source of per-component configuration sections, keyed by category.
pub trait ConfigProvider: Send + Sync {
    fn component_config(&self, category: &str) -> Option<&serde_json::Value>;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for component '{category}'")]
    Invalid {
        category: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Context passed to `initialize`, `build` and `run` hooks.
pub struct ComponentCtx<'a> {
    category: &'a str,
    registry: &'a Registry,
    application: Option<&'a dyn Application>,
    config: Option<&'a dyn ConfigProvider>,
    matches: Option<&'a ArgMatches>,
}

impl<'a> ComponentCtx<'a> {
    pub(crate) fn new(
        category: &'a str,
        registry: &'a Registry,
        application: Option<&'a dyn Application>,
        config: Option<&'a dyn ConfigProvider>,
        matches: Option<&'a ArgMatches>,
    ) -> Self {
        Self {
            category,
            registry,
            application,
            config,
            matches,
        }
    }

    /// Category of the component this context was created for.
    pub fn category(&self) -> &'a str {
        self.category
    }

    pub fn application(&self) -> Option<&'a dyn Application> {
        self.application
    }

    /// Parsed command line, once the application has handed it to the manager.
    pub fn matches(&self) -> Option<&'a ArgMatches> {
        self.matches
    }

    pub fn component(&self, category: &str) -> Result<Arc<dyn Component>, ComponentError> {
        self.registry
            .require(category)
            .map(|entry| Arc::clone(entry.component()))
    }

    /// Probe for an optional component; absence is not an error.
    pub fn optional(&self, category: &str) -> Option<Arc<dyn Component>> {
        self.registry
            .get(category)
            .map(|entry| Arc::clone(entry.component()))
    }

    /// Typed access to another component.
    ///
    /// Fails with `InterfaceMismatch` when the component registered under `category`
    /// is not a `T`.
    pub fn get<T: Component>(&self, category: &str) -> Result<&'a T, ComponentError> {
        let component = self.registry.require(category)?.component();
        component
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ComponentError::interface_mismatch(component.as_ref()))
    }

    /// Deserialize this component's configuration section.
    ///
    /// Returns `T::default()` when no section exists.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        let Some(value) = self
            .config
            .and_then(|provider| provider.component_config(self.category))
        else {
            return Ok(T::default());
        };
        serde_json::from_value(value.clone()).map_err(|source| ConfigError::Invalid {
            category: self.category.to_owned(),
            source,
        })
    }
}
