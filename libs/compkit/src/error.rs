use thiserror::Error;

use crate::contracts::Component;
use crate::plugins::PluginError;

/// Structured errors for registration, build orchestration and dispatch.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error(
        "a component of category '{category}' already exists ('{existing}'); cannot register '{incoming}'"
    )]
    DuplicateCategory {
        category: String,
        existing: String,
        incoming: String,
    },

    #[error(
        "no component of category '{category}' exists{}",
        .required_by.as_ref().map(|c| format!(" (required by '{c}')")).unwrap_or_default()
    )]
    UnknownCategory {
        category: String,
        required_by: Option<String>,
    },

    #[error("components '{component}' and '{dependency}' are interdependent")]
    CyclicDependency {
        component: String,
        dependency: String,
    },

    // Hook failures with component context
    #[error("initialization failed for component '{component}'")]
    InitializationFailed {
        component: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("build failed for component '{component}'")]
    BuildFailed {
        component: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("runner '{component}' failed")]
    RunFailed {
        component: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "component '{component}' does not implement the interface of its category '{category}'"
    )]
    InterfaceMismatch { component: String, category: String },

    #[error("unexpected build state for component '{component}'")]
    UnexpectedState { component: String },

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl ComponentError {
    pub fn unknown(category: impl Into<String>) -> Self {
        Self::UnknownCategory {
            category: category.into(),
            required_by: None,
        }
    }

    /// Error for a component whose concrete type does not match what its category promises.
    pub fn interface_mismatch(component: &dyn Component) -> Self {
        Self::InterfaceMismatch {
            component: component.description().to_owned(),
            category: component.category().to_owned(),
        }
    }
}
