use clap::Command;

use crate::context::ComponentCtx;

/// Application hosting the components.
///
/// Only used to name plugin files and to gate lifecycle event reporting.
pub trait Application: Send + Sync {
    fn name(&self) -> &str;

    /// Verbosity level. Lifecycle events reach the event sink above level 1.
    fn debug(&self) -> i32;
}

/// Core component contract.
///
/// Build state is not part of the implementation: the registry entry owns it, so a
/// component cannot report itself built before the orchestrator has run its hook.
pub trait Component: Send + Sync + 'static {
    /// Registration key, unique across the registry.
    fn category(&self) -> &str;

    fn description(&self) -> &str {
        self.category()
    }

    /// Categories that must be built before this component.
    ///
    /// May borrow from `self`, so lists computed at runtime work as well as literals.
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Register command-line options. Called once, before building.
    fn configure(&self, cmd: Command) -> Command {
        cmd
    }

    /// Cheap, dependency-agnostic setup. Runs in no particular order.
    fn initialize(&self, _ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs once every dependency has been built.
    fn build(&self, _ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Notification that the build hook succeeded and the component is now built.
    fn built(&self) {}

    /// Teardown. Must not fail; report problems through logging.
    fn close(&self) {}

    fn as_any(&self) -> &dyn std::any::Any;

    /// Return self as a Runner if this component provides the program entry point.
    ///
    /// Default implementation returns None. Runner components override this to return Some(self).
    fn as_runner(&self) -> Option<&dyn Runner> {
        None
    }
}

/// Entry-point capability for the component registered under [`crate::CATEGORY_RUNNER`].
pub trait Runner: Send + Sync {
    fn run(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()>;
}

/// Identity shared by most components: a category and a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBase {
    category: String,
    description: String,
}

impl ComponentBase {
    /// An empty description falls back to the category.
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        let category = category.into();
        let mut description = description.into();
        if description.is_empty() {
            description = category.clone();
        }
        Self {
            category,
            description,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
