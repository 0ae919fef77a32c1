use std::sync::Arc;

use crate::error::ComponentError;
use crate::runtime::Manager;

/// Category of the component that carries the program's main action.
pub const CATEGORY_RUNNER: &str = "runner";

impl Manager {
    /// Dispatch to the component registered under [`CATEGORY_RUNNER`].
    ///
    /// Call after building; the runner's own result becomes the manager's result.
    pub fn run(&self) -> Result<(), ComponentError> {
        let component = Arc::clone(self.registry.require(CATEGORY_RUNNER)?.component());
        let Some(runner) = component.as_runner() else {
            return Err(ComponentError::interface_mismatch(component.as_ref()));
        };

        tracing::info!(component = component.description(), "Phase: run");
        runner
            .run(&self.ctx_for(CATEGORY_RUNNER))
            .map_err(|source| ComponentError::RunFailed {
                component: component.description().to_owned(),
                source,
            })
    }
}
