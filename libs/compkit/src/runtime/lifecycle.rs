use std::sync::Arc;

use crate::contracts::Component;
use crate::error::ComponentError;
use crate::events::EventKind;
use crate::registry::LifecycleState;
use crate::runtime::Manager;

impl Manager {
    /// INIT pass: run `initialize` on every component not built yet.
    ///
    /// No ordering across components; only the build phases honor dependencies.
    pub fn initialize_all(&mut self) -> Result<(), ComponentError> {
        tracing::info!("Phase: init");

        let pending: Vec<Arc<dyn Component>> = self
            .registry
            .all()
            .filter(|entry| !entry.is_built())
            .map(|entry| Arc::clone(entry.component()))
            .collect();

        for component in pending {
            let category = component.category();
            let result = {
                let ctx = self.ctx_for(category);
                component.initialize(&ctx)
            };
            result.map_err(|source| ComponentError::InitializationFailed {
                component: component.description().to_owned(),
                source,
            })?;

            self.registry.advance(category, LifecycleState::Initialized);
            self.emit(EventKind::Initialized, component.as_ref());
        }

        Ok(())
    }

    /// CLOSE phase: close built components, last built first.
    ///
    /// Components closed by an earlier call are skipped, so nothing is closed twice.
    pub fn close_all(&mut self) {
        tracing::info!(count = self.close_list.len(), "Phase: close");

        let to_close: Vec<Arc<dyn Component>> = self
            .close_list
            .iter()
            .rev()
            .filter_map(|category| self.registry.get(category))
            .filter(|entry| entry.state() == LifecycleState::Built)
            .map(|entry| Arc::clone(entry.component()))
            .collect();

        for component in to_close {
            component.close();
            self.registry
                .advance(component.category(), LifecycleState::Closed);
            self.emit(EventKind::Closed, component.as_ref());
        }
    }
}
