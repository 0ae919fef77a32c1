//! Dependency-ordered build.
//!
//! Depth-first: a component's dependencies are built before its own hook runs. A
//! category reached again while still in progress is a cycle.

use std::collections::HashMap;
use std::sync::Arc;

use crate::contracts::Component;
use crate::error::ComponentError;
use crate::events::EventKind;
use crate::registry::LifecycleState;
use crate::runtime::Manager;

/// Visitation mark for one traversal; absence means not visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

type Marks = HashMap<String, Mark>;

impl Manager {
    /// Build every registered component that is not built yet.
    ///
    /// Stops at the first failure; components built before it stay built and will be closed.
    pub fn build_all(&mut self) -> Result<(), ComponentError> {
        tracing::info!("Phase: build (all)");

        let pending: Vec<Arc<dyn Component>> = self
            .registry
            .all()
            .filter(|entry| !entry.is_built())
            .map(|entry| Arc::clone(entry.component()))
            .collect();

        let mut marks = Marks::new();
        for component in pending {
            let category = component.category();
            if self.is_built(category) {
                continue;
            }
            match marks.get(category).copied() {
                Some(Mark::Done) => continue,
                Some(Mark::InProgress) => {
                    return Err(ComponentError::UnexpectedState {
                        component: component.description().to_owned(),
                    });
                }
                None => self.build_recursive(&mut marks, &component)?,
            }
        }

        tracing::info!(order = ?self.build_order(), "Build order resolved");
        Ok(())
    }

    /// Build `category` and everything it transitively needs. No-op if already built.
    pub fn build_one(&mut self, category: &str) -> Result<(), ComponentError> {
        let entry = self.registry.require(category)?;
        if entry.is_built() {
            return Ok(());
        }
        let component = Arc::clone(entry.component());

        tracing::info!(category, "Phase: build (one)");
        self.build_recursive(&mut Marks::new(), &component)
    }

    fn is_built(&self, category: &str) -> bool {
        self.registry
            .get(category)
            .is_some_and(|entry| entry.is_built())
    }

    fn build_recursive(
        &mut self,
        marks: &mut Marks,
        component: &Arc<dyn Component>,
    ) -> Result<(), ComponentError> {
        let category = component.category();
        marks.insert(category.to_owned(), Mark::InProgress);
        self.emit(EventKind::ToBuild, component.as_ref());

        // Resolve every declared dependency before building any of them.
        let dependencies = component
            .dependencies()
            .into_iter()
            .map(|dep_category| {
                self.registry
                    .get(dep_category)
                    .map(|entry| Arc::clone(entry.component()))
                    .ok_or_else(|| ComponentError::UnknownCategory {
                        category: dep_category.to_owned(),
                        required_by: Some(component.description().to_owned()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for dependency in dependencies {
            let dep_category = dependency.category();
            if self.is_built(dep_category) {
                continue;
            }

            match marks.get(dep_category).copied() {
                Some(Mark::Done) => continue,
                Some(Mark::InProgress) => {
                    return Err(ComponentError::CyclicDependency {
                        component: component.description().to_owned(),
                        dependency: dependency.description().to_owned(),
                    });
                }
                None => self.build_recursive(marks, &dependency)?,
            }
        }

        let result = {
            let ctx = self.ctx_for(category);
            component.build(&ctx)
        };
        result.map_err(|source| ComponentError::BuildFailed {
            component: component.description().to_owned(),
            source,
        })?;

        self.registry.advance(category, LifecycleState::Built);
        component.built();
        self.close_list.push(category.to_owned());
        marks.insert(category.to_owned(), Mark::Done);
        self.emit(EventKind::Built, component.as_ref());

        Ok(())
    }
}
