use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::contracts::Component;
use crate::error::ComponentError;

/// Lifecycle of a registered component. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Registered,
    Initialized,
    Built,
    Closed,
}

pub struct ComponentEntry {
    category: String,
    component: Arc<dyn Component>,
    state: LifecycleState,
}

impl std::fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("category", &self.category)
            .field("description", &self.component.description())
            .field("deps", &self.component.dependencies())
            .field("state", &self.state)
            .field("is_runner", &self.component.as_runner().is_some())
            .finish()
    }
}

impl ComponentEntry {
    /// Category captured at registration time.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        self.component.description()
    }

    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// True once the build hook succeeded; stays true after close.
    pub fn is_built(&self) -> bool {
        self.state >= LifecycleState::Built
    }
}

/// Category → component mapping, at most one component per category.
///
/// Iteration order is unspecified.
#[derive(Default)]
pub struct Registry {
    components: HashMap<String, ComponentEntry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<&str> = self.components.keys().map(String::as_str).collect();
        categories.sort_unstable();
        f.debug_struct("Registry")
            .field("categories", &categories)
            .finish()
    }
}

impl Registry {
    pub fn register(&mut self, component: Arc<dyn Component>) -> Result<(), ComponentError> {
        self.register_all([component])
    }

    /// Register a batch. Either every component is inserted or none is.
    pub fn register_all<I>(&mut self, components: I) -> Result<(), ComponentError>
    where
        I: IntoIterator<Item = Arc<dyn Component>>,
    {
        let batch: Vec<Arc<dyn Component>> = components.into_iter().collect();

        {
            let mut seen: HashMap<&str, &dyn Component> = HashMap::new();
            for component in &batch {
                let category = component.category();
                let existing = self
                    .components
                    .get(category)
                    .map(|e| e.component.as_ref())
                    .or_else(|| seen.get(category).copied());
                if let Some(existing) = existing {
                    return Err(ComponentError::DuplicateCategory {
                        category: category.to_owned(),
                        existing: existing.description().to_owned(),
                        incoming: component.description().to_owned(),
                    });
                }
                seen.insert(category, component.as_ref());
            }
        }

        for component in batch {
            let category = component.category().to_owned();
            tracing::debug!(category = %category, component = component.description(), "Component registered");
            self.components.insert(
                category.clone(),
                ComponentEntry {
                    category,
                    component,
                    state: LifecycleState::Registered,
                },
            );
        }
        Ok(())
    }

    /// Lookup with an explicit "not found" result when `must_exist` is false.
    pub fn lookup(
        &self,
        category: &str,
        must_exist: bool,
    ) -> Result<Option<&ComponentEntry>, ComponentError> {
        match self.components.get(category) {
            Some(entry) => Ok(Some(entry)),
            None if must_exist => Err(ComponentError::unknown(category)),
            None => Ok(None),
        }
    }

    pub fn get(&self, category: &str) -> Option<&ComponentEntry> {
        self.components.get(category)
    }

    pub fn require(&self, category: &str) -> Result<&ComponentEntry, ComponentError> {
        self.components
            .get(category)
            .ok_or_else(|| ComponentError::unknown(category))
    }

    pub fn all(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.components.values()
    }

    pub fn categories(&self) -> HashSet<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Move an entry forward in its lifecycle. Returns false if `to` is not ahead of
    /// the current state.
    pub(crate) fn advance(&mut self, category: &str, to: LifecycleState) -> bool {
        match self.components.get_mut(category) {
            Some(entry) if entry.state < to => {
                entry.state = to;
                true
            }
            _ => false,
        }
    }
}
