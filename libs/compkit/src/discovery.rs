//! Compile-time component discovery.
//!
//! Crates submit constructors with [`submit_component!`](crate::submit_component);
//! [`Manager::add_discovered`] registers them all. This is the statically linked
//! counterpart of plugin loading.

use std::sync::Arc;

use crate::contracts::Component;
use crate::error::ComponentError;
use crate::runtime::Manager;

/// The constructor submitted via `inventory::submit!`.
pub struct Registrator(pub fn() -> Arc<dyn Component>);

inventory::collect!(Registrator);

/// Submit a component constructor (`fn() -> Arc<dyn Component>`) for discovery.
#[macro_export]
macro_rules! submit_component {
    ($ctor:path) => {
        $crate::inventory::submit! {
            $crate::discovery::Registrator($ctor)
        }
    };
}

impl Manager {
    /// Register every component submitted with `submit_component!`.
    pub fn add_discovered(&mut self) -> Result<(), ComponentError> {
        let components: Vec<Arc<dyn Component>> = inventory::iter::<Registrator>
            .into_iter()
            .map(|r| (r.0)())
            .collect();
        tracing::info!(count = components.len(), "Discovered components");
        self.add_components(components)
    }
}
