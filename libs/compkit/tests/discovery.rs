//! Compile-time discovery through `submit_component!`.

use std::sync::Arc;

use compkit::{submit_component, Component, ComponentBase, Manager};

struct Store(ComponentBase);

impl Component for Store {
    fn category(&self) -> &str {
        self.0.category()
    }
    fn description(&self) -> &str {
        self.0.description()
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

struct Index(ComponentBase);

impl Component for Index {
    fn category(&self) -> &str {
        self.0.category()
    }
    fn dependencies(&self) -> Vec<&str> {
        vec!["store"]
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn new_store() -> Arc<dyn Component> {
    Arc::new(Store(ComponentBase::new("store", "Key/value store")))
}

fn new_index() -> Arc<dyn Component> {
    Arc::new(Index(ComponentBase::new("index", "")))
}

submit_component!(new_store);
submit_component!(new_index);

#[test]
fn discovered_components_register_and_build() {
    let mut m = Manager::default();
    m.add_discovered().unwrap();

    let store = m.component("store", true).unwrap().unwrap();
    assert_eq!(store.description(), "Key/value store");
    assert_eq!(m.components().len(), 2);

    m.build_all().unwrap();
    assert_eq!(m.build_order(), vec!["store", "index"]);
}

#[test]
fn discovering_twice_is_a_duplicate() {
    let mut m = Manager::default();
    m.add_discovered().unwrap();
    assert!(m.add_discovered().is_err());
    assert_eq!(m.components().len(), 2);
}
