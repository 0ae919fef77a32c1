//! Sample components wired by the demo binary.

mod api;
mod cache;
mod db;
mod runner;

use std::sync::Arc;

use compkit::Component;

pub use api::Api;
pub use cache::Cache;
pub use db::Database;
pub use runner::DemoRunner;

/// Everything except the runner, which registers itself through discovery.
pub fn all() -> Vec<Arc<dyn Component>> {
    vec![
        Arc::new(Api::default()),
        Arc::new(Cache::default()),
        Arc::new(Database::default()),
    ]
}
