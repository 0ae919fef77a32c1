use std::collections::HashMap;
use std::sync::OnceLock;

use compkit::{Component, ComponentBase, ComponentCtx};
use parking_lot::Mutex;
use serde::Deserialize;

use super::Database;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

pub struct Cache {
    base: ComponentBase,
    capacity: OnceLock<usize>,
    entries: Mutex<HashMap<String, String>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            base: ComponentBase::new("cache", "Read-through cache"),
            capacity: OnceLock::new(),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Cache {
    pub fn capacity(&self) -> usize {
        self.capacity.get().copied().unwrap_or_default()
    }

    pub fn put(&self, key: &str, value: &str) -> bool {
        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity() && !entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_owned(), value.to_owned());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Component for Cache {
    fn category(&self) -> &str {
        self.base.category()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn dependencies(&self) -> Vec<&str> {
        vec!["db"]
    }

    fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        let config: CacheConfig = ctx.config()?;
        let db = ctx.get::<Database>("db")?;
        tracing::info!(
            capacity = config.capacity,
            backend = db.url().unwrap_or("?"),
            "Cache ready"
        );
        let _ = self.capacity.set(config.capacity);
        Ok(())
    }

    fn close(&self) {
        let mut entries = self.entries.lock();
        tracing::info!(flushed = entries.len(), "Cache flushed");
        entries.clear();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
