use compkit::{Component, ComponentBase, ComponentCtx};
use parking_lot::Mutex;

use super::{Cache, Database};

pub struct Api {
    base: ComponentBase,
    routes: Mutex<Vec<String>>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base: ComponentBase::new("api", "HTTP API"),
            routes: Mutex::new(Vec::new()),
        }
    }
}

impl Api {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Component for Api {
    fn category(&self) -> &str {
        self.base.category()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn dependencies(&self) -> Vec<&str> {
        vec!["db", "cache"]
    }

    fn initialize(&self, _ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        let mut routes = self.routes.lock();
        routes.clear();
        routes.push("/healthz".to_string());
        Ok(())
    }

    fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        let db = ctx.get::<Database>("db")?;
        let cache = ctx.get::<Cache>("cache")?;
        cache.put("motd", "hello from compkit");

        let mut routes = self.routes.lock();
        routes.push("/users".to_string());
        if ctx.optional("search").is_some() {
            routes.push("/search".to_string());
        }
        tracing::info!(routes = ?*routes, db = db.url().unwrap_or("?"), "API routes mounted");
        Ok(())
    }

    fn close(&self) {
        tracing::info!("API stopped");
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
