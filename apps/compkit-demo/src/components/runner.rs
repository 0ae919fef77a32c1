use std::sync::Arc;

use compkit::{submit_component, Component, ComponentBase, ComponentCtx, Runner, CATEGORY_RUNNER};

use super::{Api, Cache, Database};

pub struct DemoRunner {
    base: ComponentBase,
}

impl DemoRunner {
    pub fn create() -> Arc<dyn Component> {
        Arc::new(Self {
            base: ComponentBase::new(CATEGORY_RUNNER, "Demo runner"),
        })
    }
}

submit_component!(DemoRunner::create);

impl Component for DemoRunner {
    fn category(&self) -> &str {
        self.base.category()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn dependencies(&self) -> Vec<&str> {
        vec!["api"]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_runner(&self) -> Option<&dyn Runner> {
        Some(self)
    }
}

impl Runner for DemoRunner {
    fn run(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        let db = ctx.get::<Database>("db")?;
        let cache = ctx.get::<Cache>("cache")?;
        let api = ctx.get::<Api>("api")?;

        let app = ctx.application().map_or("compkit", |a| a.name());
        println!("{app}: database at {}", db.url().unwrap_or("?"));
        println!(
            "{app}: cache holds {}/{} entries",
            cache.len(),
            cache.capacity()
        );
        println!("{app}: serving {}", api.routes().join(", "));
        Ok(())
    }
}
