//! Shared test components. Every hook call is appended to a journal as `"<hook>:<category>"`.

#![allow(dead_code)]

use std::sync::Arc;

use compkit::{Application, Component, ComponentBase, ComponentCtx, Runner};
use parking_lot::Mutex;

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Journal entries for one hook, in call order.
pub fn calls(journal: &Journal, hook: &str) -> Vec<String> {
    let prefix = format!("{hook}:");
    journal
        .lock()
        .iter()
        .filter_map(|e| e.strip_prefix(&prefix).map(str::to_owned))
        .collect()
}

pub fn position(order: &[impl AsRef<str>], category: &str) -> usize {
    let order: Vec<&str> = order.iter().map(AsRef::<str>::as_ref).collect();
    order
        .iter()
        .position(|c| *c == category)
        .unwrap_or_else(|| panic!("'{category}' missing from {order:?}"))
}

pub struct TestComponent {
    base: ComponentBase,
    deps: Vec<String>,
    journal: Journal,
    fail_build: bool,
    fail_init: bool,
}

impl TestComponent {
    pub fn new(category: &str, deps: &[&str], journal: &Journal) -> Self {
        Self {
            base: ComponentBase::new(category, ""),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            journal: Arc::clone(journal),
            fail_build: false,
            fail_init: false,
        }
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn arc(self) -> Arc<dyn Component> {
        Arc::new(self)
    }

    fn record(&self, hook: &str) {
        self.journal
            .lock()
            .push(format!("{hook}:{}", self.base.category()));
    }
}

impl Component for TestComponent {
    fn category(&self) -> &str {
        self.base.category()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn dependencies(&self) -> Vec<&str> {
        self.deps.iter().map(String::as_str).collect()
    }

    fn initialize(&self, _ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        self.record("init");
        if self.fail_init {
            anyhow::bail!("init refused");
        }
        Ok(())
    }

    fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        // Dependencies must already be built when the hook runs.
        for dep in &self.deps {
            let dep = ctx.component(dep)?;
            let key = format!("built:{}", dep.category());
            if !self.journal.lock().contains(&key) {
                anyhow::bail!("dependency '{}' not built yet", dep.category());
            }
        }
        self.record("build");
        if self.fail_build {
            anyhow::bail!("build refused");
        }
        Ok(())
    }

    fn built(&self) {
        self.record("built");
    }

    fn close(&self) {
        self.record("close");
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// A component under the runner category that really is a Runner.
pub struct TestRunner {
    pub inner: TestComponent,
    pub fail: bool,
}

impl Component for TestRunner {
    fn category(&self) -> &str {
        self.inner.category()
    }

    fn dependencies(&self) -> Vec<&str> {
        self.inner.dependencies()
    }

    fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        self.inner.build(ctx)
    }

    fn built(&self) {
        self.inner.built()
    }

    fn close(&self) {
        self.inner.close()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_runner(&self) -> Option<&dyn Runner> {
        Some(self)
    }
}

impl Runner for TestRunner {
    fn run(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        self.inner.record("run");
        if self.fail {
            anyhow::bail!("runner gave up in '{}'", ctx.category());
        }
        Ok(())
    }
}

pub struct TestApp {
    pub name: &'static str,
    pub debug: i32,
}

impl Application for TestApp {
    fn name(&self) -> &str {
        self.name
    }

    fn debug(&self) -> i32 {
        self.debug
    }
}
