//! Manager - owns the registry and drives every lifecycle phase.
//!
//! The manager is strictly single-threaded: every operation takes `&mut self` or runs
//! to completion before returning. Hooks may do their own concurrency internally but
//! must block until done.

use std::sync::Arc;

use clap::{ArgMatches, Command};

use crate::context::{ComponentCtx, ConfigProvider};
use crate::contracts::{Application, Component};
use crate::error::ComponentError;
use crate::events::{EventKind, EventSink, LifecycleEvent, NoopSink};
use crate::plugins::{PluginLibrary, PluginLoader, StaticLoader};
use crate::registry::{LifecycleState, Registry};

/// Lifecycle events reach the sink only above this application debug level.
const EVENT_DEBUG_LEVEL: i32 = 1;

pub struct Manager {
    pub(crate) application: Option<Arc<dyn Application>>,
    pub(crate) registry: Registry,
    /// Categories in build completion order; closed in reverse.
    pub(crate) close_list: Vec<String>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) config: Option<Arc<dyn ConfigProvider>>,
    pub(crate) matches: Option<ArgMatches>,
    pub(crate) loader: Box<dyn PluginLoader>,
    // Declared last: plugin code must outlive the components it created.
    pub(crate) libraries: Vec<Box<dyn PluginLibrary>>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("application", &self.application.as_ref().map(|a| a.name()))
            .field("registry", &self.registry)
            .field("close_list", &self.close_list)
            .field("libraries", &self.libraries.len())
            .finish()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Manager {
    pub fn new(application: Option<Arc<dyn Application>>) -> Self {
        Self {
            application,
            registry: Registry::default(),
            close_list: Vec::new(),
            events: Arc::new(NoopSink),
            config: None,
            matches: None,
            loader: Box::new(StaticLoader::default()),
            libraries: Vec::new(),
        }
    }

    /// Attach the application once it is known, e.g. after the command line was parsed.
    pub fn with_application(mut self, application: Arc<dyn Application>) -> Self {
        self.application = Some(application);
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigProvider>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_loader(mut self, loader: Box<dyn PluginLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn application(&self) -> Option<&dyn Application> {
        self.application.as_deref()
    }

    /// Debug level of the application, `-1` without one.
    pub fn debug_level(&self) -> i32 {
        self.application.as_ref().map_or(-1, |app| app.debug())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn add_component(&mut self, component: Arc<dyn Component>) -> Result<(), ComponentError> {
        self.registry.register(component)
    }

    pub fn add_components<I>(&mut self, components: I) -> Result<(), ComponentError>
    where
        I: IntoIterator<Item = Arc<dyn Component>>,
    {
        self.registry.register_all(components)
    }

    /// Component registered under `category`; `Ok(None)` when absent and `must_exist` is false.
    pub fn component(
        &self,
        category: &str,
        must_exist: bool,
    ) -> Result<Option<Arc<dyn Component>>, ComponentError> {
        Ok(self
            .registry
            .lookup(category, must_exist)?
            .map(|entry| Arc::clone(entry.component())))
    }

    /// Every registered component, in unspecified order.
    pub fn components(&self) -> Vec<Arc<dyn Component>> {
        self.registry
            .all()
            .map(|entry| Arc::clone(entry.component()))
            .collect()
    }

    pub fn state(&self, category: &str) -> Option<LifecycleState> {
        self.registry.get(category).map(|entry| entry.state())
    }

    /// Categories in the order their build hook completed.
    pub fn build_order(&self) -> Vec<&str> {
        self.close_list.iter().map(String::as_str).collect()
    }

    /// Let every component register its command-line options.
    pub fn configure_all(&self, mut cmd: Command) -> Command {
        for entry in self.registry.all() {
            cmd = entry.component().configure(cmd);
        }
        cmd
    }

    /// Hand the parsed command line to the components.
    pub fn set_matches(&mut self, matches: ArgMatches) {
        self.matches = Some(matches);
    }

    pub(crate) fn ctx_for<'a>(&'a self, category: &'a str) -> ComponentCtx<'a> {
        ComponentCtx::new(
            category,
            &self.registry,
            self.application.as_deref(),
            self.config.as_deref(),
            self.matches.as_ref(),
        )
    }

    pub(crate) fn emit(&self, kind: EventKind, component: &dyn Component) {
        tracing::debug!(
            category = component.category(),
            component = component.description(),
            "{kind}"
        );
        if self.debug_level() > EVENT_DEBUG_LEVEL {
            self.events.on_event(&LifecycleEvent::new(
                kind,
                component.category(),
                component.description(),
            ));
        }
    }
}
