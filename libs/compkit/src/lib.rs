//! # Compkit - Component Bootstrapping Kit
//!
//! Applications register named subsystems ("components"), each under a unique
//! **category**. Components declare the categories they depend on, and the kit
//! builds every component exactly once in dependency order, then closes them in
//! the exact reverse order at shutdown.
//!
//! ## Features
//!
//! - **Ordered build**: depth-first build with cycle detection
//! - **Strict teardown**: close order is the reverse of build completion order
//! - **Capabilities**: the `runner` category must additionally be a [`Runner`]
//! - **Observable**: lifecycle events go through an injectable [`EventSink`]
//! - **Pluggable**: components can come from plugins or compile-time discovery
//!
//! ## Example
//!
//! ```rust,ignore
//! use compkit::{Component, ComponentBase, ComponentCtx, Manager};
//! use std::sync::Arc;
//!
//! struct Cache {
//!     base: ComponentBase,
//! }
//!
//! impl Component for Cache {
//!     fn category(&self) -> &str {
//!         self.base.category()
//!     }
//!     fn dependencies(&self) -> Vec<&str> {
//!         vec!["db"]
//!     }
//!     fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
//!         let db = ctx.get::<Db>("db")?;
//!         // ...
//!         Ok(())
//!     }
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! let mut manager = Manager::default();
//! manager.add_components([Arc::new(Db::new()) as _, Arc::new(Cache::new()) as _])?;
//! manager.build_all()?;
//! manager.run()?;
//! manager.close_all();
//! ```

pub use anyhow::Result;

// Re-export inventory for `submit_component!`
pub use inventory;

pub mod context;
pub mod contracts;
pub mod discovery;
pub mod error;
pub mod events;
pub mod plugins;
pub mod registry;
pub mod runtime;

pub use context::{ComponentCtx, ConfigError, ConfigProvider};
pub use contracts::{Application, Component, ComponentBase, Runner};
pub use discovery::Registrator;
pub use error::ComponentError;
pub use events::{CollectingSink, EventKind, EventSink, LifecycleEvent, NoopSink, TracingSink};
pub use plugins::{PluginEntry, PluginError, PluginLibrary, PluginLoader, StaticLoader};
pub use registry::{ComponentEntry, LifecycleState, Registry};
pub use runtime::{Manager, CATEGORY_RUNNER};
