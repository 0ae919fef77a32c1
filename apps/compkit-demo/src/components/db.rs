use std::sync::OnceLock;

use clap::{Arg, Command};
use compkit::{Component, ComponentBase, ComponentCtx};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    pub url: String,
    pub max_conns: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_conns: 4,
        }
    }
}

pub struct Database {
    base: ComponentBase,
    config: OnceLock<DbConfig>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            base: ComponentBase::new("db", "Database pool"),
            config: OnceLock::new(),
        }
    }
}

impl Database {
    /// Connection URL, once built.
    pub fn url(&self) -> Option<&str> {
        self.config.get().map(|c| c.url.as_str())
    }
}

impl Component for Database {
    fn category(&self) -> &str {
        self.base.category()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn configure(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("db-url")
                .long("db-url")
                .value_name("URL")
                .global(true)
                .help("Database URL (overrides components.db.url)"),
        )
    }

    fn build(&self, ctx: &ComponentCtx<'_>) -> anyhow::Result<()> {
        let mut config: DbConfig = ctx.config()?;
        if let Some(url) = ctx.matches().and_then(|m| m.get_one::<String>("db-url")) {
            config.url = url.clone();
        }
        if config.max_conns == 0 {
            anyhow::bail!("max_conns must be at least 1");
        }

        tracing::info!(url = %config.url, max_conns = config.max_conns, "Database pool ready");
        let _ = self.config.set(config);
        Ok(())
    }

    fn close(&self) {
        tracing::info!("Database pool closed");
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
