//! Plugin loading.
//!
//! A [`PluginLoader`] opens a library by path and resolves a named entry point. The
//! caller-supplied callback turns that entry into registered components. The manager
//! never depends on a particular dynamic-linking mechanism: [`StaticLoader`] serves
//! plugins linked at compile time, `DylibLoader` (feature `dylib`) opens real
//! shared libraries.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::ComponentError;
use crate::runtime::Manager;

#[cfg(feature = "dylib")]
mod dylib;
#[cfg(feature = "dylib")]
pub use dylib::DylibLoader;

/// Entry point exported by a plugin.
pub type PluginEntry = fn(&mut Manager) -> anyhow::Result<()>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("impossible to open plugin '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("plugin '{}' does not export symbol '{symbol}'", .path.display())]
    MissingSymbol {
        path: PathBuf,
        symbol: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("plugin '{}' failed to register its components", .path.display())]
    Callback {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("invalid plugin pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// An opened plugin library.
pub trait PluginLibrary: Send + Sync {
    fn path(&self) -> &Path;

    fn resolve(&self, symbol: &str) -> Result<PluginEntry, PluginError>;
}

pub trait PluginLoader: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PluginLibrary>, PluginError>;

    /// Paths matching a glob pattern, sorted.
    fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>, PluginError> {
        let paths = glob::glob(pattern).map_err(|source| PluginError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        let mut found = Vec::new();
        for path in paths {
            match path {
                Ok(path) => found.push(path),
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable plugin path"),
            }
        }
        found.sort();
        Ok(found)
    }
}

/// Plugins linked into the binary, addressed by a virtual path.
#[derive(Default, Clone)]
pub struct StaticLoader {
    libraries: BTreeMap<PathBuf, HashMap<String, PluginEntry>>,
}

impl StaticLoader {
    pub fn with_plugin(
        mut self,
        path: impl Into<PathBuf>,
        symbol: impl Into<String>,
        entry: PluginEntry,
    ) -> Self {
        self.libraries
            .entry(path.into())
            .or_default()
            .insert(symbol.into(), entry);
        self
    }
}

struct StaticLibrary {
    path: PathBuf,
    symbols: HashMap<String, PluginEntry>,
}

impl PluginLibrary for StaticLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, symbol: &str) -> Result<PluginEntry, PluginError> {
        self.symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| PluginError::MissingSymbol {
                path: self.path.clone(),
                symbol: symbol.to_owned(),
                source: anyhow::anyhow!("symbol not linked"),
            })
    }
}

impl PluginLoader for StaticLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn PluginLibrary>, PluginError> {
        let symbols = self
            .libraries
            .get(path)
            .cloned()
            .ok_or_else(|| PluginError::Open {
                path: path.to_path_buf(),
                source: anyhow::anyhow!("no statically linked plugin at this path"),
            })?;
        Ok(Box::new(StaticLibrary {
            path: path.to_path_buf(),
            symbols,
        }))
    }

    fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>, PluginError> {
        let pattern = glob::Pattern::new(pattern).map_err(|source| PluginError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(self
            .libraries
            .keys()
            .filter(|path| pattern.matches_path(path))
            .cloned()
            .collect())
    }
}

impl Manager {
    /// Open one plugin, resolve `symbol` and let `callback` register what it provides.
    pub fn add_plugin<F>(
        &mut self,
        path: impl AsRef<Path>,
        symbol: &str,
        mut callback: F,
    ) -> Result<(), ComponentError>
    where
        F: FnMut(&mut Manager, PluginEntry) -> anyhow::Result<()>,
    {
        let path = path.as_ref();
        let library = self.loader.open(path)?;
        let entry = library.resolve(symbol)?;
        self.libraries.push(library);

        tracing::debug!(plugin = %path.display(), symbol, "Plugin loaded");
        callback(self, entry).map_err(|source| PluginError::Callback {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Load every `<dir>/<app-name>-*.<dylib ext>` plugin, in path order.
    ///
    /// Without an application every library in `dir` matches.
    pub fn add_plugins<F>(
        &mut self,
        dir: impl AsRef<Path>,
        symbol: &str,
        mut callback: F,
    ) -> Result<(), ComponentError>
    where
        F: FnMut(&mut Manager, PluginEntry) -> anyhow::Result<()>,
    {
        let pattern = self.plugin_pattern(dir.as_ref());
        let paths = self.loader.discover(&pattern)?;
        tracing::info!(pattern = %pattern, count = paths.len(), "Phase: plugins");

        for path in paths {
            self.add_plugin(&path, symbol, &mut callback)?;
        }
        Ok(())
    }

    fn plugin_pattern(&self, dir: &Path) -> String {
        let file = match self.application() {
            Some(app) => format!(
                "{}-*.{}",
                glob::Pattern::escape(app.name()),
                std::env::consts::DLL_EXTENSION
            ),
            None => format!("*.{}", std::env::consts::DLL_EXTENSION),
        };
        let dir = glob::Pattern::escape(&dir.to_string_lossy());
        Path::new(&dir).join(file).to_string_lossy().into_owned()
    }
}
