//! Shared-library plugins.
//!
//! A plugin exports its entry as
//! `#[no_mangle] pub fn <symbol>(manager: &mut compkit::Manager) -> anyhow::Result<()>`
//! and must be built with the same compiler and compkit version as the host.
#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use libloading::Library;

use super::{PluginEntry, PluginError, PluginLibrary, PluginLoader};

#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLoader;

struct DylibLibrary {
    path: PathBuf,
    library: Library,
}

impl PluginLoader for DylibLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn PluginLibrary>, PluginError> {
        // SAFETY: loading runs the library's initializers; plugins are trusted code.
        let library = unsafe { Library::new(path) }.map_err(|e| PluginError::Open {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Ok(Box::new(DylibLibrary {
            path: path.to_path_buf(),
            library,
        }))
    }
}

impl PluginLibrary for DylibLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, symbol: &str) -> Result<PluginEntry, PluginError> {
        // SAFETY: the exported symbol must have the `PluginEntry` signature. The
        // manager keeps this library loaded for as long as the returned pointer lives.
        let entry = unsafe { self.library.get::<PluginEntry>(symbol.as_bytes()) }.map_err(|e| {
            PluginError::MissingSymbol {
                path: self.path.clone(),
                symbol: symbol.to_owned(),
                source: e.into(),
            }
        })?;
        Ok(*entry)
    }
}
