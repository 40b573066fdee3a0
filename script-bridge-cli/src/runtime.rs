//! Loading the managed runtime library
//!
//! The runtime exports a bootstrap function that receives a pointer to an
//! all-null callback table and fills it with its own exports. The library
//! handle is kept next to the table: the function pointers are only valid
//! while it stays loaded.

use anyhow::{Context, Result};
use libloading::{Library, Symbol};
use script_bridge::ManagedCallbacks;
use std::path::{Path, PathBuf};

/// Signature of the runtime's bootstrap entry point
pub type BootstrapFn = unsafe extern "system" fn(*mut ManagedCallbacks);

/// A loaded runtime library and the table it produced
pub struct LoadedRuntime {
    path: PathBuf,
    entry_point: String,
    callbacks: ManagedCallbacks,
    // Dropped last; unloading invalidates every pointer in `callbacks`
    _library: Library,
}

impl LoadedRuntime {
    /// Load `path`, resolve `entry_point` and let the runtime fill a fresh table
    pub fn load(path: &Path, entry_point: &str) -> Result<Self> {
        log::info!("Loading managed runtime: {:?}", path);

        // SAFETY: loading a library runs its initialisers; the user chose to trust it.
        let library = unsafe { Library::new(path) }
            .with_context(|| format!("Failed to load runtime library: {:?}", path))?;

        let mut callbacks = ManagedCallbacks::new();
        {
            // SAFETY: the exported symbol is declared with `BootstrapFn`'s signature.
            let bootstrap: Symbol<BootstrapFn> = unsafe { library.get(entry_point.as_bytes()) }
                .with_context(|| {
                    format!("Runtime library {:?} does not export '{}'", path, entry_point)
                })?;

            log::debug!("Calling bootstrap entry point '{}'", entry_point);
            // SAFETY: the table outlives the call and has the layout the runtime expects.
            unsafe { bootstrap(&mut callbacks) };
        }

        let missing = callbacks.missing();
        if missing.is_empty() {
            log::debug!("Runtime filled all {} callbacks", ManagedCallbacks::required().len());
        } else {
            log::debug!("Runtime left {} callbacks unset", missing.len());
        }

        Ok(Self {
            path: path.to_path_buf(),
            entry_point: entry_point.to_string(),
            callbacks,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// The table as filled by the runtime (not yet validated)
    pub fn callbacks(&self) -> &ManagedCallbacks {
        &self.callbacks
    }
}
