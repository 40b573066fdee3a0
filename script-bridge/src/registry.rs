//! Callback registry
//!
//! Holds the callback table installed by the managed runtime together with the
//! readiness flag. The registry is an ordinary value owned by the engine's
//! startup code and lent out by reference to the subsystems that call into the
//! runtime; there is no process-wide instance.
//!
//! Installation needs `&mut self`, so it cannot overlap with any outstanding
//! read borrow. Sharing a registry across threads is up to the owner (wrap it
//! in whatever synchronisation publishes it after startup).

use crate::bridge::ManagedBridge;
use crate::callbacks::ManagedCallbacks;
use crate::types::Result;

/// Stores the validated callback table and the readiness flag
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    /// Last table that passed validation (all-null before the first install)
    table: ManagedCallbacks,
    /// True once a complete table has been installed
    ready: bool,
}

impl CallbackRegistry {
    /// Create an empty, unready registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a candidate table and install it
    ///
    /// If any required callback is null, the error names the first one in
    /// validation order and neither the stored table nor the readiness flag
    /// changes. Whether that is fatal is the caller's decision.
    ///
    /// Installing again after success replaces the stored table.
    ///
    /// # Example
    /// ```
    /// use script_bridge::{CallbackRegistry, ManagedCallbacks};
    ///
    /// let mut registry = CallbackRegistry::new();
    /// let err = registry.install(&ManagedCallbacks::new()).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Managed callback for 'SignalAwaiter_SignalCallback' is null"
    /// );
    /// assert!(!registry.is_ready());
    /// ```
    pub fn install(&mut self, candidate: &ManagedCallbacks) -> Result<()> {
        if let Err(e) = candidate.validate() {
            log::error!("Script bridge: {}.", e);
            return Err(e);
        }

        if self.ready {
            log::warn!("Script bridge: replacing an already installed callback table");
        }

        self.table = *candidate;
        self.ready = true;

        log::debug!(
            "Script bridge: installed {} managed callbacks",
            ManagedCallbacks::required().len()
        );
        Ok(())
    }

    /// Readiness flag
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The installed table, or `None` before a successful install
    pub fn callbacks(&self) -> Option<&ManagedCallbacks> {
        self.ready.then_some(&self.table)
    }

    /// Typed invocation surface, or `None` before a successful install
    pub fn bridge(&self) -> Option<ManagedBridge<'_>> {
        self.callbacks().map(ManagedBridge::new_unchecked)
    }

    /// The stored table regardless of readiness
    pub fn stored(&self) -> &ManagedCallbacks {
        &self.table
    }
}
