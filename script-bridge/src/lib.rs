//! Script Bridge Library
//!
//! Registry for the callback table a managed scripting runtime hands to the
//! native engine at startup.
//!
//! # Architecture
//!
//! The runtime exports one function per (capability group, operation) pair and
//! passes their addresses to the engine in a single `#[repr(C)]` table. Before
//! anything calls through that table, the engine installs it into a
//! [`CallbackRegistry`], which:
//! - Rejects the table if any required callback is null, naming the first one
//! - Otherwise stores it and raises the readiness flag
//! - Hands out a [`ManagedBridge`] for typed calls once ready
//!
//! The library does NOT:
//! - Load the runtime or resolve its exports
//! - Decide whether a missing callback is fatal to startup
//! - Initialise logging
//!
//! Those belong to the host application (script-bridge-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use script_bridge::{CallbackRegistry, ManagedCallbacks};
//!
//! # fn runtime_fills(_: &mut ManagedCallbacks) {}
//! let mut table = ManagedCallbacks::new();
//! runtime_fills(&mut table);
//!
//! let mut registry = CallbackRegistry::new();
//! match registry.install(&table) {
//!     Ok(()) => {
//!         let bridge = registry.bridge().unwrap();
//!         bridge.install_trace_listener();
//!         bridge.initialize_default_task_scheduler();
//!     }
//!     Err(e) => eprintln!("Runtime not usable: {}", e),
//! }
//! ```

// Public modules
pub mod bridge;
pub mod callbacks;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use bridge::ManagedBridge;
pub use callbacks::{CallbackSlot, ManagedCallbacks};
pub use registry::CallbackRegistry;
pub use types::{BridgeError, CallbackId, GCHandle, Result};

// Lets the shared test fixture name this crate the same way in every test target
#[cfg(test)]
extern crate self as script_bridge;

#[cfg(test)]
mod test_support;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
