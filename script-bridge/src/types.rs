//! Core types shared by the callback table, the registry and the bridge
//!
//! Engine-side objects crossing the runtime boundary are opaque to this crate:
//! they are only ever passed through as raw pointers, so they are modelled as
//! `c_void`-backed handle aliases rather than concrete structs.

use serde::Serialize;
use std::fmt;
use std::os::raw::c_void;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Pointer-sized handle to a managed object kept alive by the runtime's GC
pub type GCHandle = *mut c_void;

// Opaque engine types (pointee side of the callback signatures)
pub type Variant = c_void;
pub type StringName = c_void;
pub type Object = c_void;
pub type Script = c_void;
pub type Dictionary = c_void;
pub type GodotString = c_void;
pub type CallError = c_void;

/// Identity of a single required callback: the capability group exporting it
/// and the operation it performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallbackId {
    /// Capability group on the managed side (e.g. "ScriptManagerBridge")
    pub group: &'static str,
    /// Operation within the group (e.g. "FrameCallback")
    pub operation: &'static str,
}

impl CallbackId {
    /// Create a new callback id
    pub const fn new(group: &'static str, operation: &'static str) -> Self {
        Self { group, operation }
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group, self.operation)
    }
}

/// Errors raised while installing a callback table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("Managed callback for '{group}_{operation}' is null")]
    MissingCallback {
        group: &'static str,
        operation: &'static str,
    },
}

impl BridgeError {
    /// The callback the error refers to
    pub fn callback(&self) -> CallbackId {
        match self {
            BridgeError::MissingCallback { group, operation } => CallbackId::new(group, operation),
        }
    }
}

impl From<CallbackId> for BridgeError {
    fn from(id: CallbackId) -> Self {
        BridgeError::MissingCallback {
            group: id.group,
            operation: id.operation,
        }
    }
}
