//! The managed callback table
//!
//! The managed runtime exports one function per (group, operation) pair and
//! hands the engine a `ManagedCallbacks` filled with their addresses. Every
//! field is an `Option` of a function pointer: a null written by the runtime
//! reads back as `None`, which is exactly what validation looks for.
//!
//! All callbacks use the `system` ABI (stdcall on 32-bit Windows, C elsewhere),
//! matching how the managed side declares its unmanaged entry points.

use crate::types::{
    BridgeError, CallError, CallbackId, Dictionary, GCHandle, GodotString, Object, Result,
    Script, StringName, Variant,
};

// Signal dispatch
pub type SignalAwaiterSignalCallback =
    unsafe extern "system" fn(GCHandle, *const *const Variant, i32, *mut bool);

// Delegates
pub type DelegateUtilsInvokeWithVariantArgs =
    unsafe extern "system" fn(GCHandle, *const *const Variant, u32, *const Variant);
pub type DelegateUtilsDelegateEquals = unsafe extern "system" fn(GCHandle, GCHandle) -> bool;

// Script manager
pub type ScriptManagerBridgeFrameCallback = unsafe extern "system" fn();
pub type ScriptManagerBridgeCreateManagedForGodotObjectBinding =
    unsafe extern "system" fn(*const StringName, *mut Object) -> GCHandle;
pub type ScriptManagerBridgeCreateManagedForGodotObjectScriptInstance =
    unsafe extern "system" fn(*const Script, *mut Object, *const *const Variant, i32);
pub type ScriptManagerBridgeGetScriptNativeName =
    unsafe extern "system" fn(*const Script, *mut StringName);
pub type ScriptManagerBridgeSetGodotObjectPtr = unsafe extern "system" fn(GCHandle, *mut Object);
pub type ScriptManagerBridgeRaiseEventSignal = unsafe extern "system" fn(
    GCHandle,
    *const StringName,
    *const *const Variant,
    i32,
    *mut bool,
);
pub type ScriptManagerBridgeGetScriptSignalList =
    unsafe extern "system" fn(*const Script, *mut Dictionary);
pub type ScriptManagerBridgeHasScriptSignal =
    unsafe extern "system" fn(*const Script, *const GodotString) -> bool;
pub type ScriptManagerBridgeScriptIsOrInherits =
    unsafe extern "system" fn(*const Script, *const Script) -> bool;
pub type ScriptManagerBridgeAddScriptBridge =
    unsafe extern "system" fn(*const Script, *const GodotString) -> bool;
pub type ScriptManagerBridgeRemoveScriptBridge = unsafe extern "system" fn(*const Script);
pub type ScriptManagerBridgeUpdateScriptClassInfo =
    unsafe extern "system" fn(*const Script, *mut bool, *mut Dictionary);
pub type ScriptManagerBridgeSwapGCHandleForType =
    unsafe extern "system" fn(GCHandle, *mut GCHandle, bool) -> bool;

// Script instances
pub type CSharpInstanceBridgeCall = unsafe extern "system" fn(
    GCHandle,
    *const StringName,
    *const *const Variant,
    i32,
    *mut CallError,
    *mut Variant,
) -> bool;
pub type CSharpInstanceBridgeSet =
    unsafe extern "system" fn(GCHandle, *const StringName, *const Variant) -> bool;
pub type CSharpInstanceBridgeGet =
    unsafe extern "system" fn(GCHandle, *const StringName, *mut Variant) -> bool;
pub type CSharpInstanceBridgeCallDispose = unsafe extern "system" fn(GCHandle, bool);
pub type CSharpInstanceBridgeCallToString =
    unsafe extern "system" fn(GCHandle, *mut GodotString, *mut bool);
pub type CSharpInstanceBridgeHasMethodUnknownParams =
    unsafe extern "system" fn(*const Script, *const GodotString, bool) -> bool;

// GC handles
pub type GCHandleBridgeFreeGCHandle = unsafe extern "system" fn(GCHandle);

// Runtime lifecycle
pub type DebuggingUtilsInstallTraceListener = unsafe extern "system" fn();
pub type DispatcherInitializeDefaultGodotTaskScheduler = unsafe extern "system" fn();
pub type DisposablesTrackerOnGodotShuttingDown = unsafe extern "system" fn();

/// Function pointers exported by the managed runtime
///
/// The layout is shared with the runtime, so field order must not change.
/// `Default` is the all-null table the engine starts with.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagedCallbacks {
    pub signal_awaiter_signal_callback: Option<SignalAwaiterSignalCallback>,
    pub delegate_utils_invoke_with_variant_args: Option<DelegateUtilsInvokeWithVariantArgs>,
    pub delegate_utils_delegate_equals: Option<DelegateUtilsDelegateEquals>,
    pub script_manager_bridge_frame_callback: Option<ScriptManagerBridgeFrameCallback>,
    pub script_manager_bridge_create_managed_for_godot_object_binding:
        Option<ScriptManagerBridgeCreateManagedForGodotObjectBinding>,
    pub script_manager_bridge_create_managed_for_godot_object_script_instance:
        Option<ScriptManagerBridgeCreateManagedForGodotObjectScriptInstance>,
    pub script_manager_bridge_get_script_native_name:
        Option<ScriptManagerBridgeGetScriptNativeName>,
    pub script_manager_bridge_set_godot_object_ptr: Option<ScriptManagerBridgeSetGodotObjectPtr>,
    pub script_manager_bridge_raise_event_signal: Option<ScriptManagerBridgeRaiseEventSignal>,
    pub script_manager_bridge_get_script_signal_list:
        Option<ScriptManagerBridgeGetScriptSignalList>,
    pub script_manager_bridge_has_script_signal: Option<ScriptManagerBridgeHasScriptSignal>,
    pub script_manager_bridge_script_is_or_inherits:
        Option<ScriptManagerBridgeScriptIsOrInherits>,
    pub script_manager_bridge_add_script_bridge: Option<ScriptManagerBridgeAddScriptBridge>,
    pub script_manager_bridge_remove_script_bridge: Option<ScriptManagerBridgeRemoveScriptBridge>,
    pub script_manager_bridge_update_script_class_info:
        Option<ScriptManagerBridgeUpdateScriptClassInfo>,
    pub script_manager_bridge_swap_gc_handle_for_type:
        Option<ScriptManagerBridgeSwapGCHandleForType>,
    pub csharp_instance_bridge_call: Option<CSharpInstanceBridgeCall>,
    pub csharp_instance_bridge_set: Option<CSharpInstanceBridgeSet>,
    pub csharp_instance_bridge_get: Option<CSharpInstanceBridgeGet>,
    pub csharp_instance_bridge_call_dispose: Option<CSharpInstanceBridgeCallDispose>,
    pub csharp_instance_bridge_call_to_string: Option<CSharpInstanceBridgeCallToString>,
    pub csharp_instance_bridge_has_method_unknown_params:
        Option<CSharpInstanceBridgeHasMethodUnknownParams>,
    pub gc_handle_bridge_free_gc_handle: Option<GCHandleBridgeFreeGCHandle>,
    pub debugging_utils_install_trace_listener: Option<DebuggingUtilsInstallTraceListener>,
    pub dispatcher_initialize_default_godot_task_scheduler:
        Option<DispatcherInitializeDefaultGodotTaskScheduler>,
    pub disposables_tracker_on_godot_shutting_down: Option<DisposablesTrackerOnGodotShuttingDown>,
}

/// One entry of the required-callback list
///
/// `address` reads the field's code address (`None` when null) and `clear`
/// nulls it. Both are plain function pointers so the list can live in a static.
#[derive(Clone, Copy)]
pub struct CallbackSlot {
    pub id: CallbackId,
    pub address: fn(&ManagedCallbacks) -> Option<usize>,
    pub clear: fn(&mut ManagedCallbacks),
}

impl std::fmt::Debug for CallbackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSlot").field("id", &self.id).finish()
    }
}

macro_rules! slot {
    ($group:literal, $operation:literal, $field:ident) => {
        CallbackSlot {
            id: CallbackId::new($group, $operation),
            address: |table| table.$field.map(|f| f as usize),
            clear: |table| table.$field = None,
        }
    };
}

/// Every callback the engine requires, in validation order
static REQUIRED_CALLBACKS: [CallbackSlot; 26] = [
    slot!("SignalAwaiter", "SignalCallback", signal_awaiter_signal_callback),
    slot!("DelegateUtils", "InvokeWithVariantArgs", delegate_utils_invoke_with_variant_args),
    slot!("DelegateUtils", "DelegateEquals", delegate_utils_delegate_equals),
    slot!("ScriptManagerBridge", "FrameCallback", script_manager_bridge_frame_callback),
    slot!(
        "ScriptManagerBridge",
        "CreateManagedForGodotObjectBinding",
        script_manager_bridge_create_managed_for_godot_object_binding
    ),
    slot!(
        "ScriptManagerBridge",
        "CreateManagedForGodotObjectScriptInstance",
        script_manager_bridge_create_managed_for_godot_object_script_instance
    ),
    slot!("ScriptManagerBridge", "GetScriptNativeName", script_manager_bridge_get_script_native_name),
    slot!("ScriptManagerBridge", "SetGodotObjectPtr", script_manager_bridge_set_godot_object_ptr),
    slot!("ScriptManagerBridge", "RaiseEventSignal", script_manager_bridge_raise_event_signal),
    slot!("ScriptManagerBridge", "GetScriptSignalList", script_manager_bridge_get_script_signal_list),
    slot!("ScriptManagerBridge", "HasScriptSignal", script_manager_bridge_has_script_signal),
    slot!("ScriptManagerBridge", "ScriptIsOrInherits", script_manager_bridge_script_is_or_inherits),
    slot!("ScriptManagerBridge", "AddScriptBridge", script_manager_bridge_add_script_bridge),
    slot!("ScriptManagerBridge", "RemoveScriptBridge", script_manager_bridge_remove_script_bridge),
    slot!(
        "ScriptManagerBridge",
        "UpdateScriptClassInfo",
        script_manager_bridge_update_script_class_info
    ),
    slot!("ScriptManagerBridge", "SwapGCHandleForType", script_manager_bridge_swap_gc_handle_for_type),
    slot!("CSharpInstanceBridge", "Call", csharp_instance_bridge_call),
    slot!("CSharpInstanceBridge", "Set", csharp_instance_bridge_set),
    slot!("CSharpInstanceBridge", "Get", csharp_instance_bridge_get),
    slot!("CSharpInstanceBridge", "CallDispose", csharp_instance_bridge_call_dispose),
    slot!("CSharpInstanceBridge", "CallToString", csharp_instance_bridge_call_to_string),
    slot!(
        "CSharpInstanceBridge",
        "HasMethodUnknownParams",
        csharp_instance_bridge_has_method_unknown_params
    ),
    slot!("GCHandleBridge", "FreeGCHandle", gc_handle_bridge_free_gc_handle),
    slot!("DebuggingUtils", "InstallTraceListener", debugging_utils_install_trace_listener),
    slot!(
        "Dispatcher",
        "InitializeDefaultGodotTaskScheduler",
        dispatcher_initialize_default_godot_task_scheduler
    ),
    slot!("DisposablesTracker", "OnGodotShuttingDown", disposables_tracker_on_godot_shutting_down),
];

impl ManagedCallbacks {
    /// Create an all-null table
    pub fn new() -> Self {
        Self::default()
    }

    /// The required-callback list, in validation order
    pub fn required() -> &'static [CallbackSlot] {
        &REQUIRED_CALLBACKS
    }

    /// Check that every required callback is set
    ///
    /// Fails on the first null entry in validation order.
    pub fn validate(&self) -> Result<()> {
        match Self::required().iter().find(|slot| (slot.address)(self).is_none()) {
            Some(slot) => Err(BridgeError::from(slot.id)),
            None => Ok(()),
        }
    }

    /// All null entries, in validation order
    pub fn missing(&self) -> Vec<CallbackId> {
        Self::required()
            .iter()
            .filter(|slot| (slot.address)(self).is_none())
            .map(|slot| slot.id)
            .collect()
    }

    /// True if no required callback is null
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Code address stored for a callback, `None` if null or unknown
    pub fn address_of(&self, id: CallbackId) -> Option<usize> {
        Self::required()
            .iter()
            .find(|slot| slot.id == id)
            .and_then(|slot| (slot.address)(self))
    }

    /// Null out a single callback, returns false for an unknown id
    pub fn clear(&mut self, id: CallbackId) -> bool {
        match Self::required().iter().find(|slot| slot.id == id) {
            Some(slot) => {
                (slot.clear)(self);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    unsafe extern "system" fn noop() {}

    #[test]
    fn test_default_table_is_empty() {
        let table = ManagedCallbacks::new();
        assert!(!table.is_complete());
        assert_eq!(table.missing().len(), ManagedCallbacks::required().len());
        assert_eq!(
            table.validate(),
            Err(BridgeError::from(CallbackId::new("SignalAwaiter", "SignalCallback")))
        );
    }

    #[test]
    fn test_required_list_matches_table_layout() {
        // One slot per field, no duplicates
        let size = std::mem::size_of::<ManagedCallbacks>();
        assert_eq!(size, ManagedCallbacks::required().len() * std::mem::size_of::<usize>());

        let names: HashSet<String> = ManagedCallbacks::required()
            .iter()
            .map(|slot| slot.id.to_string())
            .collect();
        assert_eq!(names.len(), 26);
    }

    #[test]
    fn test_slot_accessors() {
        let mut table = ManagedCallbacks::new();
        table.script_manager_bridge_frame_callback = Some(noop);

        let id = CallbackId::new("ScriptManagerBridge", "FrameCallback");
        assert_eq!(table.address_of(id), Some(noop as usize));
        assert!(!table.missing().contains(&id));

        assert!(table.clear(id));
        assert_eq!(table.address_of(id), None);
        assert!(table.missing().contains(&id));
    }

    #[test]
    fn test_unknown_id() {
        let mut table = ManagedCallbacks::new();
        let id = CallbackId::new("Nope", "Nothing");
        assert_eq!(table.address_of(id), None);
        assert!(!table.clear(id));
    }
}
