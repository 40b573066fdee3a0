//! Typed calls into the managed runtime
//!
//! `ManagedBridge` is a borrowed view over a complete callback table. It is
//! handed out by a ready [`CallbackRegistry`](crate::CallbackRegistry), so a
//! subsystem holding one never has to check readiness again.
//!
//! The four lifecycle hooks take no arguments and are exposed as safe methods:
//! the runtime guarantees its exported functions stay valid for the life of the
//! process. Everything that passes engine pointers or GC handles across the
//! boundary is `unsafe`, with the usual contract that the pointers are valid
//! for the callee.

use crate::callbacks::ManagedCallbacks;
use crate::types::{
    CallError, Dictionary, GCHandle, GodotString, Object, Result, Script, StringName, Variant,
};

/// Invocation surface over a validated callback table
#[derive(Debug, Clone, Copy)]
pub struct ManagedBridge<'a> {
    callbacks: &'a ManagedCallbacks,
}

// Reached only if a table was mutated behind the bridge's back.
#[cold]
fn missing(name: &str) -> ! {
    panic!("Script bridge: managed callback '{}' called through an incomplete table", name)
}

macro_rules! callback {
    ($self:ident . $field:ident, $name:literal) => {
        match $self.callbacks.$field {
            Some(f) => f,
            None => missing($name),
        }
    };
}

fn arg_count(args: &[*const Variant]) -> i32 {
    debug_assert!(args.len() <= i32::MAX as usize);
    args.len() as i32
}

// Delegate invocation takes an unsigned count
fn arg_count_u32(args: &[*const Variant]) -> u32 {
    debug_assert!(args.len() <= u32::MAX as usize);
    args.len() as u32
}

impl<'a> ManagedBridge<'a> {
    /// Build a bridge over a table, validating it first
    pub fn new(callbacks: &'a ManagedCallbacks) -> Result<Self> {
        callbacks.validate()?;
        Ok(Self::new_unchecked(callbacks))
    }

    pub(crate) fn new_unchecked(callbacks: &'a ManagedCallbacks) -> Self {
        Self { callbacks }
    }

    /// The underlying table
    pub fn callbacks(&self) -> &'a ManagedCallbacks {
        self.callbacks
    }

    // --- Runtime lifecycle -------------------------------------------------

    /// Per-frame tick for the managed side (continuations, deferred work)
    pub fn frame_callback(&self) {
        let f = callback!(
            self.script_manager_bridge_frame_callback,
            "ScriptManagerBridge_FrameCallback"
        );
        // SAFETY: table is complete and the runtime keeps its exports alive.
        unsafe { f() }
    }

    /// Route managed trace output into the engine's logger
    pub fn install_trace_listener(&self) {
        log::trace!("Script bridge: installing managed trace listener");
        let f = callback!(
            self.debugging_utils_install_trace_listener,
            "DebuggingUtils_InstallTraceListener"
        );
        // SAFETY: see `frame_callback`.
        unsafe { f() }
    }

    /// Install the engine-driven default task scheduler on the managed side
    pub fn initialize_default_task_scheduler(&self) {
        log::trace!("Script bridge: initializing default task scheduler");
        let f = callback!(
            self.dispatcher_initialize_default_godot_task_scheduler,
            "Dispatcher_InitializeDefaultGodotTaskScheduler"
        );
        // SAFETY: see `frame_callback`.
        unsafe { f() }
    }

    /// Tell the runtime the engine is shutting down so it can dispose tracked objects
    pub fn on_shutting_down(&self) {
        log::trace!("Script bridge: notifying runtime of shutdown");
        let f = callback!(
            self.disposables_tracker_on_godot_shutting_down,
            "DisposablesTracker_OnGodotShuttingDown"
        );
        // SAFETY: see `frame_callback`.
        unsafe { f() }
    }

    // --- Signals -----------------------------------------------------------

    /// Resume an awaiter waiting on a signal. Returns true if the awaiter was gone.
    ///
    /// # Safety
    /// `awaiter` must be a live GC handle and every entry of `args` a valid variant.
    pub unsafe fn signal_callback(&self, awaiter: GCHandle, args: &[*const Variant]) -> bool {
        let f = callback!(self.signal_awaiter_signal_callback, "SignalAwaiter_SignalCallback");
        let mut awaiter_is_null = false;
        unsafe { f(awaiter, args.as_ptr(), arg_count(args), &mut awaiter_is_null) };
        awaiter_is_null
    }

    /// Raise a managed event signal on an owner. Returns true if the owner was gone.
    ///
    /// # Safety
    /// `owner` must be a live GC handle, `signal` a valid string name and every
    /// entry of `args` a valid variant.
    pub unsafe fn raise_event_signal(
        &self,
        owner: GCHandle,
        signal: *const StringName,
        args: &[*const Variant],
    ) -> bool {
        let f = callback!(
            self.script_manager_bridge_raise_event_signal,
            "ScriptManagerBridge_RaiseEventSignal"
        );
        let mut owner_is_null = false;
        unsafe { f(owner, signal, args.as_ptr(), arg_count(args), &mut owner_is_null) };
        owner_is_null
    }

    /// Fill `out` with the signals a script declares
    ///
    /// # Safety
    /// `script` and `out` must be valid.
    pub unsafe fn get_script_signal_list(&self, script: *const Script, out: *mut Dictionary) {
        let f = callback!(
            self.script_manager_bridge_get_script_signal_list,
            "ScriptManagerBridge_GetScriptSignalList"
        );
        unsafe { f(script, out) }
    }

    /// # Safety
    /// `script` and `name` must be valid.
    pub unsafe fn has_script_signal(
        &self,
        script: *const Script,
        name: *const GodotString,
    ) -> bool {
        let f = callback!(
            self.script_manager_bridge_has_script_signal,
            "ScriptManagerBridge_HasScriptSignal"
        );
        unsafe { f(script, name) }
    }

    // --- Delegates ---------------------------------------------------------

    /// Invoke a managed delegate with `ret` as its return slot
    ///
    /// # Safety
    /// `delegate` must be a live GC handle, `args` entries valid variants and
    /// `ret` a valid variant the runtime may store the result in.
    pub unsafe fn invoke_with_variant_args(
        &self,
        delegate: GCHandle,
        args: &[*const Variant],
        ret: *const Variant,
    ) {
        let f = callback!(
            self.delegate_utils_invoke_with_variant_args,
            "DelegateUtils_InvokeWithVariantArgs"
        );
        unsafe { f(delegate, args.as_ptr(), arg_count_u32(args), ret) }
    }

    /// # Safety
    /// Both handles must be live GC handles to delegates.
    pub unsafe fn delegate_equals(&self, a: GCHandle, b: GCHandle) -> bool {
        let f = callback!(self.delegate_utils_delegate_equals, "DelegateUtils_DelegateEquals");
        unsafe { f(a, b) }
    }

    // --- Object binding ----------------------------------------------------

    /// Create the managed wrapper for a native object of class `native_name`
    ///
    /// # Safety
    /// `native_name` and `object` must be valid.
    pub unsafe fn create_managed_for_object_binding(
        &self,
        native_name: *const StringName,
        object: *mut Object,
    ) -> GCHandle {
        let f = callback!(
            self.script_manager_bridge_create_managed_for_godot_object_binding,
            "ScriptManagerBridge_CreateManagedForGodotObjectBinding"
        );
        unsafe { f(native_name, object) }
    }

    /// Create a managed script instance for `object`, passing constructor arguments
    ///
    /// # Safety
    /// `script`, `object` and every entry of `args` must be valid.
    pub unsafe fn create_managed_for_object_script_instance(
        &self,
        script: *const Script,
        object: *mut Object,
        args: &[*const Variant],
    ) {
        let f = callback!(
            self.script_manager_bridge_create_managed_for_godot_object_script_instance,
            "ScriptManagerBridge_CreateManagedForGodotObjectScriptInstance"
        );
        unsafe { f(script, object, args.as_ptr(), arg_count(args)) }
    }

    /// # Safety
    /// `script` must be valid and `out` valid for writes.
    pub unsafe fn get_script_native_name(&self, script: *const Script, out: *mut StringName) {
        let f = callback!(
            self.script_manager_bridge_get_script_native_name,
            "ScriptManagerBridge_GetScriptNativeName"
        );
        unsafe { f(script, out) }
    }

    /// Point a managed wrapper at a (possibly new) native object
    ///
    /// # Safety
    /// `handle` must be a live GC handle; `object` valid or null.
    pub unsafe fn set_object_ptr(&self, handle: GCHandle, object: *mut Object) {
        let f = callback!(
            self.script_manager_bridge_set_godot_object_ptr,
            "ScriptManagerBridge_SetGodotObjectPtr"
        );
        unsafe { f(handle, object) }
    }

    // --- Script bridge -----------------------------------------------------

    /// # Safety
    /// Both scripts must be valid.
    pub unsafe fn script_is_or_inherits(&self, script: *const Script, base: *const Script) -> bool {
        let f = callback!(
            self.script_manager_bridge_script_is_or_inherits,
            "ScriptManagerBridge_ScriptIsOrInherits"
        );
        unsafe { f(script, base) }
    }

    /// Bind a script resource to the managed type found at `path`
    ///
    /// # Safety
    /// `script` and `path` must be valid.
    pub unsafe fn add_script_bridge(
        &self,
        script: *const Script,
        path: *const GodotString,
    ) -> bool {
        let f = callback!(
            self.script_manager_bridge_add_script_bridge,
            "ScriptManagerBridge_AddScriptBridge"
        );
        unsafe { f(script, path) }
    }

    /// # Safety
    /// `script` must be valid.
    pub unsafe fn remove_script_bridge(&self, script: *const Script) {
        let f = callback!(
            self.script_manager_bridge_remove_script_bridge,
            "ScriptManagerBridge_RemoveScriptBridge"
        );
        unsafe { f(script) }
    }

    /// Refresh exported class info. Returns whether the script is a tool script.
    ///
    /// # Safety
    /// `script` must be valid and `rpc_functions` valid for writes.
    pub unsafe fn update_script_class_info(
        &self,
        script: *const Script,
        rpc_functions: *mut Dictionary,
    ) -> bool {
        let f = callback!(
            self.script_manager_bridge_update_script_class_info,
            "ScriptManagerBridge_UpdateScriptClassInfo"
        );
        let mut tool = false;
        unsafe { f(script, &mut tool, rpc_functions) };
        tool
    }

    /// Swap a handle between strong and weak. Returns the new handle if one was created.
    ///
    /// # Safety
    /// `handle` must be a live GC handle.
    pub unsafe fn swap_gc_handle_for_type(
        &self,
        handle: GCHandle,
        create_weak: bool,
    ) -> Option<GCHandle> {
        let f = callback!(
            self.script_manager_bridge_swap_gc_handle_for_type,
            "ScriptManagerBridge_SwapGCHandleForType"
        );
        let mut new_handle: GCHandle = std::ptr::null_mut();
        let swapped = unsafe { f(handle, &mut new_handle, create_weak) };
        swapped.then_some(new_handle)
    }

    // --- Script instances --------------------------------------------------

    /// Call a method on a managed script instance
    ///
    /// # Safety
    /// `instance` must be a live GC handle; `method`, `args` entries, `error`
    /// and `ret` must be valid.
    pub unsafe fn call(
        &self,
        instance: GCHandle,
        method: *const StringName,
        args: &[*const Variant],
        error: *mut CallError,
        ret: *mut Variant,
    ) -> bool {
        let f = callback!(self.csharp_instance_bridge_call, "CSharpInstanceBridge_Call");
        unsafe { f(instance, method, args.as_ptr(), arg_count(args), error, ret) }
    }

    /// # Safety
    /// `instance` must be a live GC handle; `name` and `value` valid.
    pub unsafe fn set(
        &self,
        instance: GCHandle,
        name: *const StringName,
        value: *const Variant,
    ) -> bool {
        let f = callback!(self.csharp_instance_bridge_set, "CSharpInstanceBridge_Set");
        unsafe { f(instance, name, value) }
    }

    /// # Safety
    /// `instance` must be a live GC handle; `name` valid and `out` valid for writes.
    pub unsafe fn get(
        &self,
        instance: GCHandle,
        name: *const StringName,
        out: *mut Variant,
    ) -> bool {
        let f = callback!(self.csharp_instance_bridge_get, "CSharpInstanceBridge_Get");
        unsafe { f(instance, name, out) }
    }

    /// # Safety
    /// `instance` must be a live GC handle.
    pub unsafe fn call_dispose(&self, instance: GCHandle, ok_if_null: bool) {
        let f = callback!(
            self.csharp_instance_bridge_call_dispose,
            "CSharpInstanceBridge_CallDispose"
        );
        unsafe { f(instance, ok_if_null) }
    }

    /// Returns whether `out` was written
    ///
    /// # Safety
    /// `instance` must be a live GC handle and `out` valid for writes.
    pub unsafe fn call_to_string(&self, instance: GCHandle, out: *mut GodotString) -> bool {
        let f = callback!(
            self.csharp_instance_bridge_call_to_string,
            "CSharpInstanceBridge_CallToString"
        );
        let mut valid = false;
        unsafe { f(instance, out, &mut valid) };
        valid
    }

    /// # Safety
    /// `script` and `method` must be valid.
    pub unsafe fn has_method_unknown_params(
        &self,
        script: *const Script,
        method: *const GodotString,
        deep: bool,
    ) -> bool {
        let f = callback!(
            self.csharp_instance_bridge_has_method_unknown_params,
            "CSharpInstanceBridge_HasMethodUnknownParams"
        );
        unsafe { f(script, method, deep) }
    }

    // --- GC handles --------------------------------------------------------

    /// # Safety
    /// `handle` must be a live GC handle and must not be used afterwards.
    pub unsafe fn free_gc_handle(&self, handle: GCHandle) {
        let f = callback!(self.gc_handle_bridge_free_gc_handle, "GCHandleBridge_FreeGCHandle");
        unsafe { f(handle) }
    }
}
