//! Stub callbacks shared by the library's unit and integration tests and the CLI tests
//!
//! Pulled into each test target with `#[path]`, so it names this crate as
//! `script_bridge` rather than `crate`.

use script_bridge::ManagedCallbacks;
use script_bridge::types::{
    CallError, Dictionary, GCHandle, GodotString, Object, Script, StringName, Variant,
};

unsafe extern "system" fn signal_callback(
    _: GCHandle,
    _: *const *const Variant,
    _: i32,
    _: *mut bool,
) {
}
unsafe extern "system" fn invoke_with_variant_args(
    _: GCHandle,
    _: *const *const Variant,
    _: u32,
    _: *const Variant,
) {
}
unsafe extern "system" fn delegate_equals(a: GCHandle, b: GCHandle) -> bool {
    a == b
}
unsafe extern "system" fn create_binding(_: *const StringName, _: *mut Object) -> GCHandle {
    std::ptr::null_mut()
}
unsafe extern "system" fn create_script_instance(
    _: *const Script,
    _: *mut Object,
    _: *const *const Variant,
    _: i32,
) {
}
unsafe extern "system" fn get_script_native_name(_: *const Script, _: *mut StringName) {}
unsafe extern "system" fn set_object_ptr(_: GCHandle, _: *mut Object) {}
unsafe extern "system" fn raise_event_signal(
    _: GCHandle,
    _: *const StringName,
    _: *const *const Variant,
    _: i32,
    _: *mut bool,
) {
}
unsafe extern "system" fn get_script_signal_list(_: *const Script, _: *mut Dictionary) {}
unsafe extern "system" fn script_string_query(_: *const Script, _: *const GodotString) -> bool {
    false
}
unsafe extern "system" fn script_is_or_inherits(a: *const Script, b: *const Script) -> bool {
    a == b
}
unsafe extern "system" fn remove_script_bridge(_: *const Script) {}
unsafe extern "system" fn update_script_class_info(
    _: *const Script,
    _: *mut bool,
    _: *mut Dictionary,
) {
}
unsafe extern "system" fn swap_gc_handle(_: GCHandle, _: *mut GCHandle, _: bool) -> bool {
    false
}
unsafe extern "system" fn instance_call(
    _: GCHandle,
    _: *const StringName,
    _: *const *const Variant,
    _: i32,
    _: *mut CallError,
    _: *mut Variant,
) -> bool {
    false
}
unsafe extern "system" fn instance_set(
    _: GCHandle,
    _: *const StringName,
    _: *const Variant,
) -> bool {
    false
}
unsafe extern "system" fn instance_get(
    _: GCHandle,
    _: *const StringName,
    _: *mut Variant,
) -> bool {
    false
}
unsafe extern "system" fn call_dispose(_: GCHandle, _: bool) {}
unsafe extern "system" fn call_to_string(_: GCHandle, _: *mut GodotString, _: *mut bool) {}
unsafe extern "system" fn has_method_unknown_params(
    _: *const Script,
    _: *const GodotString,
    _: bool,
) -> bool {
    false
}
unsafe extern "system" fn free_gc_handle(_: GCHandle) {}

/// Do-nothing stub for the argument-less callbacks
pub unsafe extern "system" fn unit() {}

/// A table with every callback set to a stub, `frame` as the frame callback
pub fn complete_table(frame: unsafe extern "system" fn()) -> ManagedCallbacks {
    ManagedCallbacks {
        signal_awaiter_signal_callback: Some(signal_callback),
        delegate_utils_invoke_with_variant_args: Some(invoke_with_variant_args),
        delegate_utils_delegate_equals: Some(delegate_equals),
        script_manager_bridge_frame_callback: Some(frame),
        script_manager_bridge_create_managed_for_godot_object_binding: Some(create_binding),
        script_manager_bridge_create_managed_for_godot_object_script_instance: Some(
            create_script_instance,
        ),
        script_manager_bridge_get_script_native_name: Some(get_script_native_name),
        script_manager_bridge_set_godot_object_ptr: Some(set_object_ptr),
        script_manager_bridge_raise_event_signal: Some(raise_event_signal),
        script_manager_bridge_get_script_signal_list: Some(get_script_signal_list),
        script_manager_bridge_has_script_signal: Some(script_string_query),
        script_manager_bridge_script_is_or_inherits: Some(script_is_or_inherits),
        script_manager_bridge_add_script_bridge: Some(script_string_query),
        script_manager_bridge_remove_script_bridge: Some(remove_script_bridge),
        script_manager_bridge_update_script_class_info: Some(update_script_class_info),
        script_manager_bridge_swap_gc_handle_for_type: Some(swap_gc_handle),
        csharp_instance_bridge_call: Some(instance_call),
        csharp_instance_bridge_set: Some(instance_set),
        csharp_instance_bridge_get: Some(instance_get),
        csharp_instance_bridge_call_dispose: Some(call_dispose),
        csharp_instance_bridge_call_to_string: Some(call_to_string),
        csharp_instance_bridge_has_method_unknown_params: Some(has_method_unknown_params),
        gc_handle_bridge_free_gc_handle: Some(free_gc_handle),
        debugging_utils_install_trace_listener: Some(unit),
        dispatcher_initialize_default_godot_task_scheduler: Some(unit),
        disposables_tracker_on_godot_shutting_down: Some(unit),
    }
}
