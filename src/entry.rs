//! Function-pointer table for the runtime's exported `ovr_*` symbols.
//!
//! Symbols that cannot be resolved are bound to fallbacks that return
//! [`OvrResult::ERROR_LIB_SYMBOLS`] (or an all-zero value for calls without a
//! result code), so a partially loaded table is still safe to call.
//!
//! Outside this crate a table is only built through [`EntryPoints::load`],
//! whose contract covers every pointer it binds.

use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int, c_uint};

use ash::vk;

use crate::ffi::*;
use crate::result::OvrResult;

macro_rules! entry_points {
    ($(
        $field:ident = $symbol:literal ($($arg:ident : $ty:ty),*) -> $ret:ty => $fallback:expr;
    )*) => {
        #[allow(non_camel_case_types)]
        pub mod pfn {
            use super::*;
            $(pub type $field = unsafe extern "C" fn($($ty),*) -> $ret;)*
        }

        #[derive(Copy, Clone)]
        pub struct EntryPoints {
            $(pub(crate) $field: pfn::$field,)*
        }

        impl EntryPoints {
            /// Every symbol name this table resolves, in declaration order.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol,)*];

            /// A table where every entry is a fallback.
            pub fn missing() -> Self {
                $(
                    #[allow(unused_variables)]
                    unsafe extern "C" fn $field($($arg: $ty),*) -> $ret {
                        $fallback
                    }
                )*
                Self {
                    $($field,)*
                }
            }

            /// Resolves every symbol through `lookup`, which returns null for
            /// names it cannot find.
            ///
            /// # Safety
            ///
            /// Non-null pointers handed out by `lookup` must be functions with
            /// the native signature of the symbol they were looked up by, and
            /// must outlive the returned table. The descriptor query is bound
            /// into both width slots; the safe API only calls the slot of the
            /// running process.
            pub unsafe fn load(mut lookup: impl FnMut(&CStr) -> *const c_void) -> Self {
                let mut table = Self::missing();
                let mut resolved = 0usize;
                $(
                    let name = CStr::from_bytes_with_nul_unchecked(concat!($symbol, "\0").as_bytes());
                    let ptr = lookup(name);
                    if ptr.is_null() {
                        log::warn!("runtime does not export {}", $symbol);
                    } else {
                        table.$field = std::mem::transmute::<*const c_void, pfn::$field>(ptr);
                        resolved += 1;
                    }
                )*
                log::debug!(
                    "resolved {} of {} runtime entry points",
                    resolved,
                    Self::SYMBOLS.len()
                );
                table
            }
        }

        impl Default for EntryPoints {
            fn default() -> Self {
                Self::missing()
            }
        }
    };
}

entry_points! {
    initialize = "ovr_Initialize" (params: *const InitParams) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    shutdown = "ovr_Shutdown" () -> () => ();
    get_last_error_info = "ovr_GetLastErrorInfo" (error_info: *mut ErrorInfo) -> ()
        => if !error_info.is_null() {
            *error_info = ErrorInfo {
                result: OvrResult::ERROR_LIB_SYMBOLS,
                ..ErrorInfo::default()
            };
        };
    get_version_string = "ovr_GetVersionString" () -> *const c_char => std::ptr::null();
    trace_message = "ovr_TraceMessage" (level: c_int, message: *const c_char) -> c_int => -1;
    identify_client = "ovr_IdentifyClient" (identity: *const c_char) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    detect = "ovr_Detect" (timeout_milliseconds: c_int) -> DetectResult => DetectResult::default();
    create = "ovr_Create" (session: *mut RawSession, luid: *mut GraphicsLuid) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    destroy = "ovr_Destroy" (session: RawSession) -> () => ();
    get_session_status = "ovr_GetSessionStatus" (session: RawSession, status: *mut SessionStatus) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;

    // same symbol, two return layouts; only the one matching the process width is ever called
    get_hmd_desc_32 = "ovr_GetHmdDesc" (session: RawSession) -> HmdDesc32 => std::mem::zeroed();
    get_hmd_desc_64 = "ovr_GetHmdDesc" (session: RawSession) -> HmdDesc64 => std::mem::zeroed();

    get_tracker_count = "ovr_GetTrackerCount" (session: RawSession) -> c_uint => 0;
    get_tracker_desc = "ovr_GetTrackerDesc" (session: RawSession, index: c_uint) -> TrackerDesc
        => TrackerDesc::default();
    get_tracker_pose = "ovr_GetTrackerPose" (session: RawSession, index: c_uint) -> TrackerPose
        => TrackerPose::default();
    set_tracking_origin_type = "ovr_SetTrackingOriginType" (session: RawSession, origin: TrackingOrigin) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_tracking_origin_type = "ovr_GetTrackingOriginType" (session: RawSession) -> TrackingOrigin
        => TrackingOrigin::EYE_LEVEL;
    recenter_tracking_origin = "ovr_RecenterTrackingOrigin" (session: RawSession) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    clear_should_recenter_flag = "ovr_ClearShouldRecenterFlag" (session: RawSession) -> () => ();
    get_tracking_state = "ovr_GetTrackingState" (session: RawSession, abs_time: f64, latency_marker: OvrBool) -> TrackingState
        => TrackingState::default();
    get_input_state = "ovr_GetInputState" (session: RawSession, controller_type: ControllerType, state: *mut InputState) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_connected_controller_types = "ovr_GetConnectedControllerTypes" (session: RawSession) -> ControllerType
        => ControllerType::empty();

    get_touch_haptics_desc = "ovr_GetTouchHapticsDesc" (session: RawSession, controller_type: ControllerType) -> TouchHapticsDesc
        => TouchHapticsDesc::default();
    set_controller_vibration = "ovr_SetControllerVibration" (session: RawSession, controller_type: ControllerType, frequency: f32, amplitude: f32) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    submit_controller_vibration = "ovr_SubmitControllerVibration" (session: RawSession, controller_type: ControllerType, buffer: *const HapticsBuffer) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_controller_vibration_state = "ovr_GetControllerVibrationState" (session: RawSession, controller_type: ControllerType, state: *mut HapticsPlaybackState) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;

    test_boundary = "ovr_TestBoundary" (session: RawSession, device: TrackedDeviceType, boundary: BoundaryType, result: *mut BoundaryTestResult) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    test_boundary_point = "ovr_TestBoundaryPoint" (session: RawSession, point: *const Vector3f, boundary: BoundaryType, result: *mut BoundaryTestResult) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    set_boundary_look_and_feel = "ovr_SetBoundaryLookAndFeel" (session: RawSession, look_and_feel: *const BoundaryLookAndFeel) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    reset_boundary_look_and_feel = "ovr_ResetBoundaryLookAndFeel" (session: RawSession) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_boundary_geometry = "ovr_GetBoundaryGeometry" (session: RawSession, boundary: BoundaryType, floor_points: *mut Vector3f, floor_points_count: *mut c_int) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_boundary_dimensions = "ovr_GetBoundaryDimensions" (session: RawSession, boundary: BoundaryType, dimensions: *mut Vector3f) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_boundary_visible = "ovr_GetBoundaryVisible" (session: RawSession, is_visible: *mut OvrBool) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    request_boundary_visible = "ovr_RequestBoundaryVisible" (session: RawSession, visible: OvrBool) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;

    get_fov_texture_size = "ovr_GetFovTextureSize" (session: RawSession, eye: Eye, fov: FovPort, pixels_per_display_pixel: f32) -> Sizei
        => Sizei::default();
    get_render_desc = "ovr_GetRenderDesc" (session: RawSession, eye: Eye, fov: FovPort) -> EyeRenderDesc
        => EyeRenderDesc::default();
    get_texture_swap_chain_length = "ovr_GetTextureSwapChainLength" (session: RawSession, chain: RawTextureSwapChain, length: *mut c_int) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_texture_swap_chain_current_index = "ovr_GetTextureSwapChainCurrentIndex" (session: RawSession, chain: RawTextureSwapChain, index: *mut c_int) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_texture_swap_chain_desc = "ovr_GetTextureSwapChainDesc" (session: RawSession, chain: RawTextureSwapChain, desc: *mut TextureSwapChainDesc) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    commit_texture_swap_chain = "ovr_CommitTextureSwapChain" (session: RawSession, chain: RawTextureSwapChain) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    destroy_texture_swap_chain = "ovr_DestroyTextureSwapChain" (session: RawSession, chain: RawTextureSwapChain) -> () => ();
    destroy_mirror_texture = "ovr_DestroyMirrorTexture" (session: RawSession, mirror: RawMirrorTexture) -> () => ();
    wait_to_begin_frame = "ovr_WaitToBeginFrame" (session: RawSession, frame_index: i64) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    begin_frame = "ovr_BeginFrame" (session: RawSession, frame_index: i64) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    end_frame = "ovr_EndFrame" (session: RawSession, frame_index: i64, view_scale_desc: *const ViewScaleDesc, layer_ptr_list: *const *const LayerHeader, layer_count: c_uint) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    submit_frame = "ovr_SubmitFrame" (session: RawSession, frame_index: i64, view_scale_desc: *const ViewScaleDesc, layer_ptr_list: *const *const LayerHeader, layer_count: c_uint) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_predicted_display_time = "ovr_GetPredictedDisplayTime" (session: RawSession, frame_index: i64) -> f64 => 0.0;
    get_time_in_seconds = "ovr_GetTimeInSeconds" () -> f64 => 0.0;

    get_bool = "ovr_GetBool" (session: RawSession, property_name: *const c_char, default_val: OvrBool) -> OvrBool
        => default_val;
    set_bool = "ovr_SetBool" (session: RawSession, property_name: *const c_char, value: OvrBool) -> OvrBool
        => OvrBool::FALSE;
    get_int = "ovr_GetInt" (session: RawSession, property_name: *const c_char, default_val: c_int) -> c_int
        => default_val;
    set_int = "ovr_SetInt" (session: RawSession, property_name: *const c_char, value: c_int) -> OvrBool
        => OvrBool::FALSE;
    get_float = "ovr_GetFloat" (session: RawSession, property_name: *const c_char, default_val: f32) -> f32
        => default_val;
    set_float = "ovr_SetFloat" (session: RawSession, property_name: *const c_char, value: f32) -> OvrBool
        => OvrBool::FALSE;
    get_string = "ovr_GetString" (session: RawSession, property_name: *const c_char, default_val: *const c_char) -> *const c_char
        => default_val;

    get_external_cameras = "ovr_GetExternalCameras" (session: RawSession, cameras: *mut ExternalCamera, inout_camera_count: *mut c_uint) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    set_external_camera_properties = "ovr_SetExternalCameraProperties" (session: RawSession, name: *const c_char, intrinsics: *const CameraIntrinsics, extrinsics: *const CameraExtrinsics) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;

    get_instance_extensions_vk = "ovr_GetInstanceExtensionsVk" (luid: GraphicsLuid, extension_names: *mut c_char, inout_extension_names_size: *mut u32) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_device_extensions_vk = "ovr_GetDeviceExtensionsVk" (luid: GraphicsLuid, extension_names: *mut c_char, inout_extension_names_size: *mut u32) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_session_physical_device_vk = "ovr_GetSessionPhysicalDeviceVk" (session: RawSession, luid: GraphicsLuid, instance: vk::Instance, out_physical_device: *mut vk::PhysicalDevice) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    set_synchronization_queue_vk = "ovr_SetSynchronizationQueueVk" (session: RawSession, queue: vk::Queue) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    create_texture_swap_chain_vk = "ovr_CreateTextureSwapChainVk" (session: RawSession, device: vk::Device, desc: *const TextureSwapChainDesc, out_chain: *mut RawTextureSwapChain) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_texture_swap_chain_buffer_vk = "ovr_GetTextureSwapChainBufferVk" (session: RawSession, chain: RawTextureSwapChain, index: c_int, out_image: *mut vk::Image) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    create_mirror_texture_with_options_vk = "ovr_CreateMirrorTextureWithOptionsVk" (session: RawSession, device: vk::Device, desc: *const MirrorTextureDesc, out_mirror: *mut RawMirrorTexture) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
    get_mirror_texture_buffer_vk = "ovr_GetMirrorTextureBufferVk" (session: RawSession, mirror: RawMirrorTexture, out_image: *mut vk::Image) -> OvrResult
        => OvrResult::ERROR_LIB_SYMBOLS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    unsafe extern "C" fn fake_time() -> f64 {
        42.5
    }

    #[test]
    fn missing_table_reports_lib_symbols() {
        let table = EntryPoints::missing();
        let result = unsafe { (table.initialize)(std::ptr::null()) };
        assert_eq!(result, OvrResult::ERROR_LIB_SYMBOLS);

        let mut info = ErrorInfo::default();
        unsafe { (table.get_last_error_info)(&mut info) };
        assert_eq!(info.result, OvrResult::ERROR_LIB_SYMBOLS);

        let name = b"Gender\0";
        let value = unsafe {
            (table.get_int)(std::ptr::null_mut(), name.as_ptr() as *const c_char, 7)
        };
        assert_eq!(value, 7);
    }

    #[test]
    fn load_binds_found_symbols_only() {
        let requested = RefCell::new(Vec::new());
        let table = unsafe {
            EntryPoints::load(|name| {
                let name = name.to_str().unwrap().to_owned();
                let ptr = if name == "ovr_GetTimeInSeconds" {
                    fake_time as *const c_void
                } else {
                    std::ptr::null()
                };
                requested.borrow_mut().push(name);
                ptr
            })
        };

        assert_eq!(requested.borrow().len(), EntryPoints::SYMBOLS.len());
        // the descriptor query is looked up once per width
        assert_eq!(
            requested
                .borrow()
                .iter()
                .filter(|n| n.as_str() == "ovr_GetHmdDesc")
                .count(),
            2
        );
        assert_eq!(unsafe { (table.get_time_in_seconds)() }, 42.5);
        assert_eq!(
            unsafe { (table.recenter_tracking_origin)(std::ptr::null_mut()) },
            OvrResult::ERROR_LIB_SYMBOLS
        );
    }
}
