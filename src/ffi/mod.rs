//! `#[repr(C)]` mirrors of the runtime's public structs.
//!
//! Every type in here crosses the foreign boundary by value or by pointer, so
//! field order, primitive widths and alignment follow the native header
//! exactly. The layout tests at the bottom pin the sizes and offsets.

pub mod constants;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};

pub use constants::*;

use crate::result::OvrResult;

pub type RawSession = *mut c_void;
pub type RawTextureSwapChain = *mut c_void;
pub type RawMirrorTexture = *mut c_void;

/// Signature of the log hook the runtime calls back into.
pub type LogCallback =
    Option<unsafe extern "C" fn(user_data: usize, level: c_int, message: *const c_char)>;

/// A boolean as the runtime sees it: one byte, zero is false.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct OvrBool(pub u8);

impl OvrBool {
    pub const FALSE: Self = Self(0);
    pub const TRUE: Self = Self(1);
}

impl From<bool> for OvrBool {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<OvrBool> for bool {
    fn from(value: OvrBool) -> Self {
        value.0 != 0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Colorf {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Vector2i {
    pub x: c_int,
    pub y: c_int,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Sizei {
    pub w: c_int,
    pub h: c_int,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Recti {
    pub pos: Vector2i,
    pub size: Sizei,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quatf {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quatf {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Quatf {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Matrix4f {
    pub m: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Posef {
    pub orientation: Quatf,
    pub position: Vector3f,
}

impl Posef {
    pub const IDENTITY: Self = Self {
        orientation: Quatf::IDENTITY,
        position: Vector3f {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
    };
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct PoseStatef {
    pub the_pose: Posef,
    pub angular_velocity: Vector3f,
    pub linear_velocity: Vector3f,
    pub angular_acceleration: Vector3f,
    pub linear_acceleration: Vector3f,
    pub pad0: [u8; 4],
    pub time_in_seconds: f64,
}

/// Tangents of the half-angles of a field of view.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct FovPort {
    pub up_tan: f32,
    pub down_tan: f32,
    pub left_tan: f32,
    pub right_tan: f32,
}

/// Headset descriptor as laid out in a 32-bit process.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct HmdDesc32 {
    pub ty: HmdType,
    pub product_name: [c_char; 64],
    pub manufacturer: [c_char; 64],
    pub vendor_id: i16,
    pub product_id: i16,
    pub serial_number: [c_char; 24],
    pub firmware_major: i16,
    pub firmware_minor: i16,
    pub available_hmd_caps: HmdCaps,
    pub default_hmd_caps: HmdCaps,
    pub available_tracking_caps: TrackingCaps,
    pub default_tracking_caps: TrackingCaps,
    pub default_eye_fov: [FovPort; 2],
    pub max_eye_fov: [FovPort; 2],
    pub resolution: Sizei,
    pub display_refresh_rate: f32,
}

/// Headset descriptor as laid out in a 64-bit process: pointer alignment
/// inserts a pad after `ty` and at the tail.
#[repr(C, align(8))]
#[derive(Copy, Clone)]
pub struct HmdDesc64 {
    pub ty: HmdType,
    pub pad0: [u8; 4],
    pub product_name: [c_char; 64],
    pub manufacturer: [c_char; 64],
    pub vendor_id: i16,
    pub product_id: i16,
    pub serial_number: [c_char; 24],
    pub firmware_major: i16,
    pub firmware_minor: i16,
    pub available_hmd_caps: HmdCaps,
    pub default_hmd_caps: HmdCaps,
    pub available_tracking_caps: TrackingCaps,
    pub default_tracking_caps: TrackingCaps,
    pub default_eye_fov: [FovPort; 2],
    pub max_eye_fov: [FovPort; 2],
    pub resolution: Sizei,
    pub display_refresh_rate: f32,
    pub pad1: [u8; 4],
}

/// Width-independent headset descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct HmdDesc {
    pub ty: HmdType,
    pub product_name: String,
    pub manufacturer: String,
    pub vendor_id: i16,
    pub product_id: i16,
    pub serial_number: String,
    pub firmware_major: i16,
    pub firmware_minor: i16,
    pub available_hmd_caps: HmdCaps,
    pub default_hmd_caps: HmdCaps,
    pub available_tracking_caps: TrackingCaps,
    pub default_tracking_caps: TrackingCaps,
    pub default_eye_fov: [FovPort; 2],
    pub max_eye_fov: [FovPort; 2],
    pub resolution: Sizei,
    pub display_refresh_rate: f32,
}

macro_rules! impl_hmd_desc_from {
    ($raw:ty) => {
        impl From<&$raw> for HmdDesc {
            fn from(raw: &$raw) -> Self {
                Self {
                    ty: raw.ty,
                    product_name: string_from_chars(&raw.product_name),
                    manufacturer: string_from_chars(&raw.manufacturer),
                    vendor_id: raw.vendor_id,
                    product_id: raw.product_id,
                    serial_number: string_from_chars(&raw.serial_number),
                    firmware_major: raw.firmware_major,
                    firmware_minor: raw.firmware_minor,
                    available_hmd_caps: raw.available_hmd_caps,
                    default_hmd_caps: raw.default_hmd_caps,
                    available_tracking_caps: raw.available_tracking_caps,
                    default_tracking_caps: raw.default_tracking_caps,
                    default_eye_fov: raw.default_eye_fov,
                    max_eye_fov: raw.max_eye_fov,
                    resolution: raw.resolution,
                    display_refresh_rate: raw.display_refresh_rate,
                }
            }
        }
    };
}

impl_hmd_desc_from!(HmdDesc32);
impl_hmd_desc_from!(HmdDesc64);

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct TrackerDesc {
    pub frustum_h_fov_in_radians: f32,
    pub frustum_v_fov_in_radians: f32,
    pub frustum_near_z_in_meters: f32,
    pub frustum_far_z_in_meters: f32,
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct TrackerPose {
    pub tracker_flags: TrackerFlags,
    pub pose: Posef,
    pub leveled_pose: Posef,
    pub pad0: [u8; 4],
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct TrackingState {
    pub head_pose: PoseStatef,
    pub status_flags: StatusBits,
    pub hand_poses: [PoseStatef; 2],
    pub hand_status_flags: [StatusBits; 2],
    pub calibrated_origin: Posef,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct InputState {
    pub time_in_seconds: f64,
    pub buttons: Buttons,
    pub touches: Touch,
    pub index_trigger: [f32; 2],
    pub hand_trigger: [f32; 2],
    pub thumbstick: [Vector2f; 2],
    pub controller_type: ControllerType,
    pub index_trigger_no_deadzone: [f32; 2],
    pub hand_trigger_no_deadzone: [f32; 2],
    pub thumbstick_no_deadzone: [Vector2f; 2],
    pub index_trigger_raw: [f32; 2],
    pub hand_trigger_raw: [f32; 2],
    pub thumbstick_raw: [Vector2f; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub is_visible: OvrBool,
    pub hmd_present: OvrBool,
    pub hmd_mounted: OvrBool,
    pub display_lost: OvrBool,
    pub should_quit: OvrBool,
    pub should_recenter: OvrBool,
    pub has_input_focus: OvrBool,
    pub overlay_present: OvrBool,
    pub depth_requested: OvrBool,
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct DetectResult {
    pub is_oculus_service_running: OvrBool,
    pub is_oculus_hmd_connected: OvrBool,
    pub pad0: [u8; 6],
}

/// Identifies the graphics adapter the headset is attached to.
#[repr(C)]
#[cfg_attr(target_pointer_width = "64", repr(align(8)))]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct GraphicsLuid {
    pub reserved: [u8; 8],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct ErrorInfo {
    pub result: OvrResult,
    pub error_string: [c_char; 512],
}

impl ErrorInfo {
    pub fn message(&self) -> String {
        string_from_chars(&self.error_string)
    }
}

impl Default for ErrorInfo {
    fn default() -> Self {
        Self {
            result: OvrResult::SUCCESS,
            error_string: [0; 512],
        }
    }
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default)]
pub struct InitParams {
    pub flags: InitFlags,
    pub requested_minor_version: u32,
    pub log_callback: LogCallback,
    pub user_data: usize,
    pub connection_timeout_ms: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct TextureSwapChainDesc {
    pub ty: TextureType,
    pub format: TextureFormat,
    pub array_size: c_int,
    pub width: c_int,
    pub height: c_int,
    pub mip_levels: c_int,
    pub sample_count: c_int,
    pub static_image: OvrBool,
    pub misc_flags: TextureMiscFlags,
    pub bind_flags: TextureBindFlags,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct MirrorTextureDesc {
    pub format: TextureFormat,
    pub width: c_int,
    pub height: c_int,
    pub misc_flags: TextureMiscFlags,
    pub mirror_options: MirrorOptions,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct EyeRenderDesc {
    pub eye: Eye,
    pub fov: FovPort,
    pub distorted_viewport: Recti,
    pub pixels_per_tan_angle_at_center: Vector2f,
    pub hmd_to_eye_pose: Posef,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct ViewScaleDesc {
    pub hmd_to_eye_pose: [Posef; 2],
    pub hmd_space_to_world_scale_in_meters: f32,
}

#[repr(C)]
#[cfg_attr(target_pointer_width = "64", repr(align(8)))]
#[derive(Copy, Clone)]
pub struct LayerHeader {
    pub ty: LayerType,
    pub flags: LayerFlags,
    pub reserved: [u8; 128],
}

impl LayerHeader {
    pub fn new(ty: LayerType, flags: LayerFlags) -> Self {
        Self {
            ty,
            flags,
            reserved: [0; 128],
        }
    }
}

/// Stereo layer: one swap chain, viewport, fov and render pose per eye.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct LayerEyeFov {
    pub header: LayerHeader,
    pub color_texture: [RawTextureSwapChain; 2],
    pub viewport: [Recti; 2],
    pub fov: [FovPort; 2],
    pub render_pose: [Posef; 2],
    pub sensor_sample_time: f64,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct LayerQuad {
    pub header: LayerHeader,
    pub color_texture: RawTextureSwapChain,
    pub viewport: Recti,
    pub quad_pose_center: Posef,
    pub quad_size: Vector2f,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct BoundaryLookAndFeel {
    pub color: Colorf,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct BoundaryTestResult {
    pub is_triggering: OvrBool,
    pub closest_distance: f32,
    pub closest_point: Vector3f,
    pub closest_point_normal: Vector3f,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct HapticsBuffer {
    pub samples: *const c_void,
    pub samples_count: c_int,
    pub submit_mode: HapticsBufferSubmitMode,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct HapticsPlaybackState {
    pub remaining_queue_space: c_int,
    pub samples_queued: c_int,
}

#[repr(C)]
#[cfg_attr(target_pointer_width = "64", repr(align(8)))]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct TouchHapticsDesc {
    pub sample_rate_hz: c_int,
    pub sample_size_in_bytes: c_int,
    pub queue_min_size_to_avoid_starvation: c_int,
    pub submit_min_samples: c_int,
    pub submit_max_samples: c_int,
    pub submit_optimal_samples: c_int,
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct CameraIntrinsics {
    pub last_changed_time: f64,
    pub fov_port: FovPort,
    pub virtual_near_plane_distance_meters: f32,
    pub virtual_far_plane_distance_meters: f32,
    pub image_sensor_pixel_resolution: Sizei,
    pub lens_distortion_matrix: Matrix4f,
    pub exposure_period_seconds: f64,
    pub exposure_duration_seconds: f64,
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct CameraExtrinsics {
    pub last_changed_time_seconds: f64,
    pub camera_status_flags: CameraStatusFlags,
    pub attached_to_device: TrackedDeviceType,
    pub relative_pose: Posef,
    pub last_exposure_time_seconds: f64,
    pub exposure_latency_seconds: f64,
    pub additional_latency_seconds: f64,
}

#[repr(C, align(8))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExternalCamera {
    pub name: [c_char; EXTERNAL_CAMERA_NAME_SIZE],
    pub intrinsics: CameraIntrinsics,
    pub extrinsics: CameraExtrinsics,
}

impl ExternalCamera {
    pub fn name(&self) -> String {
        string_from_chars(&self.name)
    }
}

impl Default for ExternalCamera {
    fn default() -> Self {
        Self {
            name: [0; EXTERNAL_CAMERA_NAME_SIZE],
            intrinsics: CameraIntrinsics::default(),
            extrinsics: CameraExtrinsics::default(),
        }
    }
}

/// Reads a fixed-size, null-terminated single-byte string. A buffer without a
/// terminator is read in full.
pub fn string_from_chars(chars: &[c_char]) -> String {
    let bytes: Vec<u8> = chars
        .iter()
        .map(|&c| c as u8)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copies a string returned by the runtime. The runtime keeps ownership of the pointer.
///
/// # Safety
///
/// `ptr` must be null or point to a null-terminated string that stays valid for
/// the duration of the call.
pub unsafe fn string_from_ptr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

#[allow(dead_code)]
const _: () = {
    // `unsigned int` and `int` must both be 4 bytes for the layouts above
    assert!(std::mem::size_of::<c_uint>() == 4);
    assert!(std::mem::size_of::<c_int>() == 4);
};
