//! One logical API over the runtime's entry points.
//!
//! All forwarding lives in provided methods of [`Ovr`]; an implementation only
//! supplies its entry point table, its pointer width and the descriptor query,
//! the one call whose native signature differs between 32-bit and 64-bit
//! processes. See [`crate::dispatch`] for the two implementations.

use std::ffi::CString;
use std::os::raw::c_int;

use anyhow::Result;
use ash::vk;
use itertools::Itertools;

use crate::dispatch::PointerWidth;
use crate::entry::EntryPoints;
use crate::fetch::{
    fetch_exact, fetch_growing, signed_count, FetchError, Fetched, PinObserver,
    DEFAULT_MAX_PROBE_ATTEMPTS,
};
use crate::ffi::*;
use crate::result::{BindingError, OvrError, OvrResult};

/// An open connection to the runtime, created by [`Ovr::create`] and consumed
/// by [`Ovr::destroy`].
#[derive(Debug, PartialEq, Eq)]
pub struct SessionHandle(RawSession);

impl SessionHandle {
    /// # Safety
    ///
    /// `raw` must be a live session returned by `ovr_Create` that nothing else destroys.
    pub unsafe fn from_raw(raw: RawSession) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> RawSession {
        self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct TextureSwapChain(RawTextureSwapChain);

impl TextureSwapChain {
    pub fn as_raw(&self) -> RawTextureSwapChain {
        self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MirrorTexture(RawMirrorTexture);

impl MirrorTexture {
    pub fn as_raw(&self) -> RawMirrorTexture {
        self.0
    }
}

/// Compositor layers: `#[repr(C)]` structs that start with a [`LayerHeader`].
pub trait Layer {
    fn header_ptr(&self) -> *const LayerHeader;
}

impl Layer for LayerHeader {
    fn header_ptr(&self) -> *const LayerHeader {
        self
    }
}

impl Layer for LayerEyeFov {
    fn header_ptr(&self) -> *const LayerHeader {
        &self.header
    }
}

impl Layer for LayerQuad {
    fn header_ptr(&self) -> *const LayerHeader {
        &self.header
    }
}

fn out_param<T: Default>(call: impl FnOnce(*mut T) -> OvrResult) -> Result<T, OvrError> {
    let mut out = T::default();
    call(&mut out).check()?;
    Ok(out)
}

pub trait Ovr {
    fn entry_points(&self) -> &EntryPoints;

    fn pointer_width(&self) -> PointerWidth;

    /// Width-specific: the descriptor is returned by value with a layout that
    /// depends on the process pointer width.
    fn hmd_desc(&self, session: &SessionHandle) -> HmdDesc;

    fn pin_observer(&self) -> &dyn PinObserver {
        &()
    }

    // lifecycle

    fn initialize(&self, params: &InitParams) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().initialize)(params) }.check()
    }

    fn shutdown(&self) {
        unsafe { (self.entry_points().shutdown)() }
    }

    /// Diagnostics for the most recent failing call on this thread.
    fn last_error_info(&self) -> ErrorInfo {
        let mut info = ErrorInfo::default();
        unsafe { (self.entry_points().get_last_error_info)(&mut info) };
        info
    }

    fn version_string(&self) -> Option<String> {
        unsafe { string_from_ptr((self.entry_points().get_version_string)()) }
    }

    /// Writes into the runtime's log. Returns the length written, or -1 when tracing is off.
    fn trace_message(&self, level: LogLevel, message: &str) -> Result<i32, BindingError> {
        let message = CString::new(message)?;
        Ok(unsafe { (self.entry_points().trace_message)(level.as_raw(), message.as_ptr()) })
    }

    fn identify_client(&self, identity: &str) -> Result<OvrResult, BindingError> {
        let identity = CString::new(identity)?;
        Ok(unsafe { (self.entry_points().identify_client)(identity.as_ptr()) }.check()?)
    }

    /// The timeout is forwarded verbatim; the call blocks for at most that long.
    fn detect(&self, timeout_milliseconds: i32) -> DetectResult {
        unsafe { (self.entry_points().detect)(timeout_milliseconds) }
    }

    fn create(&self) -> Result<(SessionHandle, GraphicsLuid), OvrError> {
        let mut raw: RawSession = std::ptr::null_mut();
        let mut luid = GraphicsLuid::default();
        unsafe { (self.entry_points().create)(&mut raw, &mut luid) }.check()?;
        Ok((SessionHandle(raw), luid))
    }

    fn destroy(&self, session: SessionHandle) {
        unsafe { (self.entry_points().destroy)(session.as_raw()) }
    }

    fn session_status(&self, session: &SessionHandle) -> Result<SessionStatus, OvrError> {
        out_param(|out| unsafe { (self.entry_points().get_session_status)(session.as_raw(), out) })
    }

    fn time_in_seconds(&self) -> f64 {
        unsafe { (self.entry_points().get_time_in_seconds)() }
    }

    fn predicted_display_time(&self, session: &SessionHandle, frame_index: i64) -> f64 {
        unsafe { (self.entry_points().get_predicted_display_time)(session.as_raw(), frame_index) }
    }

    // tracking and input

    fn tracker_count(&self, session: &SessionHandle) -> u32 {
        unsafe { (self.entry_points().get_tracker_count)(session.as_raw()) }
    }

    fn tracker_desc(&self, session: &SessionHandle, index: u32) -> TrackerDesc {
        unsafe { (self.entry_points().get_tracker_desc)(session.as_raw(), index) }
    }

    fn tracker_pose(&self, session: &SessionHandle, index: u32) -> TrackerPose {
        unsafe { (self.entry_points().get_tracker_pose)(session.as_raw(), index) }
    }

    fn set_tracking_origin_type(
        &self,
        session: &SessionHandle,
        origin: TrackingOrigin,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().set_tracking_origin_type)(session.as_raw(), origin) }.check()
    }

    fn tracking_origin_type(&self, session: &SessionHandle) -> TrackingOrigin {
        unsafe { (self.entry_points().get_tracking_origin_type)(session.as_raw()) }
    }

    fn recenter_tracking_origin(&self, session: &SessionHandle) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().recenter_tracking_origin)(session.as_raw()) }.check()
    }

    fn clear_should_recenter_flag(&self, session: &SessionHandle) {
        unsafe { (self.entry_points().clear_should_recenter_flag)(session.as_raw()) }
    }

    fn tracking_state(
        &self,
        session: &SessionHandle,
        abs_time: f64,
        latency_marker: bool,
    ) -> TrackingState {
        unsafe {
            (self.entry_points().get_tracking_state)(
                session.as_raw(),
                abs_time,
                latency_marker.into(),
            )
        }
    }

    fn input_state(
        &self,
        session: &SessionHandle,
        controller_type: ControllerType,
    ) -> Result<InputState, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_input_state)(session.as_raw(), controller_type, out)
        })
    }

    fn connected_controller_types(&self, session: &SessionHandle) -> ControllerType {
        let types = unsafe { (self.entry_points().get_connected_controller_types)(session.as_raw()) };
        log::trace!("connected controllers: {:?}", types);
        types
    }

    // haptics

    fn touch_haptics_desc(
        &self,
        session: &SessionHandle,
        controller_type: ControllerType,
    ) -> TouchHapticsDesc {
        unsafe { (self.entry_points().get_touch_haptics_desc)(session.as_raw(), controller_type) }
    }

    fn set_controller_vibration(
        &self,
        session: &SessionHandle,
        controller_type: ControllerType,
        frequency: f32,
        amplitude: f32,
    ) -> Result<OvrResult, OvrError> {
        unsafe {
            (self.entry_points().set_controller_vibration)(
                session.as_raw(),
                controller_type,
                frequency,
                amplitude,
            )
        }
        .check()
    }

    /// Queues raw haptics samples, in the sample format the controller reports
    /// through [`Ovr::touch_haptics_desc`].
    fn submit_controller_vibration(
        &self,
        session: &SessionHandle,
        controller_type: ControllerType,
        samples: &[u8],
    ) -> Result<OvrResult, OvrError> {
        let samples_count = c_int::try_from(samples.len())
            .map_err(|_| OvrError(OvrResult::ERROR_INVALID_PARAMETER))?;
        let buffer = HapticsBuffer {
            samples: samples.as_ptr().cast(),
            samples_count,
            submit_mode: HapticsBufferSubmitMode::ENQUEUE,
        };
        unsafe {
            (self.entry_points().submit_controller_vibration)(
                session.as_raw(),
                controller_type,
                &buffer,
            )
        }
        .check()
    }

    fn controller_vibration_state(
        &self,
        session: &SessionHandle,
        controller_type: ControllerType,
    ) -> Result<HapticsPlaybackState, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_controller_vibration_state)(
                session.as_raw(),
                controller_type,
                out,
            )
        })
    }

    // boundary

    /// The success code tells `SUCCESS_BOUNDARY_INVALID` apart from a real test.
    fn test_boundary(
        &self,
        session: &SessionHandle,
        device: TrackedDeviceType,
        boundary: BoundaryType,
    ) -> Result<(OvrResult, BoundaryTestResult), OvrError> {
        let mut result = BoundaryTestResult::default();
        let code = unsafe {
            (self.entry_points().test_boundary)(session.as_raw(), device, boundary, &mut result)
        }
        .check()?;
        Ok((code, result))
    }

    fn test_boundary_point(
        &self,
        session: &SessionHandle,
        point: &Vector3f,
        boundary: BoundaryType,
    ) -> Result<(OvrResult, BoundaryTestResult), OvrError> {
        let mut result = BoundaryTestResult::default();
        let code = unsafe {
            (self.entry_points().test_boundary_point)(session.as_raw(), point, boundary, &mut result)
        }
        .check()?;
        Ok((code, result))
    }

    fn set_boundary_look_and_feel(
        &self,
        session: &SessionHandle,
        look_and_feel: &BoundaryLookAndFeel,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().set_boundary_look_and_feel)(session.as_raw(), look_and_feel) }
            .check()
    }

    fn reset_boundary_look_and_feel(&self, session: &SessionHandle) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().reset_boundary_look_and_feel)(session.as_raw()) }.check()
    }

    /// Floor points of the boundary, fetched with a probe for the count followed by one fill.
    fn boundary_geometry(
        &self,
        session: &SessionHandle,
        boundary: BoundaryType,
    ) -> Result<Fetched<Vector3f>, FetchError> {
        let get_boundary_geometry = self.entry_points().get_boundary_geometry;
        let raw = session.as_raw();
        let mut negative = None;
        let fetched = fetch_exact(
            self.pin_observer(),
            signed_count(
                |points, count: &mut i32| unsafe {
                    get_boundary_geometry(raw, boundary, points, count)
                },
                &mut negative,
            ),
        );
        match negative {
            Some(count) => Err(FetchError::NegativeCount(count)),
            None => fetched,
        }
    }

    fn boundary_dimensions(
        &self,
        session: &SessionHandle,
        boundary: BoundaryType,
    ) -> Result<(OvrResult, Vector3f), OvrError> {
        let mut dimensions = Vector3f::default();
        let code = unsafe {
            (self.entry_points().get_boundary_dimensions)(session.as_raw(), boundary, &mut dimensions)
        }
        .check()?;
        Ok((code, dimensions))
    }

    fn boundary_visible(&self, session: &SessionHandle) -> Result<bool, OvrError> {
        let visible: OvrBool = out_param(|out| unsafe {
            (self.entry_points().get_boundary_visible)(session.as_raw(), out)
        })?;
        Ok(visible.into())
    }

    fn request_boundary_visible(
        &self,
        session: &SessionHandle,
        visible: bool,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().request_boundary_visible)(session.as_raw(), visible.into()) }
            .check()
    }

    // compositor

    fn fov_texture_size(
        &self,
        session: &SessionHandle,
        eye: Eye,
        fov: FovPort,
        pixels_per_display_pixel: f32,
    ) -> Sizei {
        unsafe {
            (self.entry_points().get_fov_texture_size)(
                session.as_raw(),
                eye,
                fov,
                pixels_per_display_pixel,
            )
        }
    }

    fn render_desc(&self, session: &SessionHandle, eye: Eye, fov: FovPort) -> EyeRenderDesc {
        unsafe { (self.entry_points().get_render_desc)(session.as_raw(), eye, fov) }
    }

    fn create_texture_swap_chain_vk(
        &self,
        session: &SessionHandle,
        device: vk::Device,
        desc: &TextureSwapChainDesc,
    ) -> Result<TextureSwapChain, OvrError> {
        let mut raw: RawTextureSwapChain = std::ptr::null_mut();
        unsafe {
            (self.entry_points().create_texture_swap_chain_vk)(session.as_raw(), device, desc, &mut raw)
        }
        .check()?;
        Ok(TextureSwapChain(raw))
    }

    fn texture_swap_chain_length(
        &self,
        session: &SessionHandle,
        chain: &TextureSwapChain,
    ) -> Result<i32, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_texture_swap_chain_length)(session.as_raw(), chain.as_raw(), out)
        })
    }

    fn texture_swap_chain_current_index(
        &self,
        session: &SessionHandle,
        chain: &TextureSwapChain,
    ) -> Result<i32, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_texture_swap_chain_current_index)(
                session.as_raw(),
                chain.as_raw(),
                out,
            )
        })
    }

    fn texture_swap_chain_desc(
        &self,
        session: &SessionHandle,
        chain: &TextureSwapChain,
    ) -> Result<TextureSwapChainDesc, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_texture_swap_chain_desc)(session.as_raw(), chain.as_raw(), out)
        })
    }

    fn commit_texture_swap_chain(
        &self,
        session: &SessionHandle,
        chain: &TextureSwapChain,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().commit_texture_swap_chain)(session.as_raw(), chain.as_raw()) }
            .check()
    }

    fn destroy_texture_swap_chain(&self, session: &SessionHandle, chain: TextureSwapChain) {
        unsafe { (self.entry_points().destroy_texture_swap_chain)(session.as_raw(), chain.as_raw()) }
    }

    fn texture_swap_chain_buffer_vk(
        &self,
        session: &SessionHandle,
        chain: &TextureSwapChain,
        index: i32,
    ) -> Result<vk::Image, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_texture_swap_chain_buffer_vk)(
                session.as_raw(),
                chain.as_raw(),
                index,
                out,
            )
        })
    }

    fn create_mirror_texture_vk(
        &self,
        session: &SessionHandle,
        device: vk::Device,
        desc: &MirrorTextureDesc,
    ) -> Result<MirrorTexture, OvrError> {
        let mut raw: RawMirrorTexture = std::ptr::null_mut();
        unsafe {
            (self.entry_points().create_mirror_texture_with_options_vk)(
                session.as_raw(),
                device,
                desc,
                &mut raw,
            )
        }
        .check()?;
        Ok(MirrorTexture(raw))
    }

    fn mirror_texture_buffer_vk(
        &self,
        session: &SessionHandle,
        mirror: &MirrorTexture,
    ) -> Result<vk::Image, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_mirror_texture_buffer_vk)(session.as_raw(), mirror.as_raw(), out)
        })
    }

    fn destroy_mirror_texture(&self, session: &SessionHandle, mirror: MirrorTexture) {
        unsafe { (self.entry_points().destroy_mirror_texture)(session.as_raw(), mirror.as_raw()) }
    }

    fn wait_to_begin_frame(
        &self,
        session: &SessionHandle,
        frame_index: i64,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().wait_to_begin_frame)(session.as_raw(), frame_index) }.check()
    }

    fn begin_frame(&self, session: &SessionHandle, frame_index: i64) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().begin_frame)(session.as_raw(), frame_index) }.check()
    }

    /// `SUCCESS_NOT_VISIBLE` comes back on the `Ok` side: the frame was
    /// accepted but the application is not being displayed.
    fn end_frame(
        &self,
        session: &SessionHandle,
        frame_index: i64,
        view_scale_desc: Option<&ViewScaleDesc>,
        layers: &[&dyn Layer],
    ) -> Result<OvrResult, OvrError> {
        let headers = layers.iter().map(|layer| layer.header_ptr()).collect_vec();
        raw_frame_call(
            self.entry_points().end_frame,
            session,
            frame_index,
            view_scale_desc,
            &headers,
        )
    }

    fn submit_frame(
        &self,
        session: &SessionHandle,
        frame_index: i64,
        view_scale_desc: Option<&ViewScaleDesc>,
        layers: &[&dyn Layer],
    ) -> Result<OvrResult, OvrError> {
        let headers = layers.iter().map(|layer| layer.header_ptr()).collect_vec();
        raw_frame_call(
            self.entry_points().submit_frame,
            session,
            frame_index,
            view_scale_desc,
            &headers,
        )
    }

    /// Single stereo layer: composes the one-element layer list and submits it.
    fn submit_eye_fov_layer(
        &self,
        session: &SessionHandle,
        frame_index: i64,
        view_scale_desc: Option<&ViewScaleDesc>,
        layer: &LayerEyeFov,
    ) -> Result<OvrResult, OvrError> {
        let headers = [layer.header_ptr()];
        raw_frame_call(
            self.entry_points().submit_frame,
            session,
            frame_index,
            view_scale_desc,
            &headers,
        )
    }

    fn end_eye_fov_layer(
        &self,
        session: &SessionHandle,
        frame_index: i64,
        view_scale_desc: Option<&ViewScaleDesc>,
        layer: &LayerEyeFov,
    ) -> Result<OvrResult, OvrError> {
        let headers = [layer.header_ptr()];
        raw_frame_call(
            self.entry_points().end_frame,
            session,
            frame_index,
            view_scale_desc,
            &headers,
        )
    }

    // vulkan interop

    fn session_physical_device_vk(
        &self,
        session: &SessionHandle,
        luid: &GraphicsLuid,
        instance: vk::Instance,
    ) -> Result<vk::PhysicalDevice, OvrError> {
        out_param(|out| unsafe {
            (self.entry_points().get_session_physical_device_vk)(
                session.as_raw(),
                *luid,
                instance,
                out,
            )
        })
    }

    fn set_synchronization_queue_vk(
        &self,
        session: &SessionHandle,
        queue: vk::Queue,
    ) -> Result<OvrResult, OvrError> {
        unsafe { (self.entry_points().set_synchronization_queue_vk)(session.as_raw(), queue) }.check()
    }

    /// Instance extensions the runtime needs, split out of its space separated list.
    fn vulkan_instance_extensions(&self, luid: &GraphicsLuid) -> Result<Vec<CString>> {
        let get_instance_extensions_vk = self.entry_points().get_instance_extensions_vk;
        let names = fetch_exact(self.pin_observer(), |names, size| unsafe {
            get_instance_extensions_vk(*luid, names, size)
        })?;
        split_extension_names(&names.items)
    }

    fn vulkan_device_extensions(&self, luid: &GraphicsLuid) -> Result<Vec<CString>> {
        let get_device_extensions_vk = self.entry_points().get_device_extensions_vk;
        let names = fetch_exact(self.pin_observer(), |names, size| unsafe {
            get_device_extensions_vk(*luid, names, size)
        })?;
        split_extension_names(&names.items)
    }

    // properties

    fn get_bool(
        &self,
        session: &SessionHandle,
        property_name: &str,
        default_val: bool,
    ) -> Result<bool, BindingError> {
        let name = CString::new(property_name)?;
        let value = unsafe {
            (self.entry_points().get_bool)(session.as_raw(), name.as_ptr(), default_val.into())
        };
        Ok(value.into())
    }

    /// Returns whether the runtime accepted the property.
    fn set_bool(
        &self,
        session: &SessionHandle,
        property_name: &str,
        value: bool,
    ) -> Result<bool, BindingError> {
        let name = CString::new(property_name)?;
        let accepted =
            unsafe { (self.entry_points().set_bool)(session.as_raw(), name.as_ptr(), value.into()) };
        Ok(accepted.into())
    }

    fn get_int(
        &self,
        session: &SessionHandle,
        property_name: &str,
        default_val: i32,
    ) -> Result<i32, BindingError> {
        let name = CString::new(property_name)?;
        Ok(unsafe { (self.entry_points().get_int)(session.as_raw(), name.as_ptr(), default_val) })
    }

    fn set_int(
        &self,
        session: &SessionHandle,
        property_name: &str,
        value: i32,
    ) -> Result<bool, BindingError> {
        let name = CString::new(property_name)?;
        let accepted = unsafe { (self.entry_points().set_int)(session.as_raw(), name.as_ptr(), value) };
        Ok(accepted.into())
    }

    fn get_float(
        &self,
        session: &SessionHandle,
        property_name: &str,
        default_val: f32,
    ) -> Result<f32, BindingError> {
        let name = CString::new(property_name)?;
        Ok(unsafe { (self.entry_points().get_float)(session.as_raw(), name.as_ptr(), default_val) })
    }

    fn set_float(
        &self,
        session: &SessionHandle,
        property_name: &str,
        value: f32,
    ) -> Result<bool, BindingError> {
        let name = CString::new(property_name)?;
        let accepted =
            unsafe { (self.entry_points().set_float)(session.as_raw(), name.as_ptr(), value) };
        Ok(accepted.into())
    }

    fn get_string(
        &self,
        session: &SessionHandle,
        property_name: &str,
        default_val: &str,
    ) -> Result<Option<String>, BindingError> {
        let name = CString::new(property_name)?;
        let default_val = CString::new(default_val)?;
        // the returned pointer may be `default_val` itself, so copy before it drops
        let value = unsafe {
            string_from_ptr((self.entry_points().get_string)(
                session.as_raw(),
                name.as_ptr(),
                default_val.as_ptr(),
            ))
        };
        Ok(value)
    }

    // external cameras

    /// The runtime only rejects a too-small array here, so the capacity is grown
    /// until it is accepted, bounded by [`DEFAULT_MAX_PROBE_ATTEMPTS`].
    fn external_cameras(&self, session: &SessionHandle) -> Result<Fetched<ExternalCamera>, FetchError> {
        let get_external_cameras = self.entry_points().get_external_cameras;
        let raw = session.as_raw();
        fetch_growing(
            self.pin_observer(),
            DEFAULT_MAX_PROBE_ATTEMPTS,
            |cameras, count| unsafe { get_external_cameras(raw, cameras, count) },
        )
    }

    fn set_external_camera_properties(
        &self,
        session: &SessionHandle,
        name: &str,
        intrinsics: &CameraIntrinsics,
        extrinsics: &CameraExtrinsics,
    ) -> Result<OvrResult, BindingError> {
        let name = CString::new(name)?;
        let code = unsafe {
            (self.entry_points().set_external_camera_properties)(
                session.as_raw(),
                name.as_ptr(),
                intrinsics,
                extrinsics,
            )
        };
        Ok(code.check()?)
    }
}

fn raw_frame_call(
    call: crate::entry::pfn::submit_frame,
    session: &SessionHandle,
    frame_index: i64,
    view_scale_desc: Option<&ViewScaleDesc>,
    headers: &[*const LayerHeader],
) -> Result<OvrResult, OvrError> {
    let layer_count =
        u32::try_from(headers.len()).map_err(|_| OvrError(OvrResult::ERROR_INVALID_PARAMETER))?;
    let view_scale_desc = view_scale_desc.map_or(std::ptr::null(), |desc| desc as *const _);
    unsafe {
        call(
            session.as_raw(),
            frame_index,
            view_scale_desc,
            headers.as_ptr(),
            layer_count,
        )
    }
    .check()
}

fn split_extension_names(raw: &[std::os::raw::c_char]) -> Result<Vec<CString>> {
    let names = string_from_chars(raw);
    let result: Result<_, _> = names
        .split(' ')
        .filter(|name| !name.is_empty())
        .map(CString::new)
        .collect();
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_names_split_on_spaces() {
        let raw: Vec<std::os::raw::c_char> = b"VK_KHR_surface VK_KHR_external_memory_capabilities\0"
            .iter()
            .map(|&b| b as std::os::raw::c_char)
            .collect();
        let names = split_extension_names(&raw).unwrap();
        assert_eq!(
            names,
            vec![
                CString::new("VK_KHR_surface").unwrap(),
                CString::new("VK_KHR_external_memory_capabilities").unwrap(),
            ]
        );
        assert!(split_extension_names(&[0]).unwrap().is_empty());
    }

    #[test]
    fn layer_header_is_first_field() {
        let layer = LayerEyeFov {
            header: LayerHeader::new(LayerType::EYE_FOV, LayerFlags::HIGH_QUALITY),
            color_texture: [std::ptr::null_mut(); 2],
            viewport: [Recti::default(); 2],
            fov: [FovPort::default(); 2],
            render_pose: [Posef::IDENTITY; 2],
            sensor_sample_time: 0.0,
        };
        assert_eq!(
            layer.header_ptr() as *const u8,
            &layer as *const LayerEyeFov as *const u8
        );
    }
}
