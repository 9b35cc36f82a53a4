//! The runtime's ordered result codes.
//!
//! Every value at or above [`OvrResult::SUCCESS`] is a success, including the
//! qualified successes such as [`OvrResult::SUCCESS_NOT_VISIBLE`]. Everything
//! below it is a failure. Compare against the threshold, never only against zero.

use std::ffi::NulError;
use std::fmt;

use thiserror::Error;

use crate::dispatch::PointerWidth;

#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OvrResult(pub(crate) i32);

macro_rules! result_codes {
    ($($name:ident = $value:literal,)*) => {
        impl OvrResult {
            $(pub const $name: Self = Self($value);)*

            /// Native constant name without the `ovr` prefix, if the code is known.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

result_codes! {
    SUCCESS = 0,
    SUCCESS_NOT_VISIBLE = 1000,
    SUCCESS_BOUNDARY_INVALID = 1001,
    SUCCESS_DEVICE_UNAVAILABLE = 1002,

    ERROR_MEMORY_ALLOCATION_FAILURE = -1000,
    ERROR_INVALID_SESSION = -1002,
    ERROR_TIMEOUT = -1003,
    ERROR_NOT_INITIALIZED = -1004,
    ERROR_INVALID_PARAMETER = -1005,
    ERROR_SERVICE_ERROR = -1006,
    ERROR_NO_HMD = -1007,
    ERROR_UNSUPPORTED = -1009,
    ERROR_DEVICE_UNAVAILABLE = -1010,
    ERROR_INVALID_HEADSET_ORIENTATION = -1011,
    ERROR_CLIENT_SKIPPED_DESTROY = -1012,
    ERROR_CLIENT_SKIPPED_SHUTDOWN = -1013,
    ERROR_SERVICE_DEADLOCK_DETECTED = -1014,
    ERROR_INVALID_OPERATION = -1015,
    ERROR_INSUFFICIENT_ARRAY_SIZE = -1016,
    ERROR_NO_EXTERNAL_CAMERA_INFO = -1017,
    ERROR_LOST_TRACKING = -1018,
    ERROR_EXTERNAL_CAMERA_INITIALIZED_FAILED = -1019,
    ERROR_EXTERNAL_CAMERA_CAPTURE_FAILED = -1020,
    ERROR_EXTERNAL_CAMERA_NAME_LISTS_BUFFER_SIZE = -1021,
    ERROR_EXTERNAL_CAMERA_NAME_LISTS_MISMATCH = -1022,
    ERROR_EXTERNAL_CAMERA_NOT_CALIBRATED = -1023,
    ERROR_EXTERNAL_CAMERA_NAME_WRONG_SIZE = -1024,

    ERROR_AUDIO_DEVICE_NOT_FOUND = -2001,
    ERROR_AUDIO_COM_ERROR = -2002,

    ERROR_INITIALIZE = -3000,
    ERROR_LIB_LOAD = -3001,
    ERROR_LIB_VERSION = -3002,
    ERROR_SERVICE_CONNECTION = -3003,
    ERROR_SERVICE_VERSION = -3004,
    ERROR_INCOMPATIBLE_OS = -3005,
    ERROR_DISPLAY_INIT = -3006,
    ERROR_SERVER_START = -3007,
    ERROR_REINITIALIZATION = -3008,
    ERROR_MISMATCHED_ADAPTERS = -3009,
    ERROR_LEAKING_RESOURCES = -3010,
    ERROR_CLIENT_VERSION = -3011,
    ERROR_OUT_OF_DATE_OS = -3012,
    ERROR_OUT_OF_DATE_GFX_DRIVER = -3013,
    ERROR_INCOMPATIBLE_GPU = -3014,
    ERROR_NO_VALID_VR_DISPLAY_SYSTEM = -3015,
    ERROR_OBSOLETE = -3016,
    ERROR_DISABLED_OR_DEFAULT_ADAPTER = -3017,
    ERROR_HYBRID_GRAPHICS_NOT_SUPPORTED = -3018,
    ERROR_DISPLAY_MANAGER_INIT = -3019,
    ERROR_TRACKER_DRIVER_INIT = -3020,
    ERROR_LIB_SIGN_CHECK = -3021,
    ERROR_LIB_PATH = -3022,
    ERROR_LIB_SYMBOLS = -3023,
    ERROR_REMOTE_SESSION = -3024,
    ERROR_INITIALIZE_VULKAN = -3025,
    ERROR_BLACKLISTED_GFX_DRIVER = -3026,

    ERROR_DISPLAY_LOST = -6000,
    ERROR_TEXTURE_SWAP_CHAIN_FULL = -6001,
    ERROR_TEXTURE_SWAP_CHAIN_INVALID = -6002,
    ERROR_GRAPHICS_DEVICE_RESET = -6003,
    ERROR_DISPLAY_REMOVED = -6004,
    ERROR_CONTENT_PROTECTION_NOT_AVAILABLE = -6005,
    ERROR_APPLICATION_INVISIBLE = -6006,
    ERROR_DISALLOWED = -6007,
    ERROR_DISPLAY_PLUGGED_INCORRECTLY = -6008,
    ERROR_DISPLAY_LIMIT_REACHED = -6009,

    ERROR_RUNTIME_EXCEPTION = -7000,

    ERROR_NO_CALIBRATION = -9000,
    ERROR_OLD_VERSION = -9001,
    ERROR_MISFORMATTED_BLOCK = -9002,
}

impl OvrResult {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 >= Self::SUCCESS.0
    }

    pub const fn is_unqualified_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    pub const fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// Keeps success codes (qualified or not) on the `Ok` side, failures on the `Err` side.
    pub fn check(self) -> Result<OvrResult, OvrError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(OvrError(self))
        }
    }
}

impl Default for OvrResult {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl fmt::Debug for OvrResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "OvrResult({})", self.0),
        }
    }
}

impl fmt::Display for OvrResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A failure-class code returned by a native call, carried verbatim.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[error("native runtime call failed with {0}")]
pub struct OvrError(pub OvrResult);

impl OvrError {
    pub fn code(&self) -> OvrResult {
        self.0
    }
}

/// Failures raised by the binding layer itself rather than by the runtime.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("{implementation} entry points cannot be used from a {process} process")]
    InvalidOperation {
        implementation: PointerWidth,
        process: PointerWidth,
    },
    #[error("cannot load runtime library: {0}")]
    Load(#[source] libloading::Error),
    #[error("string argument contains an interior nul byte")]
    InteriorNul(#[from] NulError),
    #[error(transparent)]
    Ovr(#[from] OvrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_orders_codes() {
        assert!(OvrResult::SUCCESS.is_success());
        assert!(OvrResult::SUCCESS_NOT_VISIBLE.is_success());
        assert!(OvrResult::SUCCESS_BOUNDARY_INVALID.is_success());
        assert!(!OvrResult::SUCCESS_NOT_VISIBLE.is_unqualified_success());
        assert!(OvrResult::ERROR_DISPLAY_LOST.is_failure());
        assert!(OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE < OvrResult::SUCCESS);
        assert!(OvrResult::from_raw(-1).is_failure());
        assert!(OvrResult::from_raw(7).is_success());
    }

    #[test]
    fn check_keeps_success_variant() {
        assert_eq!(
            OvrResult::SUCCESS_NOT_VISIBLE.check(),
            Ok(OvrResult::SUCCESS_NOT_VISIBLE)
        );
        assert_eq!(
            OvrResult::ERROR_TEXTURE_SWAP_CHAIN_FULL.check(),
            Err(OvrError(OvrResult::ERROR_TEXTURE_SWAP_CHAIN_FULL))
        );
    }

    #[test]
    fn names_and_formatting() {
        assert_eq!(
            OvrResult::ERROR_NO_EXTERNAL_CAMERA_INFO.name(),
            Some("ERROR_NO_EXTERNAL_CAMERA_INFO")
        );
        assert_eq!(OvrResult::from_raw(-42).name(), None);
        assert_eq!(format!("{}", OvrResult::ERROR_NO_HMD), "ERROR_NO_HMD(-1007)");
        assert_eq!(format!("{:?}", OvrResult::from_raw(-42)), "OvrResult(-42)");
        assert_eq!(
            OvrError(OvrResult::ERROR_TIMEOUT).to_string(),
            "native runtime call failed with ERROR_TIMEOUT(-1003)"
        );
    }
}
