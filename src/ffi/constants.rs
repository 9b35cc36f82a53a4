//! Native enum and flag tables.
//!
//! The runtime passes enums as plain `int`s, so each one is a transparent
//! newtype with associated constants rather than a Rust `enum`. A value the
//! runtime hands back that we have no name for stays representable. Bit masks
//! are `bitflags` types over `u32`.

use std::fmt;

use bitflags::bitflags;

macro_rules! ovr_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($raw:ty) {
            $($variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub(crate) $raw);

        impl $name {
            $(pub const $variant: Self = Self($value);)*

            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> $raw {
                self.0
            }

            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some(stringify!($variant)),)*
                    _ => None,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}::{}", stringify!($name), name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }
    };
}

ovr_enum! {
    pub struct Eye(i32) {
        LEFT = 0,
        RIGHT = 1,
    }
}

ovr_enum! {
    pub struct Hand(i32) {
        LEFT = 0,
        RIGHT = 1,
    }
}

ovr_enum! {
    /// Headset model reported in the descriptor.
    pub struct HmdType(i32) {
        NONE = 0,
        DK1 = 3,
        DKHD = 4,
        DK2 = 6,
        CB = 8,
        OTHER = 9,
        E3_2015 = 10,
        ES06 = 11,
        ES09 = 12,
        ES11 = 13,
        CV1 = 14,
        QUEST = 19,
        RIFT_S = 20,
        QUEST2 = 21,
    }
}

ovr_enum! {
    pub struct TrackingOrigin(i32) {
        EYE_LEVEL = 0,
        FLOOR_LEVEL = 1,
    }
}

ovr_enum! {
    pub struct TextureType(i32) {
        TEXTURE_2D = 0,
        TEXTURE_2D_EXTERNAL = 1,
        TEXTURE_CUBE = 2,
    }
}

ovr_enum! {
    pub struct TextureFormat(i32) {
        UNKNOWN = 0,
        B5G6R5_UNORM = 1,
        B5G5R5A1_UNORM = 2,
        B4G4R4A4_UNORM = 3,
        R8G8B8A8_UNORM = 4,
        R8G8B8A8_UNORM_SRGB = 5,
        B8G8R8A8_UNORM = 6,
        B8G8R8A8_UNORM_SRGB = 7,
        B8G8R8X8_UNORM = 8,
        B8G8R8X8_UNORM_SRGB = 9,
        R16G16B16A16_FLOAT = 10,
        D16_UNORM = 11,
        D24_UNORM_S8_UINT = 12,
        D32_FLOAT = 13,
        D32_FLOAT_S8X24_UINT = 14,
        BC1_UNORM = 15,
        BC1_UNORM_SRGB = 16,
        BC2_UNORM = 17,
        BC2_UNORM_SRGB = 18,
        BC3_UNORM = 19,
        BC3_UNORM_SRGB = 20,
        BC6H_UF16 = 21,
        BC6H_SF16 = 22,
        BC7_UNORM = 23,
        BC7_UNORM_SRGB = 24,
        R11G11B10_FLOAT = 25,
        B8G8R8_UNORM = 27,
    }
}

ovr_enum! {
    /// Which boundary a query refers to.
    pub struct BoundaryType(i32) {
        OUTER = 0x0001,
        PLAY_AREA = 0x0100,
    }
}

ovr_enum! {
    pub struct LayerType(i32) {
        DISABLED = 0,
        EYE_FOV = 1,
        EYE_FOV_DEPTH = 2,
        QUAD = 3,
        EYE_MATRIX = 5,
        EYE_FOV_MULTIRES = 7,
        CYLINDER = 8,
        CUBE = 10,
    }
}

ovr_enum! {
    pub struct HapticsBufferSubmitMode(i32) {
        ENQUEUE = 0,
    }
}

ovr_enum! {
    /// Severity passed to the native log callback and to `ovr_TraceMessage`.
    pub struct LogLevel(i32) {
        DEBUG = 0,
        INFO = 1,
        ERROR = 2,
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct ControllerType: u32 {
        const L_TOUCH = 0x0001;
        const R_TOUCH = 0x0002;
        const TOUCH = 0x0003;
        const REMOTE = 0x0004;
        const XBOX = 0x0010;
        const OBJECT0 = 0x0100;
        const OBJECT1 = 0x0200;
        const OBJECT2 = 0x0400;
        const OBJECT3 = 0x0800;
        const ACTIVE = 0xffffffff;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct TrackedDeviceType: u32 {
        const HMD = 0x0001;
        const L_TOUCH = 0x0002;
        const R_TOUCH = 0x0004;
        const TOUCH = 0x0006;
        const OBJECT0 = 0x0010;
        const OBJECT1 = 0x0020;
        const OBJECT2 = 0x0040;
        const OBJECT3 = 0x0080;
        const ALL = 0xffff;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct HmdCaps: u32 {
        const DEBUG_DEVICE = 0x0010;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct TrackingCaps: u32 {
        const ORIENTATION = 0x0010;
        const MAG_YAW_CORRECTION = 0x0020;
        const POSITION = 0x0040;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct StatusBits: u32 {
        const ORIENTATION_TRACKED = 0x0001;
        const POSITION_TRACKED = 0x0002;
        const ORIENTATION_VALID = 0x0004;
        const POSITION_VALID = 0x0008;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct TrackerFlags: u32 {
        const CONNECTED = 0x0020;
        const POSE_TRACKED = 0x0004;
    }
}

bitflags! {
    /// Bind flags of a swap chain; the `DX_` names come from the native header
    /// and are honoured by every graphics backend.
    #[repr(transparent)]
    #[derive(Default)]
    pub struct TextureBindFlags: u32 {
        const DX_RENDER_TARGET = 0x0001;
        const DX_UNORDERED_ACCESS = 0x0002;
        const DX_DEPTH_STENCIL = 0x0004;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct TextureMiscFlags: u32 {
        const DX_TYPELESS = 0x0001;
        const ALLOW_GENERATE_MIPS = 0x0002;
        const PROTECTED_CONTENT = 0x0004;
        const AUTO_GENERATE_MIPS = 0x0008;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct MirrorOptions: u32 {
        const POST_DISTORTION = 0x0001;
        const LEFT_EYE_ONLY = 0x0002;
        const RIGHT_EYE_ONLY = 0x0004;
        const INCLUDE_GUARDIAN = 0x0008;
        const INCLUDE_NOTIFICATIONS = 0x0010;
        const INCLUDE_SYSTEM_GUI = 0x0020;
        const FORCE_SYMMETRIC_FOV = 0x0040;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct LayerFlags: u32 {
        const HIGH_QUALITY = 0x01;
        const TEXTURE_ORIGIN_AT_BOTTOM_LEFT = 0x02;
        const HEAD_LOCKED = 0x04;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct InitFlags: u32 {
        const DEBUG = 0x0001;
        const REQUEST_VERSION = 0x0004;
        const INVISIBLE = 0x0010;
        const MIXED_RENDERING = 0x0020;
        const FOCUS_AWARE = 0x0040;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct Buttons: u32 {
        const A = 0x0000_0001;
        const B = 0x0000_0002;
        const R_THUMB = 0x0000_0004;
        const R_SHOULDER = 0x0000_0008;
        const X = 0x0000_0100;
        const Y = 0x0000_0200;
        const L_THUMB = 0x0000_0400;
        const L_SHOULDER = 0x0000_0800;
        const UP = 0x0001_0000;
        const DOWN = 0x0002_0000;
        const LEFT = 0x0004_0000;
        const RIGHT = 0x0008_0000;
        const ENTER = 0x0010_0000;
        const BACK = 0x0020_0000;
        const VOL_UP = 0x0040_0000;
        const VOL_DOWN = 0x0080_0000;
        const HOME = 0x0100_0000;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct Touch: u32 {
        const A = 0x0000_0001;
        const B = 0x0000_0002;
        const R_THUMB = 0x0000_0004;
        const R_THUMB_REST = 0x0000_0008;
        const R_INDEX_TRIGGER = 0x0000_0010;
        const X = 0x0000_0100;
        const Y = 0x0000_0200;
        const L_THUMB = 0x0000_0400;
        const L_THUMB_REST = 0x0000_0800;
        const L_INDEX_TRIGGER = 0x0000_1000;
        const R_INDEX_POINTING = 0x0000_0020;
        const R_THUMB_UP = 0x0000_0040;
        const L_INDEX_POINTING = 0x0000_2000;
        const L_THUMB_UP = 0x0000_4000;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default)]
    pub struct CameraStatusFlags: u32 {
        const CONNECTED = 0x1;
        const CALIBRATING = 0x2;
        const CALIBRATION_FAILED = 0x4;
        const CALIBRATED = 0x8;
        const CAPTURING = 0x10;
    }
}

/// Size of the inline name buffer of an external camera, terminator included.
pub const EXTERNAL_CAMERA_NAME_SIZE: usize = 32;

/// Minor version of the native headers these bindings mirror.
pub const MINOR_VERSION: u32 = 43;

pub const KEY_USER: &str = "User";
pub const KEY_NAME: &str = "Name";
pub const KEY_GENDER: &str = "Gender";
pub const KEY_PLAYER_HEIGHT: &str = "PlayerHeight";
pub const KEY_EYE_HEIGHT: &str = "EyeHeight";
pub const KEY_NECK_TO_EYE_DISTANCE: &str = "NeckEyeDistance";
pub const KEY_EYE_TO_NOSE_DISTANCE: &str = "EyeToNoseDist";
