//! Selection between the 32-bit and 64-bit entry point sets.
//!
//! Both implementations share every forwarding call through [`Ovr`]'s provided
//! methods and differ only in which descriptor entry point they call. The
//! width is checked once at construction: building the wrong implementation
//! for the process fails with [`BindingError::InvalidOperation`] before any
//! native call is made.

use std::fmt;

use crate::api::{Ovr, SessionHandle};
use crate::entry::EntryPoints;
use crate::fetch::PinObserver;
use crate::ffi::HmdDesc;
use crate::result::BindingError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Pointer width of the running process.
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            PointerWidth::Bits32 => 32,
            PointerWidth::Bits64 => 64,
        }
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

macro_rules! width_api {
    ($(#[$meta:meta])* $name:ident, $width:expr, $get_hmd_desc:ident) => {
        $(#[$meta])*
        pub struct $name<'a> {
            entry_points: &'a EntryPoints,
            pin_observer: &'a dyn PinObserver,
        }

        impl<'a> $name<'a> {
            pub const WIDTH: PointerWidth = $width;

            pub fn new(entry_points: &'a EntryPoints) -> Result<Self, BindingError> {
                Self::checked(entry_points, PointerWidth::current())
            }

            /// Builds the implementation as if running in a `process` wide process.
            ///
            /// # Safety
            ///
            /// When `process` is not [`PointerWidth::current`], the descriptor
            /// slot this implementation calls must not hold the real
            /// `ovr_GetHmdDesc`; its return layout would not match the slot.
            pub unsafe fn with_width(
                entry_points: &'a EntryPoints,
                process: PointerWidth,
            ) -> Result<Self, BindingError> {
                Self::checked(entry_points, process)
            }

            fn checked(
                entry_points: &'a EntryPoints,
                process: PointerWidth,
            ) -> Result<Self, BindingError> {
                if process != Self::WIDTH {
                    return Err(BindingError::InvalidOperation {
                        implementation: Self::WIDTH,
                        process,
                    });
                }
                log::trace!("dispatching runtime calls through {} entry points", Self::WIDTH);
                Ok(Self {
                    entry_points,
                    pin_observer: &(),
                })
            }

            pub fn with_pin_observer(mut self, pin_observer: &'a dyn PinObserver) -> Self {
                self.pin_observer = pin_observer;
                self
            }
        }

        impl Ovr for $name<'_> {
            fn entry_points(&self) -> &EntryPoints {
                self.entry_points
            }

            fn pointer_width(&self) -> PointerWidth {
                Self::WIDTH
            }

            fn hmd_desc(&self, session: &SessionHandle) -> HmdDesc {
                let raw = unsafe { (self.entry_points.$get_hmd_desc)(session.as_raw()) };
                HmdDesc::from(&raw)
            }

            fn pin_observer(&self) -> &dyn PinObserver {
                self.pin_observer
            }
        }
    };
}

width_api!(
    /// Entry points of a 32-bit process.
    Api32,
    PointerWidth::Bits32,
    get_hmd_desc_32
);

width_api!(
    /// Entry points of a 64-bit process.
    Api64,
    PointerWidth::Bits64,
    get_hmd_desc_64
);

/// Returns the implementation matching the running process.
pub fn create_api(entry_points: &EntryPoints) -> Result<Box<dyn Ovr + '_>, BindingError> {
    select(entry_points, PointerWidth::current())
}

/// Returns the implementation matching a `process` wide process.
///
/// # Safety
///
/// Same contract as [`Api32::with_width`] and [`Api64::with_width`].
pub unsafe fn create_api_for(
    entry_points: &EntryPoints,
    process: PointerWidth,
) -> Result<Box<dyn Ovr + '_>, BindingError> {
    select(entry_points, process)
}

fn select(
    entry_points: &EntryPoints,
    process: PointerWidth,
) -> Result<Box<dyn Ovr + '_>, BindingError> {
    Ok(match process {
        PointerWidth::Bits32 => Box::new(Api32::checked(entry_points, process)?),
        PointerWidth::Bits64 => Box::new(Api64::checked(entry_points, process)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::{HmdDesc32, HmdDesc64, HmdType, RawSession, Sizei};
    use std::cell::Cell;
    use std::ffi::c_void;

    thread_local! {
        static DESC_CALLS: Cell<u32> = Cell::new(0);
    }

    /// Lays a descriptor out the way the native side does: `name` and
    /// `serial` at their header offsets, then the resolution and refresh rate.
    fn native_desc<const N: usize>(
        ty: HmdType,
        name_at: usize,
        name: &str,
        serial: &str,
        resolution: (i32, i32),
        refresh_rate: f32,
    ) -> [u8; N] {
        let mut bytes = [0u8; N];
        let serial_at = name_at + 64 + 64 + 4;
        let resolution_at = serial_at + 24 + 4 + 16 + 64;
        bytes[..4].copy_from_slice(&ty.as_raw().to_ne_bytes());
        bytes[name_at..name_at + name.len()].copy_from_slice(name.as_bytes());
        bytes[serial_at..serial_at + serial.len()].copy_from_slice(serial.as_bytes());
        bytes[resolution_at..resolution_at + 4].copy_from_slice(&resolution.0.to_ne_bytes());
        bytes[resolution_at + 4..resolution_at + 8].copy_from_slice(&resolution.1.to_ne_bytes());
        bytes[resolution_at + 8..resolution_at + 12].copy_from_slice(&refresh_rate.to_ne_bytes());
        bytes
    }

    unsafe extern "C" fn desc_32(_session: RawSession) -> HmdDesc32 {
        DESC_CALLS.with(|calls| calls.set(calls.get() + 1));
        let bytes: [u8; 256] =
            native_desc(HmdType::CV1, 4, "Rift CV1", "WMHD301", (2160, 1200), 90.0);
        std::ptr::read_unaligned(bytes.as_ptr() as *const HmdDesc32)
    }

    unsafe extern "C" fn desc_64(_session: RawSession) -> HmdDesc64 {
        DESC_CALLS.with(|calls| calls.set(calls.get() + 1));
        let bytes: [u8; 264] =
            native_desc(HmdType::RIFT_S, 8, "Rift S", "1PASH9", (2560, 1440), 80.0);
        std::ptr::read_unaligned(bytes.as_ptr() as *const HmdDesc64)
    }

    fn table() -> EntryPoints {
        EntryPoints {
            get_hmd_desc_32: desc_32,
            get_hmd_desc_64: desc_64,
            ..EntryPoints::missing()
        }
    }

    #[test]
    fn mismatched_width_fails_before_any_call() {
        DESC_CALLS.with(|calls| calls.set(0));
        let table = table();

        let err = unsafe { Api64::with_width(&table, PointerWidth::Bits32) }
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BindingError::InvalidOperation {
                implementation: PointerWidth::Bits64,
                process: PointerWidth::Bits32,
            }
        ));
        let err = unsafe { Api32::with_width(&table, PointerWidth::Bits64) }
            .err()
            .unwrap();
        assert!(matches!(err, BindingError::InvalidOperation { .. }));
        assert_eq!(
            err.to_string(),
            "32-bit entry points cannot be used from a 64-bit process"
        );

        DESC_CALLS.with(|calls| assert_eq!(calls.get(), 0));
    }

    #[test]
    fn each_width_reads_its_own_descriptor_layout() {
        let table = table();
        let session = unsafe { SessionHandle::from_raw(std::ptr::null_mut()) };

        let api = unsafe { create_api_for(&table, PointerWidth::Bits32) }.unwrap();
        assert_eq!(api.pointer_width(), PointerWidth::Bits32);
        let desc = api.hmd_desc(&session);
        assert_eq!(desc.ty, HmdType::CV1);
        assert_eq!(desc.product_name, "Rift CV1");
        assert_eq!(desc.serial_number, "WMHD301");
        assert_eq!(desc.resolution, Sizei { w: 2160, h: 1200 });
        assert_eq!(desc.display_refresh_rate, 90.0);

        let api = unsafe { create_api_for(&table, PointerWidth::Bits64) }.unwrap();
        let desc = api.hmd_desc(&session);
        assert_eq!(desc.ty, HmdType::RIFT_S);
        assert_eq!(desc.product_name, "Rift S");
        assert_eq!(desc.serial_number, "1PASH9");
        assert_eq!(desc.resolution, Sizei { w: 2560, h: 1440 });
        assert_eq!(desc.display_refresh_rate, 80.0);
    }

    #[test]
    fn factory_follows_the_process() {
        let table = table();
        let api = create_api(&table).unwrap();
        assert_eq!(api.pointer_width(), PointerWidth::current());
        assert_eq!(
            PointerWidth::current().bits() as usize,
            std::mem::size_of::<usize>() * 8
        );
    }

    #[test]
    fn safe_constructors_only_accept_the_process_width() {
        // a loaded runtime binds its one descriptor symbol into both slots
        let table = unsafe {
            EntryPoints::load(|name| {
                if name.to_bytes() == b"ovr_GetHmdDesc" {
                    #[cfg(target_pointer_width = "64")]
                    return desc_64 as *const c_void;
                    #[cfg(target_pointer_width = "32")]
                    return desc_32 as *const c_void;
                }
                std::ptr::null()
            })
        };
        DESC_CALLS.with(|calls| calls.set(0));

        #[cfg(target_pointer_width = "64")]
        {
            assert!(Api64::new(&table).is_ok());
            assert!(Api32::new(&table).is_err());
        }
        #[cfg(target_pointer_width = "32")]
        {
            assert!(Api32::new(&table).is_ok());
            assert!(Api64::new(&table).is_err());
        }

        let api = create_api(&table).unwrap();
        let session = unsafe { SessionHandle::from_raw(std::ptr::null_mut()) };
        let desc = api.hmd_desc(&session);
        assert!(desc.display_refresh_rate > 0.0);
        DESC_CALLS.with(|calls| assert_eq!(calls.get(), 1));
    }
}
