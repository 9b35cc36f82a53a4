//! Settings for loading and initializing the runtime.

use std::env;
use std::path::PathBuf;

use crate::dispatch::PointerWidth;
use crate::ffi::{InitFlags, InitParams, MINOR_VERSION};
use crate::log_bridge::runtime_log_callback;

/// Where to find the runtime library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub library_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Overrides the library location when `library_path` is unset.
    pub const LIBRARY_ENV: &'static str = "OVR_RUNTIME_LIBRARY";

    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    pub fn resolve_library_path(&self) -> PathBuf {
        if let Some(path) = &self.library_path {
            return path.clone();
        }
        match env::var_os(Self::LIBRARY_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(default_library_name(PointerWidth::current())),
        }
    }
}

pub fn default_library_name(width: PointerWidth) -> &'static str {
    match (cfg!(windows), width) {
        (true, PointerWidth::Bits64) => "LibOVRRT64_1.dll",
        (true, PointerWidth::Bits32) => "LibOVRRT32_1.dll",
        (false, PointerWidth::Bits64) => "libOVRRT64_1.so",
        (false, PointerWidth::Bits32) => "libOVRRT32_1.so",
    }
}

/// Arguments to `ovr_Initialize`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InitConfig {
    pub flags: InitFlags,
    pub requested_minor_version: u32,
    /// Zero lets the runtime pick its own default.
    pub connection_timeout_ms: u32,
    /// Route the runtime's own log output into the `log` facade.
    pub forward_log: bool,
}

impl Default for InitConfig {
    fn default() -> Self {
        let mut flags = InitFlags::REQUEST_VERSION;
        if cfg!(feature = "validation") {
            flags |= InitFlags::DEBUG;
        }
        Self {
            flags,
            requested_minor_version: MINOR_VERSION,
            connection_timeout_ms: 0,
            forward_log: true,
        }
    }
}

impl InitConfig {
    pub fn flags(mut self, flags: InitFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn connection_timeout_ms(mut self, timeout: u32) -> Self {
        self.connection_timeout_ms = timeout;
        self
    }

    pub fn forward_log(mut self, forward: bool) -> Self {
        self.forward_log = forward;
        self
    }

    pub fn to_init_params(&self) -> InitParams {
        InitParams {
            flags: self.flags,
            requested_minor_version: self.requested_minor_version,
            log_callback: if self.forward_log {
                Some(runtime_log_callback)
            } else {
                None
            },
            user_data: 0,
            connection_timeout_ms: self.connection_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requests_header_version() {
        let config = InitConfig::default();
        assert!(config.flags.contains(InitFlags::REQUEST_VERSION));
        assert_eq!(
            config.flags.contains(InitFlags::DEBUG),
            cfg!(feature = "validation")
        );

        let params = config.to_init_params();
        assert_eq!(params.requested_minor_version, MINOR_VERSION);
        assert!(params.log_callback.is_some());
    }

    #[test]
    fn builder_adds_flags_and_drops_the_hook() {
        let params = InitConfig::default()
            .flags(InitFlags::INVISIBLE | InitFlags::FOCUS_AWARE)
            .connection_timeout_ms(250)
            .forward_log(false)
            .to_init_params();
        assert!(params.flags.contains(InitFlags::INVISIBLE));
        assert!(params.flags.contains(InitFlags::REQUEST_VERSION));
        assert_eq!(params.connection_timeout_ms, 250);
        assert!(params.log_callback.is_none());
    }

    #[test]
    fn explicit_path_wins() {
        let config = RuntimeConfig::with_library_path("/opt/ovr/libOVRRT64_1.so");
        assert_eq!(
            config.resolve_library_path(),
            PathBuf::from("/opt/ovr/libOVRRT64_1.so")
        );
    }

    #[test]
    fn library_name_follows_width() {
        assert!(default_library_name(PointerWidth::Bits64).contains("64"));
        assert!(default_library_name(PointerWidth::Bits32).contains("32"));
    }
}
