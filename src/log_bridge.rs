use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use crate::ffi::LogLevel;

pub fn log_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::DEBUG => log::Level::Debug,
        LogLevel::INFO => log::Level::Info,
        LogLevel::ERROR => log::Level::Error,
        _ => log::Level::Warn,
    }
}

/// Installed as the runtime's log hook; forwards every message to the `log` facade.
pub unsafe extern "C" fn runtime_log_callback(
    _user_data: usize,
    level: c_int,
    message: *const c_char,
) {
    if message.is_null() {
        return;
    }
    let message = CStr::from_ptr(message).to_string_lossy();
    log::log!(log_level(LogLevel::from_raw(level)), "OVR: {}", message);
}
