//! Windows error code handling utilities

use winapi::um::errhandlingapi::GetLastError;

/// Gets the calling thread's last Windows error code
pub fn last_error_code() -> u32 {
    unsafe { GetLastError() }
}

/// Short description for the error codes the engine cares about
pub fn describe(code: u32) -> &'static str {
    match code {
        0 => "success",
        5 => "access denied",
        6 => "invalid handle",
        87 => "invalid parameter",
        299 => "partial copy",
        487 => "invalid address",
        _ => "unknown error",
    }
}
