//! Windows API bindings
//!
//! Low-level FFI bindings to Windows system libraries.

pub mod kernel32;
pub mod psapi;
pub mod user32;

// Re-export all bindings
pub use kernel32::*;
pub use psapi::*;
pub use user32::*;
