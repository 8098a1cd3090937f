//! Windows platform layer
//!
//! Low-level FFI bindings and safe wrappers around the Win32 calls the
//! engine needs: process and module access, window lookup, and posted
//! input. Compiled only on Windows; everything above this module talks to
//! the [`crate::target::Target`] traits instead.

pub mod bindings;
pub mod types;
pub mod utils;
