//! Safe wrappers around raw Windows handle types

pub mod handle;

pub use handle::Handle;
