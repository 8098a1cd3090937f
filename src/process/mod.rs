//! Target process handling: build identification everywhere, plus locating
//! and opening real processes on Windows

pub mod version;

#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod handle;
#[cfg(windows)]
pub mod locator;
#[cfg(windows)]
pub mod provider;
#[cfg(windows)]
pub mod window;

pub use version::{hash_executable, identify_build};

#[cfg(windows)]
pub use handle::ProcessHandle;
#[cfg(windows)]
pub use locator::ProcessLocator;
#[cfg(windows)]
pub use provider::WindowsTargetProvider;
