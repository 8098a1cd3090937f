//! Live target process backed by a Win32 process handle

use crate::core::types::{Address, AttachError, KnownVersion, MemoryIoError, ResolveError};
use crate::process::window::GameWindow;
use crate::target::{PointerWidth, Target, TargetWindow};
use crate::windows::bindings::{kernel32, psapi, user32};
use crate::windows::types::Handle;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// An opened target process.
///
/// Holds the process handle for its lifetime; the handle is closed when the
/// last reference drops.
pub struct ProcessHandle {
    pid: u32,
    handle: Handle,
    image_path: PathBuf,
    width: PointerWidth,
    version: Mutex<Option<KnownVersion>>,
    window: Option<Arc<GameWindow>>,
}

impl ProcessHandle {
    /// Opens `pid` for memory access and looks up its main window.
    ///
    /// A process without a visible window is still usable; synthesized
    /// input writes against it fail until one appears on a later attach.
    pub fn open(pid: u32, dwell: Duration) -> Result<Self, AttachError> {
        let handle = kernel32::open_process(pid)?;
        let image_path = PathBuf::from(kernel32::process_image_path(&handle)?);

        let width = if kernel32::is_wow64_process(&handle)? {
            PointerWidth::Four
        } else if cfg!(target_pointer_width = "64") {
            PointerWidth::Eight
        } else {
            PointerWidth::Four
        };

        let window = user32::find_process_window(pid)
            .map(|id| Arc::new(GameWindow::new(id, dwell)));
        if window.is_none() {
            debug!(pid, "process has no visible window");
        }

        Ok(ProcessHandle {
            pid,
            handle,
            image_path,
            width,
            version: Mutex::new(None),
            window,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Target for ProcessHandle {
    fn is_alive(&self) -> bool {
        kernel32::is_process_alive(&self.handle)
    }

    fn pointer_width(&self) -> PointerWidth {
        self.width
    }

    fn module_base(&self, module: Option<&str>) -> Result<Address, ResolveError> {
        psapi::module_base(&self.handle, module)
    }

    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<usize, MemoryIoError> {
        kernel32::read_process_memory(&self.handle, address, buf)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> Result<usize, MemoryIoError> {
        kernel32::write_process_memory(&self.handle, address, data)
    }

    fn version(&self) -> Option<KnownVersion> {
        self.version.lock().expect("version lock poisoned").clone()
    }

    fn set_version(&self, version: KnownVersion) {
        *self.version.lock().expect("version lock poisoned") = Some(version);
    }

    fn executable_path(&self) -> Option<PathBuf> {
        Some(self.image_path.clone())
    }

    fn window(&self) -> Option<Arc<dyn TargetWindow>> {
        self.window
            .clone()
            .map(|window| window as Arc<dyn TargetWindow>)
    }
}
