//! Target process abstraction
//!
//! The attachment loop owns one live [`Target`] at a time and hands it to
//! resolvers, memory I/O and write strategies by reference for the duration
//! of an iteration. Everything downstream of the loop is written against
//! these traits, so tests run against [`fake::FakeTarget`] instead of a live
//! process.

pub mod fake;

use crate::core::types::{Address, KnownVersion, MemoryIoError, ResolveError, SyncResult};
use crate::input::geometry::{ClientRect, Point};
use std::sync::{Arc, RwLock};

/// Pointer width of the target process, which decides how many bytes each
/// pointer-chain hop dereferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Four,
    Eight,
}

impl PointerWidth {
    pub const fn byte_len(self) -> usize {
        match self {
            PointerWidth::Four => 4,
            PointerWidth::Eight => 8,
        }
    }
}

/// The target's main window, for geometry queries and synthesized input.
///
/// Input posting is fire-and-forget; there is no acknowledgment that the
/// target processed an event.
pub trait TargetWindow: Send + Sync {
    /// Current client-area size. Never cached by callers; the window can be
    /// resized or moved between any two calls.
    fn client_area(&self) -> SyncResult<ClientRect>;

    /// Posts one full click (pointer move, button down, dwell, button up)
    /// at a client-area point.
    fn click(&self, point: Point) -> SyncResult<()>;

    /// Posts a key-down or key-up for a virtual-key code.
    fn post_key(&self, virtual_key: u32, pressed: bool) -> SyncResult<()>;
}

/// A live (or simulated) target process.
pub trait Target: Send + Sync {
    /// Whether the process still exists and the handle is usable.
    fn is_alive(&self) -> bool;

    fn pointer_width(&self) -> PointerWidth;

    /// Base address of a named module, or of the main module for `None`.
    fn module_base(&self, module: Option<&str>) -> Result<Address, ResolveError>;

    /// Reads up to `buf.len()` bytes at `address`, returning the transferred
    /// count. Exactness is enforced by the memory I/O layer.
    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<usize, MemoryIoError>;

    /// Writes `data` at `address`, returning the transferred count.
    fn write_bytes(&self, address: Address, data: &[u8]) -> Result<usize, MemoryIoError>;

    /// Identified build of this target, if any. Unknown is not an error;
    /// versioned base offsets stay unresolvable until identification.
    fn version(&self) -> Option<KnownVersion>;

    /// Records the identified build (probed once per live handle).
    fn set_version(&self, version: KnownVersion);

    /// Base offset constant of the identified build.
    fn base_offset(&self) -> Option<i64> {
        self.version().map(|v| v.base_offset)
    }

    /// Filesystem path of the target's executable, when known. Build
    /// identification hashes the file behind it.
    fn executable_path(&self) -> Option<std::path::PathBuf> {
        None
    }

    /// The target's main window, when one was found at attach time.
    fn window(&self) -> Option<Arc<dyn TargetWindow>>;
}

/// Shared slot holding the currently attached target.
///
/// The attachment loop is the only writer; writable properties read it when
/// a consumer sets a value outside the loop. An empty slot makes writes a
/// silent no-op.
#[derive(Clone, Default)]
pub struct TargetCell {
    inner: Arc<RwLock<Option<Arc<dyn Target>>>>,
}

impl TargetCell {
    pub fn new() -> Self {
        TargetCell::default()
    }

    pub fn get(&self) -> Option<Arc<dyn Target>> {
        self.inner.read().expect("target cell lock poisoned").clone()
    }

    pub fn set(&self, target: Arc<dyn Target>) {
        *self.inner.write().expect("target cell lock poisoned") = Some(target);
    }

    pub fn clear(&self) {
        *self.inner.write().expect("target cell lock poisoned") = None;
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("target cell lock poisoned").is_none()
    }
}
