//! Error taxonomy for attachment, resolution and memory I/O failures

use super::address::Address;
use thiserror::Error;

/// Failure to locate or open the target process.
#[derive(Error, Debug)]
pub enum AttachError {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process {pid}: OS error {code}")]
    OpenFailed { pid: u32, code: u32 },

    #[error("Process {0} has no visible window")]
    WindowNotFound(u32),

    #[error("OS API failure: {0}")]
    Api(String),
}

/// Failure to turn a `MemoryAddress` into a concrete address inside the
/// target's address space.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Base address unknown: target build has not been identified")]
    BaseAddressUnknown,

    #[error("Pointer chain broken at hop {hop} (address {address}): {source}")]
    UnreadableMemory {
        hop: usize,
        address: Address,
        #[source]
        source: MemoryIoError,
    },
}

/// Low-level read/write failure against the target's memory.
///
/// OS error codes are preserved so the polling loop can log access-denied
/// and partial-copy conditions distinctly.
#[derive(Error, Debug)]
pub enum MemoryIoError {
    #[error("Short read at {address}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: Address,
        expected: usize,
        actual: usize,
    },

    #[error("Short write at {address}: expected {expected} bytes, wrote {actual}")]
    ShortWrite {
        address: Address,
        expected: usize,
        actual: usize,
    },

    #[error("Access denied at {address} (OS error {code})")]
    AccessDenied { address: Address, code: u32 },

    #[error("OS error {code} at {address}")]
    Os { address: Address, code: u32 },
}

/// OS error code for access-denied failures.
pub const ERROR_ACCESS_DENIED: u32 = 5;

/// OS error code reported when only part of a read or write completed,
/// typically because the target unmapped a page mid-operation.
pub const ERROR_PARTIAL_COPY: u32 = 299;

impl MemoryIoError {
    /// Classifies a raw OS error code reported for `address`.
    pub fn from_os_code(address: Address, code: u32) -> Self {
        if code == ERROR_ACCESS_DENIED {
            MemoryIoError::AccessDenied { address, code }
        } else {
            MemoryIoError::Os { address, code }
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, MemoryIoError::AccessDenied { .. })
    }

    pub fn is_partial_copy(&self) -> bool {
        matches!(
            self,
            MemoryIoError::Os {
                code: ERROR_PARTIAL_COPY,
                ..
            }
        )
    }

    /// The address the failed operation was aimed at.
    pub fn address(&self) -> Address {
        match self {
            MemoryIoError::ShortRead { address, .. }
            | MemoryIoError::ShortWrite { address, .. }
            | MemoryIoError::AccessDenied { address, .. }
            | MemoryIoError::Os { address, .. } => *address,
        }
    }
}

impl ResolveError {
    /// Creates an unreadable-memory error for a dereference at `address`,
    /// `hop` hops into the chain.
    pub fn unreadable(hop: usize, address: Address, source: MemoryIoError) -> Self {
        ResolveError::UnreadableMemory {
            hop,
            address,
            source,
        }
    }
}

/// Umbrella error for the synchronization engine.
///
/// `Resolve` and `Io` during polling are recoverable by retry and only
/// surface as an `AttachmentState` transition. `AlreadyAttached` is a
/// programming error and never an expected runtime condition.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Attach(#[from] AttachError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Io(#[from] MemoryIoError),

    #[error("Attachment loop is already running on this instance")]
    AlreadyAttached,

    #[error("Target window is not available for synthesized input")]
    WindowUnavailable,
}

impl SyncError {
    /// True when the underlying failure is the OS partial-copy condition,
    /// wherever it surfaced in the chain.
    pub fn is_partial_copy(&self) -> bool {
        match self {
            SyncError::Io(error) => error.is_partial_copy(),
            SyncError::Resolve(ResolveError::UnreadableMemory { source, .. }) => {
                source.is_partial_copy()
            }
            _ => false,
        }
    }
}

/// Result type alias for engine operations
pub type SyncResult<T> = Result<T, SyncError>;
