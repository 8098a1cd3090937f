//! Fundamental types shared across the engine

pub mod address;
pub mod error;
pub mod state;
pub mod value;
pub mod version;

pub use address::{Address, BaseOffset, IndirectAddress, MemoryAddress};
pub use error::{
    AttachError, MemoryIoError, ResolveError, SyncError, SyncResult, ERROR_ACCESS_DENIED,
    ERROR_PARTIAL_COPY,
};
pub use state::AttachmentState;
pub use value::{normalize_order, ByteOrder, MemValue, WideText, TARGET_ORDER};
pub use version::{KnownVersion, VersionTable};
