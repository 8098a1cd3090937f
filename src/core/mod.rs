//! Core module containing the fundamental types of the engine
//!
//! Provides addresses and address descriptions, the wire-value trait, the
//! known-build table, the attachment state, and the error taxonomy used
//! throughout the crate.

pub mod types;

pub use types::{
    Address, AttachError, AttachmentState, KnownVersion, MemValue, MemoryAddress, MemoryIoError,
    ResolveError, SyncError, SyncResult, VersionTable,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
