//! memsync: live synchronization of another process's memory as reactive
//! values
//!
//! A background attachment loop finds the target process, identifies its
//! build by executable hash, and keeps a registry of typed
//! [`sync::RemoteProperty`] values refreshed by walking pointer chains
//! through the target's address space. Writable properties push changes
//! back, either straight into memory or by synthesizing clicks on the
//! target's own window for values the target recomputes every frame.
//!
//! Everything above the [`target::Target`] traits is platform-neutral and
//! tested against [`target::fake::FakeTarget`]; the Windows process and
//! window backends live in [`process`] and [`windows`].

#![allow(dead_code)]

pub mod config;
pub mod core;
pub mod input;
pub mod memory;
pub mod process;
pub mod roster;
pub mod sync;
pub mod target;

#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{
    Address, AttachError, AttachmentState, KnownVersion, MemValue, MemoryAddress, MemoryIoError,
    ResolveError, SyncError, SyncResult, VersionTable,
};

pub use sync::{
    Debouncer, Monitored, PollIntervals, RemoteProperty, SyncService, TargetProvider,
    WritableRemoteProperty,
};
