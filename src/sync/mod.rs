//! Live synchronization: reactive properties, write strategies and the
//! attachment loop that keeps them fresh

pub mod debounce;
pub mod property;
pub mod service;
pub mod strategy;

pub use debounce::Debouncer;
pub use property::{Monitored, RemoteProperty, WritableRemoteProperty};
pub use service::{PollIntervals, SyncService, TargetProvider};
pub use strategy::{DirectMemoryWrite, SynthesizedInputWrite, WriteStrategy};
