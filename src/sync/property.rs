//! Reactive cells mirroring values in the target's memory
//!
//! A [`RemoteProperty`] caches the last value read from the target and
//! notifies subscribers only when the value actually changes; the polling
//! loop recomputes every registered property each iteration, so notification
//! idempotence lives here, not in the loop.

use crate::core::types::{MemValue, MemoryAddress, SyncResult};
use crate::memory::{io, resolver};
use crate::sync::strategy::WriteStrategy;
use crate::target::{Target, TargetCell};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// A property the polling loop refreshes each iteration.
///
/// Object-safe so the loop can hold a heterogeneous registry; the value type
/// is erased behind it.
pub trait Monitored: Send + Sync {
    fn name(&self) -> &str;

    /// Re-resolves the property's address and refreshes the cached value.
    fn recompute(&self, target: &dyn Target) -> SyncResult<()>;

    /// Drops the cached value, e.g. when the target goes away.
    fn invalidate(&self);
}

/// Read-only view of one value in the target's memory.
pub struct RemoteProperty<T: MemValue> {
    name: String,
    address: MemoryAddress,
    cell: watch::Sender<Option<T>>,
}

impl<T: MemValue> RemoteProperty<T> {
    pub fn new(name: impl Into<String>, address: MemoryAddress) -> Arc<Self> {
        Arc::new(RemoteProperty {
            name: name.into(),
            address,
            cell: watch::Sender::new(None),
        })
    }

    /// Last value read from the target; `None` before the first successful
    /// read and after invalidation.
    pub fn get(&self) -> Option<T> {
        self.cell.borrow().clone()
    }

    /// Change notifications. A receiver wakes only when the value actually
    /// changed, no matter how often the loop recomputed it.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.cell.subscribe()
    }

    pub fn address(&self) -> &MemoryAddress {
        &self.address
    }

    fn publish(&self, value: T) {
        let changed = self.cell.send_if_modified(|current| {
            if current.as_ref() == Some(&value) {
                false
            } else {
                *current = Some(value.clone());
                true
            }
        });
        if changed {
            debug!(property = %self.name, value = ?self.cell.borrow(), "value changed");
        }
    }
}

impl<T: MemValue> Monitored for RemoteProperty<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn recompute(&self, target: &dyn Target) -> SyncResult<()> {
        let resolved = resolver::resolve(target, &self.address)?;
        let value: T = io::read_value(target, resolved)?;
        trace!(property = %self.name, address = %resolved, "recomputed");
        self.publish(value);
        Ok(())
    }

    fn invalidate(&self) {
        self.cell.send_if_modified(|current| current.take().is_some());
    }
}

/// A [`RemoteProperty`] consumers can also set, through a pluggable
/// [`WriteStrategy`].
///
/// Values are clamped to `[min, max]` before writing; an unordered value
/// (NaN) clamps to the minimum. Setting while no target is attached is a
/// silent no-op.
pub struct WritableRemoteProperty<T: MemValue + PartialOrd> {
    inner: Arc<RemoteProperty<T>>,
    strategy: Box<dyn WriteStrategy<T>>,
    min: T,
    max: T,
    target: TargetCell,
}

impl<T: MemValue + PartialOrd> WritableRemoteProperty<T> {
    pub fn new(
        inner: Arc<RemoteProperty<T>>,
        strategy: Box<dyn WriteStrategy<T>>,
        min: T,
        max: T,
        target: TargetCell,
    ) -> Arc<Self> {
        Arc::new(WritableRemoteProperty {
            inner,
            strategy,
            min,
            max,
            target,
        })
    }

    pub fn get(&self) -> Option<T> {
        self.inner.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.inner.subscribe()
    }

    /// Pushes `value` into the target, then refreshes the cached value so
    /// subscribers observe the outcome without waiting a polling interval.
    pub fn set(&self, value: T) -> SyncResult<()> {
        let value = self.clamp(value);
        let Some(target) = self.target.get() else {
            debug!(property = %self.inner.name, "set with no target attached, ignoring");
            return Ok(());
        };

        let previous = self.inner.get();
        self.strategy
            .write(target.as_ref(), &self.inner.address, previous, value)?;

        // Synthesized input lands asynchronously; a failed refresh here is
        // repaired by the next polling iteration.
        if let Err(error) = self.inner.recompute(target.as_ref()) {
            debug!(property = %self.inner.name, %error, "refresh after write failed");
        }
        Ok(())
    }

    fn clamp(&self, value: T) -> T {
        match value.partial_cmp(&self.min) {
            Some(Ordering::Less) | None => self.min.clone(),
            _ => match value.partial_cmp(&self.max) {
                Some(Ordering::Greater) => self.max.clone(),
                _ => value,
            },
        }
    }
}

impl<T: MemValue + PartialOrd> Monitored for WritableRemoteProperty<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn recompute(&self, target: &dyn Target) -> SyncResult<()> {
        self.inner.recompute(target)
    }

    fn invalidate(&self) {
        self.inner.invalidate()
    }
}
