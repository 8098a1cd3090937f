//! Write strategies: how a new value reaches the target
//!
//! Some values can simply be written into the target's memory; others are
//! recomputed by the target every frame, so the only durable way to change
//! them is to drive the target's own UI with synthesized clicks.

use crate::core::types::{MemValue, MemoryAddress, SyncError, SyncResult};
use crate::input::{column_rect, dispatch, ClickPlanner};
use crate::memory::{io, resolver};
use crate::target::Target;

/// Pushes a desired value into the target.
pub trait WriteStrategy<T: MemValue>: Send + Sync {
    /// `previous` is the last value observed for the property, when known;
    /// planners use it to skip redundant input.
    fn write(
        &self,
        target: &dyn Target,
        address: &MemoryAddress,
        previous: Option<T>,
        value: T,
    ) -> SyncResult<()>;
}

/// Resolves the address and writes the encoded value straight into memory.
pub struct DirectMemoryWrite;

impl<T: MemValue> WriteStrategy<T> for DirectMemoryWrite {
    fn write(
        &self,
        target: &dyn Target,
        address: &MemoryAddress,
        _previous: Option<T>,
        value: T,
    ) -> SyncResult<()> {
        let resolved = resolver::resolve(target, address)?;
        io::write_value(target, resolved, &value)?;
        Ok(())
    }
}

/// Drives the target's UI instead of its memory.
///
/// The window's client area is re-queried on every write; caching geometry
/// would break the first time the user resizes the window.
pub struct SynthesizedInputWrite<P> {
    planner: P,
    column: usize,
    column_count: usize,
    margin_px: f64,
}

impl<P> SynthesizedInputWrite<P> {
    pub fn new(planner: P, column: usize, column_count: usize, margin_px: f64) -> Self {
        SynthesizedInputWrite {
            planner,
            column,
            column_count,
            margin_px,
        }
    }
}

impl<T, P> WriteStrategy<T> for SynthesizedInputWrite<P>
where
    T: MemValue,
    P: ClickPlanner<T>,
{
    fn write(
        &self,
        target: &dyn Target,
        _address: &MemoryAddress,
        previous: Option<T>,
        value: T,
    ) -> SyncResult<()> {
        let window = target.window().ok_or(SyncError::WindowUnavailable)?;
        let client = window.client_area()?;
        let column = column_rect(client, self.column_count, self.margin_px, self.column);
        let points = self.planner.plan(client, column, previous, value);
        dispatch(window.as_ref(), &points)
    }
}
