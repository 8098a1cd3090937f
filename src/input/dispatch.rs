//! Serialized delivery of synthesized clicks to the target window
//!
//! Concurrent writers to different window controls would interleave their
//! move/down/up message sequences and land clicks on the wrong control, so
//! every click sequence runs under one process-wide lock.

use crate::core::types::SyncResult;
use crate::input::geometry::Point;
use crate::target::TargetWindow;
use lazy_static::lazy_static;
use std::sync::Mutex;
use tracing::debug;

lazy_static! {
    /// Held across a whole click sequence, not per click.
    static ref INPUT_LOCK: Mutex<()> = Mutex::new(());
}

/// Delivers `points` to `window` as one atomic click sequence.
pub fn dispatch(window: &dyn TargetWindow, points: &[Point]) -> SyncResult<()> {
    if points.is_empty() {
        return Ok(());
    }

    let _guard = INPUT_LOCK.lock().expect("input lock poisoned");
    for point in points {
        debug!(x = point.x, y = point.y, "posting click");
        window.click(*point)?;
    }
    Ok(())
}
