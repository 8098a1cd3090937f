//! Window client-area geometry and column partitioning

use serde::{Deserialize, Serialize};

/// A point in window client-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Size of a window's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRect {
    pub width: i32,
    pub height: i32,
}

impl ClientRect {
    pub const fn new(width: i32, height: i32) -> Self {
        ClientRect { width, height }
    }
}

/// One column of the target window's entity layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRect {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl ColumnRect {
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }
}

/// Partitions the client area into `column_count` equal-width columns,
/// reserving `margin_px` across the full window width, and returns the
/// column at `index`.
///
/// Pure function of its inputs; callers must re-query the client area before
/// every partition because the window can be resized or moved at any time.
pub fn column_rect(client: ClientRect, column_count: usize, margin_px: f64, index: usize) -> ColumnRect {
    debug_assert!(column_count > 0);
    debug_assert!(index < column_count);

    let column_width = ((client.width as f64 - margin_px) / column_count as f64) as i32;
    let left = index as i32 * column_width;
    ColumnRect {
        left,
        right: left + column_width,
        top: 0,
        bottom: client.height,
    }
}
