//! Target window backed by a real Win32 window

use crate::core::types::SyncResult;
use crate::input::geometry::{ClientRect, Point};
use crate::target::TargetWindow;
use crate::windows::bindings::user32;
use std::time::Duration;

/// The located target's main window.
pub struct GameWindow {
    window: user32::WindowId,
    dwell: Duration,
}

impl GameWindow {
    pub fn new(window: user32::WindowId, dwell: Duration) -> Self {
        GameWindow { window, dwell }
    }

    pub fn title(&self) -> String {
        user32::window_title(self.window)
    }
}

impl TargetWindow for GameWindow {
    fn client_area(&self) -> SyncResult<ClientRect> {
        user32::client_rect(self.window)
    }

    fn click(&self, point: Point) -> SyncResult<()> {
        user32::post_click(self.window, point, self.dwell)
    }

    fn post_key(&self, virtual_key: u32, pressed: bool) -> SyncResult<()> {
        user32::post_key(self.window, virtual_key, pressed)
    }
}
