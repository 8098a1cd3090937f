//! User32.dll bindings for window lookup and posted input
//!
//! Input is posted, not sent: clicks go through the window's message queue
//! and land whether or not the window has focus.

use crate::core::types::{AttachError, SyncError};
use crate::input::geometry::{ClientRect, Point};
use crate::windows::utils::{last_error_code, wide_to_string};
use winapi::shared::minwindef::{BOOL, FALSE, LPARAM, TRUE, WPARAM};
use winapi::shared::windef::{HWND, RECT};
use winapi::um::winuser::{
    EnumWindows, GetClientRect, GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible,
    PostMessageW, MK_LBUTTON, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
};

/// Raw window handle, kept as an integer so it stays `Send`.
pub type WindowId = usize;

struct EnumState {
    pid: u32,
    title: Option<Vec<u16>>,
    found: Option<WindowId>,
}

unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let state = &mut *(lparam as *mut EnumState);

    if IsWindowVisible(hwnd) == FALSE {
        return TRUE;
    }

    if state.pid != 0 {
        let mut window_pid = 0u32;
        GetWindowThreadProcessId(hwnd, &mut window_pid);
        if window_pid != state.pid {
            return TRUE;
        }
    }

    if let Some(wanted) = &state.title {
        let mut buffer = [0u16; 512];
        let length = GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32);
        let wanted_text = wide_to_string(wanted);
        if wide_to_string(&buffer[..length as usize]) != wanted_text {
            return TRUE;
        }
    }

    state.found = Some(hwnd as WindowId);
    FALSE
}

fn enum_windows(pid: u32, title: Option<&str>) -> Option<WindowId> {
    let mut state = EnumState {
        pid,
        title: title.map(crate::windows::utils::string_to_wide),
        found: None,
    };
    unsafe {
        // Returns FALSE when the callback stops enumeration early; that is
        // the found case, not a failure.
        EnumWindows(Some(enum_callback), &mut state as *mut EnumState as LPARAM);
    }
    state.found
}

/// Finds the first visible top-level window owned by `pid`.
pub fn find_process_window(pid: u32) -> Option<WindowId> {
    enum_windows(pid, None)
}

/// Finds a visible top-level window by exact title, returning the window
/// and its owning process.
pub fn find_window_by_title(title: &str) -> Option<(WindowId, u32)> {
    let window = enum_windows(0, Some(title))?;
    let mut pid = 0u32;
    unsafe {
        GetWindowThreadProcessId(window as HWND, &mut pid);
    }
    (pid != 0).then_some((window, pid))
}

/// Title text of a window.
pub fn window_title(window: WindowId) -> String {
    let mut buffer = [0u16; 512];
    let length = unsafe { GetWindowTextW(window as HWND, buffer.as_mut_ptr(), buffer.len() as i32) };
    wide_to_string(&buffer[..length.max(0) as usize])
}

/// Current client-area size of a window.
pub fn client_rect(window: WindowId) -> Result<ClientRect, SyncError> {
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };
    let result = unsafe { GetClientRect(window as HWND, &mut rect) };
    if result == FALSE {
        Err(SyncError::Attach(AttachError::Api(format!(
            "GetClientRect failed: OS error {}",
            last_error_code()
        ))))
    } else {
        Ok(ClientRect::new(rect.right - rect.left, rect.bottom - rect.top))
    }
}

/// Packs client-area coordinates the way mouse messages expect them:
/// the y coordinate in the high word, x in the low word.
pub fn pack_coordinates(point: Point) -> LPARAM {
    let x = point.x as i16 as u16 as u32;
    let y = point.y as i16 as u16 as u32;
    ((y << 16) | x) as LPARAM
}

fn post(window: WindowId, message: u32, wparam: WPARAM, lparam: LPARAM) -> Result<(), SyncError> {
    let result = unsafe { PostMessageW(window as HWND, message, wparam, lparam) };
    if result == FALSE {
        Err(SyncError::Attach(AttachError::Api(format!(
            "PostMessage failed: OS error {}",
            last_error_code()
        ))))
    } else {
        Ok(())
    }
}

/// Posts a full left-button click at a client-area point, holding the
/// button down for `dwell`.
///
/// The dwell is required for some controls to register the press.
pub fn post_click(
    window: WindowId,
    point: Point,
    dwell: std::time::Duration,
) -> Result<(), SyncError> {
    let coordinates = pack_coordinates(point);
    post(window, WM_MOUSEMOVE, 0, coordinates)?;
    post(window, WM_LBUTTONDOWN, MK_LBUTTON as WPARAM, coordinates)?;
    std::thread::sleep(dwell);
    post(window, WM_LBUTTONUP, 0, coordinates)
}

/// Posts a key-down or key-up for a virtual-key code.
pub fn post_key(window: WindowId, virtual_key: u32, pressed: bool) -> Result<(), SyncError> {
    let message = if pressed { WM_KEYDOWN } else { WM_KEYUP };
    post(window, message, virtual_key as WPARAM, 0)
}
