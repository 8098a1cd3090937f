//! Strategies for finding the target process

use crate::config::ProcessConfig;
use crate::core::types::AttachError;
use crate::process::enumerator;
use crate::windows::bindings::user32;

/// How the target process is found on each locate attempt.
#[derive(Debug, Clone)]
pub enum ProcessLocator {
    /// By executable name, e.g. `Artemis.exe` (case-insensitive).
    ByExecutableName(String),
    /// By exact visible window title, for targets whose executable name is
    /// ambiguous.
    ByWindowTitle(String),
}

impl ProcessLocator {
    pub fn from_config(process: &ProcessConfig) -> Self {
        match &process.window_title {
            Some(title) => ProcessLocator::ByWindowTitle(title.clone()),
            None => ProcessLocator::ByExecutableName(process.name.clone()),
        }
    }

    /// Finds the target's pid, or `ProcessNotFound` if it is not running.
    pub fn locate_pid(&self) -> Result<u32, AttachError> {
        match self {
            ProcessLocator::ByExecutableName(name) => enumerator::find_process_by_name(name)?
                .ok_or_else(|| AttachError::ProcessNotFound(name.clone())),
            ProcessLocator::ByWindowTitle(title) => user32::find_window_by_title(title)
                .map(|(_, pid)| pid)
                .ok_or_else(|| AttachError::ProcessNotFound(title.clone())),
        }
    }
}
