//! Externally observable lifecycle state of the attachment loop

use std::fmt;

/// Health of the polling loop's relationship to the target process.
///
/// Written only by the attachment loop, observed by any number of readers.
/// `Stopped` is terminal and reached only through explicit shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentState {
    Stopped,
    ProcessNotRunning,
    AddressNotFound,
    AddressUnreadable,
    Attached,
}

impl AttachmentState {
    pub fn is_attached(&self) -> bool {
        matches!(self, AttachmentState::Attached)
    }
}

impl fmt::Display for AttachmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AttachmentState::Stopped => "stopped",
            AttachmentState::ProcessNotRunning => "process not running",
            AttachmentState::AddressNotFound => "memory address not found",
            AttachmentState::AddressUnreadable => "memory address could not be read",
            AttachmentState::Attached => "attached",
        };
        f.write_str(text)
    }
}
