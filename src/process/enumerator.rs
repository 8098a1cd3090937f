//! Process enumeration using Windows ToolHelp32 API

use crate::core::types::AttachError;
use crate::windows::types::Handle;
use crate::windows::utils::wide_to_string;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};

/// One running process.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
}

/// Iterator over the system's running processes.
pub struct ProcessEnumerator {
    snapshot: Handle,
    first_called: bool,
}

impl ProcessEnumerator {
    pub fn new() -> Result<Self, AttachError> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
            return Err(AttachError::Api(
                "Failed to create process snapshot".to_string(),
            ));
        }
        Ok(ProcessEnumerator {
            snapshot: Handle::new(snapshot),
            first_called: false,
        })
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessEntry;

    fn next(&mut self) -> Option<ProcessEntry> {
        unsafe {
            let mut entry: PROCESSENTRY32W = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

            let success = if !self.first_called {
                self.first_called = true;
                Process32FirstW(self.snapshot.raw(), &mut entry)
            } else {
                Process32NextW(self.snapshot.raw(), &mut entry)
            };

            if success == FALSE {
                return None;
            }

            Some(ProcessEntry {
                pid: entry.th32ProcessID,
                name: wide_to_string(&entry.szExeFile),
            })
        }
    }
}

/// Finds the first process whose executable name matches, ignoring case.
pub fn find_process_by_name(name: &str) -> Result<Option<u32>, AttachError> {
    Ok(ProcessEnumerator::new()?
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| entry.pid))
}
