//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{Address, AttachError, MemoryIoError};
use crate::windows::types::Handle;
use crate::windows::utils::{last_error_code, wide_to_string};
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID, MAX_PATH, TRUE};
use winapi::um::memoryapi::{ReadProcessMemory, WriteProcessMemory};
use winapi::um::minwinbase::STILL_ACTIVE;
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::winbase::QueryFullProcessImageNameW;
use winapi::um::winnt::{
    PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ, PROCESS_VM_WRITE,
};
use winapi::um::wow64apiset::IsWow64Process;

/// Opens a process with the access rights the engine needs: memory
/// read/write and status queries.
pub fn open_process(pid: u32) -> Result<Handle, AttachError> {
    let access =
        PROCESS_VM_READ | PROCESS_VM_WRITE | PROCESS_VM_OPERATION | PROCESS_QUERY_INFORMATION;
    let handle = unsafe { OpenProcess(access, FALSE, pid) };
    if handle.is_null() {
        Err(AttachError::OpenFailed {
            pid,
            code: last_error_code(),
        })
    } else {
        Ok(Handle::new(handle))
    }
}

/// Safe wrapper for ReadProcessMemory.
///
/// A failed call reports the thread's last error code, preserving the
/// access-denied and partial-copy classifications.
pub fn read_process_memory(
    handle: &Handle,
    address: Address,
    buffer: &mut [u8],
) -> Result<usize, MemoryIoError> {
    let mut bytes_read = 0;
    let result = unsafe {
        ReadProcessMemory(
            handle.raw(),
            address.as_u64() as LPVOID,
            buffer.as_mut_ptr() as LPVOID,
            buffer.len(),
            &mut bytes_read,
        )
    };

    if result == FALSE {
        Err(MemoryIoError::from_os_code(address, last_error_code()))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for WriteProcessMemory
pub fn write_process_memory(
    handle: &Handle,
    address: Address,
    data: &[u8],
) -> Result<usize, MemoryIoError> {
    let mut bytes_written = 0;
    let result = unsafe {
        WriteProcessMemory(
            handle.raw(),
            address.as_u64() as LPVOID,
            data.as_ptr() as LPVOID,
            data.len(),
            &mut bytes_written,
        )
    };

    if result == FALSE {
        Err(MemoryIoError::from_os_code(address, last_error_code()))
    } else {
        Ok(bytes_written)
    }
}

/// Whether the process behind `handle` is still running.
pub fn is_process_alive(handle: &Handle) -> bool {
    let mut exit_code: DWORD = 0;
    let result = unsafe { GetExitCodeProcess(handle.raw(), &mut exit_code) };
    result == TRUE && exit_code == STILL_ACTIVE
}

/// Whether the process is a 32-bit process on 64-bit Windows.
pub fn is_wow64_process(handle: &Handle) -> Result<bool, AttachError> {
    let mut wow64 = FALSE;
    let result = unsafe { IsWow64Process(handle.raw(), &mut wow64) };
    if result == FALSE {
        Err(AttachError::Api(format!(
            "IsWow64Process failed: OS error {}",
            last_error_code()
        )))
    } else {
        Ok(wow64 == TRUE)
    }
}

/// Full filesystem path of the process's executable.
pub fn process_image_path(handle: &Handle) -> Result<String, AttachError> {
    let mut buffer = [0u16; MAX_PATH + 1];
    let mut size = buffer.len() as DWORD;
    let result =
        unsafe { QueryFullProcessImageNameW(handle.raw(), 0, buffer.as_mut_ptr(), &mut size) };
    if result == FALSE {
        Err(AttachError::Api(format!(
            "QueryFullProcessImageNameW failed: OS error {}",
            last_error_code()
        )))
    } else {
        Ok(wide_to_string(&buffer[..size as usize]))
    }
}
