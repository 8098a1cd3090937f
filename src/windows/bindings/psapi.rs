//! PSAPI.dll bindings for module enumeration

use crate::core::types::{Address, ResolveError};
use crate::windows::types::Handle;
use crate::windows::utils::wide_to_string;
use winapi::shared::minwindef::{FALSE, HMODULE, MAX_PATH};
use winapi::um::psapi::{EnumProcessModules, GetModuleBaseNameW};

/// One loaded module of a remote process.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub name: String,
    pub base: Address,
}

/// Enumerates the process's loaded modules, in load order.
///
/// The first entry is the process's main executable module.
pub fn enum_modules(handle: &Handle) -> Result<Vec<ModuleEntry>, ResolveError> {
    let mut modules: Vec<HMODULE> = vec![std::ptr::null_mut(); 1024];
    let mut bytes_needed = 0u32;

    let result = unsafe {
        EnumProcessModules(
            handle.raw(),
            modules.as_mut_ptr(),
            (modules.len() * std::mem::size_of::<HMODULE>()) as u32,
            &mut bytes_needed,
        )
    };
    if result == FALSE {
        return Err(ResolveError::ModuleNotFound(
            "EnumProcessModules failed".to_string(),
        ));
    }

    let count = (bytes_needed as usize / std::mem::size_of::<HMODULE>()).min(modules.len());
    modules.truncate(count);

    let mut entries = Vec::with_capacity(count);
    for module in modules {
        let mut name_buffer = [0u16; MAX_PATH];
        let length = unsafe {
            GetModuleBaseNameW(
                handle.raw(),
                module,
                name_buffer.as_mut_ptr(),
                name_buffer.len() as u32,
            )
        };
        entries.push(ModuleEntry {
            name: wide_to_string(&name_buffer[..length as usize]),
            // An HMODULE is the module's load address.
            base: Address::new(module as usize as u64),
        });
    }
    Ok(entries)
}

/// Base address of the main module, or of a named module.
pub fn module_base(handle: &Handle, module: Option<&str>) -> Result<Address, ResolveError> {
    let entries = enum_modules(handle)?;
    match module {
        None => entries
            .first()
            .map(|entry| entry.base)
            .ok_or_else(|| ResolveError::ModuleNotFound("<main>".to_string())),
        Some(name) => entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.base)
            .ok_or_else(|| ResolveError::ModuleNotFound(name.to_string())),
    }
}
