//! Pointer-chain resolution
//!
//! Turns a [`MemoryAddress`] description into the concrete address a value
//! currently lives at. Indirect chains start at a module base, add the base
//! offset without dereferencing, then walk the offset list: each hop reads a
//! pointer at the current address and adds its offset to the value read. The
//! final offset is never dereferenced; the result is the field address
//! itself.
//!
//! Resolution is repeated every polling iteration because the target is free
//! to reallocate any structure the chain passes through.

use crate::core::types::{
    normalize_order, Address, BaseOffset, MemoryAddress, ResolveError, TARGET_ORDER,
};
use crate::memory::io;
use crate::target::{PointerWidth, Target};

/// Resolves `address` to a concrete address inside `target`.
pub fn resolve(target: &dyn Target, address: &MemoryAddress) -> Result<Address, ResolveError> {
    let indirect = match address {
        MemoryAddress::Fixed(fixed) => return Ok(*fixed),
        MemoryAddress::Indirect(indirect) => indirect,
    };

    let module_base = target.module_base(indirect.module.as_deref())?;
    let base = match indirect.base {
        BaseOffset::Constant(base) => base,
        BaseOffset::Versioned => target
            .base_offset()
            .ok_or(ResolveError::BaseAddressUnknown)?,
    };

    let mut current = module_base.offset(base);
    for (hop, offset) in indirect.offsets.iter().enumerate() {
        let pointer = read_pointer(target, current)
            .map_err(|source| ResolveError::unreadable(hop + 1, current, source))?;
        current = pointer.offset(*offset);
    }
    Ok(current)
}

/// Reads one target-pointer-width value at `address`.
fn read_pointer(
    target: &dyn Target,
    address: Address,
) -> Result<Address, crate::core::types::MemoryIoError> {
    let width = target.pointer_width();
    let mut raw = [0u8; 8];
    io::read_exact(target, address, &mut raw[..width.byte_len()])?;

    let value = match width {
        PointerWidth::Four => {
            let mut bytes = [raw[0], raw[1], raw[2], raw[3]];
            normalize_order(&mut bytes, TARGET_ORDER);
            u32::from_ne_bytes(bytes) as u64
        }
        PointerWidth::Eight => {
            normalize_order(&mut raw, TARGET_ORDER);
            u64::from_ne_bytes(raw)
        }
    };
    Ok(Address::new(value))
}
