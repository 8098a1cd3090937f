//! Address types: concrete addresses and fixed/indirect address descriptions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete address inside the target process's address space.
///
/// Held as `u64` so a 64-bit target can be described regardless of the
/// host's pointer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds a signed offset to the address, wrapping on overflow
    pub const fn offset(&self, offset: i64) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value as u64)
    }
}

/// First hop of an indirect chain, added to the module base address.
///
/// `Versioned` defers to the base offset constant of the identified target
/// build; resolution fails until a build has been identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseOffset {
    Constant(i64),
    Versioned,
}

/// A multi-hop indirect address: module base, plus base offset, then a chain
/// of dereference-and-add hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectAddress {
    /// Module the chain is anchored to, e.g. `UnityPlayer.dll`; `None` means
    /// the process's main module.
    pub module: Option<String>,
    pub base: BaseOffset,
    /// Offsets applied after the base hop. Each hop dereferences the current
    /// address, then adds the offset; the final offset is added but never
    /// dereferenced (it is the field address itself).
    pub offsets: Vec<i64>,
}

/// Description of where a remote value lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryAddress {
    Fixed(Address),
    Indirect(IndirectAddress),
}

impl MemoryAddress {
    /// An absolute pointer value.
    pub const fn fixed(address: u64) -> Self {
        MemoryAddress::Fixed(Address::new(address))
    }

    /// An indirect chain in the main module with a constant base offset.
    pub fn indirect(base: i64, offsets: Vec<i64>) -> Self {
        MemoryAddress::Indirect(IndirectAddress {
            module: None,
            base: BaseOffset::Constant(base),
            offsets,
        })
    }

    /// An indirect chain in the main module whose base offset comes from the
    /// identified target build.
    pub fn versioned(offsets: Vec<i64>) -> Self {
        MemoryAddress::Indirect(IndirectAddress {
            module: None,
            base: BaseOffset::Versioned,
            offsets,
        })
    }

    /// Anchors an indirect chain to a named module instead of the main one.
    pub fn in_module(self, module: impl Into<String>) -> Self {
        match self {
            MemoryAddress::Indirect(mut inner) => {
                inner.module = Some(module.into());
                MemoryAddress::Indirect(inner)
            }
            fixed => fixed,
        }
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryAddress::Fixed(address) => write!(f, "{}", address),
            MemoryAddress::Indirect(inner) => {
                let module = inner.module.as_deref().unwrap_or("<main>");
                match inner.base {
                    BaseOffset::Constant(base) => write!(f, "{}+0x{:X}", module, base)?,
                    BaseOffset::Versioned => write!(f, "{}+<versioned>", module)?,
                }
                for offset in &inner.offsets {
                    if *offset < 0 {
                        write!(f, " -> -0x{:X}", -offset)?;
                    } else {
                        write!(f, " -> 0x{:X}", offset)?;
                    }
                }
                Ok(())
            }
        }
    }
}
