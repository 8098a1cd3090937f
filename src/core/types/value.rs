//! Wire marshaling for the closed set of remote value types
//!
//! The target's memory is treated as little-endian wire data. Each supported
//! primitive implements [`MemValue`] once; the type is selected generically
//! at compile time, never by runtime type inspection.

use std::fmt;

/// Byte order of a wire buffer or of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// The byte order this host interprets multi-byte integers in.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Reverses `buf` in place when `wire` differs from the host's byte order,
/// so a wire buffer can be interpreted with native-endian conversions (and
/// a native-endian buffer can be serialized back to the wire).
pub fn normalize_order(buf: &mut [u8], wire: ByteOrder) {
    if wire != ByteOrder::host() {
        buf.reverse();
    }
}

/// Byte order the target process stores values in.
///
/// In practice host and target are both little-endian x86; the conversion
/// step still runs on every marshal so it stays exercised.
pub const TARGET_ORDER: ByteOrder = ByteOrder::Little;

/// A primitive value that can be marshaled to and from target memory.
///
/// The implementing set is closed: byte, 32-bit integer, 32-bit float, and
/// fixed-width UTF-16 text.
pub trait MemValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Exact number of bytes this type occupies in target memory.
    const WIRE_SIZE: usize;

    /// Interprets exactly [`Self::WIRE_SIZE`] wire bytes.
    fn decode(bytes: &[u8]) -> Self;

    /// Serializes to exactly [`Self::WIRE_SIZE`] wire bytes.
    fn encode(&self) -> Vec<u8>;
}

impl MemValue for u8 {
    const WIRE_SIZE: usize = 1;

    fn decode(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn encode(&self) -> Vec<u8> {
        vec![*self]
    }
}

impl MemValue for i32 {
    const WIRE_SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        normalize_order(&mut raw, TARGET_ORDER);
        i32::from_ne_bytes(raw)
    }

    fn encode(&self) -> Vec<u8> {
        let mut raw = self.to_ne_bytes();
        normalize_order(&mut raw, TARGET_ORDER);
        raw.to_vec()
    }
}

impl MemValue for f32 {
    const WIRE_SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        normalize_order(&mut raw, TARGET_ORDER);
        f32::from_ne_bytes(raw)
    }

    fn encode(&self) -> Vec<u8> {
        let mut raw = self.to_ne_bytes();
        normalize_order(&mut raw, TARGET_ORDER);
        raw.to_vec()
    }
}

/// Fixed-width UTF-16 text of `N` code units, NUL-terminated inside the
/// window when shorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideText<const N: usize>(pub String);

impl<const N: usize> WideText<N> {
    pub fn new(text: impl Into<String>) -> Self {
        WideText(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for WideText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> MemValue for WideText<N> {
    const WIRE_SIZE: usize = N * 2;

    fn decode(bytes: &[u8]) -> Self {
        let mut units = Vec::with_capacity(N);
        for chunk in bytes[..N * 2].chunks_exact(2) {
            let mut unit = [chunk[0], chunk[1]];
            normalize_order(&mut unit, TARGET_ORDER);
            let value = u16::from_ne_bytes(unit);
            if value == 0 {
                break;
            }
            units.push(value);
        }
        WideText(String::from_utf16_lossy(&units))
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(N * 2);
        for unit in self.0.encode_utf16().take(N) {
            let mut raw = unit.to_ne_bytes();
            normalize_order(&mut raw, TARGET_ORDER);
            out.extend_from_slice(&raw);
        }
        out.resize(N * 2, 0);
        out
    }
}
