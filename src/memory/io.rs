//! Exact-count typed reads and writes against a target
//!
//! The raw [`Target`] transfer calls report how many bytes moved; everything
//! above them requires the full count. A value that only partially
//! transferred is useless (and a partial write is worse than none), so any
//! short transfer is an error here.

use crate::core::types::{Address, MemValue, MemoryIoError};
use crate::target::Target;

/// Reads exactly `buf.len()` bytes at `address`.
pub fn read_exact(
    target: &dyn Target,
    address: Address,
    buf: &mut [u8],
) -> Result<(), MemoryIoError> {
    let actual = target.read_bytes(address, buf)?;
    if actual != buf.len() {
        return Err(MemoryIoError::ShortRead {
            address,
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}

/// Writes exactly `data.len()` bytes at `address`.
pub fn write_exact(
    target: &dyn Target,
    address: Address,
    data: &[u8],
) -> Result<(), MemoryIoError> {
    let actual = target.write_bytes(address, data)?;
    if actual != data.len() {
        return Err(MemoryIoError::ShortWrite {
            address,
            expected: data.len(),
            actual,
        });
    }
    Ok(())
}

/// Reads and decodes one `T` at `address`.
pub fn read_value<T: MemValue>(target: &dyn Target, address: Address) -> Result<T, MemoryIoError> {
    let mut buf = vec![0u8; T::WIRE_SIZE];
    read_exact(target, address, &mut buf)?;
    Ok(T::decode(&buf))
}

/// Encodes and writes one `T` at `address`.
pub fn write_value<T: MemValue>(
    target: &dyn Target,
    address: Address,
    value: &T,
) -> Result<(), MemoryIoError> {
    write_exact(target, address, &value.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WideText;
    use crate::target::fake::FakeTarget;

    #[test]
    fn test_read_value_typed() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &0x01020304i32.encode());
        target.load_bytes(0x1010, &1.5f32.encode());
        target.load_bytes(0x1020, &[0xAB]);

        assert_eq!(read_value::<i32>(&target, Address::new(0x1000)).unwrap(), 0x01020304);
        assert_eq!(read_value::<f32>(&target, Address::new(0x1010)).unwrap(), 1.5);
        assert_eq!(read_value::<u8>(&target, Address::new(0x1020)).unwrap(), 0xAB);
    }

    #[test]
    fn test_write_value_round_trip() {
        let target = FakeTarget::new(0x400000);
        write_value(&target, Address::new(0x2000), &42i32).unwrap();
        assert_eq!(read_value::<i32>(&target, Address::new(0x2000)).unwrap(), 42);

        write_value(&target, Address::new(0x2010), &WideText::<8>::new("Artemis")).unwrap();
        assert_eq!(
            read_value::<WideText<8>>(&target, Address::new(0x2010))
                .unwrap()
                .as_str(),
            "Artemis"
        );
    }

    #[test]
    fn test_short_read_is_an_error() {
        let target = FakeTarget::new(0x400000);
        // Only two of the four bytes an i32 needs are mapped.
        target.load_bytes(0x1000, &[1, 2]);

        let err = read_value::<i32>(&target, Address::new(0x1000)).unwrap_err();
        match err {
            MemoryIoError::ShortRead {
                expected, actual, ..
            } => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected short read, got {other:?}"),
        }
    }

    #[test]
    fn test_os_errors_pass_through() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &[0u8; 4]);
        target.deny_io(true);

        let err = read_value::<i32>(&target, Address::new(0x1000)).unwrap_err();
        assert!(err.is_access_denied());

        let err = write_value(&target, Address::new(0x1000), &1i32).unwrap_err();
        assert!(err.is_access_denied());
    }
}
