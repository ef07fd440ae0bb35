//! Raw bytes, hex strings and UUIDs.
//!
//! Binary data is packed as a single digit: `n` bytes become one numerator
//! in radix `2^(8n)`, `n` hex digits one numerator in radix `2^(4n)`.

use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::Natural;

use crate::error::{Error, Result};
use crate::ints::scale;
use crate::sequence::{Encoder, Reader};

const UUID_BYTES: usize = 16;

/// Big-endian digits of `value` in base `2^log_base`, left-padded to `len`.
fn padded_digits(value: &Natural, log_base: u64, len: usize) -> Result<Vec<u8>> {
    let digits: Vec<u8> = PowerOf2Digits::<u8>::to_power_of_2_digits_desc(value, log_base);
    if digits.len() > len {
        return Err(Error::Overflow("requested length"));
    }
    let mut out = vec![0u8; len - digits.len()];
    out.extend(digits);
    Ok(out)
}

fn from_digits(log_base: u64, digits: &[u8]) -> Result<Natural> {
    <Natural as PowerOf2Digits<u8>>::from_power_of_2_digits_desc(log_base, digits.iter().copied())
        .ok_or(Error::Overflow("digit"))
}

fn nibbles(hex: &str) -> Result<Vec<u8>> {
    hex.chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| Error::InvalidHex(hex.to_owned()))
        })
        .collect()
}

fn bit_len(len: usize, bits_per_unit: u64) -> u64 {
    len as u64 * bits_per_unit
}

impl Encoder {
    /// Append `bytes` as one digit of radix `2^(8 * bytes.len())`.
    ///
    /// The reader must know the length; see [`Encoder::vbuffer`] otherwise.
    pub fn buffer(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        let value = from_digits(8, bytes)?;
        self.append(value, scale(bit_len(bytes.len(), 8)))
    }

    /// Append the length of `bytes`, then the bytes.
    pub fn vbuffer(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.vint(bytes.len() as u64)?.buffer(bytes)
    }

    /// Append a hex string of any length, including odd lengths.
    ///
    /// # Errors
    /// Returns `Error::InvalidHex` if `hex` has a non-hex character.
    pub fn hex(&mut self, hex: &str) -> Result<&mut Self> {
        let nibbles = nibbles(hex)?;
        let value = from_digits(4, &nibbles)?;
        self.vint(nibbles.len() as u64)?
            .append(value, scale(bit_len(nibbles.len(), 4)))
    }

    /// Append a UUID such as `"2f1c7a4e-0b9d-4c3e-8a5f-6d2e1b0c9a87"`.
    ///
    /// Dashes are ignored; what remains must be exactly 16 bytes of hex.
    ///
    /// # Errors
    /// Returns `Error::InvalidUuid` otherwise.
    pub fn uuid(&mut self, uuid: &str) -> Result<&mut Self> {
        let invalid = || Error::InvalidUuid(uuid.to_owned());
        let compact: String = uuid.chars().filter(|&c| c != '-').collect();
        let nibbles = nibbles(&compact).map_err(|_| invalid())?;
        if nibbles.len() != UUID_BYTES * 2 {
            return Err(invalid());
        }
        let bytes: Vec<u8> = nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect();
        self.buffer(&bytes)
    }
}

impl Reader {
    /// Read `len` bytes. A zero length reads nothing and yields an empty buffer.
    pub fn buffer(&mut self, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let value = self.extract(scale(bit_len(len, 8)))?;
        padded_digits(&value, 8, len)
    }

    /// Read a length-prefixed buffer.
    pub fn vbuffer(&mut self) -> Result<Vec<u8>> {
        let len = self.vint()?;
        let len = usize::try_from(len).map_err(|_| Error::BufferTooLarge(len))?;
        self.buffer(len)
    }

    /// Read a hex string. Digits come back in lowercase.
    pub fn hex(&mut self) -> Result<String> {
        let len = self.vint()?;
        let len = usize::try_from(len).map_err(|_| Error::BufferTooLarge(len))?;
        let value = self.extract(scale(bit_len(len, 4)))?;
        let nibbles = padded_digits(&value, 4, len)?;
        Ok(nibbles
            .into_iter()
            .filter_map(|n| char::from_digit(u32::from(n), 16))
            .collect())
    }

    /// Read a UUID in its canonical dashed form.
    pub fn uuid(&mut self) -> Result<String> {
        let bytes = self.buffer(UUID_BYTES)?;
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Ok(format!(
            "{}-{}-{}-{}-{}",
            &hex[..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..]
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn packed(f: impl FnOnce(&mut Encoder) -> Result<&mut Encoder>) -> Reader {
        let mut encoder = Encoder::new();
        f(&mut encoder).unwrap();
        Reader::from_bytes(&encoder.finish())
    }

    #[test]
    fn test_buffer_keeps_leading_zeros() {
        let data = [0u8, 0, 7, 0];
        let mut reader = packed(|e| e.buffer(&data));
        assert_eq!(reader.buffer(4).unwrap(), data);
    }

    #[test]
    fn test_empty_buffer() {
        let mut reader = packed(|e| e.buffer(&[])?.vbuffer(&[]));
        assert!(reader.buffer(0).unwrap().is_empty());
        assert!(reader.vbuffer().unwrap().is_empty());
    }

    #[test]
    fn test_ipv4_as_buffer() {
        let addr = [192u8, 168, 1, 20];
        let mut reader = packed(|e| e.buffer(&addr)?.fixed_int(8734, 16));
        assert_eq!(reader.buffer(4).unwrap(), addr);
        assert_eq!(reader.fixed_int(16).unwrap(), 8734);
    }

    #[test]
    fn test_hex_odd_and_even() {
        let even = "00ff10abcdef";
        let odd = "0a1";
        let mut reader = packed(|e| e.hex(even)?.hex(odd)?.hex(""));
        assert_eq!(reader.hex().unwrap(), even);
        assert_eq!(reader.hex().unwrap(), odd);
        assert_eq!(reader.hex().unwrap(), "");
    }

    #[test]
    fn test_hex_lowercases() {
        assert_eq!(packed(|e| e.hex("ABCD")).hex().unwrap(), "abcd");
        assert!(matches!(
            Encoder::new().hex("12g4"),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn test_uuid() {
        let uuid = "2f1c7a4e-0b9d-4c3e-8a5f-6d2e1b0c9a87";
        assert_eq!(packed(|e| e.uuid(uuid)).uuid().unwrap(), uuid);
        let nil = "00000000-0000-0000-0000-000000000000";
        let mut encoder = Encoder::new();
        encoder.uuid(nil).unwrap();
        assert!(encoder.finish().is_empty());
        assert_eq!(Reader::from_bytes(&[]).uuid().unwrap(), nil);
    }

    #[test]
    fn test_invalid_uuid() {
        assert!(matches!(
            Encoder::new().uuid("2f1c7a4e-0b9d"),
            Err(Error::InvalidUuid(_))
        ));
        assert!(matches!(
            Encoder::new().uuid("zf1c7a4e-0b9d-4c3e-8a5f-6d2e1b0c9a87"),
            Err(Error::InvalidUuid(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_vbuffer_roundtrip(data in prop::collection::vec(any::<u8>(), 0..48)) {
            let mut reader = packed(|e| e.vbuffer(&data)?.bit(true));
            prop_assert_eq!(reader.vbuffer().unwrap(), data);
            prop_assert!(reader.bit().unwrap());
        }

        #[test]
        fn prop_hex_roundtrip(hex in "[0-9a-f]{0,86}") {
            prop_assert_eq!(packed(|e| e.hex(&hex)).hex().unwrap(), hex);
        }
    }
}
