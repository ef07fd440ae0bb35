//! Minimal byte serialization of packed integers.
//!
//! The wire form of a packed value is its big-endian magnitude with no
//! leading zero byte. Zero is the empty buffer, so a message whose every digit
//! is zero costs nothing on the wire.

use malachite::base::num::basic::traits::Zero;
use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::{Integer, Natural};

use crate::error::{Error, Result};

/// Serialize `value` to the shortest big-endian buffer.
pub fn to_bytes(value: &Natural) -> Vec<u8> {
    // Zero has no base-256 digits at all.
    PowerOf2Digits::<u8>::to_power_of_2_digits_desc(value, 8)
}

/// Load a big-endian buffer. The empty buffer is zero.
pub fn from_bytes(bytes: &[u8]) -> Natural {
    <Natural as PowerOf2Digits<u8>>::from_power_of_2_digits_desc(8, bytes.iter().copied())
        .unwrap_or(Natural::ZERO)
}

/// Serialize a signed integer, rejecting negative values.
///
/// # Errors
/// Returns `Error::Negative` if `value < 0`.
pub fn encode_integer(value: &Integer) -> Result<Vec<u8>> {
    let natural = Natural::try_from(value).map_err(|_| Error::Negative)?;
    Ok(to_bytes(&natural))
}

/// Load a buffer as a (necessarily non-negative) signed integer.
pub fn decode_integer(bytes: &[u8]) -> Integer {
    Integer::from(from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_empty() {
        assert!(to_bytes(&Natural::from(0u32)).is_empty());
        assert_eq!(from_bytes(&[]), Natural::from(0u32));
        assert!(encode_integer(&Integer::from(0)).unwrap().is_empty());
    }

    #[test]
    fn test_no_leading_zero_byte() {
        assert_eq!(to_bytes(&Natural::from(1u32)), vec![0x01]);
        assert_eq!(to_bytes(&Natural::from(0xabcu32)), vec![0x0a, 0xbc]);
        assert_eq!(to_bytes(&Natural::from(0x1_0000u32)), vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_leading_zeros_ignored_on_load() {
        assert_eq!(from_bytes(&[0, 0, 0x12]), Natural::from(0x12u32));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            encode_integer(&Integer::from(-1)),
            Err(Error::Negative)
        ));
    }

    #[test]
    fn test_large_value() {
        let value = Natural::from(23489576384756123904823048u128);
        assert_eq!(from_bytes(&to_bytes(&value)), value);
        let signed = Integer::from(value);
        assert_eq!(decode_integer(&encode_integer(&signed).unwrap()), signed);
    }

    proptest! {
        #[test]
        fn prop_bytes_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let value = from_bytes(&bytes);
            let encoded = to_bytes(&value);
            let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
            prop_assert_eq!(&encoded[..], &bytes[start..]);
            prop_assert_eq!(from_bytes(&encoded), value);
        }
    }
}
