//! Bits, signs, and fixed or variable width integers.
//!
//! Every primitive here is a thin layer over [`Encoder::append`] and
//! [`Reader::extract`], so each inherits the round trip and zero-extension of
//! the underlying packing. A variable-width integer is two digits: the index
//! of the narrowest ladder step that holds the value, then the value itself.

use malachite::base::num::arithmetic::traits::PowerOf2;
use malachite::Natural;

use crate::error::{Error, Result};
use crate::sequence::{Encoder, Reader};

/// Bit widths available to variable-width integers, narrowest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarIntLadder {
    widths: Vec<u32>,
}

impl VarIntLadder {
    /// Create a ladder from strictly ascending widths in `1..=64`.
    ///
    /// # Errors
    /// Returns `Error::InvalidLadder` for an empty, unordered, or out of range
    /// set of widths.
    pub fn new(widths: impl Into<Vec<u32>>) -> Result<Self> {
        let widths = widths.into();
        if widths.is_empty() {
            return Err(Error::InvalidLadder("no widths"));
        }
        if widths.iter().any(|&w| w == 0 || w > 64) {
            return Err(Error::InvalidLadder("widths must be within 1..=64"));
        }
        if widths.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidLadder("widths must be strictly ascending"));
        }
        Ok(Self { widths })
    }

    /// Widths of the ladder, narrowest first.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Widest step.
    pub fn max_bits(&self) -> u32 {
        self.widths[self.widths.len() - 1]
    }

    /// Index and width of the narrowest step that holds `value`.
    pub fn step_for(&self, value: u64) -> Option<(usize, u32)> {
        self.widths
            .iter()
            .position(|&w| w == 64 || value < 1u64 << w)
            .map(|idx| (idx, self.widths[idx]))
    }
}

impl Default for VarIntLadder {
    fn default() -> Self {
        Self {
            widths: vec![4, 8, 32],
        }
    }
}

/// `2^bits` as a natural number.
pub(crate) fn scale(bits: u64) -> Natural {
    Natural::power_of_2(bits)
}

fn check_width(bits: u32) -> Result<()> {
    if bits > 64 {
        return Err(Error::WidthTooLarge(bits));
    }
    Ok(())
}

impl Encoder {
    /// Append `numerator` in radix `denominator`.
    pub fn fraction(&mut self, numerator: u64, denominator: u64) -> Result<&mut Self> {
        self.append(numerator, denominator)
    }

    /// Append a single bit.
    pub fn bit(&mut self, value: bool) -> Result<&mut Self> {
        self.append(u32::from(value), 2u32)
    }

    /// Append a boolean. Same wire form as [`Encoder::bit`].
    pub fn bool(&mut self, value: bool) -> Result<&mut Self> {
        self.bit(value)
    }

    /// Append the sign of `value`: `1` for zero and above, `0` below zero.
    pub fn sign(&mut self, value: i64) -> Result<&mut Self> {
        self.bit(value >= 0)
    }

    /// Append `value` as one digit of radix `2^bits`.
    ///
    /// # Errors
    /// Returns `Error::IntegerOutOfRange` if `value >= 2^bits`.
    pub fn fixed_int(&mut self, value: u64, bits: u32) -> Result<&mut Self> {
        check_width(bits)?;
        if bits < 64 && value >= 1u64 << bits {
            return Err(Error::IntegerOutOfRange { value, bits });
        }
        self.append(value, scale(u64::from(bits)))
    }

    /// Append the sign of `value`, then its magnitude in `bits` bits.
    pub fn signed_fixed_int(&mut self, value: i64, bits: u32) -> Result<&mut Self> {
        check_width(bits)?;
        if bits < 64 && value.unsigned_abs() >= 1u64 << bits {
            return Err(Error::IntegerOutOfRange {
                value: value.unsigned_abs(),
                bits,
            });
        }
        self.sign(value)?.fixed_int(value.unsigned_abs(), bits)
    }

    /// Append `value` using the narrowest step of the encoder's ladder.
    ///
    /// # Errors
    /// Returns `Error::ExceedsWidth` if `value` does not fit the widest step.
    pub fn vint(&mut self, value: u64) -> Result<&mut Self> {
        let Some((idx, bits)) = self.ladder.step_for(value) else {
            return Err(Error::ExceedsWidth {
                value,
                max_bits: self.ladder.max_bits(),
            });
        };
        let steps = self.ladder.widths().len() as u64;
        self.append(idx as u64, steps)?
            .append(value, scale(u64::from(bits)))
    }

    /// Append the sign of `value`, then its magnitude as a variable-width integer.
    pub fn svint(&mut self, value: i64) -> Result<&mut Self> {
        if self.ladder.step_for(value.unsigned_abs()).is_none() {
            return Err(Error::ExceedsWidth {
                value: value.unsigned_abs(),
                max_bits: self.ladder.max_bits(),
            });
        }
        self.sign(value)?.vint(value.unsigned_abs())
    }

    /// Append the position of `value` within `values`.
    ///
    /// # Errors
    /// Returns `Error::NotAnOption` if `value` is not in `values`.
    pub fn index_of<T: PartialEq>(&mut self, value: &T, values: &[T]) -> Result<&mut Self> {
        let idx = values
            .iter()
            .position(|v| v == value)
            .ok_or(Error::NotAnOption(values.len()))?;
        self.append(idx as u64, values.len() as u64)
    }
}

impl Reader {
    /// Read a digit of radix `denominator`.
    pub fn fraction(&mut self, denominator: u64) -> Result<u64> {
        self.extract_u64(denominator)
    }

    /// Read a single bit.
    pub fn bit(&mut self) -> Result<bool> {
        Ok(self.extract_u64(2)? != 0)
    }

    /// Read a boolean.
    pub fn bool(&mut self) -> Result<bool> {
        self.bit()
    }

    /// Read a sign: `1` or `-1`.
    pub fn sign(&mut self) -> Result<i64> {
        Ok(if self.bit()? { 1 } else { -1 })
    }

    /// Read an integer of `bits` bits.
    pub fn fixed_int(&mut self, bits: u32) -> Result<u64> {
        check_width(bits)?;
        let value = self.extract(scale(u64::from(bits)))?;
        u64::try_from(&value).map_err(|_| Error::Overflow("u64"))
    }

    /// Read a sign, then a magnitude of `bits` bits.
    pub fn signed_fixed_int(&mut self, bits: u32) -> Result<i64> {
        let sign = self.sign()?;
        let magnitude = self.fixed_int(bits)?;
        apply_sign(sign, magnitude)
    }

    /// Read a variable-width integer.
    pub fn vint(&mut self) -> Result<u64> {
        let steps = self.ladder.widths().len() as u64;
        let idx = self.extract_u64(steps)? as usize;
        let bits = self.ladder.widths()[idx];
        let value = self.extract(scale(u64::from(bits)))?;
        u64::try_from(&value).map_err(|_| Error::Overflow("u64"))
    }

    /// Read a sign, then a variable-width magnitude.
    pub fn svint(&mut self) -> Result<i64> {
        let sign = self.sign()?;
        let magnitude = self.vint()?;
        apply_sign(sign, magnitude)
    }

    /// Read a position and return the matching entry of `values`.
    ///
    /// # Errors
    /// Returns `Error::NotAnOption` if `values` is empty.
    pub fn index<'a, T>(&mut self, values: &'a [T]) -> Result<&'a T> {
        if values.is_empty() {
            return Err(Error::NotAnOption(0));
        }
        let idx = self.extract_u64(values.len() as u64)?;
        Ok(&values[idx as usize])
    }
}

fn apply_sign(sign: i64, magnitude: u64) -> Result<i64> {
    if sign < 0 {
        0i64.checked_sub_unsigned(magnitude)
            .ok_or(Error::Overflow("i64"))
    } else {
        i64::try_from(magnitude).map_err(|_| Error::Overflow("i64"))
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
    fn test_vint_boundaries() {
        for value in [0u64, 15, 16, 255, 256, (1 << 32) - 1] {
            assert_eq!(packed(|e| e.vint(value)).vint().unwrap(), value);
        }
        assert!(matches!(
            Encoder::new().vint(1 << 32),
            Err(Error::ExceedsWidth { max_bits: 32, .. })
        ));
    }

    #[test]
    fn test_vint_small_values() {
        assert_eq!(packed(|e| e.vint(6)).vint().unwrap(), 6);
        assert_eq!(packed(|e| e.vint(181)).vint().unwrap(), 181);
        assert_eq!(packed(|e| e.svint(-6)).svint().unwrap(), -6);
        assert_eq!(packed(|e| e.svint(-181)).svint().unwrap(), -181);
    }

    #[test]
    fn test_vint_zero_is_empty() {
        let mut encoder = Encoder::new();
        encoder.vint(0).unwrap();
        assert!(encoder.finish().is_empty());
    }

    #[test]
    fn test_ladder_steps() {
        let ladder = VarIntLadder::default();
        assert_eq!(ladder.step_for(15), Some((0, 4)));
        assert_eq!(ladder.step_for(16), Some((1, 8)));
        assert_eq!(ladder.step_for(256), Some((2, 32)));
        assert_eq!(ladder.step_for(1 << 32), None);
    }

    #[test]
    fn test_invalid_ladders() {
        assert!(VarIntLadder::new(Vec::new()).is_err());
        assert!(VarIntLadder::new(vec![8, 4]).is_err());
        assert!(VarIntLadder::new(vec![8, 8]).is_err());
        assert!(VarIntLadder::new(vec![0, 8]).is_err());
        assert!(VarIntLadder::new(vec![8, 65]).is_err());
    }

    #[test]
    fn test_custom_ladder() {
        let ladder = VarIntLadder::new(vec![1, 16, 64]).unwrap();
        let mut encoder = Encoder::with_ladder(ladder.clone());
        encoder.vint(u64::MAX).unwrap().vint(1).unwrap();
        let bytes = encoder.finish();
        let mut reader = Reader::with_ladder(crate::wire::from_bytes(&bytes), ladder);
        assert_eq!(reader.vint().unwrap(), u64::MAX);
        assert_eq!(reader.vint().unwrap(), 1);
    }

    #[test]
    fn test_fixed_int() {
        let mut reader = packed(|e| e.fixed_int(8734, 16)?.fixed_int(u64::MAX, 64));
        assert_eq!(reader.fixed_int(16).unwrap(), 8734);
        assert_eq!(reader.fixed_int(64).unwrap(), u64::MAX);
        assert!(matches!(
            Encoder::new().fixed_int(256, 8),
            Err(Error::IntegerOutOfRange { value: 256, bits: 8 })
        ));
        assert!(matches!(
            Encoder::new().fixed_int(0, 65),
            Err(Error::WidthTooLarge(65))
        ));
    }

    #[test]
    fn test_signed_fixed_int() {
        let mut reader = packed(|e| e.signed_fixed_int(-100, 8)?.signed_fixed_int(0, 8));
        assert_eq!(reader.signed_fixed_int(8).unwrap(), -100);
        assert_eq!(reader.signed_fixed_int(8).unwrap(), 0);
        let mut reader = packed(|e| e.signed_fixed_int(i64::MIN, 64));
        assert_eq!(reader.signed_fixed_int(64).unwrap(), i64::MIN);
    }

    #[test]
    fn test_sign_and_bits() {
        let mut reader = packed(|e| e.sign(-3)?.sign(0)?.bit(true)?.bool(false));
        assert_eq!(reader.sign().unwrap(), -1);
        assert_eq!(reader.sign().unwrap(), 1);
        assert!(reader.bit().unwrap());
        assert!(!reader.bool().unwrap());
    }

    #[test]
    fn test_index_of() {
        let protocols = ["tcp", "udp"];
        let mut reader = packed(|e| e.index_of(&"udp", &protocols));
        assert_eq!(*reader.index(&protocols).unwrap(), "udp");
        assert!(matches!(
            Encoder::new().index_of(&"sctp", &protocols),
            Err(Error::NotAnOption(2))
        ));
    }

    #[test]
    fn test_fraction() {
        let mut reader = packed(|e| e.fraction(1, 300)?.fraction(0, 300));
        assert_eq!(reader.fraction(300).unwrap(), 1);
        assert_eq!(reader.fraction(300).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn prop_svint_roundtrip(values in prop::collection::vec(-(1i64 << 32) + 1..(1i64 << 32), 1..20)) {
            let mut encoder = Encoder::new();
            for &v in &values {
                encoder.svint(v).unwrap();
            }
            let mut reader = Reader::from_bytes(&encoder.finish());
            for &v in &values {
                prop_assert_eq!(reader.svint().unwrap(), v);
            }
        }

        #[test]
        fn prop_fixed_roundtrip(bits in 1u32..=64, raw in any::<u64>()) {
            let value = if bits == 64 { raw } else { raw & ((1u64 << bits) - 1) };
            let mut reader = packed(|e| e.fixed_int(value, bits));
            prop_assert_eq!(reader.fixed_int(bits).unwrap(), value);
        }
    }
}
