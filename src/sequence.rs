//! Mixed-radix packing of digit sequences.
//!
//! An [`Encoder`] folds digits `(numerator, denominator)` into one natural
//! number: each numerator is scaled by the product of every denominator that
//! came before it. A [`Reader`] unfolds them again, first digit in, first
//! digit out.
//!
//! ```text
//! value      = n0 + n1*d0 + n2*d0*d1 + ...
//! multiplier = d0 * d1 * d2 * ...
//! ```
//!
//! Reading past the last packed digit is not an error: the remainder is zero,
//! so every further digit reads as `0`. Trailing zero digits therefore never
//! need to be written.

use malachite::base::num::arithmetic::traits::DivMod;
use malachite::base::num::basic::traits::{One, Zero};
use malachite::Natural;

use crate::error::{Error, Result};
use crate::ints::VarIntLadder;
use crate::wire;

/// One place of a mixed-radix number.
///
/// A digit is only meaningful when `numerator < denominator`. Construction
/// does not check this; [`Encoder::push`] does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digit {
    /// Value stored in this place.
    pub numerator: Natural,
    /// Radix of this place.
    pub denominator: Natural,
}

impl Digit {
    /// Create a digit from anything convertible to a natural number.
    pub fn new(numerator: impl Into<Natural>, denominator: impl Into<Natural>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }
}

impl<N: Into<Natural>, D: Into<Natural>> From<(N, D)> for Digit {
    fn from((numerator, denominator): (N, D)) -> Self {
        Self::new(numerator, denominator)
    }
}

/// Mixed-radix encoder.
#[derive(Clone, Debug)]
pub struct Encoder {
    value: Natural,
    multiplier: Natural,
    digits: usize,
    pub(crate) ladder: VarIntLadder,
}

impl Encoder {
    /// Create an empty encoder using the default variable-width ladder.
    pub fn new() -> Self {
        Self::with_ladder(VarIntLadder::default())
    }

    /// Create an empty encoder using a custom variable-width ladder.
    pub fn with_ladder(ladder: VarIntLadder) -> Self {
        Self {
            value: Natural::ZERO,
            multiplier: Natural::ONE,
            digits: 0,
            ladder,
        }
    }

    /// Append one digit.
    ///
    /// # Errors
    /// Returns `Error::FractionOutOfRange` unless `numerator < denominator`.
    pub fn push(&mut self, digit: Digit) -> Result<&mut Self> {
        let Digit {
            numerator,
            denominator,
        } = digit;
        if numerator >= denominator {
            return Err(Error::FractionOutOfRange {
                numerator,
                denominator,
            });
        }
        self.value += numerator * &self.multiplier;
        self.multiplier *= denominator;
        self.digits += 1;
        Ok(self)
    }

    /// Append the digit `(numerator, denominator)`.
    ///
    /// # Errors
    /// Returns `Error::FractionOutOfRange` unless `numerator < denominator`.
    pub fn append(
        &mut self,
        numerator: impl Into<Natural>,
        denominator: impl Into<Natural>,
    ) -> Result<&mut Self> {
        self.push(Digit::new(numerator, denominator))
    }

    /// Append every digit of `digits` in order.
    ///
    /// Stops at the first invalid digit; digits before it stay appended.
    pub fn extend<I>(&mut self, digits: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Digit>,
    {
        for digit in digits {
            self.push(digit.into())?;
        }
        Ok(self)
    }

    /// Append digits as they arrive from an asynchronous source.
    ///
    /// Digits are accumulated strictly in arrival order. Dropping the future
    /// abandons the encode; the encoder keeps whatever was appended so far.
    #[cfg(feature = "async")]
    pub async fn extend_stream<S>(&mut self, digits: S) -> Result<&mut Self>
    where
        S: futures_core::Stream,
        S::Item: Into<Digit>,
    {
        let mut digits = std::pin::pin!(digits);
        while let Some(digit) =
            std::future::poll_fn(|cx| futures_core::Stream::poll_next(digits.as_mut(), cx)).await
        {
            self.push(digit.into())?;
        }
        Ok(self)
    }

    /// Accumulated value.
    pub fn value(&self) -> &Natural {
        &self.value
    }

    /// Product of every denominator appended so far.
    pub fn multiplier(&self) -> &Natural {
        &self.multiplier
    }

    /// Number of digits appended so far.
    pub fn len(&self) -> usize {
        self.digits
    }

    /// Whether no digit has been appended.
    pub fn is_empty(&self) -> bool {
        self.digits == 0
    }

    /// Serialize the accumulated value without consuming the encoder.
    pub fn to_bytes(&self) -> Vec<u8> {
        wire::to_bytes(&self.value)
    }

    /// Finish encoding and return the packed bytes.
    pub fn finish(self) -> Vec<u8> {
        let bytes = self.to_bytes();
        tracing::trace!(digits = self.digits, bytes = bytes.len(), "packed digit sequence");
        bytes
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mixed-radix reader.
#[derive(Clone, Debug)]
pub struct Reader {
    remaining: Natural,
    pub(crate) ladder: VarIntLadder,
}

impl Reader {
    /// Create a reader over an already-loaded value.
    pub fn new(value: Natural) -> Self {
        Self::with_ladder(value, VarIntLadder::default())
    }

    /// Create a reader over an already-loaded value with a custom ladder.
    pub fn with_ladder(value: Natural, ladder: VarIntLadder) -> Self {
        Self {
            remaining: value,
            ladder,
        }
    }

    /// Create a reader over packed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(wire::from_bytes(bytes))
    }

    /// Extract the next digit for radix `denominator`.
    ///
    /// Once every packed digit has been read this keeps returning zero.
    ///
    /// # Errors
    /// Returns `Error::ZeroDenominator` if `denominator` is zero.
    pub fn extract(&mut self, denominator: impl Into<Natural>) -> Result<Natural> {
        let denominator = denominator.into();
        if denominator == Natural::ZERO {
            return Err(Error::ZeroDenominator);
        }
        let (quotient, numerator) = (&self.remaining).div_mod(&denominator);
        self.remaining = quotient;
        Ok(numerator)
    }

    /// Extract the next digit for a radix that fits in a `u64`.
    pub fn extract_u64(&mut self, denominator: u64) -> Result<u64> {
        let numerator = self.extract(denominator)?;
        // numerator < denominator, so this cannot fail.
        u64::try_from(&numerator).map_err(|_| Error::Overflow("u64"))
    }

    /// The part of the value not yet extracted.
    pub fn remaining(&self) -> &Natural {
        &self.remaining
    }

    /// Whether every further digit will read as zero.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Natural::ZERO
    }
}

/// Pack a digit sequence straight to bytes.
///
/// # Errors
/// Returns `Error::FractionOutOfRange` for the first digit with
/// `numerator >= denominator`.
pub fn encode_digits<I>(digits: I) -> Result<Vec<u8>>
where
    I: IntoIterator,
    I::Item: Into<Digit>,
{
    let mut encoder = Encoder::new();
    encoder.extend(digits)?;
    Ok(encoder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_sequence_reads_zero() {
        let bytes = encode_digits(Vec::<(u64, u64)>::new()).unwrap();
        assert!(bytes.is_empty());
        let mut reader = Reader::from_bytes(&bytes);
        assert_eq!(reader.extract_u64(2).unwrap(), 0);
        assert_eq!(reader.extract_u64(123).unwrap(), 0);
        assert_eq!(reader.extract_u64(1).unwrap(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut encoder = Encoder::new();
        encoder.append(1u32, 300u32).unwrap().append(0u32, 300u32).unwrap();
        assert_eq!(encoder.len(), 2);
        let mut reader = Reader::from_bytes(&encoder.finish());
        assert_eq!(reader.extract_u64(300).unwrap(), 1);
        assert_eq!(reader.extract_u64(300).unwrap(), 0);
    }

    #[test]
    fn test_state_arithmetic() {
        let mut encoder = Encoder::new();
        encoder.extend([(2u32, 3u32), (1, 5), (4, 7)]).unwrap();
        // 2 + 1*3 + 4*15
        assert_eq!(encoder.value(), &Natural::from(65u32));
        assert_eq!(encoder.multiplier(), &Natural::from(105u32));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut encoder = Encoder::new();
        assert!(matches!(
            encoder.append(3u32, 3u32),
            Err(Error::FractionOutOfRange { .. })
        ));
        assert!(matches!(
            encoder.append(0u32, 0u32),
            Err(Error::FractionOutOfRange { .. })
        ));
        assert!(encoder.is_empty());
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let mut reader = Reader::from_bytes(&[1]);
        assert!(matches!(reader.extract(0u32), Err(Error::ZeroDenominator)));
    }

    #[test]
    fn test_all_zero_digits_collapse() {
        let bytes = encode_digits([(0u32, 2u32), (0, 1000), (0, 7)]).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_trailing_zeros_cost_nothing() {
        let short = encode_digits([(5u32, 256u32)]).unwrap();
        let long = encode_digits([(5u32, 256u32), (0, 256), (0, 65536)]).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_exhaustion() {
        let mut reader = Reader::from_bytes(&encode_digits([(1u32, 2u32)]).unwrap());
        assert!(!reader.is_exhausted());
        reader.extract_u64(2).unwrap();
        assert!(reader.is_exhausted());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_digit_roundtrip(
            pairs in prop::collection::vec((any::<u64>(), 1u64..u64::MAX), 0..40),
            extra in prop::collection::vec(1u64..1000, 0..8),
        ) {
            let digits: Vec<(u64, u64)> = pairs.iter().map(|&(n, d)| (n % d, d)).collect();
            let bytes = encode_digits(digits.iter().copied()).unwrap();

            let mut reader = Reader::from_bytes(&bytes);
            for &(n, d) in &digits {
                prop_assert_eq!(reader.extract_u64(d).unwrap(), n);
            }
            for &d in &extra {
                prop_assert_eq!(reader.extract_u64(d).unwrap(), 0);
            }
        }
    }
}
