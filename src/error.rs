//! Error types for mixed-radix packing.

use malachite::Natural;
use thiserror::Error;

/// Error variants for packing and unpacking operations.
///
/// Every variant describes a schema or programmer error: the producer and
/// consumer disagree about what may be encoded. None of them are transient.
#[derive(Debug, Error)]
pub enum Error {
    /// A digit was appended whose numerator is not below its denominator.
    #[error("fraction out of allowed range: {numerator} is not below {denominator}")]
    FractionOutOfRange {
        /// Offending numerator.
        numerator: Natural,
        /// Denominator it was paired with.
        denominator: Natural,
    },

    /// A digit was requested from a reader with a zero denominator.
    #[error("cannot extract a digit with a zero denominator")]
    ZeroDenominator,

    /// A negative value reached a codec without sign support.
    #[error("no support for negative values")]
    Negative,

    /// A variable-width integer does not fit the widest step of the ladder.
    #[error("value {value} exceeds permitted width of {max_bits} bits")]
    ExceedsWidth {
        /// Offending value.
        value: u64,
        /// Widest step of the ladder.
        max_bits: u32,
    },

    /// A fixed-width integer does not fit its declared width.
    #[error("integer {value} out of specified range of {bits} bits")]
    IntegerOutOfRange {
        /// Offending value.
        value: u64,
        /// Declared width.
        bits: u32,
    },

    /// A fixed-width integer was declared wider than 64 bits.
    #[error("fixed integers wider than 64 bits are not supported (got {0})")]
    WidthTooLarge(u32),

    /// A variable-width ladder is empty, unordered, or has an invalid step.
    #[error("invalid variable-width ladder: {0}")]
    InvalidLadder(&'static str),

    /// A string codec was used with an alphabet of zero symbols.
    #[error("cannot compress or decompress without symbol definitions")]
    EmptyAlphabet,

    /// A string contains a symbol that is absent from its alphabet.
    #[error("cannot find symbol {0:?} in alphabet")]
    UnknownSymbol(char),

    /// An alphabet span is neither a single symbol nor a two-symbol range.
    #[error("invalid alphabet span {0:?}")]
    InvalidSpan(String),

    /// An `index_of` value is not among the listed options.
    #[error("value is not among the {0} listed options")]
    NotAnOption(usize),

    /// No `select` option matched the value being encoded.
    #[error("no predicate matched")]
    NoPredicateMatched,

    /// A hex string contains a non-hex character.
    #[error("invalid hex string: {0:?}")]
    InvalidHex(String),

    /// A UUID string is not 16 bytes of hex once dashes are removed.
    #[error("not a valid uuid: {0:?}")]
    InvalidUuid(String),

    /// A decoded buffer length cannot be addressed on this platform.
    #[error("buffer length {0} is too large")]
    BufferTooLarge(u64),

    /// A decoded number does not fit the requested primitive type.
    #[error("decoded value does not fit in {0}")]
    Overflow(&'static str),

    /// A schema node received a value of the wrong shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Shape the schema node accepts.
        expected: &'static str,
        /// Shape of the value actually supplied.
        found: &'static str,
    },
}

/// A specialized Result type for packing operations.
pub type Result<T> = std::result::Result<T, Error>;
