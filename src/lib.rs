//! # Mixed-radix packing
//!
//! *Many small bounded values, one big integer, the fewest bytes.*
//!
//! ## Intuition First
//!
//! A decimal number is a stack of places that all have radix 10. Nothing
//! forces every place to share a radix: a clock packs seconds (radix 60),
//! minutes (radix 60) and hours (radix 24) into one count of seconds. If each
//! field of a message has a known range, the whole message can be packed the
//! same way, and the result is within a byte of the information-theoretic
//! minimum for uniformly distributed fields.
//!
//! ## Formulation
//!
//! Each field contributes a digit `(n, d)` with `0 <= n < d`. Digits are folded
//! first to last:
//!
//! ```text
//! value      <- value + n * multiplier
//! multiplier <- multiplier * d
//! ```
//!
//! and unfolded in the same order with `n = value mod d; value = value div d`.
//! The packed value is written as a minimal big-endian buffer.
//!
//! ## Properties
//!
//! - **Zero-extension**: reading more digits than were written yields zeros,
//!   so trailing zero fields cost no bytes and may be dropped altogether.
//! - **No self-description**: the buffer has no tags or lengths. Producer and
//!   consumer must request the same radixes in the same order.
//! - **Unbounded**: the packed value is an arbitrary-precision natural; there
//!   is no wraparound.
//!
//! ## Layers
//!
//! - [`sequence`]: [`Encoder`] and [`Reader`], the digit state machines.
//! - [`wire`]: minimal byte serialization of the packed value.
//! - [`ints`], [`strings`], [`raw`]: primitive codecs as encoder and reader methods.
//! - [`schema`]: records, selects and default literals over dynamic [`Value`]s.
//!
//! ```
//! use radixpack::{Encoder, Reader};
//!
//! let mut encoder = Encoder::new();
//! encoder.fraction(1, 300)?.vint(181)?.bit(true)?;
//! let bytes = encoder.finish();
//!
//! let mut reader = Reader::from_bytes(&bytes);
//! assert_eq!(reader.fraction(300)?, 1);
//! assert_eq!(reader.vint()?, 181);
//! assert!(reader.bit()?);
//! // Nothing more was written, so everything reads as zero.
//! assert_eq!(reader.fraction(7)?, 0);
//! # Ok::<(), radixpack::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ints;
pub mod raw;
pub mod schema;
pub mod sequence;
pub mod strings;
pub mod value;
pub mod wire;

pub use error::{Error, Result};
pub use ints::VarIntLadder;
pub use malachite::Natural;
pub use schema::{Choice, Codec, Matcher, Primitive, Schema};
pub use sequence::{encode_digits, Digit, Encoder, Reader};
pub use strings::{Alphabet, AlphabetCache};
pub use value::Value;
