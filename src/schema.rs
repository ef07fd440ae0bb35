//! Schema combinators for composing message formats.
//!
//! A [`Schema`] describes how a [`Value`] maps onto digits. Records pack their
//! fields in declaration order; selects pack the index of the first matching
//! option followed by that option's payload. Neither producer nor consumer
//! checks the schema on the wire, so both sides must hold the same one.
//!
//! ```
//! use radixpack::schema::{Choice, Matcher, Primitive, Schema};
//! use radixpack::Value;
//!
//! let port = Schema::Primitive(Primitive::FixedInt(16));
//! let host = Schema::select(vec![
//!     Choice::literal("127.0.0.1"),
//!     Choice::coded(Matcher::Any, Schema::string("abcdefghijklmnopqrstuvwxyz.-")),
//! ]);
//! let schema = Schema::record([("host", host), ("port", port)]);
//!
//! let value = Value::record([("host", Value::from("127.0.0.1")), ("port", Value::UInt(8734))]);
//! let bytes = schema.pack(&value)?;
//! assert_eq!(schema.unpack(&bytes)?, value);
//! # Ok::<(), radixpack::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Error, Result};
use crate::sequence::{Encoder, Reader};
use crate::strings::Alphabet;
use crate::value::Value;

/// Anything that can append a value's digits and read them back.
pub trait Codec {
    /// Type of the values handled.
    type Value;

    /// Append the digits of `value`.
    fn encode(&self, value: &Self::Value, encoder: &mut Encoder) -> Result<()>;

    /// Read a value back, consuming the same digits `encode` produced.
    fn decode(&self, reader: &mut Reader) -> Result<Self::Value>;
}

/// Leaf schema nodes, one per primitive codec.
#[derive(Clone, Debug)]
pub enum Primitive {
    /// A bit, as [`Value::Bool`].
    Bit,
    /// A digit of the given radix, as [`Value::UInt`].
    Fraction(u64),
    /// An unsigned integer of the given width.
    FixedInt(u32),
    /// A sign followed by a magnitude of the given width, as [`Value::Int`].
    SignedFixedInt(u32),
    /// An unsigned variable-width integer.
    VarInt,
    /// A sign followed by a variable-width magnitude.
    SignedVarInt,
    /// One of a fixed list of values.
    IndexOf(Vec<Value>),
    /// A string over an alphabet.
    String(Arc<Alphabet>),
    /// A buffer of known length.
    Buffer(usize),
    /// A length-prefixed buffer.
    VarBuffer,
    /// A hex string.
    Hex,
    /// A dashed UUID string.
    Uuid,
}

/// Test deciding whether a select option applies to a value.
#[derive(Clone)]
pub enum Matcher {
    /// Matches every value.
    Any,
    /// Matches values equal to this one.
    Equals(Value),
    /// Matches strings the pattern finds a match in.
    Pattern(Regex),
    /// Matches values the predicate accepts.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Matcher {
    /// Build a predicate matcher.
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Predicate(Arc::new(f))
    }

    /// Whether `value` satisfies this matcher.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Equals(expected) => expected == value,
            Matcher::Pattern(pattern) => value.as_str().is_some_and(|s| pattern.is_match(s)),
            Matcher::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any => f.write_str("Any"),
            Matcher::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Matcher::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One option of a select.
#[derive(Clone, Debug)]
pub enum Choice {
    /// Matches exactly this value and packs no payload.
    Literal(Value),
    /// Matches per `matcher` and packs the value with `schema`.
    Coded {
        /// Test for this option.
        matcher: Matcher,
        /// Payload codec.
        schema: Schema,
    },
}

impl Choice {
    /// Option for a single known value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Choice::Literal(value.into())
    }

    /// Option with a payload.
    pub fn coded(matcher: Matcher, schema: Schema) -> Self {
        Choice::Coded { matcher, schema }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Choice::Literal(literal) => literal == value,
            Choice::Coded { matcher, .. } => matcher.matches(value),
        }
    }
}

/// A node of a message schema.
#[derive(Clone)]
pub enum Schema {
    /// A single primitive codec.
    Primitive(Primitive),
    /// Named fields packed in declaration order.
    Record(Vec<(String, Schema)>),
    /// The first matching option wins; its index goes on the wire.
    Select(Vec<Choice>),
    /// One bit telling whether the value equals `literal`; otherwise
    /// followed by `fallback`.
    DefaultLiteral {
        /// Expected value, packed as a single zero bit.
        literal: Value,
        /// Codec for every other value.
        fallback: Box<Schema>,
    },
    /// A caller-supplied codec.
    Custom(Arc<dyn Codec<Value = Value> + Send + Sync>),
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            Schema::Record(fields) => f.debug_tuple("Record").field(fields).finish(),
            Schema::Select(choices) => f.debug_tuple("Select").field(choices).finish(),
            Schema::DefaultLiteral { literal, fallback } => f
                .debug_struct("DefaultLiteral")
                .field("literal", literal)
                .field("fallback", fallback)
                .finish(),
            Schema::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Schema {
    /// Record of `(name, schema)` fields.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Schema::Record(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Select over `choices`.
    pub fn select(choices: Vec<Choice>) -> Self {
        Schema::Select(choices)
    }

    /// `literal`, or anything else packed with `fallback`.
    pub fn default_literal(literal: impl Into<Value>, fallback: Schema) -> Self {
        Schema::DefaultLiteral {
            literal: literal.into(),
            fallback: Box::new(fallback),
        }
    }

    /// String over the literal symbol set `symbols`.
    pub fn string(symbols: &str) -> Self {
        Schema::Primitive(Primitive::String(Arc::new(Alphabet::new(symbols))))
    }

    /// Wrap a caller-supplied codec.
    pub fn custom(codec: impl Codec<Value = Value> + Send + Sync + 'static) -> Self {
        Schema::Custom(Arc::new(codec))
    }

    /// Pack `value` into bytes.
    pub fn pack(&self, value: &Value) -> Result<Vec<u8>> {
        let mut encoder = Encoder::new();
        self.encode(value, &mut encoder)?;
        Ok(encoder.finish())
    }

    /// Unpack a value from bytes.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Value> {
        self.decode(&mut Reader::from_bytes(bytes))
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

fn expect_uint(value: &Value) -> Result<u64> {
    match *value {
        Value::UInt(v) => Ok(v),
        Value::Int(v) if v >= 0 => Ok(v as u64),
        Value::Int(_) => Err(Error::Negative),
        _ => Err(mismatch("unsigned integer", value)),
    }
}

fn expect_int(value: &Value) -> Result<i64> {
    match *value {
        Value::Int(v) => Ok(v),
        Value::UInt(v) => i64::try_from(v).map_err(|_| Error::Overflow("i64")),
        _ => Err(mismatch("integer", value)),
    }
}

fn expect_str(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| mismatch("string", value))
}

fn expect_bytes(value: &Value) -> Result<&[u8]> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(mismatch("bytes", value)),
    }
}

impl Codec for Primitive {
    type Value = Value;

    fn encode(&self, value: &Value, encoder: &mut Encoder) -> Result<()> {
        let appended = match self {
            Primitive::Bit => match *value {
                Value::Bool(b) => encoder.bit(b),
                _ => Err(mismatch("bool", value)),
            },
            Primitive::Fraction(radix) => encoder.fraction(expect_uint(value)?, *radix),
            Primitive::FixedInt(bits) => encoder.fixed_int(expect_uint(value)?, *bits),
            Primitive::SignedFixedInt(bits) => encoder.signed_fixed_int(expect_int(value)?, *bits),
            Primitive::VarInt => encoder.vint(expect_uint(value)?),
            Primitive::SignedVarInt => encoder.svint(expect_int(value)?),
            Primitive::IndexOf(values) => encoder.index_of(value, values.as_slice()),
            Primitive::String(alphabet) => encoder.string(expect_str(value)?, alphabet),
            Primitive::Buffer(len) => {
                let bytes = expect_bytes(value)?;
                if bytes.len() != *len {
                    return Err(Error::TypeMismatch {
                        expected: "buffer of the declared length",
                        found: "buffer of another length",
                    });
                }
                encoder.buffer(bytes)
            }
            Primitive::VarBuffer => encoder.vbuffer(expect_bytes(value)?),
            Primitive::Hex => encoder.hex(expect_str(value)?),
            Primitive::Uuid => encoder.uuid(expect_str(value)?),
        };
        appended.map(|_| ())
    }

    fn decode(&self, reader: &mut Reader) -> Result<Value> {
        Ok(match self {
            Primitive::Bit => Value::Bool(reader.bit()?),
            Primitive::Fraction(radix) => Value::UInt(reader.fraction(*radix)?),
            Primitive::FixedInt(bits) => Value::UInt(reader.fixed_int(*bits)?),
            Primitive::SignedFixedInt(bits) => Value::Int(reader.signed_fixed_int(*bits)?),
            Primitive::VarInt => Value::UInt(reader.vint()?),
            Primitive::SignedVarInt => Value::Int(reader.svint()?),
            Primitive::IndexOf(values) => reader.index(values.as_slice())?.clone(),
            Primitive::String(alphabet) => Value::Str(reader.string(alphabet)?),
            Primitive::Buffer(len) => Value::Bytes(reader.buffer(*len)?),
            Primitive::VarBuffer => Value::Bytes(reader.vbuffer()?),
            Primitive::Hex => Value::Str(reader.hex()?),
            Primitive::Uuid => Value::Str(reader.uuid()?),
        })
    }
}

impl Codec for Schema {
    type Value = Value;

    fn encode(&self, value: &Value, encoder: &mut Encoder) -> Result<()> {
        match self {
            Schema::Primitive(p) => p.encode(value, encoder),
            Schema::Record(fields) => {
                if !matches!(value, Value::Record(_) | Value::Absent) {
                    return Err(mismatch("record", value));
                }
                for (name, schema) in fields {
                    let field = value.field(name).unwrap_or(&Value::Absent);
                    schema.encode(field, encoder)?;
                }
                Ok(())
            }
            Schema::Select(choices) => {
                let idx = choices
                    .iter()
                    .position(|c| c.matches(value))
                    .ok_or(Error::NoPredicateMatched)?;
                tracing::trace!(option = idx, options = choices.len(), "selected option");
                encoder.append(idx as u64, choices.len() as u64)?;
                match &choices[idx] {
                    Choice::Literal(_) => Ok(()),
                    Choice::Coded { schema, .. } => schema.encode(value, encoder),
                }
            }
            Schema::DefaultLiteral { literal, fallback } => {
                let is_other = value != literal;
                encoder.bit(is_other)?;
                if is_other {
                    fallback.encode(value, encoder)?;
                }
                Ok(())
            }
            Schema::Custom(codec) => codec.encode(value, encoder),
        }
    }

    fn decode(&self, reader: &mut Reader) -> Result<Value> {
        match self {
            Schema::Primitive(p) => p.decode(reader),
            Schema::Record(fields) => {
                let mut out = IndexMap::with_capacity(fields.len());
                for (name, schema) in fields {
                    out.insert(name.clone(), schema.decode(reader)?);
                }
                Ok(Value::Record(out))
            }
            Schema::Select(choices) => match reader.index(choices.as_slice())? {
                Choice::Literal(literal) => Ok(literal.clone()),
                Choice::Coded { schema, .. } => schema.decode(reader),
            },
            Schema::DefaultLiteral { literal, fallback } => {
                if reader.bit()? {
                    fallback.decode(reader)
                } else {
                    Ok(literal.clone())
                }
            }
            Schema::Custom(codec) => codec.decode(reader),
        }
    }
}
