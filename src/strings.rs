//! Strings over a restricted alphabet.
//!
//! A string is packed as its symbol count (a variable-width integer) followed
//! by one digit per symbol, in radix `alphabet.len()`. A one-symbol alphabet
//! needs no per-symbol digits at all: the count says everything.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sequence::{Encoder, Reader};

/// Sorted set of permitted symbols with a symbol to index lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from every symbol of `symbols`.
    ///
    /// Symbols are ordered by scalar value; duplicates collapse.
    pub fn new(symbols: &str) -> Self {
        Self::from_chars(symbols.chars())
    }

    /// Build an alphabet from spans such as `["09", "az", "-"]`.
    ///
    /// A one-symbol span stands for itself; a two-symbol span is the
    /// inclusive range between them.
    ///
    /// # Errors
    /// Returns `Error::InvalidSpan` for an empty span, a span longer than two
    /// symbols, or a reversed range.
    pub fn from_spans<S: AsRef<str>>(spans: &[S]) -> Result<Self> {
        Ok(Self::from_chars(expand_spans(spans)?))
    }

    fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut symbols: Vec<char> = chars.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Index of `symbol`, if present.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// Symbol at `index`, if in range.
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }
}

fn expand_spans<S: AsRef<str>>(spans: &[S]) -> Result<Vec<char>> {
    let mut out = Vec::new();
    for span in spans {
        let span = span.as_ref();
        let mut chars = span.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(c), None, _) => out.push(c),
            (Some(first), Some(last), None) if first <= last => out.extend(first..=last),
            _ => return Err(Error::InvalidSpan(span.to_owned())),
        }
    }
    Ok(out)
}

/// Cache key: the literal symbol string, or the list of spans.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum AlphabetKey {
    Literal(String),
    Spans(Vec<String>),
}

/// Memo of built alphabets, owned by whoever packs strings.
///
/// Repeated lookups of the same definition return the same shared
/// [`Alphabet`] without sorting again.
#[derive(Debug, Default)]
pub struct AlphabetCache {
    entries: HashMap<AlphabetKey, Arc<Alphabet>>,
}

impl AlphabetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alphabet for the literal symbol set `symbols`.
    pub fn literal(&mut self, symbols: &str) -> Arc<Alphabet> {
        let key = AlphabetKey::Literal(symbols.to_owned());
        if let Some(alphabet) = self.entries.get(&key) {
            return Arc::clone(alphabet);
        }
        let alphabet = Arc::new(Alphabet::new(symbols));
        tracing::debug!(symbols = alphabet.len(), "built literal alphabet");
        self.entries.insert(key, Arc::clone(&alphabet));
        alphabet
    }

    /// Alphabet for the span list `spans`.
    pub fn spans<S: AsRef<str>>(&mut self, spans: &[S]) -> Result<Arc<Alphabet>> {
        let key = AlphabetKey::Spans(spans.iter().map(|s| s.as_ref().to_owned()).collect());
        if let Some(alphabet) = self.entries.get(&key) {
            return Ok(Arc::clone(alphabet));
        }
        let alphabet = Arc::new(Alphabet::from_spans(spans)?);
        tracing::debug!(symbols = alphabet.len(), "built span alphabet");
        self.entries.insert(key, Arc::clone(&alphabet));
        Ok(alphabet)
    }

    /// Number of cached alphabets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached alphabet.
    pub fn clear(&mut self) {
        tracing::debug!(evicted = self.entries.len(), "cleared alphabet cache");
        self.entries.clear();
    }
}

impl Encoder {
    /// Append `value`, every symbol of which must belong to `alphabet`.
    ///
    /// Nothing is appended when the string is rejected.
    ///
    /// # Errors
    /// Returns `Error::EmptyAlphabet` for an alphabet without symbols and
    /// `Error::UnknownSymbol` for the first symbol missing from it.
    pub fn string(&mut self, value: &str, alphabet: &Alphabet) -> Result<&mut Self> {
        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        let indices = value
            .chars()
            .map(|c| alphabet.index_of(c).ok_or(Error::UnknownSymbol(c)))
            .collect::<Result<Vec<_>>>()?;
        self.vint(indices.len() as u64)?;
        if alphabet.len() > 1 {
            let radix = alphabet.len() as u64;
            for idx in indices {
                self.append(idx as u64, radix)?;
            }
        }
        Ok(self)
    }
}

impl Reader {
    /// Read a string over `alphabet`.
    ///
    /// # Errors
    /// Returns `Error::EmptyAlphabet` for an alphabet without symbols.
    pub fn string(&mut self, alphabet: &Alphabet) -> Result<String> {
        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        let count = self.vint()?;
        let count = usize::try_from(count).map_err(|_| Error::Overflow("usize"))?;
        if let [only] = alphabet.symbols() {
            return Ok(std::iter::repeat(*only).take(count).collect());
        }
        let radix = alphabet.len() as u64;
        let mut out = String::with_capacity(count);
        for _ in 0..count {
            let idx = self.extract_u64(radix)? as usize;
            // idx < radix, so the lookup always succeeds.
            out.extend(alphabet.symbol(idx));
        }
        Ok(out)
    }
}
