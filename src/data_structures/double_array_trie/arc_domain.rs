// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Arc domains: the mapping between key symbols and dense arc codes.
//!
//! A trie never stores symbols in its transition arrays, only codes. Code 0 is
//! reserved for the stop symbol that terminates suffixes in the tail buffer, so
//! every legal key symbol maps to a code in `1..size()`.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use fnv::FnvHashMap;

use super::error::{DatrieError, Result};

/// Symbol ⇄ code mapping consumed by [`Datrie`](super::Datrie).
///
/// Implementations must be a bijection over their declared alphabet, and the
/// stop symbol must never be accepted by [`ArcDomain::code`].
#[cfg_attr(test, mockall::automock(type Symbol = char;))]
pub trait ArcDomain {
    /// The symbol type keys are made of.
    type Symbol: Copy + Eq + Debug;

    /// Converts a symbol into its arc code.
    ///
    /// Fails with [`DatrieError::InvalidSymbol`] for symbols outside the
    /// alphabet, including the stop symbol.
    fn code(&self, symbol: Self::Symbol) -> Result<usize>;

    /// Converts an arc code back into its symbol.
    fn label(&self, code: usize) -> Result<Self::Symbol>;

    /// The sentinel terminating every tail segment.
    fn stop_symbol(&self) -> Self::Symbol;

    /// Number of codes in the domain, stop code included.
    fn size(&self) -> usize;
}

impl<D: ArcDomain + ?Sized> ArcDomain for &D {
    type Symbol = D::Symbol;

    fn code(&self, symbol: Self::Symbol) -> Result<usize> {
        (**self).code(symbol)
    }

    fn label(&self, code: usize) -> Result<Self::Symbol> {
        (**self).label(code)
    }

    fn stop_symbol(&self) -> Self::Symbol {
        (**self).stop_symbol()
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<D: ArcDomain + ?Sized> ArcDomain for Arc<D> {
    type Symbol = D::Symbol;

    fn code(&self, symbol: Self::Symbol) -> Result<usize> {
        (**self).code(symbol)
    }

    fn label(&self, code: usize) -> Result<Self::Symbol> {
        (**self).label(code)
    }

    fn stop_symbol(&self) -> Self::Symbol {
        (**self).stop_symbol()
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Symbols of the default domain, stop symbol first.
const DEFAULT_SYMBOLS: &str = "#abcdefghijklmnopqrstuvwxyz1234567890";

/// An ordered alphabet where a symbol's position is its code.
///
/// Position 0 always holds the stop symbol.
#[derive(Debug, Clone)]
pub struct Alphabet<T> {
    symbols: Vec<T>,
    codes: FnvHashMap<T, usize>,
}

impl<T> Alphabet<T>
where
    T: Copy + Eq + Hash + Debug,
{
    /// Creates an alphabet from a stop symbol and the key symbols in code order.
    ///
    /// # Arguments
    ///
    /// * `stop` - The stop symbol, assigned code 0.
    /// * `symbols` - Key symbols, assigned codes 1, 2, ... in iteration order.
    ///
    /// # Returns
    ///
    /// * `Ok(Alphabet)` - The alphabet.
    /// * `Err(DatrieError::InvalidAlphabet)` - If there are no key symbols, a
    ///   symbol repeats, or the stop symbol appears among the key symbols.
    pub fn new<I>(stop: T, symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut ordered = vec![stop];
        let mut codes = FnvHashMap::default();
        codes.insert(stop, 0);

        for symbol in symbols {
            if codes.contains_key(&symbol) {
                return Err(DatrieError::InvalidAlphabet(format!(
                    "symbol {symbol:?} appears more than once (or is the stop symbol)"
                )));
            }
            codes.insert(symbol, ordered.len());
            ordered.push(symbol);
        }

        if ordered.len() < 2 {
            return Err(DatrieError::InvalidAlphabet(
                "alphabet has no key symbols".to_string(),
            ));
        }

        Ok(Self {
            symbols: ordered,
            codes,
        })
    }

    /// Number of key symbols, excluding the stop symbol.
    pub fn len(&self) -> usize {
        self.symbols.len() - 1
    }

    /// Whether the alphabet has no key symbols. Never true for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key symbols in code order.
    pub fn symbols(&self) -> &[T] {
        &self.symbols[1..]
    }
}

impl Alphabet<char> {
    /// Builds a `char` alphabet from a stop symbol and a string of key symbols.
    pub fn from_str_symbols(stop: char, symbols: &str) -> Result<Self> {
        Self::new(stop, symbols.chars())
    }

    /// `'#'` as the stop symbol, then `a`-`z`, then `1`-`9` and `0`.
    pub fn default_alphanumeric() -> Self {
        let mut chars = DEFAULT_SYMBOLS.chars();
        let stop = chars.next().unwrap_or('#');
        Self::new(stop, chars).unwrap_or_else(|_| unreachable!("default symbols are distinct"))
    }
}

impl Alphabet<u8> {
    /// Byte counterpart of [`Alphabet::default_alphanumeric`].
    pub fn default_alphanumeric_bytes() -> Self {
        let bytes = DEFAULT_SYMBOLS.as_bytes();
        Self::new(bytes[0], bytes[1..].iter().copied())
            .unwrap_or_else(|_| unreachable!("default symbols are distinct"))
    }
}

impl<T> ArcDomain for Alphabet<T>
where
    T: Copy + Eq + Hash + Debug,
{
    type Symbol = T;

    fn code(&self, symbol: T) -> Result<usize> {
        match self.codes.get(&symbol) {
            Some(&code) if code != 0 => Ok(code),
            _ => Err(DatrieError::invalid_symbol(symbol)),
        }
    }

    fn label(&self, code: usize) -> Result<T> {
        self.symbols
            .get(code)
            .copied()
            .ok_or(DatrieError::InvalidCode(code))
    }

    fn stop_symbol(&self) -> T {
        self.symbols[0]
    }

    fn size(&self) -> usize {
        self.symbols.len()
    }
}
