// Symbol alphabet: ordered characters eligible for corruption.

use hashbrown::HashMap;

use crate::CoreError;

/// Lowercase ASCII letters, the default corruption alphabet.
pub const LOWERCASE_ASCII: &str = "abcdefghijklmnopqrstuvwxyz";

/// Ordered, index-addressable set of characters.
///
/// Characters keep the order in which they were supplied, so index `i`
/// always names the same symbol. Membership and index lookup are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    /// Symbols in index order.
    symbols: Vec<char>,
    /// Maps a symbol to its index in `symbols`.
    char_to_index: HashMap<char, usize>,
}

impl SymbolSet {
    /// Build an alphabet from an ordered character sequence.
    ///
    /// Duplicate characters are rejected; each symbol must be drawn with the
    /// same weight.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self, CoreError> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        let mut char_to_index = HashMap::with_capacity(symbols.len());
        for (index, &symbol) in symbols.iter().enumerate() {
            if char_to_index.insert(symbol, index).is_some() {
                return Err(CoreError::DuplicateSymbol { symbol, index });
            }
        }
        Ok(Self {
            symbols,
            char_to_index,
        })
    }

    /// Build an alphabet from the characters of a string.
    pub fn from_str_chars(symbols: &str) -> Result<Self, CoreError> {
        Self::new(symbols.chars())
    }

    /// The 26 lowercase ASCII letters.
    pub fn lowercase_ascii() -> Self {
        let symbols: Vec<char> = LOWERCASE_ASCII.chars().collect();
        let char_to_index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            symbols,
            char_to_index,
        }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.char_to_index.contains_key(&c)
    }

    /// Index of `c`, or `None` if it is not in the alphabet.
    #[inline]
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.char_to_index.get(&c).copied()
    }

    /// Symbol at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Map an index into the alphabet with `exclude` removed back to a symbol.
    ///
    /// `index` ranges over `0..len() - 1`. Indices at or past the excluded
    /// symbol's position are shifted by one, which keeps the draw uniform over
    /// the remaining symbols without allocating a filtered copy.
    pub fn get_excluding(&self, exclude: char, index: usize) -> Option<char> {
        match self.index_of(exclude) {
            Some(excluded) if index >= excluded => self.get(index + 1),
            _ => self.get(index),
        }
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::lowercase_ascii()
    }
}
