//! Shared vocabulary for the malaprop workspace.
//!
//! - [`markers`] -- Sentence boundary tokens shared by the decoder and the
//!   language-model oracles
//! - [`alphabet`] -- Ordered, index-addressable symbol set used by the noise
//!   channel
//! - [`logprob`] -- Base-10 log-probability helpers

pub mod alphabet;
pub mod logprob;
pub mod markers;

pub use alphabet::SymbolSet;

/// Error type for shared-type construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("duplicate symbol {symbol:?} in alphabet at index {index}")]
    DuplicateSymbol { symbol: char, index: usize },
}
