//! Noisy-channel spelling normalisation.
//!
//! Given an observed sentence that may contain misspellings, finds the most
//! probable sequence of intended words under a trigram language model and a
//! uniform error model over per-word confusion sets.
//!
//! # Architecture
//!
//! - [`oracle`] -- Language-model and confusion-set capabilities the decoder
//!   queries
//! - [`model`] -- Transition and emission scoring over the oracles
//! - [`state`] -- Composite word-pair state key
//! - [`beam`] -- Bounded top-K selection with a deterministic tie-break
//! - [`decoder`] -- `Decoder` capability with bigram-state and trigram-state
//!   Viterbi strategies
//! - [`ngram`] -- In-memory back-off n-gram table (ARPA loader)
//! - [`confusion`] -- In-memory confusion table (JSON loader)
//! - [`batch`] -- Parallel sentence-level decoding

pub mod batch;
pub mod beam;
pub mod confusion;
pub mod decoder;
pub mod model;
pub mod ngram;
pub mod oracle;
pub mod state;

pub use batch::decode_batch;
pub use confusion::ConfusionTable;
pub use decoder::{
    BigramDecoder, Decoded, Decoder, DecoderConfig, SequenceDecoder, Strategy, TrigramDecoder,
};
pub use model::{EmissionModel, NoisyChannelModel};
pub use ngram::NgramTable;
pub use oracle::{ConfusionSets, LanguageModel, OracleError};
pub use state::StateKey;

/// Error type for decoder construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The trigram-state strategy was selected without a beam width.
    #[error("trigram-state decoding requires a beam width")]
    MissingBeamWidth,
    #[error("beam width must be at least 1")]
    ZeroBeamWidth,
    #[error("error rate must lie in [0, 1], got {0}")]
    ErrorRateOutOfRange(f64),
    #[error("surprise margin must be finite and positive, got {0}")]
    InvalidSurpriseMargin(f64),
}

/// Error type for decoding a sentence.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("cannot decode an empty sentence")]
    EmptySentence,
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// A search step left no state alive. Every step keeps at least the
    /// observed word, so this indicates a decoder bug.
    #[error("no path survived decoding")]
    NoSurvivingPath,
}

/// Error type for loading in-memory oracle tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ARPA line {line}: {message}")]
    Arpa { line: usize, message: String },
}
