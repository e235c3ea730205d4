//! Damerau-Levenshtein noise channel.
//!
//! Reads clean text one character at a time and emits a corrupted copy,
//! injecting substitutions, insertions, deletions and transpositions at the
//! rates given by an [`ErrorDistribution`]. It is the generative counterpart
//! of the `malaprop-correct` decoder and is used to synthesise evaluation data.
//!
//! # Architecture
//!
//! - [`distribution`] -- Validated categorical distribution over edit kinds
//! - [`random`] -- Random capability (uniform float + choose-one-of-N)
//! - [`slot`] -- Single-character delay buffer
//! - [`sink`] -- Append-only character output
//! - [`stats`] -- Per-instance running counters
//! - [`channel`] -- The stream transducer tying these together

pub mod channel;
pub mod distribution;
pub mod random;
pub mod sink;
pub mod slot;
pub mod stats;

pub use channel::{NoiseChannel, Unit};
pub use distribution::{ErrorDistribution, ErrorKind};
pub use random::{RandomSource, RngSource, SeededSource};
pub use sink::CharSink;
pub use stats::ChannelStats;

/// Tolerance for the five error probabilities summing to one.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Error type for channel configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    #[error("error probabilities sum to {sum}, expected 1 within {SUM_TOLERANCE}")]
    SumOutOfTolerance { sum: f64 },
    #[error("probability for {kind} must be finite and non-negative, got {value}")]
    InvalidProbability { kind: ErrorKind, value: f64 },
    #[error("alphabet of {size} symbol(s) cannot support {kind} errors")]
    AlphabetTooSmall { kind: ErrorKind, size: usize },
}
