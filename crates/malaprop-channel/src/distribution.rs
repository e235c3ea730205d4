// Categorical distribution over channel edit operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ChannelError, SUM_TOLERANCE};

/// One outcome of the channel for a single input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Pass the unit through unchanged.
    NoOp,
    /// Replace the character with a different alphabet symbol.
    Substitution,
    /// Emit a random alphabet symbol before the unit.
    Insertion,
    /// Drop the unit.
    Deletion,
    /// Swap the unit with the buffered character.
    Transposition,
}

impl ErrorKind {
    /// Whether this outcome alters the text.
    pub fn is_error(self) -> bool {
        self != ErrorKind::NoOp
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NoOp => "no-op",
            ErrorKind::Substitution => "substitution",
            ErrorKind::Insertion => "insertion",
            ErrorKind::Deletion => "deletion",
            ErrorKind::Transposition => "transposition",
        };
        f.write_str(name)
    }
}

/// Probabilities of the five channel outcomes.
///
/// Immutable once built. Construction rejects any distribution whose sum
/// deviates from one by [`SUM_TOLERANCE`] or more; it never renormalises.
///
/// Sampling walks the cumulative distribution in the fixed order no-op,
/// substitution, insertion, deletion, transposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution")]
pub struct ErrorDistribution {
    no_op: f64,
    substitution: f64,
    insertion: f64,
    transposition: f64,
    deletion: f64,
}

/// Unvalidated form used by serde.
#[derive(Deserialize)]
struct RawDistribution {
    no_op: f64,
    substitution: f64,
    insertion: f64,
    transposition: f64,
    deletion: f64,
}

impl TryFrom<RawDistribution> for ErrorDistribution {
    type Error = ChannelError;

    fn try_from(raw: RawDistribution) -> Result<Self, Self::Error> {
        Self::new(
            raw.no_op,
            raw.substitution,
            raw.insertion,
            raw.transposition,
            raw.deletion,
        )
    }
}

impl ErrorDistribution {
    /// Build a validated distribution.
    pub fn new(
        no_op: f64,
        substitution: f64,
        insertion: f64,
        transposition: f64,
        deletion: f64,
    ) -> Result<Self, ChannelError> {
        let entries = [
            (ErrorKind::NoOp, no_op),
            (ErrorKind::Substitution, substitution),
            (ErrorKind::Insertion, insertion),
            (ErrorKind::Transposition, transposition),
            (ErrorKind::Deletion, deletion),
        ];
        for (kind, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(ChannelError::InvalidProbability { kind, value });
            }
        }
        let sum: f64 = entries.iter().map(|(_, p)| p).sum();
        if (1.0 - sum).abs() >= SUM_TOLERANCE {
            return Err(ChannelError::SumOutOfTolerance { sum });
        }
        Ok(Self {
            no_op,
            substitution,
            insertion,
            transposition,
            deletion,
        })
    }

    /// A channel that never alters its input.
    pub fn identity() -> Self {
        Self {
            no_op: 1.0,
            substitution: 0.0,
            insertion: 0.0,
            transposition: 0.0,
            deletion: 0.0,
        }
    }

    /// Spread `error_rate` evenly over the four error kinds.
    pub fn uniform_errors(error_rate: f64) -> Result<Self, ChannelError> {
        let each = error_rate / 4.0;
        Self::new(1.0 - error_rate, each, each, each, each)
    }

    /// Probability of a single outcome.
    pub fn probability(&self, kind: ErrorKind) -> f64 {
        match kind {
            ErrorKind::NoOp => self.no_op,
            ErrorKind::Substitution => self.substitution,
            ErrorKind::Insertion => self.insertion,
            ErrorKind::Deletion => self.deletion,
            ErrorKind::Transposition => self.transposition,
        }
    }

    /// Map a uniform draw in `[0, 1)` to an outcome.
    ///
    /// The draw is scaled by the actual sum of the probabilities, so an
    /// outcome with probability zero is never returned.
    pub fn sample(&self, u: f64) -> ErrorKind {
        let buckets = [
            (ErrorKind::NoOp, self.no_op),
            (ErrorKind::Substitution, self.substitution),
            (ErrorKind::Insertion, self.insertion),
            (ErrorKind::Deletion, self.deletion),
            (ErrorKind::Transposition, self.transposition),
        ];
        let total: f64 = buckets.iter().map(|(_, p)| p).sum();
        let u = u * total;
        let mut threshold = 0.0;
        let mut last = ErrorKind::NoOp;
        for (kind, p) in buckets {
            if p <= 0.0 {
                continue;
            }
            threshold += p;
            if u < threshold {
                return kind;
            }
            last = kind;
        }
        // Rounding can leave `u` at the top edge.
        last
    }
}

impl Default for ErrorDistribution {
    fn default() -> Self {
        Self::identity()
    }
}
