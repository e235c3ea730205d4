// Per-position path table shared by both strategies.

use malaprop_core::markers::{SENTENCE_START, TRAILING_END_MARKERS};

use super::Decoded;
use crate::DecodeError;
use crate::beam::{Beam, Scored};
use crate::state::StateKey;

/// Words chosen so far on the best path into a state.
pub(super) type Backtrace = Vec<String>;

/// Surviving states at one sentence position, each with its best score and
/// backtrace. Rebuilt at every position.
#[derive(Debug)]
pub(super) struct PathTable {
    entries: Vec<Scored<Backtrace>>,
}

impl PathTable {
    /// The table before the first word: a single `(<s>, <s>)` state with an
    /// empty backtrace.
    pub fn start() -> Self {
        Self {
            entries: vec![Scored {
                score: 0.0,
                key: StateKey::new(SENTENCE_START, SENTENCE_START),
                value: Vec::new(),
            }],
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn from_beam(beam: Beam<Backtrace>) -> Self {
        Self {
            entries: beam.into_sorted_vec(),
        }
    }

    pub fn entries(&self) -> &[Scored<Backtrace>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, score: f64, key: StateKey, backtrace: Backtrace) {
        self.entries.push(Scored {
            score,
            key,
            value: backtrace,
        });
    }

    /// Consume the table and build the result from its best state.
    pub fn finish(self) -> Result<Decoded, DecodeError> {
        let best = self
            .entries
            .into_iter()
            .max()
            .ok_or(DecodeError::NoSurvivingPath)?;
        let mut words = best.value;
        words.truncate(words.len().saturating_sub(TRAILING_END_MARKERS));
        Ok(Decoded {
            words,
            log_probability: best.score,
        })
    }
}

/// Extend `prior`'s backtrace by one word.
pub(super) fn extend(prior: &Backtrace, word: &str) -> Backtrace {
    let mut next = Vec::with_capacity(prior.len() + 1);
    next.extend_from_slice(prior);
    next.push(word.to_string());
    next
}

/// Index of the best-scoring predecessor among `scores`.
///
/// Each item is `(prior index, path score through that prior)`. Ties go to
/// the prior with the smaller state key.
pub(super) fn best_predecessor(
    table: &PathTable,
    scores: impl IntoIterator<Item = (usize, f64)>,
) -> Option<(usize, f64)> {
    let entries = table.entries();
    scores.into_iter().reduce(|best, next| {
        let ordering = crate::state::rank(
            next.1,
            &entries[next.0].key,
            best.1,
            &entries[best.0].key,
        );
        if ordering.is_gt() { next } else { best }
    })
}
