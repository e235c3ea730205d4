// Decoder state key: a word pair.

use std::cmp::Ordering;
use std::fmt;

use malaprop_core::logprob::compare_scores;

/// A decoder state: the hypothesised word at a position, together with the
/// word before it.
///
/// In the bigram-state strategy `context` is the previously chosen word; in
/// the trigram-state strategy the pair is the two-word context for the next
/// transition. Either way, the ordering is lexicographic on
/// `(context, word)` and is the tie-break used whenever two states score the
/// same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    context: String,
    word: String,
}

impl StateKey {
    pub fn new(context: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            word: word.into(),
        }
    }

    /// The word preceding [`word`](Self::word).
    #[inline]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The hypothesised word at the current position.
    #[inline]
    pub fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.context, self.word)
    }
}

/// Rank two scored states. `Greater` means `a` is preferred.
///
/// Higher score wins; on equal scores the lexicographically smaller key wins.
pub fn rank(a_score: f64, a_key: &StateKey, b_score: f64, b_key: &StateKey) -> Ordering {
    compare_scores(a_score, b_score).then_with(|| b_key.cmp(a_key))
}
