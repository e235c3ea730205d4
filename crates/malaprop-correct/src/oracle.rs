// Oracle capabilities queried by the decoder.
//
// The decoder never trains or estimates anything itself: every probability
// comes from a `LanguageModel` and every spelling alternative from a
// `ConfusionSets` implementation. Both are read-only, so one oracle can serve
// many decoders on different threads.

use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;

/// Failure reported by an oracle. Passed through to the caller unchanged.
#[derive(Debug, thiserror::Error)]
#[error("oracle query failed: {source}")]
pub struct OracleError {
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

impl OracleError {
    pub fn new<E: Into<Box<dyn Error + Send + Sync>>>(source: E) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Trigram language model with back-off weights.
///
/// All values are base-10 logarithms.
pub trait LanguageModel {
    /// `log10 P(c | a b)`.
    ///
    /// Implementations are not required to support order-reduced queries at
    /// sentence boundaries; callers rewrite `(a, </s>, </s>)` to
    /// `(</s>, a, </s>)` before asking (see [`crate::model::NoisyChannelModel::transition`]).
    fn trigram_probability(&self, a: &str, b: &str, c: &str) -> Result<f64, OracleError>;

    /// Back-off weight of the unigram `word`.
    fn unigram_backoff(&self, word: &str) -> Result<f64, OracleError>;

    /// Back-off weight of the bigram `a b`.
    fn bigram_backoff(&self, a: &str, b: &str) -> Result<f64, OracleError>;

    /// Whether the model contains the bigram `a b`.
    fn in_bigrams(&self, a: &str, b: &str) -> Result<bool, OracleError>;
}

/// Spelling alternatives for a word.
pub trait ConfusionSets {
    /// Candidate spellings for `word`, in a stable order, excluding `word`.
    fn confusion_set(&self, word: &str) -> Result<Vec<String>, OracleError>;

    /// Size of the confusion set of `word`.
    fn confusion_set_size(&self, word: &str) -> Result<usize, OracleError> {
        Ok(self.confusion_set(word)?.len())
    }
}

macro_rules! forward_oracles {
    ($($ptr:ty),*) => {$(
        impl<T: LanguageModel + ?Sized> LanguageModel for $ptr {
            fn trigram_probability(&self, a: &str, b: &str, c: &str) -> Result<f64, OracleError> {
                (**self).trigram_probability(a, b, c)
            }
            fn unigram_backoff(&self, word: &str) -> Result<f64, OracleError> {
                (**self).unigram_backoff(word)
            }
            fn bigram_backoff(&self, a: &str, b: &str) -> Result<f64, OracleError> {
                (**self).bigram_backoff(a, b)
            }
            fn in_bigrams(&self, a: &str, b: &str) -> Result<bool, OracleError> {
                (**self).in_bigrams(a, b)
            }
        }

        impl<T: ConfusionSets + ?Sized> ConfusionSets for $ptr {
            fn confusion_set(&self, word: &str) -> Result<Vec<String>, OracleError> {
                (**self).confusion_set(word)
            }
            fn confusion_set_size(&self, word: &str) -> Result<usize, OracleError> {
                (**self).confusion_set_size(word)
            }
        }
    )*};
}

forward_oracles!(&T, Box<T>, Rc<T>, Arc<T>);
