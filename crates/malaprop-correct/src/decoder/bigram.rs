// Bigram-state Viterbi with surprise-triggered expansion.

use malaprop_core::markers::pad_sentence;
use tracing::{debug, trace};

use super::path::{PathTable, best_predecessor, extend};
use super::{Decoded, Decoder, validate_margin};
use crate::model::NoisyChannelModel;
use crate::oracle::{ConfusionSets, LanguageModel, OracleError};
use crate::state::StateKey;
use crate::{ConfigError, DecodeError};

/// Viterbi over `(previous word, word)` states that only considers spelling
/// variants where the observed word surprises the language model.
///
/// At each position the observed word is scored against every surviving
/// state. A prior state `(a, b)` is *suspicious* when
/// `log10 P(observed | a b)` falls below `backoff(a, b) - log10(margin)`,
/// where `backoff` is the bigram back-off weight if `a b` is a known bigram
/// and the unigram back-off weight of `b` otherwise. Variants of the
/// observed word are scored only against suspicious priors. Each candidate
/// word keeps only its best predecessor, so a position holds at most one
/// state per candidate.
#[derive(Debug, Clone)]
pub struct BigramDecoder<L, C> {
    model: NoisyChannelModel<L, C>,
    log_margin: Option<f64>,
}

impl<L: LanguageModel, C: ConfusionSets> BigramDecoder<L, C> {
    /// `surprise_margin` of `None` never expands; the decoder then returns
    /// the observed sentence unchanged.
    pub fn new(
        model: NoisyChannelModel<L, C>,
        surprise_margin: Option<f64>,
    ) -> Result<Self, ConfigError> {
        validate_margin(surprise_margin)?;
        Ok(Self {
            model,
            log_margin: surprise_margin.map(f64::log10),
        })
    }

    pub fn model(&self) -> &NoisyChannelModel<L, C> {
        &self.model
    }

    /// Linear surprise margin, if expansion is enabled.
    pub fn surprise_margin(&self) -> Option<f64> {
        self.log_margin.map(|m| 10f64.powf(m))
    }

    /// Log10 score below which a continuation of `a b` is surprising.
    pub fn surprise_threshold(
        &self,
        a: &str,
        b: &str,
        log_margin: f64,
    ) -> Result<f64, OracleError> {
        let lm = self.model.language_model();
        let backoff = if lm.in_bigrams(a, b)? {
            lm.bigram_backoff(a, b)?
        } else {
            lm.unigram_backoff(b)?
        };
        Ok(backoff - log_margin)
    }

    fn step(&self, prior: &PathTable, observed: &str) -> Result<PathTable, OracleError> {
        // Transitions into the observed word double as the surprise test.
        let mut to_observed = Vec::with_capacity(prior.len());
        let mut suspicious = Vec::new();
        for (i, entry) in prior.entries().iter().enumerate() {
            let (a, b) = (entry.key.context(), entry.key.word());
            let transition = self.model.transition(a, b, observed)?;
            if let Some(log_margin) = self.log_margin {
                if transition < self.surprise_threshold(a, b, log_margin)? {
                    suspicious.push(i);
                }
            }
            to_observed.push(entry.score + transition);
        }

        let variants = if suspicious.is_empty() {
            Vec::new()
        } else {
            self.model.variants(observed)?
        };
        trace!(
            observed,
            priors = prior.len(),
            suspicious = suspicious.len(),
            variants = variants.len(),
            "bigram step"
        );

        let mut next = PathTable::with_capacity(variants.len() + 1);
        let emission = self.model.emission(observed, observed)?;
        if let Some((i, score)) = best_predecessor(prior, to_observed.into_iter().enumerate()) {
            let from = &prior.entries()[i];
            next.push(
                score + emission,
                StateKey::new(from.key.word(), observed),
                extend(&from.value, observed),
            );
        }

        for variant in &variants {
            let emission = self.model.emission(variant, observed)?;
            let mut scored = Vec::with_capacity(suspicious.len());
            for &i in &suspicious {
                let entry = &prior.entries()[i];
                let transition =
                    self.model
                        .transition(entry.key.context(), entry.key.word(), variant)?;
                scored.push((i, entry.score + transition));
            }
            if let Some((i, score)) = best_predecessor(prior, scored) {
                let from = &prior.entries()[i];
                next.push(
                    score + emission,
                    StateKey::new(from.key.word(), variant.as_str()),
                    extend(&from.value, variant),
                );
            }
        }
        Ok(next)
    }
}

impl<L: LanguageModel, C: ConfusionSets> Decoder for BigramDecoder<L, C> {
    fn decode_scored<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Decoded, DecodeError> {
        if sentence.is_empty() {
            return Err(DecodeError::EmptySentence);
        }
        let padded = pad_sentence(sentence);
        let mut table = PathTable::start();
        for observed in padded {
            table = self.step(&table, observed)?;
        }
        let decoded = table.finish()?;
        debug!(
            words = decoded.words.len(),
            score = decoded.log_probability,
            "bigram decode"
        );
        Ok(decoded)
    }
}
