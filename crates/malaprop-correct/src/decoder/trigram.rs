// Trigram-state Viterbi with a fixed beam.

use hashbrown::HashMap;
use malaprop_core::markers::pad_sentence;
use tracing::{debug, trace};

use super::path::{Backtrace, PathTable, best_predecessor, extend};
use super::{Decoded, Decoder, validate_beam_width};
use crate::beam::Beam;
use crate::model::NoisyChannelModel;
use crate::oracle::{ConfusionSets, LanguageModel, OracleError};
use crate::state::StateKey;
use crate::{ConfigError, DecodeError};

/// Viterbi over `(context word, word)` states with the full confusion set
/// expanded at every position.
///
/// After each position only the `beam_width` best states survive. Ties are
/// broken by the smaller `(context, word)` key, so the result never depends
/// on hash or insertion order. Cost is bounded by
/// `O(length * beam_width * branching)`. A beam at least as wide as the
/// number of reachable states per position gives the exact optimum.
#[derive(Debug, Clone)]
pub struct TrigramDecoder<L, C> {
    model: NoisyChannelModel<L, C>,
    beam_width: usize,
}

impl<L: LanguageModel, C: ConfusionSets> TrigramDecoder<L, C> {
    pub fn new(model: NoisyChannelModel<L, C>, beam_width: usize) -> Result<Self, ConfigError> {
        validate_beam_width(beam_width)?;
        Ok(Self { model, beam_width })
    }

    pub fn model(&self) -> &NoisyChannelModel<L, C> {
        &self.model
    }

    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    fn step(&self, prior: &PathTable, observed: &str) -> Result<PathTable, OracleError> {
        let candidates = self.model.candidates(observed)?;
        let mut emissions = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            emissions.push(self.model.emission(candidate, observed)?);
        }

        // A state (w, v) can only be reached from priors whose word is w.
        let mut by_word: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, entry) in prior.entries().iter().enumerate() {
            by_word.entry(entry.key.word()).or_default().push(i);
        }

        let mut beam: Beam<Backtrace> = Beam::new(self.beam_width);
        let mut reachable = 0usize;
        for (&word, priors) in &by_word {
            for (candidate, &emission) in candidates.iter().zip(&emissions) {
                let mut scored = Vec::with_capacity(priors.len());
                for &i in priors {
                    let entry = &prior.entries()[i];
                    let transition = self.model.transition(entry.key.context(), word, candidate)?;
                    scored.push((i, entry.score + transition));
                }
                if let Some((i, score)) = best_predecessor(prior, scored) {
                    reachable += 1;
                    beam.push(
                        score + emission,
                        StateKey::new(word, candidate.as_str()),
                        extend(&prior.entries()[i].value, candidate),
                    );
                }
            }
        }
        trace!(
            observed,
            candidates = candidates.len(),
            reachable,
            kept = beam.len(),
            "trigram step"
        );
        Ok(PathTable::from_beam(beam))
    }
}

impl<L: LanguageModel, C: ConfusionSets> Decoder for TrigramDecoder<L, C> {
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
            beam_width = self.beam_width,
            "trigram decode"
        );
        Ok(decoded)
    }
}
