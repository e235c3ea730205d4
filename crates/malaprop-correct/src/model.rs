// Transition and emission scoring.

use malaprop_core::logprob::to_log10;
use malaprop_core::markers::{SENTENCE_END, is_boundary, is_end};

use crate::ConfigError;
use crate::oracle::{ConfusionSets, LanguageModel, OracleError};

/// Observation model: how likely a true word is to be observed as a given
/// surface form.
///
/// With probability `1 - error_rate` the word is observed unchanged;
/// otherwise the error is spread uniformly over the true word's confusion set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionModel {
    error_rate: f64,
    log_match: f64,
    log_error: f64,
}

impl EmissionModel {
    pub fn new(error_rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(ConfigError::ErrorRateOutOfRange(error_rate));
        }
        Ok(Self {
            error_rate,
            log_match: to_log10(1.0 - error_rate),
            log_error: to_log10(error_rate),
        })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Log10 emission score.
    ///
    /// `confusion_size` is the size of the *true* word's confusion set; an
    /// empty set is treated as size 1.
    #[inline]
    pub fn log_probability(&self, matches: bool, confusion_size: usize) -> f64 {
        if matches {
            self.log_match
        } else {
            self.log_error - (confusion_size.max(1) as f64).log10()
        }
    }
}

/// Language model, confusion sets and emission model bundled for decoding.
#[derive(Debug, Clone)]
pub struct NoisyChannelModel<L, C> {
    lm: L,
    confusions: C,
    emission: EmissionModel,
}

impl<L: LanguageModel, C: ConfusionSets> NoisyChannelModel<L, C> {
    pub fn new(lm: L, confusions: C, error_rate: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            lm,
            confusions,
            emission: EmissionModel::new(error_rate)?,
        })
    }

    pub fn language_model(&self) -> &L {
        &self.lm
    }

    pub fn confusion_sets(&self) -> &C {
        &self.confusions
    }

    pub fn emission_model(&self) -> &EmissionModel {
        &self.emission
    }

    /// `log10 P(c | a b)`.
    ///
    /// A query whose middle word is the end marker is rewritten to
    /// `(</s>, a, </s>)`, which the oracle answers as the bigram
    /// `P(</s> | a)` since nothing follows an end marker in training data.
    pub fn transition(&self, a: &str, b: &str, c: &str) -> Result<f64, OracleError> {
        if is_end(b) {
            self.lm.trigram_probability(SENTENCE_END, a, b)
        } else {
            self.lm.trigram_probability(a, b, c)
        }
    }

    /// Log10 probability of observing `observed` when `candidate` was meant.
    pub fn emission(&self, candidate: &str, observed: &str) -> Result<f64, OracleError> {
        if candidate == observed {
            return Ok(self.emission.log_probability(true, 0));
        }
        let size = self.confusions.confusion_set_size(candidate)?;
        Ok(self.emission.log_probability(false, size))
    }

    /// Spelling variants of `observed`, excluding `observed` itself.
    ///
    /// Boundary markers have no variants.
    pub fn variants(&self, observed: &str) -> Result<Vec<String>, OracleError> {
        if is_boundary(observed) {
            return Ok(Vec::new());
        }
        let mut variants = self.confusions.confusion_set(observed)?;
        let mut seen = hashbrown::HashSet::with_capacity(variants.len());
        variants.retain(|v| v != observed && seen.insert(v.clone()));
        Ok(variants)
    }

    /// The observed word followed by its variants.
    pub fn candidates(&self, observed: &str) -> Result<Vec<String>, OracleError> {
        let variants = self.variants(observed)?;
        let mut candidates = Vec::with_capacity(variants.len() + 1);
        candidates.push(observed.to_string());
        candidates.extend(variants);
        Ok(candidates)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use hashbrown::HashMap;

    /// Table-driven oracle for decoder tests.
    ///
    /// Unlisted trigrams score `default`; all back-off weights are zero and
    /// no bigram is known.
    #[derive(Debug, Default)]
    pub(crate) struct MockOracle {
        pub trigrams: HashMap<(String, String, String), f64>,
        pub confusions: HashMap<String, Vec<String>>,
        pub default: f64,
    }

    impl MockOracle {
        pub fn new(default: f64) -> Self {
            Self {
                default,
                ..Self::default()
            }
        }

        pub fn trigram(mut self, a: &str, b: &str, c: &str, logp: f64) -> Self {
            self.trigrams
                .insert((a.to_string(), b.to_string(), c.to_string()), logp);
            self
        }

        pub fn confusable(mut self, word: &str, variants: &[&str]) -> Self {
            self.confusions.insert(
                word.to_string(),
                variants.iter().map(|v| v.to_string()).collect(),
            );
            self
        }
    }

    impl LanguageModel for MockOracle {
        fn trigram_probability(&self, a: &str, b: &str, c: &str) -> Result<f64, OracleError> {
            let key = (a.to_string(), b.to_string(), c.to_string());
            Ok(self.trigrams.get(&key).copied().unwrap_or(self.default))
        }

        fn unigram_backoff(&self, _word: &str) -> Result<f64, OracleError> {
            Ok(0.0)
        }

        fn bigram_backoff(&self, _a: &str, _b: &str) -> Result<f64, OracleError> {
            Ok(0.0)
        }

        fn in_bigrams(&self, _a: &str, _b: &str) -> Result<bool, OracleError> {
            Ok(false)
        }
    }

    impl ConfusionSets for MockOracle {
        fn confusion_set(&self, word: &str) -> Result<Vec<String>, OracleError> {
            Ok(self.confusions.get(word).cloned().unwrap_or_default())
        }
    }

    fn model(oracle: &MockOracle, error_rate: f64) -> NoisyChannelModel<&MockOracle, &MockOracle> {
        NoisyChannelModel::new(oracle, oracle, error_rate).unwrap()
    }

    #[test]
    fn rejects_error_rate_outside_unit_interval() {
        assert_eq!(
            EmissionModel::new(1.5).unwrap_err(),
            ConfigError::ErrorRateOutOfRange(1.5)
        );
        assert!(EmissionModel::new(-0.1).is_err());
        assert!(EmissionModel::new(f64::NAN).is_err());
        assert!(EmissionModel::new(0.0).is_ok());
        assert!(EmissionModel::new(1.0).is_ok());
    }

    #[test]
    fn emission_scores() {
        let oracle = MockOracle::new(-1.0).confusable("the", &["teh", "tea", "thee", "hte"]);
        let m = model(&oracle, 0.1);
        let exact = m.emission("cat", "cat").unwrap();
        assert!((exact - 0.9f64.log10()).abs() < 1e-12);
        // Divides by the true word's confusion set.
        let swapped = m.emission("the", "teh").unwrap();
        assert!((swapped - (0.1f64 / 4.0).log10()).abs() < 1e-12);
        // Empty confusion set counts as one.
        let lonely = m.emission("cat", "cot").unwrap();
        assert!((lonely - 0.1f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn zero_error_rate_forbids_mismatch() {
        let oracle = MockOracle::new(-1.0);
        let m = model(&oracle, 0.0);
        assert_eq!(m.emission("a", "a").unwrap(), 0.0);
        assert_eq!(m.emission("a", "b").unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn end_marker_query_is_rewritten() {
        let oracle = MockOracle::new(-5.0).trigram("</s>", "cat", "</s>", -0.5);
        let m = model(&oracle, 0.1);
        assert_eq!(m.transition("cat", "</s>", "</s>").unwrap(), -0.5);
        assert_eq!(m.transition("the", "cat", "</s>").unwrap(), -5.0);
    }

    #[test]
    fn candidates_put_observed_first_without_duplicates() {
        let oracle = MockOracle::new(-1.0).confusable("teh", &["the", "teh", "tea", "the"]);
        let m = model(&oracle, 0.1);
        assert_eq!(m.candidates("teh").unwrap(), vec!["teh", "the", "tea"]);
        assert_eq!(m.candidates("cat").unwrap(), vec!["cat"]);
    }

    #[test]
    fn boundary_markers_have_no_variants() {
        let oracle = MockOracle::new(-1.0).confusable("</s>", &["."]);
        let m = model(&oracle, 0.1);
        assert!(m.variants("</s>").unwrap().is_empty());
        assert!(m.variants("<s>").unwrap().is_empty());
    }
}
