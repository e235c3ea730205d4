// Decoder capability and strategy selection.
//
// Two Viterbi strategies implement one `Decoder` trait. `SequenceDecoder`
// is the tagged variant chosen once from a `DecoderConfig`; the per-sentence
// loop never branches on a stored mode flag.

mod bigram;
mod path;
mod trigram;

use serde::{Deserialize, Serialize};

use crate::model::{EmissionModel, NoisyChannelModel};
use crate::oracle::{ConfusionSets, LanguageModel};
use crate::{ConfigError, DecodeError};

pub use bigram::BigramDecoder;
pub use trigram::TrigramDecoder;

/// Result of decoding one sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    /// Intended words, one per observed word, without boundary markers.
    pub words: Vec<String>,
    /// Accumulated log10 score of the winning path, including the
    /// transitions into the trailing end markers.
    pub log_probability: f64,
}

/// Infers intended words from an observed sentence.
pub trait Decoder {
    /// Decode `sentence`, returning the words and the path score.
    fn decode_scored<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Decoded, DecodeError>;

    /// Decode `sentence`, returning only the words.
    fn decode<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Vec<String>, DecodeError> {
        self.decode_scored(sentence).map(|decoded| decoded.words)
    }
}

/// Search strategy and its tuning parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    /// Word-pair states; confusion variants are tried only where the
    /// language model finds the observed continuation surprising.
    ///
    /// `surprise_margin` is a linear factor: the observed word is surprising
    /// when its log probability falls more than `log10(margin)` below the
    /// context's back-off weight. `None` disables variant expansion.
    Bigram {
        #[serde(default)]
        surprise_margin: Option<f64>,
    },
    /// Word-pair states over the full confusion set at every position,
    /// pruned to the best `beam_width` states.
    Trigram {
        #[serde(default)]
        beam_width: Option<usize>,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Trigram {
            beam_width: Some(DecoderConfig::DEFAULT_BEAM_WIDTH),
        }
    }
}

/// Decoder construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Probability that an observed word differs from the intended word.
    pub error_rate: f64,
    pub strategy: Strategy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            error_rate: Self::DEFAULT_ERROR_RATE,
            strategy: Strategy::default(),
        }
    }
}

impl DecoderConfig {
    pub const DEFAULT_ERROR_RATE: f64 = 0.05;
    pub const DEFAULT_BEAM_WIDTH: usize = 20;

    /// Check every parameter without building a decoder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        EmissionModel::new(self.error_rate)?;
        match self.strategy {
            Strategy::Bigram { surprise_margin } => validate_margin(surprise_margin),
            Strategy::Trigram { beam_width } => {
                validate_beam_width(beam_width.ok_or(ConfigError::MissingBeamWidth)?)
            }
        }
    }
}

fn validate_margin(margin: Option<f64>) -> Result<(), ConfigError> {
    match margin {
        Some(m) if !(m.is_finite() && m > 0.0) => Err(ConfigError::InvalidSurpriseMargin(m)),
        _ => Ok(()),
    }
}

fn validate_beam_width(width: usize) -> Result<(), ConfigError> {
    if width == 0 {
        return Err(ConfigError::ZeroBeamWidth);
    }
    Ok(())
}

/// A decoder with its strategy fixed at construction.
#[derive(Debug, Clone)]
pub enum SequenceDecoder<L, C> {
    Bigram(BigramDecoder<L, C>),
    Trigram(TrigramDecoder<L, C>),
}

impl<L: LanguageModel, C: ConfusionSets> SequenceDecoder<L, C> {
    /// Each parameter is checked once, by the constructor that consumes it.
    pub fn new(lm: L, confusions: C, config: &DecoderConfig) -> Result<Self, ConfigError> {
        let model = NoisyChannelModel::new(lm, confusions, config.error_rate)?;
        Ok(match config.strategy {
            Strategy::Bigram { surprise_margin } => {
                SequenceDecoder::Bigram(BigramDecoder::new(model, surprise_margin)?)
            }
            Strategy::Trigram { beam_width } => {
                let width = beam_width.ok_or(ConfigError::MissingBeamWidth)?;
                SequenceDecoder::Trigram(TrigramDecoder::new(model, width)?)
            }
        })
    }

    pub fn model(&self) -> &NoisyChannelModel<L, C> {
        match self {
            SequenceDecoder::Bigram(d) => d.model(),
            SequenceDecoder::Trigram(d) => d.model(),
        }
    }
}

impl<L: LanguageModel, C: ConfusionSets> Decoder for SequenceDecoder<L, C> {
    fn decode_scored<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Decoded, DecodeError> {
        match self {
            SequenceDecoder::Bigram(d) => d.decode_scored(sentence),
            SequenceDecoder::Trigram(d) => d.decode_scored(sentence),
        }
    }
}
