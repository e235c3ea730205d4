// malaprop-cli: shared utilities for the command-line tools.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use malaprop_correct::{ConfusionTable, DecoderConfig, NgramTable, Strategy};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace).
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Open `path`, or stdin when `path` is `None` or `-`.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file =
                File::open(p).with_context(|| format!("failed to open {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

pub fn load_language_model(path: &Path) -> Result<NgramTable> {
    NgramTable::from_arpa_path(path)
        .with_context(|| format!("failed to load language model {}", path.display()))
}

pub fn load_confusions(path: &Path) -> Result<ConfusionTable> {
    ConfusionTable::from_json_path(path)
        .with_context(|| format!("failed to load confusion sets {}", path.display()))
}

/// Read a JSON [`DecoderConfig`], or the default when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<DecoderConfig> {
    let Some(path) = path else {
        return Ok(DecoderConfig::default());
    };
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid decoder config {}", path.display()))
}

/// Strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Bigram,
    Trigram,
}

/// Command-line overrides applied on top of a loaded config.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderOverrides {
    pub strategy: Option<StrategyKind>,
    pub error_rate: Option<f64>,
    pub beam_width: Option<usize>,
    pub surprise_margin: Option<f64>,
}

impl DecoderOverrides {
    /// Apply the overrides to `config`.
    ///
    /// Switching strategy keeps the tuning parameter only if it was given on
    /// the command line. A parameter for the other strategy is ignored.
    pub fn apply(&self, mut config: DecoderConfig) -> DecoderConfig {
        if let Some(rate) = self.error_rate {
            config.error_rate = rate;
        }
        config.strategy = match (self.strategy, config.strategy) {
            (Some(StrategyKind::Bigram), Strategy::Trigram { .. }) => Strategy::Bigram {
                surprise_margin: self.surprise_margin,
            },
            (Some(StrategyKind::Trigram), Strategy::Bigram { .. }) => Strategy::Trigram {
                beam_width: self.beam_width,
            },
            (_, Strategy::Bigram { surprise_margin }) => Strategy::Bigram {
                surprise_margin: self.surprise_margin.or(surprise_margin),
            },
            (_, Strategy::Trigram { beam_width }) => Strategy::Trigram {
                beam_width: self.beam_width.or(beam_width),
            },
        };
        config
    }
}

/// Split a line into words on whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
