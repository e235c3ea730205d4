// malaprop-correct: Restore intended spellings, one sentence per line.
//
// Reads whitespace-tokenized sentences (file or stdin), decodes each with a
// noisy-channel Viterbi decoder over an ARPA language model and a JSON
// confusion table, and prints the corrected sentence. Empty lines are
// passed through.
//
// Usage:
//   malaprop-correct --lm MODEL.arpa --confusions SETS.json [OPTIONS] [INPUT]

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use malaprop_cli::{DecoderOverrides, StrategyKind};
use malaprop_correct::{SequenceDecoder, decode_batch};
use tracing::info;

/// Correct misspelled words using a trigram language model.
#[derive(Parser, Debug)]
#[command(name = "malaprop-correct", version, about)]
struct Args {
    /// ARPA language model
    #[arg(long, env = "MALAPROP_LM")]
    lm: PathBuf,

    /// JSON confusion table: {"word": ["variant", ...]}
    #[arg(long, env = "MALAPROP_CONFUSIONS")]
    confusions: PathBuf,

    /// JSON decoder config; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// States kept per position (trigram strategy)
    #[arg(long)]
    beam_width: Option<usize>,

    /// Linear surprise factor that triggers variant expansion (bigram
    /// strategy); omit to disable correction
    #[arg(long)]
    surprise_margin: Option<f64>,

    /// Probability that an observed word is misspelled
    #[arg(long)]
    error_rate: Option<f64>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Append the path log10 score to each output line
    #[arg(long)]
    scores: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file (default: stdin)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    malaprop_cli::init_tracing(args.verbose);

    let overrides = DecoderOverrides {
        strategy: args.strategy,
        error_rate: args.error_rate,
        beam_width: args.beam_width,
        surprise_margin: args.surprise_margin,
    };
    let config = overrides.apply(malaprop_cli::load_config(args.config.as_deref())?);
    config.validate().context("invalid decoder configuration")?;

    let lm = malaprop_cli::load_language_model(&args.lm)?;
    let confusions = malaprop_cli::load_confusions(&args.confusions)?;
    let decoder = SequenceDecoder::new(lm, confusions, &config)?;
    info!(?config, "decoder ready");

    let lines = malaprop_cli::open_input(args.input.as_deref())?
        .lines()
        .collect::<io::Result<Vec<String>>>()
        .context("failed to read input")?;
    let sentences: Vec<Vec<&str>> = lines.iter().map(|l| malaprop_cli::tokenize(l)).collect();

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = args.threads {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build().context("failed to start worker threads")?;
    let results = pool.install(|| decode_batch(&decoder, &sentences));

    let mut out = BufWriter::new(io::stdout().lock());
    let mut corrected = 0usize;
    for (number, (sentence, result)) in sentences.iter().zip(results).enumerate() {
        if sentence.is_empty() {
            writeln!(out)?;
            continue;
        }
        let decoded = result.with_context(|| format!("line {}", number + 1))?;
        corrected += sentence
            .iter()
            .zip(&decoded.words)
            .filter(|(observed, word)| **observed != word.as_str())
            .count();
        if args.scores {
            writeln!(out, "{}\t{:.4}", decoded.words.join(" "), decoded.log_probability)?;
        } else {
            writeln!(out, "{}", decoded.words.join(" "))?;
        }
    }
    out.flush()?;
    info!(lines = lines.len(), corrected, "done");
    Ok(())
}
