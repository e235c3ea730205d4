// malaprop-corrupt: Inject spelling errors into text, line by line.
//
// Each line is corrupted independently by a Damerau-Levenshtein noise
// channel. Characters outside the alphabet (spaces, digits, punctuation)
// pass through unchanged. Statistics are logged at the end.
//
// Usage:
//   malaprop-corrupt [--seed N] [--substitution P ...] [INPUT]

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use malaprop_channel::{ErrorDistribution, NoiseChannel, RngSource};
use malaprop_core::SymbolSet;
use malaprop_core::alphabet::LOWERCASE_ASCII;
use tracing::{debug, info};

/// Corrupt text with substitutions, insertions, deletions and transpositions.
#[derive(Parser, Debug)]
#[command(name = "malaprop-corrupt", version, about)]
struct Args {
    /// Seed for reproducible output (default: random)
    #[arg(long, env = "MALAPROP_SEED")]
    seed: Option<u64>,

    /// Probability of leaving a character unchanged
    #[arg(long, default_value_t = 0.96)]
    no_op: f64,

    /// Probability of replacing a character
    #[arg(long, default_value_t = 0.01)]
    substitution: f64,

    /// Probability of inserting a random character before it
    #[arg(long, default_value_t = 0.01)]
    insertion: f64,

    /// Probability of swapping it with the next character
    #[arg(long, default_value_t = 0.01)]
    transposition: f64,

    /// Probability of dropping it
    #[arg(long, default_value_t = 0.01)]
    deletion: f64,

    /// JSON error distribution; replaces the five probability flags
    #[arg(long, conflicts_with_all = ["no_op", "substitution", "insertion", "transposition", "deletion"])]
    distribution: Option<PathBuf>,

    /// Characters eligible for corruption
    #[arg(long, default_value = LOWERCASE_ASCII)]
    alphabet: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file (default: stdin)
    input: Option<PathBuf>,
}

impl Args {
    fn distribution(&self) -> Result<ErrorDistribution> {
        if let Some(path) = &self.distribution {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("invalid error distribution {}", path.display()));
        }
        ErrorDistribution::new(
            self.no_op,
            self.substitution,
            self.insertion,
            self.transposition,
            self.deletion,
        )
        .context("invalid error distribution")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    malaprop_cli::init_tracing(args.verbose);

    let distribution = args.distribution()?;
    let alphabet = SymbolSet::from_str_chars(&args.alphabet).context("invalid alphabet")?;
    let random = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_thread_rng(),
    };
    debug!(?distribution, symbols = alphabet.len(), seed = ?args.seed, "channel config");
    let mut channel = NoiseChannel::new(random, distribution, alphabet)?;

    let input = malaprop_cli::open_input(args.input.as_deref())?;
    let mut out = BufWriter::new(io::stdout().lock());
    let mut line_out = String::new();
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        line_out.clear();
        channel.accept_sequence_into(&line, &mut line_out);
        writeln!(out, "{line_out}")?;
    }
    out.flush()?;

    info!(stats = %channel.stats(), "done");
    Ok(())
}
