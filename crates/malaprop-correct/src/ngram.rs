// In-memory back-off n-gram table (up to trigrams).
//
// Holds precomputed log10 probabilities and back-off weights, typically read
// from an ARPA file produced by an external toolkit. No estimation or
// smoothing happens here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::TableError;
use crate::oracle::{LanguageModel, OracleError};

/// Unknown-word token looked up when a unigram is missing.
pub const UNKNOWN_WORD: &str = "<unk>";

/// Log10 probability of a word that is neither in the table nor covered by
/// an `<unk>` entry.
pub const DEFAULT_UNKNOWN_LOGP: f64 = -99.0;

const MAX_ORDER: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    logp: f64,
    backoff: f64,
}

/// Back-off trigram language model.
///
/// `P(c | a b)` is the trigram entry if present, otherwise
/// `bow(a b) + P(c | b)`, where `P(c | b)` is the bigram entry if present,
/// otherwise `bow(b) + P(c)`. Missing back-off weights are 0.
#[derive(Debug, Clone)]
pub struct NgramTable {
    unigrams: HashMap<String, Entry>,
    bigrams: HashMap<String, HashMap<String, Entry>>,
    trigrams: HashMap<String, HashMap<String, HashMap<String, f64>>>,
    unknown_floor: f64,
}

impl Default for NgramTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NgramTable {
    pub fn new() -> Self {
        Self {
            unigrams: HashMap::new(),
            bigrams: HashMap::new(),
            trigrams: HashMap::new(),
            unknown_floor: DEFAULT_UNKNOWN_LOGP,
        }
    }

    /// Use `floor` for words with no unigram entry and no `<unk>` entry.
    pub fn with_unknown_floor(mut self, floor: f64) -> Self {
        self.unknown_floor = floor;
        self
    }

    pub fn insert_unigram(&mut self, word: &str, logp: f64, backoff: f64) {
        self.unigrams
            .insert(word.to_string(), Entry { logp, backoff });
    }

    pub fn insert_bigram(&mut self, a: &str, b: &str, logp: f64, backoff: f64) {
        self.bigrams
            .entry_ref(a)
            .or_default()
            .insert(b.to_string(), Entry { logp, backoff });
    }

    pub fn insert_trigram(&mut self, a: &str, b: &str, c: &str, logp: f64) {
        self.trigrams
            .entry_ref(a)
            .or_default()
            .entry_ref(b)
            .or_default()
            .insert(c.to_string(), logp);
    }

    /// Number of stored n-grams of each order, unigrams first.
    pub fn counts(&self) -> [usize; MAX_ORDER] {
        let bigrams = self.bigrams.values().map(HashMap::len).sum();
        let trigrams = self
            .trigrams
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum();
        [self.unigrams.len(), bigrams, trigrams]
    }

    fn bigram(&self, a: &str, b: &str) -> Option<&Entry> {
        self.bigrams.get(a)?.get(b)
    }

    fn trigram(&self, a: &str, b: &str, c: &str) -> Option<f64> {
        self.trigrams.get(a)?.get(b)?.get(c).copied()
    }

    /// `log10 P(w)`.
    pub fn unigram_logp(&self, word: &str) -> f64 {
        self.unigrams
            .get(word)
            .or_else(|| self.unigrams.get(UNKNOWN_WORD))
            .map_or(self.unknown_floor, |e| e.logp)
    }

    /// `log10 P(b | a)`, backing off to the unigram.
    pub fn bigram_logp(&self, a: &str, b: &str) -> f64 {
        match self.bigram(a, b) {
            Some(e) => e.logp,
            None => self.unigram_bow(a) + self.unigram_logp(b),
        }
    }

    /// `log10 P(c | a b)`, backing off to the bigram.
    pub fn trigram_logp(&self, a: &str, b: &str, c: &str) -> f64 {
        match self.trigram(a, b, c) {
            Some(logp) => logp,
            None => self.bigram_bow(a, b) + self.bigram_logp(b, c),
        }
    }

    fn unigram_bow(&self, word: &str) -> f64 {
        self.unigrams.get(word).map_or(0.0, |e| e.backoff)
    }

    fn bigram_bow(&self, a: &str, b: &str) -> f64 {
        self.bigram(a, b).map_or(0.0, |e| e.backoff)
    }

    /// Load an ARPA file from disk.
    pub fn from_arpa_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path.as_ref())?;
        Self::from_arpa_reader(BufReader::new(file))
    }

    pub fn from_arpa_str(text: &str) -> Result<Self, TableError> {
        Self::from_arpa_reader(text.as_bytes())
    }

    /// Parse ARPA text.
    ///
    /// Accepts `\data\` counts, `\1-grams:` to `\3-grams:` sections and the
    /// closing `\end\`. Anything before `\data\` is ignored. A section whose
    /// entry count differs from the header is loaded with a warning.
    pub fn from_arpa_reader<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut table = Self::new();
        let mut section = Section::Preamble;
        let mut declared = [None; MAX_ORDER];
        let mut seen = [0usize; MAX_ORDER];

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed == "\\data\\" {
                section = Section::Data;
                continue;
            }
            if trimmed == "\\end\\" {
                section = Section::End;
                break;
            }
            if let Some(order) = parse_section_header(trimmed) {
                if !(1..=MAX_ORDER).contains(&order) {
                    return Err(unsupported_order(number, order));
                }
                section = Section::Grams(order);
                continue;
            }

            match section {
                Section::Preamble => {}
                Section::Data => {
                    let (order, count) = parse_count(trimmed)
                        .ok_or_else(|| arpa_error(number, format!("bad count line `{trimmed}`")))?;
                    if (1..=MAX_ORDER).contains(&order) {
                        declared[order - 1] = Some(count);
                    } else if count > 0 {
                        return Err(unsupported_order(number, order));
                    }
                }
                Section::Grams(order) => {
                    table.insert_arpa_line(order, trimmed, number)?;
                    seen[order - 1] += 1;
                }
                Section::End => unreachable!("parsing stops at \\end\\"),
            }
        }

        if section != Section::End {
            warn!("ARPA input ended without \\end\\ marker");
        }
        for order in 1..=MAX_ORDER {
            if let Some(count) = declared[order - 1] {
                if count != seen[order - 1] {
                    warn!(
                        order,
                        declared = count,
                        found = seen[order - 1],
                        "ARPA n-gram count mismatch"
                    );
                }
            }
        }
        let [unigrams, bigrams, trigrams] = table.counts();
        debug!(unigrams, bigrams, trigrams, "loaded n-gram table");
        Ok(table)
    }

    fn insert_arpa_line(
        &mut self,
        order: usize,
        line: &str,
        number: usize,
    ) -> Result<(), TableError> {
        let mut fields = line.split_whitespace();
        let logp = fields
            .next()
            .and_then(|f| f.parse::<f64>().ok())
            .ok_or_else(|| arpa_error(number, "missing log probability"))?;
        let words: Vec<&str> = fields.by_ref().take(order).collect();
        if words.len() != order {
            return Err(arpa_error(number, format!("expected {order} words")));
        }
        let backoff = match fields.next() {
            Some(f) if order < MAX_ORDER => f
                .parse::<f64>()
                .map_err(|_| arpa_error(number, format!("bad back-off weight `{f}`")))?,
            Some(f) => return Err(arpa_error(number, format!("unexpected field `{f}`"))),
            None => 0.0,
        };
        if let Some(extra) = fields.next() {
            return Err(arpa_error(number, format!("unexpected field `{extra}`")));
        }
        match words[..] {
            [w] => self.insert_unigram(w, logp, backoff),
            [a, b] => self.insert_bigram(a, b, logp, backoff),
            [a, b, c] => self.insert_trigram(a, b, c, logp),
            _ => unreachable!("order is checked against MAX_ORDER"),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Data,
    Grams(usize),
    End,
}

fn arpa_error(line: usize, message: impl Into<String>) -> TableError {
    TableError::Arpa {
        line,
        message: message.into(),
    }
}

fn unsupported_order(line: usize, order: usize) -> TableError {
    arpa_error(line, format!("unsupported n-gram order {order}"))
}

/// `\N-grams:` -> `N`.
fn parse_section_header(line: &str) -> Option<usize> {
    line.strip_prefix('\\')?
        .strip_suffix("-grams:")?
        .parse()
        .ok()
}

/// `ngram N=COUNT` -> `(N, COUNT)`.
fn parse_count(line: &str) -> Option<(usize, usize)> {
    let rest = line.strip_prefix("ngram")?.trim_start();
    let (order, count) = rest.split_once('=')?;
    Some((order.trim().parse().ok()?, count.trim().parse().ok()?))
}

impl LanguageModel for NgramTable {
    fn trigram_probability(&self, a: &str, b: &str, c: &str) -> Result<f64, OracleError> {
        Ok(self.trigram_logp(a, b, c))
    }

    fn unigram_backoff(&self, word: &str) -> Result<f64, OracleError> {
        Ok(self.unigram_bow(word))
    }

    fn bigram_backoff(&self, a: &str, b: &str) -> Result<f64, OracleError> {
        Ok(self.bigram_bow(a, b))
    }

    fn in_bigrams(&self, a: &str, b: &str) -> Result<bool, OracleError> {
        Ok(self.bigram(a, b).is_some())
    }
}
