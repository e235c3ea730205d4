// Noise channel: single-slot buffered stochastic character transducer.

use malaprop_core::SymbolSet;
use tracing::trace;

use crate::distribution::{ErrorDistribution, ErrorKind};
use crate::random::RandomSource;
use crate::sink::CharSink;
use crate::slot::PendingSlot;
use crate::stats::ChannelStats;
use crate::ChannelError;

/// One unit of channel input: a character, or the end of a token.
///
/// End markers let an insertion land after the last character of a token and
/// resolve a pending transposition without swapping across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Char(char),
    End,
}

impl Unit {
    #[inline]
    fn as_char(self) -> Option<char> {
        match self {
            Unit::Char(c) => Some(c),
            Unit::End => None,
        }
    }
}

impl From<char> for Unit {
    fn from(c: char) -> Self {
        Unit::Char(c)
    }
}

/// Corrupts text with Damerau-Levenshtein edits.
///
/// A single-character delay buffer sits between input and output. Every
/// outcome first settles what is buffered, then decides what (if anything)
/// to buffer next:
///
/// | outcome | emitted | buffered afterwards |
/// |---|---|---|
/// | no-op | previous | incoming |
/// | substitution | previous | random symbol != incoming |
/// | insertion | previous, random symbol | incoming |
/// | deletion | previous | nothing |
/// | transposition | incoming, previous | nothing (incoming if slot was empty) |
///
/// Characters outside the alphabet bypass sampling: the buffer is flushed and
/// the character is emitted verbatim.
///
/// An instance models one input stream. The buffer and statistics are plain
/// mutable state, so independent streams need independent instances.
pub struct NoiseChannel<R> {
    random: R,
    distribution: ErrorDistribution,
    alphabet: SymbolSet,
    slot: PendingSlot,
    stats: ChannelStats,
}

impl<R: RandomSource> NoiseChannel<R> {
    /// Create a channel.
    ///
    /// Fails when the alphabet cannot support the configured outcomes:
    /// substitution needs two symbols, insertion needs one.
    pub fn new(
        random: R,
        distribution: ErrorDistribution,
        alphabet: SymbolSet,
    ) -> Result<Self, ChannelError> {
        let size = alphabet.len();
        if distribution.probability(ErrorKind::Substitution) > 0.0 && size < 2 {
            return Err(ChannelError::AlphabetTooSmall {
                kind: ErrorKind::Substitution,
                size,
            });
        }
        if distribution.probability(ErrorKind::Insertion) > 0.0 && size < 1 {
            return Err(ChannelError::AlphabetTooSmall {
                kind: ErrorKind::Insertion,
                size,
            });
        }
        Ok(Self {
            random,
            distribution,
            alphabet,
            slot: PendingSlot::new(),
            stats: ChannelStats::default(),
        })
    }

    /// Snapshot of the running statistics.
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    pub fn distribution(&self) -> &ErrorDistribution {
        &self.distribution
    }

    pub fn alphabet(&self) -> &SymbolSet {
        &self.alphabet
    }

    /// Number of buffered characters (0 or 1).
    pub fn pending_len(&self) -> usize {
        self.slot.len()
    }

    /// Emit the buffered character, if any.
    pub fn flush<S: CharSink>(&mut self, sink: &mut S) {
        if let Some(c) = self.slot.take() {
            sink.emit(c);
        }
    }

    /// Consume one unit of input.
    pub fn accept<S: CharSink>(&mut self, unit: Unit, sink: &mut S) {
        if let Unit::Char(c) = unit {
            if !self.alphabet.contains(c) {
                self.flush(sink);
                sink.emit(c);
                return;
            }
            self.stats.chars += 1;
        }

        let kind = self.distribution.sample(self.random.uniform());
        match (kind, unit) {
            (ErrorKind::NoOp, _) | (ErrorKind::Substitution, Unit::End) => {
                self.buffer(unit.as_char(), sink);
            }
            (ErrorKind::Substitution, Unit::Char(c)) => {
                let substitute = self.substitute(c);
                self.note(kind, unit);
                self.buffer(Some(substitute), sink);
            }
            (ErrorKind::Insertion, _) => {
                let inserted = self.random_symbol();
                self.note(kind, unit);
                self.buffer(Some(inserted), sink);
                self.buffer(unit.as_char(), sink);
            }
            (ErrorKind::Deletion, _) => {
                if unit != Unit::End {
                    self.note(kind, unit);
                }
                self.flush(sink);
            }
            (ErrorKind::Transposition, _) => match (self.slot.take(), unit) {
                (Some(previous), Unit::Char(c)) => {
                    self.note(kind, unit);
                    sink.emit(c);
                    sink.emit(previous);
                }
                (Some(previous), Unit::End) => sink.emit(previous),
                (None, incoming) => {
                    self.slot.push(incoming.as_char());
                }
            },
        }
    }

    /// Corrupt one string into `sink`.
    ///
    /// The buffer is empty on entry and on exit, so every string is corrupted
    /// independently. An end marker is fed before each non-initial character
    /// outside the alphabet and once after the last character.
    pub fn accept_sequence_into<S: CharSink>(&mut self, text: &str, sink: &mut S) {
        self.flush(sink);
        let errors_before = self.stats.error_count();

        for (i, c) in text.chars().enumerate() {
            if i != 0 && !self.alphabet.contains(c) {
                self.accept(Unit::End, sink);
                self.flush(sink);
            }
            self.accept(Unit::Char(c), sink);
        }
        self.accept(Unit::End, sink);
        self.flush(sink);

        self.stats.finish_string(errors_before);
    }

    /// Corrupt one string and return the result.
    pub fn accept_sequence(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 4);
        self.accept_sequence_into(text, &mut out);
        out
    }

    /// Put `incoming` in the slot and emit whatever it displaced.
    #[inline]
    fn buffer<S: CharSink>(&mut self, incoming: Option<char>, sink: &mut S) {
        if let Some(previous) = self.slot.push(incoming) {
            sink.emit(previous);
        }
    }

    fn substitute(&mut self, c: char) -> char {
        let index = self.random.choose_index(self.alphabet.len() - 1);
        self.alphabet.get_excluding(c, index).unwrap_or(c)
    }

    fn random_symbol(&mut self) -> char {
        let index = self.random.choose_index(self.alphabet.len());
        // Index is in range by construction.
        self.alphabet.get(index).unwrap_or_default()
    }

    fn note(&mut self, kind: ErrorKind, unit: Unit) {
        self.stats.record(kind);
        trace!(%kind, ?unit, "injected error");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::random::RngSource;

    /// Random source replaying fixed draws.
    struct Scripted {
        uniforms: VecDeque<f64>,
        indices: VecDeque<usize>,
    }

    impl Scripted {
        fn new(uniforms: &[f64], indices: &[usize]) -> Self {
            Self {
                uniforms: uniforms.iter().copied().collect(),
                indices: indices.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for Scripted {
        fn uniform(&mut self) -> f64 {
            self.uniforms.pop_front().unwrap_or(0.0)
        }

        fn choose_index(&mut self, n: usize) -> usize {
            self.indices.pop_front().unwrap_or(0) % n
        }
    }

    fn dist(no_op: f64, sub: f64, ins: f64, trans: f64, del: f64) -> ErrorDistribution {
        ErrorDistribution::new(no_op, sub, ins, trans, del).unwrap()
    }

    fn seeded(distribution: ErrorDistribution, seed: u64) -> NoiseChannel<RngSource<rand_chacha::ChaCha8Rng>> {
        NoiseChannel::new(RngSource::seeded(seed), distribution, SymbolSet::lowercase_ascii()).unwrap()
    }

    #[test]
    fn identity_distribution_returns_input() {
        for seed in 0..8 {
            let mut channel = seeded(ErrorDistribution::identity(), seed);
            for text in ["", "a", "hello world", "it's 42, ok?", "UPPER lower"] {
                assert_eq!(channel.accept_sequence(text), text);
            }
            assert_eq!(channel.stats().error_count(), 0);
        }
    }

    #[test]
    fn substitution_changes_every_character() {
        let mut channel = seeded(dist(0.0, 1.0, 0.0, 0.0, 0.0), 3);
        let input = "thequickbrownfox";
        let output = channel.accept_sequence(input);
        assert_eq!(output.chars().count(), input.chars().count());
        for (original, corrupted) in input.chars().zip(output.chars()) {
            assert_ne!(original, corrupted);
            assert!(channel.alphabet().contains(corrupted));
        }
        assert_eq!(channel.stats().substitutions, input.len() as u64);
    }

    #[test]
    fn substitution_leaves_out_of_alphabet_characters() {
        let mut channel = seeded(dist(0.0, 1.0, 0.0, 0.0, 0.0), 11);
        let output: Vec<char> = channel.accept_sequence("ab, 7cd").chars().collect();
        assert_eq!(output.len(), 7);
        assert_eq!(output[2], ',');
        assert_eq!(output[3], ' ');
        assert_eq!(output[4], '7');
        assert_ne!(output[0], 'a');
        assert_ne!(output[6], 'd');
    }

    #[test]
    fn transposition_swaps_adjacent_pairs() {
        let mut channel = seeded(dist(0.0, 0.0, 0.0, 1.0, 0.0), 5);
        assert_eq!(channel.accept_sequence("abcdef"), "badcfe");
        assert_eq!(channel.stats().transpositions, 3);
    }

    #[test]
    fn transposition_odd_length_keeps_last_character() {
        let mut channel = seeded(dist(0.0, 0.0, 0.0, 1.0, 0.0), 5);
        assert_eq!(channel.accept_sequence("abc"), "bac");
        assert_eq!(channel.stats().transpositions, 1);
    }

    #[test]
    fn transposition_does_not_cross_token_boundary() {
        let mut channel = seeded(dist(0.0, 0.0, 0.0, 1.0, 0.0), 5);
        assert_eq!(channel.accept_sequence("abc de"), "bac ed");
    }

    #[test]
    fn deletion_drops_alphabet_characters() {
        let mut channel = seeded(dist(0.0, 0.0, 0.0, 0.0, 1.0), 9);
        assert_eq!(channel.accept_sequence("ab cd."), " .");
        let stats = channel.stats();
        assert_eq!(stats.deletions, 4);
        assert_eq!(stats.chars, 4);
    }

    #[test]
    fn insertion_adds_one_character_per_unit() {
        let mut channel = seeded(dist(0.0, 0.0, 1.0, 0.0, 0.0), 2);
        let output: Vec<char> = channel.accept_sequence("ab").chars().collect();
        // One insertion before each character and one at the end marker.
        assert_eq!(output.len(), 5);
        assert_eq!(output[1], 'a');
        assert_eq!(output[3], 'b');
        assert_eq!(channel.stats().insertions, 3);
    }

    #[test]
    fn scripted_insertion_places_symbol_before_character() {
        let alphabet = SymbolSet::from_str_chars("xyz").unwrap();
        // no-op 'x', then insertion of index 2 ('z') before 'y', then end no-op.
        let random = Scripted::new(&[0.1, 0.9, 0.1], &[2]);
        let mut channel = NoiseChannel::new(random, dist(0.5, 0.0, 0.5, 0.0, 0.0), alphabet).unwrap();
        assert_eq!(channel.accept_sequence("xy"), "xzy");
    }

    #[test]
    fn scripted_substitution_skips_original_symbol() {
        let alphabet = SymbolSet::from_str_chars("abc").unwrap();
        // Index 1 over "ac" (b excluded) is 'c'.
        let random = Scripted::new(&[0.0, 0.9], &[1]);
        let mut channel = NoiseChannel::new(random, dist(0.0, 1.0, 0.0, 0.0, 0.0), alphabet).unwrap();
        assert_eq!(channel.accept_sequence("b"), "c");
    }

    #[test]
    fn scripted_single_swap_then_no_op() {
        let alphabet = SymbolSet::lowercase_ascii();
        // 'c' no-op, 'a' transposed with 'c', 't' no-op, end no-op.
        let random = Scripted::new(&[0.0, 0.9, 0.0, 0.0], &[]);
        let mut channel = NoiseChannel::new(random, dist(0.5, 0.0, 0.0, 0.5, 0.0), alphabet).unwrap();
        assert_eq!(channel.accept_sequence("cat"), "act");
        assert_eq!(channel.stats().transpositions, 1);
    }

    #[test]
    fn draw_above_short_sum_stays_no_op() {
        let alphabet = SymbolSet::lowercase_ascii();
        let random = Scripted::new(&[0.0, 0.999_999_7, 0.0], &[]);
        let mut channel =
            NoiseChannel::new(random, dist(0.999_999_5, 0.0, 0.0, 0.0, 0.0), alphabet).unwrap();
        assert_eq!(channel.accept_sequence("ab"), "ab");
        assert_eq!(channel.stats().transpositions, 0);
    }

    #[test]
    fn pending_slot_never_exceeds_one() {
        let distributions = [
            ErrorDistribution::identity(),
            dist(0.2, 0.2, 0.2, 0.2, 0.2),
            dist(0.0, 0.0, 1.0, 0.0, 0.0),
            dist(0.0, 0.0, 0.0, 1.0, 0.0),
            dist(0.5, 0.0, 0.0, 0.0, 0.5),
        ];
        let input = "the cat sat, on 2 mats!";
        for (seed, distribution) in distributions.into_iter().enumerate() {
            let mut channel = seeded(distribution, seed as u64);
            let mut out = String::new();
            for c in input.chars() {
                assert!(channel.pending_len() <= 1);
                channel.accept(Unit::Char(c), &mut out);
                assert!(channel.pending_len() <= 1);
            }
            channel.accept(Unit::End, &mut out);
            assert!(channel.pending_len() <= 1);
            channel.flush(&mut out);
            assert_eq!(channel.pending_len(), 0);
        }
    }

    #[test]
    fn accept_sequence_leaves_buffer_empty() {
        let mut channel = seeded(dist(0.6, 0.1, 0.1, 0.1, 0.1), 17);
        for text in ["alpha", "beta gamma", "x"] {
            channel.accept_sequence(text);
            assert_eq!(channel.pending_len(), 0);
        }
    }

    #[test]
    fn accept_sequence_flushes_stale_character_on_entry() {
        let mut channel = seeded(ErrorDistribution::identity(), 0);
        let mut out = String::new();
        channel.accept(Unit::Char('q'), &mut out);
        assert_eq!(channel.pending_len(), 1);
        channel.accept_sequence_into("ab", &mut out);
        assert_eq!(out, "qab");
    }

    #[test]
    fn same_seed_same_output() {
        let distribution = dist(0.7, 0.1, 0.1, 0.05, 0.05);
        let text = "reproducible corruption of a longer sentence";
        let mut a = seeded(distribution, 1234);
        let mut b = seeded(distribution, 1234);
        for _ in 0..5 {
            assert_eq!(a.accept_sequence(text), b.accept_sequence(text));
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn stats_track_strings_and_maximum() {
        let mut channel = seeded(dist(0.0, 1.0, 0.0, 0.0, 0.0), 8);
        channel.accept_sequence("ab");
        channel.accept_sequence("abcd");
        channel.accept_sequence("a");
        let stats = channel.stats();
        assert_eq!(stats.strings, 3);
        assert_eq!(stats.max_errors_per_string, 4);
        assert_eq!(stats.chars, 7);
    }

    #[test]
    fn substitution_needs_two_symbols() {
        let alphabet = SymbolSet::from_str_chars("a").unwrap();
        let result = NoiseChannel::new(RngSource::seeded(0), dist(0.9, 0.1, 0.0, 0.0, 0.0), alphabet);
        assert!(matches!(
            result,
            Err(ChannelError::AlphabetTooSmall { kind: ErrorKind::Substitution, size: 1 })
        ));
    }

    #[test]
    fn empty_alphabet_passes_everything_through() {
        let alphabet = SymbolSet::new(std::iter::empty()).unwrap();
        let mut channel =
            NoiseChannel::new(RngSource::seeded(0), dist(0.5, 0.0, 0.0, 0.0, 0.5), alphabet).unwrap();
        assert_eq!(channel.accept_sequence("anything"), "anything");
        assert_eq!(channel.stats().chars, 0);
    }
}
