// Running channel statistics.

use std::fmt;

use serde::Serialize;

use crate::distribution::ErrorKind;

/// Counters accumulated by one [`NoiseChannel`](crate::NoiseChannel).
///
/// The channel hands out copies of this struct, so a snapshot never changes
/// after it is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    /// In-alphabet characters processed.
    pub chars: u64,
    pub substitutions: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub transpositions: u64,
    /// Strings processed through `accept_sequence`.
    pub strings: u64,
    /// Largest number of errors injected into a single string.
    pub max_errors_per_string: u64,
}

impl ChannelStats {
    /// Total injected errors of all four kinds.
    pub fn error_count(&self) -> u64 {
        self.substitutions + self.insertions + self.deletions + self.transpositions
    }

    /// Counter for one error kind; `NoOp` has none and reports 0.
    pub fn count(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::NoOp => 0,
            ErrorKind::Substitution => self.substitutions,
            ErrorKind::Insertion => self.insertions,
            ErrorKind::Deletion => self.deletions,
            ErrorKind::Transposition => self.transpositions,
        }
    }

    pub(crate) fn record(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::NoOp => {}
            ErrorKind::Substitution => self.substitutions += 1,
            ErrorKind::Insertion => self.insertions += 1,
            ErrorKind::Deletion => self.deletions += 1,
            ErrorKind::Transposition => self.transpositions += 1,
        }
    }

    pub(crate) fn finish_string(&mut self, errors_before: u64) {
        self.strings += 1;
        let injected = self.error_count() - errors_before;
        self.max_errors_per_string = self.max_errors_per_string.max(injected);
    }
}

impl fmt::Display for ChannelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chars={} subs={} ins={} dels={} trans={} strings={} max_errors_per_string={}",
            self.chars,
            self.substitutions,
            self.insertions,
            self.deletions,
            self.transpositions,
            self.strings,
            self.max_errors_per_string
        )
    }
}
