// Sentence boundary markers
//
// The decoder pads every sentence with one start marker and two end markers.
// The doubled end marker lets the trigram oracle be queried one step past the
// final real word (see `is_end`).

/// Sentence start marker.
pub const SENTENCE_START: &str = "<s>";

/// Sentence end marker.
pub const SENTENCE_END: &str = "</s>";

/// Number of end markers appended after the last real word.
pub const TRAILING_END_MARKERS: usize = 2;

/// Returns `true` if `word` is the sentence end marker.
#[inline]
pub fn is_end(word: &str) -> bool {
    word == SENTENCE_END
}

/// Returns `true` if `word` is either boundary marker.
#[inline]
pub fn is_boundary(word: &str) -> bool {
    word == SENTENCE_START || word == SENTENCE_END
}

/// Append the trailing end markers to an observed sentence.
///
/// The returned vector borrows the sentence words; markers are `'static`.
pub fn pad_sentence<'a, S: AsRef<str>>(sentence: &'a [S]) -> Vec<&'a str> {
    let mut padded = Vec::with_capacity(sentence.len() + TRAILING_END_MARKERS);
    padded.extend(sentence.iter().map(AsRef::as_ref));
    for _ in 0..TRAILING_END_MARKERS {
        padded.push(SENTENCE_END);
    }
    padded
}
