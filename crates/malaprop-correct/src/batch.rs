// Sentence-level parallel decoding.

use rayon::prelude::*;

use crate::DecodeError;
use crate::decoder::{Decoded, Decoder};

/// Decode every sentence on the rayon pool.
///
/// Results come back in input order. A failing sentence does not affect the
/// others.
pub fn decode_batch<D, S>(decoder: &D, sentences: &[Vec<S>]) -> Vec<Result<Decoded, DecodeError>>
where
    D: Decoder + Sync,
    S: AsRef<str> + Sync,
{
    sentences
        .par_iter()
        .map(|sentence| decoder.decode_scored(sentence))
        .collect()
}
