// Random capability consumed by the channel.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The two draws the channel needs.
///
/// Every random decision the channel makes goes through this trait, so a
/// seeded implementation makes its output fully reproducible.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index in `0..n`. Callers guarantee `n > 0`.
    fn choose_index(&mut self, n: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn choose_index(&mut self, n: usize) -> usize {
        (**self).choose_index(n)
    }
}

/// Adapter exposing any `rand` generator as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

/// The reproducible source used by [`RngSource::seeded`].
pub type SeededSource = RngSource<ChaCha8Rng>;

impl RngSource<ChaCha8Rng> {
    /// Reproducible source: the same seed always yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Source seeded from the thread-local generator.
    pub fn from_thread_rng() -> Self {
        Self::new(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn choose_index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }
}
