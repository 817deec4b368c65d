//! Minimal-sample drawing for plane hypotheses.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Draws triplets of distinct indices from an owned random source.
///
/// The source is the only mutable state of a detection pass. Seeding it
/// fixes the whole sequence of hypotheses.
#[derive(Clone, Debug)]
pub struct TripletSampler<R = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> TripletSampler<R> {
    /// Wrap an existing random source.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Three pairwise-distinct indices drawn uniformly from `0..n`.
    ///
    /// Uses rejection sampling, so `n` must be at least 3 or the call never
    /// returns.
    pub fn next_triplet(&mut self, n: usize) -> [usize; 3] {
        debug_assert!(n >= 3, "need at least 3 points to sample a triplet");

        let i0 = self.rng.random_range(0..n);
        let mut i1 = self.rng.random_range(0..n);
        while i1 == i0 {
            i1 = self.rng.random_range(0..n);
        }
        let mut i2 = self.rng.random_range(0..n);
        while i2 == i0 || i2 == i1 {
            i2 = self.rng.random_range(0..n);
        }
        [i0, i1, i2]
    }
}

impl<R: Rng + SeedableRng> TripletSampler<R> {
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(R::seed_from_u64(seed))
    }

    /// Restart the random sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}
