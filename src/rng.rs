//! Deterministic random number generation.
//!
//! Every game owns exactly one [`GameRng`]. Draw selection and the challenge
//! permutation both pull from it, so a seed fully determines a game given the
//! same sequence of accepted actions.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded game RNG.
///
/// Wraps `ChaCha8Rng` and remembers the seed it was created from so that
/// recordings can rebuild an identical generator.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`.
    ///
    /// Returns 0 when `len` is 0; callers check emptiness first.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Uniform value in `lo..=hi`. Returns `lo` if the range is inverted.
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
