//! Random sources for splitting.
//!
//! Every split draws one permutation from a [`Shuffler`]. The default
//! [`SeededShuffler`] re-seeds on each draw, so two passes over pools of the
//! same size see the same permutation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Source of index permutations for the random holdout
pub trait Shuffler {
    /// A permutation of `0..len`
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// `StdRng` seeded from a fixed value at every call
#[derive(Debug, Clone, Copy)]
pub struct SeededShuffler {
    seed: u64,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for SeededShuffler {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Shuffler for SeededShuffler {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut rng);
        indices
    }
}

/// Number of samples held out of `n` for a `part / total` fraction.
///
/// Rounds up like the usual `train_test_split` convention, in exact integer
/// arithmetic.
pub fn holdout_count(n: usize, part: u64, total: u64) -> usize {
    if n == 0 || total == 0 {
        return 0;
    }
    let n = n as u128;
    let held = (n * part as u128).div_ceil(total as u128);
    held.min(n) as usize
}

/// Split `items` into `(kept, held_out)` where `held_out` has
/// `holdout_count(items.len(), part, total)` elements chosen by `shuffler`.
pub fn holdout_split<T>(
    items: Vec<T>,
    part: u64,
    total: u64,
    shuffler: &mut dyn Shuffler,
) -> (Vec<T>, Vec<T>) {
    let n = items.len();
    let held = holdout_count(n, part, total);
    let order = shuffler.permutation(n);

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let held_out: Vec<T> = order[..held].iter().filter_map(|&i| slots[i].take()).collect();
    let kept: Vec<T> = order[held..].iter().filter_map(|&i| slots[i].take()).collect();

    (kept, held_out)
}
