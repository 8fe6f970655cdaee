//! Deterministic random source threaded explicitly through the partitioner.
//!
//! The source seeds C's global `rand()` to 0 at the top of every public
//! partition call. We keep the determinism without the global: every call
//! that needs randomness takes a `&mut DeterministicRng` built once at the
//! top-level entry point and passed down.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::Range;

pub struct DeterministicRng(StdRng);

impl DeterministicRng {
    pub fn seeded(seed: u64) -> Self {
        DeterministicRng(StdRng::seed_from_u64(seed))
    }

    pub fn gen_range(&mut self, range: Range<usize>) -> usize {
        self.0.gen_range(range)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
