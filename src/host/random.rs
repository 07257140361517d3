//! Seeded random ranges

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::RandomRange;

/// PCG-backed random source (same seed, same session)
#[derive(Debug, Clone)]
pub struct PcgRandom {
    seed: u64,
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomRange for PcgRandom {
    fn uniform(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
