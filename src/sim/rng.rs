//! Random source for wave generation and zigzag movement
//!
//! Always an explicit, seedable `Pcg32` handed to whoever needs it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Simulation RNG
pub type SimRng = Pcg32;

/// RNG seed wrapper for serialization and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Fresh random seed for unseeded runs
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn to_rng(&self) -> SimRng {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Uniform float in `[lo, hi)`
#[inline]
pub fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}
