//! Deterministic random draws for particle spawning.
//!
//! Every [`Emitter`](crate::Emitter) owns one [`SpawnContext`]. All the
//! randomness in the engine flows through it: shape jitter, spawn
//! direction, speed variance, and the particle's identity seed. Draws
//! happen in that fixed order for each spawned particle, so replaying
//! the same seed and step sequence reproduces bit-identical
//! trajectories.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::math::lerp;

/// Random-draw context used while spawning particles.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context with an explicit seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a context seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Random `f32` in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random `f32` in `[min, max)`.
    ///
    /// Lerp-based, so an empty range (`min == max`) is fine and returns
    /// `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        lerp(min, max, self.random())
    }
}
