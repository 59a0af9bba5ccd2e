//! Uniform random sources for gating decisions.
//!
//! [`ThreadRandom`] draws from the calling thread's generator, so concurrent
//! callers never share generator state. [`SeededRandom`] is reproducible and
//! meant for tests and simulations.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    /// Draw the next value in `[0, 1)`.
    fn next_ratio(&self) -> f64;
}

/// Thread-local, non-cryptographic generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_ratio(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Deterministic generator seeded from a `u64`.
///
/// The generator sits behind a mutex; draws from several threads are
/// serialized, and the sequence is only reproducible for a single caller.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_ratio(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random::<f64>()
    }
}
