//! Random number sources for weight initialization.
//!
//! Layers never own a generator. Callers pass a `RandomSource` into every
//! operation that draws weights, so tests can seed or script the draws.

use std::time::{SystemTime, UNIX_EPOCH};

const FALLBACK_SEED: u64 = 0x9e3779b97f4a7c15;

/// Anything that yields uniform samples in [0, 1).
pub trait RandomSource {
    /// Uniform sample in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform sample in [low, high).
    fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// Seedable xorshift64 generator, the default `RandomSource`.
///
/// The same seed always yields the same weight draws across a whole network.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Create an RNG seeded from the current time.
    pub fn from_time() -> Self {
        let mut rng = Self::new(FALLBACK_SEED);
        rng.reseed_from_time();
        rng
    }

    /// Reseed based on the current time.
    pub fn reseed_from_time(&mut self) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        self.state = if nanos == 0 { FALLBACK_SEED } else { nanos };
    }

    /// Basic xorshift step.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for SimpleRng {
    // Top 53 bits, so the result is exactly representable and never 1.0.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
