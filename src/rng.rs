//! Explicitly threaded random source.
//!
//! Nodes never reach for a process-wide generator. The driver seeds one
//! `DeterministicRng` and the application carries it in its step
//! environment, so a test can fix the seed and assert exact sequences.

/// SplitMix64, a small deterministic PRNG.
///
/// Produces identical sequences for a given seed on every platform.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a new RNG from a seed.
    pub fn new(seed: u64) -> Self {
        DeterministicRng { state: seed }
    }

    /// Generate the next u64.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Generate a uniform u64 in `[min, max)`. Returns `min` if `min >= max`.
    pub fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        min + (self.next_u64() % (max - min))
    }

    /// Fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 0
    }

    /// Returns `true` with roughly `percent`% probability.
    ///
    /// `percent` is clamped to 100.
    pub fn chance(&mut self, percent: u64) -> bool {
        self.next_range(0, 100) < percent.min(100)
    }

    /// Current internal state (useful for snapshotting a run).
    pub fn state(&self) -> u64 {
        self.state
    }
}
