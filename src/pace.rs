//! Tick pacing.
//!
//! Pacing only throttles how fast the driver ticks. It is injected
//! through the [`Pacer`] trait and called from a node's wait state, so the
//! tree algorithms never touch real time and tests can run instantly.

use std::time::Duration;

use crate::time::VirtualTime;

/// Delays the next tick by a fixed period.
pub trait Pacer {
    /// Block (or pretend to) for `period`.
    fn pace(&mut self, period: Duration);
}

// ── SleepPacer ────────────────────────────────────────────────────────

/// Blocks the current thread with `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pace(&mut self, period: Duration) {
        if !period.is_zero() {
            std::thread::sleep(period);
        }
    }
}

// ── VirtualPacer ──────────────────────────────────────────────────────

/// Never blocks; accumulates the requested periods as virtual time.
#[derive(Debug, Clone, Default)]
pub struct VirtualPacer {
    now: VirtualTime,
    calls: u64,
}

impl VirtualPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time paced so far.
    pub fn now(&self) -> VirtualTime {
        self.now
    }

    /// How many times `pace` has been called.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Pacer for VirtualPacer {
    fn pace(&mut self, period: Duration) {
        self.now = self.now.advance(period);
        self.calls += 1;
    }
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn pace(&mut self, period: Duration) {
        (**self).pace(period);
    }
}
