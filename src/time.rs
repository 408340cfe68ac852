//! Virtual time for paced runs that must not block.
//!
//! A `VirtualTime` is a logical millisecond counter. It only moves when a
//! [`VirtualPacer`](crate::pace::VirtualPacer) is asked to pace, never
//! from wall-clock observation.

use std::time::Duration;

/// Elapsed virtual time, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualTime(u64);

impl VirtualTime {
    /// The zero-point of virtual time.
    pub const ZERO: VirtualTime = VirtualTime(0);

    #[inline]
    pub fn from_millis(ms: u64) -> Self {
        VirtualTime(ms)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Advance by `delta`, saturating at `u64::MAX` milliseconds.
    ///
    /// Sub-millisecond remainders are truncated.
    #[inline]
    pub fn advance(self, delta: Duration) -> VirtualTime {
        let ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        VirtualTime(self.0.saturating_add(ms))
    }

    /// Milliseconds between `earlier` and `self`, or `None` if `earlier` is later.
    #[inline]
    pub fn duration_since(self, earlier: VirtualTime) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_millis)
    }
}

impl std::fmt::Display for VirtualTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}ms", self.0)
    }
}
