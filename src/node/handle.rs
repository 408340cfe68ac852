//! Node handle: a copyable, generational reference into the arena.

/// Identifies a node slot in a [`Tree`](super::Tree).
///
/// The `generation` is bumped every time a slot is freed, so a handle
/// kept past its node's destruction is detected as stale instead of
/// silently aliasing whatever node reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

impl NodeHandle {
    /// Build a handle from raw parts. Mostly useful in tests; handles
    /// obtained this way are only valid if the tree agrees.
    #[inline]
    pub fn from_parts(index: u32, generation: u32) -> Self {
        NodeHandle { index, generation }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a single u64 (for hashing).
    #[inline]
    pub fn raw(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
