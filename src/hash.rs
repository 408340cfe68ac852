//! Deterministic hash mixing.
//!
//! Used to fingerprint a tree's state so two runs with the same seed can
//! be compared cheaply. `DefaultHasher` is not used: its output
//! is not guaranteed stable across releases.

/// Combine two u64 hashes deterministically.
pub fn hash_combine(a: u64, b: u64) -> u64 {
    let mut h = a;
    h = h.wrapping_mul(0x517cc1b727220a95);
    h = h.wrapping_add(b);
    h ^= h >> 32;
    h
}
