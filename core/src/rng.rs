//! Seeded random stream shared by the wave director and tower targeting.
//!
//! Values come from a mulberry32 mixer over a single `u32` state, so the same
//! seed replays the same game on every platform.

use serde::{Deserialize, Serialize};

/// Seedable 32-bit pseudo-random stream shared by every consumer of a game.
///
/// The generator mixes its state the same way on every platform, so a seed
/// fully determines the sequence of values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u32,
}

impl DeterministicRng {
    /// Creates a stream starting from the provided seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Derives a seed from text with 32-bit FNV-1a over UTF-16 code units.
    #[must_use]
    pub fn seed_from_str(input: &str) -> u32 {
        input.encode_utf16().fold(0x811c_9dc5, |hash: u32, unit| {
            (hash ^ u32::from(unit)).wrapping_mul(0x0100_0193)
        })
    }

    /// Current internal state; equal states produce equal sequences.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Advances the stream and returns a value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Shuffles the slice in place with a full-length Fisher-Yates pass.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next_unit() * (i + 1) as f64).floor() as usize;
            items.swap(i, j.min(i));
        }
    }
}
