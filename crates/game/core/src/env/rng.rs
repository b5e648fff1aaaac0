//! Seed-based RNG oracle for deterministic rolls.
//!
//! Initiative rolls and patrol destinations must replay identically for a
//! given session seed, so the oracle is stateless: every roll derives from a
//! seed mixed out of stable session facts via [`compute_seed`].

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be pure: the same seed always yields the same value.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a die with N sides (1..=N).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides) + 1
    }

    /// Random value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as u32;
        min + (self.next_u32(seed) % span) as i32
    }
}

/// PCG random number generator (PCG-XSH-RR variant).
///
/// Fast, 64 bits of state, good statistical quality, and fully deterministic:
/// the properties the replayable turn system needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// LCG state advance: `state' = state × multiplier + increment (mod 2^64)`.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a per-event seed from stable session facts.
///
/// `game_seed` pins the whole session for replay; `sequence` distinguishes
/// successive events (e.g. the encounter counter or tick); `actor_id` keeps
/// simultaneous rolls independent; `context` separates multiple rolls within
/// one event.
pub fn compute_seed(game_seed: u64, sequence: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64/FxHash-style multipliers with a final avalanche.
    let mut hash = game_seed;

    hash ^= sequence.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
