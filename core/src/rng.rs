//! Deterministic random number generation.
//!
//! RULE: No game component may call a platform RNG. All randomness flows
//! through GameRng streams derived from a single master seed, so any
//! sequence of outcomes is reproducible from (seed, slot).
//!
//! Each chance-based component gets its own stream, seeded from
//! (master_seed XOR slot_index). Adding a new slot never disturbs the
//! streams of existing slots.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named deterministic RNG stream for one game component.
pub struct GameRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GameRng {
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived = master_seed ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an i64 in the inclusive range [lo, hi].
    pub fn next_i64_in(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range");
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Factory for the per-component streams of one engine instance.
/// Streams are created once at engine build and then consumed statefully;
/// re-deriving a slot mid-run would restart its sequence.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: RngSlot) -> GameRng {
        GameRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments. NEVER reorder or remove entries — only append.
/// Reordering changes every component's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Coinflip = 0,
    Slots = 1,
    Blackjack = 2,
    Risk = 3,
    // Add new chance-based components here — append only.
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Coinflip => "coinflip",
            Self::Slots => "slots",
            Self::Blackjack => "blackjack",
            Self::Risk => "risk",
        }
    }
}
