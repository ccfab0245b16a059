//! Single-shot wagering games: coinflip and slots.
//!
//! Both escrow the wager and settle within one transaction, so a
//! concurrent command against the same participant can never observe a
//! half-settled round.

use crate::error::{EconError, EconResult};
use crate::rng::GameRng;
use crate::store::EconStore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CoinflipOutcome {
    pub wager: i64,
    pub won: bool,
    /// Signed balance change: +wager or -wager.
    pub delta: i64,
}

/// Even-money 50/50 flip.
pub fn coinflip(
    store: &EconStore,
    rng: &mut GameRng,
    actor: &str,
    wager: i64,
) -> EconResult<CoinflipOutcome> {
    if wager <= 0 {
        return Err(EconError::InvalidAmount);
    }
    let p = store.get_or_create_participant(actor)?;
    let won = rng.chance(0.5);

    store.in_transaction(|store| {
        if !store.try_debit_liquid(actor, wager)? {
            return Err(EconError::InsufficientFunds {
                needed: wager,
                available: p.liquid,
            });
        }
        if won {
            store.credit_liquid(actor, wager * 2)?;
        }
        Ok(())
    })?;

    Ok(CoinflipOutcome {
        wager,
        won,
        delta: if won { wager } else { -wager },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSymbol {
    Cherry,
    Lemon,
    Grapes,
    Bell,
    Star,
    Diamond,
}

pub const SLOT_SYMBOLS: [SlotSymbol; 6] = [
    SlotSymbol::Cherry,
    SlotSymbol::Lemon,
    SlotSymbol::Grapes,
    SlotSymbol::Bell,
    SlotSymbol::Star,
    SlotSymbol::Diamond,
];

#[derive(Debug, Clone, Serialize)]
pub struct SlotsOutcome {
    pub wager: i64,
    pub reels: [SlotSymbol; 3],
    /// Gross amount credited back (0 on a loss; includes the wager).
    pub payout: i64,
}

/// Payout table: triple diamonds 5×, any other triple 3×, any pair 2×.
pub fn slots_payout(wager: i64, reels: [SlotSymbol; 3]) -> i64 {
    let [a, b, c] = reels;
    if a == SlotSymbol::Diamond && b == SlotSymbol::Diamond && c == SlotSymbol::Diamond {
        wager * 5
    } else if a == b && b == c {
        wager * 3
    } else if a == b || a == c || b == c {
        wager * 2
    } else {
        0
    }
}

/// Three independent reel draws from the 6-symbol alphabet.
pub fn slots(
    store: &EconStore,
    rng: &mut GameRng,
    actor: &str,
    wager: i64,
) -> EconResult<SlotsOutcome> {
    if wager <= 0 {
        return Err(EconError::InvalidAmount);
    }
    let p = store.get_or_create_participant(actor)?;

    let mut spin = || SLOT_SYMBOLS[rng.next_u64_below(SLOT_SYMBOLS.len() as u64) as usize];
    let reels = [spin(), spin(), spin()];
    let payout = slots_payout(wager, reels);

    store.in_transaction(|store| {
        if !store.try_debit_liquid(actor, wager)? {
            return Err(EconError::InsufficientFunds {
                needed: wager,
                available: p.liquid,
            });
        }
        if payout > 0 {
            store.credit_liquid(actor, payout)?;
        }
        Ok(())
    })?;

    Ok(SlotsOutcome {
        wager,
        reels,
        payout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use SlotSymbol::*;

    #[test]
    fn slots_payout_table() {
        assert_eq!(slots_payout(10, [Diamond, Diamond, Diamond]), 50);
        assert_eq!(slots_payout(10, [Bell, Bell, Bell]), 30);
        assert_eq!(slots_payout(10, [Bell, Star, Bell]), 20);
        assert_eq!(slots_payout(10, [Cherry, Lemon, Star]), 0);
    }

    #[test]
    fn pair_matches_any_two_positions() {
        assert_eq!(slots_payout(10, [Star, Star, Lemon]), 20);
        assert_eq!(slots_payout(10, [Star, Lemon, Star]), 20);
        assert_eq!(slots_payout(10, [Lemon, Star, Star]), 20);
    }
}
