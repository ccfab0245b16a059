//! The blackjack session state machine.
//!
//! At most one active round per participant; the session row escrows the
//! wager from the moment the round starts until resolution deletes it.
//! Cards come from an infinite shoe: independent uniform draws over the
//! 4×13 rank/suit space, with replacement.

use crate::error::{EconError, EconResult};
use crate::rng::GameRng;
use crate::store::{EconStore, StoredSession};
use crate::types::Millis;
use serde::{Deserialize, Serialize};

pub const DEALER_STAND_AT: u32 = 17;
pub const BLACKJACK_LIMIT: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

pub const SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

pub const RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

impl Rank {
    /// Pip value with aces high; `hand_value` demotes aces as needed.
    fn base_value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// Draw one card from the infinite shoe.
pub fn draw_card(rng: &mut GameRng) -> Card {
    let rank = RANKS[rng.next_u64_below(RANKS.len() as u64) as usize];
    let suit = SUITS[rng.next_u64_below(SUITS.len() as u64) as usize];
    Card { rank, suit }
}

/// Conventional soft/hard hand value: aces start at 11 and demote to 1
/// one at a time while the total is over 21.
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total = 0u32;
    let mut aces = 0u32;
    for card in cards {
        total += card.rank.base_value();
        if card.rank == Rank::Ace {
            aces += 1;
        }
    }
    while total > BLACKJACK_LIMIT && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total
}

/// The table as shown mid-round: the dealer's hole card stays hidden.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub wager: i64,
    pub player: Vec<Card>,
    pub player_value: u32,
    pub dealer_upcard: Card,
}

impl TableView {
    fn of(session: &StoredSession) -> Self {
        Self {
            wager: session.wager,
            player_value: hand_value(&session.player),
            player: session.player.clone(),
            dealer_upcard: session.dealer[0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    PlayerBust,
    DealerBust,
    PlayerWin,
    DealerWin,
    Push,
}

/// A resolved round, with both hands fully revealed. The session row is
/// already gone by the time the caller sees one of these.
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub wager: i64,
    pub player: Vec<Card>,
    pub player_value: u32,
    pub dealer: Vec<Card>,
    pub dealer_value: u32,
    pub result: RoundResult,
    /// Amount credited back: 3×wager on a win, 1×wager on a push, 0 on
    /// a loss (the wager left escrow at round start).
    pub payout: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum HitOutcome {
    Continue(TableView),
    Bust(RoundOutcome),
}

/// Compare final hands and compute the payout multiple.
pub fn settle(player_value: u32, dealer_value: u32, wager: i64) -> (RoundResult, i64) {
    if dealer_value > BLACKJACK_LIMIT {
        (RoundResult::DealerBust, wager * 3)
    } else if dealer_value > player_value {
        (RoundResult::DealerWin, 0)
    } else if player_value > dealer_value {
        (RoundResult::PlayerWin, wager * 3)
    } else {
        (RoundResult::Push, wager)
    }
}

/// Start a round: escrow the wager and deal two cards each way.
pub fn start(
    store: &EconStore,
    rng: &mut GameRng,
    actor: &str,
    wager: i64,
    now: Millis,
) -> EconResult<TableView> {
    if wager <= 0 {
        return Err(EconError::InvalidAmount);
    }
    if store.session_of(actor)?.is_some() {
        return Err(EconError::SessionAlreadyActive);
    }
    let p = store.get_or_create_participant(actor)?;

    let session = StoredSession {
        wager,
        player: vec![draw_card(rng), draw_card(rng)],
        dealer: vec![draw_card(rng), draw_card(rng)],
    };

    store.in_transaction(|store| {
        if !store.try_debit_liquid(actor, wager)? {
            return Err(EconError::InsufficientFunds {
                needed: wager,
                available: p.liquid,
            });
        }
        store.put_session(actor, &session, now)?;
        Ok(())
    })?;

    Ok(TableView::of(&session))
}

/// Draw one more card. Going over 21 ends the round as a bust: the
/// escrowed wager is forfeit and the session row is deleted.
pub fn hit(store: &EconStore, rng: &mut GameRng, actor: &str, now: Millis) -> EconResult<HitOutcome> {
    let mut session = store.session_of(actor)?.ok_or(EconError::NoActiveSession)?;

    session.player.push(draw_card(rng));
    let player_value = hand_value(&session.player);

    if player_value > BLACKJACK_LIMIT {
        store.delete_session(actor)?;
        let dealer_value = hand_value(&session.dealer);
        return Ok(HitOutcome::Bust(RoundOutcome {
            wager: session.wager,
            player: session.player,
            player_value,
            dealer: session.dealer,
            dealer_value,
            result: RoundResult::PlayerBust,
            payout: 0,
        }));
    }

    store.put_session(actor, &session, now)?;
    Ok(HitOutcome::Continue(TableView::of(&session)))
}

/// Stop drawing: the dealer plays out to 17+ and the round settles.
/// Payout credit and session deletion commit together.
pub fn stand(store: &EconStore, rng: &mut GameRng, actor: &str) -> EconResult<RoundOutcome> {
    let mut session = store.session_of(actor)?.ok_or(EconError::NoActiveSession)?;

    while hand_value(&session.dealer) < DEALER_STAND_AT {
        session.dealer.push(draw_card(rng));
    }

    let player_value = hand_value(&session.player);
    let dealer_value = hand_value(&session.dealer);
    let (result, payout) = settle(player_value, dealer_value, session.wager);

    store.in_transaction(|store| {
        if payout > 0 {
            store.credit_liquid(actor, payout)?;
        }
        store.delete_session(actor)
    })?;

    Ok(RoundOutcome {
        wager: session.wager,
        player: session.player,
        player_value,
        dealer: session.dealer,
        dealer_value,
        result,
        payout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rank: Rank) -> Card {
        Card {
            rank,
            suit: Suit::Spades,
        }
    }

    #[test]
    fn hand_value_demotes_aces() {
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::Ace), card(Rank::Nine)]), 21);
        assert_eq!(
            hand_value(&[card(Rank::Ace), card(Rank::Ace), card(Rank::Ace), card(Rank::Eight)]),
            21
        );
    }

    #[test]
    fn hand_value_face_cards() {
        assert_eq!(hand_value(&[card(Rank::King), card(Rank::Queen)]), 20);
        assert_eq!(
            hand_value(&[card(Rank::Five), card(Rank::Five), card(Rank::Five), card(Rank::Five)]),
            20
        );
    }

    #[test]
    fn hand_value_soft_seventeen() {
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::Six)]), 17);
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::Six), card(Rank::Ten)]), 17);
    }

    #[test]
    fn settle_pays_triple_on_win_and_dealer_bust() {
        assert_eq!(settle(20, 22, 100), (RoundResult::DealerBust, 300));
        assert_eq!(settle(20, 18, 100), (RoundResult::PlayerWin, 300));
        assert_eq!(settle(18, 20, 100), (RoundResult::DealerWin, 0));
        assert_eq!(settle(19, 19, 100), (RoundResult::Push, 100));
    }
}
