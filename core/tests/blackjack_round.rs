//! Blackjack session lifecycle tests. Random deals are exercised through
//! the engine; resolution paths use preloaded hands written straight to
//! the session row, which is exactly what `start` would have persisted.

use coinden_core::blackjack::{hand_value, Card, Rank, RoundResult, Suit};
use coinden_core::command::{Command, CommandContext, Outcome};
use coinden_core::engine::EconEngine;
use coinden_core::error::EconError;
use coinden_core::store::StoredSession;

fn ctx(actor: &str) -> CommandContext {
    CommandContext {
        actor: actor.to_string(),
        privileged: false,
    }
}

fn fund(engine: &mut EconEngine, who: &str, amount: i64) {
    let admin = CommandContext {
        actor: "ops".to_string(),
        privileged: true,
    };
    engine
        .dispatch(
            &admin,
            Command::AddMoney {
                target: who.to_string(),
                amount,
            },
        )
        .expect("fund");
}

fn liquid(engine: &EconEngine, who: &str) -> i64 {
    engine
        .store()
        .get_or_create_participant(who)
        .unwrap()
        .liquid
}

fn card(rank: Rank) -> Card {
    Card {
        rank,
        suit: Suit::Clubs,
    }
}

/// Write an in-flight round as if `start` had escrowed the wager.
fn preload_round(engine: &EconEngine, who: &str, wager: i64, player: Vec<Card>, dealer: Vec<Card>) {
    engine.store().get_or_create_participant(who).unwrap();
    engine
        .store()
        .put_session(
            who,
            &StoredSession {
                wager,
                player,
                dealer,
            },
            engine.now_ms(),
        )
        .unwrap();
}

#[test]
fn start_escrows_the_wager_and_deals_two_cards_each() {
    let (mut engine, _clock) = EconEngine::build_test(20).unwrap();
    fund(&mut engine, "alice", 1_000);

    let view = match engine
        .dispatch(&ctx("alice"), Command::Blackjack { wager: 100 })
        .unwrap()
    {
        Outcome::BlackjackTable(view) => view,
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert_eq!(view.wager, 100);
    assert_eq!(view.player.len(), 2);
    assert_eq!(liquid(&engine, "alice"), 900, "wager must leave liquid at start");

    let session = engine.store().session_of("alice").unwrap().expect("active row");
    assert_eq!(session.wager, 100);
    assert_eq!(session.dealer.len(), 2, "hole card is stored, only hidden in the view");
}

#[test]
fn second_start_is_rejected_while_a_round_is_active() {
    let (mut engine, _clock) = EconEngine::build_test(21).unwrap();
    fund(&mut engine, "alice", 1_000);

    engine
        .dispatch(&ctx("alice"), Command::Blackjack { wager: 100 })
        .unwrap();
    let err = engine
        .dispatch(&ctx("alice"), Command::Blackjack { wager: 50 })
        .unwrap_err();
    assert!(matches!(err, EconError::SessionAlreadyActive));
    assert_eq!(liquid(&engine, "alice"), 900, "rejected start must not escrow");
}

#[test]
fn start_rejects_wagers_the_balance_cannot_cover() {
    let (mut engine, _clock) = EconEngine::build_test(22).unwrap();
    fund(&mut engine, "alice", 50);

    let err = engine
        .dispatch(&ctx("alice"), Command::Blackjack { wager: 100 })
        .unwrap_err();
    assert!(matches!(err, EconError::InsufficientFunds { .. }));
    assert!(engine.store().session_of("alice").unwrap().is_none());
}

#[test]
fn hit_and_stand_require_an_active_round() {
    let (mut engine, _clock) = EconEngine::build_test(23).unwrap();
    let err = engine.dispatch(&ctx("alice"), Command::Hit).unwrap_err();
    assert!(matches!(err, EconError::NoActiveSession));
    let err = engine.dispatch(&ctx("alice"), Command::Stand).unwrap_err();
    assert!(matches!(err, EconError::NoActiveSession));
}

#[test]
fn busting_forfeits_the_wager_and_removes_the_row() {
    let (mut engine, _clock) = EconEngine::build_test(24).unwrap();
    // K + Q + hard ace = 21 with the ace already demoted, so any draw
    // pushes the hand over 21.
    preload_round(
        &engine,
        "alice",
        100,
        vec![card(Rank::King), card(Rank::Queen), card(Rank::Ace)],
        vec![card(Rank::Ten), card(Rank::Seven)],
    );

    let round = match engine.dispatch(&ctx("alice"), Command::Hit).unwrap() {
        Outcome::BlackjackResolved(round) => round,
        other => panic!("expected a bust, got: {other:?}"),
    };

    assert_eq!(round.result, RoundResult::PlayerBust);
    assert_eq!(round.payout, 0);
    assert!(round.player_value > 21);
    assert_eq!(liquid(&engine, "alice"), 0, "no payout on a bust");
    assert!(engine.store().session_of("alice").unwrap().is_none());
}

#[test]
fn standing_on_twenty_beats_a_busted_dealer_for_triple_payout() {
    let (mut engine, _clock) = EconEngine::build_test(25).unwrap();
    // Dealer already holds 22: at or above 17 means no further draws.
    preload_round(
        &engine,
        "alice",
        100,
        vec![card(Rank::King), card(Rank::Queen)],
        vec![card(Rank::King), card(Rank::Six), card(Rank::Six)],
    );

    let round = match engine.dispatch(&ctx("alice"), Command::Stand).unwrap() {
        Outcome::BlackjackResolved(round) => round,
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert_eq!(round.player_value, 20);
    assert_eq!(round.dealer_value, 22);
    assert_eq!(round.result, RoundResult::DealerBust);
    assert_eq!(round.payout, 300);
    assert_eq!(liquid(&engine, "alice"), 300);
    assert!(
        engine.store().session_of("alice").unwrap().is_none(),
        "no residual row after resolution"
    );
}

#[test]
fn equal_hands_push_and_refund_the_wager_only() {
    let (mut engine, _clock) = EconEngine::build_test(26).unwrap();
    preload_round(
        &engine,
        "alice",
        80,
        vec![card(Rank::King), card(Rank::Nine)],
        vec![card(Rank::Ten), card(Rank::Nine)],
    );

    let round = match engine.dispatch(&ctx("alice"), Command::Stand).unwrap() {
        Outcome::BlackjackResolved(round) => round,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(round.result, RoundResult::Push);
    assert_eq!(round.payout, 80);
    assert_eq!(liquid(&engine, "alice"), 80);
}

#[test]
fn dealer_draws_to_at_least_seventeen() {
    let (mut engine, _clock) = EconEngine::build_test(27).unwrap();
    preload_round(
        &engine,
        "alice",
        10,
        vec![card(Rank::King), card(Rank::Nine)],
        vec![card(Rank::Two), card(Rank::Three)],
    );

    let round = match engine.dispatch(&ctx("alice"), Command::Stand).unwrap() {
        Outcome::BlackjackResolved(round) => round,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert!(round.dealer_value >= 17);
    assert!(round.dealer.len() > 2);
    assert_eq!(round.dealer_value, hand_value(&round.dealer));
}

#[test]
fn losing_stand_pays_nothing() {
    let (mut engine, _clock) = EconEngine::build_test(28).unwrap();
    preload_round(
        &engine,
        "alice",
        100,
        vec![card(Rank::Ten), card(Rank::Eight)],
        vec![card(Rank::King), card(Rank::Queen)],
    );

    let round = match engine.dispatch(&ctx("alice"), Command::Stand).unwrap() {
        Outcome::BlackjackResolved(round) => round,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(round.result, RoundResult::DealerWin);
    assert_eq!(round.payout, 0);
    assert_eq!(liquid(&engine, "alice"), 0);
}
