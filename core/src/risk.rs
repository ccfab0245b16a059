//! Adversarial transfers: petty theft against liquid balances and vault
//! heists against protected ones.
//!
//! Sequencing is deliberate: the cooldown check precedes every mutation,
//! and a blocked or empty-handed attempt still consumes the actor's
//! cooldown — probing a shielded or broke target is not a free retry.

use crate::config::EconConfig;
use crate::error::{EconError, EconResult};
use crate::ledger::Role;
use crate::rng::GameRng;
use crate::store::EconStore;
use crate::types::Millis;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Targets the liquid balance; open to every participant.
    Theft,
    /// Targets the protected balance; requires the operative role.
    Heist,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RiskOutcome {
    /// The target's shield was up. Cooldown consumed.
    Blocked,
    /// Nothing worth taking in the targeted balance. Cooldown consumed.
    NothingToTake,
    /// Funds moved target → actor. Cooldown consumed.
    Hit { amount: i64 },
}

pub fn petty_theft(
    store: &EconStore,
    cfg: &EconConfig,
    rng: &mut GameRng,
    actor: &str,
    target: &str,
    now: Millis,
) -> EconResult<RiskOutcome> {
    attempt(store, cfg, rng, actor, target, RiskKind::Theft, now)
}

pub fn vault_heist(
    store: &EconStore,
    cfg: &EconConfig,
    rng: &mut GameRng,
    actor: &str,
    target: &str,
    now: Millis,
) -> EconResult<RiskOutcome> {
    attempt(store, cfg, rng, actor, target, RiskKind::Heist, now)
}

fn attempt(
    store: &EconStore,
    cfg: &EconConfig,
    rng: &mut GameRng,
    actor: &str,
    target: &str,
    kind: RiskKind,
    now: Millis,
) -> EconResult<RiskOutcome> {
    if target.is_empty() || target == actor {
        return Err(EconError::InvalidTarget);
    }

    let actor_rec = store.get_or_create_participant(actor)?;
    if kind == RiskKind::Heist && actor_rec.role != Role::Operative {
        return Err(EconError::WrongRole);
    }

    let (cooldown_until, cooldown_ms) = match kind {
        RiskKind::Theft => (actor_rec.theft_cooldown_until, cfg.theft_cooldown_ms),
        RiskKind::Heist => (actor_rec.heist_cooldown_until, cfg.heist_cooldown_ms),
    };
    if cooldown_until > now {
        return Err(EconError::OnCooldown {
            remaining_ms: cooldown_until - now,
        });
    }

    let target_rec = store.get_or_create_participant(target)?;
    let next_cooldown = now + cooldown_ms;

    if target_rec.shield_active(now) {
        store.set_risk_cooldown(actor, kind, next_cooldown)?;
        return Ok(RiskOutcome::Blocked);
    }

    let attackable = match kind {
        RiskKind::Theft => target_rec.liquid,
        RiskKind::Heist if target_rec.has_vault => target_rec.protected,
        RiskKind::Heist => 0,
    };
    if attackable <= 0 {
        store.set_risk_cooldown(actor, kind, next_cooldown)?;
        return Ok(RiskOutcome::NothingToTake);
    }

    let (low_pct, high_pct) = match kind {
        RiskKind::Theft => cfg.theft_band,
        RiskKind::Heist => cfg.heist_band,
    };
    let low = ((attackable as f64 * low_pct).floor() as i64).max(1);
    let high = ((attackable as f64 * high_pct).floor() as i64).max(1);
    let amount = rng.next_i64_in(low.min(high), high.max(low));

    // The conditional debit can still miss if the target spent the
    // balance since the read above; that collapses into an empty take.
    if store.apply_risk_hit(actor, target, kind, amount, next_cooldown)? {
        Ok(RiskOutcome::Hit { amount })
    } else {
        store.set_risk_cooldown(actor, kind, next_cooldown)?;
        Ok(RiskOutcome::NothingToTake)
    }
}
