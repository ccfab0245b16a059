//! Participant ledger operations: balances, timed claims, transfers,
//! protected-account moves, and purchasable statuses.
//!
//! Every mutation here routes through one conditional store statement, so
//! a funds check can never be separated from the write it guards.

use crate::config::EconConfig;
use crate::error::{EconError, EconResult};
use crate::store::EconStore;
use crate::types::{Millis, ParticipantId};
use serde::{Deserialize, Serialize};

/// One participant's durable ledger record. Created lazily on first
/// reference, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub liquid: i64,
    pub protected: i64,
    pub has_vault: bool,
    pub role: Role,
    pub shield_until: Millis,
    pub theft_cooldown_until: Millis,
    pub heist_cooldown_until: Millis,
    pub last_daily: Millis,
    pub last_monthly: Millis,
}

impl Participant {
    pub fn shield_active(&self, now: Millis) -> bool {
        self.shield_until > now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    None,
    Operative,
}

impl Role {
    pub fn tag(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Operative => "operative",
        }
    }

    pub fn from_tag(tag: &str) -> Role {
        match tag {
            "operative" => Role::Operative,
            _ => Role::None,
        }
    }
}

/// Purchasable statuses sold through `buyitem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Shield,
    ProtectedAccount,
    OperativeRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimReceipt {
    pub reward: i64,
    pub new_liquid: i64,
}

pub fn balance(store: &EconStore, actor: &str) -> EconResult<Participant> {
    store.get_or_create_participant(actor)
}

pub fn claim_daily(
    store: &EconStore,
    cfg: &EconConfig,
    actor: &str,
    now: Millis,
) -> EconResult<ClaimReceipt> {
    let p = store.get_or_create_participant(actor)?;
    let elapsed = now - p.last_daily;
    if elapsed < cfg.daily_cooldown_ms {
        return Err(EconError::OnCooldown {
            remaining_ms: cfg.daily_cooldown_ms - elapsed,
        });
    }
    store.apply_daily_claim(actor, cfg.daily_reward, now)?;
    Ok(ClaimReceipt {
        reward: cfg.daily_reward,
        new_liquid: p.liquid + cfg.daily_reward,
    })
}

pub fn claim_monthly(
    store: &EconStore,
    cfg: &EconConfig,
    actor: &str,
    now: Millis,
) -> EconResult<ClaimReceipt> {
    let p = store.get_or_create_participant(actor)?;
    let elapsed = now - p.last_monthly;
    if elapsed < cfg.monthly_cooldown_ms {
        return Err(EconError::OnCooldown {
            remaining_ms: cfg.monthly_cooldown_ms - elapsed,
        });
    }
    store.apply_monthly_claim(actor, cfg.monthly_reward, now)?;
    Ok(ClaimReceipt {
        reward: cfg.monthly_reward,
        new_liquid: p.liquid + cfg.monthly_reward,
    })
}

/// Peer-to-peer transfer. Self-payments and empty targets are rejected;
/// the target record is created on first reference like any other read.
pub fn pay(store: &EconStore, actor: &str, target: &str, amount: i64) -> EconResult<i64> {
    if target.is_empty() || target == actor {
        return Err(EconError::InvalidTarget);
    }
    if amount <= 0 {
        return Err(EconError::InvalidAmount);
    }
    let sender = store.get_or_create_participant(actor)?;
    store.get_or_create_participant(target)?;
    if !store.transfer_liquid(actor, target, amount)? {
        return Err(EconError::InsufficientFunds {
            needed: amount,
            available: sender.liquid,
        });
    }
    Ok(sender.liquid - amount)
}

/// Privileged credit. The transport layer decides who is privileged; the
/// engine only enforces the flag.
pub fn add_money(
    store: &EconStore,
    privileged: bool,
    target: &str,
    amount: i64,
) -> EconResult<i64> {
    if !privileged {
        return Err(EconError::PermissionDenied);
    }
    if amount <= 0 {
        return Err(EconError::InvalidAmount);
    }
    if target.is_empty() {
        return Err(EconError::InvalidTarget);
    }
    let before = store.get_or_create_participant(target)?;
    store.credit_liquid(target, amount)?;
    Ok(before.liquid + amount)
}

/// liquid → protected. Requires a protected account.
pub fn deposit(store: &EconStore, actor: &str, amount: i64) -> EconResult<Participant> {
    let p = store.get_or_create_participant(actor)?;
    if !p.has_vault {
        return Err(EconError::NoProtectedAccount);
    }
    if amount <= 0 {
        return Err(EconError::InvalidAmount);
    }
    if !store.deposit_protected(actor, amount)? {
        return Err(EconError::InvalidAmount);
    }
    store
        .participant(actor)?
        .ok_or_else(|| anyhow::anyhow!("participant vanished mid-deposit").into())
}

/// protected → liquid. Requires a protected account.
pub fn withdraw(store: &EconStore, actor: &str, amount: i64) -> EconResult<Participant> {
    let p = store.get_or_create_participant(actor)?;
    if !p.has_vault {
        return Err(EconError::NoProtectedAccount);
    }
    if amount <= 0 {
        return Err(EconError::InvalidAmount);
    }
    if !store.withdraw_protected(actor, amount)? {
        return Err(EconError::InvalidAmount);
    }
    store
        .participant(actor)?
        .ok_or_else(|| anyhow::anyhow!("participant vanished mid-withdraw").into())
}

/// Buy a status item. Shields stack onto any remaining cover; one-shot
/// flags (protected account, operative role) reject a re-purchase before
/// any money moves.
pub fn buy_item(
    store: &EconStore,
    cfg: &EconConfig,
    actor: &str,
    item: Item,
    now: Millis,
) -> EconResult<Participant> {
    let p = store.get_or_create_participant(actor)?;
    let price = match item {
        Item::Shield => cfg.shield_price,
        Item::ProtectedAccount => cfg.vault_price,
        Item::OperativeRole => cfg.operative_price,
    };
    match item {
        Item::ProtectedAccount if p.has_vault => return Err(EconError::AlreadyOwned),
        Item::OperativeRole if p.role == Role::Operative => {
            return Err(EconError::AlreadyOwned)
        }
        _ => {}
    }
    store.in_transaction(|store| {
        if !store.try_debit_liquid(actor, price)? {
            return Err(EconError::InsufficientFunds {
                needed: price,
                available: p.liquid,
            });
        }
        match item {
            Item::Shield => {
                let base = p.shield_until.max(now);
                store.set_shield_until(actor, base + cfg.shield_duration_ms)?;
            }
            Item::ProtectedAccount => store.set_has_vault(actor, true)?,
            Item::OperativeRole => store.set_role(actor, Role::Operative)?,
        }
        Ok(())
    })?;
    store
        .participant(actor)?
        .ok_or_else(|| anyhow::anyhow!("participant vanished mid-purchase").into())
}

/// Top-10 liquid balances, descending, ties by arrival order.
pub fn leaderboard(store: &EconStore) -> EconResult<Vec<(ParticipantId, i64)>> {
    store.top_balances(10)
}
