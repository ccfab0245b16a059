use super::EconStore;
use crate::error::EconResult;
use crate::ledger::{Participant, Role};
use crate::risk::RiskKind;
use crate::types::Millis;
use rusqlite::{params, OptionalExtension, Row};

fn participant_row_mapper(row: &Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        liquid: row.get(1)?,
        protected: row.get(2)?,
        has_vault: row.get::<_, i32>(3)? != 0,
        role: Role::from_tag(&row.get::<_, String>(4)?),
        shield_until: row.get(5)?,
        theft_cooldown_until: row.get(6)?,
        heist_cooldown_until: row.get(7)?,
        last_daily: row.get(8)?,
        last_monthly: row.get(9)?,
    })
}

const PARTICIPANT_COLS: &str = "participant_id, liquid, protected, has_vault, role,
     shield_until, rob_cd_until, heist_cd_until, last_daily, last_monthly";

impl EconStore {
    // ── Participant ledger ─────────────────────────────────────

    /// Fetch a participant, creating a zero-valued row on first access.
    /// Idempotent: re-running the insert is a no-op.
    pub fn get_or_create_participant(&self, id: &str) -> EconResult<Participant> {
        self.conn.execute(
            "INSERT OR IGNORE INTO participant (participant_id) VALUES (?1)",
            params![id],
        )?;
        let p = self.conn.query_row(
            &format!("SELECT {PARTICIPANT_COLS} FROM participant WHERE participant_id = ?1"),
            params![id],
            participant_row_mapper,
        )?;
        Ok(p)
    }

    pub fn participant(&self, id: &str) -> EconResult<Option<Participant>> {
        let p = self
            .conn
            .query_row(
                &format!("SELECT {PARTICIPANT_COLS} FROM participant WHERE participant_id = ?1"),
                params![id],
                participant_row_mapper,
            )
            .optional()?;
        Ok(p)
    }

    /// Unconditional credit to the liquid balance.
    pub fn credit_liquid(&self, id: &str, amount: i64) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET liquid = liquid + ?1 WHERE participant_id = ?2",
            params![amount, id],
        )?;
        Ok(())
    }

    /// Conditional debit: only applies if the balance covers it.
    /// Returns false (and mutates nothing) otherwise. The guard runs
    /// inside the UPDATE, so a concurrent writer cannot slip between
    /// the check and the subtraction.
    pub fn try_debit_liquid(&self, id: &str, amount: i64) -> EconResult<bool> {
        let changed = self.conn.execute(
            "UPDATE participant SET liquid = liquid - ?1
             WHERE participant_id = ?2 AND liquid >= ?1",
            params![amount, id],
        )?;
        Ok(changed == 1)
    }

    /// Move liquid funds between two participants. Atomic: either both
    /// rows change or neither does.
    pub fn transfer_liquid(&self, from: &str, to: &str, amount: i64) -> EconResult<bool> {
        self.in_transaction(|store| {
            if !store.try_debit_liquid(from, amount)? {
                return Ok(false);
            }
            store.credit_liquid(to, amount)?;
            Ok(true)
        })
    }

    /// liquid → protected. Fails (false) if liquid < amount.
    pub fn deposit_protected(&self, id: &str, amount: i64) -> EconResult<bool> {
        let changed = self.conn.execute(
            "UPDATE participant SET liquid = liquid - ?1, protected = protected + ?1
             WHERE participant_id = ?2 AND liquid >= ?1",
            params![amount, id],
        )?;
        Ok(changed == 1)
    }

    /// protected → liquid. Fails (false) if protected < amount.
    pub fn withdraw_protected(&self, id: &str, amount: i64) -> EconResult<bool> {
        let changed = self.conn.execute(
            "UPDATE participant SET liquid = liquid + ?1, protected = protected - ?1
             WHERE participant_id = ?2 AND protected >= ?1",
            params![amount, id],
        )?;
        Ok(changed == 1)
    }

    /// Credit the daily reward and stamp the claim in one statement.
    pub fn apply_daily_claim(&self, id: &str, reward: i64, now: Millis) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET liquid = liquid + ?1, last_daily = ?2
             WHERE participant_id = ?3",
            params![reward, now, id],
        )?;
        Ok(())
    }

    pub fn apply_monthly_claim(&self, id: &str, reward: i64, now: Millis) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET liquid = liquid + ?1, last_monthly = ?2
             WHERE participant_id = ?3",
            params![reward, now, id],
        )?;
        Ok(())
    }

    // ── Purchasable statuses ───────────────────────────────────

    pub fn set_shield_until(&self, id: &str, until: Millis) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET shield_until = ?1 WHERE participant_id = ?2",
            params![until, id],
        )?;
        Ok(())
    }

    pub fn set_has_vault(&self, id: &str, has: bool) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET has_vault = ?1 WHERE participant_id = ?2",
            params![if has { 1 } else { 0 }, id],
        )?;
        Ok(())
    }

    pub fn set_role(&self, id: &str, role: Role) -> EconResult<()> {
        self.conn.execute(
            "UPDATE participant SET role = ?1 WHERE participant_id = ?2",
            params![role.tag(), id],
        )?;
        Ok(())
    }

    // ── Risk-action bookkeeping ────────────────────────────────

    /// Start the actor's cooldown for one risk-action kind. Called on
    /// every attempt, including blocked and empty-handed ones.
    pub fn set_risk_cooldown(&self, id: &str, kind: RiskKind, until: Millis) -> EconResult<()> {
        let sql = match kind {
            RiskKind::Theft => {
                "UPDATE participant SET rob_cd_until = ?1 WHERE participant_id = ?2"
            }
            RiskKind::Heist => {
                "UPDATE participant SET heist_cd_until = ?1 WHERE participant_id = ?2"
            }
        };
        self.conn.execute(sql, params![until, id])?;
        Ok(())
    }

    /// Move a stolen amount from the target's attacked balance to the
    /// actor's liquid balance and start the actor's cooldown, atomically.
    /// Returns false without mutating anything if the target's balance
    /// no longer covers the amount.
    pub fn apply_risk_hit(
        &self,
        actor: &str,
        target: &str,
        kind: RiskKind,
        amount: i64,
        cooldown_until: Millis,
    ) -> EconResult<bool> {
        self.in_transaction(|store| {
            let debit_sql = match kind {
                RiskKind::Theft => {
                    "UPDATE participant SET liquid = liquid - ?1
                     WHERE participant_id = ?2 AND liquid >= ?1"
                }
                RiskKind::Heist => {
                    "UPDATE participant SET protected = protected - ?1
                     WHERE participant_id = ?2 AND protected >= ?1"
                }
            };
            let changed = store.conn.execute(debit_sql, params![amount, target])?;
            if changed != 1 {
                return Ok(false);
            }
            store.credit_liquid(actor, amount)?;
            store.set_risk_cooldown(actor, kind, cooldown_until)?;
            Ok(true)
        })
    }

    // ── Leaderboard ────────────────────────────────────────────

    /// Top-n liquid balances, descending. Ties break by arrival order
    /// (rowid reflects first-reference order and rows are never deleted).
    pub fn top_balances(&self, n: usize) -> EconResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT participant_id, liquid FROM participant
             ORDER BY liquid DESC, rowid ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![n as i64], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
