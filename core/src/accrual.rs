//! Passive-income accrual: turns elapsed wall-clock hours into payouts.
//!
//! The engine runs on an external periodic trigger and owns a single
//! monotonic checkpoint (`last_payout_at` in the store meta table). The
//! payout is a pure function of elapsed whole hours, so the trigger can
//! fire at arbitrary, irregular intervals: a run with no whole hour
//! elapsed mutates nothing at all.

use crate::assets;
use crate::config::EconConfig;
use crate::error::EconResult;
use crate::store::EconStore;
use crate::types::{Millis, HOUR_MS};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccrualReport {
    /// Hourly cycles paid out this run (0..=cap).
    pub cycles: i64,
    /// Participants credited.
    pub holders_paid: usize,
    /// Total coins minted across all holders.
    pub total_paid: i64,
}

impl AccrualReport {
    fn noop() -> Self {
        Self {
            cycles: 0,
            holders_paid: 0,
            total_paid: 0,
        }
    }
}

/// One accrual run. Payout application and checkpoint advance commit as
/// a single transaction: a failed run leaves the checkpoint where it
/// was and the next trigger re-derives the same payout.
pub fn run_cycle(store: &EconStore, cfg: &EconConfig, now: Millis) -> EconResult<AccrualReport> {
    let last = match store.last_payout_at()? {
        Some(last) => last,
        None => {
            // First run establishes the baseline; nobody is paid for
            // time before the engine existed.
            store.set_last_payout_at(now)?;
            log::info!("accrual baseline established at {now}");
            return Ok(AccrualReport::noop());
        }
    };

    let elapsed_hours = (now - last).max(0) / HOUR_MS;
    let cycles = elapsed_hours.clamp(0, cfg.accrual_max_cycles);
    if cycles == 0 {
        return Ok(AccrualReport::noop());
    }

    store.in_transaction(|store| {
        let mut holders_paid = 0usize;
        let mut total_paid = 0i64;
        for holder in store.distinct_holders()? {
            let per_hour = assets::hourly_income(store, &holder)?;
            if per_hour <= 0 {
                continue;
            }
            let payout = per_hour * cycles;
            store.credit_liquid(&holder, payout)?;
            holders_paid += 1;
            total_paid += payout;
        }
        // Advance by exactly `cycles` whole hours, not to `now`: the
        // sub-hour remainder keeps accumulating toward the next cycle.
        store.set_last_payout_at(last + cycles * HOUR_MS)?;
        log::debug!("accrual: {cycles} cycle(s), {holders_paid} holder(s), {total_paid} paid");
        Ok(AccrualReport {
            cycles,
            holders_paid,
            total_paid,
        })
    })
}
