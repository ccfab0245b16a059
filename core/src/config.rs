//! Engine tunables. Defaults match the reference community deployment;
//! operators can override any field from a JSON config file.

use crate::types::{Millis, DAY_MS, HOUR_MS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconConfig {
    /// Fixed reward for the daily claim.
    pub daily_reward: i64,
    pub daily_cooldown_ms: Millis,

    /// Fixed reward for the monthly claim.
    pub monthly_reward: i64,
    pub monthly_cooldown_ms: Millis,

    /// Cooldown on the actor after a petty-theft attempt (hit or not).
    pub theft_cooldown_ms: Millis,
    /// Cooldown on the actor after a vault-heist attempt (hit or not).
    pub heist_cooldown_ms: Millis,
    /// How long a purchased shield protects its owner.
    pub shield_duration_ms: Millis,

    /// Stolen fraction band for petty theft, as [low, high] of the
    /// target's liquid balance.
    pub theft_band: (f64, f64),
    /// Stolen fraction band for a vault heist, of the protected balance.
    pub heist_band: (f64, f64),

    /// Hard cap on hourly payout cycles applied in one accrual run.
    /// Bounds the catch-up cost after long downtime.
    pub accrual_max_cycles: i64,

    pub shield_price: i64,
    pub vault_price: i64,
    pub operative_price: i64,
}

impl Default for EconConfig {
    fn default() -> Self {
        Self {
            daily_reward: 200,
            daily_cooldown_ms: DAY_MS,
            monthly_reward: 1_500,
            monthly_cooldown_ms: 30 * DAY_MS,
            theft_cooldown_ms: HOUR_MS,
            heist_cooldown_ms: HOUR_MS,
            shield_duration_ms: HOUR_MS,
            theft_band: (0.10, 0.35),
            heist_band: (0.05, 0.15),
            accrual_max_cycles: 24,
            shield_price: 1_000,
            vault_price: 2_500,
            operative_price: 10_000,
        }
    }
}

impl EconConfig {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = EconConfig::default();
        assert_eq!(cfg.daily_reward, 200);
        assert_eq!(cfg.monthly_reward, 1_500);
        assert_eq!(cfg.theft_cooldown_ms, HOUR_MS);
        assert_eq!(cfg.accrual_max_cycles, 24);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = EconConfig::from_json(r#"{ "daily_reward": 500 }"#).unwrap();
        assert_eq!(cfg.daily_reward, 500);
        assert_eq!(cfg.monthly_reward, 1_500);
    }
}
