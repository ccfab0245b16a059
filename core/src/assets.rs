//! Asset catalog and holdings: purchase, upgrade, and yield math.

use crate::error::{EconError, EconResult};
use crate::store::EconStore;
use crate::types::AssetId;
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: i64 = 10;

/// The five catalog tiers, seeded once into an empty store.
pub const CATALOG_TIERS: [(&str, i64, i64); 5] = [
    ("Lemonade Stand", 500, 30),
    ("Pizzeria", 5_000, 250),
    ("Minimart", 20_000, 900),
    ("Office Tower", 100_000, 5_000),
    ("Banking Group", 500_000, 30_000),
];

/// A purchasable income-generating asset. Immutable after seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub price: i64,
    pub base_yield: i64,
}

/// One participant's position in one asset, joined with its catalog row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingView {
    pub asset_id: AssetId,
    pub name: String,
    pub price: i64,
    pub base_yield: i64,
    pub qty: i64,
    pub level: i64,
}

impl HoldingView {
    pub fn hourly_yield(&self) -> i64 {
        per_asset_yield(self.base_yield, self.qty, self.level)
    }
}

/// Level multiplier: +0.5 per level above 1 (level 1 → ×1.0, 10 → ×5.5).
pub fn multiplier(level: i64) -> f64 {
    1.0 + 0.5 * (level - 1) as f64
}

/// Cost to go from `level` to `level + 1`.
pub fn upgrade_cost(price: i64, level: i64) -> i64 {
    (price as f64 * (level + 1) as f64 * 0.8).floor() as i64
}

/// Hourly yield of a single position. Floored here, per asset — the
/// ledger total must equal the sum of already-floored contributions.
pub fn per_asset_yield(base_yield: i64, qty: i64, level: i64) -> i64 {
    (base_yield as f64 * qty as f64 * multiplier(level)).floor() as i64
}

/// Total passive income per hour across a participant's holdings.
pub fn hourly_income(store: &EconStore, participant_id: &str) -> EconResult<i64> {
    let holdings = store.holdings_of(participant_id)?;
    Ok(holdings.iter().map(|h| h.hourly_yield()).sum())
}

/// Buy one unit of an asset at catalog price.
pub fn purchase(store: &EconStore, actor: &str, asset_id: AssetId) -> EconResult<Asset> {
    let asset = store
        .asset(asset_id)?
        .ok_or(EconError::AssetNotFound(asset_id))?;
    let p = store.get_or_create_participant(actor)?;
    if !store.purchase_holding(actor, asset_id, asset.price)? {
        return Err(EconError::InsufficientFunds {
            needed: asset.price,
            available: p.liquid,
        });
    }
    Ok(asset)
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeReceipt {
    pub asset: Asset,
    pub new_level: i64,
    pub cost: i64,
}

/// Raise an owned holding by exactly one level.
pub fn upgrade(store: &EconStore, actor: &str, asset_id: AssetId) -> EconResult<UpgradeReceipt> {
    let asset = store
        .asset(asset_id)?
        .ok_or(EconError::AssetNotFound(asset_id))?;
    let (qty, level) = store.holding(actor, asset_id)?.unwrap_or((0, 1));
    if qty <= 0 {
        return Err(EconError::NotOwned);
    }
    if level >= MAX_LEVEL {
        return Err(EconError::MaxLevelReached);
    }
    let cost = upgrade_cost(asset.price, level);
    let p = store.get_or_create_participant(actor)?;
    if !store.upgrade_holding(actor, asset_id, cost)? {
        return Err(EconError::InsufficientFunds {
            needed: cost,
            available: p.liquid,
        });
    }
    Ok(UpgradeReceipt {
        asset,
        new_level: level + 1,
        cost,
    })
}

/// The shop listing.
pub fn catalog(store: &EconStore) -> EconResult<Vec<Asset>> {
    store.all_assets()
}

/// A participant's holdings with per-position and total hourly yield.
pub fn portfolio(store: &EconStore, actor: &str) -> EconResult<(Vec<HoldingView>, i64)> {
    let holdings = store.holdings_of(actor)?;
    let total = holdings.iter().map(|h| h.hourly_yield()).sum();
    Ok((holdings, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_endpoints() {
        assert_eq!(multiplier(1), 1.0);
        assert_eq!(multiplier(10), 5.5);
    }

    #[test]
    fn upgrade_cost_reference_value() {
        // 500 × 2 × 0.8
        assert_eq!(upgrade_cost(500, 1), 800);
        assert_eq!(upgrade_cost(5_000, 9), 40_000);
    }

    #[test]
    fn yield_floors_per_position() {
        // 30 × 1 × 1.5 = 45.0; 25 × 1 × 1.5 = 37.5 → 37
        assert_eq!(per_asset_yield(30, 1, 2), 45);
        assert_eq!(per_asset_yield(25, 1, 2), 37);
    }
}
