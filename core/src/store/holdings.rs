use super::EconStore;
use crate::assets::{Asset, HoldingView};
use crate::error::EconResult;
use crate::types::AssetId;
use rusqlite::{params, OptionalExtension};

impl EconStore {
    // ── Asset catalog ──────────────────────────────────────────

    /// Seed the catalog exactly once: a no-op whenever any asset row
    /// already exists.
    pub fn seed_assets_if_empty(&self, tiers: &[(&str, i64, i64)]) -> EconResult<()> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM asset", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        self.in_transaction(|store| {
            for (name, price, base_yield) in tiers {
                store.conn.execute(
                    "INSERT INTO asset (name, price, base_yield) VALUES (?1, ?2, ?3)",
                    params![name, price, base_yield],
                )?;
            }
            Ok(())
        })
    }

    pub fn asset(&self, id: AssetId) -> EconResult<Option<Asset>> {
        let asset = self
            .conn
            .query_row(
                "SELECT asset_id, name, price, base_yield FROM asset WHERE asset_id = ?1",
                params![id],
                |row| {
                    Ok(Asset {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        price: row.get(2)?,
                        base_yield: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(asset)
    }

    pub fn all_assets(&self) -> EconResult<Vec<Asset>> {
        let mut stmt = self.conn.prepare(
            "SELECT asset_id, name, price, base_yield FROM asset ORDER BY price ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Asset {
                id: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                base_yield: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Holdings ───────────────────────────────────────────────

    pub fn holdings_of(&self, participant_id: &str) -> EconResult<Vec<HoldingView>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.asset_id, a.name, a.price, a.base_yield, h.qty, h.level
             FROM holding h
             JOIN asset a ON a.asset_id = h.asset_id
             WHERE h.participant_id = ?1
             ORDER BY a.price ASC",
        )?;
        let rows = stmt.query_map(params![participant_id], |row| {
            Ok(HoldingView {
                asset_id: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                base_yield: row.get(3)?,
                qty: row.get(4)?,
                level: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn holding(
        &self,
        participant_id: &str,
        asset_id: AssetId,
    ) -> EconResult<Option<(i64, i64)>> {
        let found = self
            .conn
            .query_row(
                "SELECT qty, level FROM holding
                 WHERE participant_id = ?1 AND asset_id = ?2",
                params![participant_id, asset_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Pay `price` and add one unit of the asset: a new holding starts at
    /// qty 1, level 1; repeat purchases only bump qty. Atomic; returns
    /// false untouched when funds don't cover the price.
    pub fn purchase_holding(
        &self,
        participant_id: &str,
        asset_id: AssetId,
        price: i64,
    ) -> EconResult<bool> {
        self.in_transaction(|store| {
            if !store.try_debit_liquid(participant_id, price)? {
                return Ok(false);
            }
            store.conn.execute(
                "INSERT INTO holding (participant_id, asset_id, qty, level)
                 VALUES (?1, ?2, 1, 1)
                 ON CONFLICT(participant_id, asset_id) DO UPDATE SET qty = qty + 1",
                params![participant_id, asset_id],
            )?;
            Ok(true)
        })
    }

    /// Pay `cost` and raise the holding exactly one level. Atomic;
    /// returns false untouched when funds don't cover the cost.
    pub fn upgrade_holding(
        &self,
        participant_id: &str,
        asset_id: AssetId,
        cost: i64,
    ) -> EconResult<bool> {
        self.in_transaction(|store| {
            if !store.try_debit_liquid(participant_id, cost)? {
                return Ok(false);
            }
            store.conn.execute(
                "UPDATE holding SET level = level + 1
                 WHERE participant_id = ?1 AND asset_id = ?2",
                params![participant_id, asset_id],
            )?;
            Ok(true)
        })
    }

    /// Everyone holding at least one asset — the accrual payout set.
    pub fn distinct_holders(&self) -> EconResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT participant_id FROM holding WHERE qty > 0
             ORDER BY participant_id ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
