//! SQLite persistence layer.
//!
//! RULE: Only the store modules talk to the database. Engine components
//! call store methods — they never execute SQL directly.
//!
//! Balance arithmetic is evaluated *inside* SQLite (`SET liquid = liquid
//! + ?`) and funds checks are conditional updates (`WHERE liquid >= ?`),
//! so every mutation is one atomic read-modify-write against a single
//! participant row. Multi-row units (transfers, purchases, accrual) run
//! inside one transaction.

use crate::error::EconResult;
use crate::types::Millis;
use rusqlite::{params, Connection, OptionalExtension};

mod holdings;
mod participant;
mod session;

pub use session::StoredSession;

pub struct EconStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl EconStore {
    pub fn open(path: &str) -> EconResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// The on-disk database path, or None for an in-memory store.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EconResult<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Run `f` inside one SQLite transaction. Commits on Ok, rolls back
    /// on Err. Store calls made by `f` share the connection and therefore
    /// join the transaction.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> EconResult<T>) -> EconResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    // ── Meta / accrual checkpoint ──────────────────────────────

    pub fn meta_get(&self, key: &str) -> EconResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM econ_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn meta_set(&self, key: &str, value: &str) -> EconResult<()> {
        self.conn.execute(
            "INSERT INTO econ_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// The accrual checkpoint: the instant up to which passive income has
    /// been paid out. None until the first engine run establishes it.
    pub fn last_payout_at(&self) -> EconResult<Option<Millis>> {
        Ok(self
            .meta_get("last_payout_at")?
            .and_then(|v| v.parse().ok()))
    }

    pub fn set_last_payout_at(&self, at: Millis) -> EconResult<()> {
        self.meta_set("last_payout_at", &at.to_string())
    }
}
