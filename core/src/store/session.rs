use super::EconStore;
use crate::blackjack::Card;
use crate::error::EconResult;
use crate::types::Millis;
use rusqlite::{params, OptionalExtension};

/// An in-flight blackjack round as persisted. Existence implies active;
/// the row is the single source of truth for the escrowed wager.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub wager: i64,
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

impl EconStore {
    pub fn session_of(&self, participant_id: &str) -> EconResult<Option<StoredSession>> {
        let raw: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT wager, player_hand, dealer_hand FROM session
                 WHERE participant_id = ?1 AND status = 'active'",
                params![participant_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        match raw {
            None => Ok(None),
            Some((wager, player_json, dealer_json)) => Ok(Some(StoredSession {
                wager,
                player: serde_json::from_str(&player_json)?,
                dealer: serde_json::from_str(&dealer_json)?,
            })),
        }
    }

    pub fn put_session(
        &self,
        participant_id: &str,
        session: &StoredSession,
        now: Millis,
    ) -> EconResult<()> {
        self.conn.execute(
            "INSERT INTO session (participant_id, wager, player_hand, dealer_hand, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)
             ON CONFLICT(participant_id) DO UPDATE SET
                wager = excluded.wager,
                player_hand = excluded.player_hand,
                dealer_hand = excluded.dealer_hand,
                status = excluded.status,
                updated_at = excluded.updated_at",
            params![
                participant_id,
                session.wager,
                serde_json::to_string(&session.player)?,
                serde_json::to_string(&session.dealer)?,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn delete_session(&self, participant_id: &str) -> EconResult<()> {
        self.conn.execute(
            "DELETE FROM session WHERE participant_id = ?1",
            params![participant_id],
        )?;
        Ok(())
    }
}
