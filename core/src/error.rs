use crate::types::{AssetId, Millis};
use thiserror::Error;

/// Everything that can go wrong inside the engine. The domain variants are
/// all recoverable: the command boundary turns them into user-visible
/// messages and the process carries on.
#[derive(Error, Debug)]
pub enum EconError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("invalid target")]
    InvalidTarget,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("asset {0} not found")]
    AssetNotFound(AssetId),

    #[error("asset not owned")]
    NotOwned,

    #[error("asset already at max level")]
    MaxLevelReached,

    #[error("item already owned")]
    AlreadyOwned,

    #[error("a game session is already active")]
    SessionAlreadyActive,

    #[error("no active game session")]
    NoActiveSession,

    #[error("on cooldown for another {remaining_ms} ms")]
    OnCooldown { remaining_ms: Millis },

    #[error("operative role required")]
    WrongRole,

    #[error("no protected account")]
    NoProtectedAccount,

    #[error("permission denied")]
    PermissionDenied,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EconResult<T> = Result<T, EconError>;
