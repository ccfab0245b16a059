//! Shared primitive types used across the entire engine.

/// A stable, opaque identifier for one community member.
pub type ParticipantId = String;

/// Catalog id of a purchasable income-generating asset.
pub type AssetId = i64;

/// A wall-clock instant in unix milliseconds.
pub type Millis = i64;

pub const SECOND_MS: Millis = 1_000;
pub const MINUTE_MS: Millis = 60 * SECOND_MS;
pub const HOUR_MS: Millis = 60 * MINUTE_MS;
pub const DAY_MS: Millis = 24 * HOUR_MS;
