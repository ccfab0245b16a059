//! coinden-core — the Coin Den economy engine.
//!
//! A persistent virtual-economy and mini-game engine for a chat community:
//! per-participant currency ledgers, passive income from owned assets,
//! chance-based wagering games, and cooldown-gated adversarial actions.
//!
//! The chat transport, command registration and text rendering live outside
//! this crate; callers hand a [`command::Command`] to the
//! [`engine::EconEngine`] and render the returned [`command::Outcome`].

pub mod accrual;
pub mod assets;
pub mod blackjack;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod ledger;
pub mod risk;
pub mod rng;
pub mod store;
pub mod types;
