//! The economy engine: wires the store, clock, config and RNG streams
//! together and routes commands to their components.
//!
//! Concurrency model: the engine is driven from a single thread (one
//! dispatch or accrual run at a time); within a dispatch, every balance
//! mutation is a conditional single-row update or a store transaction,
//! so no funds check is ever separated from the write it guards.

use crate::accrual::{self, AccrualReport};
use crate::assets;
use crate::blackjack::{self, HitOutcome};
use crate::clock::{Clock, ManualClock, SystemClock};
use crate::command::{Command, CommandContext, Outcome};
use crate::config::EconConfig;
use crate::error::EconResult;
use crate::games;
use crate::ledger;
use crate::risk;
use crate::rng::{GameRng, RngBank, RngSlot};
use crate::store::EconStore;

/// One live RNG stream per chance-based component. Created once at
/// build and consumed statefully across the engine's lifetime.
struct RngStreams {
    coinflip: GameRng,
    slots: GameRng,
    blackjack: GameRng,
    risk: GameRng,
}

impl RngStreams {
    fn from_bank(bank: &RngBank) -> Self {
        Self {
            coinflip: bank.for_slot(RngSlot::Coinflip),
            slots: bank.for_slot(RngSlot::Slots),
            blackjack: bank.for_slot(RngSlot::Blackjack),
            risk: bank.for_slot(RngSlot::Risk),
        }
    }
}

pub struct EconEngine {
    store: EconStore,
    cfg: EconConfig,
    clock: Box<dyn Clock>,
    rngs: RngStreams,
}

impl EconEngine {
    /// Build a fully wired engine: migrates the schema and seeds the
    /// asset catalog if the store is empty.
    pub fn build(
        store: EconStore,
        cfg: EconConfig,
        seed: u64,
        clock: Box<dyn Clock>,
    ) -> EconResult<Self> {
        store.migrate()?;
        store.seed_assets_if_empty(&assets::CATALOG_TIERS)?;
        let bank = RngBank::new(seed);
        Ok(Self {
            store,
            cfg,
            clock,
            rngs: RngStreams::from_bank(&bank),
        })
    }

    /// In-memory engine on a hand-driven clock, for tests. The returned
    /// clock handle shares its instant with the engine's copy.
    pub fn build_test(seed: u64) -> EconResult<(Self, ManualClock)> {
        let clock = ManualClock::new(1_700_000_000_000);
        let engine = Self::build(
            EconStore::in_memory()?,
            EconConfig::default(),
            seed,
            Box::new(clock.clone()),
        )?;
        Ok((engine, clock))
    }

    /// Production engine on the system clock.
    pub fn build_system(store: EconStore, cfg: EconConfig, seed: u64) -> EconResult<Self> {
        Self::build(store, cfg, seed, Box::new(SystemClock))
    }

    pub fn store(&self) -> &EconStore {
        &self.store
    }

    pub fn config(&self) -> &EconConfig {
        &self.cfg
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Execute one command on behalf of `ctx.actor`. Domain errors come
    /// back as `Err` for the transport layer to render; none are fatal.
    pub fn dispatch(&mut self, ctx: &CommandContext, command: Command) -> EconResult<Outcome> {
        let now = self.clock.now_ms();
        let store = &self.store;
        let cfg = &self.cfg;
        let actor = ctx.actor.as_str();
        log::debug!("dispatch actor={actor} command={command:?}");

        match command {
            Command::Balance => Ok(Outcome::Balance(ledger::balance(store, actor)?)),
            Command::Daily => Ok(Outcome::Claimed(ledger::claim_daily(store, cfg, actor, now)?)),
            Command::Monthly => {
                Ok(Outcome::Claimed(ledger::claim_monthly(store, cfg, actor, now)?))
            }
            Command::Coinflip { wager } => Ok(Outcome::Coinflip(games::coinflip(
                store,
                &mut self.rngs.coinflip,
                actor,
                wager,
            )?)),
            Command::Slots { wager } => Ok(Outcome::Slots(games::slots(
                store,
                &mut self.rngs.slots,
                actor,
                wager,
            )?)),
            Command::Shop => Ok(Outcome::Shop(assets::catalog(store)?)),
            Command::Buy { asset_id } => {
                let asset = assets::purchase(store, actor, asset_id)?;
                let income_per_hour = assets::hourly_income(store, actor)?;
                Ok(Outcome::Bought {
                    asset,
                    income_per_hour,
                })
            }
            Command::MyBusinesses => {
                let (holdings, income_per_hour) = assets::portfolio(store, actor)?;
                Ok(Outcome::Portfolio {
                    holdings,
                    income_per_hour,
                })
            }
            Command::Upgrade { asset_id } => {
                Ok(Outcome::Upgraded(assets::upgrade(store, actor, asset_id)?))
            }
            Command::AddMoney { target, amount } => {
                let new_liquid = ledger::add_money(store, ctx.privileged, &target, amount)?;
                Ok(Outcome::MoneyAdded { target, new_liquid })
            }
            Command::Pay { target, amount } => {
                let remaining_liquid = ledger::pay(store, actor, &target, amount)?;
                Ok(Outcome::Paid {
                    target,
                    remaining_liquid,
                })
            }
            Command::Blackjack { wager } => Ok(Outcome::BlackjackTable(blackjack::start(
                store,
                &mut self.rngs.blackjack,
                actor,
                wager,
                now,
            )?)),
            Command::Hit => {
                match blackjack::hit(store, &mut self.rngs.blackjack, actor, now)? {
                    HitOutcome::Continue(view) => Ok(Outcome::BlackjackTable(view)),
                    HitOutcome::Bust(round) => Ok(Outcome::BlackjackResolved(round)),
                }
            }
            Command::Stand => Ok(Outcome::BlackjackResolved(blackjack::stand(
                store,
                &mut self.rngs.blackjack,
                actor,
            )?)),
            Command::BuyItem { item } => Ok(Outcome::ItemBought(ledger::buy_item(
                store, cfg, actor, item, now,
            )?)),
            Command::Deposit { amount } => {
                Ok(Outcome::Bank(ledger::deposit(store, actor, amount)?))
            }
            Command::Withdraw { amount } => {
                Ok(Outcome::Bank(ledger::withdraw(store, actor, amount)?))
            }
            Command::Rob { target } => Ok(Outcome::Risk(risk::petty_theft(
                store,
                cfg,
                &mut self.rngs.risk,
                actor,
                &target,
                now,
            )?)),
            Command::BankRob { target } => Ok(Outcome::Risk(risk::vault_heist(
                store,
                cfg,
                &mut self.rngs.risk,
                actor,
                &target,
                now,
            )?)),
            Command::Leaderboard => Ok(Outcome::Leaderboard(ledger::leaderboard(store)?)),
        }
    }

    /// One accrual run at the current clock instant. Idempotent when no
    /// whole hour has elapsed; callers trigger it on a fixed interval.
    pub fn accrual_tick(&self) -> EconResult<AccrualReport> {
        accrual::run_cycle(&self.store, &self.cfg, self.clock.now_ms())
    }
}
