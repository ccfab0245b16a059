//! The closed command surface.
//!
//! The transport layer resolves who issued what and with which target,
//! then hands the engine one of these variants — the core never sees
//! transport-level command names or permission models beyond the
//! `privileged` flag.

use crate::accrual::AccrualReport;
use crate::assets::{Asset, HoldingView, UpgradeReceipt};
use crate::blackjack::{RoundOutcome, TableView};
use crate::games::{CoinflipOutcome, SlotsOutcome};
use crate::ledger::{ClaimReceipt, Item, Participant};
use crate::risk::RiskOutcome;
use crate::types::{AssetId, ParticipantId};
use serde::{Deserialize, Serialize};

/// Who is acting, as resolved by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandContext {
    pub actor: ParticipantId,
    /// Whether the transport granted the caller elevated permissions
    /// (gates `AddMoney` only).
    #[serde(default)]
    pub privileged: bool,
}

/// All participant-issued commands. Variants are appended, never
/// removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Balance,
    Daily,
    Monthly,
    Coinflip { wager: i64 },
    Slots { wager: i64 },
    Shop,
    Buy { asset_id: AssetId },
    MyBusinesses,
    Upgrade { asset_id: AssetId },
    AddMoney { target: ParticipantId, amount: i64 },
    Pay { target: ParticipantId, amount: i64 },
    Blackjack { wager: i64 },
    Hit,
    Stand,
    BuyItem { item: Item },
    Deposit { amount: i64 },
    Withdraw { amount: i64 },
    Rob { target: ParticipantId },
    BankRob { target: ParticipantId },
    Leaderboard,
}

/// What a successfully executed command produced. The transport layer
/// renders these into user-visible text.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Balance(Participant),
    Claimed(ClaimReceipt),
    Coinflip(CoinflipOutcome),
    Slots(SlotsOutcome),
    Shop(Vec<Asset>),
    Bought { asset: Asset, income_per_hour: i64 },
    Portfolio { holdings: Vec<HoldingView>, income_per_hour: i64 },
    Upgraded(UpgradeReceipt),
    MoneyAdded { target: ParticipantId, new_liquid: i64 },
    Paid { target: ParticipantId, remaining_liquid: i64 },
    BlackjackTable(TableView),
    BlackjackResolved(RoundOutcome),
    ItemBought(Participant),
    Bank(Participant),
    Risk(RiskOutcome),
    Leaderboard(Vec<(ParticipantId, i64)>),
    Accrual(AccrualReport),
}
