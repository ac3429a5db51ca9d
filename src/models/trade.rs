//! Copied trade model: our mirror of a signal wallet's trade.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Self::Buy
        } else {
            Self::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "BUY",
            TradeDirection::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a copied trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    /// Created, waiting for the executor
    Pending,
    /// Executor confirmed the position is open
    Active,
    ClosedProfit,
    ClosedLoss,
}

impl TradeStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, TradeStatus::Pending | TradeStatus::Active)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Active => "active",
            TradeStatus::ClosedProfit => "closed_profit",
            TradeStatus::ClosedLoss => "closed_loss",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copied trade identifier: `<wallet address>-<per-wallet sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn new(wallet_address: &str, sequence: u64) -> Self {
        Self(format!("{}-{}", wallet_address, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TradeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a copied trade reported by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOutcome {
    pub is_win: bool,
    pub pnl: Decimal,
    pub exit_price: Decimal,
}

impl TradeOutcome {
    pub fn win(pnl: Decimal, exit_price: Decimal) -> Self {
        Self { is_win: true, pnl, exit_price }
    }

    pub fn loss(pnl: Decimal, exit_price: Decimal) -> Self {
        Self { is_win: false, pnl, exit_price }
    }
}

/// A trade we mirrored from a tracked wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedTrade {
    pub id: TradeId,

    /// Source wallet address
    pub wallet_address: String,

    /// Source wallet label at copy time
    pub wallet_label: String,

    /// Amount the source wallet traded
    pub original_amount: Decimal,

    /// Amount we trade: base copy amount times the wallet's copy ratio
    pub copy_amount: Decimal,

    pub token_mint: String,

    pub direction: TradeDirection,

    pub status: TradeStatus,

    /// Source transaction hash
    pub original_tx: String,

    pub entry_price: Decimal,

    /// Set once on close
    pub exit_price: Option<Decimal>,

    /// Set once on close
    pub pnl: Option<Decimal>,

    pub created_at: DateTime<Utc>,

    /// Set once on close
    pub closed_at: Option<DateTime<Utc>>,
}

impl CopiedTrade {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Short token mint for log lines.
    pub fn short_mint(&self) -> &str {
        let end = self
            .token_mint
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.token_mint.len());
        &self.token_mint[..end]
    }

    /// Move a pending trade to active. Returns false if it was not pending.
    pub(crate) fn activate(&mut self) -> bool {
        if self.status != TradeStatus::Pending {
            return false;
        }
        self.status = TradeStatus::Active;
        true
    }

    /// Apply the closing outcome. Returns false, leaving the trade untouched,
    /// if it is already closed.
    pub(crate) fn close(&mut self, outcome: &TradeOutcome, at: DateTime<Utc>) -> bool {
        if self.status.is_closed() {
            return false;
        }
        self.status = if outcome.is_win {
            TradeStatus::ClosedProfit
        } else {
            TradeStatus::ClosedLoss
        };
        self.exit_price = Some(outcome.exit_price);
        self.pnl = Some(outcome.pnl);
        self.closed_at = Some(at);
        true
    }
}
