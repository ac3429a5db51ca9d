//! Performance summary of the copies we made from one wallet.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance metrics computed from a wallet's closed copied trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPerformance {
    /// Source wallet address
    pub address: String,

    /// When these metrics were calculated
    pub calculated_at: DateTime<Utc>,

    // === Basic Statistics ===
    /// Closed copies
    pub closed_trades: u32,

    /// Copies still pending or active
    pub open_trades: u32,

    /// Sum of copy amounts across all copies
    pub total_volume: Decimal,

    /// Realized P&L across closed copies
    pub total_pnl: Decimal,

    // === Win/Loss Metrics ===
    pub winning_trades: u32,

    pub losing_trades: u32,

    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,

    /// Average P&L of winning closes
    pub avg_win: Decimal,

    /// Average loss of losing closes (absolute value)
    pub avg_loss: Decimal,

    /// Gross profit / gross loss
    pub profit_factor: f64,

    /// Expectancy per closed copy
    pub expectancy: Decimal,

    // === Risk Metrics ===
    /// Maximum drawdown as a fraction of peak cumulative P&L
    pub max_drawdown: f64,

    /// Maximum drawdown in absolute terms
    pub max_drawdown_abs: Decimal,

    /// Peak cumulative P&L
    pub peak_pnl: Decimal,

    /// Mean per-trade P&L over its sample standard deviation
    pub sharpe_ratio: f64,
}

impl WalletPerformance {
    /// Create empty metrics for an address.
    pub fn new(address: String) -> Self {
        Self {
            address,
            calculated_at: Utc::now(),
            closed_trades: 0,
            open_trades: 0,
            total_volume: Decimal::ZERO,
            total_pnl: Decimal::ZERO,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            profit_factor: 0.0,
            expectancy: Decimal::ZERO,
            max_drawdown: 0.0,
            max_drawdown_abs: Decimal::ZERO,
            peak_pnl: Decimal::ZERO,
            sharpe_ratio: 0.0,
        }
    }
}
