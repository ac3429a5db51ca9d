//! Global counters and reporting snapshots.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wallet::TrackedWallet;

/// Process-wide counters. Only ever incremented (profit may go negative).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_copied_trades: u64,
    pub successful_trades: u64,
    /// Losing closes plus processing failures
    pub failed_trades: u64,
    pub total_profit: Decimal,
}

/// Read-only view returned by the stats reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_copied_trades: u64,
    pub successful_trades: u64,
    pub failed_trades: u64,
    pub total_profit: Decimal,
    pub total_tracked_wallets: usize,
    /// Pending plus active copies
    pub active_copies_count: usize,
    pub tracked_wallets: Vec<TrackedWallet>,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Copy Trading Statistics ===")?;
        writeln!(f, "Copied Trades:   {}", self.total_copied_trades)?;
        writeln!(f, "Successful:      {}", self.successful_trades)?;
        writeln!(f, "Failed:          {}", self.failed_trades)?;
        writeln!(f, "Total Profit:    {}", self.total_profit)?;
        writeln!(f, "Tracked Wallets: {}", self.total_tracked_wallets)?;
        writeln!(f, "Open Copies:     {}", self.active_copies_count)?;

        if !self.tracked_wallets.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "{:<16} {:>8} {:>6} {:>6} {:>6} {:>7} {:>12}",
                "LABEL", "ENABLED", "COPIED", "WINS", "LOSSES", "WIN%", "PNL"
            )?;
            writeln!(f, "{}", "-".repeat(68))?;
            for w in &self.tracked_wallets {
                let win_rate = w
                    .stats
                    .win_rate()
                    .map(|r| format!("{:.1}%", r * 100.0))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    f,
                    "{:<16} {:>8} {:>6} {:>6} {:>6} {:>7} {:>12}",
                    w.display_name(),
                    if w.enabled { "yes" } else { "no" },
                    w.stats.copied_count,
                    w.stats.win_count,
                    w.stats.loss_count,
                    win_rate,
                    w.stats.total_pnl
                )?;
            }
        }
        Ok(())
    }
}
