//! Read-only statistics over the copy-trading state.

use tracing::info;

use crate::error::{CopyError, CopyResult};
use crate::metrics::MetricsCalculator;
use crate::models::{CopiedTrade, StatsSnapshot, TradeId, WalletPerformance, WalletStats};

use super::CopyContext;

/// Snapshots and per-wallet reports. Nothing here mutates state except
/// [`StatsReporter::reset_daily_stats`].
pub struct StatsReporter;

impl StatsReporter {
    pub fn get_stats(ctx: &CopyContext) -> StatsSnapshot {
        let stats = &ctx.stats;
        StatsSnapshot {
            total_copied_trades: stats.total_copied_trades,
            successful_trades: stats.successful_trades,
            failed_trades: stats.failed_trades,
            total_profit: stats.total_profit,
            total_tracked_wallets: ctx.registry.len(),
            active_copies_count: ctx.trades.open_total(),
            tracked_wallets: ctx.registry.list().cloned().collect(),
        }
    }

    pub fn get_wallet_stats(ctx: &CopyContext, address: &str) -> CopyResult<WalletStats> {
        ctx.registry.get_wallet_stats(address).cloned()
    }

    /// Zero every wallet's per-period counters. Global counters and trade
    /// history are left as they are.
    pub fn reset_daily_stats(ctx: &mut CopyContext) {
        ctx.registry.reset_stats();
        info!(wallets = ctx.registry.len(), "Daily wallet stats reset");
    }

    /// All copied trades in creation order.
    pub fn trades(ctx: &CopyContext) -> Vec<CopiedTrade> {
        ctx.trades.iter().cloned().collect()
    }

    pub fn trade(ctx: &CopyContext, id: &TradeId) -> CopyResult<CopiedTrade> {
        ctx.trades.get(id).cloned()
    }

    /// Copies still waiting for the executor.
    pub fn pending_trades(ctx: &CopyContext) -> Vec<CopiedTrade> {
        ctx.trades.pending().cloned().collect()
    }

    /// Performance of the copies made from one wallet. Wallets removed from
    /// tracking can still be reported while their trades remain.
    pub fn wallet_performance(ctx: &CopyContext, address: &str) -> CopyResult<WalletPerformance> {
        let has_history = ctx.trades.iter().any(|t| t.wallet_address == address);
        if !has_history && !ctx.registry.contains(address) {
            return Err(CopyError::WalletNotFound(address.to_string()));
        }
        Ok(MetricsCalculator::calculate(address, ctx.trades.iter()))
    }
}
