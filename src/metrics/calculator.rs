//! Calculator for per-wallet copy performance: win rate, drawdown, Sharpe, etc.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use statrs::statistics::Statistics;

use crate::models::{CopiedTrade, TradeStatus, WalletPerformance};

/// Calculator for computing wallet performance metrics.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Calculate metrics from the copies made for `address`.
    ///
    /// Trades belonging to other wallets are ignored. Closed trades are
    /// taken in creation order to build the cumulative P&L curve.
    pub fn calculate<'a, I>(address: &str, trades: I) -> WalletPerformance
    where
        I: IntoIterator<Item = &'a CopiedTrade>,
    {
        let mut metrics = WalletPerformance::new(address.to_string());
        let mut pnls = Vec::new();
        let mut wins = 0u32;

        for trade in trades.into_iter().filter(|t| t.wallet_address == address) {
            metrics.total_volume += trade.copy_amount;
            if trade.is_open() {
                metrics.open_trades += 1;
                continue;
            }
            if let Some(pnl) = trade.pnl {
                pnls.push(pnl);
                if trade.status == TradeStatus::ClosedProfit {
                    wins += 1;
                }
            }
        }

        if !pnls.is_empty() {
            metrics.closed_trades = pnls.len() as u32;
            metrics.winning_trades = wins;
            metrics.losing_trades = metrics.closed_trades - wins;
            metrics.win_rate = wins as f64 / pnls.len() as f64;
            Self::calculate_pnl_metrics(&mut metrics, &pnls);
        }

        metrics.calculated_at = Utc::now();
        metrics
    }

    /// Average win/loss, profit factor and expectancy.
    ///
    /// Wins and losses are split on the sign of the P&L; the reported win
    /// rate still follows the executor's win flag.
    fn calculate_pnl_metrics(metrics: &mut WalletPerformance, pnls: &[Decimal]) {
        let (gains, losses): (Vec<Decimal>, Vec<Decimal>) =
            pnls.iter().copied().partition(|&p| p > Decimal::ZERO);

        metrics.total_pnl = pnls.iter().copied().sum();

        if !gains.is_empty() {
            metrics.avg_win = gains.iter().copied().sum::<Decimal>()
                / Decimal::from(gains.len() as u32);
        }
        if !losses.is_empty() {
            metrics.avg_loss = losses.iter().map(|l| l.abs()).sum::<Decimal>()
                / Decimal::from(losses.len() as u32);
        }

        let gross_profit: Decimal = gains.iter().copied().sum();
        let gross_loss: Decimal = losses.iter().map(|l| l.abs()).sum();
        if gross_loss > Decimal::ZERO {
            metrics.profit_factor =
                gross_profit.to_f64().unwrap_or(0.0) / gross_loss.to_f64().unwrap_or(1.0);
        }

        metrics.expectancy = metrics.total_pnl / Decimal::from(pnls.len() as u32);

        Self::calculate_drawdown(metrics, pnls);
        Self::calculate_sharpe(metrics, pnls);
    }

    /// Maximum drawdown of the cumulative P&L curve.
    fn calculate_drawdown(metrics: &mut WalletPerformance, pnls: &[Decimal]) {
        let mut equity = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut max_dd = Decimal::ZERO;
        let mut max_dd_pct = 0.0f64;

        for pnl in pnls {
            equity += pnl;

            if equity > peak {
                peak = equity;
            }

            let dd = peak - equity;
            if dd > max_dd {
                max_dd = dd;
            }

            if peak > Decimal::ZERO {
                let dd_pct = dd.to_f64().unwrap_or(0.0) / peak.to_f64().unwrap_or(1.0);
                if dd_pct > max_dd_pct {
                    max_dd_pct = dd_pct;
                }
            }
        }

        metrics.max_drawdown = max_dd_pct;
        metrics.max_drawdown_abs = max_dd;
        metrics.peak_pnl = peak;
    }

    /// Per-trade Sharpe ratio, zero risk-free rate, not annualised.
    fn calculate_sharpe(metrics: &mut WalletPerformance, pnls: &[Decimal]) {
        if pnls.len() < 2 {
            return;
        }

        let returns: Vec<f64> = pnls.iter().filter_map(|p| p.to_f64()).collect();
        if returns.len() < 2 {
            return;
        }

        let mean = returns.iter().mean();
        let std_dev = returns.iter().std_dev();

        if std_dev > 0.0 {
            metrics.sharpe_ratio = mean / std_dev;
        }
    }
}
