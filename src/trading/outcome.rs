//! Outcome tracking: applies executor reports to copied trades and stats.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{CopyError, CopyResult};
use crate::models::{CopiedTrade, TradeId, TradeOutcome};

use super::CopyContext;

/// Applies executor reports to copied trades.
pub struct OutcomeTracker;

impl OutcomeTracker {
    /// The executor confirmed the copy is live: pending becomes active.
    pub fn activate(ctx: &mut CopyContext, trade_id: &TradeId) -> CopyResult<CopiedTrade> {
        let trade = ctx.trades.activate(trade_id)?;
        debug!(trade_id = %trade.id, status = %trade.status, "Trade activated");
        Ok(trade.clone())
    }

    /// Close a copied trade exactly once and fold its result into the
    /// wallet's counters and the global counters.
    ///
    /// Wallet counters are skipped when the wallet has since been removed.
    /// A P&L that would overflow either running total is refused before
    /// anything changes.
    pub fn close_trade(
        ctx: &mut CopyContext,
        trade_id: &TradeId,
        outcome: TradeOutcome,
    ) -> CopyResult<CopiedTrade> {
        let current = ctx.trades.get(trade_id)?;
        if current.status.is_closed() {
            return Err(CopyError::AlreadyClosed(trade_id.to_string()));
        }
        let address = current.wallet_address.clone();

        if let Ok(wallet) = ctx.registry.get(&address) {
            add_pnl(wallet.stats.total_pnl, outcome.pnl, "wallet total pnl")?;
        }
        let total_profit = add_pnl(ctx.stats.total_profit, outcome.pnl, "total profit")?;

        let trade = ctx.trades.close(trade_id, &outcome, Utc::now())?.clone();

        if let Some(wallet) = ctx.registry.get_mut(&address) {
            wallet.stats.record_close(outcome.is_win, outcome.pnl);
        } else {
            debug!(
                trade_id = %trade.id,
                address = %address,
                "Wallet no longer tracked, only global stats updated"
            );
        }

        if outcome.is_win {
            ctx.stats.successful_trades += 1;
        } else {
            ctx.stats.failed_trades += 1;
        }
        ctx.stats.total_profit = total_profit;

        info!(
            trade_id = %trade.id,
            label = %trade.wallet_label,
            result = if outcome.is_win { "PROFIT" } else { "LOSS" },
            pnl = %outcome.pnl.round_dp(4),
            "Trade closed"
        );

        Ok(trade)
    }
}

fn add_pnl(total: Decimal, pnl: Decimal, what: &str) -> CopyResult<Decimal> {
    total
        .checked_add(pnl)
        .ok_or_else(|| CopyError::validation(format!("pnl {} overflows {}", pnl, what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TradeDirection, TradeStatus, TransactionEvent, WalletOptions};
    use crate::trading::{CopySettings, TradeCopyEngine};
    use rust_decimal_macros::dec;

    const W1: &str = "W1xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    fn buy(from: &str, tx: &str) -> TransactionEvent {
        TransactionEvent {
            source_address: from.to_string(),
            token_mint: "M1".to_string(),
            amount: dec!(1),
            direction: TradeDirection::Buy,
            price: dec!(0.01),
            tx_reference: tx.to_string(),
        }
    }

    fn setup() -> (CopyContext, CopiedTrade) {
        let mut ctx = CopyContext::new(CopySettings {
            enabled: true,
            ..Default::default()
        });
        ctx.register_wallet(W1, WalletOptions::default().with_copy_ratio(dec!(2)))
            .unwrap();
        let trade = TradeCopyEngine::process(&mut ctx, &buy(W1, "tx-1"))
            .into_copied()
            .unwrap();
        (ctx, trade)
    }

    #[test]
    fn test_close_winning_trade() {
        let (mut ctx, trade) = setup();
        let pnl_before = ctx.registry().get_wallet_stats(W1).unwrap().total_pnl;
        let profit_before = ctx.global_stats().total_profit;

        let closed = OutcomeTracker::close_trade(
            &mut ctx,
            &trade.id,
            TradeOutcome::win(dec!(0.02), dec!(0.012)),
        )
        .unwrap();

        assert_eq!(closed.status, TradeStatus::ClosedProfit);
        assert_eq!(closed.exit_price, Some(dec!(0.012)));
        assert_eq!(closed.pnl, Some(dec!(0.02)));
        assert!(closed.closed_at.is_some());

        let stats = ctx.registry().get_wallet_stats(W1).unwrap();
        assert_eq!(stats.total_pnl - pnl_before, dec!(0.02));
        assert_eq!(stats.traded_count, 1);
        assert_eq!(stats.win_count, 1);
        assert_eq!(ctx.global_stats().total_profit - profit_before, dec!(0.02));
        assert_eq!(ctx.global_stats().successful_trades, 1);
        assert_eq!(ctx.trades().open_count(W1), 0);
    }

    #[test]
    fn test_close_losing_trade() {
        let (mut ctx, trade) = setup();

        let closed = OutcomeTracker::close_trade(
            &mut ctx,
            &trade.id,
            TradeOutcome::loss(dec!(-0.03), dec!(0.007)),
        )
        .unwrap();

        assert_eq!(closed.status, TradeStatus::ClosedLoss);
        let stats = ctx.registry().get_wallet_stats(W1).unwrap();
        assert_eq!(stats.loss_count, 1);
        assert_eq!(stats.win_count + stats.loss_count, stats.traded_count);
        assert_eq!(ctx.global_stats().failed_trades, 1);
        assert_eq!(ctx.global_stats().total_profit, dec!(-0.03));
    }

    #[test]
    fn test_close_twice_is_rejected() {
        let (mut ctx, trade) = setup();
        let first = OutcomeTracker::close_trade(
            &mut ctx,
            &trade.id,
            TradeOutcome::win(dec!(0.02), dec!(0.012)),
        )
        .unwrap();

        let err = OutcomeTracker::close_trade(
            &mut ctx,
            &trade.id,
            TradeOutcome::loss(dec!(-5), dec!(0.001)),
        )
        .unwrap_err();

        assert_eq!(err, CopyError::AlreadyClosed(trade.id.to_string()));
        assert_eq!(ctx.trades().get(&trade.id).unwrap(), &first);
        assert_eq!(ctx.registry().get_wallet_stats(W1).unwrap().traded_count, 1);
        assert_eq!(ctx.global_stats().failed_trades, 0);
        assert_eq!(ctx.global_stats().total_profit, dec!(0.02));
    }

    #[test]
    fn test_unknown_trade() {
        let (mut ctx, _) = setup();
        let missing = TradeId::from("nope-1");

        let err = OutcomeTracker::close_trade(
            &mut ctx,
            &missing,
            TradeOutcome::win(dec!(1), dec!(1)),
        )
        .unwrap_err();
        assert!(err.is_not_found());
        assert!(OutcomeTracker::activate(&mut ctx, &missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_activate_then_close() {
        let (mut ctx, trade) = setup();

        let active = OutcomeTracker::activate(&mut ctx, &trade.id).unwrap();
        assert_eq!(active.status, TradeStatus::Active);
        // Repeat activation is a no-op
        assert_eq!(
            OutcomeTracker::activate(&mut ctx, &trade.id).unwrap().status,
            TradeStatus::Active
        );

        OutcomeTracker::close_trade(&mut ctx, &trade.id, TradeOutcome::win(dec!(0.01), dec!(0.02)))
            .unwrap();
        assert_eq!(
            OutcomeTracker::activate(&mut ctx, &trade.id).unwrap_err(),
            CopyError::AlreadyClosed(trade.id.to_string())
        );
    }

    #[test]
    fn test_overflowing_pnl_leaves_state_untouched() {
        let (mut ctx, first) = setup();
        let second = TradeCopyEngine::process(&mut ctx, &buy(W1, "tx-2"))
            .into_copied()
            .unwrap();

        OutcomeTracker::close_trade(&mut ctx, &first.id, TradeOutcome::win(Decimal::MAX, dec!(1)))
            .unwrap();
        let wallet_before = ctx.registry().get_wallet_stats(W1).unwrap().clone();
        let globals_before = ctx.global_stats().clone();

        let err = OutcomeTracker::close_trade(
            &mut ctx,
            &second.id,
            TradeOutcome::win(Decimal::MAX, dec!(1)),
        )
        .unwrap_err();

        assert!(matches!(err, CopyError::Validation(_)));
        assert!(ctx.trades().get(&second.id).unwrap().is_open());
        assert_eq!(ctx.trades().open_count(W1), 1);
        assert_eq!(ctx.registry().get_wallet_stats(W1).unwrap(), &wallet_before);
        assert_eq!(ctx.global_stats(), &globals_before);

        // A sane report for the same trade still goes through
        let closed = OutcomeTracker::close_trade(
            &mut ctx,
            &second.id,
            TradeOutcome::loss(dec!(-1), dec!(0.5)),
        )
        .unwrap();
        assert_eq!(closed.status, TradeStatus::ClosedLoss);
        assert_eq!(ctx.global_stats().successful_trades + ctx.global_stats().failed_trades, 2);
    }

    #[test]
    fn test_close_after_wallet_removed() {
        let (mut ctx, trade) = setup();
        assert!(ctx.remove_wallet(W1));

        // Removal does not cancel the open copy
        assert!(ctx.trades().get(&trade.id).unwrap().is_open());

        let closed = OutcomeTracker::close_trade(
            &mut ctx,
            &trade.id,
            TradeOutcome::win(dec!(0.05), dec!(0.02)),
        )
        .unwrap();

        assert_eq!(closed.status, TradeStatus::ClosedProfit);
        assert_eq!(ctx.global_stats().successful_trades, 1);
        assert_eq!(ctx.global_stats().total_profit, dec!(0.05));
    }
}
