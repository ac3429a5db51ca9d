//! Shared async handle over the copy-trading state.
//!
//! Every operation takes the lock for its whole duration, so the position
//! limit check and the insert of a new copy happen atomically even when
//! feed events and executor reports arrive concurrently.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::error::CopyResult;
use crate::models::{
    CopiedTrade, StatsSnapshot, TrackedWallet, TradeId, TradeOutcome, TransactionEvent,
    WalletOptions, WalletPerformance,
};
use crate::trading::{
    CopyContext, CopyDecision, CopySettings, OutcomeTracker, StatsReporter, TradeCopyEngine,
};

/// Counts from one run of the feed loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub received: u64,
    pub copied: u64,
    pub rejected: u64,
    pub skipped: u64,
    /// Copies the executor channel could not take
    pub dropped: u64,
}

/// Cloneable handle to one [`CopyContext`].
#[derive(Clone)]
pub struct CopyService {
    ctx: Arc<RwLock<CopyContext>>,
}

impl CopyService {
    pub fn new(settings: CopySettings) -> Self {
        Self::from_context(CopyContext::new(settings))
    }

    pub fn from_context(ctx: CopyContext) -> Self {
        Self {
            ctx: Arc::new(RwLock::new(ctx)),
        }
    }

    pub async fn settings(&self) -> CopySettings {
        self.ctx.read().await.settings().clone()
    }

    pub async fn set_enabled(&self, enabled: bool) {
        self.ctx.write().await.set_enabled(enabled);
    }

    pub async fn register_wallet(
        &self,
        address: &str,
        options: WalletOptions,
    ) -> CopyResult<TrackedWallet> {
        self.ctx.write().await.register_wallet(address, options)
    }

    pub async fn remove_wallet(&self, address: &str) -> bool {
        self.ctx.write().await.remove_wallet(address)
    }

    pub async fn set_wallet_enabled(
        &self,
        address: &str,
        enabled: bool,
    ) -> CopyResult<TrackedWallet> {
        self.ctx.write().await.set_wallet_enabled(address, enabled)
    }

    pub async fn list_wallets(&self) -> Vec<TrackedWallet> {
        self.ctx.read().await.registry().list().cloned().collect()
    }

    pub async fn process(&self, event: &TransactionEvent) -> CopyDecision {
        let mut ctx = self.ctx.write().await;
        TradeCopyEngine::process(&mut ctx, event)
    }

    pub async fn activate(&self, trade_id: &TradeId) -> CopyResult<CopiedTrade> {
        let mut ctx = self.ctx.write().await;
        OutcomeTracker::activate(&mut ctx, trade_id)
    }

    pub async fn close_trade(
        &self,
        trade_id: &TradeId,
        outcome: TradeOutcome,
    ) -> CopyResult<CopiedTrade> {
        let mut ctx = self.ctx.write().await;
        OutcomeTracker::close_trade(&mut ctx, trade_id, outcome)
    }

    pub async fn stats(&self) -> StatsSnapshot {
        StatsReporter::get_stats(&*self.ctx.read().await)
    }

    pub async fn reset_daily_stats(&self) {
        let mut ctx = self.ctx.write().await;
        StatsReporter::reset_daily_stats(&mut ctx);
    }

    pub async fn trades(&self) -> Vec<CopiedTrade> {
        StatsReporter::trades(&*self.ctx.read().await)
    }

    pub async fn pending_trades(&self) -> Vec<CopiedTrade> {
        StatsReporter::pending_trades(&*self.ctx.read().await)
    }

    pub async fn wallet_performance(&self, address: &str) -> CopyResult<WalletPerformance> {
        StatsReporter::wallet_performance(&*self.ctx.read().await, address)
    }

    /// Consume feed events until the channel closes.
    ///
    /// Each new copy is handed to `executor` without waiting; a full or
    /// closed executor channel is logged and the copy stays pending.
    pub async fn run_feed(
        &self,
        mut rx: mpsc::Receiver<TransactionEvent>,
        executor: Option<mpsc::Sender<CopiedTrade>>,
    ) -> FeedSummary {
        info!(forwarding = executor.is_some(), "Copy feed started");
        let mut summary = FeedSummary::default();

        while let Some(event) = rx.recv().await {
            summary.received += 1;
            match self.process(&event).await {
                CopyDecision::Copied { trade } => {
                    summary.copied += 1;
                    if let Some(tx) = &executor {
                        if let Err(e) = tx.try_send(trade) {
                            summary.dropped += 1;
                            warn!(error = %e, "Executor channel unavailable, copy left pending");
                        }
                    }
                }
                CopyDecision::Rejected { .. } => summary.rejected += 1,
                CopyDecision::NotProcessed { .. } => summary.skipped += 1,
            }
        }

        info!(
            received = summary.received,
            copied = summary.copied,
            rejected = summary.rejected,
            "Copy feed closed"
        );
        summary
    }
}

impl Default for CopyService {
    fn default() -> Self {
        Self::new(CopySettings::default())
    }
}
