//! Arena of copied trades with per-wallet open-position counts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{CopyError, CopyResult};
use crate::models::{CopiedTrade, TradeId, TradeOutcome, TradeStatus};

/// Copied trades in creation order, indexed by id.
///
/// The open count for a wallet always equals the number of its trades in
/// `pending` or `active` status; it is adjusted on insert and on close.
#[derive(Debug, Default)]
pub struct TradeStore {
    trades: Vec<CopiedTrade>,
    index: HashMap<TradeId, usize>,
    sequences: HashMap<String, u64>,
    open_counts: HashMap<String, u32>,
}

impl TradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a wallet. Sequences survive wallet removal, so ids are
    /// never reused.
    pub(crate) fn allocate_id(&mut self, wallet_address: &str) -> TradeId {
        let seq = self.sequences.entry(wallet_address.to_string()).or_insert(0);
        *seq += 1;
        TradeId::new(wallet_address, *seq)
    }

    pub(crate) fn insert(&mut self, trade: CopiedTrade) -> CopyResult<&CopiedTrade> {
        if self.index.contains_key(&trade.id) {
            return Err(CopyError::Internal(format!("duplicate trade id {}", trade.id)));
        }
        if trade.is_open() {
            *self.open_counts.entry(trade.wallet_address.clone()).or_insert(0) += 1;
        }
        let slot = self.trades.len();
        self.index.insert(trade.id.clone(), slot);
        self.trades.push(trade);
        Ok(&self.trades[slot])
    }

    pub fn get(&self, id: &TradeId) -> CopyResult<&CopiedTrade> {
        self.index
            .get(id)
            .map(|&slot| &self.trades[slot])
            .ok_or_else(|| CopyError::TradeNotFound(id.to_string()))
    }

    /// Mark a pending trade active. Active trades are returned unchanged.
    pub(crate) fn activate(&mut self, id: &TradeId) -> CopyResult<&CopiedTrade> {
        let trade = self.slot_mut(id)?;
        if trade.status.is_closed() {
            return Err(CopyError::AlreadyClosed(id.to_string()));
        }
        trade.activate();
        Ok(trade)
    }

    /// Close an open trade and release its wallet's open slot.
    pub(crate) fn close(
        &mut self,
        id: &TradeId,
        outcome: &TradeOutcome,
        at: DateTime<Utc>,
    ) -> CopyResult<&CopiedTrade> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| CopyError::TradeNotFound(id.to_string()))?;

        let trade = &mut self.trades[slot];
        if !trade.close(outcome, at) {
            return Err(CopyError::AlreadyClosed(id.to_string()));
        }

        if let Some(count) = self.open_counts.get_mut(&trade.wallet_address) {
            *count = count.saturating_sub(1);
        }
        Ok(&self.trades[slot])
    }

    /// Open (pending or active) copies for a wallet.
    pub fn open_count(&self, wallet_address: &str) -> u32 {
        self.open_counts.get(wallet_address).copied().unwrap_or(0)
    }

    /// Open copies across all wallets.
    pub fn open_total(&self) -> usize {
        self.open_counts.values().map(|&c| c as usize).sum()
    }

    /// All trades in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &CopiedTrade> + '_ {
        self.trades.iter()
    }

    /// Trades still waiting for the executor.
    pub fn pending(&self) -> impl Iterator<Item = &CopiedTrade> + '_ {
        self.trades
            .iter()
            .filter(|t| t.status == TradeStatus::Pending)
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    fn slot_mut(&mut self, id: &TradeId) -> CopyResult<&mut CopiedTrade> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| CopyError::TradeNotFound(id.to_string()))?;
        Ok(&mut self.trades[slot])
    }
}
