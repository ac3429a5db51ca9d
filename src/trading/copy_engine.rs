//! Copy-trading engine: decides which tracked-wallet trades we mirror.

use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{CopyError, CopyResult};
use crate::models::{CopiedTrade, TradeStatus, TransactionEvent};

use super::CopyContext;

/// Why an event was ignored without evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    CopyingDisabled,
    WalletNotTracked,
    WalletDisabled,
}

/// Why an evaluated event was not copied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
    BelowWinRate { win_rate: f64, min_win_rate: f64 },
    MaxConcurrentCopies { open: u32, max: u32 },
    Internal { message: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::BelowWinRate { .. } => f.write_str("below win-rate threshold"),
            RejectReason::MaxConcurrentCopies { .. } => f.write_str("max concurrent copies reached"),
            RejectReason::Internal { message } => write!(f, "internal error: {}", message),
        }
    }
}

/// Result of processing one feed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum CopyDecision {
    /// Ignored before evaluation; no state changed
    NotProcessed { skip: SkipReason },
    /// Evaluated and refused
    Rejected { reason: RejectReason },
    /// A pending copy was created
    Copied { trade: CopiedTrade },
}

impl CopyDecision {
    pub fn copied(&self) -> Option<&CopiedTrade> {
        match self {
            CopyDecision::Copied { trade } => Some(trade),
            _ => None,
        }
    }

    pub fn into_copied(self) -> Option<CopiedTrade> {
        match self {
            CopyDecision::Copied { trade } => Some(trade),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            CopyDecision::Rejected { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_processed(&self) -> bool {
        !matches!(self, CopyDecision::NotProcessed { .. })
    }
}

/// Evaluates feed events against the registry and global settings.
pub struct TradeCopyEngine;

impl TradeCopyEngine {
    /// Process one event.
    ///
    /// Gates run in order and stop at the first that fires: global switch,
    /// tracked wallet, wallet switch, win rate, open-position limit. Failures
    /// while evaluating are counted as failed trades and returned as a
    /// rejection; they never escape.
    pub fn process(ctx: &mut CopyContext, event: &TransactionEvent) -> CopyDecision {
        if !ctx.settings.enabled {
            return CopyDecision::NotProcessed {
                skip: SkipReason::CopyingDisabled,
            };
        }

        match ctx.registry.get(&event.source_address) {
            Err(_) => {
                return CopyDecision::NotProcessed {
                    skip: SkipReason::WalletNotTracked,
                }
            }
            Ok(wallet) if !wallet.enabled => {
                debug!(address = %wallet.address, "Wallet disabled, skipping event");
                return CopyDecision::NotProcessed {
                    skip: SkipReason::WalletDisabled,
                };
            }
            Ok(_) => {}
        }

        match Self::evaluate(ctx, event) {
            Ok(decision) => decision,
            Err(e) => {
                error!(
                    error = %e,
                    address = %event.source_address,
                    tx = %event.tx_reference,
                    "Error processing tracked wallet transaction"
                );
                ctx.stats.failed_trades += 1;
                CopyDecision::Rejected {
                    reason: RejectReason::Internal {
                        message: e.to_string(),
                    },
                }
            }
        }
    }

    fn evaluate(ctx: &mut CopyContext, event: &TransactionEvent) -> CopyResult<CopyDecision> {
        validate_event(event)?;

        let address = event.source_address.as_str();
        let wallet = ctx.registry.get(address)?;

        // Win-rate gate
        if let Some(win_rate) = wallet.stats.win_rate() {
            if win_rate < wallet.min_win_rate {
                warn!(
                    address = %address,
                    win_rate = win_rate,
                    min_win_rate = wallet.min_win_rate,
                    "Skipping copy: win rate below minimum"
                );
                return Ok(CopyDecision::Rejected {
                    reason: RejectReason::BelowWinRate {
                        win_rate,
                        min_win_rate: wallet.min_win_rate,
                    },
                });
            }
        }

        // Position-limit gate: pending copies count as open
        let open = ctx.trades.open_count(address);
        if open >= wallet.max_concurrent_copies {
            warn!(
                address = %address,
                label = %wallet.label,
                open = open,
                max = wallet.max_concurrent_copies,
                "Max copy positions reached for wallet"
            );
            return Ok(CopyDecision::Rejected {
                reason: RejectReason::MaxConcurrentCopies {
                    open,
                    max: wallet.max_concurrent_copies,
                },
            });
        }

        let copy_amount = ctx
            .settings
            .copy_amount
            .checked_mul(wallet.copy_ratio)
            .ok_or_else(|| CopyError::Internal("copy amount overflow".to_string()))?;
        let wallet_label = wallet.label.clone();

        let trade = CopiedTrade {
            id: ctx.trades.allocate_id(address),
            wallet_address: address.to_string(),
            wallet_label,
            original_amount: event.amount,
            copy_amount,
            token_mint: event.token_mint.clone(),
            direction: event.direction,
            status: TradeStatus::Pending,
            original_tx: event.tx_reference.clone(),
            entry_price: event.price,
            exit_price: None,
            pnl: None,
            created_at: Utc::now(),
            closed_at: None,
        };
        let trade = ctx.trades.insert(trade)?.clone();

        if let Some(wallet) = ctx.registry.get_mut(address) {
            wallet.stats.copied_count += 1;
        }
        ctx.stats.total_copied_trades += 1;

        info!(
            trade_id = %trade.id,
            label = %trade.wallet_label,
            direction = %trade.direction,
            token = %trade.short_mint(),
            copy_amount = %trade.copy_amount,
            "Copied trade"
        );

        Ok(CopyDecision::Copied { trade })
    }
}

/// Reject events the feed should never have produced.
fn validate_event(event: &TransactionEvent) -> CopyResult<()> {
    if event.token_mint.trim().is_empty() {
        return Err(CopyError::validation("event has no token mint"));
    }
    if event.price <= Decimal::ZERO {
        return Err(CopyError::validation(format!(
            "event price must be positive, got {}",
            event.price
        )));
    }
    if event.amount < Decimal::ZERO {
        return Err(CopyError::validation(format!(
            "event amount must not be negative, got {}",
            event.amount
        )));
    }
    Ok(())
}
