//! Tracked wallet model: a signal source we may copy trades from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-period counters for a tracked wallet.
///
/// Only closed copies count toward `traded_count`; `copied_count` counts
/// every copy created from this wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub traded_count: u32,
    pub win_count: u32,
    pub loss_count: u32,
    pub total_pnl: Decimal,
    pub copied_count: u32,
}

impl WalletStats {
    /// Win rate over closed copies, `None` until something has closed.
    pub fn win_rate(&self) -> Option<f64> {
        if self.traded_count == 0 {
            return None;
        }
        Some(self.win_count as f64 / self.traded_count as f64)
    }

    /// Record one closed copy. The caller checks that `pnl` fits `total_pnl`.
    pub fn record_close(&mut self, is_win: bool, pnl: Decimal) {
        self.traded_count += 1;
        if is_win {
            self.win_count += 1;
        } else {
            self.loss_count += 1;
        }
        self.total_pnl += pnl;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Optional per-wallet overrides supplied at registration.
///
/// Anything left as `None` falls back to the global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletOptions {
    pub label: Option<String>,
    pub enabled: Option<bool>,
    pub copy_ratio: Option<Decimal>,
    pub max_concurrent_copies: Option<u32>,
    pub min_win_rate: Option<f64>,
}

impl WalletOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_copy_ratio(mut self, ratio: Decimal) -> Self {
        self.copy_ratio = Some(ratio);
        self
    }

    pub fn with_max_concurrent_copies(mut self, max: u32) -> Self {
        self.max_concurrent_copies = Some(max);
        self
    }

    pub fn with_min_win_rate(mut self, rate: f64) -> Self {
        self.min_win_rate = Some(rate);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = Some(false);
        self
    }
}

/// A signal source registered for copy trading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedWallet {
    /// Wallet address, unique within the registry
    pub address: String,

    /// Display label
    pub label: String,

    /// Whether trades from this wallet are currently copied
    pub enabled: bool,

    /// Multiplier applied to the base copy amount
    pub copy_ratio: Decimal,

    /// Maximum open copies (pending or active) at once
    pub max_concurrent_copies: u32,

    /// Minimum win rate (0.0 to 1.0) once the wallet has closed copies
    pub min_win_rate: f64,

    pub stats: WalletStats,

    pub added_at: DateTime<Utc>,
}

impl TrackedWallet {
    /// Short label used when none is supplied.
    pub fn default_label(address: &str) -> String {
        let prefix: String = address.chars().take(6).collect();
        format!("Trader_{}", prefix)
    }

    /// Get display name (label or truncated address).
    pub fn display_name(&self) -> String {
        if !self.label.is_empty() {
            self.label.clone()
        } else if self.address.chars().count() > 10 {
            let head: String = self.address.chars().take(6).collect();
            let tail_start = self
                .address
                .char_indices()
                .rev()
                .nth(3)
                .map_or(0, |(i, _)| i);
            format!("{}...{}", head, &self.address[tail_start..])
        } else {
            self.address.clone()
        }
    }
}
