//! Data models for tracked wallets, copied trades, feed events, and statistics.

mod event;
mod metrics;
mod stats;
mod trade;
mod wallet;

pub use event::{FeedTransaction, TransactionEvent};
pub use metrics::WalletPerformance;
pub use stats::{GlobalStats, StatsSnapshot};
pub use trade::{CopiedTrade, TradeDirection, TradeId, TradeOutcome, TradeStatus};
pub use wallet::{TrackedWallet, WalletOptions, WalletStats};
