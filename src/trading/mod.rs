//! Copy-trading core: wallet registry, decision engine, outcomes, reporting.

mod config;
mod context;
mod copy_engine;
mod outcome;
mod registry;
mod reporter;
mod store;

pub use config::CopySettings;
pub use context::CopyContext;
pub use copy_engine::{CopyDecision, RejectReason, SkipReason, TradeCopyEngine};
pub use outcome::OutcomeTracker;
pub use registry::{WalletRegistry, MIN_ADDRESS_LEN};
pub use reporter::StatsReporter;
pub use store::TradeStore;
