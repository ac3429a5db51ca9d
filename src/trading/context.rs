//! The copy-trading state: settings, registry, trade store, and counters.

use tracing::info;

use crate::error::CopyResult;
use crate::models::{GlobalStats, TrackedWallet, WalletOptions};

use super::{CopySettings, TradeStore, WalletRegistry};

/// All copy-trading state for one process.
///
/// Built once at startup and handed by reference to the engine, the
/// outcome tracker and the reporter.
#[derive(Debug)]
pub struct CopyContext {
    pub(crate) settings: CopySettings,
    pub(crate) registry: WalletRegistry,
    pub(crate) trades: TradeStore,
    pub(crate) stats: GlobalStats,
}

impl CopyContext {
    pub fn new(settings: CopySettings) -> Self {
        Self {
            settings,
            registry: WalletRegistry::new(),
            trades: TradeStore::new(),
            stats: GlobalStats::default(),
        }
    }

    pub fn settings(&self) -> &CopySettings {
        &self.settings
    }

    /// Turn copying on or off at runtime. The only mutable setting.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        info!(
            "Copy trading {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// Register a wallet using the global settings as defaults.
    pub fn register_wallet(
        &mut self,
        address: &str,
        options: WalletOptions,
    ) -> CopyResult<TrackedWallet> {
        self.registry.register(address, options, &self.settings)
    }

    /// Stop tracking a wallet. Its open copies stay open until closed.
    pub fn remove_wallet(&mut self, address: &str) -> bool {
        self.registry.remove(address)
    }

    pub fn set_wallet_enabled(&mut self, address: &str, enabled: bool) -> CopyResult<TrackedWallet> {
        self.registry.set_wallet_enabled(address, enabled).cloned()
    }

    pub fn trades(&self) -> &TradeStore {
        &self.trades
    }

    pub fn global_stats(&self) -> &GlobalStats {
        &self.stats
    }
}

impl Default for CopyContext {
    fn default() -> Self {
        Self::new(CopySettings::default())
    }
}
