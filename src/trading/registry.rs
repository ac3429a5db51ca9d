//! Registry of tracked signal wallets.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{CopyError, CopyResult};
use crate::models::{TrackedWallet, WalletOptions, WalletStats};

use super::CopySettings;

/// Shortest address we accept.
pub const MIN_ADDRESS_LEN: usize = 40;

/// Tracked wallets keyed by address, listed in registration order.
#[derive(Debug, Default)]
pub struct WalletRegistry {
    wallets: HashMap<String, TrackedWallet>,
    order: Vec<String>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wallet, filling unset options from `settings`.
    ///
    /// An address that is already tracked is rejected rather than replaced.
    pub fn register(
        &mut self,
        address: &str,
        options: WalletOptions,
        settings: &CopySettings,
    ) -> CopyResult<TrackedWallet> {
        let address = address.trim();
        if address.chars().count() < MIN_ADDRESS_LEN {
            return Err(CopyError::validation(format!(
                "invalid wallet address {:?}: expected at least {} characters",
                address, MIN_ADDRESS_LEN
            )));
        }
        if self.wallets.contains_key(address) {
            return Err(CopyError::AlreadyExists(address.to_string()));
        }

        let copy_ratio = options.copy_ratio.unwrap_or(settings.copy_ratio);
        if copy_ratio <= Decimal::ZERO {
            return Err(CopyError::validation(format!(
                "copy ratio must be positive, got {}",
                copy_ratio
            )));
        }
        let max_concurrent_copies = options
            .max_concurrent_copies
            .unwrap_or(settings.max_copy_positions);
        if max_concurrent_copies == 0 {
            return Err(CopyError::validation("max concurrent copies must be at least 1"));
        }
        let min_win_rate = options.min_win_rate.unwrap_or(settings.min_win_rate);
        if !(0.0..=1.0).contains(&min_win_rate) {
            return Err(CopyError::validation(format!(
                "min win rate must be within 0..=1, got {}",
                min_win_rate
            )));
        }

        let label = options
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| TrackedWallet::default_label(address));

        let wallet = TrackedWallet {
            address: address.to_string(),
            label,
            enabled: options.enabled.unwrap_or(true),
            copy_ratio,
            max_concurrent_copies,
            min_win_rate,
            stats: WalletStats::default(),
            added_at: Utc::now(),
        };

        self.order.push(wallet.address.clone());
        self.wallets.insert(wallet.address.clone(), wallet.clone());

        info!(
            address = %wallet.address,
            label = %wallet.label,
            copy_ratio = %wallet.copy_ratio,
            max_copies = wallet.max_concurrent_copies,
            "Added wallet to track"
        );
        Ok(wallet)
    }

    /// Stop tracking a wallet. Returns whether it was tracked.
    pub fn remove(&mut self, address: &str) -> bool {
        let removed = self.wallets.remove(address).is_some();
        if removed {
            self.order.retain(|a| a != address);
            info!(address = %address, "Removed wallet from tracking");
        }
        removed
    }

    /// Wallets in registration order.
    pub fn list(&self) -> impl Iterator<Item = &TrackedWallet> + '_ {
        self.order.iter().filter_map(|a| self.wallets.get(a))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.wallets.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn get(&self, address: &str) -> CopyResult<&TrackedWallet> {
        self.wallets
            .get(address)
            .ok_or_else(|| CopyError::WalletNotFound(address.to_string()))
    }

    pub fn get_wallet_stats(&self, address: &str) -> CopyResult<&WalletStats> {
        self.get(address).map(|w| &w.stats)
    }

    /// Pause or resume copying for one wallet.
    pub fn set_wallet_enabled(&mut self, address: &str, enabled: bool) -> CopyResult<&TrackedWallet> {
        let wallet = self
            .wallets
            .get_mut(address)
            .ok_or_else(|| CopyError::WalletNotFound(address.to_string()))?;
        wallet.enabled = enabled;
        info!(address = %address, enabled = enabled, "Wallet copy state changed");
        Ok(wallet)
    }

    pub(crate) fn get_mut(&mut self, address: &str) -> Option<&mut TrackedWallet> {
        self.wallets.get_mut(address)
    }

    /// Zero every wallet's per-period counters.
    pub(crate) fn reset_stats(&mut self) {
        for wallet in self.wallets.values_mut() {
            wallet.stats.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ADDR_A: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const ADDR_B: &str = "BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";
    const ADDR_C: &str = "CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC";

    #[test]
    fn test_register_falls_back_to_settings() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();

        let wallet = registry
            .register(ADDR_A, WalletOptions::default(), &settings)
            .unwrap();

        assert_eq!(wallet.label, "Trader_AAAAAA");
        assert!(wallet.enabled);
        assert_eq!(wallet.copy_ratio, settings.copy_ratio);
        assert_eq!(wallet.max_concurrent_copies, settings.max_copy_positions);
        assert_eq!(wallet.min_win_rate, settings.min_win_rate);
        assert_eq!(wallet.stats, WalletStats::default());
    }

    #[test]
    fn test_register_with_options() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();

        let wallet = registry
            .register(
                ADDR_A,
                WalletOptions::default()
                    .with_label("whale")
                    .with_copy_ratio(dec!(2))
                    .with_max_concurrent_copies(1)
                    .with_min_win_rate(0.7)
                    .disabled(),
                &settings,
            )
            .unwrap();

        assert_eq!(wallet.label, "whale");
        assert!(!wallet.enabled);
        assert_eq!(wallet.copy_ratio, dec!(2));
        assert_eq!(wallet.max_concurrent_copies, 1);
        assert_eq!(wallet.min_win_rate, 0.7);
    }

    #[test]
    fn test_register_rejects_short_address() {
        let mut registry = WalletRegistry::new();
        let err = registry
            .register("short", WalletOptions::default(), &CopySettings::default())
            .unwrap_err();
        assert!(matches!(err, CopyError::Validation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_address_length_counts_characters() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();

        // 40 bytes but only 20 characters
        let narrow = "é".repeat(20);
        let err = registry
            .register(&narrow, WalletOptions::default(), &settings)
            .unwrap_err();
        assert!(matches!(err, CopyError::Validation(_)));

        let wide = "é".repeat(MIN_ADDRESS_LEN);
        let wallet = registry
            .register(&wide, WalletOptions::default(), &settings)
            .unwrap();
        assert_eq!(wallet.label, "Trader_éééééé");
    }

    #[test]
    fn test_register_rejects_bad_options() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();

        for options in [
            WalletOptions::default().with_copy_ratio(Decimal::ZERO),
            WalletOptions::default().with_max_concurrent_copies(0),
            WalletOptions::default().with_min_win_rate(1.5),
        ] {
            let err = registry.register(ADDR_A, options, &settings).unwrap_err();
            assert!(matches!(err, CopyError::Validation(_)));
        }
        assert!(!registry.contains(ADDR_A));
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();
        registry
            .register(ADDR_A, WalletOptions::default().with_label("first"), &settings)
            .unwrap();

        let err = registry
            .register(ADDR_A, WalletOptions::default().with_label("second"), &settings)
            .unwrap_err();

        assert_eq!(err, CopyError::AlreadyExists(ADDR_A.to_string()));
        assert_eq!(registry.get(ADDR_A).unwrap().label, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let settings = CopySettings::default();
        let mut registry = WalletRegistry::new();
        for addr in [ADDR_C, ADDR_A, ADDR_B] {
            registry.register(addr, WalletOptions::default(), &settings).unwrap();
        }

        let listed: Vec<_> = registry.list().map(|w| w.address.as_str()).collect();
        assert_eq!(listed, vec![ADDR_C, ADDR_A, ADDR_B]);

        assert!(registry.remove(ADDR_A));
        let listed: Vec<_> = registry.list().map(|w| w.address.as_str()).collect();
        assert_eq!(listed, vec![ADDR_C, ADDR_B]);

        // Listing is restartable
        assert_eq!(registry.list().count(), 2);
        assert_eq!(registry.list().count(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = WalletRegistry::new();
        registry
            .register(ADDR_A, WalletOptions::default(), &CopySettings::default())
            .unwrap();

        assert!(registry.remove(ADDR_A));
        assert!(!registry.remove(ADDR_A));
        assert!(!registry.contains(ADDR_A));
    }

    #[test]
    fn test_wallet_stats_and_enable_toggle() {
        let mut registry = WalletRegistry::new();
        registry
            .register(ADDR_A, WalletOptions::default(), &CopySettings::default())
            .unwrap();

        assert_eq!(registry.get_wallet_stats(ADDR_A).unwrap().traded_count, 0);
        assert!(registry.get_wallet_stats(ADDR_B).unwrap_err().is_not_found());

        assert!(!registry.set_wallet_enabled(ADDR_A, false).unwrap().enabled);
        assert!(registry.set_wallet_enabled(ADDR_B, true).is_err());
    }
}
