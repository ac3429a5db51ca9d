//! Copy-trading configuration.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Process-wide copy-trading settings.
///
/// Loaded once at startup; only `enabled` changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySettings {
    /// Master switch for copying
    pub enabled: bool,

    /// Default maximum open copies per wallet
    pub max_copy_positions: u32,

    /// Base amount per copied trade (SOL)
    pub copy_amount: Decimal,

    /// Default multiplier on the base amount
    pub copy_ratio: Decimal,

    /// Minimum wallet age in days
    pub min_wallet_age_days: u32,

    /// Default minimum win rate (0.0 to 1.0)
    pub min_win_rate: f64,

    /// Skip the token age check before copying
    pub skip_token_age_check: bool,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_copy_positions: 3,
            copy_amount: dec!(0.05), // SOL
            copy_ratio: dec!(1.0),   // 1:1 copy
            min_wallet_age_days: 7,
            min_win_rate: 0.5, // 50%
            skip_token_age_check: false,
        }
    }
}

impl CopySettings {
    /// Load settings from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; missing keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let settings = Self {
            enabled: lookup("ENABLE_COPY_TRADING")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.enabled),
            max_copy_positions: parse_or("MAX_COPY_POSITIONS", &lookup, defaults.max_copy_positions)?,
            copy_amount: parse_or("COPY_AMOUNT", &lookup, defaults.copy_amount)?,
            copy_ratio: parse_or("COPY_RATIO", &lookup, defaults.copy_ratio)?,
            min_wallet_age_days: parse_or("MIN_WALLET_AGE", &lookup, defaults.min_wallet_age_days)?,
            min_win_rate: parse_or("MIN_WIN_RATE", &lookup, defaults.min_win_rate)?,
            skip_token_age_check: lookup("SKIP_TOKEN_AGE_CHECK")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.skip_token_age_check),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make every wallet unusable.
    pub fn validate(&self) -> Result<()> {
        if self.max_copy_positions == 0 {
            bail!("invalid value for MAX_COPY_POSITIONS: must be at least 1");
        }
        if self.copy_amount <= Decimal::ZERO {
            bail!(
                "invalid value for COPY_AMOUNT: must be positive, got {}",
                self.copy_amount
            );
        }
        if self.copy_ratio <= Decimal::ZERO {
            bail!(
                "invalid value for COPY_RATIO: must be positive, got {}",
                self.copy_ratio
            );
        }
        if !(0.0..=1.0).contains(&self.min_win_rate) {
            bail!(
                "invalid value for MIN_WIN_RATE: must be within 0..=1, got {}",
                self.min_win_rate
            );
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = CopySettings::from_lookup(lookup_from(&[])).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.max_copy_positions, 3);
        assert_eq!(settings.copy_amount, dec!(0.05));
        assert_eq!(settings.copy_ratio, dec!(1.0));
        assert_eq!(settings.min_wallet_age_days, 7);
        assert!((settings.min_win_rate - 0.5).abs() < f64::EPSILON);
        assert!(!settings.skip_token_age_check);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let settings = CopySettings::from_lookup(lookup_from(&[
            ("ENABLE_COPY_TRADING", "TRUE"),
            ("MAX_COPY_POSITIONS", "5"),
            ("COPY_AMOUNT", "0.2"),
            ("COPY_RATIO", "1.5"),
            ("MIN_WIN_RATE", "0.6"),
            ("SKIP_TOKEN_AGE_CHECK", "yes"),
        ]))
        .unwrap();

        assert!(settings.enabled);
        assert_eq!(settings.max_copy_positions, 5);
        assert_eq!(settings.copy_amount, dec!(0.2));
        assert_eq!(settings.copy_ratio, dec!(1.5));
        assert!((settings.min_win_rate - 0.6).abs() < f64::EPSILON);
        // Only the literal "true" enables a flag
        assert!(!settings.skip_token_age_check);
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = CopySettings::from_lookup(lookup_from(&[("MAX_COPY_POSITIONS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_COPY_POSITIONS"));
    }

    #[test]
    fn test_unusable_values_name_variable() {
        for (key, value) in [
            ("MAX_COPY_POSITIONS", "0"),
            ("COPY_AMOUNT", "-0.05"),
            ("COPY_AMOUNT", "0"),
            ("COPY_RATIO", "0"),
            ("MIN_WIN_RATE", "1.5"),
            ("MIN_WIN_RATE", "-0.1"),
            ("MIN_WIN_RATE", "NaN"),
        ] {
            let err = CopySettings::from_lookup(lookup_from(&[(key, value)])).unwrap_err();
            assert!(err.to_string().contains(key), "{key}={value}: {err}");
        }

        assert!(CopySettings::from_lookup(lookup_from(&[("MIN_WIN_RATE", "1")])).is_ok());
        assert!(CopySettings::default().validate().is_ok());
    }
}
