//! Wallet copy-trading decision engine.
//!
//! Watches transactions from tracked signal wallets, decides whether to
//! mirror each one, and keeps per-wallet and global outcome statistics.

pub mod error;
pub mod metrics;
pub mod models;
pub mod service;
pub mod trading;

pub use error::{CopyError, CopyResult};
