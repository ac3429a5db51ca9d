//! Performance metrics over copied trades.

mod calculator;

pub use calculator::MetricsCalculator;
