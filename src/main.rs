//! Wallet copy-trading CLI
//!
//! Inspects the effective settings and replays recorded sessions through
//! the copy engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use wallet_copier::models::{FeedTransaction, TradeId, TradeOutcome, WalletOptions};
use wallet_copier::service::CopyService;
use wallet_copier::trading::{CopyDecision, CopySettings};

/// Wallet copy-trading CLI.
#[derive(Parser)]
#[command(name = "copytrader")]
#[command(about = "Mirror trades from tracked wallets", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,

    /// Replay a recorded session script through the copy engine
    Replay {
        /// Session script (JSON list of steps)
        file: PathBuf,

        /// Print the final statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// One step of a session script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
enum Step {
    Register {
        address: String,
        #[serde(default)]
        options: WalletOptions,
    },
    Remove {
        address: String,
    },
    EnableWallet {
        address: String,
        enabled: bool,
    },
    Event {
        tx: FeedTransaction,
    },
    Activate {
        trade: TradeId,
    },
    #[serde(rename_all = "camelCase")]
    Close {
        trade: TradeId,
        is_win: bool,
        pnl: Decimal,
        exit_price: Decimal,
    },
    Reset,
    SetEnabled {
        enabled: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = CopySettings::from_env()?;

    match cli.command {
        Commands::Config => print_settings(&settings),
        Commands::Replay { file, json } => replay(settings, &file, json).await?,
    }

    Ok(())
}

fn print_settings(settings: &CopySettings) {
    println!("\n=== Copy Trading Configuration ===\n");
    println!("  Enabled:              {}", settings.enabled);
    println!("  Max Copy Positions:   {}", settings.max_copy_positions);
    println!("  Copy Amount:          {}", settings.copy_amount);
    println!("  Copy Ratio:           {}", settings.copy_ratio);
    println!("  Min Wallet Age:       {}d", settings.min_wallet_age_days);
    println!("  Min Win Rate:         {:.0}%", settings.min_win_rate * 100.0);
    println!("  Skip Token Age Check: {}", settings.skip_token_age_check);
}

async fn replay(settings: CopySettings, path: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session {}", path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse session {}", path.display()))?;

    info!(steps = steps.len(), file = %path.display(), "Replaying session");
    let service = CopyService::new(settings);

    for (n, step) in steps.into_iter().enumerate() {
        run_step(&service, n + 1, step).await;
    }

    let snapshot = service.stats().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("\n{snapshot}");

    let mut addresses: Vec<String> = Vec::new();
    for trade in service.trades().await {
        if !addresses.contains(&trade.wallet_address) {
            addresses.push(trade.wallet_address);
        }
    }
    if addresses.is_empty() {
        return Ok(());
    }

    println!(
        "\n{:<16} {:>6} {:>6} {:>7} {:>10} {:>8} {:>8}",
        "WALLET", "CLOSED", "OPEN", "WIN%", "PNL", "PF", "MDD%"
    );
    println!("{}", "-".repeat(68));
    for address in addresses {
        let perf = service.wallet_performance(&address).await?;
        println!(
            "{:<16} {:>6} {:>6} {:>6.1}% {:>10} {:>8.2} {:>7.1}%",
            truncate(&address, 14),
            perf.closed_trades,
            perf.open_trades,
            perf.win_rate * 100.0,
            perf.total_pnl.round_dp(4),
            perf.profit_factor,
            perf.max_drawdown * 100.0
        );
    }

    Ok(())
}

async fn run_step(service: &CopyService, n: usize, step: Step) {
    match step {
        Step::Register { address, options } => {
            if let Err(e) = service.register_wallet(&address, options).await {
                warn!(step = n, error = %e, "Register failed");
            }
        }
        Step::Remove { address } => {
            if !service.remove_wallet(&address).await {
                warn!(step = n, address = %address, "Wallet was not tracked");
            }
        }
        Step::EnableWallet { address, enabled } => {
            if let Err(e) = service.set_wallet_enabled(&address, enabled).await {
                warn!(step = n, error = %e, "Enable wallet failed");
            }
        }
        Step::Event { tx } => match service.process(&tx.into()).await {
            CopyDecision::Copied { trade } => {
                info!(step = n, trade_id = %trade.id, "Copy queued for executor");
            }
            CopyDecision::Rejected { reason } => {
                info!(step = n, reason = %reason, "Event rejected");
            }
            CopyDecision::NotProcessed { skip } => {
                info!(step = n, skip = ?skip, "Event not processed");
            }
        },
        Step::Activate { trade } => {
            if let Err(e) = service.activate(&trade).await {
                warn!(step = n, error = %e, "Activate failed");
            }
        }
        Step::Close {
            trade,
            is_win,
            pnl,
            exit_price,
        } => {
            let outcome = if is_win {
                TradeOutcome::win(pnl, exit_price)
            } else {
                TradeOutcome::loss(pnl, exit_price)
            };
            if let Err(e) = service.close_trade(&trade, outcome).await {
                warn!(step = n, error = %e, "Close failed");
            }
        }
        Step::Reset => service.reset_daily_stats().await,
        Step::SetEnabled { enabled } => service.set_enabled(enabled).await,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
