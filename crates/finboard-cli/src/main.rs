//! Finboard CLI - Personal finance dashboard
//!
//! Usage:
//!   finboard                          Overview for the current month
//!   finboard transactions -s coffee   Search transactions
//!   finboard budgets --period 2024-03 Budget consumption for a month
//!   finboard trend --months 6         Spend by month

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.api_base.as_deref())?;
    let output = commands::Output::from_json_flag(cli.json);
    let today = commands::today();

    let command = cli.command.unwrap_or_default();
    if command == Commands::Settings {
        return commands::cmd_settings(&config, output);
    }

    let dash = commands::open_dashboard(&config)?;
    match command {
        Commands::Overview { date } => {
            commands::cmd_overview(&dash, date.unwrap_or(today), output).await
        }
        Commands::Accounts => commands::cmd_accounts(&dash, output).await,
        Commands::Transactions {
            search,
            from,
            to,
            limit,
            account,
        } => {
            let filter = commands::transaction_filter(search, from, to, limit, account)?;
            commands::cmd_transactions(&dash, &filter, output).await
        }
        Commands::Budgets { period } => {
            let period = period.unwrap_or_else(|| finboard_core::Period::from_date(today));
            commands::cmd_budgets(&dash, &period, output).await
        }
        Commands::Trend { months } => {
            let months = months.unwrap_or(config.display.trend_months);
            commands::cmd_trend(&dash, today, months, output).await
        }
        Commands::Settings => commands::cmd_settings(&config, output),
    }
}
