//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use finboard_core::Period;

/// Finboard - Personal finance dashboard
#[derive(Parser)]
#[command(name = "finboard")]
#[command(about = "Spend, budget, and account views from your finance API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Finance API base URL (overrides config and FINBOARD_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Config file (defaults to ~/.config/finboard/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// KPIs, spend trend, top categories, and recent transactions (default)
    Overview {
        /// Show the month containing this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List linked accounts
    Accounts,

    /// Search and list transactions
    Transactions {
        /// Match text in the description
        #[arg(short, long)]
        search: Option<String>,

        /// Earliest posted date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest posted date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Maximum rows (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Only this account
        #[arg(short, long)]
        account: Option<i64>,
    },

    /// Budget consumption for a month
    Budgets {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Spend by month
    Trend {
        /// Number of trailing months (defaults to the configured window)
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Show the resolved settings
    Settings,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Overview { date: None }
    }
}
