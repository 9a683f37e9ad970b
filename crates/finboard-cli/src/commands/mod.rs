//! CLI command implementations
//!
//! Commands are organized by view:
//! - `overview` - KPIs, spend trend, top categories, recent transactions
//! - `accounts` - Account list
//! - `transactions` - Transaction search
//! - `budgets` - Budget consumption for one month
//! - `trend` - Spend by month over a trailing window
//! - `settings` - Resolved configuration
//!
//! Each view has a `render_*` function that returns the text output and a
//! `cmd_*` function that fetches the view and prints it.

pub mod accounts;
pub mod budgets;
pub mod overview;
pub mod settings;
pub mod transactions;
pub mod trend;

// Re-export command functions for main.rs
pub use accounts::*;
pub use budgets::*;
pub use overview::*;
pub use settings::*;
pub use transactions::*;
pub use trend::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use finboard_core::{format_money, Dashboard, DashboardConfig, HttpFinanceApi, Panel};
use serde::Serialize;

/// How a command prints its view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Human,
    Json,
}

impl Output {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Load config, then let `--api-base` win over every other source
pub fn load_config(path: Option<&Path>, api_base: Option<&str>) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(path).context("Failed to load config")?;
    if let Some(base) = api_base {
        let base = base.trim().trim_end_matches('/');
        if !base.is_empty() {
            config.api.base_url = base.to_string();
        }
    }
    Ok(config)
}

pub fn open_dashboard(config: &DashboardConfig) -> Result<Dashboard<HttpFinanceApi>> {
    let api = HttpFinanceApi::from_config(&config.api).context("Failed to create API client")?;
    tracing::debug!(base_url = api.base_url(), "Using finance API");
    Ok(Dashboard::new(api, config))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print a view as pretty JSON, or its rendered text
pub fn emit<T: Serialize>(
    output: Output,
    view: &T,
    render: impl FnOnce(&T) -> String,
) -> Result<()> {
    match output {
        Output::Json => {
            let json = serde_json::to_string_pretty(view).context("Failed to serialize view")?;
            println!("{}", json);
        }
        Output::Human => print!("{}", render(view)),
    }
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`
pub fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 && value.is_finite() {
        ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Signed amount, red for outflows and green for inflows
pub fn colored_amount(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("\x1b[31m{}\x1b[0m", format_money(amount, symbol))
    } else {
        format!("\x1b[32m+{}\x1b[0m", format_money(amount, symbol))
    }
}

/// Section title followed by a rule, as lines
pub fn section(title: &str) -> Vec<String> {
    vec![
        String::new(),
        title.to_string(),
        "   ─────────────────────────────────────────────────────────────".to_string(),
    ]
}

/// The body of a panel, or the unavailable notice in its place
pub fn panel_lines<T>(panel: &Panel<T>, render: impl FnOnce(&T) -> Vec<String>) -> Vec<String> {
    match panel {
        Panel::Ready(value) => render(value),
        Panel::Unavailable { reason } => vec![format!("   ⚠️  Data unavailable ({})", reason)],
    }
}

/// Join lines into printable output with a trailing newline
pub fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
