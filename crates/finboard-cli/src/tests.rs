//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use finboard_core::test_utils::MockFinanceServer;
use finboard_core::{
    Account, AccountType, BudgetLine, BudgetView, Dashboard, DashboardConfig, Endpoint,
    HttpFinanceApi, Panel, Period, TransactionFilter,
};

use crate::cli::{Cli, Commands};
use crate::commands::{self, bar, truncate, Output};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn mock_dashboard(server: &MockFinanceServer) -> Dashboard<HttpFinanceApi> {
    let api = HttpFinanceApi::new(&server.url(), Duration::from_secs(5)).unwrap();
    Dashboard::new(api, &DashboardConfig::default())
}

fn budget_line(category: &str, pct: u8, label: &str, is_over: bool) -> BudgetLine {
    BudgetLine {
        category: category.to_string(),
        spent_formatted: "$340.00".to_string(),
        budget_formatted: "$300.00".to_string(),
        remaining_label: label.to_string(),
        percent_consumed: pct,
        is_over,
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_no_subcommand_defaults_to_overview() {
    let cli = Cli::try_parse_from(["finboard"]).unwrap();
    assert_eq!(cli.command, None);
    assert_eq!(
        cli.command.unwrap_or_default(),
        Commands::Overview { date: None }
    );
}

#[test]
fn test_parse_budgets_period() {
    let cli = Cli::try_parse_from(["finboard", "budgets", "--period", "2024-03"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Budgets {
            period: Some("2024-03".parse().unwrap())
        })
    );
}

#[test]
fn test_parse_rejects_bad_period() {
    assert!(Cli::try_parse_from(["finboard", "budgets", "--period", "2024-13"]).is_err());
    assert!(Cli::try_parse_from(["finboard", "budgets", "--period", "March"]).is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "finboard",
        "trend",
        "--months",
        "6",
        "--json",
        "--api-base",
        "http://api.local:9000",
    ])
    .unwrap();
    assert!(cli.json);
    assert_eq!(cli.api_base.as_deref(), Some("http://api.local:9000"));
    assert_eq!(cli.command, Some(Commands::Trend { months: Some(6) }));
}

#[test]
fn test_parse_transaction_filters() {
    let cli = Cli::try_parse_from([
        "finboard",
        "transactions",
        "-s",
        "coffee",
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
        "--account",
        "2",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Transactions {
            search,
            from,
            to,
            limit,
            account,
        }) => {
            assert_eq!(search.as_deref(), Some("coffee"));
            assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1));
            assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31));
            assert_eq!(limit, None);
            assert_eq!(account, Some(2));
        }
        other => panic!("expected transactions command, got {:?}", other),
    }
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is a long description", 10), "this is...");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}

#[test]
fn test_bar_proportions() {
    assert_eq!(bar(5.0, 10.0, 10), "█████░░░░░");
    assert_eq!(bar(10.0, 10.0, 4), "████");
    assert_eq!(bar(20.0, 10.0, 4), "████");
    assert_eq!(bar(1.0, 0.0, 4), "░░░░");
    assert_eq!(bar(f64::NAN, 10.0, 3), "░░░");
}

#[test]
fn test_colored_amount() {
    assert_eq!(
        commands::colored_amount(-12.5, "$"),
        "\x1b[31m-$12.50\x1b[0m"
    );
    assert_eq!(commands::colored_amount(40.0, "$"), "\x1b[32m+$40.00\x1b[0m");
}

#[test]
fn test_transaction_filter_from_args() {
    let from = NaiveDate::from_ymd_opt(2024, 3, 1);
    let to = NaiveDate::from_ymd_opt(2024, 3, 31);
    let filter =
        commands::transaction_filter(Some("  ".to_string()), from, to, Some(25), None).unwrap();

    assert_eq!(filter.search_text, None);
    assert_eq!(filter.limit, Some(25));
    assert_eq!(filter.date_from, from);
}

#[test]
fn test_transaction_filter_rejects_inverted_range() {
    let from = NaiveDate::from_ymd_opt(2024, 4, 1);
    let to = NaiveDate::from_ymd_opt(2024, 3, 1);
    assert!(commands::transaction_filter(None, from, to, None, None).is_err());
    assert!(commands::transaction_filter(None, None, None, Some(0), None).is_err());
}

#[test]
fn test_load_config_api_base_flag_wins() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api]\nbase_url = \"http://from-file:8010\"").unwrap();

    let config = commands::load_config(Some(file.path()), Some("http://from-flag:9000/")).unwrap();
    assert_eq!(config.api.base_url, "http://from-flag:9000");

    let config = commands::load_config(Some(file.path()), Some("   ")).unwrap();
    assert_ne!(config.api.base_url, "");
}

#[test]
fn test_load_config_rejects_invalid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[display\ntop_categories = ").unwrap();
    assert!(commands::load_config(Some(file.path()), None).is_err());
}

// ========== Rendering Tests ==========

#[test]
fn test_account_line() {
    let account = Account {
        id: 1,
        name: "Everyday Checking".to_string(),
        institution: Some("First Bank".to_string()),
        mask: Some("4321".to_string()),
        account_type: AccountType::Checking,
        currency: "USD".to_string(),
    };
    assert_eq!(
        commands::account_line(&account),
        "   Everyday Checking (checking) ••4321 · First Bank · USD"
    );

    let bare = Account {
        institution: None,
        mask: None,
        account_type: AccountType::Credit,
        ..account
    };
    assert_eq!(
        commands::account_line(&bare),
        "   Everyday Checking (credit) · USD"
    );
}

#[test]
fn test_render_unavailable_panel() {
    let panel: Panel<Vec<Account>> = Panel::Unavailable {
        reason: "API 503: /accounts".to_string(),
    };
    let out = commands::render_accounts(&panel);
    assert!(out.contains("Data unavailable (API 503: /accounts)"));
}

#[test]
fn test_render_budgets() {
    let view = BudgetView {
        period: "2024-03".parse().unwrap(),
        lines: Panel::Ready(vec![
            budget_line("groceries", 100, "40.00 over", true),
            budget_line("dining", 40, "90.00 left", false),
        ]),
    };
    let out = commands::render_budgets(&view);

    assert!(out.contains("Budgets · 2024-03"));
    assert!(out.contains("100%"));
    assert!(out.contains("\x1b[31m40.00 over\x1b[0m"));
    assert!(out.contains(" 40% "));
    assert!(out.contains("90.00 left"));
}

#[test]
fn test_render_empty_budgets() {
    let view = BudgetView {
        period: "2024-03".parse().unwrap(),
        lines: Panel::Ready(Vec::new()),
    };
    assert!(commands::render_budgets(&view).contains("No budgets set"));
}

#[test]
fn test_render_settings() {
    let out = commands::render_settings(&DashboardConfig::default());
    assert!(out.contains("http://localhost:8010"));
    assert!(out.contains("America/New_York"));
    assert!(out.contains("30s transactions, 60s aggregates"));
}

#[test]
fn test_cmd_settings_json() {
    let result = commands::cmd_settings(&DashboardConfig::default(), Output::Json);
    assert!(result.is_ok());
}

// ========== Command Tests (mock backend) ==========

#[tokio::test]
async fn test_render_overview_from_mock() {
    let server = MockFinanceServer::start().await;
    let dash = mock_dashboard(&server);

    let view = dash.overview(today()).await;
    let out = commands::render_overview(&view, dash.display());

    assert!(out.contains("2024-03"));
    assert!(out.contains("This month:      $1566.70"));
    assert!(out.contains("🏷️  Uncategorized: 2"));
    assert!(out.contains("rent"));
    assert!(out.contains("(uncategorized)"));
    assert!(out.contains("WHOLE FOODS"));
}

#[tokio::test]
async fn test_render_overview_with_failed_spend() {
    let server = MockFinanceServer::start().await;
    server.fail(Endpoint::SpendMonthly);
    let dash = mock_dashboard(&server);

    let view = dash.overview(today()).await;
    let out = commands::render_overview(&view, dash.display());

    assert!(out.contains("Data unavailable (API 500: /spend/monthly)"));
    // Recent transactions still render
    assert!(out.contains("WHOLE FOODS"));
}

#[tokio::test]
async fn test_render_trend_from_mock() {
    let server = MockFinanceServer::start().await;
    let dash = mock_dashboard(&server);

    let view = dash.trend_view(today(), 12).await;
    let out = commands::render_trend(&view, "$");

    assert!(out.contains("2023-04 to 2024-03"));
    assert!(out.contains("2024-02"));
    assert!(!out.contains("2023-02"));
    assert!(out.contains("across 3 month(s)"));
}

#[tokio::test]
async fn test_render_transactions_search() {
    let server = MockFinanceServer::start().await;
    let dash = mock_dashboard(&server);

    let filter = TransactionFilter {
        search_text: Some("rent".to_string()),
        ..Default::default()
    };
    let panel = dash.transactions_view(&filter).await;
    let out = commands::render_transactions(&panel, &filter, "$");

    assert!(out.contains("Transactions matching \"rent\""));
    assert!(out.contains("RENT MARCH"));
    assert!(out.contains("2 shown, 1 uncategorized, $2900.00 spent"));
}

#[tokio::test]
async fn test_cmd_budgets_against_mock() {
    let server = MockFinanceServer::start().await;
    let dash = mock_dashboard(&server);
    let period: Period = "2024-03".parse().unwrap();

    let result = commands::cmd_budgets(&dash, &period, Output::Human).await;
    assert!(result.is_ok());
    assert_eq!(server.hits(Endpoint::BudgetStatus), 1);
}

#[tokio::test]
async fn test_cmd_accounts_json_against_mock() {
    let server = MockFinanceServer::start().await;
    let dash = mock_dashboard(&server);

    let result = commands::cmd_accounts(&dash, Output::Json).await;
    assert!(result.is_ok());
}
