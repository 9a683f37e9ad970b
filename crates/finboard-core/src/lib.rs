//! Finboard Core Library
//!
//! The derived-metrics layer of the finboard personal finance dashboard:
//! - Backend client for accounts, transactions, monthly spend, and budgets
//! - Record normalizer that tolerates the backend's field-name variants
//! - Metrics engine for KPIs, monthly rollups, top categories, and budget lines
//! - Short-lived query cache keyed by endpoint and parameters
//! - Dashboard views that isolate failures per panel
//! - Layered configuration with embedded defaults

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod period;

/// Test utilities including mock finance backend
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{Endpoint, FinanceApi, HttpFinanceApi};
pub use cache::{QueryCache, QueryKey};
pub use config::{ApiConfig, CacheConfig, DashboardConfig, DisplayConfig};
pub use dashboard::{BudgetView, Dashboard, OverviewView, Panel, TrendView};
pub use error::{Error, Result};
pub use metrics::{
    budget_status, compute_kpis, format_money, percent_consumed, remaining_label,
    rollup_by_month, top_categories,
};
pub use models::{
    Account, AccountType, BudgetLine, BudgetStatusRow, CategorySpend, Kpis, MonthlySpend,
    SpendRow, Transaction, TransactionFilter,
};
pub use period::{Period, PeriodRange};
