//! Dashboard views
//!
//! A `Dashboard` owns a backend client and the query cache. Reads go
//! through the cache first, then the normalizer. Views issue their reads
//! concurrently and build each panel from only the reads that panel needs,
//! so one failing endpoint blanks its own panels and nothing else.
//!
//! Dropping a view future cancels its in-flight reads. Nothing is written
//! except cache entries for reads that completed.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{budget_status_params, spend_monthly_params, Endpoint, FinanceApi};
use crate::cache::{QueryCache, QueryKey};
use crate::config::{DashboardConfig, DisplayConfig};
use crate::error::{Error, Result};
use crate::metrics::{budget_status, compute_kpis, rollup_by_month, top_categories};
use crate::models::{
    Account, BudgetLine, BudgetStatusRow, CategorySpend, Kpis, MonthlySpend, SpendRow,
    Transaction, TransactionFilter,
};
use crate::normalize::{
    normalize_accounts, normalize_budget_rows, normalize_spend_rows, normalize_transactions,
};
use crate::period::{Period, PeriodRange};

/// One panel's content, or why it could not be built
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> Panel<T> {
    pub fn from_result(panel: &'static str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::unavailable(panel, &e),
        }
    }

    fn unavailable(panel: &'static str, error: &Error) -> Self {
        warn!(panel, error = %error, "Data unavailable for panel");
        Self::Unavailable {
            reason: error.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable { .. } => None,
        }
    }
}

/// The overview page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub period: Period,
    pub kpis: Panel<Kpis>,
    pub monthly_spend: Panel<Vec<MonthlySpend>>,
    pub top_categories: Panel<Vec<CategorySpend>>,
    pub recent_transactions: Panel<Vec<Transaction>>,
}

/// Spend by month over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub range: PeriodRange,
    pub months: Panel<Vec<MonthlySpend>>,
}

/// Budget lines for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    pub period: Period,
    pub lines: Panel<Vec<BudgetLine>>,
}

pub struct Dashboard<A: FinanceApi> {
    api: A,
    cache: QueryCache,
    display: DisplayConfig,
}

impl<A: FinanceApi> Dashboard<A> {
    pub fn new(api: A, config: &DashboardConfig) -> Self {
        Self {
            api,
            cache: QueryCache::new(config.cache),
            display: config.display.clone(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    // ========== Cached reads ==========

    /// Serve `key` from the cache, or await `fetch` and cache its rows
    ///
    /// `fetch` is not polled on a cache hit.
    async fn cached<F>(&self, key: QueryKey, fetch: F) -> Result<Arc<Vec<Value>>>
    where
        F: Future<Output = Result<Vec<Value>>>,
    {
        if let Some(rows) = self.cache.get(&key) {
            debug!(query = %key, rows = rows.len(), "Cache hit");
            return Ok(rows);
        }

        debug!(query = %key, "Cache miss");
        let rows = fetch.await?;
        Ok(self.cache.insert(key, rows))
    }

    pub async fn accounts(&self) -> Result<Vec<Account>> {
        let key = QueryKey::new(Endpoint::Accounts, &[]);
        let rows = self.cached(key, self.api.accounts()).await?;
        Ok(normalize_accounts(&rows))
    }

    pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let key = QueryKey::new(Endpoint::Transactions, &filter.query_pairs());
        let rows = self.cached(key, self.api.transactions(filter)).await?;
        Ok(normalize_transactions(&rows))
    }

    /// Spend rows for every month in `range`
    pub async fn spend_monthly(&self, range: &PeriodRange) -> Result<Vec<SpendRow>> {
        let (from, to) = range.date_bounds().ok_or_else(|| {
            Error::InvalidData(format!("Invalid period range {}..{}", range.from, range.to))
        })?;
        let key = QueryKey::new(Endpoint::SpendMonthly, &spend_monthly_params(from, to));
        let rows = self.cached(key, self.api.spend_monthly(from, to)).await?;
        Ok(normalize_spend_rows(&rows))
    }

    pub async fn budget_rows(&self, period: &Period) -> Result<Vec<BudgetStatusRow>> {
        let key = QueryKey::new(Endpoint::BudgetStatus, &budget_status_params(period));
        let rows = self.cached(key, self.api.budget_status(period)).await?;
        Ok(normalize_budget_rows(&rows))
    }

    // ========== Views ==========

    /// KPIs, the trailing spend trend, top categories, and recent activity
    /// for the month containing `today`
    pub async fn overview(&self, today: NaiveDate) -> OverviewView {
        let period = Period::from_date(today);
        let month = PeriodRange::month(period.clone());
        let trend = PeriodRange::trailing(today, self.display.trend_months);

        let mut window = TransactionFilter::with_limit(self.display.kpi_transaction_limit);
        if let Some((from, to)) = month.date_bounds() {
            window.date_from = Some(from);
            window.date_to = Some(to);
        }
        let recent = TransactionFilter::with_limit(self.display.recent_transactions);

        let (month_rows, trend_rows, window_txs, recent_txs) = tokio::join!(
            self.spend_monthly(&month),
            self.spend_monthly(&trend),
            self.transactions(&window),
            self.transactions(&recent),
        );

        let kpis = match (&month_rows, &window_txs) {
            (Ok(rows), Ok(txs)) => Panel::Ready(compute_kpis(rows, txs, today)),
            (Err(e), _) | (_, Err(e)) => Panel::unavailable("kpis", e),
        };

        let top = match &month_rows {
            Ok(rows) => Panel::Ready(top_categories(rows, &period, self.display.top_categories)),
            Err(e) => Panel::unavailable("top_categories", e),
        };

        OverviewView {
            period,
            kpis,
            monthly_spend: Panel::from_result(
                "monthly_spend",
                trend_rows.map(|rows| rollup_by_month(&rows, &trend)),
            ),
            top_categories: top,
            recent_transactions: Panel::from_result("recent_transactions", recent_txs),
        }
    }

    /// Spend by month for the trailing `months` months ending with `today`
    pub async fn trend_view(&self, today: NaiveDate, months: u32) -> TrendView {
        let range = PeriodRange::trailing(today, months);
        let rows = self.spend_monthly(&range).await;
        TrendView {
            months: Panel::from_result(
                "monthly_spend",
                rows.map(|r| rollup_by_month(&r, &range)),
            ),
            range,
        }
    }

    pub async fn accounts_view(&self) -> Panel<Vec<Account>> {
        Panel::from_result("accounts", self.accounts().await)
    }

    /// Transactions matching `filter`, limited to one page when no limit is set
    pub async fn transactions_view(&self, filter: &TransactionFilter) -> Panel<Vec<Transaction>> {
        let mut filter = filter.clone();
        if filter.limit.is_none() {
            filter.limit = Some(self.display.transactions_page_limit);
        }
        Panel::from_result("transactions", self.transactions(&filter).await)
    }

    pub async fn budgets_view(&self, period: &Period) -> BudgetView {
        let lines = self
            .budget_rows(period)
            .await
            .map(|rows| budget_status(&rows, &self.display.currency_symbol));
        BudgetView {
            period: period.clone(),
            lines: Panel::from_result("budgets", lines),
        }
    }
}
