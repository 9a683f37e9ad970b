//! Finance backend client
//!
//! The backend is consumed through four reads. Each returns the raw JSON
//! rows as the backend sent them; turning them into typed records is the
//! normalizer's job, after the rows have passed through the query cache.
//!
//! # Architecture
//!
//! - `FinanceApi` trait: the four reads
//! - `HttpFinanceApi`: reqwest implementation against the REST backend
//!
//! Any non-success status is returned as `Error::Api` and transport
//! failures as `Error::Http`. Nothing is retried here; the caller decides
//! what an unavailable read means for its view.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::TransactionFilter;
use crate::period::Period;

/// The backend reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Accounts,
    Transactions,
    SpendMonthly,
    BudgetStatus,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Accounts => "/accounts",
            Self::Transactions => "/transactions",
            Self::SpendMonthly => "/spend/monthly",
            Self::BudgetStatus => "/budget/status",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Transactions => "transactions",
            Self::SpendMonthly => "spend_monthly",
            Self::BudgetStatus => "budget_status",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query parameters for the monthly spend read
pub fn spend_monthly_params(from: NaiveDate, to: NaiveDate) -> Vec<(&'static str, String)> {
    vec![("frm", from.to_string()), ("to", to.to_string())]
}

/// Query parameters for the budget status read
pub fn budget_status_params(period: &Period) -> Vec<(&'static str, String)> {
    vec![("period", period.to_string())]
}

/// Trait defining the backend reads
///
/// Implementations must be Send + Sync so a dashboard can issue its reads
/// concurrently.
#[async_trait]
pub trait FinanceApi: Send + Sync {
    /// All active accounts
    async fn accounts(&self) -> Result<Vec<Value>>;

    /// Transactions matching `filter`, newest first
    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Value>>;

    /// Spend rows per month and category for months overlapping `from..=to`
    async fn spend_monthly(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Value>>;

    /// Budget rows for one period
    async fn budget_status(&self, period: &Period) -> Result<Vec<Value>>;
}

/// REST backend client
#[derive(Clone)]
pub struct HttpFinanceApi {
    http_client: Client,
    base_url: String,
}

impl HttpFinanceApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_rows(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let path = endpoint.path();
        debug!(endpoint = endpoint.as_str(), ?query, "GET {}", path);

        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body: Value = response.json().await?;
        rows_from_body(body, path)
    }
}

/// The backend answers with a JSON array of rows
fn rows_from_body(body: Value, path: &str) -> Result<Vec<Value>> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::InvalidData(format!(
            "{} returned {} instead of an array",
            path,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl FinanceApi for HttpFinanceApi {
    async fn accounts(&self) -> Result<Vec<Value>> {
        self.get_rows(Endpoint::Accounts, &[]).await
    }

    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Value>> {
        self.get_rows(Endpoint::Transactions, &filter.query_pairs())
            .await
    }

    async fn spend_monthly(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Value>> {
        self.get_rows(Endpoint::SpendMonthly, &spend_monthly_params(from, to))
            .await
    }

    async fn budget_status(&self, period: &Period) -> Result<Vec<Value>> {
        self.get_rows(Endpoint::BudgetStatus, &budget_status_params(period))
            .await
    }
}
