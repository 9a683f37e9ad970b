//! Domain models for finboard
//!
//! Input entities are normalized snapshots of backend rows (see `normalize`).
//! Output structures are what the metrics engine hands to the presentation
//! layer. Nothing here is mutated after construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// A linked financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub institution: Option<String>,
    /// Last digits of the account number
    pub mask: Option<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Investment,
    #[default]
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Ok(Self::Credit),
            "investment" | "brokerage" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A posted transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    /// None when the backend sent no parseable date
    pub posted_at: Option<NaiveDate>,
    pub description: String,
    /// Signed amount: negative is an outflow, positive an inflow
    pub amount: f64,
    /// Non-blank category labels, in backend order
    pub categories: Vec<String>,
    pub currency: Option<String>,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    /// Spend magnitude: `abs(amount)` for outflows, zero for inflows
    pub fn spend(&self) -> f64 {
        if self.is_outflow() {
            self.amount.abs()
        } else {
            0.0
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.categories.iter().all(|c| c.trim().is_empty())
    }

    /// Categories joined for display, None when uncategorized
    pub fn category_label(&self) -> Option<String> {
        if self.is_uncategorized() {
            None
        } else {
            Some(self.categories.join(","))
        }
    }
}

/// Spend aggregated by the backend for one period and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRow {
    pub period: Period,
    /// None for uncategorized spend
    pub category: Option<String>,
    /// Always non-negative
    pub spend: f64,
}

/// Budget allotment and consumption for one category in a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatusRow {
    pub period: Period,
    pub category: String,
    pub budget: f64,
    /// Always non-negative
    pub actual_spend: f64,
    /// `budget - actual_spend` unless the backend supplied its own figure
    pub remaining: f64,
}

/// Filters for the transactions read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub search_text: Option<String>,
    pub account_id: Option<i64>,
}

impl TransactionFilter {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn between(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
            ..Default::default()
        }
    }

    /// Query parameters in the backend's naming, in a fixed order
    ///
    /// Blank search text is dropped.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.date_from {
            pairs.push(("frm", from.to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("to", to.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(q) = self.search_text.as_deref().map(str::trim) {
            if !q.is_empty() {
                pairs.push(("q", q.to_string()));
            }
        }
        if let Some(account_id) = self.account_id {
            pairs.push(("account_id", account_id.to_string()));
        }
        pairs
    }
}

// ========== Derived metrics ==========

/// Total spend for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpend {
    pub period: Period,
    pub total_spend: f64,
}

/// Headline numbers for the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub month_spend: f64,
    pub avg_daily_spend: f64,
    pub uncategorized_count: usize,
    pub transaction_count: usize,
}

/// One entry of the top-categories ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: Option<String>,
    pub spend: f64,
}

/// A budget row ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub spent_formatted: String,
    pub budget_formatted: String,
    /// "{n} left" or "{n} over"
    pub remaining_label: String,
    /// 0 to 100
    pub percent_consumed: u8,
    pub is_over: bool,
}
