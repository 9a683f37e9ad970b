//! Test utilities for finboard-core
//!
//! This module provides a mock finance backend that serves a fixed dataset
//! over HTTP. The dataset is centred on March 2024 (use 2024-03-15 as
//! "today") and mixes every field-name variant the normalizer accepts.
//!
//! Fixture facts the tests rely on:
//! - 7 transactions, 5 of them in March 2024, 2 of those uncategorized
//! - 7 spend rows, 3 in March 2024, 1 older than the trailing 12 months
//! - 3 budget rows for 2024-03, 1 for 2024-02
//! - 2 accounts

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::api::Endpoint;
use crate::normalize::{normalize_budget_row, normalize_spend_row, normalize_transaction};
use crate::period::Period;

type Params = Query<HashMap<String, String>>;
type Reply = std::result::Result<Json<Value>, StatusCode>;

/// Request counters and failure switches shared with the handlers
#[derive(Default)]
struct MockState {
    hits: Mutex<HashMap<Endpoint, usize>>,
    failing: Mutex<HashSet<Endpoint>>,
}

impl MockState {
    fn record(&self, endpoint: Endpoint) -> std::result::Result<(), StatusCode> {
        *self.hits.lock().unwrap().entry(endpoint).or_insert(0) += 1;
        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Ok(())
    }
}

/// Mock finance backend for testing
pub struct MockFinanceServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockFinanceServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route(Endpoint::Accounts.path(), get(handle_accounts))
            .route(Endpoint::Transactions.path(), get(handle_transactions))
            .route(Endpoint::SpendMonthly.path(), get(handle_spend_monthly))
            .route(Endpoint::BudgetStatus.path(), get(handle_budget_status))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received for `endpoint`, failed ones included
    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// Answer 500 for `endpoint` until `recover` is called
    pub fn fail(&self, endpoint: Endpoint) {
        self.state.failing.lock().unwrap().insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state.failing.lock().unwrap().remove(&endpoint);
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockFinanceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_accounts(State(state): State<Arc<MockState>>) -> Reply {
    state.record(Endpoint::Accounts)?;
    Ok(Json(accounts_fixture()))
}

/// Supports `frm`, `to`, `limit` (default 100), and `q` on the description
async fn handle_transactions(State(state): State<Arc<MockState>>, Query(params): Params) -> Reply {
    state.record(Endpoint::Transactions)?;

    let from = date_param(&params, "frm");
    let to = date_param(&params, "to");
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(100);
    let q = params.get("q").map(|q| q.to_lowercase());

    let rows: Vec<Value> = fixture_rows(transactions_fixture())
        .into_iter()
        .filter(|row| {
            let tx = normalize_transaction(row);
            let after = match (from, tx.posted_at) {
                (Some(from), Some(d)) => d >= from,
                _ => true,
            };
            let before = match (to, tx.posted_at) {
                (Some(to), Some(d)) => d <= to,
                _ => true,
            };
            let matches = q
                .as_deref()
                .is_none_or(|q| tx.description.to_lowercase().contains(q));
            after && before && matches
        })
        .take(limit)
        .collect();

    Ok(Json(Value::Array(rows)))
}

/// Keeps rows whose month overlaps `frm..=to`
async fn handle_spend_monthly(State(state): State<Arc<MockState>>, Query(params): Params) -> Reply {
    state.record(Endpoint::SpendMonthly)?;

    let from = params.get("frm").map(|s| Period::truncate(s));
    let to = params.get("to").map(|s| Period::truncate(s));

    let rows: Vec<Value> = fixture_rows(spend_fixture())
        .into_iter()
        .filter(|row| {
            let period = normalize_spend_row(row).period;
            let after = from.as_ref().is_none_or(|f| period >= *f);
            let before = to.as_ref().is_none_or(|t| period <= *t);
            after && before
        })
        .collect();

    Ok(Json(Value::Array(rows)))
}

async fn handle_budget_status(State(state): State<Arc<MockState>>, Query(params): Params) -> Reply {
    state.record(Endpoint::BudgetStatus)?;

    let period = params.get("period").map(|s| Period::truncate(s));
    let rows: Vec<Value> = fixture_rows(budget_fixture())
        .into_iter()
        .filter(|row| {
            period
                .as_ref()
                .is_none_or(|p| normalize_budget_row(row).period == *p)
        })
        .collect();

    Ok(Json(Value::Array(rows)))
}

fn date_param(params: &HashMap<String, String>, key: &str) -> Option<NaiveDate> {
    params
        .get(key)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn fixture_rows(fixture: Value) -> Vec<Value> {
    match fixture {
        Value::Array(rows) => rows,
        _ => Vec::new(),
    }
}

pub fn accounts_fixture() -> Value {
    json!([
        {
            "id": 1,
            "name": "Everyday Checking",
            "type": "depository",
            "subtype": "checking",
            "currency": "USD",
            "mask": "4321",
            "institution": "First Bank"
        },
        {
            "id": 2,
            "name": "Travel Card",
            "type": "credit",
            "currency": "USD",
            "mask": null,
            "institution": null
        }
    ])
}

/// Newest first, as the backend orders them
pub fn transactions_fixture() -> Value {
    json!([
        {"id": 7, "posted_at": "2024-03-14T00:00:00", "amount": "-54.20", "description": "WHOLE FOODS", "account_id": 1, "categories": "groceries"},
        {"id": 6, "posted_at": "2024-03-12", "amount": -12.5, "description": "COFFEE CART", "account_id": 1, "categories": ""},
        {"id": 5, "posted_at": "2024-03-09", "amount": 2500, "description": "PAYROLL", "account_id": 1},
        {"id": 4, "posted_at": "2024-03-05", "amount": "-1500.00", "description": "RENT MARCH", "account_id": 1, "categories": "rent"},
        {"id": 3, "posted_at": "2024-03-02", "amount": -88.1, "description": "AIRLINE TICKETS", "account_id": 2, "categories": "dining,travel"},
        {"id": 2, "posted_at": "2024-02-27", "amount": -30, "description": "GAS STATION", "account_id": 2, "categories": "fuel"},
        {"id": 1, "posted_at": "2024-02-03", "amount": -1400, "description": "RENT FEB", "account_id": 1, "categories": null}
    ])
}

pub fn spend_fixture() -> Value {
    json!([
        {"month": "2024-03-01T00:00:00", "category": "rent", "spend": "1500.00"},
        {"month": "2024-03-01", "category": "groceries", "spend": -54.2},
        {"period": "2024-03", "category": null, "amount": 12.5},
        {"month": "2024-02-01", "category": "rent", "spend": 1400},
        {"month": "2024-02-01", "category": "fuel", "spend": 30},
        ["2024-01-01", "dining", 95.25],
        {"month": "2023-02-01", "category": "rent", "spend": 1400}
    ])
}

pub fn budget_fixture() -> Value {
    json!([
        {"category_id": 1, "period_start": "2024-03-01", "category": "groceries", "budget": 300, "actual_spend": 340},
        {"category_id": 2, "period_start": "2024-03-01", "code": "dining", "budget": "150.00", "spent": "-60.00"},
        {"category_id": 3, "period_start": "2024-03-01", "category": "gifts", "budget": 0, "actual_spend": 25, "remaining": -25},
        {"category_id": 1, "period_start": "2024-02-01", "category": "groceries", "budget": 300, "actual_spend": 120}
    ])
}
