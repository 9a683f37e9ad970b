//! Record normalizer
//!
//! Backend rows arrive as loosely-typed JSON: the same attribute can appear
//! under several names, as an array position, as a number or a numeric
//! string, or not at all. Each attribute here has a fixed priority list of
//! `Field` keys. Keys are tried in order and the first present value wins.
//!
//! Normalization never fails. Anything that cannot be resolved takes the
//! documented default for that attribute.
//!
//! Presence rules:
//! - JSON `null` counts as absent for every attribute.
//! - Text attributes also treat blank strings as absent, so `category: ""`
//!   falls through to the next key exactly like a missing `category`.
//! - Numeric attributes take the first non-null value; if it does not parse
//!   as a finite number the default applies.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{Account, AccountType, BudgetStatusRow, SpendRow, Transaction};
use crate::period::Period;

/// Category used for budget rows that carry neither `category` nor `code`
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Currency assumed for accounts that do not state one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Where to look for an attribute in a raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Object key
    Named(&'static str),
    /// Array position
    Index(usize),
}

use Field::{Index, Named};

const SPEND_PERIOD: &[Field] = &[Named("month"), Named("period"), Index(0)];
const SPEND_CATEGORY: &[Field] = &[Named("category"), Index(1)];
const SPEND_AMOUNT: &[Field] = &[Named("spend"), Named("amount"), Index(2)];

const BUDGET_PERIOD: &[Field] = &[Named("period"), Named("period_start")];
const BUDGET_CATEGORY: &[Field] = &[Named("category"), Named("code")];
const BUDGET_AMOUNT: &[Field] = &[Named("budget")];
const BUDGET_ACTUAL: &[Field] = &[Named("actual_spend"), Named("spent")];
const BUDGET_REMAINING: &[Field] = &[Named("remaining")];

const TX_ID: &[Field] = &[Named("id")];
const TX_ACCOUNT: &[Field] = &[Named("account_id")];
const TX_POSTED: &[Field] = &[Named("posted_at"), Named("date")];
const TX_DESCRIPTION: &[Field] = &[Named("description"), Named("normalized_desc")];
const TX_AMOUNT: &[Field] = &[Named("amount")];
const TX_CATEGORIES: &[Field] = &[Named("categories"), Named("category")];
const TX_CURRENCY: &[Field] = &[Named("currency")];

const ACCOUNT_ID: &[Field] = &[Named("id")];
const ACCOUNT_NAME: &[Field] = &[Named("name")];
const ACCOUNT_INSTITUTION: &[Field] = &[Named("institution"), Named("institution_name")];
const ACCOUNT_MASK: &[Field] = &[Named("mask"), Named("last_four")];
const ACCOUNT_TYPE: &[Field] = &[Named("type"), Named("subtype"), Named("account_type")];
const ACCOUNT_CURRENCY: &[Field] = &[Named("currency"), Named("currency_code")];

/// Normalize one monthly spend row
pub fn normalize_spend_row(raw: &Value) -> SpendRow {
    let period = resolve_text(raw, SPEND_PERIOD)
        .map(|p| Period::resolve(&p))
        .unwrap_or_default();
    let category = resolve_text(raw, SPEND_CATEGORY);
    let spend = resolve_number(raw, SPEND_AMOUNT).unwrap_or(0.0).abs();

    SpendRow {
        period,
        category,
        spend,
    }
}

/// Normalize one budget status row
pub fn normalize_budget_row(raw: &Value) -> BudgetStatusRow {
    let period = resolve_text(raw, BUDGET_PERIOD)
        .map(|p| Period::resolve(&p))
        .unwrap_or_default();
    let category =
        resolve_text(raw, BUDGET_CATEGORY).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    let budget = resolve_number(raw, BUDGET_AMOUNT).unwrap_or(0.0);
    let actual_spend = resolve_number(raw, BUDGET_ACTUAL).unwrap_or(0.0).abs();
    let remaining = resolve_number(raw, BUDGET_REMAINING).unwrap_or(budget - actual_spend);

    BudgetStatusRow {
        period,
        category,
        budget,
        actual_spend,
        remaining,
    }
}

/// Normalize one transaction row
pub fn normalize_transaction(raw: &Value) -> Transaction {
    Transaction {
        id: resolve_integer(raw, TX_ID).unwrap_or(0),
        account_id: resolve_integer(raw, TX_ACCOUNT).unwrap_or(0),
        posted_at: resolve_text(raw, TX_POSTED).and_then(|s| parse_date(&s)),
        description: resolve_text(raw, TX_DESCRIPTION).unwrap_or_default(),
        amount: resolve_number(raw, TX_AMOUNT).unwrap_or(0.0),
        categories: resolve(raw, TX_CATEGORIES)
            .map(category_labels)
            .unwrap_or_default(),
        currency: resolve_text(raw, TX_CURRENCY),
    }
}

/// Normalize one account row
pub fn normalize_account(raw: &Value) -> Account {
    // First key whose value names a known type wins, so a generic
    // `type: "depository"` still yields the `subtype: "checking"` behind it.
    let account_type = ACCOUNT_TYPE
        .iter()
        .filter_map(|f| lookup(raw, *f).and_then(as_text))
        .find_map(|t| t.parse::<AccountType>().ok())
        .unwrap_or_default();

    Account {
        id: resolve_integer(raw, ACCOUNT_ID).unwrap_or(0),
        name: resolve_text(raw, ACCOUNT_NAME).unwrap_or_default(),
        institution: resolve_text(raw, ACCOUNT_INSTITUTION),
        mask: resolve_text(raw, ACCOUNT_MASK),
        account_type,
        currency: resolve_text(raw, ACCOUNT_CURRENCY)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    }
}

pub fn normalize_spend_rows(raw: &[Value]) -> Vec<SpendRow> {
    raw.iter().map(normalize_spend_row).collect()
}

pub fn normalize_budget_rows(raw: &[Value]) -> Vec<BudgetStatusRow> {
    raw.iter().map(normalize_budget_row).collect()
}

pub fn normalize_transactions(raw: &[Value]) -> Vec<Transaction> {
    raw.iter().map(normalize_transaction).collect()
}

pub fn normalize_accounts(raw: &[Value]) -> Vec<Account> {
    raw.iter().map(normalize_account).collect()
}

// ========== Field resolution ==========

fn lookup(raw: &Value, field: Field) -> Option<&Value> {
    let value = match field {
        Named(key) => raw.get(key),
        Index(i) => raw.get(i),
    }?;
    (!value.is_null()).then_some(value)
}

/// First non-null value among `fields`
fn resolve<'a>(raw: &'a Value, fields: &[Field]) -> Option<&'a Value> {
    fields.iter().find_map(|f| lookup(raw, *f))
}

/// First non-blank text among `fields`
fn resolve_text(raw: &Value, fields: &[Field]) -> Option<String> {
    fields.iter().find_map(|f| lookup(raw, *f).and_then(as_text))
}

fn resolve_number(raw: &Value, fields: &[Field]) -> Option<f64> {
    resolve(raw, fields).and_then(as_number)
}

fn resolve_integer(raw: &Value, fields: &[Field]) -> Option<i64> {
    resolve(raw, fields).and_then(as_integer)
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Numbers may be JSON numbers or numeric strings (database decimals)
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` with an optional time suffix
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Category labels from a comma-joined string or an array of labels
fn category_labels(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        _ => Vec::new(),
    }
}
