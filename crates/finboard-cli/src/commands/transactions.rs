//! Transactions command

use anyhow::{bail, Result};
use chrono::NaiveDate;
use finboard_core::{format_money, Dashboard, FinanceApi, Panel, Transaction, TransactionFilter};

use super::{emit, finish, panel_lines, section, transaction_lines, Output};

/// Build the filter from command-line arguments
pub fn transaction_filter(
    search: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: Option<u32>,
    account: Option<i64>,
) -> Result<TransactionFilter> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            bail!("--from {} is after --to {}", from, to);
        }
    }
    if limit == Some(0) {
        bail!("--limit must be at least 1");
    }

    Ok(TransactionFilter {
        date_from: from,
        date_to: to,
        limit,
        search_text: search.filter(|s| !s.trim().is_empty()),
        account_id: account,
    })
}

pub async fn cmd_transactions<A: FinanceApi>(
    dash: &Dashboard<A>,
    filter: &TransactionFilter,
    output: Output,
) -> Result<()> {
    let panel = dash.transactions_view(filter).await;
    let symbol = dash.display().currency_symbol.clone();
    emit(output, &panel, |p| render_transactions(p, filter, &symbol))
}

pub fn render_transactions(
    panel: &Panel<Vec<Transaction>>,
    filter: &TransactionFilter,
    symbol: &str,
) -> String {
    let title = match filter.search_text.as_deref() {
        Some(q) => format!("📝 Transactions matching \"{}\"", q),
        None => "📝 Transactions".to_string(),
    };
    let mut lines = section(&title);
    lines.extend(panel_lines(panel, |txs| {
        let mut out = transaction_lines(txs, symbol);
        if !txs.is_empty() {
            let uncategorized = txs.iter().filter(|t| t.is_uncategorized()).count();
            let spent: f64 = txs.iter().map(Transaction::spend).sum();
            out.push(String::new());
            out.push(format!(
                "   {} shown, {} uncategorized, {} spent",
                txs.len(),
                uncategorized,
                format_money(spent, symbol)
            ));
        }
        out
    }));
    lines.push(String::new());
    finish(lines)
}
