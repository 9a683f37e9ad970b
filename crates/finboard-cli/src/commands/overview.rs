//! Overview command: the dashboard landing page

use anyhow::Result;
use chrono::NaiveDate;
use finboard_core::{
    format_money, CategorySpend, Dashboard, DisplayConfig, FinanceApi, Kpis, MonthlySpend,
    OverviewView, Transaction,
};

use super::{bar, colored_amount, emit, finish, panel_lines, section, truncate, Output};

pub async fn cmd_overview<A: FinanceApi>(
    dash: &Dashboard<A>,
    today: NaiveDate,
    output: Output,
) -> Result<()> {
    let view = dash.overview(today).await;
    emit(output, &view, |v| render_overview(v, dash.display()))
}

pub fn render_overview(view: &OverviewView, display: &DisplayConfig) -> String {
    let symbol = display.currency_symbol.as_str();
    let mut lines = vec![
        String::new(),
        "╭─────────────────────────────────────────╮".to_string(),
        format!("│      💰 Finboard Overview · {:<12}│", view.period.as_str()),
        "╰─────────────────────────────────────────╯".to_string(),
        String::new(),
    ];

    lines.extend(panel_lines(&view.kpis, |k| kpi_lines(k, symbol)));

    lines.extend(section("📈 Spend by Month"));
    lines.extend(panel_lines(&view.monthly_spend, |m| month_lines(m, symbol)));

    lines.extend(section("🏷️  Top Categories"));
    lines.extend(panel_lines(&view.top_categories, |c| category_lines(c, symbol)));

    lines.extend(section("📝 Recent Transactions"));
    lines.extend(panel_lines(&view.recent_transactions, |t| {
        transaction_lines(t, symbol)
    }));

    lines.push(String::new());
    finish(lines)
}

fn kpi_lines(kpis: &Kpis, symbol: &str) -> Vec<String> {
    let mut lines = vec![
        format!("  This month:      {}", format_money(kpis.month_spend, symbol)),
        format!("  Avg / day:       {}", format_money(kpis.avg_daily_spend, symbol)),
        format!("  Transactions:    {}", kpis.transaction_count),
    ];
    if kpis.uncategorized_count > 0 {
        lines.push(format!("  🏷️  Uncategorized: {}", kpis.uncategorized_count));
    } else {
        lines.push("  Uncategorized:   0".to_string());
    }
    lines
}

pub fn month_lines(months: &[MonthlySpend], symbol: &str) -> Vec<String> {
    if months.is_empty() {
        return vec!["   No spend in this window.".to_string()];
    }

    let max = months.iter().map(|m| m.total_spend).fold(0.0, f64::max);
    months
        .iter()
        .map(|m| {
            format!(
                "   {} │ {} │ {:>12}",
                m.period,
                bar(m.total_spend, max, 24),
                format_money(m.total_spend, symbol)
            )
        })
        .collect()
}

fn category_lines(categories: &[CategorySpend], symbol: &str) -> Vec<String> {
    if categories.is_empty() {
        return vec!["   No categorized spend this month.".to_string()];
    }

    let max = categories.iter().map(|c| c.spend).fold(0.0, f64::max);
    categories
        .iter()
        .map(|c| {
            format!(
                "   {:<20} │ {} │ {:>12}",
                truncate(c.category.as_deref().unwrap_or("(uncategorized)"), 20),
                bar(c.spend, max, 16),
                format_money(c.spend, symbol)
            )
        })
        .collect()
}

pub fn transaction_lines(transactions: &[Transaction], symbol: &str) -> Vec<String> {
    if transactions.is_empty() {
        return vec!["   No transactions found.".to_string()];
    }

    transactions
        .iter()
        .map(|tx| {
            let date = tx
                .posted_at
                .map(|d| d.to_string())
                .unwrap_or_else(|| "----------".to_string());
            let category = tx.category_label().unwrap_or_else(|| "-".to_string());
            format!(
                "   {} │ {:>10} │ {:<40} │ {}",
                date,
                colored_amount(tx.amount, symbol),
                truncate(&tx.description, 40),
                truncate(&category, 24)
            )
        })
        .collect()
}
