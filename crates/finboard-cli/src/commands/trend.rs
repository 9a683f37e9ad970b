//! Trend command: spend by month

use anyhow::Result;
use chrono::NaiveDate;
use finboard_core::{format_money, Dashboard, FinanceApi, TrendView};

use super::{emit, finish, month_lines, panel_lines, section, Output};

pub async fn cmd_trend<A: FinanceApi>(
    dash: &Dashboard<A>,
    today: NaiveDate,
    months: u32,
    output: Output,
) -> Result<()> {
    let view = dash.trend_view(today, months).await;
    let symbol = dash.display().currency_symbol.clone();
    emit(output, &view, |v| render_trend(v, &symbol))
}

pub fn render_trend(view: &TrendView, symbol: &str) -> String {
    let mut lines = section(&format!(
        "📈 Spend by Month · {} to {}",
        view.range.from, view.range.to
    ));
    lines.extend(panel_lines(&view.months, |months| {
        let mut out = month_lines(months, symbol);
        if !months.is_empty() {
            let total: f64 = months.iter().map(|m| m.total_spend).sum();
            out.push(format!(
                "   Total {} across {} month(s)",
                format_money(total, symbol),
                months.len()
            ));
        }
        out
    }));
    lines.push(String::new());
    finish(lines)
}
