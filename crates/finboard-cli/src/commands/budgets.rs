//! Budgets command

use anyhow::Result;
use finboard_core::{BudgetLine, BudgetView, Dashboard, FinanceApi, Period};

use super::{bar, emit, finish, panel_lines, section, truncate, Output};

pub async fn cmd_budgets<A: FinanceApi>(
    dash: &Dashboard<A>,
    period: &Period,
    output: Output,
) -> Result<()> {
    let view = dash.budgets_view(period).await;
    emit(output, &view, render_budgets)
}

pub fn render_budgets(view: &BudgetView) -> String {
    let mut lines = section(&format!("🎯 Budgets · {}", view.period));
    lines.extend(panel_lines(&view.lines, |budget_lines| {
        if budget_lines.is_empty() {
            return vec!["   No budgets set for this month.".to_string()];
        }
        budget_lines.iter().map(budget_line).collect()
    }));
    lines.push(String::new());
    finish(lines)
}

pub fn budget_line(line: &BudgetLine) -> String {
    let label = if line.is_over {
        format!("\x1b[31m{}\x1b[0m", line.remaining_label)
    } else {
        line.remaining_label.clone()
    };
    format!(
        "   {:<20} │ {} {:>3}% │ {} of {} │ {}",
        truncate(&line.category, 20),
        bar(f64::from(line.percent_consumed), 100.0, 20),
        line.percent_consumed,
        line.spent_formatted,
        line.budget_formatted,
        label
    )
}
