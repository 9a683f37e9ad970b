//! Metrics engine
//!
//! Pure aggregation over normalized snapshots. Every function here is
//! deterministic, performs no I/O, and never fails: empty input gives empty
//! or zero-valued output, which the dashboard renders as an empty state.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    BudgetLine, BudgetStatusRow, CategorySpend, Kpis, MonthlySpend, SpendRow, Transaction,
};
use crate::period::{days_elapsed, Period, PeriodRange};

/// Currency prefix used when none is configured
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Total spend per month within `range`, ascending by period
///
/// Categories within a month are combined. Months with no rows are not
/// filled in, so a trend built from sparse data has gaps rather than zeros.
pub fn rollup_by_month(rows: &[SpendRow], range: &PeriodRange) -> Vec<MonthlySpend> {
    let mut by_month: BTreeMap<&Period, f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| range.contains(&r.period)) {
        *by_month.entry(&row.period).or_insert(0.0) += row.spend;
    }

    by_month
        .into_iter()
        .map(|(period, total_spend)| MonthlySpend {
            period: period.clone(),
            total_spend,
        })
        .collect()
}

/// Headline KPIs for the month containing `today`
///
/// `spend_rows` may cover more than the current month; only rows in
/// today's period count toward `month_spend`. `transactions` is taken as
/// the already-windowed set and counted as given.
pub fn compute_kpis(
    spend_rows: &[SpendRow],
    transactions: &[Transaction],
    today: NaiveDate,
) -> Kpis {
    let current = Period::from_date(today);
    let month_spend: f64 = spend_rows
        .iter()
        .filter(|r| r.period == current)
        .map(|r| r.spend)
        .sum();

    let days = days_elapsed(today);
    let avg_daily_spend = if days == 0 {
        0.0
    } else {
        month_spend / f64::from(days)
    };

    Kpis {
        month_spend,
        avg_daily_spend,
        uncategorized_count: transactions.iter().filter(|t| t.is_uncategorized()).count(),
        transaction_count: transactions.len(),
    }
}

/// The `n` largest spend rows of the `current` month
///
/// Sorting is stable: rows with equal spend keep their input order.
pub fn top_categories(rows: &[SpendRow], current: &Period, n: usize) -> Vec<CategorySpend> {
    let mut month: Vec<&SpendRow> = rows.iter().filter(|r| r.period == *current).collect();
    month.sort_by(|a, b| b.spend.total_cmp(&a.spend));

    month
        .into_iter()
        .take(n)
        .map(|r| CategorySpend {
            category: r.category.clone(),
            spend: r.spend,
        })
        .collect()
}

/// Display lines for budget rows, in input order
pub fn budget_status(rows: &[BudgetStatusRow], symbol: &str) -> Vec<BudgetLine> {
    rows.iter()
        .map(|r| BudgetLine {
            category: r.category.clone(),
            spent_formatted: format_money(r.actual_spend, symbol),
            budget_formatted: format_money(r.budget, symbol),
            remaining_label: remaining_label(r.remaining),
            percent_consumed: percent_consumed(r.actual_spend, r.budget),
            is_over: r.remaining < 0.0,
        })
        .collect()
}

/// `round(100 * spent / budget)` clamped to 0..=100
///
/// A zero budget reports 0% even when money was spent against it.
pub fn percent_consumed(actual_spend: f64, budget: f64) -> u8 {
    if budget == 0.0 || !budget.is_finite() {
        return 0;
    }
    let pct = (100.0 * actual_spend / budget).round();
    if pct.is_nan() {
        return 0;
    }
    pct.clamp(0.0, 100.0) as u8
}

/// "{n} left" for zero or positive remaining, "{n} over" otherwise
pub fn remaining_label(remaining: f64) -> String {
    // abs() also folds -0.0 into "0.00 left"
    if remaining >= 0.0 {
        format!("{:.2} left", remaining.abs())
    } else {
        format!("{:.2} over", remaining.abs())
    }
}

/// Two decimals behind a literal currency prefix, sign in front: `-$12.00`
pub fn format_money(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{:.2}", sign, symbol, amount.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(s: &str) -> Period {
        s.parse().unwrap()
    }

    fn spend(p: &str, category: Option<&str>, amount: f64) -> SpendRow {
        SpendRow {
            period: period(p),
            category: category.map(str::to_string),
            spend: amount,
        }
    }

    fn tx(id: i64, categories: &[&str]) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            posted_at: None,
            description: format!("tx {}", id),
            amount: -10.0,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            currency: None,
        }
    }

    fn budget(category: &str, budget: f64, actual_spend: f64) -> BudgetStatusRow {
        BudgetStatusRow {
            period: period("2024-01"),
            category: category.to_string(),
            budget,
            actual_spend,
            remaining: budget - actual_spend,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========== Monthly rollup ==========

    #[test]
    fn test_rollup_combines_categories() {
        let rows = vec![
            spend("2024-01", Some("Food"), 120.0),
            spend("2024-01", Some("Rent"), 1500.0),
            spend("2024-02", Some("Food"), 90.0),
        ];
        let range = PeriodRange::new(period("2024-01"), period("2024-02"));

        let rollup = rollup_by_month(&rows, &range);
        assert_eq!(
            rollup,
            vec![
                MonthlySpend {
                    period: period("2024-01"),
                    total_spend: 1620.0
                },
                MonthlySpend {
                    period: period("2024-02"),
                    total_spend: 90.0
                },
            ]
        );
    }

    #[test]
    fn test_rollup_sorts_ascending_regardless_of_input_order() {
        let rows = vec![
            spend("2024-03", None, 3.0),
            spend("2023-12", None, 1.0),
            spend("2024-01", None, 2.0),
        ];
        let range = PeriodRange::new(period("2023-01"), period("2024-12"));
        let periods: Vec<String> = rollup_by_month(&rows, &range)
            .into_iter()
            .map(|m| m.period.to_string())
            .collect();
        assert_eq!(periods, vec!["2023-12", "2024-01", "2024-03"]);
    }

    #[test]
    fn test_rollup_excludes_out_of_range_and_unresolved() {
        let rows = vec![
            spend("2023-12", None, 50.0),
            spend("2024-01", None, 10.0),
            spend("2024-03", None, 70.0),
            SpendRow {
                period: Period::default(),
                category: None,
                spend: 999.0,
            },
        ];
        let range = PeriodRange::new(period("2024-01"), period("2024-02"));
        let rollup = rollup_by_month(&rows, &range);
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].total_spend, 10.0);
    }

    #[test]
    fn test_rollup_skips_unpadded_month() {
        let rows = vec![
            SpendRow {
                period: Period::truncate("2024-1-15"),
                category: None,
                spend: 10.0,
            },
            spend("2024-03", None, 5.0),
        ];
        let range = PeriodRange::new(period("2024-01"), period("2024-12"));
        assert_eq!(
            rollup_by_month(&rows, &range),
            vec![MonthlySpend {
                period: period("2024-03"),
                total_spend: 5.0
            }]
        );
    }

    #[test]
    fn test_rollup_normalized_unpadded_month() {
        let raw = vec![
            serde_json::json!({ "month": "2024-1-15", "spend": 10 }),
            serde_json::json!({ "month": "2024-03", "spend": 5 }),
        ];
        let rows = crate::normalize::normalize_spend_rows(&raw);
        let range = PeriodRange::new(period("2024-01"), period("2024-12"));
        let rollup = rollup_by_month(&rows, &range);
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].period, period("2024-03"));
    }

    #[test]
    fn test_rollup_does_not_fill_gaps() {
        let rows = vec![spend("2024-01", None, 1.0), spend("2024-04", None, 4.0)];
        let range = PeriodRange::new(period("2024-01"), period("2024-04"));
        assert_eq!(rollup_by_month(&rows, &range).len(), 2);
    }

    #[test]
    fn test_rollup_preserves_mass_in_range() {
        let rows = vec![
            spend("2023-11", Some("a"), 12.25),
            spend("2024-01", Some("a"), 30.5),
            spend("2024-01", Some("b"), 0.75),
            spend("2024-02", None, 8.0),
            spend("2024-06", Some("c"), 100.0),
        ];
        let range = PeriodRange::new(period("2024-01"), period("2024-05"));
        let rolled: f64 = rollup_by_month(&rows, &range)
            .iter()
            .map(|m| m.total_spend)
            .sum();
        let direct: f64 = rows
            .iter()
            .filter(|r| range.contains(&r.period))
            .map(|r| r.spend)
            .sum();
        assert_eq!(rolled, direct);
    }

    #[test]
    fn test_rollup_empty() {
        let range = PeriodRange::trailing(date(2024, 1, 1), 12);
        assert!(rollup_by_month(&[], &range).is_empty());
    }

    // ========== KPIs ==========

    #[test]
    fn test_kpis_month_spend_and_average() {
        let rows = vec![
            spend("2024-01", Some("Food"), 100.0),
            spend("2024-01", None, 50.0),
            spend("2023-12", Some("Food"), 400.0),
        ];
        let kpis = compute_kpis(&rows, &[], date(2024, 1, 10));
        assert_eq!(kpis.month_spend, 150.0);
        assert_eq!(kpis.avg_daily_spend, 15.0);
        assert_eq!(kpis.transaction_count, 0);
        assert_eq!(kpis.uncategorized_count, 0);
    }

    #[test]
    fn test_kpis_uncategorized_count() {
        let txs = vec![
            tx(1, &["Groceries"]),
            tx(2, &[""]),
            tx(3, &[]),
            tx(4, &["Dining"]),
            tx(5, &["Rent"]),
        ];
        let kpis = compute_kpis(&[], &txs, date(2024, 1, 1));
        assert_eq!(kpis.uncategorized_count, 2);
        assert_eq!(kpis.transaction_count, 5);
    }

    #[test]
    fn test_kpis_first_day_of_month() {
        let rows = vec![spend("2024-02", None, 42.0)];
        let kpis = compute_kpis(&rows, &[], date(2024, 2, 1));
        assert_eq!(kpis.avg_daily_spend, 42.0);
    }

    #[test]
    fn test_kpis_empty_input() {
        let kpis = compute_kpis(&[], &[], date(2024, 2, 15));
        assert_eq!(
            kpis,
            Kpis {
                month_spend: 0.0,
                avg_daily_spend: 0.0,
                uncategorized_count: 0,
                transaction_count: 0,
            }
        );
    }

    // ========== Top categories ==========

    #[test]
    fn test_top_categories_sorted_and_truncated() {
        let rows = vec![
            spend("2024-01", Some("Food"), 120.0),
            spend("2024-01", Some("Rent"), 1500.0),
            spend("2024-01", Some("Fuel"), 60.0),
            spend("2024-01", None, 200.0),
            spend("2023-12", Some("Gifts"), 5000.0),
        ];
        let top = top_categories(&rows, &period("2024-01"), 3);
        let names: Vec<Option<&str>> = top.iter().map(|c| c.category.as_deref()).collect();
        assert_eq!(names, vec![Some("Rent"), None, Some("Food")]);
    }

    #[test]
    fn test_top_categories_ties_keep_input_order() {
        let rows = vec![
            spend("2024-01", Some("b"), 50.0),
            spend("2024-01", Some("a"), 50.0),
            spend("2024-01", Some("c"), 75.0),
            spend("2024-01", Some("d"), 50.0),
        ];
        let top = top_categories(&rows, &period("2024-01"), 10);
        let names: Vec<&str> = top.iter().filter_map(|c| c.category.as_deref()).collect();
        assert_eq!(names, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_top_categories_never_exceeds_n() {
        let rows: Vec<SpendRow> = (0..20)
            .map(|i| spend("2024-01", Some("x"), f64::from(i)))
            .collect();
        assert_eq!(top_categories(&rows, &period("2024-01"), 8).len(), 8);
        assert!(top_categories(&rows, &period("2024-01"), 0).is_empty());
        assert!(top_categories(&rows, &period("2024-02"), 8).is_empty());
    }

    // ========== Budget status ==========

    #[test]
    fn test_budget_over_spent() {
        let lines = budget_status(&[budget("Food", 300.0, 340.0)], "$");
        let line = &lines[0];
        assert_eq!(line.category, "Food");
        assert_eq!(line.percent_consumed, 100);
        assert_eq!(line.remaining_label, "40.00 over");
        assert_eq!(line.spent_formatted, "$340.00");
        assert_eq!(line.budget_formatted, "$300.00");
        assert!(line.is_over);
    }

    #[test]
    fn test_budget_under_spent() {
        let lines = budget_status(&[budget("Fuel", 200.0, 50.0)], "$");
        assert_eq!(lines[0].percent_consumed, 25);
        assert_eq!(lines[0].remaining_label, "150.00 left");
        assert!(!lines[0].is_over);
    }

    #[test]
    fn test_remaining_label_boundary() {
        assert_eq!(remaining_label(0.0), "0.00 left");
        assert_eq!(remaining_label(-0.01), "0.01 over");
        assert_eq!(remaining_label(12.345), "12.35 left");
    }

    #[test]
    fn test_percent_consumed_zero_budget() {
        assert_eq!(percent_consumed(0.0, 0.0), 0);
        assert_eq!(percent_consumed(250.0, 0.0), 0);
    }

    #[test]
    fn test_percent_consumed_stays_in_bounds() {
        for (spent, budget) in [
            (0.0, 100.0),
            (0.4, 100.0),
            (0.5, 100.0),
            (99.6, 100.0),
            (100.0, 100.0),
            (1e9, 1.0),
            (1.0, 1e-9),
            (5.0, 0.0),
        ] {
            let pct = percent_consumed(spent, budget);
            assert!(pct <= 100, "{} / {} gave {}", spent, budget, pct);
        }
        assert_eq!(percent_consumed(0.5, 100.0), 1);
        assert_eq!(percent_consumed(99.6, 100.0), 100);
    }

    #[test]
    fn test_budget_status_keeps_order_and_symbol() {
        let lines = budget_status(&[budget("b", 10.0, 1.0), budget("a", 10.0, 2.0)], "€");
        assert_eq!(lines[0].category, "b");
        assert_eq!(lines[1].category, "a");
        assert_eq!(lines[1].spent_formatted, "€2.00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.0, "$"), "$12.00");
        assert_eq!(format_money(-12.5, "$"), "-$12.50");
        assert_eq!(format_money(0.0, "$"), "$0.00");
    }
}
