//! Aggregation over a user's transaction ledger.
//!
//! Every function here is a pure function of a slice of transactions (and,
//! for time-windowed reports, an explicit reference instant), so results are
//! reproducible and tests can pin "now". Nothing is cached; each call
//! re-aggregates the rows it is given.

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    report::period::{
        Period, PeriodWindow, current_month_window, period_window, previous_month_window,
    },
    transaction::Transaction,
};

/// Balance, income and expense totals for a set of transactions.
///
/// `expense` is the raw signed sum of the negative amounts, i.e. zero or
/// negative. Presentation layers take the absolute value for display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// The net total, equal to `income + expense`.
    pub balance: f64,
    /// The sum of all positive amounts.
    pub income: f64,
    /// The signed sum of all negative amounts.
    pub expense: f64,
}

/// The expense total for one category, as a share of all expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category name.
    pub category: String,
    /// The absolute sum of the category's expense amounts.
    pub total: f64,
    /// The category's share of all expenses, 0-100, rounded to one decimal
    /// place.
    pub percentage: f64,
}

/// Expense totals for the current and immediately preceding calendar months
/// (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyComparison {
    /// The expense magnitude for the calendar month containing the reference
    /// instant.
    #[serde(rename = "currentMonth")]
    pub current_month: f64,
    /// The expense magnitude for the calendar month before that.
    #[serde(rename = "previousMonth")]
    pub previous_month: f64,
}

/// Compute the balance, income and expense totals for `transactions`.
///
/// Zero transactions produce all-zero totals, not an error.
pub fn compute_summary(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();

    for transaction in transactions {
        if transaction.amount > 0.0 {
            summary.income += transaction.amount;
        } else {
            summary.expense += transaction.amount;
        }

        summary.balance += transaction.amount;
    }

    summary
}

/// Group the expense transactions by category, largest spending first.
///
/// Categories with equal totals are ordered by name so the output is
/// deterministic. No expense transactions produce an empty list, not an
/// error; otherwise the percentages sum to 100 within rounding tolerance.
pub fn compute_category_summary(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.amount < 0.0) {
        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount.abs();
    }

    let grand_total: f64 = totals.values().sum();

    let mut categories: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, total)| CategorySummary {
            category: category.to_owned(),
            total,
            percentage: round_to_one_decimal(total / grand_total * 100.0),
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    categories
}

/// Compare the expense magnitudes of the calendar month containing `now`
/// and the month before it.
///
/// A month with no expense transactions contributes zero.
pub fn compute_monthly_comparison(
    transactions: &[Transaction],
    now: OffsetDateTime,
) -> MonthlyComparison {
    MonthlyComparison {
        current_month: expense_magnitude_in(transactions, current_month_window(now)),
        previous_month: expense_magnitude_in(transactions, previous_month_window(now)),
    }
}

/// Compute the summary for the transactions that fall within `period`,
/// relative to the reference instant `now`.
///
/// An empty window produces all-zero totals.
pub fn compute_summary_report(
    transactions: &[Transaction],
    period: Period,
    now: OffsetDateTime,
) -> Summary {
    let window = period_window(period, now);
    let windowed: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| window.contains(transaction.created_at))
        .cloned()
        .collect();

    compute_summary(&windowed)
}

fn expense_magnitude_in(transactions: &[Transaction], window: PeriodWindow) -> f64 {
    transactions
        .iter()
        .filter(|t| t.amount < 0.0 && window.contains(t.created_at))
        .map(|t| t.amount.abs())
        .sum()
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        report::period::Period,
        transaction::Transaction,
    };

    use super::{
        CategorySummary, compute_category_summary, compute_monthly_comparison, compute_summary,
        compute_summary_report,
    };

    fn create_test_transaction(
        amount: f64,
        category: &str,
        created_at: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: 0,
            user_id: "user_1".to_owned(),
            title: "Test".to_owned(),
            amount,
            category: category.to_owned(),
            created_at,
        }
    }

    #[test]
    fn summary_sums_income_and_expenses() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-50.0, "Food & Drinks", created_at),
            create_test_transaction(-50.0, "Food & Drinks", created_at),
            create_test_transaction(200.0, "Income", created_at),
        ];

        let summary = compute_summary(&transactions);

        assert_eq!(summary.balance, 100.0);
        assert_eq!(summary.income, 200.0);
        assert_eq!(summary.expense, -100.0);
    }

    #[test]
    fn summary_of_empty_ledger_is_all_zeroes() {
        let summary = compute_summary(&[]);

        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.expense, 0.0);
    }

    #[test]
    fn summary_balance_equals_income_plus_expense() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(1200.5, "Income", created_at),
            create_test_transaction(-300.25, "Bills", created_at),
            create_test_transaction(-99.99, "Shopping", created_at),
            create_test_transaction(45.0, "Other", created_at),
        ];

        let summary = compute_summary(&transactions);

        assert!(summary.expense <= 0.0);
        assert!((summary.balance - (summary.income + summary.expense)).abs() < 1e-9);
    }

    #[test]
    fn category_summary_of_single_category_is_one_hundred_percent() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-50.0, "Food & Drinks", created_at),
            create_test_transaction(-50.0, "Food & Drinks", created_at),
            create_test_transaction(200.0, "Income", created_at),
        ];

        let categories = compute_category_summary(&transactions);

        assert_eq!(
            categories,
            vec![CategorySummary {
                category: "Food & Drinks".to_owned(),
                total: 100.0,
                percentage: 100.0,
            }]
        );
    }

    #[test]
    fn category_summary_orders_by_descending_total() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-25.0, "Transportation", created_at),
            create_test_transaction(-75.0, "Food & Drinks", created_at),
        ];

        let categories = compute_category_summary(&transactions);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Food & Drinks");
        assert_eq!(categories[0].total, 75.0);
        assert_eq!(categories[0].percentage, 75.0);
        assert_eq!(categories[1].category, "Transportation");
        assert_eq!(categories[1].total, 25.0);
        assert_eq!(categories[1].percentage, 25.0);
    }

    #[test]
    fn category_summary_breaks_ties_by_name() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-10.0, "Shopping", created_at),
            create_test_transaction(-10.0, "Bills", created_at),
            create_test_transaction(-10.0, "Entertainment", created_at),
        ];

        let categories = compute_category_summary(&transactions);

        let names: Vec<&str> = categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Bills", "Entertainment", "Shopping"]);
    }

    #[test]
    fn category_summary_percentages_sum_to_one_hundred() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-10.0, "Bills", created_at),
            create_test_transaction(-10.0, "Shopping", created_at),
            create_test_transaction(-10.0, "Entertainment", created_at),
        ];

        let categories = compute_category_summary(&transactions);

        let percentage_sum: f64 = categories.iter().map(|c| c.percentage).sum();
        assert!((percentage_sum - 100.0).abs() <= 0.1);
    }

    #[test]
    fn category_summary_ignores_income() {
        let created_at = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(200.0, "Income", created_at),
            create_test_transaction(3000.0, "Other", created_at),
        ];

        let categories = compute_category_summary(&transactions);

        assert_eq!(categories, vec![]);
    }

    #[test]
    fn category_summary_of_empty_ledger_is_empty() {
        assert_eq!(compute_category_summary(&[]), vec![]);
    }

    #[test]
    fn monthly_comparison_buckets_by_calendar_month() {
        let now = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-30.0, "Bills", datetime!(2025-10-02 10:00 UTC)),
            create_test_transaction(-20.0, "Bills", datetime!(2025-10-14 10:00 UTC)),
            create_test_transaction(-80.0, "Bills", datetime!(2025-09-28 10:00 UTC)),
            // Outside both months, must not be counted.
            create_test_transaction(-999.0, "Bills", datetime!(2025-08-31 10:00 UTC)),
            // Income must not be counted.
            create_test_transaction(500.0, "Income", datetime!(2025-10-03 10:00 UTC)),
        ];

        let comparison = compute_monthly_comparison(&transactions, now);

        assert_eq!(comparison.current_month, 50.0);
        assert_eq!(comparison.previous_month, 80.0);
    }

    #[test]
    fn monthly_comparison_of_empty_months_is_zero() {
        let comparison = compute_monthly_comparison(&[], datetime!(2025-10-15 09:30 UTC));

        assert_eq!(comparison.current_month, 0.0);
        assert_eq!(comparison.previous_month, 0.0);
    }

    #[test]
    fn monthly_comparison_crosses_year_boundary() {
        let now = datetime!(2025-01-10 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-15.0, "Bills", datetime!(2025-01-05 10:00 UTC)),
            create_test_transaction(-40.0, "Bills", datetime!(2024-12-20 10:00 UTC)),
        ];

        let comparison = compute_monthly_comparison(&transactions, now);

        assert_eq!(comparison.current_month, 15.0);
        assert_eq!(comparison.previous_month, 40.0);
    }

    #[test]
    fn summary_report_for_week_only_counts_the_trailing_seven_days() {
        let now = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-25.0, "Bills", datetime!(2025-10-14 10:00 UTC)),
            create_test_transaction(100.0, "Income", datetime!(2025-10-10 10:00 UTC)),
            // Eight days old, outside the trailing week.
            create_test_transaction(-999.0, "Bills", datetime!(2025-10-07 08:00 UTC)),
        ];

        let report = compute_summary_report(&transactions, Period::Week, now);

        assert_eq!(report.income, 100.0);
        assert_eq!(report.expense, -25.0);
        assert_eq!(report.balance, 75.0);
    }

    #[test]
    fn summary_report_for_month_matches_manually_windowed_summary() {
        let now = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-25.0, "Bills", datetime!(2025-10-02 10:00 UTC)),
            create_test_transaction(100.0, "Income", datetime!(2025-10-10 10:00 UTC)),
            create_test_transaction(-999.0, "Bills", datetime!(2025-09-28 10:00 UTC)),
            create_test_transaction(42.0, "Other", datetime!(2024-10-10 10:00 UTC)),
        ];

        let report = compute_summary_report(&transactions, Period::Month, now);

        let manually_windowed: Vec<Transaction> = transactions
            .iter()
            .filter(|t| {
                t.created_at >= datetime!(2025-10-01 00:00 UTC)
                    && t.created_at < datetime!(2025-11-01 00:00 UTC)
            })
            .cloned()
            .collect();
        assert_eq!(report, compute_summary(&manually_windowed));
    }

    #[test]
    fn summary_report_for_year_counts_the_calendar_year() {
        let now = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![
            create_test_transaction(-25.0, "Bills", datetime!(2025-02-02 10:00 UTC)),
            create_test_transaction(100.0, "Income", datetime!(2025-10-10 10:00 UTC)),
            create_test_transaction(-999.0, "Bills", datetime!(2024-12-28 10:00 UTC)),
        ];

        let report = compute_summary_report(&transactions, Period::Year, now);

        assert_eq!(report.income, 100.0);
        assert_eq!(report.expense, -25.0);
        assert_eq!(report.balance, 75.0);
    }

    #[test]
    fn summary_report_of_empty_window_is_all_zeroes() {
        let now = datetime!(2025-10-15 09:30 UTC);
        let transactions = vec![create_test_transaction(
            -25.0,
            "Bills",
            datetime!(2023-01-02 10:00 UTC),
        )];

        let report = compute_summary_report(&transactions, Period::Year, now);

        assert_eq!(report, super::Summary::default());
    }
}
