//! Summarises transactions against budgets for the dashboard.
//!
//! Everything here is a pure function of its inputs: no I/O and no clock.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use time::Date;

use crate::{
    budget::AggregatedBudget,
    calendar::YearMonth,
    category::Category,
    transaction::{Transaction, TransactionType},
};

/// Expense totals keyed by calendar month.
///
/// Serialised as a JSON object keyed by month label, e.g. "May 2024", in
/// chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals(BTreeMap<YearMonth, f64>);

impl MonthlyTotals {
    /// The total for `month`, if any expenses fell in that month.
    pub fn get(&self, month: &YearMonth) -> Option<f64> {
        self.0.get(month).copied()
    }

    /// The months and their totals in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&YearMonth, &f64)> {
        self.0.iter()
    }

    /// The number of months with expenses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no months with expenses.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for MonthlyTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(month, total)| (month.label(), total)))
    }
}

/// The budget and spending for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetVsActual {
    /// The month label, e.g. "May 2024".
    pub month: String,
    /// The total budget for the month.
    pub budget: f64,
    /// The total expenses dated within the month.
    pub spent: f64,
}

/// The figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The total of the most recent month of budgets.
    ///
    /// This is not matched against the reference month, see [summarize].
    pub current_month_budget: f64,
    /// The total of expenses in the reference month.
    pub current_month_expenses: f64,
    /// The first transaction given, `None` if there were none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction: Option<Transaction>,
    /// `current_month_budget` less `current_month_expenses`, may be negative.
    pub remaining_budget: f64,
    /// Expense totals for each category that has expenses.
    pub category_totals: BTreeMap<Category, f64>,
    /// Expense totals for each month that has expenses.
    pub monthly_expense_totals: MonthlyTotals,
    /// One entry per aggregated budget, in the order given.
    pub budget_vs_actual_series: Vec<BudgetVsActual>,
}

/// Summarise `transactions` against `aggregated_budgets` relative to `reference_date`.
///
/// `transactions` should be sorted most recent first and `aggregated_budgets`
/// most recent month first, as returned by the stores. Neither is re-sorted:
/// the last transaction is the first one given and the current month budget is
/// the total of the first aggregated budget, whichever month that is.
///
/// Only expenses count towards spending. Budget entries are ignored by every
/// total.
pub fn summarize(
    transactions: &[Transaction],
    aggregated_budgets: &[AggregatedBudget],
    reference_date: Date,
) -> DashboardSummary {
    let expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
        .collect();

    let current_month_budget = aggregated_budgets
        .first()
        .map(|aggregated| aggregated.total_budget)
        .unwrap_or(0.0);

    let current_month_expenses = spent_in(&expenses, YearMonth::from_date(reference_date));

    let mut category_totals = BTreeMap::new();
    let mut monthly_totals = BTreeMap::new();

    for expense in &expenses {
        *category_totals.entry(expense.category).or_insert(0.0) += expense.amount;
        *monthly_totals
            .entry(YearMonth::from_date(expense.date))
            .or_insert(0.0) += expense.amount;
    }

    let budget_vs_actual_series = aggregated_budgets
        .iter()
        .map(|aggregated| BudgetVsActual {
            month: aggregated.month.label(),
            budget: aggregated.total_budget,
            spent: spent_in(&expenses, aggregated.month),
        })
        .collect();

    DashboardSummary {
        current_month_budget,
        current_month_expenses,
        last_transaction: transactions.first().cloned(),
        remaining_budget: current_month_budget - current_month_expenses,
        category_totals,
        monthly_expense_totals: MonthlyTotals(monthly_totals),
        budget_vs_actual_series,
    }
}

/// The sum of the expenses dated within `month`.
fn spent_in(expenses: &[&Transaction], month: YearMonth) -> f64 {
    expenses
        .iter()
        .filter(|expense| month.contains(expense.date))
        .fold(0.0, |total, expense| total + expense.amount)
}
