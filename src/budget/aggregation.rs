//! Groups monthly budgets by month.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{budget::MonthlyBudget, calendar::YearMonth};

/// The budgets for one month and their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedBudget {
    /// The month shared by every budget in `budgets`.
    pub month: YearMonth,
    /// The sum of the amounts in `budgets`.
    pub total_budget: f64,
    /// The budgets for the month in the order they were given.
    pub budgets: Vec<MonthlyBudget>,
}

/// Group `budgets` by month, most recent month first.
///
/// Every budget appears in exactly one group, keeping its relative order, and
/// each group's total is the sum of its amounts.
pub fn aggregate_by_month(budgets: Vec<MonthlyBudget>) -> Vec<AggregatedBudget> {
    let mut groups: BTreeMap<YearMonth, Vec<MonthlyBudget>> = BTreeMap::new();

    for budget in budgets {
        groups.entry(budget.month).or_default().push(budget);
    }

    groups
        .into_iter()
        .rev()
        .map(|(month, budgets)| AggregatedBudget {
            month,
            total_budget: budgets.iter().fold(0.0, |total, budget| total + budget.amount),
            budgets,
        })
        .collect()
}
