//! Monthly budgets: one allocation per category per month.
//!
//! This module contains the `MonthlyBudget` model, its database functions,
//! the aggregation of budgets by month and the JSON endpoints.

mod aggregation;
mod core;
mod create_endpoint;
mod list_endpoint;

pub use aggregation::{AggregatedBudget, aggregate_by_month};
pub use core::{
    MonthlyBudget, NewMonthlyBudget, create_budget, create_budget_table, get_aggregated_budgets,
};
pub use create_endpoint::create_budget_endpoint;
pub use list_endpoint::get_monthly_budgets_endpoint;
