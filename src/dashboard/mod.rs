//! Dashboard module
//!
//! Summarises spending against budgets by month and category.

mod handlers;
mod summary;

pub use handlers::get_dashboard_endpoint;
pub use summary::{BudgetVsActual, DashboardSummary, MonthlyTotals, summarize};
