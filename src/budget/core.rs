//! Defines the monthly budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    budget::aggregation::{AggregatedBudget, aggregate_by_month},
    calendar::YearMonth,
    category::Category,
    database_id::BudgetId,
    transaction::validate_amount,
};

/// An amount of money allocated to one category for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The amount allocated, never negative.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The category the budget applies to.
    pub category: Category,
}

/// The fields of a budget that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMonthlyBudget {
    /// The amount allocated, must be finite and no less than zero.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The category the budget applies to.
    pub category: Category,
}

/// Create a new budget in the database.
///
/// Budgets for the same month and category are not merged, each one is kept
/// and counted.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative, infinite or NaN,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    budget: NewMonthlyBudget,
    connection: &Connection,
) -> Result<MonthlyBudget, Error> {
    validate_amount(budget.amount)?;

    let budget = connection
        .prepare(
            "INSERT INTO monthly_budget (amount, month, category)
             VALUES (?1, ?2, ?3)
             RETURNING id, amount, month, category",
        )?
        .query_row(
            (budget.amount, budget.month, budget.category),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve every budget in the order they were created.
///
/// # Errors
/// This function will return a:
/// - [Error::CorruptRecord] if any stored row holds an invalid month or category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_all_budgets(connection: &Connection) -> Result<Vec<MonthlyBudget>, Error> {
    connection
        .prepare("SELECT id, amount, month, category FROM monthly_budget ORDER BY id ASC")?
        .query_map([], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Retrieve every budget grouped by month, most recent month first.
///
/// # Errors
/// Returns the same errors as [get_all_budgets].
pub fn get_aggregated_budgets(connection: &Connection) -> Result<Vec<AggregatedBudget>, Error> {
    get_all_budgets(connection).map(aggregate_by_month)
}

/// Create the monthly budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS monthly_budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                month TEXT NOT NULL,
                category TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a MonthlyBudget.
pub fn map_budget_row(row: &Row) -> Result<MonthlyBudget, rusqlite::Error> {
    Ok(MonthlyBudget {
        id: row.get(0)?,
        amount: row.get(1)?,
        month: row.get(2)?,
        category: row.get(3)?,
    })
}
