//! Defines the endpoint for creating a monthly budget.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::core::{NewMonthlyBudget, create_budget},
    calendar::YearMonth,
    category::Category,
    db::acquire_connection,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a budget.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetForm {
    /// The amount allocated in dollars.
    pub amount: f64,
    /// The month formatted as "YYYY-MM".
    pub month: YearMonth,
    /// The category the budget applies to.
    pub category: Category,
}

/// A route handler for creating a new monthly budget.
///
/// Responds with 201 Created and the new budget.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    WithRejection(Json(form), _): WithRejection<Json<BudgetForm>, Error>,
) -> Result<Response, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    let budget = create_budget(
        NewMonthlyBudget {
            amount: form.amount,
            month: form.month,
            category: form.category,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(budget)).into_response())
}
