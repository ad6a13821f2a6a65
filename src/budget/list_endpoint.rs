//! Defines the endpoint for listing budgets grouped by month.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{aggregation::AggregatedBudget, core::get_aggregated_budgets},
    db::acquire_connection,
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists budgets grouped by month, most recent month first.
pub async fn get_monthly_budgets_endpoint(
    State(state): State<ListBudgetsState>,
) -> Result<Json<Vec<AggregatedBudget>>, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    get_aggregated_budgets(&connection)
        .inspect_err(|error| tracing::error!("Could not get monthly budgets: {error}"))
        .map(Json)
}
