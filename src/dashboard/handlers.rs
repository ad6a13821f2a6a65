//! Dashboard HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::get_aggregated_budgets,
    calendar::parse_date,
    dashboard::summary::{DashboardSummary, summarize},
    db::acquire_connection,
    timezone::local_today,
    transaction::get_all_transactions,
};

/// The state needed for the dashboard.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The reference date formatted as "YYYY-MM-DD", defaults to today.
    pub date: Option<String>,
}

/// Summarise all transactions and budgets relative to the reference date.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    WithRejection(Query(query), _): WithRejection<Query<DashboardQuery>, Error>,
) -> Result<Json<DashboardSummary>, Error> {
    let reference_date = match query.date.as_deref() {
        Some(date) if !date.is_empty() => parse_date(date)?,
        _ => local_today(&state.local_timezone)?,
    };

    let connection = acquire_connection(&state.db_connection)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let aggregated_budgets = get_aggregated_budgets(&connection)
        .inspect_err(|error| tracing::error!("could not get monthly budgets: {error}"))?;

    Ok(Json(summarize(
        &transactions,
        &aggregated_budgets,
        reference_date,
    )))
}

#[cfg(test)]
mod tests {
    use std::{
        marker::PhantomData,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json,
        extract::{Query, State},
    };
    use axum_extra::extract::WithRejection;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, Error,
        budget::{NewMonthlyBudget, create_budget},
        dashboard::handlers::{DashboardQuery, DashboardState, get_dashboard_endpoint},
        test_utils::get_test_connection,
        transaction::{Transaction, create_transaction},
    };

    fn get_test_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(date: Option<&str>) -> WithRejection<Query<DashboardQuery>, Error> {
        WithRejection(
            Query(DashboardQuery {
                date: date.map(str::to_owned),
            }),
            PhantomData,
        )
    }

    #[tokio::test]
    async fn summarises_stored_data() {
        let connection = get_test_connection();
        create_budget(
            NewMonthlyBudget {
                amount: 300.0,
                month: "2024-05".parse().unwrap(),
                category: Category::Food,
            },
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(50.0, date!(2024 - 05 - 10), "Groceries").category(Category::Food),
            &connection,
        )
        .unwrap();
        let latest = create_transaction(
            Transaction::build(20.0, date!(2024 - 05 - 15), "Bus").category(Category::Transportation),
            &connection,
        )
        .unwrap();

        let Json(summary) =
            get_dashboard_endpoint(State(get_test_state(connection)), query(Some("2024-05-25")))
                .await
                .unwrap();

        assert_eq!(summary.current_month_budget, 300.0);
        assert_eq!(summary.current_month_expenses, 70.0);
        assert_eq!(summary.remaining_budget, 230.0);
        assert_eq!(summary.last_transaction, Some(latest));
        assert_eq!(summary.budget_vs_actual_series.len(), 1);
    }

    #[tokio::test]
    async fn defaults_to_today() {
        let state = get_test_state(get_test_connection());

        let result = get_dashboard_endpoint(State(state), query(None)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn empty_date_defaults_to_today() {
        let state = get_test_state(get_test_connection());

        let result = get_dashboard_endpoint(State(state), query(Some(""))).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rejects_invalid_date() {
        let state = get_test_state(get_test_connection());

        let result = get_dashboard_endpoint(State(state), query(Some("2024-02-30"))).await;

        assert_eq!(result.err(), Some(Error::InvalidDate("2024-02-30".to_owned())));
    }

    #[tokio::test]
    async fn corrupt_stored_date_fails_whole_summary() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO \"transaction\" (amount, description, category, date, type)
                 VALUES (1.0, 'Bad', 'Food', '2024-05-32', 'expense')",
                (),
            )
            .unwrap();

        let result =
            get_dashboard_endpoint(State(get_test_state(connection)), query(Some("2024-05-25")))
                .await;

        assert_eq!(
            result.err(),
            Some(Error::CorruptRecord(Box::new(Error::InvalidDate(
                "2024-05-32".to_owned()
            ))))
        );
    }
}
