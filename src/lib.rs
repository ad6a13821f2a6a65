//! Spendwise is a web app for tracking expenses against monthly budgets.
//!
//! This library provides a JSON API for recording transactions and monthly
//! category budgets, and a dashboard endpoint that summarises spending against
//! budget by month and category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod budget;
mod calendar;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::{
    AggregatedBudget, MonthlyBudget, NewMonthlyBudget, aggregate_by_month, create_budget,
    get_aggregated_budgets,
};
pub use calendar::{YearMonth, parse_date};
pub use category::Category;
pub use dashboard::{BudgetVsActual, DashboardSummary, MonthlyTotals, summarize};
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionType, create_transaction, get_all_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An amount was negative, infinite or NaN.
    #[error("{0} is not a valid amount, amounts must be a number no less than zero")]
    InvalidAmount(f64),

    /// An empty (or whitespace only) string was used as a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A string did not name one of the supported categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A string was neither "expense" nor "budget".
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A string could not be parsed as a calendar date in the format YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date, expected a date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A string could not be parsed as a calendar month in the format YYYY-MM.
    #[error("\"{0}\" is not a valid month, expected a month in the format YYYY-MM")]
    InvalidMonth(String),

    /// The request body could not be parsed.
    ///
    /// Callers should pass in the message from the rejected extractor.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A record read from the database holds a value that fails validation,
    /// e.g. a date that is not a real calendar day.
    ///
    /// The whole read is rejected rather than skipping the record.
    #[error("a stored record is invalid: {0}")]
    CorruptRecord(Box<Error>),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The database connection could not be acquired.
    #[error("the database is unavailable")]
    StoreUnavailable,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Row mappers wrap validation failures so that they can travel through rusqlite.
            rusqlite::Error::FromSqlConversionFailure(index, sql_type, cause) => {
                match cause.downcast::<Error>() {
                    Ok(error) => {
                        tracing::error!("a stored record failed validation: {error}");
                        Error::CorruptRecord(error)
                    }
                    Err(cause) => {
                        let error =
                            rusqlite::Error::FromSqlConversionFailure(index, sql_type, cause);
                        tracing::error!("an unhandled SQL error occurred: {}", error);
                        Error::SqlError(error)
                    }
                }
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    /// The HTTP status code for this error.
    ///
    /// Validation errors map to 400, missing records to 404 and everything
    /// else to 500.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmount(_)
            | Error::EmptyDescription
            | Error::InvalidCategory(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                StatusCode::NOT_FOUND
            }
            Error::CorruptRecord(_)
            | Error::InvalidTimezoneError(_)
            | Error::StoreUnavailable
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are for the server logs only.
            tracing::error!("An unexpected error occurred: {}", self);
            "Something went wrong, try again later or check the server logs".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(ErrorBody { error: message })).into_response()
    }
}
