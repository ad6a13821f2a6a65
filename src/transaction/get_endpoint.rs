//! Defines the endpoints for reading transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    db::acquire_connection,
    transaction::{
        Transaction,
        core::{get_all_transactions, get_transaction},
    },
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every transaction, most recent first.
pub async fn get_transactions_endpoint(
    State(state): State<GetTransactionState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))
        .map(Json)
}

/// A route handler for getting a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection).map(Json)
}
