use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, db::initialize};

/// An in-memory database with the application's tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory database connection");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// App state backed by an in-memory database in UTC.
pub(crate) fn get_test_state() -> AppState {
    AppState {
        local_timezone: "Etc/UTC".to_owned(),
        db_connection: Arc::new(Mutex::new(get_test_connection())),
    }
}
