//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    calendar::{iso_date, parse_date},
    category::Category,
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction records money spent or money set aside.
///
/// Only expenses count towards spending totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    #[default]
    Expense,
    /// Money that was set aside.
    Budget,
}

impl TransactionType {
    /// The name of the type as it appears in JSON and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Budget => "budget",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "budget" => Ok(TransactionType::Budget),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A single recorded expense or budget entry.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money, never negative.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// What the money was for.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the transaction is an expense or a budget entry.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            category: Category::Other,
            transaction_type: TransactionType::Expense,
        }
    }
}

/// A builder for creating or replacing [Transaction] instances.
///
/// The category defaults to [Category::Other] and the type to
/// [TransactionType::Expense].
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{Category, transaction::Transaction};
///
/// let builder = Transaction::build(45.99, date!(2025 - 01 - 15), "Groceries")
///     .category(Category::Food);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money, must be finite and no less than zero.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description, must not be blank.
    pub description: String,
    /// What the money was for.
    pub category: Category,
    /// Whether the transaction is an expense or a budget entry.
    pub transaction_type: TransactionType,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the type of the transaction.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Check the amount and description, trimming the description.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is negative, infinite or NaN,
    /// - or [Error::EmptyDescription] if the description is blank.
    fn validate(mut self) -> Result<Self, Error> {
        validate_amount(self.amount)?;

        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        self.description = description.to_owned();

        Ok(self)
    }
}

/// Check that `amount` is a finite number no less than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::EmptyDescription] if the builder fails validation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, description, category, date, type)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, description, category, date, type",
        )?
        .query_row(
            (
                builder.amount,
                builder.description,
                builder.category,
                builder.date,
                builder.transaction_type,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::CorruptRecord] if the stored row holds an invalid value,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, description, category, date, type
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction, most recent date first.
///
/// Transactions on the same day are ordered by most recently created first.
///
/// # Errors
/// This function will return a:
/// - [Error::CorruptRecord] if any stored row holds an invalid value,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, category, date, type
             FROM \"transaction\" ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace every field of the transaction `id` with the fields in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::EmptyDescription] if the builder fails validation,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    connection
        .prepare(
            "UPDATE \"transaction\"
             SET amount = ?1, description = ?2, category = ?3, date = ?4, type = ?5
             WHERE id = ?6
             RETURNING id, amount, description, category, date, type",
        )?
        .query_row(
            (
                builder.amount,
                builder.description,
                builder.category,
                builder.date,
                builder.transaction_type,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL
                )",
        (),
    )?;

    // Backs the listing sorted by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// A date that is not a real calendar day fails with a conversion error
/// wrapping [Error::InvalidDate].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let raw_date: String = row.get(4)?;
    let date = parse_date(&raw_date).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let transaction_type = row.get(5)?;

    Ok(Transaction {
        id,
        amount,
        description,
        category,
        date,
        transaction_type,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::params;
    use time::macros::date;

    use crate::{
        Category, Error,
        test_utils::get_test_connection,
        transaction::core::{
            Transaction, TransactionType, create_transaction, delete_transaction,
            get_all_transactions, get_transaction, update_transaction,
        },
    };

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(12.3, date!(2025 - 10 - 05), "  Lunch  ")
                .category(Category::Food)
                .transaction_type(TransactionType::Budget),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.description, "Lunch");
        assert_eq!(transaction.category, Category::Food);
        assert_eq!(transaction.date, date!(2025 - 10 - 05));
        assert_eq!(transaction.transaction_type, TransactionType::Budget);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_accepts_zero_amount() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(0.0, date!(2025 - 10 - 05), "Free"), &conn);

        assert!(result.is_ok());
    }

    #[test]
    fn create_fails_on_invalid_amount() {
        let conn = get_test_connection();

        for amount in [-0.01, f64::NAN, f64::INFINITY] {
            let result =
                create_transaction(Transaction::build(amount, date!(2025 - 10 - 05), "x"), &conn);

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want invalid amount error for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), "   "), &conn);

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_all_sorts_by_date_descending() {
        let conn = get_test_connection();
        let older = create_transaction(Transaction::build(1.0, date!(2024 - 04 - 30), "a"), &conn)
            .unwrap();
        let newest = create_transaction(Transaction::build(2.0, date!(2024 - 05 - 10), "b"), &conn)
            .unwrap();
        let first_same_day =
            create_transaction(Transaction::build(3.0, date!(2024 - 05 - 01), "c"), &conn).unwrap();
        let second_same_day =
            create_transaction(Transaction::build(4.0, date!(2024 - 05 - 01), "d"), &conn).unwrap();

        let transactions = get_all_transactions(&conn).unwrap();

        assert_eq!(
            transactions,
            [newest, second_same_day, first_same_day, older]
        );
    }

    #[test]
    fn get_all_on_empty_table_is_empty() {
        let conn = get_test_connection();

        assert_eq!(get_all_transactions(&conn), Ok(Vec::new()));
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.0, date!(2024 - 05 - 01), "Coffee"), &conn)
                .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(55.0, date!(2024 - 06 - 02), "Concert")
                .category(Category::Entertainment)
                .transaction_type(TransactionType::Budget),
            &conn,
        )
        .unwrap();

        assert_eq!(
            updated,
            Transaction {
                id: transaction.id,
                amount: 55.0,
                description: "Concert".to_owned(),
                category: Category::Entertainment,
                date: date!(2024 - 06 - 02),
                transaction_type: TransactionType::Budget,
            }
        );
        assert_eq!(get_transaction(transaction.id, &conn), Ok(updated));
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = update_transaction(
            99,
            Transaction::build(1.0, date!(2024 - 05 - 01), "Coffee"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn update_validates_fields() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.0, date!(2024 - 05 - 01), "Coffee"), &conn)
                .unwrap();

        let result = update_transaction(
            transaction.id,
            Transaction::build(-1.0, date!(2024 - 05 - 01), "Coffee"),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-1.0)));
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.0, date!(2024 - 05 - 01), "Coffee"), &conn)
                .unwrap();

        delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let conn = get_test_connection();

        assert_eq!(
            delete_transaction(1, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn corrupt_date_rejects_whole_listing() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, date!(2024 - 05 - 01), "Fine"), &conn).unwrap();
        conn.execute(
            "INSERT INTO \"transaction\" (amount, description, category, date, type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![2.0, "Broken", "Food", "2024-02-30", "expense"],
        )
        .unwrap();

        let result = get_all_transactions(&conn);

        assert_eq!(
            result,
            Err(Error::CorruptRecord(Box::new(Error::InvalidDate(
                "2024-02-30".to_owned()
            ))))
        );
    }

    #[test]
    fn corrupt_category_is_corrupt_record() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO \"transaction\" (amount, description, category, date, type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![2.0, "Bus", "Transport", "2024-05-01", "expense"],
        )
        .unwrap();

        let result = get_transaction(1, &conn);

        assert_eq!(
            result,
            Err(Error::CorruptRecord(Box::new(Error::InvalidCategory(
                "Transport".to_owned()
            ))))
        );
    }
}
