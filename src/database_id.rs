//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The database ID of a transaction.
pub type TransactionId = DatabaseId;
/// The database ID of a monthly budget.
pub type BudgetId = DatabaseId;
