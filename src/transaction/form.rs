use serde::Deserialize;
use time::Date;

use crate::{
    calendar::iso_date,
    category::Category,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The request body for creating or replacing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// The amount of money in dollars.
    pub amount: f64,
    /// Text detailing the transaction.
    pub description: String,
    /// What the money was for.
    pub category: Category,
    /// When the transaction occurred, formatted as "YYYY-MM-DD".
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Defaults to an expense when omitted.
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
}

impl From<TransactionForm> for TransactionBuilder {
    fn from(form: TransactionForm) -> Self {
        Transaction::build(form.amount, form.date, &form.description)
            .category(form.category)
            .transaction_type(form.transaction_type)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Category,
        transaction::{TransactionBuilder, TransactionType, form::TransactionForm},
    };

    #[test]
    fn type_defaults_to_expense() {
        let form: TransactionForm = serde_json::from_value(json!({
            "amount": 3.5,
            "description": "Coffee",
            "category": "Food",
            "date": "2024-05-10",
        }))
        .unwrap();

        let builder = TransactionBuilder::from(form);

        assert_eq!(builder.transaction_type, TransactionType::Expense);
        assert_eq!(builder.category, Category::Food);
        assert_eq!(builder.date, date!(2024 - 05 - 10));
    }

    #[test]
    fn rejects_invalid_fields() {
        let bodies = [
            json!({ "amount": 1, "description": "x", "category": "Transport", "date": "2024-05-10" }),
            json!({ "amount": 1, "description": "x", "category": "Food", "date": "2024-02-30" }),
            json!({ "amount": 1, "description": "x", "category": "Food", "date": "2024-05-10", "type": "income" }),
            json!({ "description": "x", "category": "Food", "date": "2024-05-10" }),
        ];

        for body in bodies {
            assert!(
                serde_json::from_value::<TransactionForm>(body.clone()).is_err(),
                "want {body} to be rejected"
            );
        }
    }
}
