//! The seam between the view-models and the expense tracking backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{Category, Transaction, TransactionId, TransactionInput},
};

/// The user's total income and expenses over all of their transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income transactions.
    pub income: f64,
    /// The sum of all expense transactions.
    pub expense: f64,
    /// Income minus expenses.
    pub net_balance: f64,
}

/// The sum of transaction amounts per category.
///
/// Categories without transactions may be missing.
pub type CategoryTotals = HashMap<Category, f64>;

/// The operations the view-models need from the backend.
///
/// [crate::ApiClient] implements this over HTTP. Every operation requires a
/// logged in session and fails with [Error::SessionExpired] once the backend
/// stops accepting the session's credential.
pub trait ExpenseBackend {
    /// Fetch every transaction of the current user.
    fn list_transactions(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Create a transaction and return it with the ID assigned by the backend.
    fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Replace the fields of the transaction `id` and return the stored transaction.
    fn update_transaction(
        &self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Delete the transaction `id`.
    fn delete_transaction(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Fetch the income, expense and net balance totals.
    fn summary(&self) -> impl Future<Output = Result<Summary, Error>> + Send;

    /// Fetch the sum of transaction amounts per category.
    fn category_totals(&self) -> impl Future<Output = Result<CategoryTotals, Error>> + Send;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{CategoryTotals, Summary, transaction::Category};

    #[test]
    fn reads_summary() {
        let summary: Summary = serde_json::from_value(json!({
            "income": 3000.0,
            "expense": 1200.5,
            "netBalance": 1799.5
        }))
        .unwrap();

        assert_eq!(
            summary,
            Summary {
                income: 3000.0,
                expense: 1200.5,
                net_balance: 1799.5
            }
        );
    }

    #[test]
    fn reads_category_totals_keyed_by_code() {
        let totals: CategoryTotals = serde_json::from_value(json!({
            "FOOD": 12.5,
            "OTHER_INCOME": 100.0
        }))
        .unwrap();

        assert_eq!(totals.get(&Category::Food), Some(&12.5));
        assert_eq!(totals.get(&Category::OtherIncome), Some(&100.0));
        assert_eq!(totals.len(), 2);
    }
}
