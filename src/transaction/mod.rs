//! Transactions and the views built on them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `TransactionInput` sent to the backend
//! - The static category table that ties categories to transaction types
//! - The filter, sort and paginate pipeline behind the transaction list
//! - The `TransactionList` view-model and the `TransactionEditor` form

mod category;
mod core;
mod filter;
mod form;
mod list;
mod sort;

pub use category::{Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use core::{
    Transaction, TransactionId, TransactionInput, TransactionType, format_date, parse_date,
};
pub use filter::{FilterCriteria, apply_filters};
pub use form::{EditorMode, TransactionEditor};
pub use list::{DeleteOutcome, TransactionList, TransactionPage};
pub use sort::{SortConfig, SortDirection, SortKey, apply_sort};
