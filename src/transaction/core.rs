//! Defines the transaction record as it is exchanged with the backend.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, transaction::category::Category};

/// The identifier the backend assigns to a transaction.
pub type TransactionId = i64;

/// The date format used on the wire and in the editor, e.g. "2024-01-05".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date in the `YYYY-MM-DD` format.
///
/// Date-times such as "2024-01-05T00:00:00" are accepted and normalized to
/// their calendar date, since some backends serialize dates that way.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` does not start with a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();
    let date_part = text.split_once('T').map_or(text, |(date, _)| date);

    Date::parse(date_part, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Format a date the way [parse_date] reads it.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

mod date_format {
    //! Serializes dates as "YYYY-MM-DD" strings.
    //!
    //! The deserializer goes through [super::parse_date] so that date-times
    //! are normalized to a calendar date.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(serde::de::Error::custom)
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The code the backend uses for the type, e.g. "EXPENSE".
    pub const fn code(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// The human readable name of the type, e.g. "Expense".
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// The categories a transaction of this type may have.
    pub const fn categories(self) -> &'static [Category] {
        Category::for_type(self)
    }

    /// The category that is selected when switching to this type.
    pub const fn default_category(self) -> Category {
        match self {
            Self::Income => Category::Salary,
            Self::Expense => Category::Food,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse a type from its code or label, ignoring case.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();

        [Self::Income, Self::Expense]
            .into_iter()
            .find(|transaction_type| {
                transaction_type.code().eq_ignore_ascii_case(text)
                    || transaction_type.label().eq_ignore_ascii_case(text)
            })
            .ok_or_else(|| Error::UnknownTransactionType(text.to_owned()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The category always belongs to the set of categories for the
/// transaction's type, see [TransactionType::categories].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID the backend assigned to the transaction.
    pub id: TransactionId,
    /// A short description of what the transaction was for.
    ///
    /// A missing title is read as an empty string.
    #[serde(default)]
    pub title: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// An optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The fields sent to the backend to create or update a transaction.
///
/// The backend assigns the ID, so this is a [Transaction] without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// An optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionInput {
    /// Create the transaction the backend would return after assigning `id`.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            title: self.title,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date: self.date,
            note: self.note,
        }
    }
}

impl From<&Transaction> for TransactionInput {
    fn from(transaction: &Transaction) -> Self {
        Self {
            title: transaction.title.clone(),
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            category: transaction.category,
            date: transaction.date,
            note: transaction.note.clone(),
        }
    }
}
