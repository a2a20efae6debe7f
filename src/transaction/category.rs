//! The fixed table of transaction categories.
//!
//! Each category has a machine code that is sent to the backend, a label that
//! is shown to the user and the transaction type it belongs to. Expense and
//! income categories are disjoint.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::core::TransactionType};

/// What money was earned or spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Category {
    Food,
    Groceries,
    Rent,
    Utilities,
    Travel,
    Health,
    Entertainment,
    Education,
    Subscriptions,
    OtherExpense,
    Salary,
    Freelance,
    Business,
    Investment,
    Gifts,
    OtherIncome,
}

/// The categories for expenses, in display order.
pub const EXPENSE_CATEGORIES: [Category; 10] = [
    Category::Food,
    Category::Groceries,
    Category::Rent,
    Category::Utilities,
    Category::Travel,
    Category::Health,
    Category::Entertainment,
    Category::Education,
    Category::Subscriptions,
    Category::OtherExpense,
];

/// The categories for income, in display order.
pub const INCOME_CATEGORIES: [Category; 6] = [
    Category::Salary,
    Category::Freelance,
    Category::Business,
    Category::Investment,
    Category::Gifts,
    Category::OtherIncome,
];

impl Category {
    /// Every category, expense categories first.
    pub const ALL: [Category; 16] = [
        Category::Food,
        Category::Groceries,
        Category::Rent,
        Category::Utilities,
        Category::Travel,
        Category::Health,
        Category::Entertainment,
        Category::Education,
        Category::Subscriptions,
        Category::OtherExpense,
        Category::Salary,
        Category::Freelance,
        Category::Business,
        Category::Investment,
        Category::Gifts,
        Category::OtherIncome,
    ];

    pub(crate) const fn for_type(transaction_type: TransactionType) -> &'static [Category] {
        match transaction_type {
            TransactionType::Expense => &EXPENSE_CATEGORIES,
            TransactionType::Income => &INCOME_CATEGORIES,
        }
    }

    /// The code the backend uses for the category, e.g. "OTHER_EXPENSE".
    pub const fn code(self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Groceries => "GROCERIES",
            Self::Rent => "RENT",
            Self::Utilities => "UTILITIES",
            Self::Travel => "TRAVEL",
            Self::Health => "HEALTH",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Education => "EDUCATION",
            Self::Subscriptions => "SUBSCRIPTIONS",
            Self::OtherExpense => "OTHER_EXPENSE",
            Self::Salary => "SALARY",
            Self::Freelance => "FREELANCE",
            Self::Business => "BUSINESS",
            Self::Investment => "INVESTMENT",
            Self::Gifts => "GIFTS",
            Self::OtherIncome => "OTHER_INCOME",
        }
    }

    /// The label shown to the user, e.g. "Other Expense".
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Groceries => "Groceries",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Travel => "Travel",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Education => "Education",
            Self::Subscriptions => "Subscriptions",
            Self::OtherExpense => "Other Expense",
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Business => "Business",
            Self::Investment => "Investment",
            Self::Gifts => "Gifts",
            Self::OtherIncome => "Other Income",
        }
    }

    /// The transaction type the category belongs to.
    pub const fn transaction_type(self) -> TransactionType {
        match self {
            Self::Food
            | Self::Groceries
            | Self::Rent
            | Self::Utilities
            | Self::Travel
            | Self::Health
            | Self::Entertainment
            | Self::Education
            | Self::Subscriptions
            | Self::OtherExpense => TransactionType::Expense,
            Self::Salary
            | Self::Freelance
            | Self::Business
            | Self::Investment
            | Self::Gifts
            | Self::OtherIncome => TransactionType::Income,
        }
    }

    /// The hex colour used for the category in charts and legends.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Food => "#0088FE",
            Self::Groceries => "#00C49F",
            Self::Rent => "#FFBB28",
            Self::Utilities => "#FF8042",
            Self::Travel => "#FF4560",
            Self::Health => "#775DD0",
            Self::Entertainment => "#3F51B5",
            Self::Education => "#2ECC71",
            Self::Subscriptions => "#F39C12",
            Self::OtherExpense => "#8E44AD",
            Self::Salary => "#1ABC9C",
            Self::Freelance => "#E91E63",
            Self::Business => "#3498DB",
            Self::Investment => "#9C27B0",
            Self::Gifts => "#F44336",
            Self::OtherIncome => "#607D8B",
        }
    }

    /// Look up a category by its backend code.
    ///
    /// # Errors
    /// Returns [Error::UnknownCategory] if no category has the code `code`.
    pub fn from_code(code: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or_else(|| Error::UnknownCategory(code.to_owned()))
    }

    /// Look up a category by its display label.
    ///
    /// # Errors
    /// Returns [Error::UnknownCategory] if no category has the label `label`.
    pub fn from_label(label: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == label)
            .ok_or_else(|| Error::UnknownCategory(label.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category from either its code or its label, ignoring case.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();

        Self::ALL
            .into_iter()
            .find(|category| {
                category.code().eq_ignore_ascii_case(text)
                    || category.label().eq_ignore_ascii_case(text)
            })
            .ok_or_else(|| Error::UnknownCategory(text.to_owned()))
    }
}
