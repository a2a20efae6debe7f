//! The form for adding and editing transactions.

use crate::{
    Error,
    transaction::{
        Category, Transaction, TransactionId, TransactionInput, TransactionType, format_date,
        parse_date,
    },
};

/// What the editor is currently being used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    /// The editor is hidden.
    #[default]
    Closed,
    /// The editor is open for a new transaction.
    Adding,
    /// The editor is open for the existing transaction with this ID.
    Editing(TransactionId),
}

/// The create/edit form for a transaction.
///
/// The fields hold what the user typed and are only checked by
/// [TransactionEditor::validate]. The category is always one of the
/// categories of the selected transaction type: changing the type resets the
/// category, and categories of the other type are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEditor {
    mode: EditorMode,
    /// The title as typed.
    pub title: String,
    /// The amount as typed, e.g. "12.50".
    pub amount: String,
    transaction_type: TransactionType,
    category: Category,
    /// The date as typed, e.g. "2024-01-05".
    pub date: String,
    /// The note as typed, an empty note is not sent.
    pub note: String,
}

impl Default for TransactionEditor {
    fn default() -> Self {
        let transaction_type = TransactionType::Income;

        Self {
            mode: EditorMode::Closed,
            title: String::new(),
            amount: String::new(),
            transaction_type,
            category: transaction_type.default_category(),
            date: String::new(),
            note: String::new(),
        }
    }
}

impl TransactionEditor {
    /// Create a closed editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// What the editor is being used for.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Whether the editor is open.
    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    /// Open the editor for a new transaction with every field reset.
    pub fn open_add(&mut self) {
        *self = Self {
            mode: EditorMode::Adding,
            ..Self::default()
        };
    }

    /// Open the editor with the fields of `transaction`.
    ///
    /// A category that does not belong to the transaction's type is replaced
    /// with the type's default category.
    pub fn open_edit(&mut self, transaction: &Transaction) {
        let category = if transaction.category.transaction_type() == transaction.transaction_type
        {
            transaction.category
        } else {
            tracing::warn!(
                "Transaction {} has category {} which is not a {} category, using {} instead.",
                transaction.id,
                transaction.category.code(),
                transaction.transaction_type,
                transaction.transaction_type.default_category().code()
            );
            transaction.transaction_type.default_category()
        };

        *self = Self {
            mode: EditorMode::Editing(transaction.id),
            title: transaction.title.clone(),
            amount: amount_text(transaction.amount),
            transaction_type: transaction.transaction_type,
            category,
            date: format_date(transaction.date),
            note: transaction.note.clone().unwrap_or_default(),
        };
    }

    /// Close the editor and reset every field, whether it was saved or cancelled.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// The selected transaction type.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Select the transaction type.
    ///
    /// Switching to the other type resets the category to that type's default.
    pub fn set_transaction_type(&mut self, transaction_type: TransactionType) {
        if self.transaction_type != transaction_type {
            self.transaction_type = transaction_type;
            self.category = transaction_type.default_category();
        }
    }

    /// The selected category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The label of the selected category, as shown in the category picker.
    pub fn category_label(&self) -> &'static str {
        self.category.label()
    }

    /// The categories that can be picked for the selected type.
    pub fn category_options(&self) -> &'static [Category] {
        self.transaction_type.categories()
    }

    /// Select `category`.
    ///
    /// # Errors
    /// Returns [Error::CategoryTypeMismatch] if `category` is not a category
    /// of the selected type. The selection is left unchanged.
    pub fn set_category(&mut self, category: Category) -> Result<(), Error> {
        if category.transaction_type() != self.transaction_type {
            return Err(Error::CategoryTypeMismatch {
                category,
                transaction_type: self.transaction_type,
            });
        }

        self.category = category;
        Ok(())
    }

    /// Select the category shown as `label` in the category picker.
    ///
    /// # Errors
    /// Returns [Error::UnknownCategory] if no category has the label and
    /// [Error::CategoryTypeMismatch] if it belongs to the other type.
    pub fn select_category(&mut self, label: &str) -> Result<(), Error> {
        let category = Category::from_label(label)?;
        self.set_category(category)
    }

    /// Check the fields and build the transaction to submit.
    ///
    /// The title is trimmed. Nothing is sent anywhere, so an error here means
    /// no request should be made.
    ///
    /// # Errors
    /// Returns an error if the title is blank, the amount is not a positive
    /// number or the date is missing or malformed.
    pub fn validate(&self) -> Result<TransactionInput, Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(Error::NonPositiveAmount);
        }

        let amount = match amount.parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => return Err(Error::InvalidAmount(amount.to_owned())),
        };

        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        if self.date.trim().is_empty() {
            return Err(Error::MissingDate);
        }

        let date = parse_date(&self.date)?;

        let note = self.note.trim();

        Ok(TransactionInput {
            title: title.to_owned(),
            amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date,
            note: (!note.is_empty()).then(|| note.to_owned()),
        })
    }
}

/// `amount` with at most two decimals and no trailing zeros, e.g. "82.5".
///
/// Amounts that would round to zero keep every digit so they can be saved
/// again unchanged.
fn amount_text(amount: f64) -> String {
    let rounded = format!("{amount:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    if trimmed.is_empty() || trimmed == "0" || trimmed == "-0" {
        return amount.to_string();
    }

    trimmed.to_owned()
}
