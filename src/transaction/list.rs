//! The view-model behind the transactions page.
//!
//! The list holds every transaction of the user and derives the page to show
//! by filtering, sorting and paginating them. Changes are sent to the backend
//! first and only applied locally once the backend accepted them, so a failed
//! request leaves the list as it was.

use crate::{
    Error,
    backend::ExpenseBackend,
    pagination::{Pagination, paginate, total_pages},
    transaction::{
        EditorMode, FilterCriteria, SortConfig, SortKey, Transaction, TransactionEditor,
        TransactionId, TransactionInput, apply_filters, apply_sort,
    },
};

/// The result of asking to delete a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The backend deleted the transaction and it was removed from the list.
    Deleted,
    /// The user did not confirm the deletion, nothing was sent.
    Cancelled,
}

/// One page of the filtered and sorted transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage<'a> {
    /// The transactions on this page, in display order.
    pub items: Vec<&'a Transaction>,
    /// The 1-based page number.
    pub current_page: usize,
    /// The number of pages, zero when nothing matches the filters.
    pub total_pages: usize,
    /// The number of transactions that match the filters across all pages.
    pub matching_count: usize,
}

impl TransactionPage<'_> {
    /// Whether there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether the page has no transactions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The transactions page: the user's transactions plus the filter, sort and
/// page the user has chosen.
#[derive(Debug)]
pub struct TransactionList<B> {
    backend: B,
    transactions: Vec<Transaction>,
    criteria: FilterCriteria,
    sort: SortConfig,
    pagination: Pagination,
}

impl<B> TransactionList<B>
where
    B: ExpenseBackend,
{
    /// Create an empty list that shows `page_size` transactions per page.
    ///
    /// Call [TransactionList::load] to fetch the transactions.
    pub fn new(backend: B, page_size: usize) -> Self {
        Self {
            backend,
            transactions: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: SortConfig::default(),
            pagination: Pagination::new(page_size),
        }
    }

    /// Replace the transactions with every transaction from the backend.
    ///
    /// # Errors
    /// Returns the backend's error, in which case the list is unchanged.
    pub async fn load(&mut self) -> Result<(), Error> {
        let transactions = self
            .backend
            .list_transactions()
            .await
            .inspect_err(|error| tracing::error!("Failed to fetch transactions: {error}"))?;

        tracing::debug!("Loaded {} transactions.", transactions.len());
        self.transactions = transactions;
        self.pagination.reset();

        Ok(())
    }

    /// Every transaction, in the order the backend returned them with new
    /// transactions first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The active filters.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the filters and go back to the first page.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.pagination.reset();
    }

    /// The active sort column and direction.
    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    /// Sort by `key`, flipping the direction if `key` is already active.
    ///
    /// The current page is kept.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = self.sort.select(key);
    }

    /// The 1-based number of the page being shown.
    pub fn current_page(&self) -> usize {
        self.pagination
            .current_page()
            .clamp(1, self.total_pages().max(1))
    }

    /// The number of pages of transactions that match the filters.
    pub fn total_pages(&self) -> usize {
        total_pages(self.matching_count(), self.pagination.page_size())
    }

    fn matching_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|transaction| self.criteria.matches(transaction))
            .count()
    }

    /// Go to the next page, staying on the last page.
    pub fn next_page(&mut self) {
        let total_pages = self.total_pages();
        self.pagination.clamp(total_pages);
        self.pagination.next(total_pages);
    }

    /// Go to the previous page, staying on the first page.
    pub fn previous_page(&mut self) {
        self.pagination.clamp(self.total_pages());
        self.pagination.prev();
    }

    /// The page to show, derived from the current transactions, filters,
    /// sort and page.
    pub fn page(&self) -> TransactionPage<'_> {
        let filtered = apply_filters(&self.transactions, &self.criteria);
        let matching_count = filtered.len();
        let sorted = apply_sort(filtered, self.sort);

        let page_size = self.pagination.page_size();
        let total_pages = total_pages(matching_count, page_size);
        let current_page = self.pagination.current_page().clamp(1, total_pages.max(1));

        TransactionPage {
            items: paginate(&sorted, current_page, page_size).to_vec(),
            current_page,
            total_pages,
            matching_count,
        }
    }

    /// Create a transaction and add it to the start of the list.
    ///
    /// # Errors
    /// Returns the backend's error, in which case the list is unchanged.
    pub async fn create(&mut self, input: &TransactionInput) -> Result<&Transaction, Error> {
        let transaction = self
            .backend
            .create_transaction(input)
            .await
            .inspect_err(|error| tracing::error!("Failed to create transaction: {error}"))?;

        tracing::info!("Created transaction {}.", transaction.id);
        self.transactions.insert(0, transaction);
        self.pagination.reset();

        Ok(&self.transactions[0])
    }

    /// Update the transaction `id` and replace it in the list.
    ///
    /// # Errors
    /// Returns the backend's error, in which case the list is unchanged.
    pub async fn update(
        &mut self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<&Transaction, Error> {
        let updated = self
            .backend
            .update_transaction(id, input)
            .await
            .inspect_err(|error| tracing::error!("Failed to update transaction {id}: {error}"))?;

        tracing::info!("Updated transaction {id}.");
        self.pagination.reset();

        match self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
        {
            Some(index) => {
                self.transactions[index] = updated;
                Ok(&self.transactions[index])
            }
            None => {
                tracing::warn!(
                    "Updated transaction {id} was not in the list, adding it to the start."
                );
                self.transactions.insert(0, updated);
                Ok(&self.transactions[0])
            }
        }
    }

    /// Delete the transaction `id` once `confirm` agrees to it.
    ///
    /// `confirm` is called with the transaction before anything is sent. If it
    /// returns false, no request is made and [DeleteOutcome::Cancelled] is
    /// returned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the list has no transaction `id`, or the
    /// backend's error, in which case the list is unchanged.
    pub async fn delete(
        &mut self,
        id: TransactionId,
        confirm: impl FnOnce(&Transaction) -> bool,
    ) -> Result<DeleteOutcome, Error> {
        let Some(transaction) = self
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
        else {
            tracing::warn!("Tried to delete transaction {id} which is not in the list.");
            return Err(Error::NotFound);
        };

        if !confirm(transaction) {
            tracing::debug!("Deletion of transaction {id} was cancelled.");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.backend
            .delete_transaction(id)
            .await
            .inspect_err(|error| tracing::error!("Failed to delete transaction {id}: {error}"))?;

        tracing::info!("Deleted transaction {id}.");
        self.transactions.retain(|transaction| transaction.id != id);
        self.pagination.reset();

        Ok(DeleteOutcome::Deleted)
    }

    /// Submit the editor: create a transaction when adding, update one when
    /// editing.
    ///
    /// The editor is validated first and nothing is sent if it is invalid. On
    /// success the editor is closed. On failure it stays open with the user's
    /// input so they can try again.
    ///
    /// The editor is borrowed for the whole request, so a second submission
    /// cannot start until this one finishes.
    ///
    /// # Errors
    /// Returns [Error::EditorClosed] if the editor is not open, a validation
    /// error, or the backend's error.
    pub async fn save(&mut self, editor: &mut TransactionEditor) -> Result<&Transaction, Error> {
        let mode = editor.mode();
        if mode == EditorMode::Closed {
            return Err(Error::EditorClosed);
        }

        let input = editor
            .validate()
            .inspect_err(|error| tracing::debug!("Transaction form is invalid: {error}"))?;

        let transaction = match mode {
            EditorMode::Editing(id) => self.update(id, &input).await?,
            EditorMode::Adding | EditorMode::Closed => self.create(&input).await?,
        };

        editor.close();
        Ok(transaction)
    }
}
