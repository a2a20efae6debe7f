#![allow(missing_docs)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use time::Date;
use tokio::net::TcpListener;

use crate::{
    Error,
    backend::{CategoryTotals, ExpenseBackend, Summary},
    demo::{DemoState, build_demo_router},
    endpoints::API_PREFIX,
    transaction::{Category, Transaction, TransactionId, TransactionInput},
};

/// Create a transaction whose type is the type of `category`.
pub(crate) fn transaction(
    id: TransactionId,
    title: &str,
    amount: f64,
    category: Category,
    date: Date,
) -> Transaction {
    Transaction {
        id,
        title: title.to_owned(),
        amount,
        transaction_type: category.transaction_type(),
        category,
        date,
        note: None,
    }
}

/// The backend calls that [FakeBackend] counts and can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Call {
    List,
    Create,
    Update,
    Delete,
    Summary,
    CategoryTotals,
}

#[derive(Debug, Default)]
struct FakeState {
    transactions: Vec<Transaction>,
    next_id: TransactionId,
    summary: Summary,
    category_totals: CategoryTotals,
    failure: Option<Error>,
    call_failures: HashMap<Call, Error>,
    calls: HashMap<Call, usize>,
}

/// An in-memory [ExpenseBackend] that records how often it was called.
///
/// Clones share state, so a test can keep a handle after giving one to a
/// view-model.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Arc::new(Mutex::new(FakeState {
                transactions,
                next_id,
                ..Default::default()
            })),
        }
    }

    pub(crate) fn set_summary(&self, summary: Summary) {
        self.state.lock().unwrap().summary = summary;
    }

    pub(crate) fn set_category_totals(&self, totals: CategoryTotals) {
        self.state.lock().unwrap().category_totals = totals;
    }

    /// Make every following call fail with `error`.
    pub(crate) fn fail_with(&self, error: Error) {
        self.state.lock().unwrap().failure = Some(error);
    }

    /// Make every following `call` fail with `error`.
    pub(crate) fn fail_call(&self, call: Call, error: Error) {
        self.state.lock().unwrap().call_failures.insert(call, error);
    }

    pub(crate) fn calls(&self, call: Call) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&call)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.calls(Call::List)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.calls(Call::Create)
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.calls(Call::Update)
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.calls(Call::Delete)
    }

    /// Count `call` and run `operation` unless a failure was configured.
    fn record<T>(
        &self,
        call: Call,
        operation: impl FnOnce(&mut FakeState) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(call).or_default() += 1;

        if let Some(error) = state.call_failures.get(&call).or(state.failure.as_ref()) {
            return Err(error.clone());
        }

        operation(&mut *state)
    }
}

impl ExpenseBackend for FakeBackend {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.record(Call::List, |state| Ok(state.transactions.clone()))
    }

    async fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction, Error> {
        self.record(Call::Create, |state| {
            let transaction = input.clone().into_transaction(state.next_id);
            state.next_id += 1;
            state.transactions.push(transaction.clone());
            Ok(transaction)
        })
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<Transaction, Error> {
        self.record(Call::Update, |state| {
            let stored = state
                .transactions
                .iter_mut()
                .find(|transaction| transaction.id == id)
                .ok_or(Error::NotFound)?;
            *stored = input.clone().into_transaction(id);
            Ok(stored.clone())
        })
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        self.record(Call::Delete, |state| {
            state.transactions.retain(|transaction| transaction.id != id);
            Ok(())
        })
    }

    async fn summary(&self) -> Result<Summary, Error> {
        self.record(Call::Summary, |state| Ok(state.summary))
    }

    async fn category_totals(&self) -> Result<CategoryTotals, Error> {
        self.record(Call::CategoryTotals, |state| {
            Ok(state.category_totals.clone())
        })
    }
}

/// Serve the demo backend on a random local port and return its API base URL.
pub(crate) async fn spawn_demo_server(state: DemoState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind to a local port");
    let address = listener
        .local_addr()
        .expect("Could not get the listener's address");
    let router = build_demo_router(state);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Demo server stopped unexpectedly");
    });

    format!("http://{address}{API_PREFIX}")
}
