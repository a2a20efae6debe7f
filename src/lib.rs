//! Trackeroo is a client for a personal expense tracking service.
//!
//! Users record income and expense transactions, look at aggregate summaries
//! and browse their transactions with filters, sorting and pages. Persistence,
//! aggregation and authentication live in a separate backend that is reached
//! over HTTP; this library holds the presentation state that sits in front of
//! it:
//!
//! - [ApiClient], the HTTP adapter that attaches the bearer credential from a
//!   [Session] and expires the session when the backend rejects it,
//! - [TransactionList], the view-model that derives a filtered, sorted and
//!   paginated view of the user's transactions,
//! - [TransactionEditor], the create/edit form,
//! - [load_dashboard], the all-or-nothing dashboard fetch,
//! - [Shell], the page shell that gates protected pages on a credential.
//!
//! The [demo] module serves an in-memory implementation of the backend API
//! for manual testing.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod auth;
mod backend;
mod client;
mod config;
mod dashboard;
pub mod demo;
mod endpoints;
mod logging;
mod navigation;
mod pagination;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use alert::{Alert, AlertType};
pub use auth::{LogInForm, RegisterForm, log_in, register};
pub use backend::{CategoryTotals, ExpenseBackend, Summary};
pub use client::{ApiClient, CurrentUser};
pub use config::ClientConfig;
pub use dashboard::{
    CategoryTotal, Dashboard, RECENT_TRANSACTION_COUNT, format_currency, load_dashboard,
    recent_transactions,
};
pub use endpoints::API_PREFIX;
pub use logging::LOG_BODY_LENGTH_LIMIT;
pub use navigation::{NavLink, Route, Shell, ShellState, nav_links};
pub use pagination::{Pagination, paginate, total_pages};
pub use session::Session;
pub use transaction::{
    Category, DeleteOutcome, EXPENSE_CATEGORIES, EditorMode, FilterCriteria, INCOME_CATEGORIES,
    SortConfig, SortDirection, SortKey, Transaction, TransactionEditor, TransactionId,
    TransactionInput, TransactionList, TransactionPage, TransactionType, apply_filters,
    apply_sort, format_date, parse_date,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then tells the server behind `handle` to shut down gracefully.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::debug!("Received ctrl+c signal."),
        _ = terminate => tracing::debug!("Received terminate signal."),
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
///
/// The variants follow the ways a request can fail from the user's point of
/// view: local validation, authentication, session expiry, backend and
/// network failures, and the dashboard's aggregate fetch. Use
/// [Alert::from] to turn an error into text for the user.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction title was empty or only contained whitespace.
    #[error("title is required")]
    EmptyTitle,

    /// The transaction amount could not be read as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The transaction amount was zero or negative.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// The transaction date was left empty.
    #[error("date is required")]
    MissingDate,

    /// A date could not be parsed, dates are expected as `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The email was left empty on the log in or registration form.
    #[error("email is required")]
    MissingEmail,

    /// The password was left empty on the log in or registration form.
    #[error("password is required")]
    MissingPassword,

    /// The backend rejected the email and password.
    ///
    /// No distinction is made between an unknown user and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Tried to register with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// The backend no longer accepts the session's credential.
    ///
    /// By the time a caller sees this error the credential has already been
    /// cleared and the session's expiry observers have been notified.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The requested resource does not exist on the backend.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The backend answered with an unexpected status code.
    #[error("the backend responded with status {status}: {message}")]
    Backend {
        /// The HTTP status code of the response.
        status: u16,
        /// The body of the response.
        message: String,
    },

    /// The backend could not be reached.
    #[error("could not reach the backend: {0}")]
    Network(String),

    /// The backend's response could not be understood.
    #[error("could not read the backend response: {0}")]
    InvalidResponse(String),

    /// At least one of the dashboard's requests failed.
    #[error("could not load the dashboard")]
    DashboardUnavailable,

    /// A category code or label that is not in the category table.
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    /// A transaction type that is neither income nor expense.
    #[error("\"{0}\" is not a known transaction type")]
    UnknownTransactionType(String),

    /// A category was chosen that does not belong to the selected transaction type.
    #[error("{category} is not a category for {transaction_type} transactions")]
    CategoryTypeMismatch {
        /// The category that was chosen.
        category: Category,
        /// The transaction type selected in the editor.
        transaction_type: TransactionType,
    },

    /// Tried to save the transaction editor while it is closed.
    #[error("the transaction editor is not open")]
    EditorClosed,

    /// A configuration value could not be used.
    #[error("invalid value for {name}: {reason}")]
    InvalidConfig {
        /// The name of the setting, e.g. the environment variable.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        tracing::error!("HTTP request failed: {value}");
        Error::Network(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        tracing::error!("Could not parse JSON from the backend: {value}");
        Error::InvalidResponse(value.to_string())
    }
}
