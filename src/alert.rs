//! Alert system for displaying success and error messages to users.
//!
//! Every error is turned into text here, so the wording users see is decided
//! in one place.

use crate::Error;

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    /// Something worked.
    Success,
    /// Something failed.
    Error,
}

/// A message for the user with optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Whether the alert reports a success or an error.
    pub alert_type: AlertType,
    /// The headline, e.g. "Invalid credentials. Try again."
    pub message: String,
    /// More information about what happened, may be empty.
    pub details: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error alert
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error alert without details
    pub fn error_simple(message: impl Into<String>) -> Self {
        Self::error(message, "")
    }
}

impl From<&Error> for Alert {
    fn from(error: &Error) -> Self {
        match error {
            Error::EmptyTitle
            | Error::InvalidAmount(_)
            | Error::NonPositiveAmount
            | Error::MissingDate
            | Error::InvalidDate(_)
            | Error::MissingEmail
            | Error::MissingPassword
            | Error::UnknownCategory(_)
            | Error::UnknownTransactionType(_)
            | Error::CategoryTypeMismatch { .. } => {
                Self::error("Please check the form.", capitalize(&error.to_string()))
            }
            Error::InvalidCredentials => Self::error_simple("Invalid credentials. Try again."),
            Error::EmailTaken => Self::error(
                "Email already exists.",
                "Log in instead, or register with a different email.",
            ),
            Error::SessionExpired => {
                Self::error_simple("Your session has expired. Please log in again.")
            }
            Error::NotFound => Self::error(
                "Could not find the transaction.",
                "It may have been deleted. Refresh the page and try again.",
            ),
            Error::DashboardUnavailable => {
                Self::error_simple("Could not load the dashboard. Try again.")
            }
            Error::Network(_) => Self::error(
                "Could not reach the server.",
                "Check your connection and try again.",
            ),
            Error::EditorClosed => Self::error_simple("Open the form before saving."),
            Error::InvalidConfig { .. } => {
                Self::error("Invalid configuration.", capitalize(&error.to_string()))
            }
            Error::Backend { .. } | Error::InvalidResponse(_) => Self::error(
                "Something went wrong.",
                "Check the logs for more details and try again.",
            ),
        }
    }
}

impl From<Error> for Alert {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
