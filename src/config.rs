//! Settings for talking to the backend and displaying data.

use std::time::Duration;

use crate::{Error, endpoints::API_PREFIX, pagination::Pagination};

/// Environment variable for [ClientConfig::base_url].
pub const BASE_URL_VAR: &str = "TRACKEROO_API_BASE_URL";
/// Environment variable for [ClientConfig::page_size].
pub const PAGE_SIZE_VAR: &str = "TRACKEROO_PAGE_SIZE";
/// Environment variable for [ClientConfig::currency_symbol].
pub const CURRENCY_SYMBOL_VAR: &str = "TRACKEROO_CURRENCY_SYMBOL";
/// Environment variable for [ClientConfig::timeout], in seconds.
pub const TIMEOUT_VAR: &str = "TRACKEROO_TIMEOUT_SECS";

/// The settings for the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// The URL the backend API is served from, e.g. "http://localhost:8080/api".
    ///
    /// API paths are appended to this URL, so it should not end with a slash.
    pub base_url: String,
    /// The number of transactions to show per page.
    pub page_size: usize,
    /// The symbol to prefix amounts with when displaying them.
    pub currency_symbol: String,
    /// How long to wait for the backend before giving up on a request.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://localhost:8080{API_PREFIX}"),
            page_size: Pagination::DEFAULT_PAGE_SIZE,
            currency_symbol: "₹".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a config from the environment, using the defaults for any
    /// variable that is not set.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if a variable is set to a value that
    /// cannot be used, e.g. a page size of zero.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = normalize_base_url(&base_url)?;
        }

        if let Some(page_size) = lookup(PAGE_SIZE_VAR) {
            config.page_size = match page_size.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(Error::InvalidConfig {
                        name: PAGE_SIZE_VAR.to_owned(),
                        reason: format!("\"{page_size}\" is not a positive whole number"),
                    });
                }
            };
        }

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_VAR) {
            config.currency_symbol = symbol;
        }

        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            let seconds = timeout
                .trim()
                .parse::<u64>()
                .map_err(|error| Error::InvalidConfig {
                    name: TIMEOUT_VAR.to_owned(),
                    reason: error.to_string(),
                })?;
            config.timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }
}

/// Trim whitespace and trailing slashes from a base URL and check that it
/// uses HTTP(S).
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, Error> {
    let trimmed = base_url.trim().trim_end_matches('/');

    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidConfig {
            name: BASE_URL_VAR.to_owned(),
            reason: format!("\"{base_url}\" must start with http:// or https://"),
        });
    }

    Ok(trimmed.to_owned())
}
