//! Logging for the requests sent to and the responses received from the backend.
//!
//! Requests and responses are logged at the `info` level. If a body is longer
//! than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated and the full body is
//! logged at the `debug` level. Passwords in JSON request bodies are redacted.

use reqwest::{Method, StatusCode};
use serde_json::Value;

/// The number of bytes of a body to include in `info` level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

pub(crate) fn log_request(method: &Method, url: &str, body: Option<&str>) {
    let Some(body) = body else {
        tracing::info!("Sending request: {method} {url}");
        return;
    };

    let body = REDACTED_FIELDS
        .iter()
        .fold(body.to_owned(), |body, field| redact_field(&body, field));

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending request: {method} {url}\nbody: {}...",
            truncate(&body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Sending request: {method} {url}\nbody: {body:?}");
    }
}

pub(crate) fn log_response(method: &Method, url: &str, status: StatusCode, body: &str) {
    let body = redact_field(body, "token");

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received response: {status} for {method} {url}\nbody: {}...",
            truncate(&body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Received response: {status} for {method} {url}\nbody: {body:?}");
    }
}

/// Replace the value of the top-level `field_name` in a JSON object.
///
/// Bodies that are not JSON objects, or do not contain the field, are returned
/// unchanged.
fn redact_field(body: &str, field_name: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(body) else {
        return body.to_owned();
    };

    match value.get_mut(field_name) {
        Some(field) => {
            *field = Value::String("********".to_owned());
            value.to_string()
        }
        None => body.to_owned(),
    }
}

/// The longest prefix of `body` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character.
fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}
