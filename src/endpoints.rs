//! The backend API paths and the routes of the page shell.
//!
//! API paths are relative to the backend's base URL, which usually ends in
//! [API_PREFIX]. For paths that take a parameter, e.g.
//! '/transactions/{transaction_id}', use [format_endpoint].

/// The prefix the backend serves its API under.
pub const API_PREFIX: &str = "/api";

/// The route for exchanging an email and password for a bearer token.
pub const LOG_IN_API: &str = "/auth/login";
/// The route for creating a new account.
pub const REGISTER_API: &str = "/auth/register";
/// The route for the currently authenticated user.
pub const CURRENT_USER_API: &str = "/users/me";
/// The route for the income, expense and net balance totals.
pub const SUMMARY_API: &str = "/report/summary";
/// The route for the total amount per category.
pub const CATEGORY_TOTALS_API: &str = "/report/by-category";
/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION_API: &str = "/transactions/{transaction_id}";

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page for logging in.
pub const LOG_IN_VIEW: &str = "/login";
/// The page for registering a new account.
pub const REGISTER_VIEW: &str = "/register";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page that lists a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{transaction_id}' in '/transactions/{transaction_id}'. Only the first
/// parameter is replaced. If there is no parameter, `endpoint_path` is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some((head, rest)) = endpoint_path.split_once('{') else {
        return endpoint_path.to_owned();
    };

    let tail = rest.split_once('}').map_or("", |(_, tail)| tail);

    format!("{head}{id}{tail}")
}
