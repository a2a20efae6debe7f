//! An in-memory implementation of the backend API.
//!
//! The demo backend serves the same routes as the real backend so the client
//! can be tried out, and tested, without one. Nothing is persisted: users,
//! credentials and transactions only live as long as the [DemoState].
//!
//! Credentials are opaque bearer tokens handed out on log in. They stay valid
//! until [DemoState::expire_sessions] is called.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    Extension, Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use bcrypt::{hash, verify};
use serde::Deserialize;
use serde_json::json;
use time::macros::date;

use crate::{
    backend::{CategoryTotals, Summary},
    client::CurrentUser,
    endpoints::{
        API_PREFIX, CATEGORY_TOTALS_API, CURRENT_USER_API, LOG_IN_API, REGISTER_API,
        SUMMARY_API, TRANSACTION_API, TRANSACTIONS_API,
    },
    transaction::{Category, Transaction, TransactionId, TransactionInput, TransactionType},
};

/// The email of the account created by [DemoState::seeded].
pub const DEMO_EMAIL: &str = "demo@example.com";
/// The password of the account created by [DemoState::seeded].
pub const DEMO_PASSWORD: &str = "demo-password";

/// The errors the demo backend answers requests with.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DemoError {
    /// Tried to register an email that already has an account.
    #[error("Email Already Exists")]
    EmailTaken,

    /// The email and password did not match an account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request had no bearer token, or one that is not valid.
    #[error("Unauthorized")]
    Unauthorized,

    /// The transaction does not exist or belongs to another user.
    #[error("Transaction not found")]
    NotFound,

    /// The request body was well formed but its values were rejected.
    #[error("{0}")]
    InvalidInput(String),

    /// The password could not be hashed or checked.
    #[error("hashing failed: {0}")]
    HashingError(String),
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        let status = match self {
            DemoError::EmailTaken => StatusCode::CONFLICT,
            DemoError::InvalidCredentials | DemoError::Unauthorized => StatusCode::UNAUTHORIZED,
            DemoError::NotFound => StatusCode::NOT_FOUND,
            DemoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DemoError::HashingError(ref error) => {
                tracing::error!("Password hashing failed: {error}");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// The ID of a user of the demo backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    /// The number behind the ID.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Debug)]
struct DemoUser {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct DemoData {
    users: Vec<DemoUser>,
    tokens: HashMap<String, UserId>,
    transactions: Vec<(UserId, Transaction)>,
    next_user_id: i64,
    next_transaction_id: TransactionId,
    tokens_issued: u64,
}

/// The users, credentials and transactions of the demo backend.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct DemoState {
    data: Arc<Mutex<DemoData>>,
}

impl DemoState {
    /// The bcrypt cost used to hash passwords.
    pub const PASSWORD_COST: u32 = 4;

    /// Create an empty backend with no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with a demo account that already has some transactions.
    ///
    /// Log in with [DEMO_EMAIL] and [DEMO_PASSWORD].
    ///
    /// # Errors
    /// Returns [DemoError::HashingError] if the password could not be hashed.
    pub fn seeded() -> Result<Self, DemoError> {
        let state = Self::new();
        let user_id = state.add_user("demo", DEMO_EMAIL, DEMO_PASSWORD)?;

        let samples = [
            ("Salary", 3200.0, Category::Salary, date!(2024 - 01 - 01)),
            ("Rent", 1200.0, Category::Rent, date!(2024 - 01 - 02)),
            ("Weekly shop", 82.4, Category::Groceries, date!(2024 - 01 - 05)),
            ("Power bill", 96.0, Category::Utilities, date!(2024 - 01 - 08)),
            ("Logo design", 450.0, Category::Freelance, date!(2024 - 01 - 10)),
            ("Cinema", 24.5, Category::Entertainment, date!(2024 - 01 - 12)),
            ("Weekly shop", 76.1, Category::Groceries, date!(2024 - 01 - 12)),
            ("Train to the coast", 38.0, Category::Travel, date!(2024 - 01 - 14)),
            ("Music streaming", 11.99, Category::Subscriptions, date!(2024 - 01 - 15)),
            ("Birthday money", 50.0, Category::Gifts, date!(2024 - 01 - 18)),
            ("Dentist", 140.0, Category::Health, date!(2024 - 01 - 20)),
            ("Lunch", 17.5, Category::Food, date!(2024 - 01 - 22)),
        ];

        for (title, amount, category, date) in samples {
            state.add_transaction(
                user_id,
                TransactionInput {
                    title: title.to_owned(),
                    amount,
                    transaction_type: category.transaction_type(),
                    category,
                    date,
                    note: None,
                },
            );
        }

        Ok(state)
    }

    fn lock(&self) -> MutexGuard<'_, DemoData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an account.
    ///
    /// # Errors
    /// Returns [DemoError::EmailTaken] if the email already has an account.
    pub fn add_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, DemoError> {
        if self.lock().users.iter().any(|user| user.email == email) {
            return Err(DemoError::EmailTaken);
        }

        let password_hash = hash(password, Self::PASSWORD_COST)
            .map_err(|error| DemoError::HashingError(error.to_string()))?;

        let mut data = self.lock();
        // Checked again since the lock was released while hashing.
        if data.users.iter().any(|user| user.email == email) {
            return Err(DemoError::EmailTaken);
        }

        data.next_user_id += 1;
        let id = UserId(data.next_user_id);
        data.users.push(DemoUser {
            id,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
        });

        tracing::info!("Registered user {email} with ID {}.", id.0);
        Ok(id)
    }

    /// Check an email and password and hand out a new bearer token.
    ///
    /// # Errors
    /// Returns [DemoError::InvalidCredentials] if the email is unknown or the
    /// password is wrong.
    pub fn log_in(&self, email: &str, password: &str) -> Result<String, DemoError> {
        let (user_id, password_hash) = self
            .lock()
            .users
            .iter()
            .find(|user| user.email == email)
            .map(|user| (user.id, user.password_hash.clone()))
            .ok_or(DemoError::InvalidCredentials)?;

        match verify(password, &password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(DemoError::InvalidCredentials),
            Err(error) => return Err(DemoError::HashingError(error.to_string())),
        }

        let mut data = self.lock();
        data.tokens_issued += 1;
        let token = format!("demo.{}.{}", user_id.0, data.tokens_issued);
        data.tokens.insert(token.clone(), user_id);

        Ok(token)
    }

    /// Store a transaction for `user_id` and return it with its new ID.
    pub fn add_transaction(&self, user_id: UserId, input: TransactionInput) -> Transaction {
        let mut data = self.lock();
        data.next_transaction_id += 1;
        let transaction = input.into_transaction(data.next_transaction_id);
        data.transactions.push((user_id, transaction.clone()));

        transaction
    }

    /// Invalidate every bearer token that was handed out.
    pub fn expire_sessions(&self) {
        let mut data = self.lock();
        tracing::info!("Expiring {} session(s).", data.tokens.len());
        data.tokens.clear();
    }

    fn user_for_token(&self, token: &str) -> Option<UserId> {
        self.lock().tokens.get(token).copied()
    }

    fn transactions_of(&self, user_id: UserId) -> Vec<Transaction> {
        self.lock()
            .transactions
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, transaction)| transaction.clone())
            .collect()
    }
}

/// Return a router with all the demo backend's routes, nested under [API_PREFIX].
pub fn build_demo_router(state: DemoState) -> Router {
    let unprotected_routes = Router::new()
        .route(LOG_IN_API, post(post_log_in))
        .route(REGISTER_API, post(post_register));

    let protected_routes = Router::new()
        .route(CURRENT_USER_API, get(get_current_user))
        .route(
            TRANSACTIONS_API,
            get(get_transactions).post(create_transaction),
        )
        .route(
            TRANSACTION_API,
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route(SUMMARY_API, get(get_summary))
        .route(CATEGORY_TOTALS_API, get(get_category_totals))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .nest(API_PREFIX, unprotected_routes.merge(protected_routes))
        .with_state(state)
}

/// Middleware that checks the bearer token and places the [UserId] into the
/// request, or answers 401 Unauthorized.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
async fn auth_guard(
    State(state): State<DemoState>,
    authorization: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match authorization {
        Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
        Err(rejection) => {
            tracing::debug!("Rejected request without bearer token: {rejection}");
            return DemoError::Unauthorized.into_response();
        }
    };

    let Some(user_id) = state.user_for_token(&token) else {
        tracing::debug!("Rejected request with unknown bearer token.");
        return DemoError::Unauthorized.into_response();
    };

    request.extensions_mut().insert(user_id);
    next.run(request).await
}

#[derive(Debug, Deserialize)]
struct LogInRequest {
    email: String,
    password: String,
}

async fn post_log_in(
    State(state): State<DemoState>,
    Json(request): Json<LogInRequest>,
) -> Result<Json<serde_json::Value>, DemoError> {
    let token = state.log_in(&request.email, &request.password)?;

    Ok(Json(json!({ "token": token })))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    username: String,
    email: String,
    password: String,
}

async fn post_register(
    State(state): State<DemoState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, &'static str), DemoError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(DemoError::InvalidInput(
            "Email and password are required".to_owned(),
        ));
    }

    state.add_user(&request.username, &request.email, &request.password)?;

    Ok((StatusCode::CREATED, "Successfully Registered"))
}

async fn get_current_user(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<CurrentUser>, DemoError> {
    state
        .lock()
        .users
        .iter()
        .find(|user| user.id == user_id)
        .map(|user| {
            Json(CurrentUser {
                id: user.id.0,
                username: user.username.clone(),
                email: user.email.clone(),
            })
        })
        .ok_or(DemoError::Unauthorized)
}

async fn get_transactions(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
) -> Json<Vec<Transaction>> {
    Json(state.transactions_of(user_id))
}

fn validate_input(input: &TransactionInput) -> Result<(), DemoError> {
    if input.title.trim().is_empty() {
        return Err(DemoError::InvalidInput("Title is required".to_owned()));
    }

    if !(input.amount.is_finite() && input.amount > 0.0) {
        return Err(DemoError::InvalidInput(
            "Amount must be greater than zero".to_owned(),
        ));
    }

    if input.category.transaction_type() != input.transaction_type {
        return Err(DemoError::InvalidInput(format!(
            "{} is not a {} category",
            input.category.code(),
            input.transaction_type
        )));
    }

    Ok(())
}

async fn create_transaction(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
    Json(input): Json<TransactionInput>,
) -> Result<(StatusCode, Json<Transaction>), DemoError> {
    validate_input(&input)?;
    let transaction = state.add_transaction(user_id, input);

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn get_transaction(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, DemoError> {
    state
        .lock()
        .transactions
        .iter()
        .find(|(owner, transaction)| *owner == user_id && transaction.id == transaction_id)
        .map(|(_, transaction)| Json(transaction.clone()))
        .ok_or(DemoError::NotFound)
}

async fn update_transaction(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
    Json(input): Json<TransactionInput>,
) -> Result<Json<Transaction>, DemoError> {
    validate_input(&input)?;

    let mut data = state.lock();
    let (_, stored) = data
        .transactions
        .iter_mut()
        .find(|(owner, transaction)| *owner == user_id && transaction.id == transaction_id)
        .ok_or(DemoError::NotFound)?;

    *stored = input.into_transaction(transaction_id);

    Ok(Json(stored.clone()))
}

async fn delete_transaction(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<(StatusCode, &'static str), DemoError> {
    let mut data = state.lock();
    let count_before = data.transactions.len();
    data.transactions.retain(|(owner, transaction)| {
        !(*owner == user_id && transaction.id == transaction_id)
    });

    if data.transactions.len() == count_before {
        return Err(DemoError::NotFound);
    }

    Ok((StatusCode::OK, "Transaction deleted successfully"))
}

async fn get_summary(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
) -> Json<Summary> {
    let (income, expense) = state.transactions_of(user_id).iter().fold(
        (0.0, 0.0),
        |(income, expense), transaction| match transaction.transaction_type {
            TransactionType::Income => (income + transaction.amount, expense),
            TransactionType::Expense => (income, expense + transaction.amount),
        },
    );

    Json(Summary {
        income,
        expense,
        net_balance: income - expense,
    })
}

async fn get_category_totals(
    State(state): State<DemoState>,
    Extension(user_id): Extension<UserId>,
) -> Json<CategoryTotals> {
    let mut totals = CategoryTotals::new();

    for transaction in state.transactions_of(user_id) {
        *totals.entry(transaction.category).or_default() += transaction.amount;
    }

    Json(totals)
}
