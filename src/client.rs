//! The HTTP adapter for the expense tracking backend.

use reqwest::{Method, StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    Error,
    auth::{LogInForm, RegisterForm},
    backend::{CategoryTotals, ExpenseBackend, Summary},
    config::{ClientConfig, normalize_base_url},
    endpoints::{
        CATEGORY_TOTALS_API, CURRENT_USER_API, LOG_IN_API, REGISTER_API, SUMMARY_API,
        TRANSACTION_API, TRANSACTIONS_API, format_endpoint,
    },
    logging::{log_request, log_response},
    session::Session,
    transaction::{Transaction, TransactionId, TransactionInput},
};

/// The account of the logged in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The ID the backend assigned to the user.
    pub id: i64,
    /// The name the user registered with.
    #[serde(default)]
    pub username: String,
    /// The email the user logs in with.
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Sends requests to the backend on behalf of a [Session].
///
/// Every request other than logging in and registering carries the session's
/// credential as a bearer token. If the backend answers such a request with
/// 401 Unauthorized, the session is expired, which clears the credential and
/// notifies the session's observers, and the request fails with
/// [Error::SessionExpired].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for the backend at `config.base_url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the base URL is not an HTTP(S) URL
    /// and [Error::Network] if the HTTP client could not be created.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, Error> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The session whose credential is sent with each request.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The URL that API paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange an email and password for a bearer token.
    ///
    /// The session is not changed, see [crate::log_in] for the full log in flow.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the backend rejects the email
    /// and password, without saying which one was wrong.
    pub async fn log_in(&self, form: &LogInForm) -> Result<String, Error> {
        let body = serde_json::to_string(form)?;
        let (status, body) = self
            .send(Method::POST, LOG_IN_API, Some(body), false)
            .await?;

        match status {
            status if status.is_success() => {
                let response: TokenResponse = serde_json::from_str(&body)?;
                Ok(response.token)
            }
            status if status.is_client_error() => {
                tracing::debug!("Log in rejected with status {status}.");
                Err(Error::InvalidCredentials)
            }
            status => Err(Error::Backend {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    /// Create a new account.
    ///
    /// # Errors
    /// Returns [Error::EmailTaken] if an account with the email already exists.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), Error> {
        let body = serde_json::to_string(form)?;
        let (status, body) = self
            .send(Method::POST, REGISTER_API, Some(body), false)
            .await?;

        match status {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(Error::EmailTaken),
            status => Err(Error::Backend {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    /// Fetch the account of the logged in user.
    pub async fn current_user(&self) -> Result<CurrentUser, Error> {
        self.get_json(CURRENT_USER_API).await
    }

    /// Fetch a single transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user has no transaction `id`.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.get_json(&format_endpoint(TRANSACTION_API, id)).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let body = self.send_authorized(Method::GET, path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request with the session's credential and return the body of
    /// a successful response.
    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, Error> {
        let (status, body) = self.send(method.clone(), path, body, true).await?;

        match status {
            status if status.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(
                    "The backend rejected the credential for {method} {path}, expiring the session."
                );
                self.session.expire();
                Err(Error::SessionExpired)
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => {
                tracing::error!("{method} {path} failed with status {status}: {body}");
                Err(Error::Backend {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        with_credential: bool,
    ) -> Result<(StatusCode, String), Error> {
        let url = format!("{}{path}", self.base_url);
        log_request(&method, &url, body.as_deref());

        let mut request = self.http.request(method.clone(), &url);

        if with_credential {
            match self.session.token() {
                Some(token) => request = request.bearer_auth(token),
                None => tracing::debug!("No credential to send with {method} {url}."),
            }
        }

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        log_response(&method, &url, status, &body);

        Ok((status, body))
    }
}

impl ExpenseBackend for ApiClient {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.get_json(TRANSACTIONS_API).await
    }

    async fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction, Error> {
        let body = serde_json::to_string(input)?;
        let response = self
            .send_authorized(Method::POST, TRANSACTIONS_API, Some(body))
            .await?;

        Ok(serde_json::from_str(&response)?)
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<Transaction, Error> {
        let body = serde_json::to_string(input)?;
        let response = self
            .send_authorized(Method::PUT, &format_endpoint(TRANSACTION_API, id), Some(body))
            .await?;

        Ok(serde_json::from_str(&response)?)
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        self.send_authorized(Method::DELETE, &format_endpoint(TRANSACTION_API, id), None)
            .await?;

        Ok(())
    }

    async fn summary(&self) -> Result<Summary, Error> {
        self.get_json(SUMMARY_API).await
    }

    async fn category_totals(&self) -> Result<CategoryTotals, Error> {
        self.get_json(CATEGORY_TOTALS_API).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use time::macros::date;

    use crate::{
        ApiClient, ClientConfig, Error, ExpenseBackend, LogInForm, RegisterForm, Session,
        demo::DemoState,
        test_utils::spawn_demo_server,
        transaction::{Category, TransactionInput, TransactionType},
    };

    const EMAIL: &str = "test@test.com";
    const PASSWORD: &str = "averysafeandsecurepassword";

    async fn client_for(state: DemoState) -> ApiClient {
        let base_url = spawn_demo_server(state).await;
        let config = ClientConfig {
            base_url,
            ..Default::default()
        };

        ApiClient::new(&config, Session::new()).unwrap()
    }

    async fn logged_in_client(state: DemoState) -> ApiClient {
        state.add_user("test", EMAIL, PASSWORD).unwrap();
        let client = client_for(state).await;
        let token = client
            .log_in(&LogInForm {
                email: EMAIL.to_owned(),
                password: PASSWORD.to_owned(),
            })
            .await
            .unwrap();
        client.session().set_token(token);
        client
    }

    fn coffee() -> TransactionInput {
        TransactionInput {
            title: "Coffee".to_owned(),
            amount: 4.5,
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            date: date!(2024 - 01 - 05),
            note: None,
        }
    }

    #[tokio::test]
    async fn log_in_returns_token_without_touching_session() {
        let state = DemoState::new();
        state.add_user("test", EMAIL, PASSWORD).unwrap();
        let client = client_for(state).await;

        let token = client
            .log_in(&LogInForm {
                email: EMAIL.to_owned(),
                password: PASSWORD.to_owned(),
            })
            .await
            .unwrap();

        assert!(!token.is_empty());
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn log_in_with_wrong_password_is_invalid_credentials() {
        let state = DemoState::new();
        state.add_user("test", EMAIL, PASSWORD).unwrap();
        let client = client_for(state).await;
        let expiries = Arc::new(AtomicUsize::new(0));
        {
            let expiries = expiries.clone();
            client.session().on_expired(move || {
                expiries.fetch_add(1, Ordering::SeqCst);
            });
        }

        let result = client
            .log_in(&LogInForm {
                email: EMAIL.to_owned(),
                password: "wrongpassword".to_owned(),
            })
            .await;

        assert_eq!(result, Err(Error::InvalidCredentials));
        assert_eq!(expiries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn register_twice_is_email_taken() {
        let client = client_for(DemoState::new()).await;
        let form = RegisterForm {
            username: "test".to_owned(),
            email: EMAIL.to_owned(),
            password: PASSWORD.to_owned(),
        };

        client.register(&form).await.unwrap();
        let result = client.register(&form).await;

        assert_eq!(result, Err(Error::EmailTaken));
    }

    #[tokio::test]
    async fn round_trips_transactions() {
        let client = logged_in_client(DemoState::new()).await;

        let created = client.create_transaction(&coffee()).await.unwrap();
        let listed = client.list_transactions().await.unwrap();
        let fetched = client.get_transaction(created.id).await.unwrap();

        assert_eq!(created.title, "Coffee");
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(fetched, created);

        let mut changed = coffee();
        changed.amount = 5.0;
        let updated = client
            .update_transaction(created.id, &changed)
            .await
            .unwrap();
        assert_eq!(updated.amount, 5.0);
        assert_eq!(updated.id, created.id);

        client.delete_transaction(created.id).await.unwrap();
        assert!(client.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let client = logged_in_client(DemoState::new()).await;

        let result = client.get_transaction(42).await;

        assert_eq!(result, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn reads_reports() {
        let client = logged_in_client(DemoState::new()).await;
        client.create_transaction(&coffee()).await.unwrap();

        let summary = client.summary().await.unwrap();
        let totals = client.category_totals().await.unwrap();

        assert_eq!(summary.expense, 4.5);
        assert_eq!(summary.net_balance, -4.5);
        assert_eq!(totals.get(&Category::Food), Some(&4.5));
    }

    #[tokio::test]
    async fn current_user_matches_log_in() {
        let client = logged_in_client(DemoState::new()).await;

        let user = client.current_user().await.unwrap();

        assert_eq!(user.email, EMAIL);
        assert_eq!(user.username, "test");
    }

    #[tokio::test]
    async fn rejected_credential_expires_session() {
        let state = DemoState::new();
        let client = logged_in_client(state.clone()).await;
        let expiries = Arc::new(AtomicUsize::new(0));
        {
            let expiries = expiries.clone();
            client.session().on_expired(move || {
                expiries.fetch_add(1, Ordering::SeqCst);
            });
        }

        state.expire_sessions();
        let result = client.summary().await;

        assert_eq!(result, Err(Error::SessionExpired));
        assert!(!client.session().is_authenticated());
        assert_eq!(expiries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_without_credential_expires_session() {
        let client = client_for(DemoState::new()).await;

        let result = client.create_transaction(&coffee()).await;

        assert_eq!(result, Err(Error::SessionExpired));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1/api".to_owned(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, Session::with_token("foo")).unwrap();

        let result = client.list_transactions().await;

        assert!(matches!(result, Err(Error::Network(_))), "got {result:?}");
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let config = ClientConfig {
            base_url: "localhost:8080/api".to_owned(),
            ..Default::default()
        };

        let result = ApiClient::new(&config, Session::new());

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
