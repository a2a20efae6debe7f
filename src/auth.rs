//! The log in and registration flows.
//!
//! Both forms are checked for missing fields before anything is sent, so an
//! incomplete form never reaches the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, client::ApiClient};

/// The email and password entered on the log in page.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogInForm {
    /// Email entered during log in.
    pub email: String,
    /// Password entered during log in.
    pub password: String,
}

impl LogInForm {
    /// Check that both fields were filled in.
    ///
    /// # Errors
    /// Returns [Error::MissingEmail] or [Error::MissingPassword] for the first
    /// empty field.
    pub fn validate(&self) -> Result<(), Error> {
        validate_credentials(&self.email, &self.password)
    }
}

impl fmt::Debug for LogInForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogInForm")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// The fields entered on the registration page.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name to show for the new account.
    pub username: String,
    /// The email to log in with.
    pub email: String,
    /// The password to log in with.
    pub password: String,
}

impl RegisterForm {
    /// Check that the email and password were filled in.
    ///
    /// # Errors
    /// Returns [Error::MissingEmail] or [Error::MissingPassword] for the first
    /// empty field.
    pub fn validate(&self) -> Result<(), Error> {
        validate_credentials(&self.email, &self.password)
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), Error> {
    if email.trim().is_empty() {
        return Err(Error::MissingEmail);
    }

    if password.is_empty() {
        return Err(Error::MissingPassword);
    }

    Ok(())
}

/// Log in and store the returned credential in the client's session.
///
/// # Errors
/// Returns a validation error without sending anything if a field is empty,
/// or [Error::InvalidCredentials] if the backend rejects the email and
/// password. The session is left unchanged on error.
pub async fn log_in(client: &ApiClient, form: &LogInForm) -> Result<(), Error> {
    form.validate()?;

    let token = client
        .log_in(form)
        .await
        .inspect_err(|error| tracing::debug!("Log in failed for {}: {error}", form.email))?;

    client.session().set_token(token);
    tracing::info!("Logged in as {}.", form.email);

    Ok(())
}

/// Create a new account. The user still has to log in afterwards.
///
/// # Errors
/// Returns a validation error without sending anything if a field is empty,
/// or [Error::EmailTaken] if the email already has an account.
pub async fn register(client: &ApiClient, form: &RegisterForm) -> Result<(), Error> {
    form.validate()?;

    client.register(form).await?;
    tracing::info!("Registered {}.", form.email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        ApiClient, ClientConfig, Error, LogInForm, RegisterForm, Session, demo::DemoState, log_in,
        register, test_utils::spawn_demo_server,
    };

    const PASSWORD: &str = "averysafeandsecurepassword";

    async fn client_for(state: DemoState) -> ApiClient {
        let config = ClientConfig {
            base_url: spawn_demo_server(state).await,
            ..Default::default()
        };

        ApiClient::new(&config, Session::new()).unwrap()
    }

    #[test]
    fn log_in_form_requires_email_and_password() {
        let missing_email = LogInForm {
            email: "  ".to_owned(),
            password: PASSWORD.to_owned(),
        };
        let missing_password = LogInForm {
            email: "foo@bar.baz".to_owned(),
            password: String::new(),
        };

        assert_eq!(missing_email.validate(), Err(Error::MissingEmail));
        assert_eq!(missing_password.validate(), Err(Error::MissingPassword));
    }

    #[test]
    fn debug_hides_password() {
        let form = RegisterForm {
            username: "foo".to_owned(),
            email: "foo@bar.baz".to_owned(),
            password: PASSWORD.to_owned(),
        };

        let text = format!("{form:?}");

        assert!(!text.contains(PASSWORD), "got {text}");
    }

    #[tokio::test]
    async fn log_in_stores_token_in_session() {
        let state = DemoState::new();
        state.add_user("foo", "foo@bar.baz", PASSWORD).unwrap();
        let client = client_for(state).await;

        log_in(
            &client,
            &LogInForm {
                email: "foo@bar.baz".to_owned(),
                password: PASSWORD.to_owned(),
            },
        )
        .await
        .unwrap();

        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn failed_log_in_leaves_session_unchanged() {
        let state = DemoState::new();
        state.add_user("foo", "foo@bar.baz", PASSWORD).unwrap();
        let client = client_for(state).await;

        let result = log_in(
            &client,
            &LogInForm {
                email: "nobody@bar.baz".to_owned(),
                password: PASSWORD.to_owned(),
            },
        )
        .await;

        assert_eq!(result, Err(Error::InvalidCredentials));
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn register_then_log_in() {
        let client = client_for(DemoState::new()).await;

        register(
            &client,
            &RegisterForm {
                username: "foo".to_owned(),
                email: "foo@bar.baz".to_owned(),
                password: PASSWORD.to_owned(),
            },
        )
        .await
        .unwrap();
        log_in(
            &client,
            &LogInForm {
                email: "foo@bar.baz".to_owned(),
                password: PASSWORD.to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            client.current_user().await.unwrap().email,
            "foo@bar.baz"
        );
    }

    #[tokio::test]
    async fn empty_form_is_not_sent() {
        let client = client_for(DemoState::new()).await;

        let result = register(&client, &RegisterForm::default()).await;

        assert_eq!(result, Err(Error::MissingEmail));
    }
}
