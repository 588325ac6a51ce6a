//! Sign-in, registration, and sign-out flows.
//!
//! [`AuthService`] composes the auth endpoints with the session store. It is
//! the only place a session is created from a backend response.

use tracing::{info, warn};

use super::store::{LoginOutcome, SessionError, SessionStore};
use crate::api::{ApiClient, AuthApi, handle_api_error};
use crate::domain::{
    ApiError, LoginCredentials, LoginValidationError, RegistrationPayload, RegistrationResponse,
    UserProfile,
};

/// Shown when a sign-in lost the race against a session teardown.
pub const STALE_LOGIN_MESSAGE: &str = "Your session changed while signing in. Please try again";

/// Errors raised by the auth flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The session could not be written.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Credentials derived for the follow-up login are invalid.
    #[error(transparent)]
    InvalidCredentials(#[from] LoginValidationError),
}

impl AuthError {
    /// Message suitable for display next to the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => handle_api_error(err),
            Self::Session(SessionError::Stale { .. }) => STALE_LOGIN_MESSAGE.to_owned(),
            Self::Session(err) => err.to_string(),
            Self::InvalidCredentials(err) => err.to_string(),
        }
    }
}

/// Authentication flows over one adapter and its session.
#[derive(Debug, Clone)]
pub struct AuthService {
    auth: AuthApi,
    session: SessionStore,
}

impl AuthService {
    /// Build the service over `client` and the session it carries.
    pub fn new(client: &ApiClient) -> Self {
        Self {
            auth: client.auth(),
            session: client.session().clone(),
        }
    }

    /// Sign in and persist the session.
    ///
    /// The session generation is captured before dispatch. If a teardown
    /// happened while the request was in flight the result is discarded and
    /// nothing is written.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, AuthError> {
        let generation = self.session.generation();
        let response = self.auth.login(credentials).await?;
        let outcome = LoginOutcome {
            token: response.key,
            user: response.user,
            generation,
        };
        self.session.login_outcome(&outcome)?;
        Ok(outcome)
    }

    /// Create an account. Never signs in.
    pub async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResponse, AuthError> {
        let response = self.auth.register(payload).await?;
        info!(username = payload.username(), "account registered");
        Ok(response)
    }

    /// Create an account, then sign in with the same username and password.
    pub async fn register_and_login(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<LoginOutcome, AuthError> {
        self.register(payload).await?;
        let credentials = payload.login_credentials()?;
        self.login(&credentials).await
    }

    /// Sign out.
    ///
    /// The remote call is best effort; its failure is logged and ignored.
    /// The local session is always cleared.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if let Err(err) = self.auth.logout().await {
            warn!(error = %err, "remote logout failed, clearing local session anyway");
        }
        self.session.logout()
    }

    /// Profile persisted in storage, if readable.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.session
            .persisted_user()
            .map_err(|err| warn!(error = %err, "persisted profile unreadable"))
            .ok()
            .flatten()
    }

    /// Whether a token is persisted.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.session.persisted_token(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::domain::ports::{
        FixtureHttpTransport, FixtureNavigator, FixtureSessionStorage, HttpMethod,
        HttpTransportError,
    };
    use rstest::rstest;
    use serde_json::json;
    use url::Url;

    fn client(transport: FixtureHttpTransport) -> (ApiClient, Arc<FixtureSessionStorage>) {
        let storage = Arc::new(FixtureSessionStorage::default());
        let client = ApiClient::new(
            Url::parse("http://localhost:8000/api/v1").expect("base url"),
            Arc::new(transport),
            SessionStore::hydrate(storage.clone()),
            Arc::new(FixtureNavigator::default()),
        );
        (client, storage)
    }

    fn login_body() -> serde_json::Value {
        json!({ "key": "abc123", "user": { "id": 1, "username": "ada" } })
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada", "password1").expect("credentials")
    }

    fn registration() -> RegistrationPayload {
        RegistrationPayload::try_new("ada", "ada@example.com", "password1", "password1", "")
            .expect("payload")
    }

    #[tokio::test]
    async fn login_persists_session() {
        let (client, _storage) = client(FixtureHttpTransport::default().respond(
            HttpMethod::Post,
            "/api/v1/auth/login/",
            200,
            login_body(),
        ));
        let service = AuthService::new(&client);

        let outcome = service.login(&credentials()).await.expect("login succeeds");

        assert_eq!(outcome.token.expose(), "abc123");
        assert!(service.is_authenticated());
        assert_eq!(service.current_user().map(|user| user.id), Some(1));
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn rejected_login_surfaces_server_message() {
        let (client, storage) = client(FixtureHttpTransport::default().respond(
            HttpMethod::Post,
            "/api/v1/auth/login/",
            400,
            json!({ "non_field_errors": ["Unable to log in with provided credentials."] }),
        ));
        let service = AuthService::new(&client);

        let err = service.login(&credentials()).await.expect_err("rejected");

        assert_eq!(
            err.user_message(),
            "Unable to log in with provided credentials."
        );
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn login_racing_a_teardown_is_discarded() {
        let (client, storage) = client(FixtureHttpTransport::default().respond_after(
            HttpMethod::Post,
            "/api/v1/auth/login/",
            200,
            login_body(),
            Duration::from_millis(50),
        ));
        let service = AuthService::new(&client);
        let session = client.session().clone();

        let teardown = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            session.invalidate();
        };
        let creds = credentials();
        let (result, ()) = tokio::join!(service.login(&creds), teardown);

        let err = result.expect_err("stale login");
        assert_eq!(err.user_message(), STALE_LOGIN_MESSAGE);
        assert!(storage.is_empty());
        assert!(!client.session().is_authenticated());
    }

    #[rstest]
    #[case::token_issued(json!({ "key": "fresh-token" }))]
    #[case::verification_pending(json!({ "detail": "Verification e-mail sent." }))]
    #[tokio::test]
    async fn registration_alone_does_not_authenticate(#[case] body: serde_json::Value) {
        let (client, storage) = client(FixtureHttpTransport::default().respond(
            HttpMethod::Post,
            "/api/v1/auth/registration/",
            201,
            body,
        ));
        let service = AuthService::new(&client);

        service.register(&registration()).await.expect("registered");

        assert!(storage.is_empty());
        assert!(!service.is_authenticated());
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn register_and_login_composes_both_calls() {
        let (client, _storage) = client(
            FixtureHttpTransport::default()
                .respond(HttpMethod::Post, "/api/v1/auth/registration/", 201, json!({}))
                .respond(HttpMethod::Post, "/api/v1/auth/login/", 200, login_body()),
        );
        let service = AuthService::new(&client);

        service
            .register_and_login(&registration())
            .await
            .expect("registered and signed in");

        assert!(service.is_authenticated());
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_session_when_remote_call_fails() {
        let (client, storage) = client(
            FixtureHttpTransport::default()
                .respond(HttpMethod::Post, "/api/v1/auth/login/", 200, login_body())
                .fail(
                    HttpMethod::Post,
                    "/api/v1/auth/logout/",
                    HttpTransportError::no_response("connection refused"),
                ),
        );
        let service = AuthService::new(&client);
        service.login(&credentials()).await.expect("login succeeds");

        service.logout().await.expect("local logout succeeds");

        assert!(storage.is_empty());
        assert!(!client.session().is_authenticated());
        assert!(service.current_user().is_none());
    }
}
