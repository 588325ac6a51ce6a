//! Authentication endpoints.
//!
//! These calls only talk to the backend. Persisting the resulting session
//! is the job of [`crate::session::AuthService`].

use serde_json::json;

use super::{ApiClient, ApiRequest};
use crate::domain::{
    ApiResult, LoginCredentials, LoginResponse, PasswordChange, RegistrationPayload,
    RegistrationResponse, UserProfile,
};

/// Typed access to `/auth/`.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<LoginResponse> {
        let request = ApiRequest::post(["auth", "login"]).json(&json!({
            "username": credentials.username(),
            "password": credentials.password(),
        }))?;
        self.client.send(request).await?.decode()
    }

    /// Create an account.
    ///
    /// An empty success body decodes to [`RegistrationResponse::default`].
    pub async fn register(&self, payload: &RegistrationPayload) -> ApiResult<RegistrationResponse> {
        let request = ApiRequest::post(["auth", "registration"]).json(&json!({
            "username": payload.username(),
            "email": payload.email(),
            "password1": payload.password1(),
            "password2": payload.password2(),
            "city": payload.city(),
        }))?;
        let response = self.client.send(request).await?;
        if response.body.is_empty() {
            return Ok(RegistrationResponse::default());
        }
        response.decode()
    }

    /// Revoke the current token on the server.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client
            .send(ApiRequest::post(["auth", "logout"]))
            .await?;
        Ok(())
    }

    /// Profile the backend associates with the current token.
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        self.client
            .send(ApiRequest::get(["auth", "user"]))
            .await?
            .decode()
    }

    /// Change the password of the signed-in user.
    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        let request = ApiRequest::post(["auth", "password", "change"]).json(&json!({
            "new_password1": change.new_password1(),
            "new_password2": change.new_password2(),
        }))?;
        self.client.send(request).await?;
        Ok(())
    }

    /// Request a password reset email.
    pub async fn reset_password(&self, email: &str) -> ApiResult<()> {
        let request =
            ApiRequest::post(["auth", "password", "reset"]).json(&json!({ "email": email.trim() }))?;
        self.client.send(request).await?;
        Ok(())
    }
}
