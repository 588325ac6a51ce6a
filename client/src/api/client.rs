//! HTTP client adapter shared by every resource client.
//!
//! [`ApiClient`] is the single dispatch point for backend calls. It resolves
//! relative requests against the configured base URL, attaches the persisted
//! token, and intercepts responses: any 401 tears the session down and sends
//! the application to the login form before the error reaches the caller.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};
use url::Url;
use uuid::Uuid;

use super::request::{ApiRequest, ApiResponse, parse_json_body};
use super::{AuthApi, CategoriesApi, EventsApi, NotificationsApi, ReviewsApi, UsersApi};
use crate::domain::ports::{HttpRequest, HttpTransport, Navigator, RequestBody};
use crate::domain::{ApiError, ApiResult, Route};
use crate::session::SessionStore;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const UNAUTHORIZED: u16 = 401;

struct ClientInner {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

/// Cloneable handle to the API adapter.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Build an adapter over `transport`.
    ///
    /// `session` is both the token source and the holder cleared on 401;
    /// `navigator` receives the redirect to the login form.
    pub fn new(
        base_url: Url,
        transport: Arc<dyn HttpTransport>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url,
                transport,
                session,
                navigator,
            }),
        }
    }

    /// Base URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Session the adapter reads tokens from and invalidates on 401.
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Event endpoints.
    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.clone())
    }

    /// Category endpoints.
    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.clone())
    }

    /// Review endpoints.
    pub fn reviews(&self) -> ReviewsApi {
        ReviewsApi::new(self.clone())
    }

    /// Notification endpoints.
    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Profile endpoints.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Dispatch `request` and intercept the response.
    ///
    /// Returns the response for 2xx statuses and
    /// [`ApiError::Response`] for every other status. A 401 additionally
    /// invalidates the session and navigates to [`Route::Login`].
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "api_request",
            %request_id,
            method = request.method().as_str(),
            path = %request.path(),
        );
        self.dispatch(request, request_id).instrument(span).await
    }

    async fn dispatch(&self, request: ApiRequest, request_id: Uuid) -> ApiResult<ApiResponse> {
        let http = self.prepare(request, request_id)?;
        let response = self.inner.transport.send(http).await.map_err(|err| {
            warn!(error = %err, "request failed without a response");
            ApiError::from(err)
        })?;

        let status = response.status;
        if status == UNAUTHORIZED {
            warn!("credentials rejected, ending session");
            self.inner.session.invalidate();
            self.inner.navigator.navigate(Route::Login);
            return Err(ApiError::response(status, parse_json_body(&response.body)));
        }
        if !(200..300).contains(&status) {
            debug!(status, "request rejected by server");
            return Err(ApiError::response(status, parse_json_body(&response.body)));
        }

        debug!(status, "request succeeded");
        Ok(ApiResponse {
            status,
            body: response.body,
        })
    }

    fn prepare(&self, request: ApiRequest, request_id: Uuid) -> ApiResult<HttpRequest> {
        let url = self.resolve(&request)?;
        let mut headers = vec![
            ("Accept".to_owned(), "application/json".to_owned()),
            (REQUEST_ID_HEADER.to_owned(), request_id.to_string()),
        ];
        if matches!(request.body(), RequestBody::Json(_)) {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }

        let token = self
            .inner
            .session
            .persisted_token()
            .map_err(|err| ApiError::dispatch(err.to_string()))?;
        if let Some(token) = token {
            debug!(token = %token.fingerprint(), "attaching credentials");
            headers.push(("Authorization".to_owned(), token.authorization_value()));
        }

        Ok(HttpRequest {
            method: request.method(),
            url,
            headers,
            body: request.into_body(),
        })
    }

    fn resolve(&self, request: &ApiRequest) -> ApiResult<Url> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::dispatch("base URL cannot carry a path"))?;
            path.pop_if_empty();
            path.extend(request.segments());
            path.push("");
        }
        url.set_query(None);
        if !request.query_pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query_pairs());
        }
        Ok(url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
