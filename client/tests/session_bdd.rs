//! Behaviour tests for the session lifecycle.
//!
//! These scenarios drive the public client API against scripted backend
//! responses and check what ends up in storage, in the session holder, and
//! in the navigator.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::sync::Arc;

use events_client::api::handle_api_error;
use events_client::domain::ports::{
    FixtureHttpTransport, FixtureNavigator, FixtureSessionStorage, HttpMethod,
    HttpTransportError,
};
use events_client::domain::{AuthToken, RegistrationPayload, Route, UserProfile};
use events_client::session::resolve;
use events_client::{ApiClient, AuthService, SessionStore};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tokio::runtime::{Builder, Runtime};
use url::Url;

struct SessionWorld {
    runtime: Runtime,
    storage: Arc<FixtureSessionStorage>,
    navigator: Arc<FixtureNavigator>,
    script: RefCell<Option<FixtureHttpTransport>>,
    client: RefCell<Option<ApiClient>>,
    last_error: RefCell<Option<String>>,
    last_route: RefCell<Option<Route>>,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            runtime: Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime should build"),
            storage: Arc::new(FixtureSessionStorage::default()),
            navigator: Arc::new(FixtureNavigator::default()),
            script: RefCell::new(Some(FixtureHttpTransport::default())),
            client: RefCell::new(None),
            last_error: RefCell::new(None),
            last_route: RefCell::new(None),
        }
    }

    fn script(&self, f: impl FnOnce(FixtureHttpTransport) -> FixtureHttpTransport) {
        let mut script = self.script.borrow_mut();
        let transport = script
            .take()
            .expect("backend must be scripted before the client is used");
        *script = Some(f(transport));
    }

    fn client(&self) -> ApiClient {
        if let Some(client) = self.client.borrow().as_ref() {
            return client.clone();
        }
        let transport = self
            .script
            .borrow_mut()
            .take()
            .expect("transport available");
        let client = ApiClient::new(
            Url::parse("http://localhost:8000/api/v1").expect("base url"),
            Arc::new(transport),
            SessionStore::hydrate(self.storage.clone()),
            self.navigator.clone(),
        );
        *self.client.borrow_mut() = Some(client.clone());
        client
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("the backend is unreachable for logout")]
fn the_backend_is_unreachable_for_logout(world: &SessionWorld) {
    world.script(|transport| {
        transport.fail(
            HttpMethod::Post,
            "/api/v1/auth/logout/",
            HttpTransportError::no_response("connection refused"),
        )
    });
}

#[given("the backend rejects the token on \"{path}\"")]
fn the_backend_rejects_the_token(world: &SessionWorld, path: String) {
    world.script(|transport| {
        transport.respond(
            HttpMethod::Get,
            &path,
            401,
            json!({ "detail": "Invalid token." }),
        )
    });
}

#[given("the backend accepts registrations")]
fn the_backend_accepts_registrations(world: &SessionWorld) {
    world.script(|transport| {
        transport.respond(
            HttpMethod::Post,
            "/api/v1/auth/registration/",
            201,
            json!({ "key": "issued-on-registration" }),
        )
    });
}

#[given("a signed-in user \"{username}\"")]
fn a_signed_in_user(world: &SessionWorld, username: String) {
    let user: UserProfile = serde_json::from_value(json!({ "id": 1, "username": username }))
        .expect("profile decodes");
    let token = AuthToken::new("abc123").expect("token");
    world
        .client()
        .session()
        .login(user, &token)
        .expect("login succeeds");
}

#[given("no one is signed in")]
fn no_one_is_signed_in(world: &SessionWorld) {
    assert!(!world.client().session().is_authenticated());
}

#[when("the user signs out")]
fn the_user_signs_out(world: &SessionWorld) {
    let service = AuthService::new(&world.client());
    world
        .runtime
        .block_on(service.logout())
        .expect("local logout succeeds");
}

#[when("the user loads their notifications")]
fn the_user_loads_their_notifications(world: &SessionWorld) {
    let client = world.client();
    let result = world.runtime.block_on(client.notifications().list());
    let err = result.expect_err("request should be rejected");
    *world.last_error.borrow_mut() = Some(handle_api_error(&err));
}

#[when("a visitor registers as \"{username}\"")]
fn a_visitor_registers(world: &SessionWorld, username: String) {
    let payload = RegistrationPayload::try_new(
        &username,
        &format!("{username}@example.com"),
        "password1",
        "password1",
        "Kazan",
    )
    .expect("valid registration");
    let service = AuthService::new(&world.client());
    world
        .runtime
        .block_on(service.register(&payload))
        .expect("registration succeeds");
}

#[when("the visitor opens \"{path}\"")]
fn the_visitor_opens(world: &SessionWorld, path: String) {
    let user = world.client().session().user();
    *world.last_route.borrow_mut() = Some(resolve(&path, user.as_ref()));
}

#[then("no session is stored")]
fn no_session_is_stored(world: &SessionWorld) {
    assert!(world.storage.is_empty());
}

#[then("the session is not authenticated")]
fn the_session_is_not_authenticated(world: &SessionWorld) {
    let client = world.client();
    assert!(!client.session().is_authenticated());
    assert!(!AuthService::new(&client).is_authenticated());
}

#[then("the user is sent to the login page")]
fn the_user_is_sent_to_the_login_page(world: &SessionWorld) {
    assert_eq!(world.navigator.last(), Some(Route::Login));
}

#[then("the error message is \"{message}\"")]
fn the_error_message_is(world: &SessionWorld, message: String) {
    assert_eq!(world.last_error.borrow().as_deref(), Some(message.as_str()));
}

#[then("the visitor lands on \"{path}\"")]
fn the_visitor_lands_on(world: &SessionWorld, path: String) {
    let route = world.last_route.borrow().clone().expect("a route was opened");
    assert_eq!(route.path(), path);
}

#[scenario(path = "tests/features/logout.feature")]
fn logout_scenario(world: SessionWorld) {
    drop(world);
}

#[scenario(path = "tests/features/unauthorized.feature")]
fn unauthorized_scenario(world: SessionWorld) {
    drop(world);
}

#[scenario(path = "tests/features/registration.feature")]
fn registration_scenario(world: SessionWorld) {
    drop(world);
}

#[scenario(path = "tests/features/route_guard.feature")]
fn route_guard_scenario(world: SessionWorld) {
    drop(world);
}
