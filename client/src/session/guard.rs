//! Navigation guard.
//!
//! The guard is a pure function of the target route and the signed-in user.
//! It is evaluated on every navigation and never cached, so a logout or a
//! 401 teardown takes effect on the very next navigation.

use crate::domain::{Route, RouteAccess, UserProfile};

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Open the requested route.
    Allow,
    /// Open this route instead.
    Redirect(Route),
}

impl GuardDecision {
    /// Route that ends up being opened for `requested`.
    pub fn destination(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::Redirect(route) => route,
        }
    }
}

/// Decide whether `route` may be opened.
///
/// Protected routes redirect to the login form without a user; guest-only
/// routes redirect home with one.
///
/// # Examples
/// ```
/// use events_client::domain::Route;
/// use events_client::session::{GuardDecision, guard};
///
/// assert_eq!(guard(&Route::Profile, None), GuardDecision::Redirect(Route::Login));
/// assert_eq!(guard(&Route::Home, None), GuardDecision::Allow);
/// ```
pub fn guard(route: &Route, user: Option<&UserProfile>) -> GuardDecision {
    match (route.access(), user) {
        (RouteAccess::Protected, None) => GuardDecision::Redirect(Route::Login),
        (RouteAccess::GuestOnly, Some(_)) => GuardDecision::Redirect(Route::Home),
        _ => GuardDecision::Allow,
    }
}

/// Resolve a location path to the route that is actually opened.
pub fn resolve(path: &str, user: Option<&UserProfile>) -> Route {
    let requested = Route::parse(path);
    guard(&requested, user).destination(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> UserProfile {
        serde_json::from_value(serde_json::json!({ "id": 1, "username": "ada" }))
            .expect("profile decodes")
    }

    #[rstest]
    #[case::home("/", Route::Home)]
    #[case::detail("/events/jazz", Route::EventDetail("jazz".into()))]
    #[case::profile("/profile", Route::Login)]
    #[case::my_events("/my-events", Route::Login)]
    #[case::login("/login", Route::Login)]
    #[case::register("/register", Route::Register)]
    #[case::unknown("/admin/secret", Route::Home)]
    fn anonymous_navigation(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(resolve(path, None), expected);
    }

    #[rstest]
    #[case::home("/", Route::Home)]
    #[case::profile("/profile", Route::Profile)]
    #[case::my_events("/my-events", Route::MyEvents)]
    #[case::login("/login", Route::Home)]
    #[case::register("/register", Route::Home)]
    fn signed_in_navigation(user: UserProfile, #[case] path: &str, #[case] expected: Route) {
        assert_eq!(resolve(path, Some(&user)), expected);
    }
}
