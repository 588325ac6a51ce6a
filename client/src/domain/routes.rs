//! Application routes and their access rules.
//!
//! Routes are the navigation targets of the view layer. The access rule of a
//! route decides how the session guard treats it; see
//! [`crate::session::guard`].

use std::fmt;

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Open to everyone.
    Public,
    /// Requires an authenticated session.
    Protected,
    /// Only meaningful without a session (login, registration).
    GuestOnly,
}

/// Navigation target inside the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Event listing with search and filters.
    Home,
    /// Detail page of one event, addressed by slug.
    EventDetail(String),
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Profile of the signed-in user.
    Profile,
    /// Events the signed-in user marked as interesting or attending.
    MyEvents,
}

impl Route {
    /// Resolve a location path to a route.
    ///
    /// Unknown paths resolve to [`Route::Home`], mirroring the catch-all
    /// redirect of the router.
    ///
    /// # Examples
    /// ```
    /// use events_client::domain::Route;
    ///
    /// assert_eq!(Route::parse("/profile"), Route::Profile);
    /// assert_eq!(Route::parse("/events/jazz-night"), Route::EventDetail("jazz-night".into()));
    /// assert_eq!(Route::parse("/nowhere"), Route::Home);
    /// ```
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        let mut segments = trimmed.split('/').filter(|segment| !segment.is_empty());
        match (segments.next(), segments.next(), segments.next()) {
            (Some("login"), None, _) => Self::Login,
            (Some("register"), None, _) => Self::Register,
            (Some("profile"), None, _) => Self::Profile,
            (Some("my-events"), None, _) => Self::MyEvents,
            (Some("events"), Some(slug), None) => Self::EventDetail(slug.to_owned()),
            _ => Self::Home,
        }
    }

    /// Location path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::EventDetail(slug) => format!("/events/{slug}"),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Profile => "/profile".to_owned(),
            Self::MyEvents => "/my-events".to_owned(),
        }
    }

    /// Access rule applied by the session guard.
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Home | Self::EventDetail(_) => RouteAccess::Public,
            Self::Profile | Self::MyEvents => RouteAccess::Protected,
            Self::Login | Self::Register => RouteAccess::GuestOnly,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", Route::Home)]
    #[case("", Route::Home)]
    #[case("/login", Route::Login)]
    #[case("/login/", Route::Login)]
    #[case("/register", Route::Register)]
    #[case("/profile", Route::Profile)]
    #[case("/my-events", Route::MyEvents)]
    #[case("/events/open-air-cinema", Route::EventDetail("open-air-cinema".into()))]
    #[case("/events", Route::Home)]
    #[case("/events/a/b", Route::Home)]
    #[case("/admin", Route::Home)]
    fn parses_paths(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[rstest]
    #[case(Route::Home)]
    #[case(Route::EventDetail("city-day".into()))]
    #[case(Route::Login)]
    #[case(Route::Register)]
    #[case(Route::Profile)]
    #[case(Route::MyEvents)]
    fn path_parses_back_to_route(#[case] route: Route) {
        assert_eq!(Route::parse(&route.path()), route);
    }
}
