//! Driven port for moving the application to another route.

use std::sync::{Mutex, PoisonError};

use crate::domain::Route;

/// Port through which the session layer forces navigation.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Replace the current location with `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that records every requested route.
#[derive(Debug, Default)]
pub struct FixtureNavigator {
    visits: Mutex<Vec<Route>>,
}

impl FixtureNavigator {
    /// Routes requested so far, oldest first.
    pub fn visits(&self) -> Vec<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently requested route.
    pub fn last(&self) -> Option<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for FixtureNavigator {
    fn navigate(&self, route: Route) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
