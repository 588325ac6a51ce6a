//! Navigator that forwards routes over a channel.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::Route;
use crate::domain::ports::Navigator;

/// Navigator publishing every requested route to a receiver.
///
/// The view layer (or the CLI) drains the receiver and performs the actual
/// navigation. Routes requested after the receiver is dropped are logged
/// and discarded.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    /// Build a navigator and the receiver its routes arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        info!(path = %route.path(), "navigation requested");
        if self.sender.send(route).is_err() {
            debug!("navigation receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_arrive_in_order() {
        let (navigator, mut receiver) = ChannelNavigator::channel();
        navigator.navigate(Route::Login);
        navigator.navigate(Route::Home);

        assert_eq!(receiver.try_recv().ok(), Some(Route::Login));
        assert_eq!(receiver.try_recv().ok(), Some(Route::Home));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_tolerated() {
        let (navigator, receiver) = ChannelNavigator::channel();
        drop(receiver);
        navigator.navigate(Route::Login);
    }
}
