//! Per-view cancellation of in-flight requests.
//!
//! A view owns a [`ViewScope`] for as long as it is mounted and runs its
//! requests through it. Once the scope is cancelled, explicitly or by being
//! dropped, pending futures are dropped and their results never reach the
//! view.

use std::future::Future;

use tokio::sync::watch;

/// Cancellation signal owned by one view.
///
/// # Examples
/// ```
/// use events_client::session::ViewScope;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let scope = ViewScope::new();
/// assert_eq!(scope.run(async { 7 }).await, Some(7));
/// scope.cancel();
/// assert_eq!(scope.run(async { 7 }).await, None);
/// # });
/// ```
#[derive(Debug)]
pub struct ViewScope {
    cancelled: watch::Sender<bool>,
}

impl ViewScope {
    /// Open a live scope.
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self { cancelled }
    }

    /// Handle for tasks spawned on behalf of the view.
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            cancelled: self.cancelled.subscribe(),
        }
    }

    /// Cancel every pending and future run.
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    /// Whether the scope was cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Run `future` unless the scope is cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        self.token().run(future).await
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancelled.send_replace(true);
    }
}

/// Cloneable observer of a [`ViewScope`].
#[derive(Debug, Clone)]
pub struct ScopeToken {
    cancelled: watch::Receiver<bool>,
}

impl ScopeToken {
    /// Whether the owning scope was cancelled or dropped.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Run `future` unless the owning scope is cancelled first.
    ///
    /// Returns `None` when cancellation wins; the future is dropped.
    pub async fn run<F: Future>(mut self, future: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancelled.wait_for(|cancelled| *cancelled) => None,
            output = future => Some(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completes_while_live() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { "events" }).await, Some("events"));
    }

    #[tokio::test]
    async fn cancellation_discards_late_completion() {
        let scope = ViewScope::new();
        let token = scope.token();
        let pending = tokio::spawn(token.run(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }));

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(scope);

        assert_eq!(pending.await.expect("task joins"), None);
    }

    #[tokio::test]
    async fn tokens_observe_cancellation() {
        let scope = ViewScope::new();
        let token = scope.token();
        assert!(!token.is_cancelled());
        scope.cancel();
        assert!(scope.is_cancelled());
        assert!(token.is_cancelled());
        assert_eq!(token.run(async { 1 }).await, None);
    }
}
