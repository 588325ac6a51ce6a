//! Notification endpoints. Every call requires a session.

use pagination::Listing;
use serde_json::json;

use super::{ApiClient, ApiRequest};
use crate::domain::{ApiResult, Notification, UnreadCount};

/// Typed access to `/notifications/`.
#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Notifications of the signed-in user, newest first.
    pub async fn list(&self) -> ApiResult<Listing<Notification>> {
        self.client
            .send(ApiRequest::get(["notifications"]))
            .await?
            .decode()
    }

    /// Mark one notification as read.
    pub async fn mark_as_read(&self, id: u64) -> ApiResult<Notification> {
        let request = ApiRequest::patch(["notifications".to_owned(), id.to_string()])
            .json(&json!({ "is_read": true }))?;
        self.client.send(request).await?.decode()
    }

    /// Mark every notification as read.
    pub async fn mark_all_read(&self) -> ApiResult<()> {
        self.client
            .send(ApiRequest::post(["notifications", "mark_all_read"]))
            .await?;
        Ok(())
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self) -> ApiResult<UnreadCount> {
        self.client
            .send(ApiRequest::get(["notifications", "unread_count"]))
            .await?
            .decode()
    }
}
