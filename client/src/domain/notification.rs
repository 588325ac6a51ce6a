//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Reason a notification was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A new event matching the user's interests.
    NewEvent,
    /// An upcoming event the user marked.
    EventReminder,
    /// A marked event changed.
    EventUpdate,
    /// A marked event was cancelled.
    EventCancelled,
}

/// One notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    /// Backend identifier.
    pub id: u64,
    /// Related event, if any.
    #[serde(default)]
    pub event: Option<u64>,
    /// Kind of notification.
    pub notification_type: NotificationType,
    /// Headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// Whether the user has seen it.
    #[serde(default)]
    pub is_read: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the unread counter endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    /// Number of unread notifications.
    pub count: u64,
}
