//! User profile data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often the backend sends event digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFrequency {
    /// One digest per day.
    Daily,
    /// One digest per week.
    #[default]
    Weekly,
    /// Notify as soon as something happens.
    Instant,
}

/// Profile of the signed-in user as returned by the backend.
///
/// Profiles are replaced wholesale whenever the backend returns a new one;
/// there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Home city used to pre-filter events.
    #[serde(default)]
    pub city: String,
    /// Free-text, comma-separated interests.
    #[serde(default)]
    pub interests: String,
    /// Avatar URL, if one was uploaded.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether digests are emailed.
    #[serde(default = "default_email_notifications")]
    pub email_notifications: bool,
    /// Whether push notifications are enabled.
    #[serde(default)]
    pub push_notifications: bool,
    /// Digest cadence.
    #[serde(default)]
    pub notification_frequency: NotificationFrequency,
    /// Registration timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_email_notifications() -> bool {
    true
}

impl UserProfile {
    /// Interests split on commas, trimmed, blanks dropped.
    ///
    /// # Examples
    /// ```
    /// use events_client::domain::UserProfile;
    ///
    /// let user: UserProfile = serde_json::from_value(serde_json::json!({
    ///     "id": 1, "username": "ada", "interests": "jazz, theatre,, open air "
    /// }))
    /// .unwrap();
    /// assert_eq!(user.interests_list(), vec!["jazz", "theatre", "open air"]);
    /// ```
    pub fn interests_list(&self) -> Vec<&str> {
        self.interests
            .split(',')
            .map(str::trim)
            .filter(|interest| !interest.is_empty())
            .collect()
    }
}

/// Partial profile update sent as JSON; absent fields are left untouched by
/// the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New home city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New comma-separated interests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    /// Email digest toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    /// Push notification toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    /// Digest cadence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_frequency: Option<NotificationFrequency>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Reasons an avatar upload is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarValidationError {
    /// The file has no content.
    EmptyFile,
    /// The file name is blank.
    EmptyFileName,
    /// The content type is not an image type.
    NotAnImage {
        /// Rejected content type.
        content_type: String,
    },
}

impl fmt::Display for AvatarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFile => write!(f, "avatar file is empty"),
            Self::EmptyFileName => write!(f, "avatar file name must not be empty"),
            Self::NotAnImage { content_type } => {
                write!(f, "avatar must be an image, got {content_type}")
            }
        }
    }
}

impl std::error::Error for AvatarValidationError {}

/// Avatar image uploaded as multipart form data.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Validate an avatar file.
    pub fn try_new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AvatarValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(AvatarValidationError::EmptyFileName);
        }
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(AvatarValidationError::NotAnImage { content_type });
        }
        if bytes.is_empty() {
            return Err(AvatarValidationError::EmptyFile);
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// File name reported to the server.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Image MIME type.
    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// Image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the upload and return its image bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
