//! Profile endpoints of the signed-in user.

use super::{ApiClient, ApiRequest};
use crate::domain::ports::{MultipartForm, MultipartPart};
use crate::domain::{ApiError, ApiResult, AvatarUpload, ProfileUpdate, UserProfile};

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "avatar";

/// Typed access to `/users/me/`.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Profile of the signed-in user.
    pub async fn me(&self) -> ApiResult<UserProfile> {
        self.client
            .send(ApiRequest::get(["users", "me"]))
            .await?
            .decode()
    }

    /// Apply a partial profile update.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        if update.is_empty() {
            return Err(ApiError::dispatch("profile update changes nothing"));
        }
        let request = ApiRequest::patch(["users", "me"]).json(update)?;
        self.client.send(request).await?.decode()
    }

    /// Upload a new avatar as `multipart/form-data`.
    pub async fn upload_avatar(&self, avatar: AvatarUpload) -> ApiResult<UserProfile> {
        let file_name = avatar.file_name().to_owned();
        let content_type = avatar.content_type().to_owned();
        let form = MultipartForm::default().part(MultipartPart {
            name: AVATAR_FIELD.to_owned(),
            file_name: Some(file_name),
            content_type: Some(content_type),
            bytes: avatar.into_bytes(),
        });
        let request = ApiRequest::patch(["users", "me"]).multipart(form);
        self.client.send(request).await?.decode()
    }
}
