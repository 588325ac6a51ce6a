//! Review endpoints.

use pagination::Listing;

use super::{ApiClient, ApiRequest};
use crate::domain::{ApiResult, NewReview, Review};

/// Typed access to `/reviews/`.
#[derive(Debug, Clone)]
pub struct ReviewsApi {
    client: ApiClient,
}

impl ReviewsApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Approved reviews of one event.
    pub async fn list_for_event(&self, event_id: u64) -> ApiResult<Listing<Review>> {
        let request = ApiRequest::get(["reviews"]).query([("event", event_id.to_string())]);
        self.client.send(request).await?.decode()
    }

    /// Submit a review; it starts out pending moderation.
    pub async fn create(&self, review: &NewReview) -> ApiResult<Review> {
        let request = ApiRequest::post(["reviews"]).json(review)?;
        self.client.send(request).await?.decode()
    }

    /// Replace one of the signed-in user's reviews.
    pub async fn update(&self, id: u64, review: &NewReview) -> ApiResult<Review> {
        let request = ApiRequest::put(["reviews".to_owned(), id.to_string()]).json(review)?;
        self.client.send(request).await?.decode()
    }

    /// Delete one of the signed-in user's reviews.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client
            .send(ApiRequest::delete(["reviews".to_owned(), id.to_string()]))
            .await?;
        Ok(())
    }
}
