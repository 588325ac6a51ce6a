//! Event endpoints.

use pagination::Listing;
use serde::Deserialize;

use super::{ApiClient, ApiRequest};
use crate::domain::{
    ApiError, ApiResult, EventDetail, EventDraft, EventFilter, EventSummary, InteractionKind,
    InteractionToggle, MyEventsType,
};

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    status: InteractionToggle,
}

/// Typed access to `/events/`.
#[derive(Debug, Clone)]
pub struct EventsApi {
    client: ApiClient,
}

impl EventsApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search and filter published events.
    pub async fn list(&self, filter: &EventFilter) -> ApiResult<Listing<EventSummary>> {
        let request = ApiRequest::get(["events"]).query(filter.to_query());
        self.client.send(request).await?.decode()
    }

    /// Fetch one event by slug.
    pub async fn get(&self, slug: &str) -> ApiResult<EventDetail> {
        self.client
            .send(ApiRequest::get(["events", slug]))
            .await?
            .decode()
    }

    /// Create an event.
    pub async fn create(&self, draft: &EventDraft) -> ApiResult<EventDetail> {
        draft
            .validate()
            .map_err(|err| ApiError::dispatch(err.to_string()))?;
        let request = ApiRequest::post(["events"]).json(draft)?;
        self.client.send(request).await?.decode()
    }

    /// Replace an event.
    pub async fn update(&self, slug: &str, draft: &EventDraft) -> ApiResult<EventDetail> {
        draft
            .validate()
            .map_err(|err| ApiError::dispatch(err.to_string()))?;
        let request = ApiRequest::put(["events", slug]).json(draft)?;
        self.client.send(request).await?.decode()
    }

    /// Delete an event.
    pub async fn delete(&self, slug: &str) -> ApiResult<()> {
        self.client
            .send(ApiRequest::delete(["events", slug]))
            .await?;
        Ok(())
    }

    /// Toggle the "interested" mark of the signed-in user.
    pub async fn mark_interested(&self, slug: &str) -> ApiResult<InteractionToggle> {
        self.toggle(slug, InteractionKind::Interested).await
    }

    /// Toggle the "going" mark of the signed-in user.
    pub async fn mark_going(&self, slug: &str) -> ApiResult<InteractionToggle> {
        self.toggle(slug, InteractionKind::Going).await
    }

    /// Events the signed-in user marked.
    pub async fn my_events(&self, kind: MyEventsType) -> ApiResult<Listing<EventSummary>> {
        let request = ApiRequest::get(["events", "my_events"]).query([("type", kind.as_str())]);
        self.client.send(request).await?.decode()
    }

    /// Editorial picks.
    pub async fn featured(&self) -> ApiResult<Listing<EventSummary>> {
        self.client
            .send(ApiRequest::get(["events", "featured"]))
            .await?
            .decode()
    }

    async fn toggle(&self, slug: &str, kind: InteractionKind) -> ApiResult<InteractionToggle> {
        let action = match kind {
            InteractionKind::Interested => "mark_interested",
            InteractionKind::Going => "mark_going",
        };
        let response: ToggleResponse = self
            .client
            .send(ApiRequest::post(["events", slug, action]))
            .await?
            .decode()?;
        Ok(response.status)
    }
}
