//! Category endpoints.

use pagination::Listing;

use super::{ApiClient, ApiRequest};
use crate::domain::{ApiResult, Category};

/// Typed access to `/categories/`.
#[derive(Debug, Clone)]
pub struct CategoriesApi {
    client: ApiClient,
}

impl CategoriesApi {
    /// Wrap an adapter.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All categories.
    pub async fn list(&self) -> ApiResult<Listing<Category>> {
        self.client
            .send(ApiRequest::get(["categories"]))
            .await?
            .decode()
    }

    /// One category by slug.
    pub async fn get(&self, slug: &str) -> ApiResult<Category> {
        self.client
            .send(ApiRequest::get(["categories", slug]))
            .await?
            .decode()
    }
}
