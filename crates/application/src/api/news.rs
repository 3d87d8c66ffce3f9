//! News endpoints.

use portal_domain::{ApiRequest, NewsItem, RequestBody};

use super::{NEWS_STALE_AFTER, PortalApi};
use crate::error::GatewayResult;

const RESOURCE: &str = "news/";

/// `news/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct NewsApi<'a> {
    api: &'a PortalApi,
}

impl<'a> NewsApi<'a> {
    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists the news visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a news list.
    pub async fn list(&self) -> GatewayResult<Vec<NewsItem>> {
        self.api
            .cached_list(ApiRequest::get("news/list"), NEWS_STALE_AFTER)
            .await
    }

    /// Publishes an article.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, item: &NewsItem) -> GatewayResult<()> {
        let request = ApiRequest::post("news/create").with_body(RequestBody::json(item)?);
        self.api.mutate(request, RESOURCE).await
    }

    /// Replaces the article `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: &str, item: &NewsItem) -> GatewayResult<()> {
        let request =
            ApiRequest::put(format!("news/update/{id}")).with_body(RequestBody::json(item)?);
        self.api.mutate(request, RESOURCE).await
    }

    /// Deletes the article `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.api
            .mutate(ApiRequest::delete(format!("news/delete/{id}")), RESOURCE)
            .await
    }
}
