//! Typed portal endpoints on top of the gateway.
//!
//! List endpoints are cached per role with a stale time that depends on how
//! often the resource changes; every successful mutation drops the cached
//! listings of its resource.

mod cache;
mod catalog;
mod files;
mod news;
mod people;

use std::sync::Arc;
use std::time::Duration;

use portal_domain::{ApiRequest, Role};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use cache::{QueryCache, QueryKey};
pub use catalog::{GalleryApi, ProductsApi};
pub use files::FilesApi;
pub use news::NewsApi;
pub use people::{MembersApi, UsersApi};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

/// Stale time for news listings.
pub const NEWS_STALE_AFTER: Duration = Duration::from_secs(10 * 60);
/// Stale time for document, gallery and member listings.
pub const SLOW_STALE_AFTER: Duration = Duration::from_secs(60 * 60);
/// Stale time for everything else.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

const CACHE_CAPACITY: u64 = 256;

/// Entry point to the typed endpoints.
#[derive(Debug, Clone)]
pub struct PortalApi {
    gateway: Arc<Gateway>,
    cache: QueryCache,
}

impl PortalApi {
    /// Creates the API over `gateway` with an empty cache.
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            cache: QueryCache::new(CACHE_CAPACITY),
        }
    }

    /// Underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// News articles.
    #[must_use]
    pub const fn news(&self) -> NewsApi<'_> {
        NewsApi::new(self)
    }

    /// Document repository.
    #[must_use]
    pub const fn files(&self) -> FilesApi<'_> {
        FilesApi::new(self)
    }

    /// Product catalog.
    #[must_use]
    pub const fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Image gallery.
    #[must_use]
    pub const fn gallery(&self) -> GalleryApi<'_> {
        GalleryApi::new(self)
    }

    /// Cooperative members.
    #[must_use]
    pub const fn members(&self) -> MembersApi<'_> {
        MembersApi::new(self)
    }

    /// Portal user accounts.
    #[must_use]
    pub const fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Drops every cached listing, e.g. after the session changed.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// GETs a list endpoint, serving it from the cache while fresh.
    async fn cached_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        stale_after: Duration,
    ) -> GatewayResult<Vec<T>> {
        let key = QueryKey::new(self.current_role().await, request.path_and_query());

        if let Some(value) = self.cache.get(&key).await {
            return decode(&request, value);
        }

        let value: Value = self.gateway.send_json(&request).await?;
        let items = decode(&request, value.clone())?;
        self.cache.insert(key, value, stale_after).await;
        Ok(items)
    }

    /// Sends a mutation and invalidates the cached listings under `resource`.
    async fn mutate(&self, request: ApiRequest, resource: &str) -> GatewayResult<()> {
        self.gateway.send(&request).await?;
        self.cache.invalidate_prefix(resource).await;
        Ok(())
    }

    async fn current_role(&self) -> Option<Role> {
        let token = self.gateway.tokens().get().await?;
        Role::from_token(token.as_str())
    }
}

fn decode<T: DeserializeOwned>(request: &ApiRequest, value: Value) -> GatewayResult<Vec<T>> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(format!("{}: {e}", request.path)))
}
