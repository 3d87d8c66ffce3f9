//! Product catalog and gallery endpoints.

use portal_domain::{ApiRequest, GalleryImage, MultipartField, Product, RequestBody};

use super::{DEFAULT_STALE_AFTER, PortalApi, SLOW_STALE_AFTER};
use crate::error::GatewayResult;

/// `products/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ProductsApi<'a> {
    api: &'a PortalApi,
}

impl<'a> ProductsApi<'a> {
    const RESOURCE: &'static str = "products/";

    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    pub async fn list(&self) -> GatewayResult<Vec<Product>> {
        self.api
            .cached_list(ApiRequest::get("products/list"), DEFAULT_STALE_AFTER)
            .await
    }

    /// Adds a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, product: &Product) -> GatewayResult<()> {
        let request = ApiRequest::post("products/create").with_body(RequestBody::json(product)?);
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Replaces the product `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: &str, product: &Product) -> GatewayResult<()> {
        let request = ApiRequest::put(format!("products/update/{id}"))
            .with_body(RequestBody::json(product)?);
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Removes the product `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.api
            .mutate(ApiRequest::delete(format!("products/delete/{id}")), Self::RESOURCE)
            .await
    }
}

/// `gallery/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct GalleryApi<'a> {
    api: &'a PortalApi,
}

impl<'a> GalleryApi<'a> {
    const RESOURCE: &'static str = "gallery/";

    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists gallery images with their download URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an image list.
    pub async fn list(&self) -> GatewayResult<Vec<GalleryImage>> {
        self.api
            .cached_list(ApiRequest::get("gallery/list"), SLOW_STALE_AFTER)
            .await
    }

    /// Uploads `image`, optionally under a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn upload(&self, image: MultipartField, image_name: Option<&str>) -> GatewayResult<()> {
        let mut fields = vec![image.renamed("file")];
        if let Some(name) = image_name.map(str::trim).filter(|name| !name.is_empty()) {
            fields.push(MultipartField::text("image_name", name));
        }
        let request = ApiRequest::post("gallery/create").with_body(RequestBody::Multipart(fields));
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Removes the image `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.api
            .mutate(ApiRequest::delete(format!("gallery/delete/{id}")), Self::RESOURCE)
            .await
    }
}
