//! Document repository endpoints.

use portal_domain::{ApiRequest, FileDownload, FileMetadata, FileType, FileUpload, RequestBody};
use tracing::warn;

use super::{PortalApi, SLOW_STALE_AFTER};
use crate::error::GatewayResult;

const RESOURCE: &str = "files/";

/// `files/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct FilesApi<'a> {
    api: &'a PortalApi,
}

impl<'a> FilesApi<'a> {
    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists the documents of one repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the server answers 403 for
    /// repositories the caller's role may not read.
    pub async fn list(&self, file_type: FileType) -> GatewayResult<Vec<FileMetadata>> {
        let request = ApiRequest::get("files/list").with_query("file_type", file_type.as_str());
        self.api.cached_list(request, SLOW_STALE_AFTER).await
    }

    /// Metadata of one repository as returned by `files/get_files`, the
    /// listing the upload dialog refreshes from.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a file list.
    pub async fn metadata(&self, file_type: FileType) -> GatewayResult<Vec<FileMetadata>> {
        let request =
            ApiRequest::get("files/get_files").with_query("file_type", file_type.as_str());
        self.api.cached_list(request, SLOW_STALE_AFTER).await
    }

    /// Lists every repository the caller can read.
    ///
    /// Repositories that fail to load are logged and left out.
    pub async fn list_all(&self) -> Vec<FileMetadata> {
        let mut files = Vec::new();
        for file_type in FileType::ALL {
            match self.list(file_type).await {
                Ok(batch) => files.extend(batch),
                Err(error) => warn!(%file_type, %error, "skipping document repository"),
            }
        }
        files
    }

    /// Uploads a document as a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`](crate::GatewayError::InvalidRequest)
    /// if the form is incomplete, otherwise any request error.
    pub async fn upload(&self, upload: FileUpload) -> GatewayResult<()> {
        let request =
            ApiRequest::post("files/create").with_body(RequestBody::Multipart(upload.into_fields()?));
        self.api.mutate(request, RESOURCE).await
    }

    /// Downloads the contents of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn download(&self, file: &FileMetadata) -> GatewayResult<FileDownload> {
        let request = ApiRequest::post("files/download").with_body(RequestBody::json(file)?);
        let response = self.api.gateway().send(&request).await?;
        Ok(FileDownload::from_response(file, response))
    }

    /// Deletes the document `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.api
            .mutate(ApiRequest::delete(format!("files/delete/{id}")), RESOURCE)
            .await
    }
}
