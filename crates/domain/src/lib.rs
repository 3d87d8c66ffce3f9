//! Types shared by every layer of the cooperative portal client: requests
//! and responses, tokens and roles, and the portal's resources.
//!
//! Nothing here performs I/O.

pub mod api_error;
pub mod auth;
pub mod error;
pub mod request;
pub mod resources;
pub mod response;

pub use api_error::{ApiErrorBody, ErrorDetail, ValidationItem};
pub use auth::{AccessToken, AuthError, AuthState, Role, TokenClaims, jwt};
pub use error::{DomainError, DomainResult};
pub use request::{ApiRequest, Header, Headers, HttpMethod, MultipartField, RequestBody};
pub use resources::{
    FileDownload, FileMetadata, FileType, FileUpload, GalleryImage, Member, MemberFilter, NewsItem, Product, User,
};
pub use response::ApiResponse;
