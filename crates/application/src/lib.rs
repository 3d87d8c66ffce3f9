//! Portal Application - Session, gateway and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for transport, auth server, storage, clock)
//! - The token store and session manager
//! - The authenticated request gateway with single-flight token refresh
//! - Typed resource endpoints with a list-query cache

pub mod api;
pub mod auth;
pub mod error;
pub mod gateway;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{
    FilesApi, GalleryApi, MembersApi, NewsApi, PortalApi, ProductsApi, QueryCache, QueryKey, UsersApi,
};
pub use auth::{Session, TokenStore};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{DEFAULT_REFRESH_TIMEOUT, Gateway, GatewayConfig, RefreshCoordinator, RetryContext};
pub use ports::{
    AuthServer, Clock, Credentials, FileSystem, FileSystemError, HttpClient, HttpClientError,
    TokenStorage, TokenStorageError,
};
