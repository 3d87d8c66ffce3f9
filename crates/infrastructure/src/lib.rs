//! Portal Infrastructure - Adapters and wiring
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: the reqwest transport with multipart uploads, the HTTP
//! auth server, token storage on disk or in memory, the system clock, and
//! configuration loading.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod persistence;
pub mod portal;

pub use adapters::{ReqwestHttpClient, SystemClock, TransportOptions, attach_file};
pub use auth::HttpAuthServer;
pub use config::{ConfigError, PortalConfig, default_token_path};
pub use persistence::{FileTokenStorage, InMemoryTokenStorage, TokioFileSystem};
pub use portal::{Portal, PortalError};
