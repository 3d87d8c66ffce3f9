//! Traits the session and gateway depend on.
//!
//! Transport, auth endpoints, token persistence and time are all injected
//! through these, so the core runs unchanged against real adapters or the
//! scripted fakes used in tests.

mod auth_server;
mod clock;
mod file_system;
mod http_client;
mod token_storage;

pub use auth_server::{AuthServer, Credentials};
pub use clock::Clock;
pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{HttpClient, HttpClientError};
pub use token_storage::{TokenStorage, TokenStorageError};
