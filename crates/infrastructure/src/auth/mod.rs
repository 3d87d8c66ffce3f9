//! Auth server adapter.

mod http_auth_server;

pub use http_auth_server::HttpAuthServer;
