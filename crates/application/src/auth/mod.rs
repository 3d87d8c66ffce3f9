//! Client-side session handling.
//!
//! This module provides:
//! - The shared access token store with persistent mirroring
//! - The session manager for login, logout and session state

mod session;
mod token_store;

pub use session::Session;
pub use token_store::TokenStore;
