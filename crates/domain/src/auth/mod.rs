//! Authentication types: access tokens, claims, roles and session state.

mod error;
pub mod jwt;
mod role;
mod state;
mod token;

pub use error::AuthError;
pub use jwt::TokenClaims;
pub use role::Role;
pub use state::AuthState;
pub use token::AccessToken;
