//! Access token newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque compact bearer token (`header.payload.signature`).
///
/// The token is never validated on construction; use [`crate::jwt`] to
/// inspect it. `Debug` only prints a short preview so tokens do not end up
/// in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns the raw string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a preview of the token (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) if self.0.len() > 12 => format!("{}...", &self.0[..idx]),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

impl From<String> for AccessToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for AccessToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
