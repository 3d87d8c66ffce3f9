//! Offline inspection of compact JWT access tokens.
//!
//! These helpers only look at the payload segment. Signatures are never
//! checked, so nothing decoded here is trusted for security decisions:
//! expiry drives the refresh policy and the role claim is a UI hint.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AccessToken;

/// Claims carried in the payload segment of an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch. The auth server may emit a
    /// fractional value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
    /// Role name assigned by the auth server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Subject (user id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Token kind, e.g. `access` or `refresh`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Unique token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Any other claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Returns true if `now_secs` is at or past the `exp` claim.
    ///
    /// A missing `exp` counts as expired.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // epoch seconds stay well below 2^53
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp.is_none_or(|exp| now_secs as f64 >= exp)
    }

    /// Expiry as a timestamp, if present and representable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.exp.filter(|exp| exp.is_finite())?;
        let secs = exp.floor();
        if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        let nanos = ((exp - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }
}

/// Decodes the payload segment of a compact token.
///
/// Returns `None` if the token does not have exactly three segments, the
/// payload is not valid base64url, or it does not hold a JSON object.
#[must_use]
pub fn decode(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<TokenClaims>(&bytes).ok()
}

/// Returns true if the token is expired at `now_secs`.
///
/// Fails closed: undecodable tokens and tokens without `exp` are expired, so
/// callers refresh instead of sending a dead token.
#[must_use]
pub fn is_expired_at(token: &str, now_secs: i64) -> bool {
    decode(token).is_none_or(|claims| claims.is_expired_at(now_secs))
}

/// Returns true if the token is expired at `now`.
#[must_use]
pub fn is_expired(token: &AccessToken, now: DateTime<Utc>) -> bool {
    is_expired_at(token.as_str(), now.timestamp())
}

/// Returns the `role` claim, if the token decodes and carries one.
///
/// This is a display and navigation hint only. The server enforces access
/// to every resource; never use this value to grant anything.
#[must_use]
pub fn role(token: &str) -> Option<String> {
    decode(token).and_then(|claims| claims.role)
}
