//! What came back from the portal API.

use std::borrow::Cow;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api_error::ApiErrorBody;
use crate::request::Headers;

/// Status, headers and raw body of one exchange, plus how long it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// Headers as received.
    pub headers: Headers,
    /// Raw body: JSON for most endpoints, file contents for downloads.
    pub body: Vec<u8>,
    /// Round-trip time, serialized as whole milliseconds.
    #[serde(rename = "duration_ms", with = "millis")]
    pub duration: Duration,
}

impl ApiResponse {
    /// Response with `status` and `body`, no headers, zero duration.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// First value of header `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// The server refused the credential; triggers a refresh-and-retry.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decodes the body into `T`. A blank body is read as `null`, which
    /// `()` and `Option<_>` accept.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the body does not fit `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let bytes = match self.body.trim_ascii() {
            b"" => b"null".as_slice(),
            bytes => bytes,
        };
        serde_json::from_slice(bytes)
    }

    /// The `{"detail": ...}` payload of an error response, when present.
    #[must_use]
    pub fn error_body(&self) -> Option<ApiErrorBody> {
        self.json().ok().flatten()
    }
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self::new(0, "")
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, out: S) -> Result<S::Ok, S::Error> {
        out.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(input: D) -> Result<Duration, D::Error> {
        u64::deserialize(input).map(Duration::from_millis)
    }
}
