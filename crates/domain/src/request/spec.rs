//! Outgoing request description, independent of the transport.

use serde::{Deserialize, Serialize};

use super::{AUTHORIZATION, Header, Headers, HttpMethod, RequestBody};
use crate::auth::AccessToken;

/// A request against the portal API.
///
/// `path` is relative to the configured API base URL (e.g. `news/list`).
/// The gateway owns the `Authorization` header: it is overwritten or removed
/// on every send, so callers never set it themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path relative to the API base URL
    pub path: String,
    /// Query string pairs, in order
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Headers::new(),
            body: RequestBody::None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Returns a copy carrying `token` as bearer credential, or none at all.
    #[must_use]
    pub fn authorized(&self, token: Option<&AccessToken>) -> Self {
        let mut request = self.clone();
        match token {
            Some(token) => request.headers.set(AUTHORIZATION, token.bearer_header()),
            None => request.headers.remove(AUTHORIZATION),
        }
        request
    }

    /// Returns the bearer header value, if attached.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION)
    }

    /// Path with the query string, used for logs and cache keys.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_authorized_attaches_and_removes_bearer() {
        let request = ApiRequest::get("news/list").with_header("Authorization", "Bearer stale");

        let with_token = request.authorized(Some(&AccessToken::new("t1")));
        assert_eq!(with_token.authorization(), Some("Bearer t1"));
        assert_eq!(with_token.headers.len(), 1);

        let without = request.authorized(None);
        assert_eq!(without.authorization(), None);
        // template is untouched
        assert_eq!(request.authorization(), Some("Bearer stale"));
    }

    #[test]
    fn test_path_and_query() {
        let request = ApiRequest::get("files/list").with_query("file_type", "minutes");
        assert_eq!(request.path_and_query(), "files/list?file_type=minutes");
        assert_eq!(ApiRequest::get("news/list").path_and_query(), "news/list");
    }
}
