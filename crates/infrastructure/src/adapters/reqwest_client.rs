//! HTTP transport built on reqwest.
//!
//! Resolves request paths against the API base URL and keeps a cookie jar
//! for the lifetime of the client, so the refresh cookie set by `auth/login`
//! travels with every later call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use portal_application::ports::{HttpClient, HttpClientError};
use portal_domain::{ApiRequest, ApiResponse, Header, Headers, HttpMethod, RequestBody};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use tracing::debug;

use super::multipart;

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("coop-portal/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Portal transport over `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a transport rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot serve as a base or the client
    /// cannot be built.
    pub fn new(base_url: &str, options: &TransportOptions) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .cookie_store(true)
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Self::normalize_base(base_url)?,
            timeout: options.timeout,
        })
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parses the base URL and makes sure relative paths extend it instead of
    /// replacing its last segment.
    fn normalize_base(base_url: &str) -> Result<Url, HttpClientError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {raw}")))?;
        if url.cannot_be_a_base() {
            return Err(HttpClientError::InvalidUrl(raw));
        }
        Ok(url)
    }

    fn resolve(&self, request: &ApiRequest) -> Result<Url, HttpClientError> {
        let path = request.path.trim_start_matches('/');
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {path}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Encodes a non-multipart body; the matching `Content-Type` is set by
    /// the caller. Multipart bodies go through [`multipart::form`].
    fn encode_body(body: &RequestBody) -> Result<Option<Vec<u8>>, HttpClientError> {
        match body {
            RequestBody::None | RequestBody::Multipart(_) => Ok(None),
            RequestBody::Json(value) => serde_json::to_vec(value)
                .map(Some)
                .map_err(|e| HttpClientError::InvalidBody(format!("invalid JSON: {e}"))),
            RequestBody::Form(fields) => serde_urlencoded::to_string(fields)
                .map(|encoded| Some(encoded.into_bytes()))
                .map_err(|e| HttpClientError::InvalidBody(format!("invalid form: {e}"))),
        }
    }

    fn map_error(error: &reqwest::Error, timeout: Duration) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        if error.is_builder() {
            return HttpClientError::InvalidUrl(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        let url = self.resolve(request)?;
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(content_type) = request.body.content_type()
            && !request.headers.contains(CONTENT_TYPE.as_str())
        {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let RequestBody::Multipart(fields) = &request.body {
            builder = builder.multipart(multipart::form(fields)?);
        } else if let Some(body) = Self::encode_body(&request.body)? {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                Header::new(name.as_str(), value.to_str().unwrap_or("<binary>"))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?
            .to_vec();
        let duration = start.elapsed();

        debug!(
            method = %request.method,
            path = %request.path_and_query(),
            status,
            elapsed_ms = duration.as_millis(),
            "request completed"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
            duration,
        })
    }
}
