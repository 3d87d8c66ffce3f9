//! In-memory doubles for the ports, shared by the unit tests.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use portal_domain::{AccessToken, ApiRequest, ApiResponse, AuthError};

use crate::auth::TokenStore;
use crate::gateway::{Gateway, GatewayConfig};
use crate::ports::{
    AuthServer, Clock, Credentials, HttpClient, HttpClientError, TokenStorage, TokenStorageError,
};

/// Fixed "now" used by every test clock.
pub const NOW: i64 = 1_700_000_000;

static MINTED: AtomicUsize = AtomicUsize::new(0);

/// Builds an unsigned compact token with the given claims. Every call yields
/// a distinct token.
pub fn mint_token(exp: i64, role: Option<&str>) -> AccessToken {
    let serial = MINTED.fetch_add(1, Ordering::Relaxed);
    let mut claims = serde_json::json!({ "exp": exp, "sub": "user-1", "jti": serial.to_string() });
    if let Some(role) = role {
        claims["role"] = serde_json::Value::String(role.to_string());
    }
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    AccessToken::new(format!("{header}.{payload}.sig"))
}

/// Token valid for an hour after [`NOW`].
pub fn fresh_token() -> AccessToken {
    mint_token(NOW + 3600, Some("regular"))
}

/// Token that expired ten seconds before [`NOW`].
pub fn expired_token() -> AccessToken {
    mint_token(NOW - 10, Some("regular"))
}

/// Clock pinned to [`NOW`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }
}

/// Token storage kept in memory, with failure injection.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
    loads: AtomicUsize,
    failing: bool,
    writes_fail: bool,
}

impl MemoryStorage {
    pub fn with_token(raw: &str) -> Self {
        Self {
            value: Mutex::new(Some(raw.to_string())),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Loads work, saves and removes fail.
    pub fn read_only() -> Self {
        Self {
            writes_fail: true,
            ..Self::default()
        }
    }

    /// Puts `raw` on "disk" without going through the trait.
    pub fn put(&self, raw: &str) {
        *self.value.lock() = Some(raw.to_string());
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().clone()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), TokenStorageError> {
        if self.failing {
            return Err(TokenStorageError::Unavailable("disk full".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), TokenStorageError> {
        if self.writes_fail {
            return Err(TokenStorageError::Unavailable("read-only file system".to_string()));
        }
        self.check()
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<String>, TokenStorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.value())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStorageError> {
        self.check_write()?;
        *self.value.lock() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenStorageError> {
        self.check_write()?;
        *self.value.lock() = None;
        Ok(())
    }
}

/// Auth server double that counts calls.
pub struct MockAuthServer {
    login: Mutex<Result<AccessToken, AuthError>>,
    refresh: Mutex<Result<AccessToken, AuthError>>,
    logout: Mutex<Result<(), AuthError>>,
    refresh_delay: Duration,
    refresh_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl MockAuthServer {
    pub fn new() -> Self {
        let rejected = AuthError::Rejected {
            status: 401,
            message: "Missing refresh token".to_string(),
        };
        Self {
            login: Mutex::new(Err(rejected.clone())),
            refresh: Mutex::new(Err(rejected)),
            logout: Mutex::new(Ok(())),
            refresh_delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_login(self, result: Result<AccessToken, AuthError>) -> Self {
        *self.login.lock() = result;
        self
    }

    pub fn with_refresh(self, result: Result<AccessToken, AuthError>) -> Self {
        *self.refresh.lock() = result;
        self
    }

    pub fn with_logout(self, result: Result<(), AuthError>) -> Self {
        *self.logout.lock() = result;
        self
    }

    /// Keeps every refresh call in flight for `delay`.
    pub const fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthServer for MockAuthServer {
    async fn login(&self, _credentials: &Credentials) -> Result<AccessToken, AuthError> {
        self.login.lock().clone()
    }

    async fn refresh(&self) -> Result<AccessToken, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        self.refresh.lock().clone()
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout.lock().clone()
    }
}

type Responder = dyn Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync;

/// Transport double answering through a closure and recording every request.
pub struct ScriptedHttpClient {
    respond: Box<Responder>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(
        respond: impl Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answers 200 to requests bearing `token`, 401 to everything else.
    pub fn accepting(token: &AccessToken) -> Self {
        let expected = token.bearer_header();
        Self::new(move |request| {
            if request.authorization() == Some(expected.as_str()) {
                Ok(ApiResponse::new(200, r#"{"ok":true}"#))
            } else {
                Ok(ApiResponse::new(401, r#"{"detail":"Could not validate credentials"}"#))
            }
        })
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }

    /// Authorization headers of the sent requests, in order.
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.sent
            .lock()
            .iter()
            .map(|r| r.authorization().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        self.sent.lock().push(request.clone());
        (self.respond)(request)
    }
}

/// Everything a gateway test needs to inspect.
pub struct Harness {
    pub gateway: Arc<Gateway>,
    pub http: Arc<ScriptedHttpClient>,
    pub auth: Arc<MockAuthServer>,
    pub tokens: Arc<TokenStore>,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    pub async fn new(
        http: ScriptedHttpClient,
        auth: MockAuthServer,
        initial: Option<AccessToken>,
    ) -> Self {
        let http = Arc::new(http);
        let auth = Arc::new(auth);
        let storage = Arc::new(MemoryStorage::default());
        let tokens = Arc::new(TokenStore::new(storage.clone()));
        tokens.set(initial).await;

        let gateway = Arc::new(Gateway::new(
            http.clone(),
            auth.clone(),
            tokens.clone(),
            Arc::new(FixedClock),
            GatewayConfig::default(),
        ));

        Self {
            gateway,
            http,
            auth,
            tokens,
            storage,
        }
    }
}
