//! End-to-end session tests: real token file, real auth server adapter and
//! gateway, with an in-process fake of the portal backend as transport.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use portal_application::ports::{HttpClient, HttpClientError};
use portal_application::{Credentials, GatewayConfig};
use portal_domain::{
    AccessToken, ApiRequest, ApiResponse, AuthState, FileType, FileUpload, MultipartField, RequestBody, Role,
};
use portal_infrastructure::{
    FileTokenStorage, InMemoryTokenStorage, Portal, SystemClock, TokioFileSystem, attach_file,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn mint(exp_offset_secs: i64, role: &str) -> String {
    static SERIAL: AtomicUsize = AtomicUsize::new(0);
    let claims = serde_json::json!({
        "sub": "ana@example.org",
        "role": role,
        "exp": chrono::Utc::now().timestamp() + exp_offset_secs,
        "jti": SERIAL.fetch_add(1, Ordering::Relaxed).to_string(),
    });
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// In-process stand-in for the portal backend.
#[derive(Default)]
struct FakeBackend {
    accepted: Mutex<Option<String>>,
    refresh_allowed: AtomicBool,
    refresh_delay: Mutex<Duration>,
    reachable: AtomicBool,
    refreshes: AtomicUsize,
    calls: Mutex<Vec<(String, Option<String>)>>,
    uploads: Mutex<Vec<MultipartField>>,
}

impl FakeBackend {
    fn new() -> Arc<Self> {
        let backend = Self::default();
        backend.refresh_allowed.store(true, Ordering::SeqCst);
        backend.reachable.store(true, Ordering::SeqCst);
        Arc::new(backend)
    }

    fn issue(&self) -> ApiResponse {
        let token = mint(3600, "board");
        *self.accepted.lock().unwrap() = Some(token.clone());
        ApiResponse::new(
            200,
            serde_json::json!({ "access_token": token, "token_type": "bearer" }).to_string(),
        )
    }

    fn paths(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.path_and_query(), request.authorization().map(str::to_string)));

        if !self.reachable.load(Ordering::SeqCst) {
            return Err(HttpClientError::ConnectionFailed("connection refused".to_string()));
        }

        match request.path.as_str() {
            "auth/login" => {
                let RequestBody::Form(fields) = &request.body else {
                    return Ok(ApiResponse::new(422, r#"{"detail":[{"msg":"field required"}]}"#));
                };
                if fields.contains(&("password".to_string(), "secret".to_string())) {
                    Ok(self.issue())
                } else {
                    Ok(ApiResponse::new(401, r#"{"detail":"Incorrect username or password"}"#))
                }
            }
            "auth/refresh" => {
                self.refreshes.fetch_add(1, Ordering::SeqCst);
                let delay = *self.refresh_delay.lock().unwrap();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                if self.refresh_allowed.load(Ordering::SeqCst) {
                    Ok(self.issue())
                } else {
                    Ok(ApiResponse::new(401, r#"{"detail":"Invalid refresh token"}"#))
                }
            }
            "auth/logout" => Ok(ApiResponse::new(200, "{}")),
            _ => {
                let accepted = self.accepted.lock().unwrap().clone();
                let expected = accepted.map(|t| format!("Bearer {t}"));
                if expected.is_some() && request.authorization() == expected.as_deref() {
                    if let RequestBody::Multipart(fields) = &request.body {
                        self.uploads.lock().unwrap().extend(fields.iter().cloned());
                    }
                    let body = if request.path.starts_with("files/") {
                        r#"[{"id":"f1","file_name":"Bylaws","file_type":"forms"}]"#
                    } else {
                        r#"[{"id":"n1","title":"General assembly","content":"Friday 18:00"}]"#
                    };
                    Ok(ApiResponse::new(200, body))
                } else {
                    Ok(ApiResponse::new(401, r#"{"detail":"Could not validate credentials"}"#))
                }
            }
        }
    }
}

fn portal(backend: &Arc<FakeBackend>, token_path: &Path) -> Portal {
    Portal::from_parts(
        backend.clone(),
        Arc::new(FileTokenStorage::new(TokioFileSystem, token_path)),
        Arc::new(SystemClock),
        GatewayConfig::default(),
    )
}

#[tokio::test]
async fn test_login_survives_restart() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    let backend = FakeBackend::new();

    let first = portal(&backend, &token_path);
    let state = first
        .session()
        .login(&Credentials::new("ana@example.org", "secret"))
        .await
        .unwrap();
    assert_eq!(state, AuthState::LoggedIn { role: Some(Role::Board) });
    let stored = std::fs::read_to_string(&token_path).unwrap();

    let second = portal(&backend, &token_path);
    assert_eq!(
        second.session().restore().await,
        AuthState::LoggedIn { role: Some(Role::Board) }
    );
    let news = second.api().news().list().await.unwrap();

    assert_eq!(news[0].title, "General assembly");
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 0);
    let last = backend.calls.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last, ("news/list".to_string(), Some(format!("Bearer {stored}"))));
}

#[tokio::test]
async fn test_wrong_password_reports_server_detail() {
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new();
    let client = portal(&backend, &dir.path().join("token"));

    let error = client
        .session()
        .login(&Credentials::new("ana@example.org", "guess"))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("Incorrect username or password"));
    assert!(!client.session().is_logged_in().await);
}

#[tokio::test]
async fn test_expired_token_on_disk_is_refreshed_before_sending() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, mint(-10, "regular")).unwrap();
    let backend = FakeBackend::new();
    let client = portal(&backend, &token_path);

    client.api().news().list().await.unwrap();

    assert_eq!(backend.paths(), vec!["auth/refresh", "news/list"]);
    let refreshed = backend.accepted.lock().unwrap().clone().unwrap();
    assert_eq!(std::fs::read_to_string(&token_path).unwrap(), refreshed);
    assert_eq!(client.session().current_role().await, Some(Role::Board));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_rejections_share_one_refresh() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    // valid shape, but revoked server-side
    std::fs::write(&token_path, mint(3600, "regular")).unwrap();
    let backend = FakeBackend::new();
    *backend.refresh_delay.lock().unwrap() = Duration::from_millis(100);
    let client = portal(&backend, &token_path);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..6 {
        let gateway = client.gateway().clone();
        tasks.spawn(async move { gateway.send(&ApiRequest::get("news/list")).await });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap().status, 200);
    }

    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_refresh_ends_session() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, mint(3600, "admin")).unwrap();
    let backend = FakeBackend::new();
    backend.refresh_allowed.store(false, Ordering::SeqCst);
    let client = portal(&backend, &token_path);
    let mut state = client.session().subscribe();

    let error = client.api().users().list().await.unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(error.user_message(), "401 Could not validate credentials");
    assert!(!token_path.exists());
    assert_eq!(*state.borrow_and_update(), AuthState::LoggedOut);
    assert_eq!(backend.paths(), vec!["users/list", "auth/refresh"]);
}

#[tokio::test]
async fn test_logout_with_server_down_still_logs_out() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    let backend = FakeBackend::new();
    let client = portal(&backend, &token_path);
    client
        .session()
        .login(&Credentials::new("ana@example.org", "secret"))
        .await
        .unwrap();
    backend.reachable.store(false, Ordering::SeqCst);

    let state = client.logout().await;

    assert_eq!(state, AuthState::LoggedOut);
    assert!(!token_path.exists());
    assert_eq!(client.session().tokens().get().await, None::<AccessToken>);
}

#[tokio::test]
async fn test_upload_with_in_memory_session() {
    let dir = tempdir().unwrap();
    let form_path = dir.path().join("membership-form.pdf");
    std::fs::write(&form_path, b"%PDF-1.7").unwrap();
    let backend = FakeBackend::new();
    let storage = Arc::new(InMemoryTokenStorage::new());
    let client = Portal::from_parts(
        backend.clone(),
        storage.clone(),
        Arc::new(SystemClock),
        GatewayConfig::default(),
    );
    client
        .session()
        .login(&Credentials::new("ana@example.org", "secret"))
        .await
        .unwrap();

    client.api().files().metadata(FileType::Forms).await.unwrap();
    let upload = FileUpload {
        file_name: "Membership form".to_string(),
        file_type: FileType::Forms,
        allowed_to: Vec::new(),
        file: attach_file("file", &form_path).await.unwrap(),
    };
    client.api().files().upload(upload).await.unwrap();
    client.api().files().metadata(FileType::Forms).await.unwrap();

    assert_eq!(
        backend.paths(),
        vec![
            "auth/login",
            "files/get_files?file_type=forms",
            "files/create",
            "files/get_files?file_type=forms",
        ]
    );
    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.last(), Some(&MultipartField::File {
        name: "file".to_string(),
        file_name: "membership-form.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.7".to_vec(),
    }));

    // A second client on the same process-local slot shares the session;
    // one with a fresh slot starts logged out.
    let shared = Portal::from_parts(backend.clone(), storage, Arc::new(SystemClock), GatewayConfig::default());
    assert!(shared.session().is_logged_in().await);
    let fresh = Portal::from_parts(
        backend.clone(),
        Arc::new(InMemoryTokenStorage::new()),
        Arc::new(SystemClock),
        GatewayConfig::default(),
    );
    assert_eq!(fresh.session().restore().await, AuthState::LoggedOut);
}
