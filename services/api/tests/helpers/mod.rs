//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use api::{
    config::AppConfig,
    models::{Invite, NewInvite, NewUser, User},
    repositories::Repositories,
    routes,
    state::AppState,
};

pub const HOST: &str = "http://img.test";
pub const FILE_SIZE_LIMIT: usize = 1024;
const ENCRYPT_KEY: &str = "0123456789abcdef0123456789abcdef";
const BOUNDARY: &str = "imagehost-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router, for direct repository access
    pub state: AppState,
    upload_dir: TempDir,
}

impl TestApp {
    /// Create a new test application on the in-memory store
    pub async fn new() -> Self {
        Self::with_repositories(Repositories::memory()).await
    }

    /// Create a test application over the given repositories
    pub async fn with_repositories(repositories: Repositories) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let config = json!({
            "host": HOST,
            "session_secret": "integration-test-secret",
            "database": {
                "dialect": "memory",
                "encrypt_key": ENCRYPT_KEY,
            },
            "limits": { "file_size": FILE_SIZE_LIMIT },
            "upload_dir": upload_dir.path(),
        });
        let config = AppConfig::from_json(&config.to_string()).expect("Failed to load test config");

        let state =
            AppState::new(config, repositories, None).expect("Failed to build state");
        state
            .storage
            .ensure_dir()
            .await
            .expect("Failed to prepare upload dir");

        let router = routes::create_router(state.clone());

        Self {
            router,
            state,
            upload_dir,
        }
    }

    /// Create a user directly in the store
    pub async fn create_user(&self, username: &str, password: &str, is_admin: bool) -> User {
        let secret = self
            .state
            .cipher
            .encrypt(password.as_bytes())
            .expect("Failed to encrypt password");

        self.state
            .user_repository
            .create(&NewUser {
                username: username.to_string(),
                secret,
                is_admin,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Session token for a user, as the login endpoint would issue it
    pub fn token_for(&self, user: &User) -> String {
        self.state
            .jwt_service
            .issue(user.id, user.is_admin)
            .expect("Failed to issue token")
    }

    pub async fn create_invite(&self, code: &str, uses: i32) -> Invite {
        self.state
            .invite_repository
            .create(&NewInvite {
                code: code.to_string(),
                uses,
            })
            .await
            .expect("Failed to create test invite")
    }

    pub async fn invite(&self, code: &str) -> Option<Invite> {
        self.state
            .invite_repository
            .find_by_code(code)
            .await
            .expect("Failed to look up invite")
    }

    /// Send a request through the router
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            req = req.header(header::COOKIE, format!("session_hash={}", token));
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::COOKIE, format!("session_hash={}", token));
        }
        self.send(
            req.body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    /// POST a single-file multipart body to the upload endpoint
    pub async fn upload(
        &self,
        token: Option<&str>,
        field: &str,
        file_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let part_headers = format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}"
        );
        self.upload_part(token, &part_headers, data).await
    }

    /// POST one multipart part with the given part headers
    pub async fn upload_part(
        &self,
        token: Option<&str>,
        part_headers: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = format!("--{BOUNDARY}\r\n{part_headers}\r\n\r\n").into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri("/api/uploads/create")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            req = req.header(header::COOKIE, format!("session_hash={}", token));
        }
        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    /// Number of files currently in the upload directory
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .count()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}
