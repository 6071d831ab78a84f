// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! In-process mock of the file search backend.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use file_search_client::models::settings::ClientSettings;
use file_search_client::services::api::ApiClient;
use file_search_client::services::auth::AuthService;
use file_search_client::services::session::SessionStore;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const TOKEN: &str = "test-token";
pub const EMAIL: &str = "alice@example.com";
pub const PASSWORD: &str = "correct-horse";

#[derive(Default)]
pub struct MockState {
    /// All hits per trimmed query text; the mock paginates them
    pub catalog: HashMap<String, Vec<Value>>,
    /// Artificial latency per query text
    pub delays: HashMap<String, Duration>,
    /// Raw query strings of every search request, in arrival order
    pub search_log: Vec<HashMap<String, String>>,
    /// Answer every search with 401
    pub reject_search: bool,
    pub favorites: HashMap<String, bool>,
    pub favorite_log: Vec<String>,
    pub index_requests: usize,
    /// Responses for successive status polls; the last one repeats
    pub index_statuses: VecDeque<(StatusCode, Value)>,
    pub files: HashMap<String, Vec<u8>>,
    pub opened: Vec<String>,
    pub accounts: Vec<Value>,
    pub sync_log: Vec<(String, i64)>,
    pub disconnected: Vec<i64>,
    pub signups: Vec<Value>,
    pub logged_out: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, state }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Settings pointing at this backend with short timings.
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            debounce: Duration::from_millis(20),
            index_poll_interval: Duration::from_millis(20),
            index_reset_after: Duration::from_millis(50),
            request_timeout: Duration::from_secs(5),
            ..ClientSettings::default()
        }
        .with_api_url(self.url.clone())
    }

    /// Auth service with a logged-in session stored under `dir`.
    pub fn logged_in(&self, dir: &TempDir) -> AuthService {
        let mut store = SessionStore::load(dir.path().join("session.json"));
        store
            .update(|s| {
                s.token = Some(TOKEN.to_string());
                s.user = Some(serde_json::from_value(profile()).unwrap());
            })
            .unwrap();
        let api = ApiClient::new(&self.settings()).unwrap();
        AuthService::new(api, store)
    }

    /// Auth service with no session.
    pub fn anonymous(&self, dir: &TempDir) -> AuthService {
        let api = ApiClient::new(&self.settings()).unwrap();
        AuthService::new(api, SessionStore::load(dir.path().join("session.json")))
    }
}

/// Raw HTTP server whose responses declare `declared` bytes but send only
/// `sent` before closing the connection.
pub async fn truncated_body_server(sent: &'static [u8], declared: usize) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: {declared}\r\n\r\n"
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(sent).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    url
}

pub fn local(id: i64, filename: &str) -> Value {
    json!({
        "id": id,
        "filename": filename,
        "filepath": format!("/documents/{filename}"),
        "storage_type": "local",
        "is_favorite": false,
    })
}

pub fn numbered(count: i64) -> Vec<Value> {
    (1..=count).map(|i| local(i, &format!("doc{i:02}.txt"))).collect()
}

pub fn profile() -> Value {
    json!({ "id": 7, "email": EMAIL, "username": "alice" })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/search/search-files", get(search_files))
        .route("/search/index-files", post(index_files))
        .route("/search/index-status", get(index_status))
        .route("/search/download-file", get(download_file))
        .route("/search/open-file", post(open_file))
        .route("/search/{filepath}/favorite", post(toggle_favorite))
        .route("/search/sync-cloud-storage", post(sync_account))
        .route("/search/gmail/sync", post(sync_account))
        .route("/search/photos/sync", post(sync_account))
        .route("/search/sync-dropbox", post(sync_account))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(user_profile))
        .route("/auth/check-auth", get(check_auth))
        .route(
            "/cloud-accounts/{id}",
            get(list_accounts).delete(disconnect_account),
        )
        .with_state(state)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "Missing Authorization Header" }))).into_response()
}

async fn search_files(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    let (delay, reject) = {
        let mut s = state.lock().unwrap();
        s.search_log.push(params.clone());
        (s.delays.get(&q).copied(), s.reject_search)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if reject {
        return unauthorized();
    }

    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let all = state.lock().unwrap().catalog.get(&q).cloned().unwrap_or_default();
    let page: Vec<Value> = all.iter().skip(offset).take(limit).cloned().collect();
    let has_more = offset + limit < all.len();

    Json(json!({ "results": page, "has_more": has_more })).into_response()
}

async fn index_files(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().index_requests += 1;
    Json(json!({ "message": "Indexing started" }))
}

async fn index_status(State(state): State<Shared>) -> Response {
    let mut s = state.lock().unwrap();
    let next = if s.index_statuses.len() > 1 {
        s.index_statuses.pop_front()
    } else {
        s.index_statuses.front().cloned()
    };
    let (status, body) = next.unwrap_or((StatusCode::OK, json!({ "status": "completed" })));
    (status, Json(body)).into_response()
}

async fn download_file(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let filepath = params.get("filepath").cloned().unwrap_or_default();
    match state.lock().unwrap().files.get(&filepath) {
        Some(bytes) => bytes.clone().into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "File not found" }))).into_response(),
    }
}

async fn open_file(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let filepath = body["filepath"].as_str().unwrap_or_default().to_string();
    let mut s = state.lock().unwrap();
    if !s.files.contains_key(&filepath) {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "File not found" }))).into_response();
    }
    s.opened.push(filepath);
    Json(json!({ "message": "File location opened" })).into_response()
}

async fn toggle_favorite(State(state): State<Shared>, Path(filepath): Path<String>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.favorite_log.push(filepath.clone());
    let flag = s.favorites.entry(filepath).or_insert(false);
    *flag = !*flag;
    Json(json!({ "is_favorite": *flag }))
}

async fn sync_account(
    State(state): State<Shared>,
    uri: axum::http::Uri,
    Json(body): Json<Value>,
) -> Json<Value> {
    let account_id = body["account_id"].as_i64().unwrap_or_default();
    state
        .lock()
        .unwrap()
        .sync_log
        .push((uri.path().to_string(), account_id));
    Json(json!({ "message": "Sync started" }))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({ "message": "Login successful", "token": TOKEN, "username": "alice" }))
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))).into_response()
    }
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.lock().unwrap().signups.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "User created successfully" }))).into_response()
}

async fn logout(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().logged_out = true;
    Json(json!({ "message": "Logged out" }))
}

async fn user_profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(profile()).into_response()
}

async fn check_auth(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "authenticated": true })).into_response()
}

async fn list_accounts(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let accounts = state.lock().unwrap().accounts.clone();
    if user_id != "7" || accounts.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "No accounts" }))).into_response();
    }
    Json(Value::Array(accounts)).into_response()
}

async fn disconnect_account(State(state): State<Shared>, Path(account_id): Path<i64>) -> Json<Value> {
    state.lock().unwrap().disconnected.push(account_id);
    Json(json!({ "message": "Account disconnected" }))
}
