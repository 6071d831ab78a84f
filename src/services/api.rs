// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! HTTP client for the file search backend.
//!
//! Every endpoint classifies failures the same way:
//! - `401` becomes [`ApiError::Unauthorized`] (the session is gone, re-authenticate)
//! - any other non-2xx status becomes [`ApiError::Status`]
//! - network failures become [`ApiError::Transport`]
//! - bodies that do not match the expected schema become [`ApiError::Malformed`]

use crate::models::accounts::{CloudAccount, SyncAccountRequest};
use crate::models::auth::{
    ErrorResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserId,
    UserProfile,
};
use crate::models::index::{IndexStartResponse, IndexStatusResponse, IndexingStatus};
use crate::models::search::{SearchPage, SearchQuery};
use crate::models::settings::ClientSettings;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use url::Url;

/// Sent with every request.
pub const USER_AGENT: &str = concat!("file-search-client/", env!("FILE_SEARCH_VERSION"));

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired or not logged in")]
    Unauthorized,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Optional body of the favorite toggle response.
#[derive(Debug, Default, Deserialize)]
struct FavoriteResponse {
    #[serde(default)]
    is_favorite: Option<bool>,
}

/// Cookie jar that can be emptied on logout.
#[derive(Debug, Default)]
struct SessionJar(RwLock<Jar>);

impl SessionJar {
    fn add(&self, cookie: &str, url: &Url) {
        if let Ok(jar) = self.0.read() {
            jar.add_cookie_str(cookie, url);
        }
    }

    fn clear(&self) {
        if let Ok(mut jar) = self.0.write() {
            *jar = Jar::default();
        }
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        if let Ok(jar) = self.0.read() {
            jar.set_cookies(cookie_headers, url);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.0.read().ok().and_then(|jar| jar.cookies(url))
    }
}

/// Credentialed client for the search and auth endpoints.
///
/// Cheap to clone; clones share the connection pool, the cookie jar and the
/// bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    cookies: Arc<SessionJar>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client for the backend configured in `settings`.
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let raw = if settings.api_url.starts_with("http://")
            || settings.api_url.starts_with("https://")
        {
            settings.api_url.clone()
        } else {
            format!("http://{}", settings.api_url)
        };
        let base = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw));
        }

        let cookies = Arc::new(SessionJar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()?;

        tracing::debug!(backend = %base, "created API client");

        Ok(Self {
            http,
            base,
            cookies,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Set or clear the bearer token attached to every request.
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Cookies the backend has set, as a `Cookie` header value.
    pub fn session_cookies(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Load cookies saved by [`ApiClient::session_cookies`] into the jar.
    pub fn restore_session_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies.add(pair, &self.base);
        }
    }

    /// Drop the bearer token and every cookie, for this client and its clones.
    pub fn clear_session(&self) {
        self.set_token(None);
        self.cookies.clear();
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own, so a
    /// segment may contain `/`.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.read().ok().and_then(|t| t.clone()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and classify the status code.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "backend response");

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "backend rejected the session");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(status_error(response).await);
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Parse a body that may legitimately be empty or not JSON at all.
    async fn lenient_json<T: DeserializeOwned + Default>(response: Response) -> Result<T, ApiError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }

    // ========== Search ==========

    /// Fetch one page of search results.
    pub async fn search_files(
        &self,
        query: &SearchQuery,
        offset: u32,
        limit: u32,
    ) -> Result<SearchPage, ApiError> {
        let mut url = self.endpoint(&["search", "search-files"]);
        url.query_pairs_mut()
            .extend_pairs(query.to_params(offset, limit));

        let response = self.send(self.request(Method::GET, url)).await?;
        let body: serde_json::Value = Self::json(response).await?;
        SearchPage::from_json(body).map_err(ApiError::Malformed)
    }

    /// Ask the backend to start reindexing.
    pub async fn index_files(&self) -> Result<IndexStartResponse, ApiError> {
        let url = self.endpoint(&["search", "index-files"]);
        let builder = self
            .request(Method::POST, url)
            .json(&serde_json::json!({}));
        let response = self.send(builder).await?;
        Self::lenient_json(response).await
    }

    pub async fn index_status(&self) -> Result<IndexingStatus, ApiError> {
        let url = self.endpoint(&["search", "index-status"]);
        let response = self.send(self.request(Method::GET, url)).await?;
        let body: IndexStatusResponse = Self::json(response).await?;
        Ok(body.status)
    }

    /// Start downloading a local file. The caller consumes the body.
    pub async fn download_file(&self, filepath: &str) -> Result<Response, ApiError> {
        let mut url = self.endpoint(&["search", "download-file"]);
        url.query_pairs_mut().append_pair("filepath", filepath);
        self.send(self.request(Method::GET, url)).await
    }

    /// Reveal a file in the OS file manager of the backend host.
    pub async fn open_file(&self, filepath: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["search", "open-file"]);
        let builder = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "filepath": filepath }));
        self.send(builder).await?;
        Ok(())
    }

    /// Toggle the favorite flag. Returns the new flag when the backend reports it.
    pub async fn toggle_favorite(&self, filepath: &str) -> Result<Option<bool>, ApiError> {
        let url = self.endpoint(&["search", filepath, "favorite"]);
        let response = self.send(self.request(Method::POST, url)).await?;
        let body: FavoriteResponse = Self::lenient_json(response).await?;
        Ok(body.is_favorite)
    }

    // ========== Session ==========

    /// Whether the current cookie/token is accepted by the backend.
    pub async fn check_auth(&self) -> Result<bool, ApiError> {
        let url = self.endpoint(&["auth", "check-auth"]);
        match self.send(self.request(Method::GET, url)).await {
            Ok(_) => Ok(true),
            Err(ApiError::Unauthorized) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(&["auth", "profile"]);
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::json(response).await
    }

    /// Log in. A 401 here means bad credentials, so it is reported as a status error.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let builder = self.request(Method::POST, url).json(request);
        match self.send(builder).await {
            Ok(response) => Self::lenient_json(response).await,
            Err(ApiError::Unauthorized) => Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["auth", "signup"]);
        let response = self
            .send(self.request(Method::POST, url).json(request))
            .await?;
        Self::lenient_json(response).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "logout"]);
        self.send(self.request(Method::POST, url)).await?;
        Ok(())
    }

    // ========== Cloud accounts ==========

    /// Connected cloud accounts of a user. The backend answers 404 when there are none.
    pub async fn list_accounts(&self, user_id: &UserId) -> Result<Vec<CloudAccount>, ApiError> {
        let id = user_id.to_string();
        let url = self.endpoint(&["cloud-accounts", &id]);
        match self.send(self.request(Method::GET, url)).await {
            Ok(response) => Self::json(response).await,
            Err(ApiError::Status { status: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// POST `{account_id}` to one of the sync endpoints under `/search`.
    pub async fn sync_account(&self, endpoint: &[&str], account_id: i64) -> Result<(), ApiError> {
        let mut segments = vec!["search"];
        segments.extend_from_slice(endpoint);
        let url = self.endpoint(&segments);
        let builder = self
            .request(Method::POST, url)
            .json(&SyncAccountRequest { account_id });
        self.send(builder).await?;
        Ok(())
    }

    pub async fn disconnect_account(&self, account_id: i64) -> Result<(), ApiError> {
        let id = account_id.to_string();
        let url = self.endpoint(&["cloud-accounts", &id]);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping the backend's message.
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(ErrorResponse::into_message)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
