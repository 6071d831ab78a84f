// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::DEFAULT_PAGE_LIMIT;
use std::env;
use std::time::Duration;

/// Backend used when `FILE_SEARCH_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Allowed range for `SEARCH_DEBOUNCE_MS`
pub const DEBOUNCE_MIN_MS: u64 = 500;
pub const DEBOUNCE_MAX_MS: u64 = 600;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the search backend
    pub api_url: String,
    /// Quiet period after the last input change before a search starts
    pub debounce: Duration,
    /// Results per page
    pub page_limit: u32,
    /// Delay between index status polls
    pub index_poll_interval: Duration,
    /// How long a finished index status stays visible before resetting
    pub index_reset_after: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Lifetime of a transient notification
    pub notification_ttl: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            debounce: Duration::from_millis(500),
            page_limit: DEFAULT_PAGE_LIMIT,
            index_poll_interval: Duration::from_secs(3),
            index_reset_after: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
            notification_ttl: Duration::from_secs(5),
        }
    }
}

impl ClientSettings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("FILE_SEARCH_API_URL").unwrap_or(defaults.api_url),
            debounce: debounce_window(env_u64("SEARCH_DEBOUNCE_MS", DEBOUNCE_MIN_MS)),
            page_limit: env::var("SEARCH_PAGE_LIMIT")
                .unwrap_or_else(|_| DEFAULT_PAGE_LIMIT.to_string())
                .parse()
                .ok()
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
            index_poll_interval: Duration::from_secs(env_u64("INDEX_POLL_INTERVAL_SECS", 3)),
            index_reset_after: Duration::from_secs(env_u64("INDEX_STATUS_RESET_SECS", 3)),
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", 30)),
            notification_ttl: Duration::from_secs(env_u64("NOTIFICATION_TTL_SECS", 5)),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Debounce for `ms`, clamped to `DEBOUNCE_MIN_MS..=DEBOUNCE_MAX_MS`.
pub fn debounce_window(ms: u64) -> Duration {
    let clamped = ms.clamp(DEBOUNCE_MIN_MS, DEBOUNCE_MAX_MS);
    if clamped != ms {
        tracing::warn!(requested = ms, used = clamped, "SEARCH_DEBOUNCE_MS out of range");
    }
    Duration::from_millis(clamped)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}
