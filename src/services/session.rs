// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Persisted client session.
//!
//! Lifecycle: loaded once at startup, saved whenever it changes, cleared on
//! logout or when the backend reports the session as expired.

use crate::models::auth::UserProfile;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// State that survives between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub token: Option<String>,
    /// Backend session cookies as a `Cookie` header value
    #[serde(default)]
    pub cookies: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() || self.user.is_some()
    }
}

/// File-backed [`SessionState`].
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    /// `session.json` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "file-search-client")
            .ok_or_else(|| anyhow!("could not determine a config directory"))?;
        Ok(dirs.config_dir().join(SESSION_FILE))
    }

    /// Load the session at `path`. A missing or unreadable file yields an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                SessionState::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read session file");
                SessionState::default()
            }
        };
        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply `change` and persist the result.
    pub fn update(&mut self, change: impl FnOnce(&mut SessionState)) -> Result<()> {
        change(&mut self.state);
        self.save()
    }

    /// Write the session atomically. The file is readable by the owner only.
    pub fn save(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let json = serde_json::to_vec_pretty(&self.state).context("Failed to encode session")?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        tmp.write_all(&json).context("Failed to write session")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to save session to {}", self.path.display()))?;
        Ok(())
    }

    /// Forget everything and remove the file.
    pub fn clear(&mut self) -> Result<()> {
        self.state = SessionState::default();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
