// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// A cloud storage account connected to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudAccount {
    pub id: i64,
    /// Provider display name, e.g. "Google Drive" or "Dropbox"
    pub provider: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Timestamp of the last sync as reported by the backend
    #[serde(default, rename = "lastSynced", alias = "last_synced")]
    pub last_synced: Option<String>,
}

impl CloudAccount {
    pub fn is_dropbox(&self) -> bool {
        self.provider.eq_ignore_ascii_case("dropbox")
    }

    /// Google accounts cover Drive, Gmail and Photos.
    pub fn is_google(&self) -> bool {
        let provider = self.provider.to_ascii_lowercase().replace(' ', "_");
        provider.starts_with("google") || provider == "gmail"
    }
}

/// Request body for the sync endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAccountRequest {
    pub account_id: i64,
}
