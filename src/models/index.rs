// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a backend reindex job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingStatus {
    #[default]
    NotStarted,
    InProgress,
    /// Accepted but not yet walking files. The backend reports this as "starting".
    #[serde(alias = "starting")]
    Indexing,
    Completed,
    Failed,
}

impl IndexingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingStatus::NotStarted => "not_started",
            IndexingStatus::InProgress => "in_progress",
            IndexingStatus::Indexing => "indexing",
            IndexingStatus::Completed => "completed",
            IndexingStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IndexingStatus::Completed | IndexingStatus::Failed)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, IndexingStatus::InProgress | IndexingStatus::Indexing)
    }
}

impl fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `GET /search/index-status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatusResponse {
    pub status: IndexingStatus,
}

/// Body of `POST /search/index-files`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStartResponse {
    #[serde(default)]
    pub message: Option<String>,
}
