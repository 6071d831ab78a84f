// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Per-result operations: download, reveal in folder, favorite, provider links.

use crate::models::search::{CloudProvider, FileLocation, FileResult};
use crate::services::api::{ApiClient, ApiError};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Name used when a filepath has no usable basename
const FALLBACK_DOWNLOAD_NAME: &str = "file";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("'{0}' has no file path")]
    NoFilepath(String),
    #[error("failed to save download: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to save download: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl ActionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Api(e) if e.is_unauthorized())
    }
}

/// Backend-side actions on individual results.
#[derive(Debug, Clone)]
pub struct ResultActions {
    api: ApiClient,
}

impl ResultActions {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Download a local file into `dest_dir`, named after the basename of `filepath`.
    ///
    /// The body is streamed into a temporary file next to the target and only
    /// renamed into place once complete. On any failure the temporary file is
    /// removed when it goes out of scope.
    pub async fn download(&self, filepath: &str, dest_dir: &Path) -> Result<PathBuf, ActionError> {
        let mut response = self.api.download_file(filepath).await?;

        let target = dest_dir.join(download_name(filepath));
        let mut tmp = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(dest_dir)?;

        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(ApiError::from)? {
            tmp.write_all(&chunk)?;
            written += chunk.len();
        }
        tmp.flush()?;
        tmp.persist(&target)?;

        tracing::info!(path = %target.display(), bytes = written, "downloaded file");
        Ok(target)
    }

    /// Reveal a file in the file manager of the machine running the backend.
    pub async fn open_file_location(&self, filepath: &str) -> Result<(), ActionError> {
        self.api.open_file(filepath).await?;
        Ok(())
    }

    /// Toggle the favorite flag of `file` and return the new value.
    pub async fn toggle_favorite(&self, file: &FileResult) -> Result<bool, ActionError> {
        let filepath = file
            .filepath()
            .ok_or_else(|| ActionError::NoFilepath(file.filename.clone()))?;
        let reported = self.api.toggle_favorite(filepath).await?;
        Ok(reported.unwrap_or(!file.is_favorite))
    }
}

/// Basename of `filepath` for saving a download. Accepts `/` and `\` separators.
pub fn download_name(filepath: &str) -> String {
    filepath
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_DOWNLOAD_NAME)
        .to_string()
}

/// Link that opens a cloud result in its provider's web UI. `None` for local files.
pub fn cloud_open_url(file: &FileResult) -> Option<Url> {
    let FileLocation::Cloud {
        provider,
        cloud_file_id,
        ..
    } = &file.location
    else {
        return None;
    };

    match provider {
        CloudProvider::GoogleDrive => {
            let id = cloud_file_id.as_deref()?;
            let mut url = Url::parse("https://drive.google.com/open").ok()?;
            url.query_pairs_mut().append_pair("id", id);
            Some(url)
        }
        CloudProvider::Dropbox => {
            // Dropbox ids are paths rooted at the account home
            let path = cloud_file_id.as_deref()?;
            let mut url = Url::parse("https://www.dropbox.com/home").ok()?;
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.extend(path.split('/').filter(|s| !s.is_empty()));
            }
            Some(url)
        }
        CloudProvider::Gmail => {
            let mut url = Url::parse("https://mail.google.com/mail/u/0/").ok()?;
            url.set_fragment(Some(&format!("search/{}", file.filename)));
            Some(url)
        }
        CloudProvider::GooglePhotos => {
            let mut url = Url::parse("https://photos.google.com/search").ok()?;
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push(&file.filename);
            }
            Some(url)
        }
    }
}
