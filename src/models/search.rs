// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Page size used by the search view
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Storage a file result originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    Local,
    GoogleDrive,
    Dropbox,
    GooglePhotos,
    Gmail,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Local => "local",
            StorageType::GoogleDrive => "google_drive",
            StorageType::Dropbox => "dropbox",
            StorageType::GooglePhotos => "google_photos",
            StorageType::Gmail => "gmail",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "local" => Some(StorageType::Local),
            "google_drive" => Some(StorageType::GoogleDrive),
            "dropbox" => Some(StorageType::Dropbox),
            "google_photos" => Some(StorageType::GooglePhotos),
            "gmail" => Some(StorageType::Gmail),
            _ => None,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown service '{}', expected local, google_drive, dropbox, google_photos or gmail",
                s
            )
        })
    }
}

/// Cloud provider of a non-local result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudProvider {
    GoogleDrive,
    Dropbox,
    GooglePhotos,
    Gmail,
}

impl CloudProvider {
    pub fn storage_type(&self) -> StorageType {
        match self {
            CloudProvider::GoogleDrive => StorageType::GoogleDrive,
            CloudProvider::Dropbox => StorageType::Dropbox,
            CloudProvider::GooglePhotos => StorageType::GooglePhotos,
            CloudProvider::Gmail => StorageType::Gmail,
        }
    }

    pub fn from_storage_type(storage_type: StorageType) -> Option<Self> {
        match storage_type {
            StorageType::Local => None,
            StorageType::GoogleDrive => Some(CloudProvider::GoogleDrive),
            StorageType::Dropbox => Some(CloudProvider::Dropbox),
            StorageType::GooglePhotos => Some(CloudProvider::GooglePhotos),
            StorageType::Gmail => Some(CloudProvider::Gmail),
        }
    }
}

/// Extension filter accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileTypeFilter {
    Pdf,
    Docx,
    Txt,
    Jpg,
    Png,
    Folder,
}

impl FileTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileTypeFilter::Pdf => "pdf",
            FileTypeFilter::Docx => "docx",
            FileTypeFilter::Txt => "txt",
            FileTypeFilter::Jpg => "jpg",
            FileTypeFilter::Png => "png",
            FileTypeFilter::Folder => "folder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pdf" => Some(FileTypeFilter::Pdf),
            "docx" => Some(FileTypeFilter::Docx),
            "txt" => Some(FileTypeFilter::Txt),
            "jpg" => Some(FileTypeFilter::Jpg),
            "png" => Some(FileTypeFilter::Png),
            "folder" => Some(FileTypeFilter::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for FileTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown file type '{}', expected pdf, docx, txt, jpg, png or folder",
                s
            )
        })
    }
}

/// Client-side ordering of the rendered result list. Never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Name,
    Type,
    Storage,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Name => write!(f, "name"),
            SortOrder::Type => write!(f, "type"),
            SortOrder::Storage => write!(f, "storage"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortOrder::Name),
            "type" => Ok(SortOrder::Type),
            "storage" => Ok(SortOrder::Storage),
            _ => Err(format!(
                "unknown sort order '{}', expected name, type or storage",
                s
            )),
        }
    }
}

/// Search criteria currently entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw text as typed; trimmed before it is sent
    pub text: String,
    pub service: Option<StorageType>,
    pub file_type: Option<FileTypeFilter>,
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// A search runs when there is text or at least one filter.
    pub fn is_searchable(&self) -> bool {
        !self.trimmed_text().is_empty() || self.service.is_some() || self.file_type.is_some()
    }

    /// Compare the criteria that reach the server (sort order excluded).
    pub fn same_criteria(&self, other: &SearchQuery) -> bool {
        self.trimmed_text() == other.trimmed_text()
            && self.service == other.service
            && self.file_type == other.file_type
    }

    /// Query string pairs for `/search/search-files`. Unset filters are omitted.
    pub fn to_params(&self, offset: u32, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.trimmed_text().to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(service) = self.service {
            params.push(("service", service.as_str().to_string()));
        }
        if let Some(file_type) = self.file_type {
            params.push(("filetype", file_type.as_str().to_string()));
        }
        params
    }
}

/// Pagination position of the active query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
    pub limit: u32,
    /// Server-reported; false once the last page has been seen
    pub has_more: bool,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit,
            has_more: true,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
    }

    /// Move past a successfully fetched page.
    pub fn advance(&mut self, has_more: bool) {
        self.offset += self.limit;
        self.has_more = has_more;
    }

    pub fn is_exhausted(&self) -> bool {
        !self.has_more && self.offset > 0
    }
}

/// Where a result lives. Local files always carry a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation {
    Local {
        filepath: String,
    },
    Cloud {
        provider: CloudProvider,
        cloud_file_id: Option<String>,
        filepath: Option<String>,
    },
}

/// A validated search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub id: i64,
    pub filename: String,
    pub location: FileLocation,
    pub is_favorite: bool,
}

impl FileResult {
    pub fn storage_type(&self) -> StorageType {
        match &self.location {
            FileLocation::Local { .. } => StorageType::Local,
            FileLocation::Cloud { provider, .. } => provider.storage_type(),
        }
    }

    pub fn filepath(&self) -> Option<&str> {
        match &self.location {
            FileLocation::Local { filepath } => Some(filepath),
            FileLocation::Cloud { filepath, .. } => filepath.as_deref(),
        }
    }

    pub fn cloud_file_id(&self) -> Option<&str> {
        match &self.location {
            FileLocation::Local { .. } => None,
            FileLocation::Cloud { cloud_file_id, .. } => cloud_file_id.as_deref(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.location, FileLocation::Local { .. })
    }

    /// Downloads and reveal-in-folder only make sense for local files.
    pub fn can_download(&self) -> bool {
        self.is_local()
    }

    /// Lowercased extension of the filename, empty when there is none
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }
}

/// Search hit exactly as the backend serializes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    /// Older index entries omit this; they are local files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<StorageType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_file_id: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl TryFrom<FileRecord> for FileResult {
    type Error = String;

    fn try_from(record: FileRecord) -> Result<Self, Self::Error> {
        let storage_type = record.storage_type.unwrap_or(StorageType::Local);
        let location = match CloudProvider::from_storage_type(storage_type) {
            None => {
                let filepath = record
                    .filepath
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| format!("local result {} has no filepath", record.id))?;
                FileLocation::Local { filepath }
            }
            Some(provider) => FileLocation::Cloud {
                provider,
                cloud_file_id: record.cloud_file_id,
                filepath: record.filepath,
            },
        };

        Ok(FileResult {
            id: record.id,
            filename: record.filename,
            location,
            is_favorite: record.is_favorite,
        })
    }
}

impl From<&FileResult> for FileRecord {
    fn from(file: &FileResult) -> Self {
        FileRecord {
            id: file.id,
            filename: file.filename.clone(),
            filepath: file.filepath().map(str::to_string),
            storage_type: Some(file.storage_type()),
            cloud_file_id: file.cloud_file_id().map(str::to_string),
            is_favorite: file.is_favorite,
        }
    }
}

/// Raw response body of `/search/search-files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<FileRecord>,
    pub has_more: bool,
}

/// One validated page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub results: Vec<FileResult>,
    pub has_more: bool,
    /// Items dropped because they failed validation
    pub skipped: usize,
}

impl SearchPage {
    /// Validate a search payload.
    ///
    /// The envelope must have a `results` array and a boolean `has_more`;
    /// anything else rejects the whole page. Items inside the array are
    /// validated one by one and invalid ones are skipped.
    pub fn from_json(value: Value) -> Result<Self, String> {
        let Value::Object(mut body) = value else {
            return Err("search response is not a JSON object".to_string());
        };

        let has_more = body
            .get("has_more")
            .and_then(Value::as_bool)
            .ok_or_else(|| "search response has no boolean 'has_more'".to_string())?;

        let items = match body.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return Err("search response has no 'results' array".to_string()),
        };

        let mut results = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for item in items {
            let parsed = serde_json::from_value::<FileRecord>(item)
                .map_err(|e| e.to_string())
                .and_then(FileResult::try_from);
            match parsed {
                Ok(file) => results.push(file),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping invalid search result");
                    skipped += 1;
                }
            }
        }

        Ok(SearchPage {
            results,
            has_more,
            skipped,
        })
    }
}
