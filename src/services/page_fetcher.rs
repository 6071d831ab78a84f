// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Paginated fetching and merging of search results.

use crate::models::search::{FileResult, PageCursor, SearchPage, SearchQuery, SortOrder};
use crate::services::api::ApiError;
use std::collections::HashSet;

/// Identifies one page request: the query generation it belongs to and its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag {
    pub generation: u64,
    pub offset: u32,
}

/// A page fetch to perform against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub tag: RequestTag,
    pub query: SearchQuery,
    pub offset: u32,
    pub limit: u32,
}

/// Why [`PageFetcher::begin`] refused to start a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRefusal {
    /// A page is already in flight
    Loading,
    /// The server reported there are no more pages
    Exhausted,
    /// No query is active
    NoActiveQuery,
}

/// Result of merging a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// First page replaced the list
    Replaced { count: usize },
    /// Later page appended; `duplicates` items were already present
    Appended { added: usize, duplicates: usize },
    /// Fetch failed; `cleared` is true when the list was emptied
    Failed { cleared: bool, message: String },
    /// Backend answered 401
    SessionExpired,
    /// Response for a request that is no longer current; ignored
    Stale,
}

#[derive(Debug, Clone)]
struct ActiveQuery {
    generation: u64,
    query: SearchQuery,
}

/// Accumulated results of the active query and its pagination state.
#[derive(Debug)]
pub struct PageFetcher {
    files: Vec<FileResult>,
    cursor: PageCursor,
    loading: bool,
    in_flight: Option<RequestTag>,
    active: Option<ActiveQuery>,
}

impl PageFetcher {
    pub fn new(limit: u32) -> Self {
        Self {
            files: Vec::new(),
            cursor: PageCursor::new(limit),
            loading: false,
            in_flight: None,
            active: None,
        }
    }

    pub fn files(&self) -> &[FileResult] {
        &self.files
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    /// Tag of the request currently awaited, if any.
    pub fn in_flight(&self) -> Option<RequestTag> {
        self.in_flight
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.generation)
    }

    pub fn active_query(&self) -> Option<&SearchQuery> {
        self.active.as_ref().map(|a| &a.query)
    }

    /// Switch to a new query. Pagination restarts at offset 0 and any
    /// response still in flight for the previous query becomes stale.
    /// The current list stays visible until the first page replaces it.
    pub fn reset(&mut self, generation: u64, query: SearchQuery) {
        self.active = Some(ActiveQuery { generation, query });
        self.cursor.reset();
        self.loading = false;
        self.in_flight = None;
    }

    /// Drop the active query and every result.
    pub fn clear(&mut self) {
        self.active = None;
        self.files.clear();
        self.cursor.reset();
        self.loading = false;
        self.in_flight = None;
    }

    /// Start fetching the page at the current offset.
    pub fn begin(&mut self) -> Result<PageRequest, FetchRefusal> {
        let active = self.active.as_ref().ok_or(FetchRefusal::NoActiveQuery)?;
        if self.loading {
            return Err(FetchRefusal::Loading);
        }
        if self.cursor.is_exhausted() {
            return Err(FetchRefusal::Exhausted);
        }

        let tag = RequestTag {
            generation: active.generation,
            offset: self.cursor.offset,
        };
        let request = PageRequest {
            tag,
            query: active.query.clone(),
            offset: self.cursor.offset,
            limit: self.cursor.limit,
        };

        self.loading = true;
        self.in_flight = Some(tag);
        Ok(request)
    }

    /// Merge the result of the request tagged `tag`.
    pub fn complete(&mut self, tag: RequestTag, outcome: Result<SearchPage, ApiError>) -> FetchOutcome {
        if self.in_flight != Some(tag) {
            tracing::debug!(
                generation = tag.generation,
                offset = tag.offset,
                "discarding stale search response"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        match outcome {
            Ok(page) => {
                let merged = if tag.offset == 0 {
                    self.files = dedup(page.results, &HashSet::new()).0;
                    FetchOutcome::Replaced {
                        count: self.files.len(),
                    }
                } else {
                    let seen: HashSet<i64> = self.files.iter().map(|f| f.id).collect();
                    let (fresh, duplicates) = dedup(page.results, &seen);
                    let added = fresh.len();
                    self.files.extend(fresh);
                    FetchOutcome::Appended { added, duplicates }
                };
                self.cursor.advance(page.has_more);
                merged
            }
            Err(ApiError::Unauthorized) => FetchOutcome::SessionExpired,
            Err(e) => {
                tracing::warn!(error = %e, offset = tag.offset, "search failed");
                let cleared = tag.offset == 0;
                if cleared {
                    self.files.clear();
                }
                FetchOutcome::Failed {
                    cleared,
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn find(&self, id: i64) -> Option<&FileResult> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Update the favorite flag of one result. Returns false if `id` is unknown.
    pub fn set_favorite(&mut self, id: i64, is_favorite: bool) -> bool {
        match self.files.iter_mut().find(|f| f.id == id) {
            Some(file) => {
                file.is_favorite = is_favorite;
                true
            }
            None => false,
        }
    }

    /// Results in display order.
    pub fn sorted(&self, order: SortOrder) -> Vec<&FileResult> {
        let mut view: Vec<&FileResult> = self.files.iter().collect();
        match order {
            SortOrder::Name => view.sort_by_cached_key(|f| f.filename.to_lowercase()),
            SortOrder::Type => {
                view.sort_by_cached_key(|f| (f.extension(), f.filename.to_lowercase()))
            }
            SortOrder::Storage => view.sort_by_cached_key(|f| {
                (f.storage_type().as_str(), f.filename.to_lowercase())
            }),
        }
        view
    }
}

/// Keep the first occurrence of each id not already in `seen`.
fn dedup(items: Vec<FileResult>, seen: &HashSet<i64>) -> (Vec<FileResult>, usize) {
    let mut ids = seen.clone();
    let total = items.len();
    let fresh: Vec<FileResult> = items.into_iter().filter(|f| ids.insert(f.id)).collect();
    let duplicates = total - fresh.len();
    (fresh, duplicates)
}
