// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Owns the search criteria and decides when a new search starts.
//!
//! Every criteria change bumps a generation counter and asks for a debounce.
//! Only the debounce of the newest generation is honoured, so an older timer
//! that fires late is a no-op. The generation also tags page requests, which
//! lets the fetcher drop responses for superseded queries.

use crate::models::search::{FileTypeFilter, SearchQuery, SortOrder, StorageType};
use std::time::Duration;

/// A debounce timer to (re)start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceRequest {
    pub generation: u64,
    pub delay: Duration,
}

/// What to do once the quiet period of a generation has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTrigger {
    /// A newer change arrived or the timer was cancelled
    Stale,
    /// Start a fresh search for this query
    Search { generation: u64, query: SearchQuery },
    /// Nothing to search for; clear the result list
    Clear { generation: u64 },
}

#[derive(Debug)]
pub struct QueryController {
    query: SearchQuery,
    generation: u64,
    pending: Option<u64>,
    debounce: Duration,
}

impl QueryController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: SearchQuery::default(),
            generation: 0,
            pending: None,
            debounce,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a debounce timer is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Option<DebounceRequest> {
        let text = text.into();
        if text == self.query.text {
            return None;
        }
        self.query.text = text;
        Some(self.schedule())
    }

    pub fn set_service_filter(&mut self, service: Option<StorageType>) -> Option<DebounceRequest> {
        if service == self.query.service {
            return None;
        }
        self.query.service = service;
        Some(self.schedule())
    }

    pub fn set_file_type_filter(
        &mut self,
        file_type: Option<FileTypeFilter>,
    ) -> Option<DebounceRequest> {
        if file_type == self.query.file_type {
            return None;
        }
        self.query.file_type = file_type;
        Some(self.schedule())
    }

    /// Sorting is applied client-side and never starts a search.
    pub fn set_sort_order(&mut self, sort: SortOrder) {
        self.query.sort = sort;
    }

    /// Search immediately, skipping the debounce (the search button).
    pub fn submit_now(&mut self) -> SearchTrigger {
        self.generation += 1;
        self.pending = None;
        self.trigger_for(self.generation)
    }

    /// Called when the timer of `generation` fires.
    pub fn on_debounce_elapsed(&mut self, generation: u64) -> SearchTrigger {
        if self.pending != Some(generation) {
            return SearchTrigger::Stale;
        }
        self.pending = None;
        self.trigger_for(generation)
    }

    /// Drop any outstanding debounce (teardown).
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    fn schedule(&mut self) -> DebounceRequest {
        self.generation += 1;
        self.pending = Some(self.generation);
        DebounceRequest {
            generation: self.generation,
            delay: self.debounce,
        }
    }

    fn trigger_for(&self, generation: u64) -> SearchTrigger {
        if self.query.is_searchable() {
            SearchTrigger::Search {
                generation,
                query: self.query.clone(),
            }
        } else {
            SearchTrigger::Clear { generation }
        }
    }
}
