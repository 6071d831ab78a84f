// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Infinite scroll: request the next page when the last rendered result
//! becomes visible.

/// Visibility observer bound to the last rendered result.
///
/// Only one item is observed at a time; re-attaching disconnects the previous
/// observation first, so an item that is no longer last cannot trigger a fetch.
#[derive(Debug, Default)]
pub struct ScrollTrigger {
    observed: Option<i64>,
    attachments: u64,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `last_id` (or nothing when the list is empty).
    pub fn reattach(&mut self, last_id: Option<i64>) {
        if self.observed == last_id {
            return;
        }
        self.disconnect();
        if let Some(id) = last_id {
            self.observed = Some(id);
            self.attachments += 1;
        }
    }

    pub fn disconnect(&mut self) {
        self.observed = None;
    }

    pub fn observed(&self) -> Option<i64> {
        self.observed
    }

    /// Number of observations created so far
    pub fn attachments(&self) -> u64 {
        self.attachments
    }

    /// Item `id` scrolled into view. Returns true if the next page should be requested.
    pub fn on_visible(&self, id: i64, loading: bool, has_more: bool) -> bool {
        self.observed == Some(id) && !loading && has_more
    }
}
