// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Client for a paginated file search backend: debounced querying, infinite
//! scroll, per-result actions and reindexing.

pub mod app;
pub mod models;
pub mod runtime;
pub mod services;

pub use app::VERSION;
