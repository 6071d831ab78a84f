// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod accounts;
pub mod api;
pub mod auth;
pub mod index_trigger;
pub mod logging;
pub mod notifier;
pub mod page_fetcher;
pub mod query_controller;
pub mod result_actions;
pub mod scroll_trigger;
pub mod session;
