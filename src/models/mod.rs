// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod accounts;
pub mod auth;
pub mod index;
pub mod search;
pub mod settings;
