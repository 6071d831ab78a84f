// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Connected cloud storage accounts.

use crate::models::accounts::CloudAccount;
use crate::models::auth::UserId;
use crate::services::api::{ApiClient, ApiError};

/// Sync endpoints (under `/search`) for Google accounts, in call order.
const GOOGLE_SYNC_ENDPOINTS: [&str; 3] = ["sync-cloud-storage", "gmail/sync", "photos/sync"];
const DROPBOX_SYNC_ENDPOINT: &str = "sync-dropbox";

/// Outcome of syncing one account.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Sources that synced, e.g. `gmail/sync`
    pub synced: Vec<&'static str>,
    /// Sources that failed with the error message
    pub failed: Vec<(&'static str, String)>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// List, sync and disconnect the user's cloud accounts.
#[derive(Debug, Clone)]
pub struct AccountsService {
    api: ApiClient,
}

impl AccountsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<CloudAccount>, ApiError> {
        let accounts = self.api.list_accounts(user_id).await?;
        tracing::debug!(count = accounts.len(), "cloud accounts");
        Ok(accounts)
    }

    /// Sync every source behind `account`.
    ///
    /// A Google account syncs Drive, Gmail and Photos one after another; a
    /// failing source does not stop the others. A 401 aborts immediately.
    pub async fn sync(&self, account: &CloudAccount) -> Result<SyncReport, ApiError> {
        let mut report = SyncReport::default();
        for endpoint in sync_endpoints(account) {
            let segments: Vec<&str> = endpoint.split('/').collect();
            match self.api.sync_account(&segments, account.id).await {
                Ok(()) => {
                    tracing::info!(account = account.id, source = endpoint, "synced");
                    report.synced.push(endpoint);
                }
                Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
                Err(e) => {
                    tracing::error!(account = account.id, source = endpoint, error = %e, "sync failed");
                    report.failed.push((endpoint, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    pub async fn disconnect(&self, account_id: i64) -> Result<(), ApiError> {
        self.api.disconnect_account(account_id).await?;
        tracing::info!(account = account_id, "disconnected cloud account");
        Ok(())
    }
}

/// Sync endpoints that apply to `account`. Unknown providers have none.
pub fn sync_endpoints(account: &CloudAccount) -> Vec<&'static str> {
    if account.is_dropbox() {
        vec![DROPBOX_SYNC_ENDPOINT]
    } else if account.is_google() {
        GOOGLE_SYNC_ENDPOINTS.to_vec()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(provider: &str) -> CloudAccount {
        CloudAccount {
            id: 3,
            provider: provider.to_string(),
            email: "alice@example.com".to_string(),
            permissions: Vec::new(),
            last_synced: None,
        }
    }

    #[test]
    fn test_sync_endpoints_by_provider() {
        assert_eq!(sync_endpoints(&account("Dropbox")), vec!["sync-dropbox"]);
        assert_eq!(
            sync_endpoints(&account("Google Drive")),
            vec!["sync-cloud-storage", "gmail/sync", "photos/sync"]
        );
        assert!(sync_endpoints(&account("OneDrive")).is_empty());
    }

    #[test]
    fn test_sync_report() {
        let mut report = SyncReport::default();
        assert!(report.is_complete());
        report.failed.push(("gmail/sync", "boom".to_string()));
        assert!(!report.is_complete());
    }
}
