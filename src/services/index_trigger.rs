// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Starts a backend reindex and follows its status.

use crate::models::index::IndexingStatus;
use crate::models::settings::ClientSettings;
use crate::services::api::{ApiClient, ApiError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("an index request is already running")]
    AlreadyRunning,
    /// The backend stopped reporting the run, e.g. after a restart
    #[error("the backend reported no running reindex")]
    Interrupted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl IndexError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, IndexError::Api(e) if e.is_unauthorized())
    }
}

/// Releases the single-flight flag when a run ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Reindex trigger with a single-flight guard.
///
/// Status changes are published on a watch channel. Terminal statuses go back
/// to `not_started` after `reset_after`.
#[derive(Clone)]
pub struct IndexTrigger {
    api: ApiClient,
    status: Arc<watch::Sender<IndexingStatus>>,
    busy: Arc<AtomicBool>,
    poll_interval: Duration,
    reset_after: Duration,
}

impl IndexTrigger {
    pub fn new(api: ApiClient, settings: &ClientSettings) -> Self {
        let (status, _) = watch::channel(IndexingStatus::NotStarted);
        Self {
            api,
            status: Arc::new(status),
            busy: Arc::new(AtomicBool::new(false)),
            poll_interval: settings.index_poll_interval,
            reset_after: settings.index_reset_after,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexingStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> IndexingStatus {
        *self.status.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Request a reindex and poll while the backend reports it running.
    ///
    /// Returns the terminal status reported by the backend. `not_started`
    /// while polling ends the run with [`IndexError::Interrupted`]. A transport
    /// or HTTP error while polling stops the poll and marks the run failed; a
    /// 401 returns the status to `not_started`.
    pub async fn run(&self) -> Result<IndexingStatus, IndexError> {
        self.start().await?;
        let _guard = BusyGuard(self.busy.clone());

        match self.poll().await {
            Ok(status) if status.is_terminal() => {
                self.schedule_reset(status);
                Ok(status)
            }
            Ok(status) => {
                tracing::warn!(%status, "reindex no longer reported by the backend");
                Err(IndexError::Interrupted)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Request a reindex without following it. The status stays `indexing`.
    pub async fn start_only(&self) -> Result<(), IndexError> {
        self.start().await?;
        self.busy.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn start(&self) -> Result<(), IndexError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(IndexError::AlreadyRunning);
        }

        self.publish(IndexingStatus::Indexing);
        tracing::info!("requesting reindex");

        if let Err(e) = self.api.index_files().await {
            self.busy.store(false, Ordering::SeqCst);
            return Err(self.fail(e));
        }
        Ok(())
    }

    async fn poll(&self) -> Result<IndexingStatus, ApiError> {
        loop {
            sleep(self.poll_interval).await;
            let status = self.api.index_status().await?;
            tracing::debug!(%status, "index status");
            self.publish(status);
            if !status.is_running() {
                tracing::info!(%status, "reindex stopped");
                return Ok(status);
            }
        }
    }

    fn fail(&self, error: ApiError) -> IndexError {
        if error.is_unauthorized() {
            self.publish(IndexingStatus::NotStarted);
        } else {
            tracing::error!(error = %error, "reindex failed");
            self.publish(IndexingStatus::Failed);
            self.schedule_reset(IndexingStatus::Failed);
        }
        IndexError::Api(error)
    }

    fn publish(&self, status: IndexingStatus) {
        self.status.send_replace(status);
    }

    fn schedule_reset(&self, terminal: IndexingStatus) {
        let status = self.status.clone();
        let delay = self.reset_after;
        tokio::spawn(async move {
            sleep(delay).await;
            status.send_if_modified(|current| {
                if *current == terminal {
                    *current = IndexingStatus::NotStarted;
                    true
                } else {
                    false
                }
            });
        });
    }
}
