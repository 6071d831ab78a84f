// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Drives [`SearchApp`] on tokio.
//!
//! Each [`Effect`] runs as a spawned task that reports back over an mpsc
//! channel as an [`Action`]. Debounce timers are aborted when superseded.

use crate::app::{Action, ActionKind, AuthState, Effect, Failure, SearchApp};
use crate::models::index::IndexingStatus;
use crate::models::settings::ClientSettings;
use crate::services::api::ApiClient;
use crate::services::auth::AuthService;
use crate::services::index_trigger::IndexTrigger;
use crate::services::notifier::Notification;
use crate::services::result_actions::ResultActions;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct AppRuntime {
    app: SearchApp,
    api: ApiClient,
    auth: AuthService,
    actions: ResultActions,
    index: IndexTrigger,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
    debounce: Option<JoinHandle<()>>,
    /// Spawned effects that have not reported back yet (timers excluded)
    in_flight: usize,
    login_required: bool,
}

impl AppRuntime {
    pub fn new(auth: AuthService, settings: &ClientSettings) -> Self {
        let api = auth.api().clone();
        let state = if auth.session().is_logged_in() {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        };
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app: SearchApp::new(settings, state),
            actions: ResultActions::new(api.clone()),
            index: IndexTrigger::new(api.clone(), settings),
            api,
            auth,
            tx,
            rx,
            debounce: None,
            in_flight: 0,
            login_required: false,
        }
    }

    pub fn app(&self) -> &SearchApp {
        &self.app
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthService {
        &mut self.auth
    }

    pub fn index(&self) -> &IndexTrigger {
        &self.index
    }

    /// True once the backend rejected the session.
    pub fn login_required(&self) -> bool {
        self.login_required
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.app.take_notifications()
    }

    pub fn dispatch(&mut self, action: Action) {
        let effects = self.app.dispatch(action);
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Process completions until no timer or request is outstanding.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 || self.app.query().is_pending() {
            let Some(action) = self.rx.recv().await else {
                break;
            };
            if !matches!(action, Action::DebounceElapsed { .. }) {
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            self.dispatch(action);
        }
    }

    /// Reindex and wait for the outcome. Failures end up as notifications.
    pub async fn reindex(&mut self) -> Option<IndexingStatus> {
        match self.index.run().await {
            Ok(status) => {
                let outcome = match status {
                    IndexingStatus::Failed => Err(Failure {
                        message: "indexing failed on the server".to_string(),
                        session_expired: false,
                    }),
                    _ => Ok(format!("Indexing {status}")),
                };
                self.dispatch(Action::ActionFinished {
                    kind: ActionKind::Index,
                    outcome,
                });
                Some(status)
            }
            Err(e) => {
                self.dispatch(Action::ActionFinished {
                    kind: ActionKind::Index,
                    outcome: Err(e.into()),
                });
                None
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDebounce(request) => {
                self.cancel_debounce();
                let tx = self.tx.clone();
                self.debounce = Some(tokio::spawn(async move {
                    sleep(request.delay).await;
                    let _ = tx.send(Action::DebounceElapsed {
                        generation: request.generation,
                    });
                }));
            }
            Effect::CancelDebounce => self.cancel_debounce(),
            Effect::FetchPage(request) => {
                let api = self.api.clone();
                self.spawn(async move {
                    let outcome = api
                        .search_files(&request.query, request.offset, request.limit)
                        .await;
                    Action::PageLoaded {
                        tag: request.tag,
                        outcome,
                    }
                });
            }
            Effect::ToggleFavorite {
                id,
                generation,
                file,
            } => {
                let actions = self.actions.clone();
                self.spawn(async move {
                    let outcome = actions.toggle_favorite(&file).await.map_err(Failure::from);
                    Action::FavoriteResolved {
                        id,
                        generation,
                        outcome,
                    }
                });
            }
            Effect::OpenLocation { filepath, .. } => {
                let actions = self.actions.clone();
                self.spawn(async move {
                    let outcome = actions
                        .open_file_location(&filepath)
                        .await
                        .map(|()| format!("Opened location of {filepath}"))
                        .map_err(Failure::from);
                    Action::ActionFinished {
                        kind: ActionKind::OpenLocation,
                        outcome,
                    }
                });
            }
            Effect::Download { filepath, dest, .. } => {
                let actions = self.actions.clone();
                self.spawn(async move {
                    let outcome = actions
                        .download(&filepath, &dest)
                        .await
                        .map(|path| format!("Saved {}", path.display()))
                        .map_err(Failure::from);
                    Action::ActionFinished {
                        kind: ActionKind::Download,
                        outcome,
                    }
                });
            }
            Effect::RedirectToLogin => {
                self.login_required = true;
                if let Err(e) = self.auth.session_expired() {
                    tracing::warn!(error = %e, "could not clear the saved session");
                }
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Action> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }
}

impl Drop for AppRuntime {
    fn drop(&mut self) {
        self.cancel_debounce();
    }
}
