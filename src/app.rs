// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search screen state machine.
//!
//! [`SearchApp::dispatch`] is pure: it updates state and returns the
//! [`Effect`]s to perform. Timers and backend calls live in
//! [`crate::runtime::AppRuntime`], which feeds their completions back in as
//! [`Action`]s.

use crate::models::search::{FileResult, FileTypeFilter, SearchPage, SortOrder, StorageType};
use crate::models::settings::ClientSettings;
use crate::services::api::ApiError;
use crate::services::index_trigger::IndexError;
use crate::services::notifier::{Notification, Notifier};
use crate::services::page_fetcher::{FetchOutcome, PageFetcher, PageRequest, RequestTag};
use crate::services::query_controller::{DebounceRequest, QueryController, SearchTrigger};
use crate::services::result_actions::ActionError;
use crate::services::scroll_trigger::ScrollTrigger;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `FILE_SEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("FILE_SEARCH_VERSION");

const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in";

/// What the search screen is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing { generation: u64 },
    Fetching { tag: RequestTag },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedIn,
    LoggedOut,
}

/// Side operations whose completion is reported through [`Action::ActionFinished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Download,
    OpenLocation,
    Index,
}

impl ActionKind {
    fn failure_message(&self) -> &'static str {
        match self {
            ActionKind::Download => "Failed to download file",
            ActionKind::OpenLocation => "Failed to open file location",
            ActionKind::Index => "Failed to index files",
        }
    }
}

/// Failed side operation, reduced to what the screen needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub session_expired: bool,
}

impl From<ActionError> for Failure {
    fn from(e: ActionError) -> Self {
        Self {
            session_expired: e.is_unauthorized(),
            message: e.to_string(),
        }
    }
}

impl From<IndexError> for Failure {
    fn from(e: IndexError) -> Self {
        Self {
            session_expired: e.is_unauthorized(),
            message: e.to_string(),
        }
    }
}

/// Inputs: user intents and completions of effects.
#[derive(Debug)]
pub enum Action {
    TextChanged(String),
    ServiceFilterChanged(Option<StorageType>),
    FileTypeFilterChanged(Option<FileTypeFilter>),
    SortOrderChanged(SortOrder),
    /// Search button: search now, skipping the debounce
    SubmitNow,
    DebounceElapsed {
        generation: u64,
    },
    PageLoaded {
        tag: RequestTag,
        outcome: Result<SearchPage, ApiError>,
    },
    /// The result with this id scrolled into view
    LastItemVisible {
        id: i64,
    },
    ToggleFavorite {
        id: i64,
    },
    /// `generation` is the result set the toggle was issued against
    FavoriteResolved {
        id: i64,
        generation: u64,
        outcome: Result<bool, Failure>,
    },
    OpenLocation {
        id: i64,
    },
    Download {
        id: i64,
        dest: PathBuf,
    },
    /// A download, open-location or index run ended. `Ok` carries the info message.
    ActionFinished {
        kind: ActionKind,
        outcome: Result<String, Failure>,
    },
    SessionExpired,
}

/// Work for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the debounce timer, replacing any running one
    ScheduleDebounce(DebounceRequest),
    CancelDebounce,
    FetchPage(PageRequest),
    ToggleFavorite {
        id: i64,
        generation: u64,
        file: FileResult,
    },
    OpenLocation { id: i64, filepath: String },
    Download { id: i64, filepath: String, dest: PathBuf },
    RedirectToLogin,
}

/// State of the search screen.
#[derive(Debug)]
pub struct SearchApp {
    query: QueryController,
    fetcher: PageFetcher,
    scroll: ScrollTrigger,
    notifier: Notifier,
    auth: AuthState,
    favorites_in_flight: HashSet<i64>,
}

impl SearchApp {
    pub fn new(settings: &ClientSettings, auth: AuthState) -> Self {
        Self {
            query: QueryController::new(settings.debounce),
            fetcher: PageFetcher::new(settings.page_limit),
            scroll: ScrollTrigger::new(),
            notifier: Notifier::new(settings.notification_ttl),
            auth,
            favorites_in_flight: HashSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if let Some(tag) = self.fetcher.in_flight() {
            Phase::Fetching { tag }
        } else if self.query.is_pending() {
            Phase::Debouncing {
                generation: self.query.generation(),
            }
        } else {
            Phase::Idle
        }
    }

    pub fn auth(&self) -> AuthState {
        self.auth
    }

    pub fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
    }

    pub fn query(&self) -> &QueryController {
        &self.query
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    pub fn scroll(&self) -> &ScrollTrigger {
        &self.scroll
    }

    /// Results in the selected sort order.
    pub fn results(&self) -> Vec<&FileResult> {
        self.fetcher.sorted(self.query.query().sort)
    }

    /// Id of the result the scroll observer is attached to.
    pub fn last_visible_candidate(&self) -> Option<i64> {
        self.scroll.observed()
    }

    pub fn notifications(&mut self, now: Instant) -> Vec<Notification> {
        self.notifier.active(now)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifier.drain()
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::TextChanged(text) => debounce(self.query.set_text(text)),
            Action::ServiceFilterChanged(service) => {
                debounce(self.query.set_service_filter(service))
            }
            Action::FileTypeFilterChanged(file_type) => {
                debounce(self.query.set_file_type_filter(file_type))
            }
            Action::SortOrderChanged(sort) => {
                self.query.set_sort_order(sort);
                self.reattach_scroll();
                Vec::new()
            }
            Action::SubmitNow => {
                let trigger = self.query.submit_now();
                let mut effects = vec![Effect::CancelDebounce];
                effects.extend(self.start_search(trigger));
                effects
            }
            Action::DebounceElapsed { generation } => {
                let trigger = self.query.on_debounce_elapsed(generation);
                self.start_search(trigger)
            }
            Action::PageLoaded { tag, outcome } => self.page_loaded(tag, outcome),
            Action::LastItemVisible { id } => {
                if !self
                    .scroll
                    .on_visible(id, self.fetcher.is_loading(), self.fetcher.has_more())
                {
                    return Vec::new();
                }
                self.fetch_next()
            }
            Action::ToggleFavorite { id } => self.toggle_favorite(id),
            Action::FavoriteResolved {
                id,
                generation,
                outcome,
            } => {
                if self.fetcher.active_generation() != Some(generation) {
                    tracing::debug!(id, generation, "favorite for a replaced result set");
                    return match outcome {
                        Err(failure) if failure.session_expired => self.expire(),
                        _ => Vec::new(),
                    };
                }
                self.favorites_in_flight.remove(&id);
                match outcome {
                    Ok(is_favorite) => {
                        self.fetcher.set_favorite(id, is_favorite);
                        Vec::new()
                    }
                    Err(failure) if failure.session_expired => self.expire(),
                    Err(failure) => {
                        self.notifier
                            .error(format!("Failed to update favorite: {}", failure.message));
                        Vec::new()
                    }
                }
            }
            Action::OpenLocation { id } => match self.filepath_of(id) {
                Some(filepath) => vec![Effect::OpenLocation { id, filepath }],
                None => Vec::new(),
            },
            Action::Download { id, dest } => self.download(id, dest),
            Action::ActionFinished { kind, outcome } => match outcome {
                Ok(message) => {
                    self.notifier.info(message);
                    Vec::new()
                }
                Err(failure) if failure.session_expired => self.expire(),
                Err(failure) => {
                    self.notifier
                        .error(format!("{}: {}", kind.failure_message(), failure.message));
                    Vec::new()
                }
            },
            Action::SessionExpired => self.expire(),
        }
    }

    fn start_search(&mut self, trigger: SearchTrigger) -> Vec<Effect> {
        match trigger {
            SearchTrigger::Stale => Vec::new(),
            SearchTrigger::Clear { .. } => {
                self.fetcher.clear();
                self.favorites_in_flight.clear();
                self.scroll.reattach(None);
                Vec::new()
            }
            SearchTrigger::Search { generation, query } => {
                tracing::debug!(generation, text = %query.trimmed_text(), "starting search");
                self.fetcher.reset(generation, query);
                self.favorites_in_flight.clear();
                self.fetch_next()
            }
        }
    }

    fn fetch_next(&mut self) -> Vec<Effect> {
        match self.fetcher.begin() {
            Ok(request) => vec![Effect::FetchPage(request)],
            Err(refusal) => {
                tracing::debug!(?refusal, "not fetching");
                Vec::new()
            }
        }
    }

    fn page_loaded(&mut self, tag: RequestTag, outcome: Result<SearchPage, ApiError>) -> Vec<Effect> {
        match self.fetcher.complete(tag, outcome) {
            FetchOutcome::Replaced { count } => {
                tracing::debug!(count, "results replaced");
                self.reattach_scroll();
                Vec::new()
            }
            FetchOutcome::Appended { added, duplicates } => {
                tracing::debug!(added, duplicates, "results appended");
                self.reattach_scroll();
                Vec::new()
            }
            FetchOutcome::Failed { message, .. } => {
                self.notifier.error(format!("Search failed: {message}"));
                self.reattach_scroll();
                Vec::new()
            }
            FetchOutcome::SessionExpired => self.expire(),
            FetchOutcome::Stale => Vec::new(),
        }
    }

    fn toggle_favorite(&mut self, id: i64) -> Vec<Effect> {
        let Some(generation) = self.fetcher.active_generation() else {
            return Vec::new();
        };
        let Some(file) = self.fetcher.find(id) else {
            return Vec::new();
        };
        if file.filepath().is_none() {
            let message = format!("'{}' cannot be added to favorites", file.filename);
            self.notifier.error(message);
            return Vec::new();
        }
        if !self.favorites_in_flight.insert(id) {
            return Vec::new();
        }
        vec![Effect::ToggleFavorite {
            id,
            generation,
            file: file.clone(),
        }]
    }

    fn download(&mut self, id: i64, dest: PathBuf) -> Vec<Effect> {
        let Some(file) = self.fetcher.find(id) else {
            return Vec::new();
        };
        if !file.can_download() {
            let message = format!("'{}' is not a local file and cannot be downloaded", file.filename);
            self.notifier.error(message);
            return Vec::new();
        }
        match file.filepath() {
            Some(filepath) => vec![Effect::Download {
                id,
                filepath: filepath.to_string(),
                dest,
            }],
            None => Vec::new(),
        }
    }

    fn filepath_of(&mut self, id: i64) -> Option<String> {
        let file = self.fetcher.find(id)?;
        match file.filepath() {
            Some(filepath) => Some(filepath.to_string()),
            None => {
                let message = format!("'{}' has no file location", file.filename);
                self.notifier.error(message);
                None
            }
        }
    }

    /// Observe the last item of the list as currently rendered.
    fn reattach_scroll(&mut self) {
        let last = self.results().last().map(|f| f.id);
        self.scroll.reattach(last);
    }

    fn expire(&mut self) -> Vec<Effect> {
        if self.auth == AuthState::LoggedOut && self.fetcher.active_query().is_none() {
            return Vec::new();
        }
        self.auth = AuthState::LoggedOut;
        self.query.cancel_pending();
        self.fetcher.clear();
        self.scroll.reattach(None);
        self.favorites_in_flight.clear();
        self.notifier.error(SESSION_EXPIRED_MESSAGE);
        vec![Effect::CancelDebounce, Effect::RedirectToLogin]
    }
}

fn debounce(request: Option<DebounceRequest>) -> Vec<Effect> {
    request.map(Effect::ScheduleDebounce).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::{CloudProvider, FileLocation};
    use crate::services::notifier::NotificationLevel;
    use std::time::Duration;

    fn settings() -> ClientSettings {
        ClientSettings {
            debounce: Duration::from_millis(500),
            page_limit: 10,
            ..ClientSettings::default()
        }
    }

    fn app() -> SearchApp {
        SearchApp::new(&settings(), AuthState::LoggedIn)
    }

    fn local(id: i64, name: &str) -> FileResult {
        FileResult {
            id,
            filename: name.to_string(),
            location: FileLocation::Local {
                filepath: format!("/documents/{name}"),
            },
            is_favorite: false,
        }
    }

    fn gmail(id: i64, name: &str) -> FileResult {
        FileResult {
            id,
            filename: name.to_string(),
            location: FileLocation::Cloud {
                provider: CloudProvider::Gmail,
                cloud_file_id: None,
                filepath: None,
            },
            is_favorite: false,
        }
    }

    fn page(files: Vec<FileResult>, has_more: bool) -> SearchPage {
        SearchPage {
            results: files,
            has_more,
            skipped: 0,
        }
    }

    fn numbered(range: std::ops::Range<i64>) -> Vec<FileResult> {
        range.map(|i| local(i, &format!("f{i:02}.txt"))).collect()
    }

    fn fetch_request(effects: &[Effect]) -> PageRequest {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchPage(request) => Some(request.clone()),
                _ => None,
            })
            .expect("expected a fetch")
    }

    /// Type `text` and let the debounce elapse.
    fn search(app: &mut SearchApp, text: &str) -> PageRequest {
        let effects = app.dispatch(Action::TextChanged(text.to_string()));
        let Some(Effect::ScheduleDebounce(request)) = effects.first().cloned() else {
            panic!("expected a debounce, got {effects:?}");
        };
        let effects = app.dispatch(Action::DebounceElapsed {
            generation: request.generation,
        });
        fetch_request(&effects)
    }

    #[test]
    fn test_typing_schedules_debounce_only() {
        let mut app = app();
        let effects = app.dispatch(Action::TextChanged("re".to_string()));
        assert_eq!(
            effects,
            vec![Effect::ScheduleDebounce(DebounceRequest {
                generation: 1,
                delay: Duration::from_millis(500),
            })]
        );
        assert_eq!(app.phase(), Phase::Debouncing { generation: 1 });
    }

    #[test]
    fn test_only_latest_debounce_fetches() {
        let mut app = app();
        app.dispatch(Action::TextChanged("r".to_string()));
        app.dispatch(Action::TextChanged("re".to_string()));
        app.dispatch(Action::TextChanged("report".to_string()));

        assert!(app.dispatch(Action::DebounceElapsed { generation: 1 }).is_empty());
        assert!(app.dispatch(Action::DebounceElapsed { generation: 2 }).is_empty());
        let request = fetch_request(&app.dispatch(Action::DebounceElapsed { generation: 3 }));
        assert_eq!(request.query.text, "report");
        assert_eq!(request.offset, 0);
        assert_eq!(app.phase(), Phase::Fetching { tag: request.tag });
    }

    #[test]
    fn test_submit_now_skips_debounce() {
        let mut app = app();
        app.dispatch(Action::TextChanged("report".to_string()));
        let effects = app.dispatch(Action::SubmitNow);
        assert_eq!(effects[0], Effect::CancelDebounce);
        assert_eq!(fetch_request(&effects).query.text, "report");
    }

    #[test]
    fn test_blank_query_clears_results_without_request() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(numbered(1..4), false)),
        });
        assert_eq!(app.results().len(), 3);

        let effects = app.dispatch(Action::TextChanged("   ".to_string()));
        let Some(Effect::ScheduleDebounce(debounce)) = effects.first().cloned() else {
            panic!("expected a debounce");
        };
        let effects = app.dispatch(Action::DebounceElapsed {
            generation: debounce.generation,
        });
        assert!(effects.is_empty());
        assert!(app.results().is_empty());
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn test_filter_alone_is_searchable() {
        let mut app = app();
        let effects = app.dispatch(Action::ServiceFilterChanged(Some(StorageType::Gmail)));
        assert_eq!(effects.len(), 1);
        let request = fetch_request(&app.dispatch(Action::SubmitNow));
        assert_eq!(request.query.service, Some(StorageType::Gmail));
    }

    #[test]
    fn test_sort_change_does_not_fetch() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(vec![local(1, "b.txt"), local(2, "a.pdf")], false)),
        });

        assert!(app.dispatch(Action::SortOrderChanged(SortOrder::Type)).is_empty());
        let names: Vec<&str> = app.results().iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.txt"]);
        assert_eq!(app.last_visible_candidate(), Some(1));
    }

    #[test]
    fn test_last_item_visible_fetches_next_page_once() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(numbered(1..11), true)),
        });
        assert_eq!(app.last_visible_candidate(), Some(10));

        let next = fetch_request(&app.dispatch(Action::LastItemVisible { id: 10 }));
        assert_eq!(next.offset, 10);
        // Still loading: a second visibility event is ignored
        assert!(app.dispatch(Action::LastItemVisible { id: 10 }).is_empty());
        // Not the observed item
        assert!(app.dispatch(Action::LastItemVisible { id: 3 }).is_empty());

        app.dispatch(Action::PageLoaded {
            tag: next.tag,
            outcome: Ok(page(numbered(10..15), false)),
        });
        assert_eq!(app.results().len(), 14);
        assert_eq!(app.last_visible_candidate(), Some(14));
        // Exhausted
        assert!(app.dispatch(Action::LastItemVisible { id: 14 }).is_empty());
    }

    #[test]
    fn test_stale_page_ignored() {
        let mut app = app();
        let first = search(&mut app, "q1");
        let second = search(&mut app, "q2");

        app.dispatch(Action::PageLoaded {
            tag: second.tag,
            outcome: Ok(page(vec![local(20, "q2.txt")], false)),
        });
        app.dispatch(Action::PageLoaded {
            tag: first.tag,
            outcome: Ok(page(vec![local(10, "q1.txt")], false)),
        });

        let ids: Vec<i64> = app.results().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![20]);
    }

    #[test]
    fn test_first_page_failure_notifies_and_clears() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            }),
        });
        assert!(app.results().is_empty());
        let notes = app.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert!(notes[0].message.starts_with("Search failed"));
    }

    #[test]
    fn test_unauthorized_page_redirects_to_login() {
        let mut app = app();
        let request = search(&mut app, "report");
        let effects = app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Err(ApiError::Unauthorized),
        });
        assert_eq!(effects, vec![Effect::CancelDebounce, Effect::RedirectToLogin]);
        assert_eq!(app.auth(), AuthState::LoggedOut);
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn test_favorite_round_trip_updates_only_matching_entry() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(numbered(1..4), false)),
        });

        let effects = app.dispatch(Action::ToggleFavorite { id: 2 });
        assert!(matches!(&effects[..], [Effect::ToggleFavorite { id: 2, .. }]));
        // Already in flight
        assert!(app.dispatch(Action::ToggleFavorite { id: 2 }).is_empty());

        app.dispatch(Action::FavoriteResolved {
            id: 2,
            generation: request.tag.generation,
            outcome: Ok(true),
        });
        let favorites: Vec<(i64, bool)> = app
            .fetcher()
            .files()
            .iter()
            .map(|f| (f.id, f.is_favorite))
            .collect();
        assert_eq!(favorites, vec![(1, false), (2, true), (3, false)]);
    }

    #[test]
    fn test_favorite_for_replaced_results_is_ignored() {
        let mut app = app();
        let first = search(&mut app, "q1");
        app.dispatch(Action::PageLoaded {
            tag: first.tag,
            outcome: Ok(page(vec![local(1, "a.txt")], false)),
        });
        assert_eq!(app.dispatch(Action::ToggleFavorite { id: 1 }).len(), 1);

        let second = search(&mut app, "q2");
        app.dispatch(Action::PageLoaded {
            tag: second.tag,
            outcome: Ok(page(vec![local(1, "unrelated.txt")], false)),
        });
        // The new list has its own id 1, which can be toggled right away
        let effects = app.dispatch(Action::ToggleFavorite { id: 1 });
        assert!(matches!(
            &effects[..],
            [Effect::ToggleFavorite { id: 1, generation, .. }] if *generation == second.tag.generation
        ));

        app.dispatch(Action::FavoriteResolved {
            id: 1,
            generation: first.tag.generation,
            outcome: Ok(true),
        });
        let file = app.fetcher().find(1).unwrap();
        assert_eq!(file.filename, "unrelated.txt");
        assert!(!file.is_favorite);
        // Still in flight for the new list
        assert!(app.dispatch(Action::ToggleFavorite { id: 1 }).is_empty());
    }

    #[test]
    fn test_cloud_item_without_filepath_cannot_be_favorited_or_downloaded() {
        let mut app = app();
        let request = search(&mut app, "invoice");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(vec![gmail(5, "invoice.pdf")], false)),
        });

        assert!(app.dispatch(Action::ToggleFavorite { id: 5 }).is_empty());
        assert!(app
            .dispatch(Action::Download {
                id: 5,
                dest: PathBuf::from("/tmp"),
            })
            .is_empty());
        assert_eq!(app.take_notifications().len(), 2);
    }

    #[test]
    fn test_download_and_open_location_effects() {
        let mut app = app();
        let request = search(&mut app, "report");
        app.dispatch(Action::PageLoaded {
            tag: request.tag,
            outcome: Ok(page(vec![local(1, "Report.pdf")], false)),
        });

        let effects = app.dispatch(Action::Download {
            id: 1,
            dest: PathBuf::from("/tmp"),
        });
        assert_eq!(
            effects,
            vec![Effect::Download {
                id: 1,
                filepath: "/documents/Report.pdf".to_string(),
                dest: PathBuf::from("/tmp"),
            }]
        );
        let effects = app.dispatch(Action::OpenLocation { id: 1 });
        assert_eq!(
            effects,
            vec![Effect::OpenLocation {
                id: 1,
                filepath: "/documents/Report.pdf".to_string(),
            }]
        );
    }

    #[test]
    fn test_failed_action_notifies() {
        let mut app = app();
        app.dispatch(Action::ActionFinished {
            kind: ActionKind::OpenLocation,
            outcome: Err(Failure {
                message: "server returned 404: File not found".to_string(),
                session_expired: false,
            }),
        });
        let notes = app.take_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.starts_with("Failed to open file location"));
        assert_eq!(app.auth(), AuthState::LoggedIn);
    }

    #[test]
    fn test_expired_action_redirects_once() {
        let mut app = app();
        let failure = Failure {
            message: "session expired".to_string(),
            session_expired: true,
        };
        let effects = app.dispatch(Action::ActionFinished {
            kind: ActionKind::Index,
            outcome: Err(failure),
        });
        assert!(effects.contains(&Effect::RedirectToLogin));
        assert!(app.dispatch(Action::SessionExpired).is_empty());
    }
}
