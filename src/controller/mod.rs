//! List-state controller shared by every list page of the dashboard.
//!
//! A [`ListController`] owns the query, the last fetched page and the
//! loading status of one collection. Views read snapshots through
//! [`ListController::state`] or [`ListController::subscribe`] and route every
//! edit through the mutators, which return `false` when an edit is rejected.
//!
//! Each fetch is tagged with a token taken from a monotonically increasing
//! counter. A response is applied only while its token is still the latest
//! one issued, so a slow response never overwrites the page of a newer query.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, watch};

use crate::domain::list::{ListState, ListStatus};
use crate::domain::query::{FilterValue, ListQuery, Sort};
use crate::domain::types::PageNumber;
use crate::dto::api::ListEnvelope;
use crate::repository::errors::{RepositoryError, RepositoryResult, SESSION_EXPIRED_MESSAGE};
use crate::repository::{CollectionReader, PageRequest};

pub mod debounce;
pub mod settings;

use debounce::Debouncer;
pub use settings::ListSettings;

const SESSION_CHANNEL_CAPACITY: usize = 8;

/// Events a session-level handler must react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend answered 401; the user has to sign in again.
    Unauthorized { endpoint: String },
}

struct Shared<T> {
    settings: ListSettings,
    reader: Arc<dyn CollectionReader>,
    state: watch::Sender<ListState<T>>,
    latest: AtomicU64,
    closed: AtomicBool,
    search_pending: AtomicBool,
    sessions: broadcast::Sender<SessionEvent>,
}

impl<T> Shared<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Takes a new token, marks the state as loading and spawns the request.
    fn issue(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }

        let mut issued = None;
        self.state.send_modify(|state| {
            let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            self.search_pending.store(false, Ordering::SeqCst);
            state.status = ListStatus::Loading;
            issued = Some((token, PageRequest::new(&self.settings.endpoint, &state.query)));
        });
        let Some((token, request)) = issued else {
            return;
        };

        log::debug!(
            "Fetching {} #{token} with {:?}",
            request.endpoint,
            request.params
        );

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = shared.reader.fetch_page(&request).await;
            shared.apply(token, outcome);
        });
    }

    fn apply(&self, token: u64, outcome: RepositoryResult<ListEnvelope>) {
        if self.is_closed() {
            return;
        }

        let decoded = outcome
            .and_then(|envelope| envelope.into_result::<T>().map_err(RepositoryError::from));

        let endpoint = &self.settings.endpoint;

        // Session expiry is not tied to one query, stale or not.
        let forwarded = matches!(decoded, Err(RepositoryError::Unauthorized))
            && self
                .sessions
                .send(SessionEvent::Unauthorized {
                    endpoint: endpoint.clone(),
                })
                .is_ok();

        let applied = self.state.send_if_modified(|state| {
            if token != self.latest.load(Ordering::SeqCst) {
                return false;
            }

            match decoded {
                Ok(result) => {
                    if result.items.len() > state.query.per_page.get() as usize {
                        log::warn!(
                            "{endpoint} returned {} rows for a page of {}",
                            result.items.len(),
                            state.query.per_page
                        );
                    }
                    state.result = Some(result);
                    state.status = ListStatus::Idle;
                    state.error_message = None;
                }
                Err(RepositoryError::Unauthorized) if forwarded => {
                    log::warn!("{endpoint} rejected the session");
                    state.status = ListStatus::Idle;
                    state.error_message = None;
                }
                Err(RepositoryError::Unauthorized) => {
                    log::error!(
                        "{endpoint} rejected the session and no session handler is listening"
                    );
                    state.status = ListStatus::Error;
                    state.error_message = Some(SESSION_EXPIRED_MESSAGE.to_string());
                }
                Err(err) => {
                    log::error!("Failed to load {endpoint}: {err}");
                    state.status = ListStatus::Error;
                    state.error_message = Some(err.user_message());
                }
            }
            true
        });

        if !applied {
            log::debug!("Discarding stale response #{token} for {endpoint}");
        }
    }
}

impl<T> Shared<T> {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Invalidates every issued token.
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.search_pending.store(false, Ordering::SeqCst);
    }
}

/// Paginated, filtered and searched state of one collection endpoint.
///
/// Mutators must be called from within a tokio runtime. Dropping the
/// controller invalidates every in-flight request.
pub struct ListController<T> {
    shared: Arc<Shared<T>>,
    debounce: Debouncer,
}

impl<T> ListController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(reader: Arc<dyn CollectionReader>, settings: ListSettings) -> Self {
        let query = ListQuery::new(settings.default_per_page);
        Self::build(reader, settings, query)
    }

    /// Starts from a previously saved query.
    ///
    /// A page size outside the allowed set falls back to the default and
    /// filters the endpoint does not support are dropped. The page is reset.
    pub fn with_query(
        reader: Arc<dyn CollectionReader>,
        settings: ListSettings,
        saved: ListQuery,
    ) -> Self {
        let mut query = ListQuery::new(
            settings
                .page_size(saved.per_page.get())
                .unwrap_or(settings.default_per_page),
        );
        query.search = saved.search;
        if settings.sortable {
            query.sort = saved.sort;
        }
        query.filters = saved
            .filters
            .into_iter()
            .filter(|(key, _)| settings.filter_key(key.as_str()).is_some())
            .collect();

        Self::build(reader, settings, query)
    }

    fn build(reader: Arc<dyn CollectionReader>, settings: ListSettings, query: ListQuery) -> Self {
        let (state, _) = watch::channel(ListState::new(query));
        let (sessions, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                settings,
                reader,
                state,
                latest: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                search_pending: AtomicBool::new(false),
                sessions,
            }),
            debounce: Debouncer::new(),
        }
    }

    pub fn settings(&self) -> &ListSettings {
        &self.shared.settings
    }

    /// Current snapshot.
    pub fn state(&self) -> ListState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn query(&self) -> ListQuery {
        self.shared.state.borrow().query.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.shared.state.subscribe()
    }

    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.sessions.subscribe()
    }

    /// Waits until no fetch is loading and no search is waiting for its
    /// quiet period, then returns the snapshot.
    pub async fn settled(&self) -> ListState<T> {
        let mut rx = self.shared.state.subscribe();
        loop {
            {
                let state = rx.borrow_and_update();
                if !state.is_loading() && !self.shared.search_pending.load(Ordering::SeqCst) {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// Initial fetch issued when the view mounts.
    pub fn load(&mut self) {
        self.fetch_now();
    }

    /// Re-fetches the current query, e.g. after a create, update or delete.
    pub fn refresh(&mut self) {
        self.fetch_now();
    }

    /// Updates the search text and fetches once typing has paused for the
    /// configured quiet period.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        if self.shared.is_closed() {
            return false;
        }

        let text = text.into();
        self.shared.state.send_modify(|state| {
            state.query.set_search(text);
            self.shared.search_pending.store(true, Ordering::SeqCst);
        });

        let shared = Arc::clone(&self.shared);
        self.debounce
            .schedule(self.shared.settings.search_debounce, move || shared.issue());
        true
    }

    pub fn set_filter(&mut self, key: &str, value: impl Into<FilterValue>) -> bool {
        if self.shared.is_closed() {
            return false;
        }
        let Some(key) = self.shared.settings.filter_key(key).cloned() else {
            log::debug!(
                "Ignoring unsupported filter {key:?} on {}",
                self.shared.settings.endpoint
            );
            return false;
        };

        let value = value.into();
        self.shared
            .state
            .send_modify(|state| state.query.set_filter(key, value));
        self.fetch_now();
        true
    }

    pub fn set_per_page(&mut self, per_page: u32) -> bool {
        if self.shared.is_closed() {
            return false;
        }
        let Some(per_page) = self.shared.settings.page_size(per_page) else {
            return false;
        };

        self.shared
            .state
            .send_modify(|state| state.query.set_per_page(per_page));
        self.fetch_now();
        true
    }

    /// Moves to page `page` when `1 <= page <= last_page`; otherwise nothing
    /// happens.
    pub fn set_page(&mut self, page: u32) -> bool {
        if self.shared.is_closed() || page > self.shared.state.borrow().max_page() {
            return false;
        }
        let Ok(page) = PageNumber::new(page) else {
            return false;
        };

        self.shared
            .state
            .send_modify(|state| state.query.go_to(page));
        self.fetch_now();
        true
    }

    /// Changes the ordering on endpoints that support it. `None` restores
    /// the server's default order.
    pub fn set_sort(&mut self, sort: Option<Sort>) -> bool {
        if self.shared.is_closed() || !self.shared.settings.sortable {
            return false;
        }

        self.shared
            .state
            .send_modify(|state| state.query.set_sort(sort));
        self.fetch_now();
        true
    }

    /// Resets search, filters and page in a single update.
    pub fn clear_filters(&mut self) {
        self.shared.state.send_modify(|state| state.query.clear());
        self.fetch_now();
    }

    /// Stops applying responses. Later mutators do nothing.
    pub fn close(&mut self) {
        self.debounce.cancel();
        self.shared.close();
    }

    // An immediate fetch already carries the latest search text.
    fn fetch_now(&mut self) {
        self.debounce.cancel();
        self.shared.issue();
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.debounce.cancel();
        self.shared.close();
    }
}
